use crate::command::{Action, Command, RemoveTarget};
use crate::error::AppError;
use crate::model::timestamp::parse_timestamp;
use crate::model::{DeltaTask, FieldChange, Task};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

const CLEAR_VALUE: &str = "none";

/// Parses one input line into a command. Unknown keywords produce
/// [`Action::Invalid`] rather than an error.
pub fn parse(line: &str) -> Result<Command, AppError> {
    let tokens = tokenize(line)?;
    parse_tokens(&tokens)
}

pub fn parse_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Command, AppError> {
    let (keyword, args) = tokens
        .split_first()
        .ok_or_else(|| AppError::invalid_input("Please enter a command."))?;
    let keyword = keyword.as_ref();
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    debug!(keyword, args = args.len(), "parsing command");

    let action = match keyword.to_lowercase().as_str() {
        "add" => parse_add(&args)?,
        "remove" => parse_remove(&args)?,
        "list" => Action::List {
            keywords: args.iter().map(|arg| arg.to_string()).collect(),
        },
        "done" => Action::Done {
            index: parse_single_index(&args, "mark completed")?,
        },
        "update" => parse_update(&args)?,
        "undo" => {
            no_arguments(&args, "Undo")?;
            Action::Undo
        }
        "relocate" | "move" => parse_relocate(&args)?,
        "reformat" | "clear" => {
            no_arguments(&args, "Reformat")?;
            Action::Clear
        }
        "help" => parse_help(&args)?,
        "exit" | "quit" => {
            no_arguments(&args, "Exit")?;
            Action::Exit
        }
        _ => Action::Invalid {
            keyword: keyword.to_string(),
        },
    };

    Ok(Command::new(action))
}

/// Splits on whitespace, keeping double-quoted spans together with the
/// quotes removed. Inside quotes `\"` and `\\` are escapes.
pub fn tokenize(line: &str) -> Result<Vec<String>, AppError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                tokens.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("Please close the quotation marks."));
    }

    if !current.is_empty() || quoted {
        tokens.push(current);
    }

    Ok(tokens)
}

/// Replaces the first word with its configured expansion, if any.
pub fn expand_alias(line: &str, aliases: &HashMap<String, String>) -> String {
    let trimmed = line.trim_start();
    let (head, rest) = match trimmed.find(char::is_whitespace) {
        Some(split) => trimmed.split_at(split),
        None => (trimmed, ""),
    };

    match aliases.get(&head.to_lowercase()) {
        Some(expansion) => format!("{expansion}{rest}"),
        None => line.to_string(),
    }
}

fn parse_add(args: &[&str]) -> Result<Action, AppError> {
    match args {
        [] => Err(AppError::invalid_input("Please indicate a task to add.")),
        [name] if name.trim().is_empty() => {
            Err(AppError::invalid_input("Please indicate a task to add."))
        }
        [name] => Ok(Action::Add {
            task: Task::new(name.trim()),
        }),
        _ => Err(AppError::invalid_input(
            "Please indicate only one task to add.",
        )),
    }
}

fn parse_remove(args: &[&str]) -> Result<Action, AppError> {
    match args {
        [] => Err(AppError::invalid_input("Please indicate a task to remove.")),
        [target] if target.trim().is_empty() => {
            Err(AppError::invalid_input("Please indicate a task to remove."))
        }
        [target] => {
            let target = match target.trim().parse::<i64>() {
                Ok(index) => RemoveTarget::Index(index),
                Err(_) => RemoveTarget::Name(target.trim().to_string()),
            };
            Ok(Action::Remove { target })
        }
        _ => Err(AppError::invalid_input(
            "Please indicate only one task to remove.",
        )),
    }
}

fn parse_single_index(args: &[&str], verb: &str) -> Result<i64, AppError> {
    match args {
        [] => Err(AppError::invalid_input(format!(
            "Please indicate the number of the task to {verb}."
        ))),
        [raw] => parse_index(raw),
        _ => Err(AppError::invalid_input(format!(
            "Please indicate only one task to {verb}."
        ))),
    }
}

fn parse_index(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::invalid_input(format!("\"{raw}\" is not a valid task number.")))
}

fn parse_update(args: &[&str]) -> Result<Action, AppError> {
    let (raw_index, changes) = args.split_first().ok_or_else(|| {
        AppError::invalid_input("Please indicate the number of the task to update.")
    })?;
    let index = parse_index(raw_index)?;

    if changes.is_empty() {
        return Err(AppError::invalid_input(
            "Please indicate what to update, for example: update 1 name \"new name\".",
        ));
    }

    let mut delta = DeltaTask::default();
    for pair in changes.chunks(2) {
        let field = pair[0].to_lowercase();
        let value = pair.get(1).ok_or_else(|| {
            AppError::invalid_input(format!("Please provide a value for \"{field}\"."))
        })?;

        let slot_taken = match field.as_str() {
            "name" => !delta.name.is_keep(),
            "start" => !delta.start.is_keep(),
            "end" => !delta.end.is_keep(),
            _ => {
                return Err(AppError::invalid_input(format!(
                    "\"{field}\" cannot be updated. Use name, start or end."
                )));
            }
        };
        if slot_taken {
            return Err(AppError::invalid_input(format!(
                "\"{field}\" was given more than once."
            )));
        }

        match field.as_str() {
            "name" => {
                if value.trim().is_empty() || value.eq_ignore_ascii_case(CLEAR_VALUE) {
                    return Err(AppError::invalid_input("A task must have a name."));
                }
                delta.name = FieldChange::Update(value.trim().to_string());
            }
            "start" => delta.start = timestamp_change(value)?,
            _ => delta.end = timestamp_change(value)?,
        }
    }

    Ok(Action::Update { index, delta })
}

fn timestamp_change(value: &str) -> Result<FieldChange<time::OffsetDateTime>, AppError> {
    if value.trim().eq_ignore_ascii_case(CLEAR_VALUE) {
        Ok(FieldChange::Remove)
    } else {
        parse_timestamp(value).map(FieldChange::Update)
    }
}

fn parse_relocate(args: &[&str]) -> Result<Action, AppError> {
    match args {
        [] => Err(AppError::invalid_input(
            "Please indicate a new storage location.",
        )),
        [path] if path.trim().is_empty() => Err(AppError::invalid_input(
            "Please indicate a new storage location.",
        )),
        [path] => Ok(Action::Relocate {
            path: PathBuf::from(path.trim()),
        }),
        _ => Err(AppError::invalid_input(
            "Please indicate only one storage location.",
        )),
    }
}

fn parse_help(args: &[&str]) -> Result<Action, AppError> {
    match args {
        [] => Ok(Action::Help { topic: None }),
        [topic] => Ok(Action::Help {
            topic: Some(topic.to_lowercase()),
        }),
        _ => Err(AppError::invalid_input(
            "Please indicate only one help topic.",
        )),
    }
}

fn no_arguments(args: &[&str], name: &str) -> Result<(), AppError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!(
            "{name} does not take any arguments."
        )))
    }
}
