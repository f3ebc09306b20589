use crate::command::{Action, Outcome, RemoveTarget};
use crate::error::{AppError, LifecycleError};
use crate::help::help_text;
use crate::model::Task;
use crate::render::task_table;
use crate::search::search;
use crate::session::Session;
use crate::storage::ensure_directory;
use std::path::Path;

pub(super) fn execute(action: &Action, session: &mut Session) -> Result<Outcome, AppError> {
    match action {
        Action::Add { task } => {
            session.store_mut().write_task(task)?;
            Ok(Outcome::Added(task.clone()))
        }
        Action::Remove { target } => {
            let task = match target {
                RemoveTarget::Index(index) => resolve_index(session.last_shown(), *index)?,
                RemoveTarget::Name(name) => find_by_name(session, name)?,
            };
            session.store_mut().remove_task(&task)?;
            Ok(Outcome::Removed(task))
        }
        Action::Update { index, delta } => {
            let old = resolve_index(session.last_shown(), *index)?;
            let new = delta.apply(&old)?;
            session.store_mut().update_task(&old, &new)?;
            session.replace_shown(&old, &new);
            Ok(Outcome::Updated { old, new })
        }
        Action::Done { index } => {
            let old = resolve_index(session.last_shown(), *index)?;
            let new = old.toggled();
            // Not atomic: a failure after the remove loses the task.
            session.store_mut().remove_task(&old)?;
            session.store_mut().write_task(&new)?;
            session.replace_shown(&old, &new);
            Ok(Outcome::Toggled { old, new })
        }
        Action::List { keywords } => {
            let all = session.store().read_all_tasks()?;
            let shown = if keywords.is_empty() {
                all.into_iter().filter(|task| !task.done).collect()
            } else {
                search(&all, keywords.as_slice())
            };
            let table = task_table(&shown)?;
            session.set_last_shown(shown);
            Ok(Outcome::Listed(table))
        }
        Action::Undo => {
            let undone = session.undo_last()?;
            Ok(Outcome::Undid(undone.undo_message()?))
        }
        Action::Clear => {
            let snapshot = session.store().read_all_tasks()?;
            session.store_mut().clear_all_tasks()?;
            Ok(Outcome::Cleared(snapshot))
        }
        Action::Relocate { path } => {
            let previous = session.store().location();
            relocate(session, path)?;
            Ok(Outcome::Relocated {
                previous,
                current: session.store().location(),
            })
        }
        Action::Help { topic } => Ok(Outcome::Helped(help_text(topic.as_deref()))),
        Action::Exit => {
            session.finish()?;
            Ok(Outcome::Exited)
        }
        Action::Invalid { keyword } => Err(AppError::UnknownCommand(keyword.clone())),
    }
}

pub(super) fn undo(outcome: &Outcome, session: &mut Session) -> Result<(), AppError> {
    match outcome {
        Outcome::Added(task) => session.store_mut().remove_task(task),
        Outcome::Removed(task) => session.store_mut().write_task(task),
        Outcome::Updated { old, new } => {
            session.store_mut().update_task(new, old)?;
            session.replace_shown(new, old);
            Ok(())
        }
        Outcome::Toggled { old, new } => {
            session.store_mut().remove_task(new)?;
            session.store_mut().write_task(old)?;
            session.replace_shown(new, old);
            Ok(())
        }
        Outcome::Cleared(snapshot) => {
            for task in snapshot {
                session.store_mut().write_task(task)?;
            }
            Ok(())
        }
        Outcome::Relocated { previous, .. } => relocate(session, previous),
        Outcome::Listed(_) | Outcome::Undid(_) | Outcome::Helped(_) | Outcome::Exited => {
            Err(LifecycleError::NotUndoable.into())
        }
    }
}

pub(super) fn success_message(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Added(task) => format!("\"{}\" was added.", task.name),
        Outcome::Removed(task) => format!("\"{}\" was removed.", task.name),
        Outcome::Updated { old, new } => {
            format!("\"{}\" was updated to \"{}\".", old.name, new.name)
        }
        Outcome::Toggled { new, .. } => completion_message(new),
        Outcome::Listed(table) => table.clone(),
        Outcome::Undid(message) => message.clone(),
        Outcome::Cleared(_) => "All tasks were cleared.".to_string(),
        Outcome::Relocated { current, .. } => {
            format!("Storage moved to {}.", current.display())
        }
        Outcome::Helped(text) => text.clone(),
        Outcome::Exited => "Goodbye.".to_string(),
    }
}

pub(super) fn undo_message(outcome: &Outcome) -> Option<String> {
    let message = match outcome {
        Outcome::Added(task) => format!("\"{}\" was removed.", task.name),
        Outcome::Removed(task) => format!("\"{}\" was restored.", task.name),
        Outcome::Updated { old, new } => {
            format!("\"{}\" was reverted to \"{}\".", new.name, old.name)
        }
        Outcome::Toggled { old, .. } => completion_message(old),
        Outcome::Cleared(snapshot) => match snapshot.len() {
            1 => "Restored 1 task.".to_string(),
            count => format!("Restored {count} tasks."),
        },
        Outcome::Relocated { previous, .. } => {
            format!("Storage location restored to {}.", previous.display())
        }
        Outcome::Listed(_) | Outcome::Undid(_) | Outcome::Helped(_) | Outcome::Exited => {
            return None;
        }
    };
    Some(message)
}

fn completion_message(task: &Task) -> String {
    if task.done {
        format!("\"{}\" is now marked completed.", task.name)
    } else {
        format!("\"{}\" is now marked uncompleted.", task.name)
    }
}

/// Maps a 1-based display index onto the last listed tasks.
fn resolve_index(shown: &[Task], index: i64) -> Result<Task, AppError> {
    usize::try_from(index)
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|position| shown.get(position))
        .cloned()
        .ok_or(AppError::IndexInvalid { index })
}

fn find_by_name(session: &Session, name: &str) -> Result<Task, AppError> {
    session
        .store()
        .read_all_tasks()?
        .into_iter()
        .find(|task| task.name == name)
        .ok_or_else(|| AppError::task_not_found(name))
}

fn relocate(session: &mut Session, dir: &Path) -> Result<(), AppError> {
    ensure_directory(dir)?;
    session.store_mut().change_location(dir)
}
