const TOPICS: &[(&[&str], &str)] = &[
    (
        &["add"],
        "add \"<name>\"\n    Adds a task. Quote names that contain spaces.",
    ),
    (
        &["remove"],
        "remove <number> | remove \"<name>\"\n    Removes a task by its number in the last list or by its exact name.",
    ),
    (
        &["list"],
        "list [keyword...]\n    Lists uncompleted tasks, or every task whose name contains all keywords.",
    ),
    (
        &["done"],
        "done <number>\n    Marks a listed task completed, or uncompleted if it already was.",
    ),
    (
        &["update"],
        "update <number> <field> <value> [<field> <value>...]\n    Changes name, start or end of a listed task. Use none to clear start or end.\n    Dates: YYYY-MM-DD, YYYY-MM-DD HH:MM or RFC 3339.",
    ),
    (
        &["undo"],
        "undo\n    Reverts the most recent add, remove, update, done, reformat or relocate.",
    ),
    (
        &["relocate", "move"],
        "relocate \"<directory>\"\n    Moves the task file into an existing directory.",
    ),
    (
        &["reformat", "clear"],
        "reformat\n    Deletes every task. Can be undone.",
    ),
    (&["help"], "help [command]\n    Shows help for all commands or one."),
    (&["exit", "quit"], "exit\n    Closes the task file and quits."),
];

/// Help for every command, or only for `topic` when it names one.
pub fn help_text(topic: Option<&str>) -> String {
    match topic {
        None => general_help(),
        Some(topic) => match TOPICS.iter().find(|(names, _)| names.contains(&topic)) {
            Some((_, text)) => (*text).to_string(),
            None => format!("No help available for \"{topic}\".\n\n{}", general_help()),
        },
    }
}

fn general_help() -> String {
    let mut text = String::from("Usage: <command> [arguments]\n\nCommands:");
    for (_, entry) in TOPICS {
        text.push_str("\n  ");
        text.push_str(&entry.replace('\n', "\n  "));
    }
    text
}
