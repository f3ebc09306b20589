use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskline-{nanos}-{file_name}"))
}

fn write_store(path: &Path, tasks: serde_json::Value) {
    let content = serde_json::json!({
        "schema_version": 1,
        "tasks": tasks
    });
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn read_store(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn run(store_path: &Path, config_path: &Path, args: &[&str]) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_taskline");
    Command::new(exe)
        .args(args)
        .env("TASKLINE_STORE_PATH", store_path)
        .env("TASKLINE_CONFIG_PATH", config_path)
        .env_remove("TASKLINE_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run taskline")
}

#[test]
fn add_command_persists_task() {
    let store_path = temp_path("once-add.json");
    let config_path = temp_path("once-add-config.json");

    let output = run(&store_path, &config_path, &["add", "Buy milk"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"Buy milk\" was added."));

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();
    assert_eq!(stored["schema_version"], 1);
    assert_eq!(stored["tasks"][0]["name"], "Buy milk");
    assert_eq!(stored["tasks"][0]["done"], false);
}

#[test]
fn add_without_name_fails_with_specific_message() {
    let store_path = temp_path("once-add-missing.json");
    let config_path = temp_path("once-add-missing-config.json");

    let output = run(&store_path, &config_path, &["add"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - Please indicate a task to add."));
    assert!(!store_path.exists());
}

#[test]
fn list_renders_table_and_filters_keywords() {
    let store_path = temp_path("once-list.json");
    let config_path = temp_path("once-list-config.json");
    write_store(
        &store_path,
        serde_json::json!([
            { "name": "apple", "start": null, "end": null, "done": false },
            { "name": "banana", "start": null, "end": "2026-10-20T12:00:00Z", "done": false },
            { "name": "apple banana", "start": null, "end": null, "done": true }
        ]),
    );

    let all = run(&store_path, &config_path, &["list"]);
    let filtered = run(&store_path, &config_path, &["list", "apple", "b"]);
    let none = run(&store_path, &config_path, &["list", "cherry"]);
    std::fs::remove_file(&store_path).ok();

    let all = String::from_utf8_lossy(&all.stdout);
    assert!(all.contains("Start"));
    assert!(all.contains("Name"));
    assert!(all.contains("apple"));
    assert!(all.contains("banana"));
    assert!(!all.contains("apple banana"));

    let filtered = String::from_utf8_lossy(&filtered.stdout);
    assert!(filtered.contains("apple banana (done)"));
    assert!(!filtered.lines().any(|line| line.trim_end().ends_with("| apple")));

    let none = String::from_utf8_lossy(&none.stdout);
    assert!(none.contains("No tasks to display."));
}

#[test]
fn remove_by_name_reports_missing_task() {
    let store_path = temp_path("once-remove.json");
    let config_path = temp_path("once-remove-config.json");
    write_store(
        &store_path,
        serde_json::json!([{ "name": "apple", "start": null, "end": null, "done": false }]),
    );

    let missing = run(&store_path, &config_path, &["remove", "pear"]);
    let removed = run(&store_path, &config_path, &["remove", "apple"]);
    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(!missing.status.success());
    let stderr = String::from_utf8_lossy(&missing.stderr);
    assert!(stderr.contains("ERROR: task_not_found - \"pear\" could not be found."));

    assert!(removed.status.success());
    assert!(stored["tasks"].as_array().unwrap().is_empty());
}

#[test]
fn relocate_moves_store_and_records_directory() {
    let source_dir = temp_path("once-relocate-src");
    let target_dir = temp_path("once-relocate-dir");
    let config_path = temp_path("once-relocate-config.json");
    std::fs::create_dir_all(&source_dir).unwrap();
    std::fs::create_dir_all(&target_dir).unwrap();
    let config = serde_json::json!({ "store_dir": source_dir.to_string_lossy() });
    std::fs::write(&config_path, config.to_string()).unwrap();
    write_store(
        &source_dir.join("tasks.json"),
        serde_json::json!([{ "name": "apple", "start": null, "end": null, "done": false }]),
    );

    let target = target_dir.to_string_lossy().to_string();
    let output = Command::new(env!("CARGO_BIN_EXE_taskline"))
        .args(["relocate", &target])
        .env_remove("TASKLINE_STORE_PATH")
        .env("TASKLINE_CONFIG_PATH", &config_path)
        .env_remove("TASKLINE_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run taskline");

    assert!(output.status.success());
    assert!(!source_dir.join("tasks.json").exists());
    assert_eq!(read_store(&target_dir.join("tasks.json"))["tasks"][0]["name"], "apple");

    let config = read_store(&config_path);
    std::fs::remove_file(&config_path).ok();
    std::fs::remove_dir_all(&source_dir).ok();
    std::fs::remove_dir_all(&target_dir).ok();
    assert_eq!(config["store_dir"], target.as_str());
}

#[test]
fn relocate_with_store_override_leaves_config_alone() {
    let store_path = temp_path("once-relocate-override.json");
    let config_path = temp_path("once-relocate-override-config.json");
    let target_dir = temp_path("once-relocate-override-dir");
    std::fs::create_dir_all(&target_dir).unwrap();
    write_store(
        &store_path,
        serde_json::json!([{ "name": "apple", "start": null, "end": null, "done": false }]),
    );

    let target = target_dir.to_string_lossy().to_string();
    let output = run(&store_path, &config_path, &["relocate", &target]);

    assert!(output.status.success());
    let moved = target_dir.join(store_path.file_name().unwrap());
    assert!(!store_path.exists());
    assert_eq!(read_store(&moved)["tasks"][0]["name"], "apple");
    std::fs::remove_dir_all(&target_dir).ok();
    assert!(!config_path.exists());
}

#[test]
fn relocate_into_directory_with_store_fails() {
    let store_path = temp_path("once-relocate-taken.json");
    let config_path = temp_path("once-relocate-taken-config.json");
    let target_dir = temp_path("once-relocate-taken-dir");
    std::fs::create_dir_all(&target_dir).unwrap();
    let occupied = target_dir.join(store_path.file_name().unwrap());
    write_store(
        &occupied,
        serde_json::json!([{ "name": "theirs", "start": null, "end": null, "done": false }]),
    );
    write_store(
        &store_path,
        serde_json::json!([{ "name": "mine", "start": null, "end": null, "done": false }]),
    );

    let target = target_dir.to_string_lossy().to_string();
    let output = run(&store_path, &config_path, &["relocate", &target]);

    let theirs = read_store(&occupied);
    let mine = read_store(&store_path);
    std::fs::remove_dir_all(&target_dir).ok();
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: store_exists"));
    assert_eq!(theirs["tasks"][0]["name"], "theirs");
    assert_eq!(mine["tasks"][0]["name"], "mine");
}

#[test]
fn relocate_to_missing_directory_fails() {
    let store_path = temp_path("once-relocate-missing.json");
    let config_path = temp_path("once-relocate-missing-config.json");

    let output = run(&store_path, &config_path, &["relocate", "/nonexistent/taskline"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_path"));
    assert!(!config_path.exists());
}

#[test]
fn config_alias_expands_first_word() {
    let store_path = temp_path("once-alias.json");
    let config_path = temp_path("once-alias-config.json");
    std::fs::write(&config_path, r#"{ "aliases": { "ls": "list" } }"#).unwrap();
    write_store(
        &store_path,
        serde_json::json!([{ "name": "apple", "start": null, "end": null, "done": false }]),
    );

    let output = run(&store_path, &config_path, &["ls"]);
    std::fs::remove_file(&store_path).ok();
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("apple"));
}

#[test]
fn invalid_config_warns_and_continues() {
    let store_path = temp_path("once-bad-config.json");
    let config_path = temp_path("once-bad-config-config.json");
    std::fs::write(&config_path, "{ not json").unwrap();

    let output = run(&store_path, &config_path, &["help", "add"]);
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WARNING: invalid_data"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("add \"<name>\""));
}

#[test]
fn corrupt_store_is_reported() {
    let store_path = temp_path("once-corrupt.json");
    let config_path = temp_path("once-corrupt-config.json");
    std::fs::write(&store_path, "[]").unwrap();

    let output = run(&store_path, &config_path, &["list"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_data"));
}
