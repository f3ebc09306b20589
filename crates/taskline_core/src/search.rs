use crate::model::Task;

/// Tasks whose name contains every keyword, in their original order.
/// Matching is a case-sensitive substring test, so an empty keyword list
/// matches everything.
pub fn search<S: AsRef<str>>(tasks: &[Task], keywords: &[S]) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| matches_all(&task.name, keywords))
        .cloned()
        .collect()
}

fn matches_all<S: AsRef<str>>(name: &str, keywords: &[S]) -> bool {
    keywords
        .iter()
        .all(|keyword| name.contains(keyword.as_ref()))
}
