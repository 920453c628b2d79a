//! Count formatting for summaries.

/// `plural_count(1, "icon")` -> `"1 icon"`, `plural_count(3, "icon")` -> `"3 icons"`.
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}
