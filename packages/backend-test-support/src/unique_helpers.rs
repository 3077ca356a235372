//! Unique fixture names so tests sharing a hub never collide.

use uuid::Uuid;

/// `{prefix}-{uuid}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("table");
/// assert_ne!(a, unique_str("table"));
/// assert!(a.starts_with("table-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// `count` distinct player ids sharing `prefix`, in seat order.
pub fn unique_players(prefix: &str, count: usize) -> Vec<String> {
    let run = Uuid::new_v4().simple().to_string();
    (1..=count).map(|i| format!("{prefix}{i}-{}", &run[..8])).collect()
}
