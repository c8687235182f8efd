//! Due-date bucket labels for survey deadlines.

use chrono::{DateTime, Duration, Utc};

/// Classify `due` into a display bucket relative to `now`.
///
/// Buckets are evaluated in fixed order against calendar-date boundaries
/// computed from `now`, so time-of-day never changes bucket membership. The
/// one exception: the "Due in N days" count is the floor of the un-truncated
/// interval, so it can sit one below the bucket boundary (a deadline three
/// calendar days out that is less than 72 hours away reads "Due in 2 days").
/// Past deadlines have no label.
pub fn due_label(due: DateTime<Utc>, now: DateTime<Utc>) -> Option<String> {
  let today = now.date_naive();
  let target = due.date_naive();

  if target < today {
    return None;
  }
  if target == today {
    return Some("Due today".to_owned());
  }
  if target == today + Duration::days(1) {
    return Some("Due tomorrow".to_owned());
  }
  if target < (now + Duration::days(29)).date_naive() {
    let days = (due - now).num_days();
    return Some(format!("Due in {days} days"));
  }
  if target < (now + Duration::days(60)).date_naive() {
    return Some("Due in a month".to_owned());
  }
  if target < (now + Duration::days(90)).date_naive() {
    return Some("Due in 2 months".to_owned());
  }
  if target < (now + Duration::days(120)).date_naive() {
    return Some("Due in 3 months".to_owned());
  }
  Some("Due in over 3 months".to_owned())
}
