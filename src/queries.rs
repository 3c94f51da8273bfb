//! Pure, stateless derivations over assignment collections.
//!
//! Nothing in here mutates its input: every function borrows the
//! assignments and hands back a freshly ordered `Vec` of references.

use jiff::{SignedDuration, Timestamp};

use crate::models::assignment::Assignment;

const MS_PER_DAY: i128 = 86_400_000;

/// Window used by the "today's overview" view
pub const DUE_SOON_DAYS: i64 = 3;

/// Window used by the "this week's deadlines" view
pub const THIS_WEEK_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CompletionFilter {
    #[default]
    All,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    #[default]
    DueDate,
    Priority,
    Progress,
}

pub fn filter_by_completion(
    assignments: &[Assignment],
    mode: CompletionFilter,
) -> Vec<&Assignment> {
    assignments
        .iter()
        .filter(|a| match mode {
            CompletionFilter::All => true,
            CompletionFilter::InProgress => !a.is_completed(),
            CompletionFilter::Completed => a.is_completed(),
        })
        .collect()
}

/// Stable sort: assignments with equal keys keep their incoming order.
pub fn sort_assignments<'a>(
    assignments: impl IntoIterator<Item = &'a Assignment>,
    key: SortKey,
) -> Vec<&'a Assignment> {
    let mut sorted: Vec<&Assignment> = assignments.into_iter().collect();
    match key {
        SortKey::DueDate => sorted.sort_by_key(|a| a.due_date),
        SortKey::Priority => sorted.sort_by_key(|a| a.priority.rank()),
        SortKey::Progress => sorted.sort_by(|a, b| b.progress.cmp(&a.progress)),
    }
    sorted
}

/// Whole days between two instants, rounded up, regardless of direction
pub fn day_distance(from: Timestamp, to: Timestamp) -> i64 {
    let millis = to.duration_since(from).abs().as_millis();
    ((millis + MS_PER_DAY - 1) / MS_PER_DAY) as i64
}

/// Keeps assignments whose due date is at most `max_days` away from
/// `reference`, in either direction.
pub fn window_filter<'a>(
    assignments: impl IntoIterator<Item = &'a Assignment>,
    reference: Timestamp,
    max_days: i64,
    exclude_completed: bool,
) -> Vec<&'a Assignment> {
    assignments
        .into_iter()
        .filter(|a| !(exclude_completed && a.is_completed()))
        .filter(|a| day_distance(reference, a.due_date) <= max_days)
        .collect()
}

/// Unfinished assignments due within three days of `now` (past or future),
/// soonest first.
pub fn due_soon(assignments: &[Assignment], now: Timestamp) -> Vec<&Assignment> {
    sort_assignments(
        window_filter(assignments, now, DUE_SOON_DAYS, true),
        SortKey::DueDate,
    )
}

/// Unfinished assignments with `now <= due_date <= now + 7 days`, soonest
/// first. Overdue work is not included, unlike [`due_soon`].
pub fn due_this_week(assignments: &[Assignment], now: Timestamp) -> Vec<&Assignment> {
    let week = SignedDuration::from_hours(THIS_WEEK_DAYS * 24);
    let Ok(horizon) = now.checked_add(week) else {
        return vec![];
    };

    sort_assignments(
        assignments
            .iter()
            .filter(|a| !a.is_completed())
            .filter(|a| a.due_date >= now && a.due_date <= horizon),
        SortKey::DueDate,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct DueLabel {
    /// e.g. "in 2 days" or "3 days ago"
    pub text: String,
    pub is_overdue: bool,
}

pub fn relative_due_label(due_date: Timestamp, now: Timestamp) -> DueLabel {
    let delta = due_date.duration_since(now);
    let distance = describe_distance(delta.abs());

    let text = if delta.is_negative() {
        format!("{} ago", distance)
    } else {
        format!("in {}", distance)
    };

    DueLabel {
        text,
        is_overdue: now > due_date,
    }
}

const MINUTES_PER_DAY: i64 = 1_440;
const MINUTES_PER_MONTH: i64 = 43_200;

fn describe_distance(distance: SignedDuration) -> String {
    let seconds = distance.as_secs();
    let minutes = (seconds + 30) / 60;

    match minutes {
        0 => "less than a minute".to_string(),
        1 => "1 minute".to_string(),
        m if m < 45 => format!("{} minutes", m),
        m if m < 90 => "about 1 hour".to_string(),
        m if m < MINUTES_PER_DAY => format!("about {} hours", rounded_div(m, 60)),
        m if m < 2_520 => "1 day".to_string(),
        m if m < 30 * MINUTES_PER_DAY => format!("{} days", rounded_div(m, MINUTES_PER_DAY)),
        m if m < 2 * MINUTES_PER_MONTH => {
            let months = rounded_div(m, MINUTES_PER_MONTH);
            format!("about {} {}", months, plural(months, "month"))
        }
        m if m < 365 * MINUTES_PER_DAY => {
            format!("{} months", rounded_div(m, MINUTES_PER_MONTH))
        }
        m => {
            let months = m / MINUTES_PER_MONTH;
            let years = months / 12;
            match months % 12 {
                r if r < 3 => format!("about {} {}", years, plural(years, "year")),
                r if r < 9 => format!("over {} {}", years, plural(years, "year")),
                _ => format!("almost {} years", years + 1),
            }
        }
    }
}

fn rounded_div(value: i64, divisor: i64) -> i64 {
    (value + divisor / 2) / divisor
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        unit.to_string()
    } else {
        format!("{}s", unit)
    }
}
