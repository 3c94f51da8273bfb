use colored::*;
use jiff::{Timestamp, tz::TimeZone};

use crate::{
    models::{
        assignment::{Assignment, Priority},
        class_slot::ClassSlot,
    },
    queries::relative_due_label,
    services::Signal,
};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Get the appropriate status glyph for an assignment
pub fn get_status_glyph(assignment: &Assignment, is_overdue: bool) -> ColoredString {
    if assignment.is_completed() {
        "✓".dimmed()
    } else if is_overdue {
        "●".red()
    } else {
        "○".normal()
    }
}

pub fn colored_priority(priority: Priority) -> ColoredString {
    let label = priority.to_string();
    match priority {
        Priority::High => label.red(),
        Priority::Medium => label.yellow(),
        Priority::Low => label.green(),
    }
}

/// Ten cell bar, e.g. "■■■■□□□□□□"
pub fn progress_bar(progress: u8) -> String {
    let filled = (progress as usize + 5) / 10;
    format!("{}{}", "■".repeat(filled), "□".repeat(10 - filled))
}

/// Prints `left` with `right` pushed to the terminal's right edge when it fits
fn print_aligned(styled_left: ColoredString, left_visible_len: usize, right: &str) {
    if right.is_empty() {
        println!("{}", styled_left);
        return;
    }

    let terminal_width = get_terminal_width();
    let total_content = left_visible_len + right.chars().count();

    if total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!("{}{}{}", styled_left, " ".repeat(padding), right.dimmed());
    } else {
        // Not enough space for right alignment
        println!("{}  {}", styled_left, right.dimmed());
    }
}

/// Render an assignment with number, glyph, title and right-aligned due info
pub fn render_assignment_line(assignment: &Assignment, now: Timestamp) {
    let label = relative_due_label(assignment.due_date, now);

    let number = format!("{:>3}", assignment.number);
    let glyph = get_status_glyph(assignment, label.is_overdue);
    let left = format!("  {}  {}  {}", number, glyph, assignment.title);
    let left_visible_len = format!("  {}     {}", number, assignment.title).chars().count();

    let styled_left = if assignment.is_completed() {
        left.dimmed()
    } else {
        left.bold()
    };

    let right = match &assignment.course {
        Some(course) => format!("{}  ·  due {}", course, label.text),
        None => format!("due {}", label.text),
    };

    print_aligned(styled_left, left_visible_len, &right);

    let due_note = if label.is_overdue && !assignment.is_completed() {
        "overdue".red().to_string()
    } else {
        String::new()
    };
    println!(
        "         {} {:>3}%  {}  {}",
        progress_bar(assignment.progress).dimmed(),
        assignment.progress,
        colored_priority(assignment.priority),
        due_note
    );
}

/// Compact variant used inside overviews: title, due date and progress
pub fn render_assignment_summary(assignment: &Assignment, tz: &TimeZone) {
    let priority_mark = match assignment.priority {
        Priority::High => "▌".red(),
        Priority::Medium => "▌".yellow(),
        Priority::Low => "▌".green(),
    };
    println!(
        "  {} {}  {}",
        priority_mark,
        assignment.title.bold(),
        format!(
            "Due: {}  ·  {}% complete",
            format_due_date(assignment.due_date, tz),
            assignment.progress
        )
        .dimmed()
    );
}

pub fn render_class_line(class: &ClassSlot) {
    let left = format!(
        "  {}-{}  {}",
        class.start_time, class.end_time, class.subject
    );
    let left_visible_len = left.chars().count();

    let right = [class.location.as_deref(), class.professor.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("  ·  ");

    print_aligned(left.bold(), left_visible_len, &right);
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize, singular: &str, plural: &str) {
    let word = if count == 1 { singular } else { plural };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, word);
}

/// Render a section header (e.g., "Today's Classes")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

pub fn render_signal(signal: &Signal) {
    let title = match signal {
        Signal::AssignmentCompleted { .. } => signal.title().green().bold(),
        _ => signal.title().green(),
    };
    println!("✓ {} {}", title, signal.description());
}

/// Format a due date as e.g. "Tue, Mar 03 17:00"
pub fn format_due_date(timestamp: Timestamp, tz: &TimeZone) -> String {
    timestamp
        .to_zoned(tz.clone())
        .strftime("%a, %b %d %H:%M")
        .to_string()
}
