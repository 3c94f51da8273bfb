use std::{fmt::Display, path::PathBuf};

use clap::{Parser, Subcommand};
use colored::*;
use jiff::{Zoned, tz::TimeZone};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    config::{Config, init_logging},
    models::{
        assignment::{AssignmentDraft, AssignmentPatch, Priority},
        class_slot::ClassDraft,
        store::Store,
    },
    queries::{CompletionFilter, SortKey, due_this_week, filter_by_completion, sort_assignments},
    schedule::{daily_overview, slot_at, timetable},
    services::{
        Mutation, Signal,
        assignments::{create_assignment, delete_assignment, set_progress, update_assignment},
        classes::{create_class, delete_class},
    },
    storage::{Storage, json::JsonFileStorage},
};

mod config;
mod input;
mod models;
mod queries;
mod schedule;
mod services;
mod storage;
mod ui;

#[derive(Parser)]
#[command(
    name = "studydash",
    about = "Assignments and weekly timetable for students, in your terminal"
)]
struct Cli {
    /// Path to the store file (defaults to $STUDYDASH_STORE, then the data dir)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's classes and assignments due within three days
    Today,

    /// Show this week's deadlines
    Week,

    /// List assignments
    List {
        /// Which assignments to show
        #[arg(short, long, value_enum, default_value_t = CompletionFilter::All)]
        filter: CompletionFilter,

        /// Sort order
        #[arg(short, long, value_enum, default_value_t = SortKey::DueDate)]
        sort: SortKey,
    },

    /// Add a new assignment
    Add {
        /// Assignment title
        title: String,

        /// Due date (e.g., "2026-03-01" or "2026-03-01T17:00")
        #[arg(short, long)]
        due: String,

        #[arg(short, long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,

        /// Course label (e.g., "CS101")
        #[arg(short, long)]
        course: Option<String>,

        /// Assignment details
        #[arg(short = 'D', long, default_value = "")]
        description: String,

        /// Initial progress, 0 to 100
        #[arg(long)]
        progress: Option<String>,
    },

    /// Edit an assignment
    Edit {
        /// Assignment number
        number: u64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        due: Option<String>,

        #[arg(short, long, value_enum)]
        priority: Option<Priority>,

        #[arg(short, long, conflicts_with = "clear_course")]
        course: Option<String>,

        /// Remove the course label
        #[arg(long)]
        clear_course: bool,

        #[arg(short = 'D', long)]
        description: Option<String>,

        /// Progress, 0 to 100
        #[arg(long)]
        progress: Option<String>,
    },

    /// Update the progress of an assignment
    Progress {
        /// Assignment number
        number: u64,

        /// Progress, 0 to 100
        value: String,
    },

    /// Delete an assignment
    Delete {
        /// Assignment number
        number: u64,
    },

    /// Manage the weekly timetable
    #[command(subcommand)]
    Class(ClassCommands),
}

#[derive(Debug, Subcommand)]
enum ClassCommands {
    /// Add a class to the timetable
    Add {
        /// Day of the week (e.g., "Monday" or "mon")
        day: String,

        /// Start time, HH:MM
        start: String,

        subject: String,

        /// End time, HH:MM (defaults to one hour after start)
        #[arg(short, long)]
        end: Option<String>,

        #[arg(short, long)]
        professor: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a class by id (e.g., "Monday-09:00")
    Delete { id: String },
    /// Show the whole week
    List,
    /// Show which class occupies a given day and time
    At { day: String, time: String },
}

fn fail(message: impl Display) -> ! {
    trace_failure(&message);
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

/// Log copy of a failure already printed to stderr, visible with -vv
fn trace_failure(message: &dyn Display) {
    debug!("command failed: {}", message);
}

fn dispatch<T>(mutation: &Mutation<T>) {
    for signal in &mutation.signals {
        info!(entity = %signal.entity_id(), "{}", signal.title());
        ui::render_signal(signal);
    }
}

fn save(storage: &impl Storage, store: &Store) {
    if let Err(e) = storage.save(store) {
        fail(format!("Failed to save store: {}", e));
    }
}

fn resolve_assignment(store: &Store, number: u64) -> Uuid {
    match store.get_assignment_by_number(number) {
        Some(assignment) => assignment.id,
        None => {
            debug!(number, "assignment not found");
            eprintln!("Error: Assignment #{} not found", number);
            if !store.assignments.is_empty() {
                eprintln!("\nAvailable assignments:");
                for assignment in &store.assignments {
                    eprintln!("  #{} {}", assignment.number, assignment.title);
                }
            }
            std::process::exit(1);
        }
    }
}

fn parse_or_fail<T, E: Display>(result: Result<T, E>) -> T {
    result.unwrap_or_else(|e| fail(e))
}

fn main() {
    let cli = Cli::parse();

    let config = parse_or_fail(Config::load(cli.store, cli.verbose));
    if let Err(e) = init_logging(config.log_level) {
        eprintln!("Warning: {}", e);
    }
    parse_or_fail(config.ensure_data_dir());

    let storage = JsonFileStorage::new(config.store_path.clone());
    let mut store = match storage.load() {
        Ok(store) => store,
        Err(e) => fail(format!("Failed to load store: {}", e)),
    };

    let tz = TimeZone::system();
    let now = Zoned::now();

    match cli.command {
        Some(Commands::Today) | None => {
            let overview = daily_overview(&store, &now);

            println!(
                "\n  {} {}",
                "Today's Overview".cyan().bold(),
                format!("{}, {}", overview.weekday, now.strftime("%b %d")).dimmed()
            );

            ui::render_section_header("Today's Classes");
            if overview.classes.is_empty() {
                println!("  No classes today");
            } else {
                for class in overview.classes {
                    ui::render_class_line(class);
                }
            }

            ui::render_section_header("Upcoming Assignments");
            if overview.due_soon.is_empty() {
                println!("  No upcoming assignments");
            } else {
                for assignment in overview.due_soon {
                    ui::render_assignment_summary(assignment, &tz);
                }
            }
            println!();
        }
        Some(Commands::Week) => {
            let deadlines = due_this_week(&store.assignments, now.timestamp());

            if deadlines.is_empty() {
                println!("No deadlines this week");
            } else {
                ui::render_view_header(
                    "This Week's Deadlines",
                    deadlines.len(),
                    "assignment",
                    "assignments",
                );
                for assignment in deadlines {
                    ui::render_assignment_summary(assignment, &tz);
                }
                println!();
            }
        }
        Some(Commands::List { filter, sort }) => {
            let listed = sort_assignments(filter_by_completion(&store.assignments, filter), sort);

            if listed.is_empty() {
                println!("No assignments found. Add your first assignment!");
            } else {
                ui::render_view_header(
                    "Assignments",
                    listed.len(),
                    "assignment",
                    "assignments",
                );
                for assignment in listed {
                    ui::render_assignment_line(assignment, now.timestamp());
                }
                println!();
            }
        }
        Some(Commands::Add {
            title,
            due,
            priority,
            course,
            description,
            progress,
        }) => {
            let draft = AssignmentDraft {
                title,
                description,
                due_date: parse_or_fail(input::parse_due_date(&due, &tz)),
                priority,
                progress: progress.map(|raw| parse_or_fail(input::parse_progress(&raw))),
                course,
            };

            match create_assignment(&mut store, draft) {
                Ok(mutation) => {
                    save(&storage, &store);
                    dispatch(&mutation);
                    println!("  #{}", mutation.value.number);
                }
                Err(e) => fail(e),
            }
        }
        Some(Commands::Edit {
            number,
            title,
            due,
            priority,
            course,
            clear_course,
            description,
            progress,
        }) => {
            let id = resolve_assignment(&store, number);

            let patch = AssignmentPatch {
                title,
                description,
                due_date: due.map(|raw| parse_or_fail(input::parse_due_date(&raw, &tz))),
                priority,
                progress: progress.map(|raw| parse_or_fail(input::parse_progress(&raw))),
                course: if clear_course { Some(None) } else { course.map(Some) },
            };
            if patch.is_empty() {
                fail("Nothing to change. Pass at least one field to edit.");
            }

            match update_assignment(&mut store, id, patch) {
                Ok(mutation) => {
                    save(&storage, &store);
                    dispatch(&mutation);
                }
                Err(e) => fail(e),
            }
        }
        Some(Commands::Progress { number, value }) => {
            let id = resolve_assignment(&store, number);
            let value = parse_or_fail(input::parse_progress(&value));

            match set_progress(&mut store, id, value) {
                Ok(mutation) => {
                    save(&storage, &store);
                    // Plain progress changes only announce completion
                    let completed: Vec<Signal> = mutation
                        .signals
                        .iter()
                        .filter(|s| matches!(s, Signal::AssignmentCompleted { .. }))
                        .cloned()
                        .collect();
                    if completed.is_empty() {
                        println!(
                            "✓ {} is now {}% complete",
                            mutation.value.title, mutation.value.progress
                        );
                    } else {
                        dispatch(&Mutation {
                            value: (),
                            signals: completed,
                        });
                    }
                }
                Err(e) => fail(e),
            }
        }
        Some(Commands::Delete { number }) => {
            let id = resolve_assignment(&store, number);

            match delete_assignment(&mut store, id) {
                Ok(mutation) => {
                    save(&storage, &store);
                    dispatch(&mutation);
                }
                Err(e) => fail(e),
            }
        }
        Some(Commands::Class(ClassCommands::Add {
            day,
            start,
            subject,
            end,
            professor,
            location,
            color,
        })) => {
            let day = parse_or_fail(input::parse_weekday(&day));
            let start = parse_or_fail(input::parse_clock_time(&start));
            let draft = ClassDraft {
                subject,
                end_time: end.map(|raw| parse_or_fail(input::parse_clock_time(&raw))),
                professor,
                location,
                color,
            };

            match create_class(&mut store, day, start, draft) {
                Ok(mutation) => {
                    save(&storage, &store);
                    dispatch(&mutation);
                    println!("  id: {}", mutation.value.id);
                }
                Err(e) => fail(e),
            }
        }
        Some(Commands::Class(ClassCommands::Delete { id })) => {
            match delete_class(&mut store, &id) {
                Ok(mutation) => {
                    save(&storage, &store);
                    dispatch(&mutation);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    if !store.classes.is_empty() {
                        eprintln!("\nAvailable classes:");
                        for class in &store.classes {
                            eprintln!("  - {} ({})", class.id, class.subject);
                        }
                    }
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Class(ClassCommands::List)) => {
            if store.classes.is_empty() {
                println!("Your timetable is empty");
            } else {
                ui::render_view_header("Timetable", store.classes.len(), "class", "classes");
                for (day, classes) in timetable(&store.classes) {
                    if classes.is_empty() {
                        continue;
                    }
                    ui::render_section_header(day.name());
                    for class in classes {
                        ui::render_class_line(class);
                    }
                }
                println!();
            }
        }
        Some(Commands::Class(ClassCommands::At { day, time })) => {
            let day = parse_or_fail(input::parse_weekday(&day));
            let time = parse_or_fail(input::parse_clock_time(&time));

            match slot_at(&store.classes, day, time) {
                Some(class) => ui::render_class_line(class),
                None => println!("Free on {} at {}", day, time),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logged_at(level: Level, message: &str) -> String {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || trace_failure(&message));

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_failure_is_not_logged_at_default_level() {
        assert_eq!(logged_at(Level::WARN, "Assignment #7 not found"), "");
    }

    #[test]
    fn test_failure_is_logged_when_very_verbose() {
        let output = logged_at(Level::DEBUG, "Assignment #7 not found");
        assert!(output.contains("Assignment #7 not found"));
    }
}
