use jiff::Zoned;

use crate::{
    models::{
        assignment::Assignment,
        class_slot::{CLASS_ID_DELIMITER, ClassSlot, ClockTime, Weekday},
        store::Store,
    },
    queries::due_soon,
};

/// Class occupying `time` on `day`. Overlapping data resolves to the first
/// match in iteration order.
pub fn slot_at(classes: &[ClassSlot], day: Weekday, time: ClockTime) -> Option<&ClassSlot> {
    classes
        .iter()
        .find(|c| c.weekday == day && c.occupies(time))
}

/// Classes on the weekday of `now`, earliest first
pub fn todays_classes<'a>(classes: &'a [ClassSlot], now: &Zoned) -> Vec<&'a ClassSlot> {
    let today = Weekday::from(now.weekday());
    let mut todays: Vec<&ClassSlot> = classes.iter().filter(|c| c.weekday == today).collect();
    todays.sort_by_key(|c| c.start_time);
    todays
}

/// Recovers the weekday from a "{Weekday}-{HH:MM}" class id. Returns `None`
/// when the id has no delimiter or the leading token is not a day name.
pub fn derive_weekday(class_id: &str) -> Option<Weekday> {
    let (day, _) = class_id.split_once(CLASS_ID_DELIMITER)?;
    day.parse().ok()
}

/// Every weekday with its classes, Monday first, each day sorted by start
pub fn timetable(classes: &[ClassSlot]) -> Vec<(Weekday, Vec<&ClassSlot>)> {
    Weekday::ALL
        .into_iter()
        .map(|day| {
            let mut on_day: Vec<&ClassSlot> = classes.iter().filter(|c| c.weekday == day).collect();
            on_day.sort_by_key(|c| c.start_time);
            (day, on_day)
        })
        .collect()
}

/// Today's classes alongside the assignments that need attention
pub struct DailyOverview<'a> {
    pub weekday: Weekday,
    pub classes: Vec<&'a ClassSlot>,
    pub due_soon: Vec<&'a Assignment>,
}

pub fn daily_overview<'a>(store: &'a Store, now: &Zoned) -> DailyOverview<'a> {
    DailyOverview {
        weekday: Weekday::from(now.weekday()),
        classes: todays_classes(&store.classes, now),
        due_soon: due_soon(&store.assignments, now.timestamp()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::class_slot::class_id;

    fn time(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn class(day: Weekday, start: &str, end: &str, subject: &str) -> ClassSlot {
        ClassSlot {
            id: class_id(day, time(start)),
            weekday: day,
            subject: subject.to_string(),
            start_time: time(start),
            end_time: time(end),
            professor: None,
            location: None,
            color: None,
        }
    }

    fn subjects(classes: &[&ClassSlot]) -> Vec<String> {
        classes.iter().map(|c| c.subject.clone()).collect()
    }

    #[test]
    fn test_slot_at_finds_containing_class() {
        let classes = vec![
            class(Weekday::Monday, "09:00", "10:00", "Maths"),
            class(Weekday::Tuesday, "09:00", "11:00", "Physics"),
        ];

        let found = slot_at(&classes, Weekday::Monday, time("09:30"));
        assert_eq!(found.map(|c| c.subject.as_str()), Some("Maths"));

        assert!(slot_at(&classes, Weekday::Monday, time("10:00")).is_none());
        assert!(slot_at(&classes, Weekday::Wednesday, time("09:30")).is_none());
    }

    #[test]
    fn test_slot_at_prefers_first_on_overlap() {
        let classes = vec![
            class(Weekday::Friday, "13:00", "15:00", "First"),
            class(Weekday::Friday, "14:00", "16:00", "Second"),
        ];

        let found = slot_at(&classes, Weekday::Friday, time("14:30"));
        assert_eq!(found.map(|c| c.subject.as_str()), Some("First"));
    }

    #[test]
    fn test_todays_classes_sorted_by_start() {
        let classes = vec![
            class(Weekday::Monday, "14:00", "15:00", "Afternoon"),
            class(Weekday::Tuesday, "08:00", "09:00", "Other day"),
            class(Weekday::Monday, "08:00", "09:00", "Morning"),
        ];
        // 2026-03-02 is a Monday
        let now: Zoned = "2026-03-02T12:00:00[UTC]".parse().unwrap();

        let today = todays_classes(&classes, &now);
        assert_eq!(subjects(&today), vec!["Morning", "Afternoon"]);
    }

    #[test]
    fn test_derive_weekday() {
        assert_eq!(derive_weekday("Monday-09:00"), Some(Weekday::Monday));
        assert_eq!(derive_weekday("Sunday-18:30"), Some(Weekday::Sunday));
        assert_eq!(derive_weekday("Monday"), None);
        assert_eq!(derive_weekday("abc1234"), None);
        assert_eq!(derive_weekday("Someday-09:00"), None);
    }

    #[test]
    fn test_timetable_groups_by_day() {
        let classes = vec![
            class(Weekday::Wednesday, "11:00", "12:00", "Late"),
            class(Weekday::Wednesday, "09:00", "10:00", "Early"),
        ];

        let grouped = timetable(&classes);
        assert_eq!(grouped.len(), 7);
        assert_eq!(grouped[0].0, Weekday::Monday);
        assert!(grouped[0].1.is_empty());
        assert_eq!(subjects(&grouped[2].1), vec!["Early", "Late"]);
    }

    #[test]
    fn test_daily_overview_combines_classes_and_assignments() {
        use crate::models::assignment::Priority;

        let now: Zoned = "2026-03-02T12:00:00[UTC]".parse().unwrap();
        let mut store = Store::default();
        store.add_class(class(Weekday::Monday, "10:00", "11:00", "Maths"));
        store.add_assignment(Assignment {
            id: uuid::Uuid::new_v4(),
            number: 0,
            title: "Problem set".to_string(),
            description: String::new(),
            due_date: "2026-03-03T09:00:00Z".parse().unwrap(),
            priority: Priority::High,
            progress: 20,
            course: Some("MATH101".to_string()),
        });

        let overview = daily_overview(&store, &now);
        assert_eq!(overview.weekday, Weekday::Monday);
        assert_eq!(subjects(&overview.classes), vec!["Maths"]);
        assert_eq!(overview.due_soon.len(), 1);
    }
}
