//! Reduction of fetched lessons into the latest homework per subject.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::HomeworkError;
use crate::types::{Lesson, Task};

/// Homework kept for one subject: the tasks of its most recent lesson date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectHomework {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
}

/// Subject name → latest homework.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Homework {
    subjects: HashMap<String, SubjectHomework>,
}

impl Homework {
    /// Homework for a subject, if any lesson of it was seen.
    pub fn get(&self, subject: &str) -> Option<&SubjectHomework> {
        self.subjects.get(subject)
    }

    /// Number of subjects seen.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Iterate over subjects in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubjectHomework)> {
        self.subjects.iter().map(|(name, hw)| (name.as_str(), hw))
    }
}

/// Parse the calendar date of a journal timestamp (`DD.MM.YYYY HH:MM[:SS]`).
pub fn parse_lesson_date(value: &str) -> Option<NaiveDate> {
    let day = value.split_whitespace().next()?;
    NaiveDate::parse_from_str(day, "%d.%m.%Y").ok()
}

/// Reduce lessons to the tasks of the most recent date per subject.
///
/// Lessons are visited in input order. For a subject already seen, a later
/// date replaces the stored tasks, the same date appends to them and an
/// earlier date is dropped.
pub fn reduce(lessons: &[Lesson]) -> Result<Homework, HomeworkError> {
    let mut subjects: HashMap<String, SubjectHomework> = HashMap::new();

    for lesson in lessons {
        let date = parse_lesson_date(&lesson.datetime_from).ok_or_else(|| {
            HomeworkError::InvalidLessonDate {
                subject: lesson.subject_name.clone(),
                value: lesson.datetime_from.clone(),
            }
        })?;

        match subjects.entry(lesson.subject_name.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(SubjectHomework {
                    date,
                    tasks: lesson.tasks.clone(),
                });
            }
            Entry::Occupied(mut entry) => {
                let current = entry.get_mut();
                match date.cmp(&current.date) {
                    Ordering::Greater => {
                        current.date = date;
                        current.tasks = lesson.tasks.clone();
                    }
                    Ordering::Equal => current.tasks.extend(lesson.tasks.iter().cloned()),
                    Ordering::Less => {}
                }
            }
        }
    }

    Ok(Homework { subjects })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks_of<'a>(homework: &'a Homework, subject: &str) -> Vec<&'a str> {
        homework
            .get(subject)
            .unwrap()
            .tasks
            .iter()
            .filter_map(|t| t.task_name.as_deref())
            .collect()
    }

    #[test]
    fn test_later_date_replaces_tasks() {
        let lessons = vec![
            Lesson::new("Math", "01.03.2025 10:00", vec![Task::named("p.1-3")]),
            Lesson::new("Math", "03.03.2025 10:00", vec![Task::named("p.4")]),
        ];

        let homework = reduce(&lessons).unwrap();
        assert_eq!(homework.len(), 1);
        assert_eq!(homework.get("Math").unwrap().tasks, vec![Task::named("p.4")]);
        assert_eq!(
            homework.get("Math").unwrap().date,
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
        );
    }

    #[test]
    fn test_same_date_appends_in_input_order() {
        let lessons = vec![
            Lesson::new("Math", "03.03.2025 09:00:00", vec![Task::named("ex. 1")]),
            Lesson::new("Math", "03.03.2025 11:00:00", vec![Task::named("ex. 2")]),
        ];

        let homework = reduce(&lessons).unwrap();
        assert_eq!(tasks_of(&homework, "Math"), vec!["ex. 1", "ex. 2"]);
    }

    #[test]
    fn test_earlier_date_is_dropped() {
        let lessons = vec![
            Lesson::new("History", "05.03.2025 10:00:00", vec![Task::named("essay")]),
            Lesson::new("History", "02.03.2025 10:00:00", vec![Task::named("old")]),
        ];

        let homework = reduce(&lessons).unwrap();
        assert_eq!(tasks_of(&homework, "History"), vec!["essay"]);
    }

    #[test]
    fn test_later_lesson_without_tasks_clears_homework() {
        let lessons = vec![
            Lesson::new("Art", "01.03.2025 10:00:00", vec![Task::named("sketch")]),
            Lesson::new("Art", "08.03.2025 10:00:00", vec![]),
        ];

        let homework = reduce(&lessons).unwrap();
        assert!(homework.get("Art").unwrap().tasks.is_empty());
    }

    #[test]
    fn test_subjects_are_independent() {
        let lessons = vec![
            Lesson::new("Math", "03.03.2025 10:00:00", vec![Task::named("p.4")]),
            Lesson::new("Biology", "01.03.2025 10:00:00", vec![Task::named("cells")]),
            Lesson::new("Math", "02.03.2025 10:00:00", vec![Task::named("p.2")]),
        ];

        let homework = reduce(&lessons).unwrap();
        assert_eq!(tasks_of(&homework, "Math"), vec!["p.4"]);
        assert_eq!(tasks_of(&homework, "Biology"), vec!["cells"]);
    }

    #[test]
    fn test_reduce_is_idempotent() {
        let lessons = vec![
            Lesson::new("Math", "01.03.2025 10:00:00", vec![Task::named("a")]),
            Lesson::new("Math", "01.03.2025 12:00:00", vec![Task::named("b")]),
            Lesson::new("Art", "28.02.2025 12:00:00", vec![Task::named("c")]),
            Lesson::new("Math", "27.02.2025 12:00:00", vec![Task::named("d")]),
        ];

        assert_eq!(reduce(&lessons).unwrap(), reduce(&lessons).unwrap());
    }

    #[test]
    fn test_invalid_date_fails() {
        let lessons = vec![Lesson::new("Math", "2025-03-01T10:00:00", vec![])];

        let err = reduce(&lessons).unwrap_err();
        assert_eq!(
            err,
            HomeworkError::InvalidLessonDate {
                subject: "Math".to_string(),
                value: "2025-03-01T10:00:00".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_lesson_date() {
        assert_eq!(
            parse_lesson_date("31.12.2024 23:59:59"),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
        assert_eq!(
            parse_lesson_date("01.03.2025"),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
        assert_eq!(parse_lesson_date(""), None);
        assert_eq!(parse_lesson_date("32.01.2025 10:00"), None);
    }
}
