//! Fixture-backed journal.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use homework_core::{
    async_trait, parse_lesson_date, ChildProfile, EducationRef, JournalApi, JournalError, Lesson,
};
use tokio::sync::Mutex;

/// A request received by a [`StaticJournal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalCall {
    Lessons {
        education_id: i64,
        date_from: NaiveDate,
        date_to: NaiveDate,
        token: String,
    },
    Schedule {
        education_id: i64,
        date: NaiveDate,
    },
    File {
        uuid: String,
    },
    RelatedChildren {
        token: String,
    },
}

/// A journal serving fixed data.
///
/// Built once per test with the `with_*` methods. Every request is recorded
/// and can be inspected with [`StaticJournal::calls`].
///
/// Once any children are registered, lesson and timetable requests with a
/// token that was never registered are answered with `401`.
#[derive(Debug, Default)]
pub struct StaticJournal {
    lessons: HashMap<i64, Vec<Lesson>>,
    schedules: HashMap<(i64, NaiveDate), Vec<Lesson>>,
    files: HashMap<String, Vec<u8>>,
    children: HashMap<String, Vec<ChildProfile>>,
    failing_educations: HashSet<i64>,
    unreachable: bool,
    calls: Mutex<Vec<JournalCall>>,
}

impl StaticJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these lessons for an education. Lessons outside the requested
    /// range are filtered out by date; lessons with an unparseable date are
    /// always returned.
    pub fn with_lessons(mut self, education_id: i64, lessons: Vec<Lesson>) -> Self {
        self.lessons.entry(education_id).or_default().extend(lessons);
        self
    }

    /// Serve this timetable for an education on one day.
    pub fn with_schedule(mut self, education_id: i64, date: NaiveDate, lessons: Vec<Lesson>) -> Self {
        self.schedules.insert((education_id, date), lessons);
        self
    }

    /// Serve a file by uuid.
    pub fn with_file(mut self, uuid: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(uuid.into(), bytes.into());
        self
    }

    /// Accept a token, answering `related_children` with these children.
    pub fn with_children(mut self, token: impl Into<String>, children: Vec<ChildProfile>) -> Self {
        self.children.insert(token.into(), children);
        self
    }

    /// Answer every request about this education with `500`.
    pub fn with_failing_education(mut self, education_id: i64) -> Self {
        self.failing_educations.insert(education_id);
        self
    }

    /// Fail every request as if the journal could not be reached.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Requests received so far, in order.
    pub async fn calls(&self) -> Vec<JournalCall> {
        self.calls.lock().await.clone()
    }

    /// Number of timetable days requested so far.
    pub async fn schedule_requests(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| matches!(call, JournalCall::Schedule { .. }))
            .count()
    }

    async fn record(&self, call: JournalCall) {
        self.calls.lock().await.push(call);
    }

    fn check_reachable(&self) -> Result<(), JournalError> {
        if self.unreachable {
            Err(JournalError::Http("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    fn check_education(&self, education_id: i64, token: &str, endpoint: &str) -> Result<(), JournalError> {
        self.check_reachable()?;
        if self.failing_educations.contains(&education_id) {
            return Err(JournalError::Status {
                status: 500,
                endpoint: endpoint.to_string(),
            });
        }
        if !self.children.is_empty() && !self.children.contains_key(token) {
            return Err(JournalError::Status {
                status: 401,
                endpoint: endpoint.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl JournalApi for StaticJournal {
    async fn fetch_lessons(
        &self,
        education_id: i64,
        date_from: NaiveDate,
        date_to: NaiveDate,
        token: &str,
    ) -> Result<Vec<Lesson>, JournalError> {
        self.record(JournalCall::Lessons {
            education_id,
            date_from,
            date_to,
            token: token.to_string(),
        })
        .await;
        self.check_education(education_id, token, "journal/lesson/list-by-education")?;

        let lessons = self
            .lessons
            .get(&education_id)
            .map(|lessons| {
                lessons
                    .iter()
                    .filter(|lesson| match parse_lesson_date(&lesson.datetime_from) {
                        Some(date) => date >= date_from && date <= date_to,
                        None => true,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(lessons)
    }

    async fn fetch_schedule(
        &self,
        education_id: i64,
        date: NaiveDate,
        token: &str,
    ) -> Result<Vec<Lesson>, JournalError> {
        self.record(JournalCall::Schedule { education_id, date }).await;
        self.check_education(education_id, token, "journal/schedule/list-by-education")?;

        Ok(self
            .schedules
            .get(&(education_id, date))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_file(&self, uuid: &str) -> Result<Vec<u8>, JournalError> {
        self.record(JournalCall::File {
            uuid: uuid.to_string(),
        })
        .await;
        self.check_reachable()?;

        self.files.get(uuid).cloned().ok_or_else(|| JournalError::Status {
            status: 404,
            endpoint: "filekit/file/download".to_string(),
        })
    }

    async fn related_children(&self, token: &str) -> Result<Vec<ChildProfile>, JournalError> {
        self.record(JournalCall::RelatedChildren {
            token: token.to_string(),
        })
        .await;
        self.check_reachable()?;

        self.children.get(token).cloned().ok_or_else(|| JournalError::Status {
            status: 401,
            endpoint: "journal/person/related-child-list".to_string(),
        })
    }

    fn name(&self) -> &str {
        "StaticJournal"
    }
}

/// Build a child with one education.
pub fn child(
    first_name: &str,
    last_name: &str,
    education_id: i64,
    institution: &str,
    group: &str,
) -> ChildProfile {
    ChildProfile {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        educations: vec![EducationRef {
            education_id,
            institution: institution.to_string(),
            group: group.to_string(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homework_core::Task;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[tokio::test]
    async fn test_lessons_filtered_by_range() {
        let journal = StaticJournal::new().with_lessons(
            1,
            vec![
                Lesson::new("Math", "01.03.2025 10:00:00", vec![Task::named("old")]),
                Lesson::new("Math", "10.03.2025 10:00:00", vec![Task::named("new")]),
                Lesson::new("Art", "garbage", vec![]),
            ],
        );

        let lessons = journal.fetch_lessons(1, day(5), day(12), "t").await.unwrap();
        let names: Vec<_> = lessons.iter().map(|l| l.datetime_from.as_str()).collect();
        assert_eq!(names, vec!["10.03.2025 10:00:00", "garbage"]);
        assert!(journal.fetch_lessons(2, day(1), day(31), "t").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_related_children_by_token() {
        let journal = StaticJournal::new()
            .with_children("good", vec![child("Ivan", "Petrov", 5, "School 1", "3B")]);

        let children = journal.related_children("good").await.unwrap();
        assert_eq!(children[0].educations[0].education_id, 5);

        let err = journal.related_children("bad").await.unwrap_err();
        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn test_unknown_token_rejected_for_lessons() {
        let journal = StaticJournal::new()
            .with_children("good", vec![child("Ivan", "Petrov", 5, "School 1", "3B")]);

        assert!(journal.fetch_lessons(5, day(1), day(2), "good").await.is_ok());
        assert!(journal.fetch_schedule(5, day(2), "stale").await.unwrap_err().is_rejection());
    }

    #[tokio::test]
    async fn test_failing_education_and_unreachable() {
        let journal = StaticJournal::new().with_failing_education(9);
        let err = journal.fetch_schedule(9, day(3), "t").await.unwrap_err();
        assert!(matches!(err, JournalError::Status { status: 500, .. }));
        assert!(!err.is_rejection());

        let down = StaticJournal::new().unreachable();
        assert!(matches!(
            down.related_children("t").await,
            Err(JournalError::Http(_))
        ));
    }

    #[tokio::test]
    async fn test_calls_are_recorded() {
        let journal = StaticJournal::new().with_file("u1", b"data".to_vec());

        journal.fetch_file("u1").await.unwrap();
        journal.fetch_file("u1").await.unwrap();
        assert!(journal.fetch_file("missing").await.is_err());
        journal.fetch_schedule(1, day(4), "t").await.unwrap();

        let calls = journal.calls().await;
        assert_eq!(calls.len(), 4);
        assert_eq!(
            calls[0],
            JournalCall::File {
                uuid: "u1".to_string()
            }
        );
        assert_eq!(journal.schedule_requests().await, 1);
    }
}
