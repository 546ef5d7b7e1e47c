//! Records exchanged with the school journal and the digest built from them.

use serde::{Deserialize, Deserializer, Serialize};

/// A lesson (or timetable entry) as returned by the journal.
///
/// Lessons and schedule entries share this shape; for schedule entries only
/// `subject_name` is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    /// Subject name, e.g. "Math".
    pub subject_name: String,
    /// Start of the lesson, `DD.MM.YYYY HH:MM:SS`.
    pub datetime_from: String,
    /// Homework tasks attached to the lesson.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tasks: Vec<Task>,
}

impl Lesson {
    /// Create a lesson with the given subject, start time and tasks.
    pub fn new(
        subject_name: impl Into<String>,
        datetime_from: impl Into<String>,
        tasks: Vec<Task>,
    ) -> Self {
        Self {
            subject_name: subject_name.into(),
            datetime_from: datetime_from.into(),
            tasks,
        }
    }
}

/// A homework task attached to a lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task text; some tasks only carry files.
    #[serde(default)]
    pub task_name: Option<String>,
    /// Attachment references, downloaded lazily.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub files: Vec<FileRef>,
}

impl Task {
    /// Create a task with a name and no files.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            task_name: Some(name.into()),
            files: Vec::new(),
        }
    }

    /// Add a file reference.
    pub fn with_file(mut self, file: FileRef) -> Self {
        self.files.push(file);
        self
    }
}

/// Reference to a file stored in the journal's file storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub uuid: String,
    pub file_name: String,
    #[serde(default)]
    pub file_type: Option<String>,
}

impl FileRef {
    pub fn new(uuid: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            file_name: file_name.into(),
            file_type: None,
        }
    }

    /// Set the MIME type reported by the journal.
    pub fn with_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = Some(file_type.into());
        self
    }
}

/// A downloaded attachment ready to be sent as a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

/// A task selected for delivery, with its files resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueTask {
    pub task_name: Option<String>,
    pub files: Vec<Attachment>,
}

/// Homework due for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestEntry {
    pub subject: String,
    pub tasks: Vec<DueTask>,
}

/// The subject → tasks mapping selected for delivery in one cycle.
///
/// Subjects keep timetable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Digest {
    pub entries: Vec<DigestEntry>,
}

impl Digest {
    /// Check whether any subject has homework.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of subjects in the digest.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Tasks for a subject, if it is part of the digest.
    pub fn get(&self, subject: &str) -> Option<&[DueTask]> {
        self.entries
            .iter()
            .find(|entry| entry.subject == subject)
            .map(|entry| entry.tasks.as_slice())
    }

    /// All attachments in subject → task order.
    pub fn attachments(&self) -> impl Iterator<Item = &Attachment> {
        self.entries
            .iter()
            .flat_map(|entry| entry.tasks.iter())
            .flat_map(|task| task.files.iter())
    }
}

/// A child linked to a journal credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildProfile {
    pub first_name: String,
    pub last_name: String,
    pub educations: Vec<EducationRef>,
}

/// One education (school enrolment) of a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EducationRef {
    pub education_id: i64,
    pub institution: String,
    pub group: String,
}

/// The journal sends `null` instead of `[]` for some list fields.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
