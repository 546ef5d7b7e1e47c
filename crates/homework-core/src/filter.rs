//! Selection of the homework due on the next timetable day.

use std::collections::HashSet;

use tracing::debug;

use crate::error::JournalError;
use crate::journal::JournalApi;
use crate::reducer::Homework;
use crate::types::{Attachment, Digest, DigestEntry, DueTask, Lesson, Task};

/// Subjects of `schedule` that have homework, in timetable order.
///
/// Each subject appears once even if it has several lessons that day.
/// Subjects without homework, or whose latest lesson carries no tasks,
/// are omitted.
pub fn due_subjects<'a>(schedule: &'a [Lesson], homework: &'a Homework) -> Vec<(&'a str, &'a [Task])> {
    let mut seen = HashSet::new();
    schedule
        .iter()
        .map(|lesson| lesson.subject_name.as_str())
        .filter(|subject| seen.insert(*subject))
        .filter_map(|subject| {
            homework
                .get(subject)
                .filter(|hw| !hw.tasks.is_empty())
                .map(|hw| (subject, hw.tasks.as_slice()))
        })
        .collect()
}

/// Build the digest for `schedule`, downloading every attached file.
///
/// Files are fetched one by one with no caching; a file referenced twice is
/// downloaded twice.
pub async fn filter<J>(
    schedule: &[Lesson],
    homework: &Homework,
    journal: &J,
) -> Result<Digest, JournalError>
where
    J: JournalApi + ?Sized,
{
    let mut entries = Vec::new();

    for (subject, tasks) in due_subjects(schedule, homework) {
        let mut due = Vec::with_capacity(tasks.len());
        for task in tasks {
            let mut files = Vec::with_capacity(task.files.len());
            for file in &task.files {
                debug!(subject, uuid = %file.uuid, "Downloading attachment");
                let bytes = journal.fetch_file(&file.uuid).await?;
                files.push(Attachment {
                    file_name: file.file_name.clone(),
                    bytes,
                    mime_type: file.file_type.clone(),
                });
            }
            due.push(DueTask {
                task_name: task.task_name.clone(),
                files,
            });
        }
        entries.push(DigestEntry {
            subject: subject.to_string(),
            tasks: due,
        });
    }

    Ok(Digest { entries })
}
