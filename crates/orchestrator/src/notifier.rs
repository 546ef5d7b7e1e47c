//! Rendering and sending of homework digests.

use homework_core::Digest;
use tracing::debug;

use crate::error::OrchestratorError;
use crate::messages::NO_HOMEWORK;
use crate::sender::MessageSender;

/// Render a digest for one child.
///
/// One block per subject: the subject line, then the task names joined by
/// spaces. Tasks without a name only contribute their files.
pub fn render_digest(first_name: &str, last_name: &str, digest: &Digest) -> String {
    let header = format!("Homework for {} {}:", last_name, first_name);

    if digest.is_empty() {
        return format!("{}\n\n{}", header, NO_HOMEWORK);
    }

    let blocks: Vec<String> = digest
        .entries
        .iter()
        .map(|entry| {
            let names: Vec<&str> = entry
                .tasks
                .iter()
                .filter_map(|task| task.task_name.as_deref())
                .collect();
            format!("{}:\n{}", entry.subject, names.join(" "))
        })
        .collect();

    format!("{}\n\n{}", header, blocks.join("\n\n"))
}

/// Send the rendered text, then every attachment as its own document.
///
/// Returns the number of documents sent.
pub async fn send_digest<S: MessageSender + ?Sized>(
    sender: &S,
    chat_id: i64,
    text: &str,
    digest: &Digest,
) -> Result<usize, OrchestratorError> {
    sender.send_message(chat_id, text).await?;

    let mut documents = 0;
    for attachment in digest.attachments() {
        sender.send_document(chat_id, attachment).await?;
        documents += 1;
    }

    debug!(chat_id, subjects = digest.len(), documents, "Digest sent");
    Ok(documents)
}
