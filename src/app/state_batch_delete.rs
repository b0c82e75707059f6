use super::lightrag_client::DocumentService;
use super::DialogEvent;
use crate::document::{BatchDeletionResult, BatchStatus, DeletionItem, DocumentRef};
use crate::notification::Notification;

pub const CONFIRMATION_PHRASE: &str = "DELETE";
pub const PREVIEW_LIMIT: usize = 5;
const FAILURE_SAMPLE: usize = 3;

#[derive(Debug, Default, Clone)]
pub struct BatchDeleteDialog {
    pub is_open: bool,
    pub is_deleting: bool,
    pub documents: Vec<DocumentRef>,
    pub confirmation_text: String,
    /// Only ever 0 or 100: the batch is a single request with no partial progress.
    pub progress: u8,
}

impl BatchDeleteDialog {
    pub fn open(&mut self, documents: Vec<DocumentRef>) {
        self.documents = documents;
        self.confirmation_text.clear();
        self.progress = 0;
        self.is_deleting = false;
        self.is_open = true;
    }

    pub fn close(&mut self) {
        if self.is_deleting {
            return;
        }
        self.is_open = false;
        self.documents.clear();
        self.confirmation_text.clear();
        self.progress = 0;
    }

    pub fn push_char(&mut self, c: char) {
        if !self.is_deleting {
            self.confirmation_text.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if !self.is_deleting {
            self.confirmation_text.pop();
        }
    }

    pub fn is_confirmation_valid(&self) -> bool {
        self.confirmation_text == CONFIRMATION_PHRASE
    }

    /// The notification shown when deletion is attempted without the phrase.
    pub fn gate(&self) -> Result<(), Notification> {
        if self.is_confirmation_valid() {
            Ok(())
        } else {
            Err(Notification::error(format!(
                "Please type \"{}\" to confirm this action",
                CONFIRMATION_PHRASE
            )))
        }
    }

    /// First rows of the document list and how many are left out.
    pub fn preview(&self) -> (&[DocumentRef], usize) {
        preview(&self.documents)
    }

    pub async fn confirm(&mut self, service: &dyn DocumentService) -> Vec<DialogEvent> {
        if let Err(rejection) = self.gate() {
            return vec![DialogEvent::Notify(rejection)];
        }
        if self.documents.is_empty() {
            self.confirmation_text.clear();
            return vec![DialogEvent::Notify(Notification::warning(
                "No documents selected for deletion",
            ))];
        }

        self.is_deleting = true;
        self.progress = 0;

        let items: Vec<DeletionItem> = self.documents.iter().map(DeletionItem::from).collect();
        let events = match service.delete_many(&items).await {
            Ok(result) => {
                self.progress = 100;
                tracing::info!(
                    requested = items.len(),
                    deleted = result.deleted_count,
                    failed = result.failed_count,
                    status = ?result.overall_status,
                    "batch deletion finished"
                );
                for failure in result.failures() {
                    tracing::warn!(
                        doc_id = %failure.doc_id,
                        status = ?failure.status,
                        reason = failure.message.as_deref().unwrap_or("-"),
                        "document not deleted"
                    );
                }
                reconcile(&result, items.len())
            }
            Err(e) => {
                self.progress = 0;
                tracing::error!(
                    requested = items.len(),
                    error = %e,
                    "batch deletion request failed"
                );
                vec![DialogEvent::Notify(Notification::error(format!(
                    "Failed to delete documents: {}",
                    e
                )))]
            }
        };

        self.is_deleting = false;
        self.confirmation_text.clear();
        events
    }
}

pub fn preview(documents: &[DocumentRef]) -> (&[DocumentRef], usize) {
    let shown = documents.len().min(PREVIEW_LIMIT);
    (&documents[..shown], documents.len() - shown)
}

/// Turns a batch result into the summary and follow-up events.
pub fn reconcile(result: &BatchDeletionResult, total: usize) -> Vec<DialogEvent> {
    let mut events = Vec::with_capacity(4);

    let summary = match result.overall_status {
        BatchStatus::Success => Notification::success(format!(
            "Successfully deleted {} documents",
            result.deleted_count
        )),
        BatchStatus::PartialSuccess => Notification::warning(format!(
            "Partially successful: {}/{} documents deleted, {} failed",
            result.deleted_count, total, result.failed_count
        )),
        BatchStatus::Failure => {
            Notification::error(format!("Failed to delete documents: {}", result.message))
        }
    };
    events.push(DialogEvent::Notify(summary));

    if let Some(sample) = failed_sample(result) {
        events.push(DialogEvent::Notify(Notification::error(format!(
            "Failed to delete: {}",
            sample
        ))));
    }

    match result.overall_status {
        BatchStatus::Success | BatchStatus::PartialSuccess => {
            events.push(DialogEvent::DocumentsDeleted);
            events.push(DialogEvent::CloseRequested);
        }
        BatchStatus::Failure => {}
    }
    events
}

/// `"a, b, c (+2 more)"` for the first failed ids, or `None` when nothing failed
/// or the server listed no failed entries.
pub fn failed_sample(result: &BatchDeletionResult) -> Option<String> {
    if result.failed_count == 0 {
        return None;
    }
    let ids: Vec<&str> = result.failed_ids().take(FAILURE_SAMPLE).collect();
    if ids.is_empty() {
        return None;
    }
    let mut sample = ids.join(", ");
    if result.failed_count > FAILURE_SAMPLE as u64 {
        sample.push_str(&format!(" (+{} more)", result.failed_count - FAILURE_SAMPLE as u64));
    }
    Some(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::FakeService;
    use crate::document::{DocStatus, ItemResult, ItemStatus};
    use crate::notification::NotificationLevel;

    fn docs(n: usize) -> Vec<DocumentRef> {
        (0..n)
            .map(|i| {
                let path = format!("inbox/file-{}.txt", i);
                DocumentRef::new(format!("doc-{}", i), Some(path.as_str()), DocStatus::Processed)
            })
            .collect()
    }

    fn item(id: &str, status: ItemStatus) -> ItemResult {
        ItemResult { doc_id: id.to_string(), status, message: None }
    }

    fn result(
        status: BatchStatus,
        deleted: u64,
        failed: u64,
        results: Vec<ItemResult>,
    ) -> BatchDeletionResult {
        BatchDeletionResult {
            overall_status: status,
            deleted_count: deleted,
            failed_count: failed,
            message: String::new(),
            results,
        }
    }

    fn armed(documents: Vec<DocumentRef>) -> BatchDeleteDialog {
        let mut dialog = BatchDeleteDialog::default();
        dialog.open(documents);
        dialog.confirmation_text = CONFIRMATION_PHRASE.to_string();
        dialog
    }

    fn messages(events: &[DialogEvent]) -> Vec<(NotificationLevel, String)> {
        events
            .iter()
            .filter_map(|e| match e {
                DialogEvent::Notify(n) => Some((n.level, n.message.clone())),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn gate_blocks_anything_but_exact_phrase() {
        for text in ["", "delete", "DELETE ", "DELETEX", " DELETE", "Delete"] {
            let service = FakeService::with_batch(Ok(result(BatchStatus::Success, 2, 0, vec![])));
            let mut dialog = BatchDeleteDialog::default();
            dialog.open(docs(2));
            dialog.confirmation_text = text.to_string();

            let events = dialog.confirm(&service).await;

            assert!(service.batch_calls().is_empty(), "request issued for {:?}", text);
            let notes = messages(&events);
            assert_eq!(notes.len(), 1);
            assert_eq!(notes[0].0, NotificationLevel::Error);
            assert!(notes[0].1.contains("DELETE"));
            assert!(!dialog.is_deleting);
        }
    }

    #[tokio::test]
    async fn payload_contains_every_document_in_order() {
        let documents = docs(8);
        let service = FakeService::with_batch(Ok(result(BatchStatus::Success, 8, 0, vec![])));
        let mut dialog = armed(documents.clone());

        dialog.confirm(&service).await;

        let calls = service.batch_calls();
        assert_eq!(calls.len(), 1);
        let ids: Vec<&str> = calls[0].iter().map(|i| i.doc_id.as_str()).collect();
        let expected: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, expected);
        assert_eq!(calls[0][3].file_name, "inbox/file-3.txt");
    }

    #[tokio::test]
    async fn success_refreshes_and_closes_once() {
        let service = FakeService::with_batch(Ok(result(BatchStatus::Success, 3, 0, vec![])));
        let mut dialog = armed(docs(3));

        let events = dialog.confirm(&service).await;

        assert_eq!(
            messages(&events),
            vec![(NotificationLevel::Success, "Successfully deleted 3 documents".to_string())]
        );
        assert_eq!(events.iter().filter(|e| **e == DialogEvent::DocumentsDeleted).count(), 1);
        assert_eq!(events.iter().filter(|e| **e == DialogEvent::CloseRequested).count(), 1);
        assert_eq!(dialog.progress, 100);
        assert!(dialog.confirmation_text.is_empty());
        assert!(!dialog.is_deleting);
    }

    #[tokio::test]
    async fn partial_success_summarizes_and_itemizes() {
        let results = vec![
            item("ok-1", ItemStatus::Success),
            item("bad-1", ItemStatus::Busy),
            item("bad-2", ItemStatus::Failed),
            item("bad-3", ItemStatus::NotFound),
        ];
        let service =
            FakeService::with_batch(Ok(result(BatchStatus::PartialSuccess, 7, 3, results)));
        let mut dialog = armed(docs(10));

        let events = dialog.confirm(&service).await;

        let notes = messages(&events);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].0, NotificationLevel::Warning);
        assert!(notes[0].1.contains("7/10"));
        assert!(notes[0].1.contains("3 failed"));
        assert_eq!(
            notes[1],
            (NotificationLevel::Error, "Failed to delete: bad-1, bad-2, bad-3".to_string())
        );
        assert!(events.contains(&DialogEvent::DocumentsDeleted));
    }

    #[tokio::test]
    async fn failure_status_keeps_dialog_open() {
        let items = vec![item("x", ItemStatus::Failed), item("y", ItemStatus::Failed)];
        let mut failed = result(BatchStatus::Failure, 0, 2, items);
        failed.message = "vector store offline".to_string();
        let service = FakeService::with_batch(Ok(failed));
        let mut dialog = armed(docs(2));

        let events = dialog.confirm(&service).await;

        let notes = messages(&events);
        assert_eq!(
            notes[0],
            (
                NotificationLevel::Error,
                "Failed to delete documents: vector store offline".to_string()
            )
        );
        assert_eq!(notes[1].1, "Failed to delete: x, y");
        assert!(!events.contains(&DialogEvent::DocumentsDeleted));
        assert!(!events.contains(&DialogEvent::CloseRequested));
        assert!(dialog.confirmation_text.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_resets_progress_and_text() {
        let service = FakeService::with_batch(Err("timed out".to_string()));
        let mut dialog = armed(docs(4));

        let events = dialog.confirm(&service).await;

        let notes = messages(&events);
        assert_eq!(notes.len(), 1);
        assert!(notes[0].1.contains("timed out"));
        assert_eq!(events.len(), 1);
        assert_eq!(dialog.progress, 0);
        assert!(dialog.confirmation_text.is_empty());
        assert!(!dialog.is_deleting);
        assert!(dialog.is_open);
    }

    #[tokio::test]
    async fn empty_selection_issues_no_request() {
        let service = FakeService::with_batch(Ok(result(BatchStatus::Success, 0, 0, vec![])));
        let mut dialog = armed(Vec::new());

        let events = dialog.confirm(&service).await;

        assert!(service.batch_calls().is_empty());
        assert_eq!(messages(&events)[0].0, NotificationLevel::Warning);
    }

    #[test]
    fn failed_sample_truncates_to_three() {
        let results = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|id| item(id, ItemStatus::Failed))
            .collect();
        let r = result(BatchStatus::PartialSuccess, 5, 5, results);
        assert_eq!(failed_sample(&r).as_deref(), Some("a, b, c (+2 more)"));
    }

    #[test]
    fn failed_sample_skips_successes_and_inconsistent_data() {
        let r = result(BatchStatus::PartialSuccess, 1, 1, vec![item("a", ItemStatus::Success)]);
        assert_eq!(failed_sample(&r), None);

        let events = reconcile(&r, 2);
        assert_eq!(messages(&events).len(), 1);

        let clean = result(BatchStatus::Success, 2, 0, vec![item("a", ItemStatus::Busy)]);
        assert_eq!(failed_sample(&clean), None);
    }

    #[test]
    fn preview_truncates_to_five() {
        let eight = docs(8);
        let (shown, more) = preview(&eight);
        assert_eq!(shown.len(), 5);
        assert_eq!(shown[4].id, "doc-4");
        assert_eq!(more, 3);

        let five = docs(5);
        assert_eq!(preview(&five).1, 0);
        assert_eq!(preview(&[]).0.len(), 0);
    }

    #[test]
    fn typing_is_locked_while_deleting() {
        let mut dialog = BatchDeleteDialog::default();
        dialog.open(docs(1));
        dialog.push_char('D');
        dialog.is_deleting = true;
        dialog.push_char('E');
        dialog.pop_char();
        assert_eq!(dialog.confirmation_text, "D");
    }
}
