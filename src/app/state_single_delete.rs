use super::lightrag_client::DocumentService;
use super::DialogEvent;
use crate::document::{DeletionOutcome, DocumentRef};
use crate::notification::Notification;

#[derive(Debug, Default, Clone)]
pub struct SingleDeleteDialog {
    pub is_open: bool,
    pub is_deleting: bool,
    pub document: Option<DocumentRef>,
}

impl SingleDeleteDialog {
    pub fn open(&mut self, document: DocumentRef) {
        self.document = Some(document);
        self.is_deleting = false;
        self.is_open = true;
    }

    pub fn close(&mut self) {
        if self.is_deleting {
            return;
        }
        self.is_open = false;
        self.document = None;
    }

    /// Requests deletion of the dialog's document. Returns the events the owning
    /// view must apply; without a document nothing is requested.
    pub async fn confirm(&mut self, service: &dyn DocumentService) -> Vec<DialogEvent> {
        let Some(document) = self.document.clone() else {
            return Vec::new();
        };

        self.is_deleting = true;
        let result = service.delete_one(&document.id, document.file_name()).await;
        self.is_deleting = false;

        match result {
            Ok(outcome) => {
                tracing::info!(doc_id = %document.id, ?outcome, "single deletion finished");
                outcome_events(&document, outcome)
            }
            Err(e) => {
                tracing::error!(
                    doc_id = %document.id,
                    error = %e,
                    "single deletion request failed"
                );
                vec![DialogEvent::Notify(Notification::error(format!(
                    "Failed to delete document: {}",
                    e
                )))]
            }
        }
    }
}

fn outcome_events(document: &DocumentRef, outcome: DeletionOutcome) -> Vec<DialogEvent> {
    match outcome {
        DeletionOutcome::Success => vec![
            DialogEvent::Notify(Notification::success(format!(
                "Document \"{}\" deleted successfully",
                document.display_name()
            ))),
            DialogEvent::DocumentsDeleted,
            DialogEvent::CloseRequested,
        ],
        // Already absent: the list still has to drop it.
        DeletionOutcome::NotFound => vec![
            DialogEvent::Notify(Notification::warning("Document not found")),
            DialogEvent::DocumentsDeleted,
            DialogEvent::CloseRequested,
        ],
        DeletionOutcome::Busy => vec![DialogEvent::Notify(Notification::error(
            "Cannot delete document while pipeline is busy",
        ))],
        DeletionOutcome::Failed { message } => vec![DialogEvent::Notify(Notification::error(
            format!("Failed to delete document: {}", message),
        ))],
    }
}
