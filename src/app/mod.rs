pub mod app_clipboard;
pub mod lightrag_client;
pub mod state_batch_delete;
pub mod state_single_delete;

#[cfg(test)]
pub(crate) mod test_support;

use crate::document::DocumentRef;
use crate::notification::{Notification, NotificationCenter};
use crate::search::SearchState;
use lightrag_client::DocumentService;
use state_batch_delete::BatchDeleteDialog;
use state_single_delete::SingleDeleteDialog;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// What a delete dialog asks its owning view to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    Notify(Notification),
    /// The document list is stale and has to be refetched.
    DocumentsDeleted,
    CloseRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOperation {
    FetchDocuments,
    ConfirmSingleDelete,
    ConfirmBatchDelete,
    CopyDocumentId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogKind {
    Single,
    Batch,
}

pub struct App {
    pub service: Arc<dyn DocumentService>,
    pub profile_name: String,
    pub server_url: String,
    pub connection_status: String,
    pub documents: Vec<DocumentRef>,
    /// Index into `visible_documents()`.
    pub selected_index: usize,
    pub marked_ids: BTreeSet<String>,
    pub search_state: SearchState,
    pub single_delete: SingleDeleteDialog,
    pub batch_delete: BatchDeleteDialog,
    pub notifications: NotificationCenter,
    pub pending_operation: Option<PendingOperation>,
}

impl App {
    pub fn new(
        service: Arc<dyn DocumentService>,
        profile_name: &str,
        server_url: &str,
        notification_ttl: Duration,
    ) -> App {
        App {
            service,
            profile_name: profile_name.to_string(),
            server_url: server_url.to_string(),
            connection_status: format!("Initializing for {} ({})...", profile_name, server_url),
            documents: Vec::new(),
            selected_index: 0,
            marked_ids: BTreeSet::new(),
            search_state: SearchState::new(),
            single_delete: SingleDeleteDialog::default(),
            batch_delete: BatchDeleteDialog::default(),
            notifications: NotificationCenter::new(notification_ttl),
            pending_operation: None,
        }
    }

    pub fn trigger_fetch_documents(&mut self) {
        self.connection_status = format!("Fetching documents from {}...", self.server_url);
        self.pending_operation = Some(PendingOperation::FetchDocuments);
    }

    pub async fn fetch_documents(&mut self) {
        match self.service.list_documents().await {
            Ok(documents) => {
                self.documents = documents;
                let known: BTreeSet<&str> = self.documents.iter().map(|d| d.id.as_str()).collect();
                self.marked_ids.retain(|id| known.contains(id.as_str()));
                self.search_state.update_matches(&self.documents);
                self.clamp_selection();
                self.connection_status = format!(
                    "Connected to {} ({}). {} documents.",
                    self.profile_name,
                    self.server_url,
                    self.documents.len()
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch documents");
                self.connection_status = format!("Failed to fetch documents: {}", e);
                self.notifications
                    .push(Notification::error(format!("Failed to load documents: {}", e)));
            }
        }
    }

    pub fn visible_documents(&self) -> Vec<&DocumentRef> {
        if self.search_state.is_filtering() {
            self.search_state
                .matches
                .iter()
                .filter_map(|&idx| self.documents.get(idx))
                .collect()
        } else {
            self.documents.iter().collect()
        }
    }

    pub fn selected_document(&self) -> Option<&DocumentRef> {
        self.visible_documents().get(self.selected_index).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_documents().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    pub fn next_document(&mut self) {
        let len = self.visible_documents().len();
        if len > 0 {
            self.selected_index = (self.selected_index + 1) % len;
        }
    }

    pub fn previous_document(&mut self) {
        let len = self.visible_documents().len();
        if len > 0 {
            if self.selected_index > 0 {
                self.selected_index -= 1;
            } else {
                self.selected_index = len - 1;
            }
        }
    }

    pub fn toggle_mark_selected(&mut self) {
        if let Some(id) = self.selected_document().map(|d| d.id.clone()) {
            if !self.marked_ids.remove(&id) {
                self.marked_ids.insert(id);
            }
        }
    }

    /// Marks every visible document, or clears them all when they already are.
    pub fn toggle_mark_all_visible(&mut self) {
        let ids: Vec<String> = self.visible_documents().iter().map(|d| d.id.clone()).collect();
        if ids.iter().all(|id| self.marked_ids.contains(id)) {
            for id in &ids {
                self.marked_ids.remove(id);
            }
        } else {
            self.marked_ids.extend(ids);
        }
    }

    pub fn marked_documents(&self) -> Vec<DocumentRef> {
        self.documents
            .iter()
            .filter(|d| self.marked_ids.contains(&d.id))
            .cloned()
            .collect()
    }

    pub fn is_dialog_open(&self) -> bool {
        self.single_delete.is_open || self.batch_delete.is_open
    }

    pub fn is_deleting(&self) -> bool {
        self.single_delete.is_deleting
            || self.batch_delete.is_deleting
            || matches!(
                self.pending_operation,
                Some(PendingOperation::ConfirmSingleDelete | PendingOperation::ConfirmBatchDelete)
            )
    }

    pub fn initiate_single_delete(&mut self) {
        if self.search_state.is_active || self.is_dialog_open() {
            return;
        }
        if let Some(document) = self.selected_document().cloned() {
            self.single_delete.open(document);
        }
    }

    pub fn initiate_batch_delete(&mut self) {
        if self.search_state.is_active || self.is_dialog_open() {
            return;
        }
        let documents = self.marked_documents();
        if documents.is_empty() {
            self.notifications
                .push(Notification::warning("Mark documents with Space before batch deleting"));
            return;
        }
        self.batch_delete.open(documents);
    }

    pub fn cancel_single_delete(&mut self) {
        self.single_delete.close();
    }

    pub fn cancel_batch_delete(&mut self) {
        self.batch_delete.close();
    }

    pub fn trigger_single_delete(&mut self) {
        if self.single_delete.is_open && !self.is_deleting() {
            self.pending_operation = Some(PendingOperation::ConfirmSingleDelete);
        }
    }

    pub fn trigger_batch_delete(&mut self) {
        if !self.batch_delete.is_open || self.is_deleting() {
            return;
        }
        match self.batch_delete.gate() {
            Ok(()) => {
                // A failed attempt leaves the gauge full; the retry starts from zero.
                self.batch_delete.progress = 0;
                self.pending_operation = Some(PendingOperation::ConfirmBatchDelete);
            }
            Err(rejection) => self.notifications.push(rejection),
        }
    }

    pub async fn confirm_single_delete(&mut self) {
        let events = self.single_delete.confirm(self.service.as_ref()).await;
        self.apply_dialog_events(events, DialogKind::Single).await;
    }

    pub async fn confirm_batch_delete(&mut self) {
        let events = self.batch_delete.confirm(self.service.as_ref()).await;
        self.apply_dialog_events(events, DialogKind::Batch).await;
    }

    async fn apply_dialog_events(&mut self, events: Vec<DialogEvent>, kind: DialogKind) {
        let mut refresh = false;
        for event in events {
            match event {
                DialogEvent::Notify(notification) => self.notifications.push(notification),
                DialogEvent::DocumentsDeleted => refresh = true,
                DialogEvent::CloseRequested => match kind {
                    DialogKind::Single => self.single_delete.close(),
                    DialogKind::Batch => self.batch_delete.close(),
                },
            }
        }
        if refresh {
            self.fetch_documents().await;
        }
    }

    pub fn enter_search_mode(&mut self) {
        self.search_state.enter();
        self.selected_index = 0;
    }

    pub fn finish_search_input(&mut self) {
        self.search_state.finish_input();
    }

    pub fn exit_search_mode(&mut self) {
        self.search_state.exit();
        self.clamp_selection();
    }

    pub fn update_search_matches(&mut self) {
        self.search_state.update_matches(&self.documents);
        self.selected_index = 0;
    }

    /// Drops expired notifications; called once per UI tick.
    pub fn tick(&mut self) {
        self.notifications.prune();
    }
}
