use super::lightrag_client::{DocumentService, ServiceError};
use crate::document::{BatchDeletionResult, DeletionItem, DeletionOutcome, DocumentRef};
use async_trait::async_trait;
use std::sync::Mutex;

/// In-memory server double. `Err` strings surface as API errors.
#[derive(Default)]
pub struct FakeService {
    pub documents: Mutex<Vec<DocumentRef>>,
    pub list_error: Mutex<Option<String>>,
    single_response: Mutex<Option<Result<DeletionOutcome, String>>>,
    batch_response: Mutex<Option<Result<BatchDeletionResult, String>>>,
    single_calls: Mutex<Vec<(String, String)>>,
    batch_calls: Mutex<Vec<Vec<DeletionItem>>>,
    list_calls: Mutex<usize>,
}

fn api_error(body: &str) -> ServiceError {
    ServiceError::Api { status: 502, body: body.to_string() }
}

impl FakeService {
    pub fn with_single(response: Result<DeletionOutcome, String>) -> Self {
        let service = Self::default();
        *service.single_response.lock().unwrap() = Some(response);
        service
    }

    pub fn with_batch(response: Result<BatchDeletionResult, String>) -> Self {
        let service = Self::default();
        *service.batch_response.lock().unwrap() = Some(response);
        service
    }

    pub fn with_documents(self, documents: Vec<DocumentRef>) -> Self {
        *self.documents.lock().unwrap() = documents;
        self
    }

    pub fn single_calls(&self) -> Vec<(String, String)> {
        self.single_calls.lock().unwrap().clone()
    }

    pub fn batch_calls(&self) -> Vec<Vec<DeletionItem>> {
        self.batch_calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    fn remove(&self, ids: &[&str]) {
        self.documents.lock().unwrap().retain(|d| !ids.contains(&d.id.as_str()));
    }
}

#[async_trait]
impl DocumentService for FakeService {
    async fn list_documents(&self) -> Result<Vec<DocumentRef>, ServiceError> {
        *self.list_calls.lock().unwrap() += 1;
        if let Some(body) = self.list_error.lock().unwrap().as_deref() {
            return Err(api_error(body));
        }
        Ok(self.documents.lock().unwrap().clone())
    }

    async fn delete_one(
        &self,
        document_id: &str,
        file_path: &str,
    ) -> Result<DeletionOutcome, ServiceError> {
        self.single_calls
            .lock()
            .unwrap()
            .push((document_id.to_string(), file_path.to_string()));
        let response = self
            .single_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Ok(DeletionOutcome::Success));
        match response {
            Ok(outcome) => {
                if matches!(outcome, DeletionOutcome::Success | DeletionOutcome::NotFound) {
                    self.remove(&[document_id]);
                }
                Ok(outcome)
            }
            Err(body) => Err(api_error(&body)),
        }
    }

    async fn delete_many(
        &self,
        items: &[DeletionItem],
    ) -> Result<BatchDeletionResult, ServiceError> {
        self.batch_calls.lock().unwrap().push(items.to_vec());
        let response = self.batch_response.lock().unwrap().clone();
        match response {
            Some(Ok(result)) => {
                let failed: Vec<&str> = result.failed_ids().collect();
                let deleted: Vec<&str> = items
                    .iter()
                    .map(|i| i.doc_id.as_str())
                    .filter(|id| !failed.contains(id))
                    .collect();
                if result.deleted_count > 0 {
                    self.remove(&deleted);
                }
                Ok(result)
            }
            Some(Err(body)) => Err(api_error(&body)),
            None => Err(api_error("no batch response configured")),
        }
    }
}
