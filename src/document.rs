use serde::{Deserialize, Serialize};

/// Processing state reported by the server. Only used for display.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocStatus {
    Processed,
    Processing,
    #[default]
    Pending,
    Failed,
}

impl DocStatus {
    /// Maps a status group name from the document listing. Unknown groups give `None`.
    pub fn from_group(name: &str) -> Option<Self> {
        match name {
            "processed" => Some(DocStatus::Processed),
            "processing" => Some(DocStatus::Processing),
            "pending" => Some(DocStatus::Pending),
            "failed" => Some(DocStatus::Failed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocStatus::Processed => "Completed",
            DocStatus::Processing => "Processing",
            DocStatus::Pending => "Pending",
            DocStatus::Failed => "Failed",
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub status: DocStatus,
}

impl DocumentRef {
    pub fn new(id: impl Into<String>, file_path: Option<&str>, status: DocStatus) -> Self {
        DocumentRef {
            id: id.into(),
            file_path: file_path.map(str::to_string),
            status,
        }
    }

    /// Last path segment of `file_path`, falling back to the id when the path is blank.
    pub fn display_name(&self) -> &str {
        match self.file_path.as_deref() {
            Some(path) if !path.trim().is_empty() => match path.rsplit('/').next() {
                Some(segment) if !segment.is_empty() => segment,
                _ => &self.id,
            },
            _ => &self.id,
        }
    }

    pub fn file_name(&self) -> &str {
        self.file_path.as_deref().unwrap_or("")
    }
}

/// One entry of a batch deletion request, in submission order.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DeletionItem {
    pub doc_id: String,
    pub file_name: String,
}

impl From<&DocumentRef> for DeletionItem {
    fn from(doc: &DocumentRef) -> Self {
        DeletionItem {
            doc_id: doc.id.clone(),
            file_name: doc.file_name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Success,
    /// The document was already gone. Treated as a completed deletion.
    NotFound,
    /// The processing pipeline holds the lock.
    Busy,
    Failed { message: String },
}

#[derive(Deserialize, Debug)]
pub struct DeletionResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<DeletionResponse> for DeletionOutcome {
    fn from(response: DeletionResponse) -> Self {
        match response.status.as_str() {
            "success" => DeletionOutcome::Success,
            "not_found" => DeletionOutcome::NotFound,
            "busy" => DeletionOutcome::Busy,
            _ => DeletionOutcome::Failed {
                message: response.message.unwrap_or(response.status),
            },
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Success,
    PartialSuccess,
    #[serde(other)]
    Failure,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Success,
    NotFound,
    Busy,
    #[serde(other)]
    Failed,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ItemResult {
    pub doc_id: String,
    pub status: ItemStatus,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BatchDeletionResult {
    pub overall_status: BatchStatus,
    #[serde(default)]
    pub deleted_count: u64,
    #[serde(default)]
    pub failed_count: u64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub results: Vec<ItemResult>,
}

impl BatchDeletionResult {
    /// Per-document entries that did not end in a deletion, in server order.
    pub fn failures(&self) -> impl Iterator<Item = &ItemResult> {
        self.results.iter().filter(|r| r.status != ItemStatus::Success)
    }

    pub fn failed_ids(&self) -> impl Iterator<Item = &str> {
        self.failures().map(|r| r.doc_id.as_str())
    }
}
