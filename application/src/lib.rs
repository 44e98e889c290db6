use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Document, DocumentId, DomainError, SearchRequest};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// --- Application Errors ---
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        // Every domain rule violated at a call boundary is a bad argument.
        ApplicationError::InvalidArgument(err.to_string())
    }
}

// --- Infrastructure Interfaces (Traits) ---

/// Interface for storing and retrieving documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Inserts or replaces a document under its id. The document must carry an id.
    async fn save(&self, document: &Document) -> Result<(), ApplicationError>;
    /// Retrieves a document by its ID.
    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError>;
    /// Scans every stored document. `None` matches all of them.
    async fn search(
        &self,
        request: Option<&SearchRequest>,
    ) -> Result<Vec<Document>, ApplicationError>;
    /// Returns the number of stored documents.
    async fn count(&self) -> Result<usize, ApplicationError>;
}

/// Source of creation timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of identities for new documents.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> DocumentId;
}

/// Random (v4) UUIDs rendered as hyphenated strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> DocumentId {
        DocumentId::new(Uuid::new_v4().to_string())
    }
}

// --- Application Services (Use Cases) ---

/// The document store: upsert, lookup by id and attribute search.
pub struct DocumentService {
    repo: Arc<dyn DocumentRepository>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl DocumentService {
    pub fn new(repo: Arc<dyn DocumentRepository>) -> Self {
        Self {
            repo,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Upserts a document.
    ///
    /// A document without an id gets a fresh id and the current time as its
    /// creation timestamp. A document with an id replaces whatever is stored
    /// under it, and its `created` value is persisted exactly as supplied,
    /// even when it differs from the stored one or is absent.
    #[instrument(skip(self, document))]
    pub async fn save(&self, mut document: Document) -> Result<Document, ApplicationError> {
        match document.id().cloned() {
            None => {
                let id = self.ids.generate();
                document.assign_identity(id.clone(), self.clock.now());
                info!(doc_id = %id, "Assigned identity to new document");
            }
            Some(id) => {
                info!(doc_id = %id, "Updating existing document");
            }
        }

        self.repo.save(&document).await?;
        Ok(document)
    }

    /// Upserts a document given as an untyped JSON payload.
    #[instrument(skip(self, payload))]
    pub async fn save_value(&self, payload: Value) -> Result<Document, ApplicationError> {
        if payload.is_null() {
            warn!("Save rejected: document is null");
            return Err(ApplicationError::InvalidArgument(
                "document must not be null".to_string(),
            ));
        }

        let document: Document = serde_json::from_value(payload).map_err(|e| {
            warn!("Save rejected: malformed document payload: {}", e);
            ApplicationError::InvalidArgument(format!("malformed document: {}", e))
        })?;
        self.save(document).await
    }

    /// Looks a document up by id. Only an absent id is an error; any string,
    /// blank ones included, is a key that may simply not be stored.
    #[instrument(skip(self))]
    pub async fn find_by_id(
        &self,
        id: Option<&str>,
    ) -> Result<Option<Document>, ApplicationError> {
        let Some(id) = id else {
            warn!("Lookup rejected: document id is null");
            return Err(ApplicationError::InvalidArgument(
                "document id must not be null".to_string(),
            ));
        };
        let doc_id = DocumentId::new(id.to_string());
        let document = self.repo.get(&doc_id).await?;
        debug!(doc_id = %doc_id, found = document.is_some(), "Lookup completed");
        Ok(document)
    }

    /// Returns every stored document that satisfies `request`, in no particular order.
    #[instrument(skip(self, request))]
    pub async fn search(
        &self,
        request: Option<&SearchRequest>,
    ) -> Result<Vec<Document>, ApplicationError> {
        let unconstrained = request.is_none_or(SearchRequest::is_unconstrained);
        let hits = self.repo.search(request).await?;
        info!(unconstrained, hits = hits.len(), "Search completed");
        Ok(hits)
    }

    /// Number of documents currently held by the store.
    pub async fn count(&self) -> Result<usize, ApplicationError> {
        self.repo.count().await
    }
}
