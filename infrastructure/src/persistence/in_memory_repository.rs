// ./infrastructure/src/persistence/in_memory_repository.rs
use application::{ApplicationError, DocumentRepository};
use async_trait::async_trait;
use dashmap::DashMap;
use domain::{Document, DocumentId, SearchRequest};
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

/// Process-local document storage. Clones share the same map; concurrent
/// writes to one id are last-writer-wins.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentRepository {
    // Document ID -> Document
    store: Arc<DashMap<DocumentId, Arc<Document>>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    #[instrument(skip(self, document))]
    async fn save(&self, document: &Document) -> Result<(), ApplicationError> {
        let Some(id) = document.id() else {
            warn!("Refusing to store a document without an id");
            return Err(ApplicationError::InvalidArgument(
                "document must have an id before it is stored".to_string(),
            ));
        };
        debug!(doc_id = %id, "Saving document to in-memory store");
        // Insert replaces any previous value under the same id
        self.store.insert(id.clone(), Arc::new(document.clone()));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError> {
        debug!(doc_id = %id, "Getting document from in-memory store");
        // Get returns a Ref, so we clone the Document out of the Arc
        let doc = self.store.get(id).map(|doc_ref| (**doc_ref).clone());
        Ok(doc)
    }

    #[instrument(skip(self, request))]
    async fn search(
        &self,
        request: Option<&SearchRequest>,
    ) -> Result<Vec<Document>, ApplicationError> {
        debug!(
            total = self.store.len(),
            has_request = request.is_some(),
            "Scanning in-memory store"
        );
        let hits: Vec<Document> = self
            .store
            .iter()
            .filter(|entry| request.is_none_or(|r| r.matches(entry.value())))
            .map(|entry| (**entry.value()).clone())
            .collect();
        trace!(count = hits.len(), "Documents after filtering");
        Ok(hits)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<usize, ApplicationError> {
        Ok(self.store.len())
    }
}
