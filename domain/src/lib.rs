use chrono::{DateTime, Utc}; // Creation timestamps
use serde::{Deserialize, Serialize}; // Value objects double as JSON payloads
use std::fmt;
use thiserror::Error; // For domain-specific errors

// --- Domain Errors ---
#[derive(Error, Debug, PartialEq)]
pub enum DomainError {
    #[error("Missing required field '{0}'")]
    MissingField(String),
}

// --- Document ID ---
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
impl From<DocumentId> for String {
    fn from(doc_id: DocumentId) -> Self {
        doc_id.0
    }
}
impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Author ---

/// Identity and display name of whoever wrote a document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub name: String,
}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// --- Document ---

/// A stored record. `id` and `created` stay empty until the store assigns them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    #[serde(default)]
    id: Option<DocumentId>,
    title: String,
    content: String,
    author: Author,
    #[serde(default)]
    created: Option<DateTime<Utc>>,
}

impl Document {
    /// Creates an unsaved document (no id, no creation time).
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: Author) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            author,
            created: None,
        }
    }

    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    pub fn with_id(mut self, id: DocumentId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    pub fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    /// Stamps a new document with its identity and creation time.
    pub fn assign_identity(&mut self, id: DocumentId, created: DateTime<Utc>) {
        self.id = Some(id);
        self.created = Some(created);
    }
}

/// Fluent construction where every field starts out absent.
#[derive(Debug, Default, Clone)]
pub struct DocumentBuilder {
    id: Option<DocumentId>,
    title: Option<String>,
    content: Option<String>,
    author: Option<Author>,
    created: Option<DateTime<Utc>>,
}

impl DocumentBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(DocumentId::new(id.into()));
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn author(mut self, author: Author) -> Self {
        self.author = Some(author);
        self
    }

    pub fn created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Fails on the first absent required field, checked as title, content, author.
    pub fn build(self) -> Result<Document, DomainError> {
        let title = self
            .title
            .ok_or_else(|| DomainError::MissingField("title".to_string()))?;
        let content = self
            .content
            .ok_or_else(|| DomainError::MissingField("content".to_string()))?;
        let author = self
            .author
            .ok_or_else(|| DomainError::MissingField("author".to_string()))?;

        Ok(Document {
            id: self.id,
            title,
            content,
            author,
            created: self.created,
        })
    }
}

// --- Search Request ---

/// Attribute filter over stored documents.
///
/// Every criterion is optional and the present ones are ANDed together. A
/// list criterion is satisfied when ANY of its values matches, so an empty
/// list matches nothing. Both time bounds are inclusive.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")] // Wire names: "titlePrefixes", "createdFrom", ...
pub struct SearchRequest {
    #[serde(default)]
    pub title_prefixes: Option<Vec<String>>,
    #[serde(default)]
    pub contains_contents: Option<Vec<String>>,
    #[serde(default)]
    pub author_ids: Option<Vec<String>>,
    #[serde(default)]
    pub created_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_to: Option<DateTime<Utc>>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.title_prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    pub fn containing<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contains_contents = Some(fragments.into_iter().map(Into::into).collect());
        self
    }

    pub fn author_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.author_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn created_from(mut self, from: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self
    }

    pub fn created_to(mut self, to: DateTime<Utc>) -> Self {
        self.created_to = Some(to);
        self
    }

    /// True when no criterion is set, i.e. the request matches everything.
    pub fn is_unconstrained(&self) -> bool {
        self.title_prefixes.is_none()
            && self.contains_contents.is_none()
            && self.author_ids.is_none()
            && self.created_from.is_none()
            && self.created_to.is_none()
    }

    /// Checks a document against every criterion present in the request.
    pub fn matches(&self, document: &Document) -> bool {
        if let Some(prefixes) = &self.title_prefixes {
            if !prefixes.iter().any(|p| document.title().starts_with(p.as_str())) {
                return false;
            }
        }

        if let Some(fragments) = &self.contains_contents {
            if !fragments.iter().any(|f| document.content().contains(f.as_str())) {
                return false;
            }
        }

        if let Some(author_ids) = &self.author_ids {
            if !author_ids.iter().any(|id| *id == document.author().id) {
                return false;
            }
        }

        // An unstamped document can't satisfy a time bound.
        if let Some(from) = self.created_from {
            match document.created() {
                Some(created) if created >= from => {}
                _ => return false,
            }
        }

        if let Some(to) = self.created_to {
            match document.created() {
                Some(created) if created <= to => {}
                _ => return false,
            }
        }

        true
    }
}
