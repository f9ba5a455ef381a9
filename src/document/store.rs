use crate::document::{Document, DocumentHost, MutationError};
use crate::text::{LineEdit, LineSpan};
use dashmap::DashMap;
use dashmap::mapref::one::Ref;
use std::ops::Deref;
use url::Url;

// In-memory document buffers, standing in for the editor shell's buffers.
pub struct DocumentStore {
    documents: DashMap<Url, Document>,
}

pub struct DocumentHandle<'a> {
    inner: Ref<'a, Url, Document>,
}

impl<'a> DocumentHandle<'a> {
    fn new(inner: Ref<'a, Url, Document>) -> Self {
        Self { inner }
    }
}

impl<'a> Deref for DocumentHandle<'a> {
    type Target = Document;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or reopen) a document with the given text.
    pub fn open(&self, uri: Url, text: &str) {
        self.documents.insert(uri, Document::new(text));
    }

    pub fn get(&self, uri: &Url) -> Option<DocumentHandle<'_>> {
        self.documents.get(uri).map(DocumentHandle::new)
    }

    pub fn get_document_text(&self, uri: &Url) -> Option<String> {
        self.documents.get(uri).map(|doc| doc.text().to_string())
    }

    pub fn set_read_only(&self, uri: &Url, read_only: bool) -> bool {
        match self.documents.get_mut(uri) {
            Some(mut doc) => {
                doc.set_read_only(read_only);
                true
            }
            None => false,
        }
    }

    /// Apply a user edit replacing the lines in `span`.
    ///
    /// Returns the line movement the shell reports in its edit notification.
    pub fn apply_edit(&self, uri: &Url, span: LineSpan, text: &str) -> Result<LineEdit, MutationError> {
        let mut doc = self.documents.get_mut(uri).ok_or(MutationError::Closed)?;
        let (_, edit) = doc.replace_lines(span, text)?;
        Ok(edit)
    }

    pub fn close(&self, uri: &Url) -> Option<Document> {
        self.documents.remove(uri).map(|(_, doc)| doc)
    }
}

impl DocumentHost for DocumentStore {
    fn text(&self, uri: &Url) -> Option<String> {
        self.get_document_text(uri)
    }

    fn replace_lines(&self, uri: &Url, span: LineSpan, text: &str) -> Result<LineSpan, MutationError> {
        let mut doc = self.documents.get_mut(uri).ok_or(MutationError::Closed)?;
        let (covered, _) = doc.replace_lines(span, text)?;
        Ok(covered)
    }

    fn set_text(&self, uri: &Url, text: &str) -> Result<(), MutationError> {
        let mut doc = self.documents.get_mut(uri).ok_or(MutationError::Closed)?;
        doc.set_text(text)
    }
}
