use async_trait::async_trait;

use super::model::Document;
use crate::error::AtomResult;

/// Document metadata persistence. Records are always scoped to their owner.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn put_document(&self, document: &Document) -> AtomResult<()>;

    async fn get_document(&self, user_id: &str, document_id: &str) -> AtomResult<Option<Document>>;

    async fn list_documents(&self, user_id: &str) -> AtomResult<Vec<Document>>;

    async fn delete_document(&self, user_id: &str, document_id: &str) -> AtomResult<()>;
}
