pub mod dynamo;
pub mod http;
pub mod model;
pub mod repository;
pub mod service;

pub use model::{
    Document, DocumentCategory, DocumentFilter, DocumentStatus, SignedUrl, UpdateDocumentPayload, UploadSlot,
    UploadSlotRequest,
};
pub use repository::DocumentRepository;
