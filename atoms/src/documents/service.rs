//! Two-phase document uploads.
//!
//! 1. `request_upload_slot` stores a `PENDING_UPLOAD` record and returns a
//!    signed PUT URL scoped to one object key.
//! 2. The client PUTs the bytes straight to storage.
//! 3. `update_document` with the issued `fileKey` marks the record `UPLOADED`
//!    once the object is actually in storage.
//!
//! Only uploaded records are listed. Reads always go through short-lived
//! signed GET URLs.

use chrono::Utc;

use super::model::{
    normalize_content_type, object_key, sanitize_file_name, Document, DocumentFilter, DocumentStatus, SignedUrl,
    UpdateDocumentPayload, UploadSlot, UploadSlotRequest,
};
use crate::error::{AtomError, AtomResult};
use crate::storage::{Disposition, ObjectStore, UrlPolicy};
use crate::store::Repositories;
use crate::tasks::model::non_blank;

async fn ensure_vehicle(repos: &Repositories, user_id: &str, vehicle_id: Option<String>) -> AtomResult<Option<String>> {
    let Some(vehicle_id) = non_blank(vehicle_id) else {
        return Ok(None);
    };
    repos
        .vehicles
        .get_vehicle(user_id, &vehicle_id)
        .await?
        .ok_or_else(|| AtomError::validation(format!("vehicle {} does not exist", vehicle_id)))?;
    Ok(Some(vehicle_id))
}

pub async fn request_upload_slot(
    repos: &Repositories,
    objects: &dyn ObjectStore,
    policy: &UrlPolicy,
    user_id: &str,
    request: UploadSlotRequest,
) -> AtomResult<UploadSlot> {
    if request.file_name.trim().is_empty() {
        return Err(AtomError::validation("fileName is required"));
    }
    let content_type = normalize_content_type(&request.file_type)?;
    let vehicle_id = ensure_vehicle(repos, user_id, request.vehicle_id).await?;

    let document_id = uuid::Uuid::new_v4().to_string();
    let file_name = sanitize_file_name(&request.file_name, &content_type);
    let file_key = object_key(user_id, request.category, &document_id, &file_name);

    let upload_url = objects
        .presign_upload(&file_key, &content_type, policy.upload_ttl)
        .await?;

    let now = Utc::now();
    let document = Document {
        document_id: document_id.clone(),
        user_id: user_id.to_string(),
        category: request.category,
        file_name,
        content_type,
        file_url: objects.object_url(&file_key),
        file_key: file_key.clone(),
        status: DocumentStatus::PendingUpload,
        vehicle_id,
        document_type: non_blank(request.document_type),
        expires_on: request.expires_on,
        uploaded_at: None,
        created_at: now,
        updated_at: now,
    };
    repos.documents.put_document(&document).await?;
    tracing::info!(document_id = %document_id, user_id, category = %request.category, "📎 upload slot issued");

    Ok(UploadSlot {
        upload_url,
        file_url: document.file_url,
        file_key,
        record_id: document_id,
        expires_in: policy.upload_ttl.as_secs(),
    })
}

/// The caller's uploaded documents, newest first. Slots that were never
/// confirmed stay hidden.
pub async fn list_documents(repos: &Repositories, user_id: &str, filter: &DocumentFilter) -> AtomResult<Vec<Document>> {
    let mut docs = repos.documents.list_documents(user_id).await?;
    docs.retain(|d| d.status == DocumentStatus::Uploaded && filter.matches(d));
    docs.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.document_id.cmp(&b.document_id))
    });
    Ok(docs)
}

pub async fn get_document(repos: &Repositories, user_id: &str, document_id: &str) -> AtomResult<Document> {
    repos
        .documents
        .get_document(user_id, document_id)
        .await?
        .ok_or_else(|| AtomError::not_found("Document"))
}

/// Confirms an upload and/or edits the record's metadata.
///
/// # Errors
///
/// Confirming answers `Validation` and leaves the record pending when no
/// object is stored under the key yet.
pub async fn update_document(
    repos: &Repositories,
    objects: &dyn ObjectStore,
    user_id: &str,
    document_id: &str,
    payload: UpdateDocumentPayload,
) -> AtomResult<Document> {
    let mut doc = get_document(repos, user_id, document_id).await?;
    let now = Utc::now();

    if let Some(file_key) = payload.file_key {
        if file_key != doc.file_key {
            return Err(AtomError::validation("fileKey does not belong to this document"));
        }
        if doc.status == DocumentStatus::PendingUpload {
            if !objects.object_exists(&file_key).await? {
                tracing::warn!(document_id, user_id, "confirm before the object was stored");
                return Err(AtomError::validation("File has not been uploaded yet"));
            }
            doc.status = DocumentStatus::Uploaded;
            doc.uploaded_at = Some(now);
            tracing::info!(document_id, user_id, "✅ upload confirmed");
        }
    }
    if let Some(document_type) = payload.document_type {
        doc.document_type = non_blank(Some(document_type));
    }
    if let Some(expires_on) = payload.expires_on {
        doc.expires_on = Some(expires_on);
    }
    if let Some(vehicle_id) = payload.vehicle_id {
        doc.vehicle_id = ensure_vehicle(repos, user_id, Some(vehicle_id)).await?;
    }
    doc.updated_at = now;

    repos.documents.put_document(&doc).await?;
    Ok(doc)
}

/// Signed URL for displaying the file in the browser.
pub async fn view_url(
    repos: &Repositories,
    objects: &dyn ObjectStore,
    policy: &UrlPolicy,
    user_id: &str,
    document_id: &str,
) -> AtomResult<SignedUrl> {
    let doc = get_document(repos, user_id, document_id).await?;
    let url = objects
        .presign_download(&doc.file_key, policy.download_ttl, &Disposition::Inline)
        .await?;
    Ok(SignedUrl {
        url,
        expires_in: policy.download_ttl.as_secs(),
    })
}

/// Signed URL that makes the browser save the file under its name.
pub async fn download_url(
    repos: &Repositories,
    objects: &dyn ObjectStore,
    policy: &UrlPolicy,
    user_id: &str,
    document_id: &str,
) -> AtomResult<SignedUrl> {
    let doc = get_document(repos, user_id, document_id).await?;
    let disposition = Disposition::Attachment {
        file_name: doc.file_name.clone(),
    };
    let url = objects
        .presign_download(&doc.file_key, policy.download_ttl, &disposition)
        .await?;
    Ok(SignedUrl {
        url,
        expires_in: policy.download_ttl.as_secs(),
    })
}

/// Deletes the stored object first, then the record, so a failed object
/// delete leaves the record in place to retry.
pub async fn delete_document(
    repos: &Repositories,
    objects: &dyn ObjectStore,
    user_id: &str,
    document_id: &str,
) -> AtomResult<()> {
    let doc = get_document(repos, user_id, document_id).await?;
    objects.delete_object(&doc.file_key).await?;
    repos.documents.delete_document(user_id, document_id).await?;
    tracing::info!(document_id, user_id, "document deleted");
    Ok(())
}
