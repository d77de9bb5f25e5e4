use async_trait::async_trait;

use super::model::Document;
use super::repository::DocumentRepository;
use crate::dynamo::{self, DynamoStore, Item};
use crate::error::AtomResult;

// PK = "USER#{user_id}", SK = "DOCUMENT#{document_id}"
const DOCUMENT_PREFIX: &str = "DOCUMENT#";

fn user_pk(user_id: &str) -> String {
    format!("USER#{}", user_id)
}

fn document_sk(document_id: &str) -> String {
    format!("{}{}", DOCUMENT_PREFIX, document_id)
}

fn document_to_item(doc: &Document) -> Item {
    let mut item = Item::new();
    item.insert("PK".into(), dynamo::s(user_pk(&doc.user_id)));
    item.insert("SK".into(), dynamo::s(document_sk(&doc.document_id)));
    item.insert("category".into(), dynamo::s(doc.category.as_str()));
    item.insert("file_name".into(), dynamo::s(&doc.file_name));
    item.insert("content_type".into(), dynamo::s(&doc.content_type));
    item.insert("file_key".into(), dynamo::s(&doc.file_key));
    item.insert("file_url".into(), dynamo::s(&doc.file_url));
    item.insert("status".into(), dynamo::s(doc.status.as_str()));
    item.insert("created_at".into(), dynamo::timestamp(&doc.created_at));
    item.insert("updated_at".into(), dynamo::timestamp(&doc.updated_at));
    dynamo::put_opt(&mut item, "vehicle_id", doc.vehicle_id.as_deref().map(dynamo::s));
    dynamo::put_opt(&mut item, "document_type", doc.document_type.as_deref().map(dynamo::s));
    dynamo::put_opt(
        &mut item,
        "expires_on",
        doc.expires_on.map(|d| dynamo::s(d.format("%Y-%m-%d").to_string())),
    );
    dynamo::put_opt(&mut item, "uploaded_at", doc.uploaded_at.as_ref().map(dynamo::timestamp));
    item
}

fn document_from_item(user_id: &str, item: &Item) -> Option<Document> {
    let document_id = dynamo::id_from_sk(item, DOCUMENT_PREFIX)?;
    let category = match dynamo::get_s(item, "category")?.parse() {
        Ok(category) => category,
        Err(e) => {
            tracing::warn!("⚠️ skipping document {}: {}", document_id, e);
            return None;
        }
    };
    let status = dynamo::get_s(item, "status")
        .and_then(|s| s.parse().ok())
        .unwrap_or(super::model::DocumentStatus::PendingUpload);

    Some(Document {
        document_id,
        user_id: user_id.to_string(),
        category,
        file_name: dynamo::get_s(item, "file_name").unwrap_or_default(),
        content_type: dynamo::get_s(item, "content_type").unwrap_or_default(),
        file_key: dynamo::get_s(item, "file_key").unwrap_or_default(),
        file_url: dynamo::get_s(item, "file_url").unwrap_or_default(),
        status,
        vehicle_id: dynamo::get_s(item, "vehicle_id"),
        document_type: dynamo::get_s(item, "document_type"),
        expires_on: dynamo::get_date(item, "expires_on"),
        uploaded_at: dynamo::get_s(item, "uploaded_at").map(|_| dynamo::get_timestamp(item, "uploaded_at")),
        created_at: dynamo::get_timestamp(item, "created_at"),
        updated_at: dynamo::get_timestamp(item, "updated_at"),
    })
}

#[async_trait]
impl DocumentRepository for DynamoStore {
    async fn put_document(&self, document: &Document) -> AtomResult<()> {
        self.put(document_to_item(document)).await
    }

    async fn get_document(&self, user_id: &str, document_id: &str) -> AtomResult<Option<Document>> {
        Ok(self
            .get(&user_pk(user_id), &document_sk(document_id))
            .await?
            .and_then(|item| document_from_item(user_id, &item)))
    }

    async fn list_documents(&self, user_id: &str) -> AtomResult<Vec<Document>> {
        let items = self.query_prefix(&user_pk(user_id), DOCUMENT_PREFIX).await?;
        Ok(items.iter().filter_map(|item| document_from_item(user_id, item)).collect())
    }

    async fn delete_document(&self, user_id: &str, document_id: &str) -> AtomResult<()> {
        self.delete(&user_pk(user_id), &document_sk(document_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::model::{DocumentCategory, DocumentStatus};
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn confirmed_document_round_trips() {
        let at = Utc.with_ymd_and_hms(2026, 5, 6, 7, 8, 9).unwrap();
        let doc = Document {
            document_id: "d-1".into(),
            user_id: "driver-1".into(),
            category: DocumentCategory::License,
            file_name: "license.jpg".into(),
            content_type: "image/jpeg".into(),
            file_key: "documents/driver-1/license/d-1/license.jpg".into(),
            file_url: "https://bucket.s3.amazonaws.com/documents/driver-1/license/d-1/license.jpg".into(),
            status: DocumentStatus::Uploaded,
            vehicle_id: None,
            document_type: Some("Driver license".into()),
            expires_on: NaiveDate::from_ymd_opt(2030, 1, 31),
            uploaded_at: Some(at),
            created_at: at,
            updated_at: at,
        };
        assert_eq!(document_from_item("driver-1", &document_to_item(&doc)), Some(doc));
    }
}
