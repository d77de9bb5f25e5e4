use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AtomError, AtomResult, ParseEnumError};

pub const MAX_FILE_NAME_LEN: usize = 120;

/// Content types a driver may upload, with the extension used when the
/// submitted file name has none.
pub const ALLOWED_CONTENT_TYPES: [(&str, &str); 5] = [
    ("application/pdf", "pdf"),
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/heic", "heic"),
    ("image/webp", "webp"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentCategory {
    BusinessDocument,
    VehicleDocument,
    License,
    Certification,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 4] = [
        DocumentCategory::BusinessDocument,
        DocumentCategory::VehicleDocument,
        DocumentCategory::License,
        DocumentCategory::Certification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::BusinessDocument => "BUSINESS_DOCUMENT",
            DocumentCategory::VehicleDocument => "VEHICLE_DOCUMENT",
            DocumentCategory::License => "LICENSE",
            DocumentCategory::Certification => "CERTIFICATION",
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError {
                kind: "document category",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    /// Slot issued, bytes not confirmed yet.
    PendingUpload,
    Uploaded,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::PendingUpload => "PENDING_UPLOAD",
            DocumentStatus::Uploaded => "UPLOADED",
        }
    }
}

impl FromStr for DocumentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [DocumentStatus::PendingUpload, DocumentStatus::Uploaded]
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError {
                kind: "document status",
                value: s.to_string(),
            })
    }
}

/// Metadata record of one uploaded (or pending) file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub document_id: String,
    pub user_id: String,
    pub category: DocumentCategory,
    pub file_name: String,
    pub content_type: String,
    pub file_key: String,
    /// Unsigned locator; reading it requires a signed URL.
    pub file_url: String,
    pub status: DocumentStatus,
    pub vehicle_id: Option<String>,
    pub document_type: Option<String>,
    pub expires_on: Option<NaiveDate>,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlotRequest {
    pub file_name: String,
    #[serde(alias = "mimeType", alias = "contentType")]
    pub file_type: String,
    pub category: DocumentCategory,
    pub vehicle_id: Option<String>,
    pub document_type: Option<String>,
    pub expires_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlot {
    pub upload_url: String,
    pub file_key: String,
    pub file_url: String,
    pub record_id: String,
    /// Seconds the upload URL stays valid.
    pub expires_in: u64,
}

/// Confirmation and metadata edits. `fileKey`, when sent, must be the key
/// issued with the slot and marks the upload as complete.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentPayload {
    pub file_key: Option<String>,
    pub document_type: Option<String>,
    pub expires_on: Option<NaiveDate>,
    pub vehicle_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrl {
    pub url: String,
    pub expires_in: u64,
}

/// `GET /api/documents` filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    pub category: Option<DocumentCategory>,
    pub vehicle_id: Option<String>,
}

impl DocumentFilter {
    pub fn from_params<'a, F>(get: F) -> AtomResult<Self>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let category = match get("category").map(str::trim).filter(|c| !c.is_empty()) {
            Some(raw) => Some(raw.parse()?),
            None => None,
        };
        Ok(Self {
            category,
            vehicle_id: get("vehicleId")
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        })
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.category.map_or(true, |c| doc.category == c)
            && self
                .vehicle_id
                .as_deref()
                .map_or(true, |v| doc.vehicle_id.as_deref() == Some(v))
    }
}

/// Lowercases and checks a submitted content type.
pub fn normalize_content_type(raw: &str) -> AtomResult<String> {
    let lowered = raw.trim().to_ascii_lowercase();
    let canonical = match lowered.as_str() {
        "image/jpg" | "image/pjpeg" => "image/jpeg",
        other => other,
    };
    ALLOWED_CONTENT_TYPES
        .iter()
        .find(|(ct, _)| *ct == canonical)
        .map(|(ct, _)| ct.to_string())
        .ok_or_else(|| {
            AtomError::validation(format!(
                "file type {} is not allowed; use PDF, JPEG, PNG, HEIC or WEBP",
                raw.trim()
            ))
        })
}

/// Turns a user-supplied file name into a safe object key segment.
pub fn sanitize_file_name(raw: &str, content_type: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let mut out = String::with_capacity(base.len());
    for c in base.trim().chars() {
        let c = if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    let mut name: String = out.trim_start_matches(['.', '_']).chars().take(MAX_FILE_NAME_LEN).collect();

    if name.is_empty() || name.chars().all(|c| c == '.' || c == '_') {
        name = "file".to_string();
    }
    if !name.contains('.') {
        if let Some((_, ext)) = ALLOWED_CONTENT_TYPES.iter().find(|(ct, _)| *ct == content_type) {
            name = format!("{name}.{ext}");
        }
    }
    name
}

pub fn object_key(user_id: &str, category: DocumentCategory, record_id: &str, file_name: &str) -> String {
    format!("documents/{}/{}/{}/{}", user_id, category.as_str().to_ascii_lowercase(), record_id, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("application/pdf", "application/pdf")]
    #[case(" IMAGE/JPG ", "image/jpeg")]
    #[case("image/webp", "image/webp")]
    fn accepts_allowed_types(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_content_type(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("application/zip")]
    #[case("text/html")]
    #[case("")]
    fn rejects_other_types(#[case] raw: &str) {
        assert!(matches!(normalize_content_type(raw), Err(AtomError::Validation(_))));
    }

    #[rstest]
    #[case("Driver License (front).jpg", "image/jpeg", "Driver_License_front_.jpg")]
    #[case("../../etc/passwd", "application/pdf", "passwd.pdf")]
    #[case("C:\\scans\\insurance card.pdf", "application/pdf", "insurance_card.pdf")]
    #[case("???", "image/png", "file.png")]
    #[case(".hidden", "image/png", "hidden.png")]
    fn sanitizes_file_names(#[case] raw: &str, #[case] ct: &str, #[case] expected: &str) {
        assert_eq!(sanitize_file_name(raw, ct), expected);
    }

    #[test]
    fn key_layout() {
        assert_eq!(
            object_key("u1", DocumentCategory::VehicleDocument, "r1", "title.pdf"),
            "documents/u1/vehicle_document/r1/title.pdf"
        );
    }

    #[test]
    fn slot_request_accepts_mime_type_alias() {
        let req: UploadSlotRequest =
            serde_json::from_str(r#"{"fileName":"a.pdf","mimeType":"application/pdf","category":"LICENSE"}"#).unwrap();
        assert_eq!(req.file_type, "application/pdf");
        assert_eq!(req.category, DocumentCategory::License);
    }

    #[test]
    fn filter_parses_category_case_insensitively() {
        let filter = DocumentFilter::from_params(|k| (k == "category").then_some("license")).unwrap();
        assert_eq!(filter.category, Some(DocumentCategory::License));
        assert!(DocumentFilter::from_params(|k| (k == "category").then_some("selfie")).is_err());
    }
}
