use std::collections::HashMap;
use std::sync::Arc;

use driverdesk_atoms::storage::MemoryObjectStore;
use driverdesk_shared::auth::StaticVerifier;
use driverdesk_shared::{AppState, Config};
use lambda_http::http::{Method, StatusCode};
use lambda_http::{Body, Request, RequestExt};
use rstest::rstest;
use serde_json::{json, Value};

use crate::http_handler::function_handler;

const ORIGIN: &str = "https://app.driverdesk.io";

struct Harness {
    state: Arc<AppState>,
    objects: Arc<MemoryObjectStore>,
}

fn harness() -> Harness {
    let objects = Arc::new(MemoryObjectStore::with_secret("driverdesk-documents", b"test".to_vec()));
    let verifier = StaticVerifier::new().with("token-1", "driver-1").with("token-2", "driver-2");
    let state = AppState::in_memory(Config::local(), objects.clone(), Arc::new(verifier));
    Harness {
        state: Arc::new(state),
        objects,
    }
}

fn request(method: Method, path: &str, token: Option<&str>, body: Option<Value>) -> Request {
    let mut builder = lambda_http::http::Request::builder()
        .method(method)
        .uri(format!("https://api.driverdesk.io{}", path))
        .header("Origin", ORIGIN);
    if let Some(token) = token {
        builder = builder.header("Cookie", format!("access_token={}", token));
    }
    let body = body.map(|b| Body::from(b.to_string())).unwrap_or(Body::Empty);
    builder.body(body).unwrap()
}

fn with_query(req: Request, pairs: &[(&str, &str)]) -> Request {
    let params: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    req.with_query_string_parameters(params)
}

impl Harness {
    async fn call(&self, req: Request) -> (StatusCode, Value) {
        let resp = function_handler(req, self.state.clone()).await.unwrap();
        assert_eq!(
            resp.headers()
                .get("Access-Control-Allow-Origin")
                .and_then(|v| v.to_str().ok()),
            Some(ORIGIN),
            "every response carries CORS headers"
        );
        let status = resp.status();
        let bytes: &[u8] = resp.body();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(bytes).unwrap()
        };
        (status, value)
    }

    async fn create_board(&self, token: &str, name: &str) -> String {
        let (status, board) = self
            .call(request(Method::POST, "/api/boards", Some(token), Some(json!({ "name": name }))))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        board["boardId"].as_str().unwrap().to_string()
    }

    async fn create_task(&self, board_id: &str, title: &str) -> String {
        let (status, task) = self
            .call(request(
                Method::POST,
                &format!("/api/boards/{}/tasks", board_id),
                Some("token-1"),
                Some(json!({ "title": title })),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        task["taskId"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn preflight_answers_without_session() {
    let h = harness();
    let (status, body) = h.call(request(Method::OPTIONS, "/api/boards", None, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[rstest]
#[case(Method::GET, "/api/nowhere")]
#[case(Method::GET, "/health")]
#[case(Method::DELETE, "/api/boards")]
#[tokio::test]
async fn unknown_routes_are_404(#[case] method: Method, #[case] path: &str) {
    let h = harness();
    let (status, body) = h.call(request(method, path, Some("token-1"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");
}

#[tokio::test]
async fn private_routes_need_a_session() {
    let h = harness();
    for path in ["/api/boards", "/api/documents", "/api/vehicles", "/api/users/me"] {
        let (status, body) = h.call(request(Method::GET, path, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", path);
        assert_eq!(body["error"], "Unauthorized");
    }
    let (status, _) = h.call(request(Method::GET, "/api/boards", Some("forged"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_company_validates_then_creates() {
    let h = harness();
    let payload = json!({
        "name": "QuickHaul",
        "serviceVertical": ["Food Delivery"],
        "contractType": "Independent Contractor",
        "state": ["CA", "NV"],
    });

    let (status, _) = h
        .call(request(Method::POST, "/api/companies", None, Some(payload.clone())))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = h
        .call(request(
            Method::POST,
            "/api/companies",
            Some("token-1"),
            Some(json!({ "name": "QuickHaul" })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields: serviceVertical, contractType");

    let (status, company) = h
        .call(request(Method::POST, "/api/companies", Some("token-1"), Some(payload)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(company["name"], "QuickHaul");

    let id = company["companyId"].as_str().unwrap();
    let (status, fetched) = h
        .call(request(Method::GET, &format!("/api/companies/{}", id), None, None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["userStatus"], Value::Null);
}

#[tokio::test]
async fn company_search_is_public_and_paginated() {
    let h = harness();
    for name in ["Alpha", "Bravo", "Charlie", "Delta", "Echo"] {
        let (status, _) = h
            .call(request(
                Method::POST,
                "/api/companies",
                Some("token-1"),
                Some(json!({
                    "name": name,
                    "serviceVertical": "Rideshare",
                    "contractType": "Independent Contractor",
                })),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let req = with_query(
        request(Method::GET, "/api/companies", None, None),
        &[("page", "2"), ("limit", "2")],
    );
    let (status, page) = h.call(req).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = page["companies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Charlie", "Delta"]);
    assert_eq!(page["pagination"]["totalCount"], 5);
    assert_eq!(page["pagination"]["totalPages"], 3);
    assert_eq!(page["pagination"]["hasNextPage"], true);
    assert_eq!(page["pagination"]["hasPrevPage"], true);

    let bad = with_query(request(Method::GET, "/api/companies", None, None), &[("page", "0")]);
    assert_eq!(h.call(bad).await.0, StatusCode::BAD_REQUEST);

    let anonymous_status = with_query(
        request(Method::GET, "/api/companies", None, None),
        &[("userStatus", "INTERESTED")],
    );
    assert_eq!(h.call(anonymous_status).await.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn company_status_is_per_user() {
    let h = harness();
    let (_, company) = h
        .call(request(
            Method::POST,
            "/api/companies",
            Some("token-1"),
            Some(json!({ "name": "Roadies", "serviceVertical": "Courier", "contractType": "W2" })),
        ))
        .await;
    let id = company["companyId"].as_str().unwrap().to_string();
    let status_path = format!("/api/companies/{}/status", id);

    let (status, _) = h
        .call(request(Method::PUT, &status_path, Some("token-1"), Some(json!({ "status": "APPLIED" }))))
        .await;
    assert_eq!(status, StatusCode::OK);

    let mine = with_query(
        request(Method::GET, "/api/companies", Some("token-1"), None),
        &[("userStatus", "APPLIED")],
    );
    let (_, page) = h.call(mine).await;
    assert_eq!(page["companies"][0]["userStatus"], "APPLIED");

    let theirs = with_query(
        request(Method::GET, "/api/companies", Some("token-2"), None),
        &[("userStatus", "APPLIED")],
    );
    let (_, page) = h.call(theirs).await;
    assert_eq!(page["pagination"]["totalCount"], 0);

    let (status, _) = h.call(request(Method::DELETE, &status_path, Some("token-1"), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn move_endpoint_reorders_column() {
    let h = harness();
    let board_id = h.create_board("token-1", "This week").await;
    let mut ids = Vec::new();
    for title in ["Wash car", "Renew license", "File taxes"] {
        ids.push(h.create_task(&board_id, title).await);
    }

    let (status, moved) = h
        .call(request(
            Method::POST,
            &format!("/api/boards/{}/tasks/{}/move", board_id, ids[2]),
            Some("token-1"),
            Some(json!({ "status": "TODO", "position": 0 })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["position"], 0);

    let (status, view) = h
        .call(request(
            Method::GET,
            &format!("/api/boards/{}/columns", board_id),
            Some("token-1"),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = view["columns"]["TODO"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["File taxes", "Wash car", "Renew license"]);
    assert_eq!(view["board"]["taskCount"], 3);

    let (status, _) = h
        .call(request(
            Method::POST,
            &format!("/api/boards/{}/tasks/{}/move", board_id, ids[0]),
            Some("token-1"),
            Some(json!({ "status": "SHIPPED", "position": 0 })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn boards_are_private_to_their_owner() {
    let h = harness();
    let board_id = h.create_board("token-1", "Mine").await;
    let (status, _) = h
        .call(request(Method::GET, &format!("/api/boards/{}", board_id), Some("token-2"), None))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn document_upload_round_trip() {
    let h = harness();
    let (status, slot) = h
        .call(request(
            Method::POST,
            "/api/documents/upload-url",
            Some("token-1"),
            Some(json!({
                "fileName": "Driver License.PDF",
                "fileType": "application/pdf",
                "category": "LICENSE",
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let upload_url = slot["uploadUrl"].as_str().unwrap();
    let file_key = slot["fileKey"].as_str().unwrap();
    let record_id = slot["recordId"].as_str().unwrap();
    assert!(file_key.starts_with("documents/driver-1/license/"));

    h.objects
        .put(upload_url, "application/pdf", b"%PDF-1.7 license".to_vec())
        .unwrap();

    let (status, doc) = h
        .call(request(
            Method::PATCH,
            &format!("/api/documents/{}", record_id),
            Some("token-1"),
            Some(json!({ "fileKey": file_key })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["status"], "UPLOADED");

    let (status, view) = h
        .call(request(
            Method::GET,
            &format!("/api/documents/{}/view-url", record_id),
            Some("token-1"),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (content_type, bytes) = h.objects.get(view["url"].as_str().unwrap()).unwrap();
    assert_eq!(content_type, "application/pdf");
    assert_eq!(bytes, b"%PDF-1.7 license");

    // Another driver cannot see the record.
    let (status, _) = h
        .call(request(
            Method::GET,
            &format!("/api/documents/{}/download-url", record_id),
            Some("token-2"),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let list = with_query(
        request(Method::GET, "/api/documents", Some("token-1"), None),
        &[("category", "license")],
    );
    let (_, docs) = h.call(list).await;
    assert_eq!(docs.as_array().unwrap().len(), 1);

    let (status, _) = h
        .call(request(
            Method::DELETE,
            &format!("/api/documents/{}", record_id),
            Some("token-1"),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(!h.objects.contains(file_key));
}

#[tokio::test]
async fn confirming_before_upload_is_rejected_and_unlisted() {
    let h = harness();
    let (_, slot) = h
        .call(request(
            Method::POST,
            "/api/documents/upload-url",
            Some("token-1"),
            Some(json!({
                "fileName": "license.jpg",
                "fileType": "image/jpeg",
                "category": "LICENSE",
            })),
        ))
        .await;
    let record_id = slot["recordId"].as_str().unwrap();

    let (status, body) = h
        .call(request(
            Method::PATCH,
            &format!("/api/documents/{}", record_id),
            Some("token-1"),
            Some(json!({ "fileKey": slot["fileKey"] })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "File has not been uploaded yet");

    let (_, docs) = h.call(request(Method::GET, "/api/documents", Some("token-1"), None)).await;
    assert!(docs.as_array().unwrap().is_empty());

    let (_, onboarding) = h
        .call(request(Method::GET, "/api/users/me/onboarding", Some("token-1"), None))
        .await;
    let license = onboarding["steps"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["step"] == "LICENSE_UPLOADED")
        .unwrap();
    assert_eq!(license["completed"], false);
}

#[tokio::test]
async fn filter_options_are_public() {
    let h = harness();
    let (status, options) = h.call(request(Method::GET, "/api/companies/filters", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(options["contractType"].as_array().unwrap().last().unwrap(), "Other");
    assert!(options.get("state").is_some());
}

#[tokio::test]
async fn disallowed_upload_type_is_rejected() {
    let h = harness();
    let (status, body) = h
        .call(request(
            Method::POST,
            "/api/documents/upload-url",
            Some("token-1"),
            Some(json!({
                "fileName": "setup.exe",
                "fileType": "application/x-msdownload",
                "category": "LICENSE",
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");
}

#[tokio::test]
async fn profile_and_onboarding() {
    let h = harness();
    let (status, _) = h
        .call(request(Method::GET, "/api/users/me", Some("token-1"), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, profile) = h
        .call(request(
            Method::POST,
            "/api/users",
            Some("token-1"),
            Some(json!({ "email": "sam@example.com" })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(profile["userId"], "driver-1");

    let (status, progress) = h
        .call(request(Method::GET, "/api/users/me/onboarding", Some("token-1"), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["totalSteps"], 6);
}
