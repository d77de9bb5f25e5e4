use std::sync::Arc;

use driverdesk_atoms::companies::{self, CompanyQuery};
use driverdesk_atoms::documents::{self, DocumentFilter};
use driverdesk_atoms::http::{empty_response, error_response, json_response};
use driverdesk_atoms::{boards, tasks, users, vehicles};
use driverdesk_shared::auth::{self, with_cors_headers};
use driverdesk_shared::AppState;
use kanban_block::board_columns_handler;
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, RequestExt, Response,
};

fn not_found() -> Result<Response<Body>, Error> {
    json_response(
        StatusCode::NOT_FOUND,
        &serde_json::json!({"error": "NotFound", "message": "Route not found"}),
    )
}

fn flag(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true") | Some("1"))
}

/// Main Lambda handler. Routes everything under `/api` and adds CORS headers
/// to every answer.
pub(crate) async fn function_handler(event: Request, state: Arc<AppState>) -> Result<Response<Body>, Error> {
    let request_origin = event
        .headers()
        .get("Origin")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    tracing::info!(method = %event.method(), path = event.uri().path(), "request");

    // CORS preflight
    let resp = if *event.method() == Method::OPTIONS {
        empty_response(StatusCode::NO_CONTENT)
    } else {
        route(&event, &state).await
    };

    resp.map(|r| with_cors_headers(r, &state.config.allowed_origins, request_origin.as_deref()))
}

async fn route(event: &Request, state: &AppState) -> Result<Response<Body>, Error> {
    let method = event.method().clone();
    let path = event.uri().path().to_string();
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let Some(("api", parts)) = parts.split_first().map(|(head, rest)| (*head, rest)) else {
        return not_found();
    };
    let params = event.query_string_parameters();
    let body: &[u8] = event.body();
    let repos = &state.repos;

    // Public company routes: a session only adds the caller's status.
    match (&method, parts) {
        (&Method::GET, ["companies"]) => {
            let user = auth::optional_session(state.verifier.as_ref(), event.headers()).await;
            let query = match CompanyQuery::from_params(|k| params.first(k)) {
                Ok(q) => q,
                Err(e) => return error_response(&e),
            };
            return companies::http::list_companies_handler(repos, user.as_deref(), &query).await;
        }
        (&Method::GET, ["companies", "filters"]) => return companies::http::filter_options_handler(),
        (&Method::GET, ["companies", company_id]) => {
            let user = auth::optional_session(state.verifier.as_ref(), event.headers()).await;
            return companies::http::get_company_handler(repos, user.as_deref(), company_id).await;
        }
        _ => {}
    }

    let user_id = match auth::authenticate(state.verifier.as_ref(), event.headers()).await {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };
    let user = user_id.as_str();
    let objects = state.objects.as_ref();
    let policy = state.url_policy();

    match (&method, parts) {
        // --- BOARDS ---
        (&Method::GET, ["boards"]) => {
            boards::http::list_boards_handler(repos, user, flag(params.first("includeArchived"))).await
        }
        (&Method::POST, ["boards"]) => boards::http::create_board_handler(repos, user, body).await,
        (&Method::GET, ["boards", board_id]) => boards::http::get_board_handler(repos, user, board_id).await,
        (&Method::PATCH, ["boards", board_id]) => {
            boards::http::update_board_handler(repos, user, board_id, body).await
        }
        (&Method::POST, ["boards", board_id, "archive"]) => {
            boards::http::archive_board_handler(repos, user, board_id).await
        }
        (&Method::POST, ["boards", board_id, "restore"]) => {
            boards::http::restore_board_handler(repos, user, board_id).await
        }
        (&Method::GET, ["boards", board_id, "columns"]) => board_columns_handler(repos, user, board_id).await,

        // --- TASKS ---
        (&Method::GET, ["boards", board_id, "tasks"]) => tasks::http::list_tasks_handler(repos, user, board_id).await,
        (&Method::POST, ["boards", board_id, "tasks"]) => {
            tasks::http::create_task_handler(repos, user, board_id, body).await
        }
        (&Method::GET, ["boards", board_id, "tasks", task_id]) => {
            tasks::http::get_task_handler(repos, user, board_id, task_id).await
        }
        (&Method::PATCH, ["boards", board_id, "tasks", task_id]) => {
            tasks::http::update_task_handler(repos, user, board_id, task_id, body).await
        }
        (&Method::POST, ["boards", board_id, "tasks", task_id, "move"]) => {
            tasks::http::move_task_handler(repos, user, board_id, task_id, body).await
        }

        // --- COMPANIES ---
        (&Method::POST, ["companies"]) => companies::http::create_company_handler(repos, user, body).await,
        (&Method::PUT, ["companies", company_id, "status"]) => {
            companies::http::set_company_status_handler(repos, user, company_id, body).await
        }
        (&Method::DELETE, ["companies", company_id, "status"]) => {
            companies::http::clear_company_status_handler(repos, user, company_id).await
        }

        // --- DOCUMENTS ---
        (&Method::POST, ["documents", "upload-url"]) => {
            documents::http::upload_url_handler(repos, objects, &policy, user, body).await
        }
        (&Method::GET, ["documents"]) => {
            let filter = match DocumentFilter::from_params(|k| params.first(k)) {
                Ok(f) => f,
                Err(e) => return error_response(&e),
            };
            documents::http::list_documents_handler(repos, user, &filter).await
        }
        (&Method::GET, ["documents", document_id]) => {
            documents::http::get_document_handler(repos, user, document_id).await
        }
        (&Method::PATCH, ["documents", document_id]) => {
            documents::http::update_document_handler(repos, objects, user, document_id, body).await
        }
        (&Method::GET, ["documents", document_id, "view-url"]) => {
            documents::http::view_url_handler(repos, objects, &policy, user, document_id).await
        }
        (&Method::GET, ["documents", document_id, "download-url"]) => {
            documents::http::download_url_handler(repos, objects, &policy, user, document_id).await
        }
        (&Method::DELETE, ["documents", document_id]) => {
            documents::http::delete_document_handler(repos, objects, user, document_id).await
        }

        // --- VEHICLES ---
        (&Method::GET, ["vehicles"]) => vehicles::http::list_vehicles_handler(repos, user).await,
        (&Method::POST, ["vehicles"]) => vehicles::http::create_vehicle_handler(repos, user, body).await,
        (&Method::GET, ["vehicles", vehicle_id]) => vehicles::http::get_vehicle_handler(repos, user, vehicle_id).await,
        (&Method::PATCH, ["vehicles", vehicle_id]) => {
            vehicles::http::update_vehicle_handler(repos, user, vehicle_id, body).await
        }
        (&Method::DELETE, ["vehicles", vehicle_id]) => {
            vehicles::http::delete_vehicle_handler(repos, user, vehicle_id).await
        }

        // --- USERS ---
        (&Method::POST, ["users"]) => users::http::create_profile_handler(repos, user, body).await,
        (&Method::GET, ["users", "me"]) => users::http::get_profile_handler(repos, user).await,
        (&Method::PATCH, ["users", "me"]) => users::http::update_profile_handler(repos, user, body).await,
        (&Method::GET, ["users", "me", "onboarding"]) => users::http::onboarding_handler(repos, user).await,

        _ => {
            tracing::warn!(method = %method, path = %path, "no route");
            not_found()
        }
    }
}

