use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Serialize;

use driverdesk_atoms::boards::{self, Board};
use driverdesk_atoms::error::AtomResult;
use driverdesk_atoms::http::respond;
use driverdesk_atoms::tasks::{self, StatusColumns};
use driverdesk_atoms::Repositories;

/// A board with its tasks already split into the five status columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumnsView {
    pub board: Board,
    pub columns: StatusColumns,
}

pub async fn board_columns(repos: &Repositories, user_id: &str, board_id: &str) -> AtomResult<BoardColumnsView> {
    let columns = tasks::service::load_columns(repos, user_id, board_id).await?;
    let mut board = boards::service::get_board(repos, user_id, board_id).await?;
    board.task_count = u32::try_from(columns.len()).unwrap_or(u32::MAX);
    Ok(BoardColumnsView { board, columns })
}

/// GET /api/boards/{id}/columns
pub async fn board_columns_handler(
    repos: &Repositories,
    user_id: &str,
    board_id: &str,
) -> Result<Response<Body>, Error> {
    respond(board_columns(repos, user_id, board_id).await, StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use driverdesk_atoms::boards::CreateBoardPayload;
    use driverdesk_atoms::tasks::{CreateTaskPayload, TaskStatus};

    #[tokio::test]
    async fn view_has_every_column_and_a_matching_count() {
        let repos = Repositories::in_memory();
        let board = boards::service::create_board(
            &repos,
            "driver-1",
            CreateBoardPayload {
                name: "Week 42".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        for (title, status) in [("Renew plates", TaskStatus::Todo), ("Oil change", TaskStatus::Pending)] {
            tasks::service::create_task(
                &repos,
                "driver-1",
                &board.board_id,
                CreateTaskPayload {
                    title: title.into(),
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }

        let view = board_columns(&repos, "driver-1", &board.board_id).await.unwrap();
        assert_eq!(view.board.task_count, 2);
        assert_eq!(view.columns.iter().count(), 5);
        assert_eq!(view.columns.column(TaskStatus::Pending)[0].title, "Oil change");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["columns"]["DONE"], serde_json::json!([]));
        assert_eq!(json["board"]["name"], "Week 42");
    }
}
