use std::sync::Arc;

use shared::{
    domain::BoardList,
    error::{ApiError, ErrorCode},
    protocol::{BoardDocument, WriteResult},
};
use storage::{BoardRepository, StoredBoard};
use tracing::{error, info};

pub const DEFAULT_BOARD_NAME: &str = "nepa-grl";

#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn BoardRepository>,
    pub board_name: String,
}

impl ApiContext {
    pub fn new(store: Arc<dyn BoardRepository>, board_name: impl Into<String>) -> Self {
        Self {
            store,
            board_name: board_name.into(),
        }
    }
}

/// Loads the singleton board. An absent document is an empty board.
pub async fn fetch_board(ctx: &ApiContext) -> Result<BoardDocument, ApiError> {
    let stored = ctx
        .store
        .fetch_board(&ctx.board_name)
        .await
        .map_err(|err| internal("fetch board", err))?;
    Ok(stored.map(into_document).unwrap_or_else(BoardDocument::empty))
}

/// Overwrites the singleton board's lists, creating the board if needed.
pub async fn replace_board(ctx: &ApiContext, lists: &[BoardList]) -> Result<WriteResult, ApiError> {
    let result = ctx
        .store
        .replace_board_lists(&ctx.board_name, lists)
        .await
        .map_err(|err| internal("replace board", err))?;
    info!(
        board = %ctx.board_name,
        lists = lists.len(),
        cards = lists.iter().map(|list| list.cards.len()).sum::<usize>(),
        upserted = result.upserted_count,
        "board saved"
    );
    Ok(result)
}

pub async fn health(ctx: &ApiContext) -> Result<(), ApiError> {
    ctx.store.health_check().await.map_err(|err| {
        error!(error = %format!("{err:#}"), "health check failed");
        ApiError::new(ErrorCode::Unavailable, "database unavailable")
    })
}

fn into_document(board: StoredBoard) -> BoardDocument {
    BoardDocument {
        name: Some(board.name),
        lists: board.lists,
        updated_at: Some(board.updated_at),
    }
}

fn internal(operation: &str, err: anyhow::Error) -> ApiError {
    error!(operation, error = %format!("{err:#}"), "database error");
    ApiError::internal(format!("{err:#}"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
