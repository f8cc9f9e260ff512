use reqwest::{Client, Response};
use shared::{
    domain::BoardList,
    error::ErrorResponse,
    protocol::{BoardDocument, ReplaceListsRequest, WriteResult},
};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

const BOARDS_PATH: &str = "api/boards";

/// HTTP client for the board persistence endpoint.
#[derive(Clone)]
pub struct BoardClient {
    http: Client,
    boards_url: Url,
}

impl BoardClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(server_url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            boards_url: base.join(BOARDS_PATH)?,
        })
    }

    pub fn boards_url(&self) -> &Url {
        &self.boards_url
    }

    pub async fn fetch_board(&self) -> Result<BoardDocument, ClientError> {
        let res = self.http.get(self.boards_url.clone()).send().await?;
        let res = ensure_success(res).await?;
        let board: BoardDocument = res.json().await?;
        debug!(lists = board.lists.len(), "fetched board");
        Ok(board)
    }

    /// Overwrites the server-side board with `lists`.
    pub async fn save_lists(&self, lists: &[BoardList]) -> Result<WriteResult, ClientError> {
        let res = self
            .http
            .post(self.boards_url.clone())
            .json(&ReplaceListsRequest {
                lists: lists.to_vec(),
            })
            .send()
            .await?;
        let res = ensure_success(res).await?;
        Ok(res.json().await?)
    }
}

async fn ensure_success(res: Response) -> Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|err| err.error)
        .unwrap_or(body);
    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
