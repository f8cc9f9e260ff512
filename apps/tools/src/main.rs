use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::{
    domain::sample_lists,
    protocol::{BoardDocument, ReplaceListsRequest},
};
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/board.db")]
    database_url: String,
    #[arg(long, default_value = "nepa-grl")]
    board: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stored board document as JSON.
    Show,
    /// Overwrite the board with the starter lists.
    Seed,
    /// Delete the board document.
    Reset,
    Export {
        path: PathBuf,
    },
    /// Replace the board's lists from a `{"lists": [...]}` file.
    Import {
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;
    let output = run(&storage, &cli.board, cli.command).await?;
    println!("{output}");
    Ok(())
}

async fn run(storage: &Storage, board: &str, command: Command) -> Result<String> {
    match command {
        Command::Show => {
            let document = load_document(storage, board).await?;
            Ok(serde_json::to_string_pretty(&document)?)
        }
        Command::Seed => {
            let result = storage.replace_board_lists(board, &sample_lists()).await?;
            Ok(format!(
                "seeded board '{board}' (upserted={})",
                result.upserted_count
            ))
        }
        Command::Reset => {
            if storage.delete_board(board).await? {
                Ok(format!("deleted board '{board}'"))
            } else {
                Ok(format!("board '{board}' did not exist"))
            }
        }
        Command::Export { path } => {
            let document = load_document(storage, board).await?;
            let export = ReplaceListsRequest {
                lists: document.lists,
            };
            fs::write(&path, serde_json::to_vec_pretty(&export)?)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            Ok(format!(
                "exported {} lists to {}",
                export.lists.len(),
                path.display()
            ))
        }
        Command::Import { path } => {
            let raw = fs::read(&path)
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            let import: ReplaceListsRequest = serde_json::from_slice(&raw)
                .with_context(|| format!("'{}' is not a board export", path.display()))?;
            storage.replace_board_lists(board, &import.lists).await?;
            Ok(format!(
                "imported {} lists into board '{board}'",
                import.lists.len()
            ))
        }
    }
}

async fn load_document(storage: &Storage, board: &str) -> Result<BoardDocument> {
    Ok(storage
        .fetch_board(board)
        .await?
        .map(|stored| BoardDocument {
            name: Some(stored.name),
            lists: stored.lists,
            updated_at: Some(stored.updated_at),
        })
        .unwrap_or_else(BoardDocument::empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seed_export_reset_import_cycle() {
        let storage = Storage::new("sqlite::memory:").await.expect("db");
        let dir = tempfile::tempdir().expect("tempdir");
        let export_path = dir.path().join("board.json");

        run(&storage, "nepa-grl", Command::Seed).await.expect("seed");
        run(
            &storage,
            "nepa-grl",
            Command::Export {
                path: export_path.clone(),
            },
        )
        .await
        .expect("export");

        let reset = run(&storage, "nepa-grl", Command::Reset).await.expect("reset");
        assert!(reset.contains("deleted"));
        assert!(storage.fetch_board("nepa-grl").await.expect("fetch").is_none());

        run(
            &storage,
            "nepa-grl",
            Command::Import {
                path: export_path,
            },
        )
        .await
        .expect("import");
        let stored = storage
            .fetch_board("nepa-grl")
            .await
            .expect("fetch")
            .expect("board");
        assert_eq!(stored.lists, sample_lists());
    }

    #[tokio::test]
    async fn show_on_empty_database_prints_empty_lists() {
        let storage = Storage::new("sqlite::memory:").await.expect("db");
        let out = run(&storage, "nepa-grl", Command::Show).await.expect("show");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value, serde_json::json!({ "lists": [] }));
    }

    #[tokio::test]
    async fn import_rejects_non_board_file() {
        let storage = Storage::new("sqlite::memory:").await.expect("db");
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("junk.json");
        fs::write(&path, b"[1, 2, 3]").expect("write");

        let err = run(&storage, "nepa-grl", Command::Import { path })
            .await
            .expect_err("should fail");
        assert!(err.to_string().contains("not a board export"));
    }
}
