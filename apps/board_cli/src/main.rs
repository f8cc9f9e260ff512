use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use client_core::{BoardClient, BoardView, CardUpdate};
use shared::domain::{CardId, ListId, Priority};
use tracing::info;

mod render;

#[derive(Parser, Debug)]
#[command(about = "Edit the kanban board from the terminal")]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// Print the board.
    Show,
    AddList {
        title: String,
    },
    RenameList {
        list_id: i64,
        title: String,
    },
    DeleteList {
        list_id: i64,
    },
    AddCard {
        list_id: i64,
        text: String,
    },
    DeleteCard {
        card_id: String,
    },
    EditCard {
        card_id: String,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        /// Due date as YYYY-MM-DD, or "none" to clear it.
        #[arg(long)]
        due: Option<String>,
    },
    /// Move a card, as if dragged onto position `index` of `to_list`.
    MoveCard {
        card_id: String,
        #[arg(long)]
        to_list: i64,
        /// Defaults to the end of the target list.
        #[arg(long)]
        index: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let client = BoardClient::new(&args.server_url)?;
    let board = client
        .fetch_board()
        .await
        .with_context(|| format!("failed to load board from {}", client.boards_url()))?;
    let mut view = BoardView::new(board.lists);

    let changed = apply(&mut view, &args.command)?;
    print!("{}", render::render_board(view.lists(), Local::now().date_naive()));

    if args.command == Command::Show {
        return Ok(());
    }
    if !changed {
        println!("nothing changed; board not saved");
        return Ok(());
    }

    let result = client.save_lists(view.lists()).await?;
    info!(
        matched = result.matched_count,
        upserted = result.upserted_count,
        "board saved"
    );
    println!("saved");
    Ok(())
}

/// Applies one command to the local board. Returns whether anything changed.
fn apply(view: &mut BoardView, command: &Command) -> Result<bool> {
    let changed = match command {
        Command::Show => false,
        Command::AddList { title } => view.add_list(title).is_some(),
        Command::RenameList { list_id, title } => {
            let list_id = existing_list(view, *list_id)?;
            view.begin_list_rename(list_id);
            view.commit_list_rename(list_id, title)
        }
        Command::DeleteList { list_id } => view.delete_list(existing_list(view, *list_id)?),
        Command::AddCard { list_id, text } => {
            let list_id = existing_list(view, *list_id)?;
            view.set_new_card_text(list_id, text.as_str());
            view.submit_new_card(list_id).is_some()
        }
        Command::DeleteCard { card_id } => {
            let card_id = CardId::from(card_id.as_str());
            let slot = view
                .locate_card(&card_id)
                .ok_or_else(|| anyhow!("no card with id '{card_id}'"))?;
            view.delete_card(slot.list_id, &card_id)
        }
        Command::EditCard {
            card_id,
            text,
            description,
            priority,
            due,
        } => {
            let card_id = CardId::from(card_id.as_str());
            let slot = view
                .locate_card(&card_id)
                .ok_or_else(|| anyhow!("no card with id '{card_id}'"))?;
            let update = CardUpdate {
                text: text.clone(),
                description: description.clone(),
                priority: priority.clone(),
                due_date: due.as_deref().map(parse_due).transpose()?,
            };
            if update.is_empty() {
                bail!("edit-card needs at least one of --text, --description, --priority, --due");
            }
            view.toggle_card_editing(&card_id);
            view.update_card(slot.list_id, &card_id, update)
        }
        Command::MoveCard {
            card_id,
            to_list,
            index,
        } => {
            let card_id = CardId::from(card_id.as_str());
            let from = view
                .locate_card(&card_id)
                .ok_or_else(|| anyhow!("no card with id '{card_id}'"))?;
            let to_list = existing_list(view, *to_list)?;
            let tail = view.list(to_list).map_or(0, |list| list.cards.len());
            let index = index.unwrap_or(tail);

            view.start_drag(from.list_id, from.index);
            view.drag_over(to_list, index);
            view.drop_on(to_list, index)
        }
    };
    Ok(changed)
}

fn existing_list(view: &BoardView, list_id: i64) -> Result<ListId> {
    let list_id = ListId(list_id);
    if view.list(list_id).is_none() {
        bail!("no list with id {list_id}");
    }
    Ok(list_id)
}

fn parse_due(raw: &str) -> Result<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .with_context(|| format!("invalid due date '{raw}', expected YYYY-MM-DD"))
}
