use shared::domain::{BoardList, ListId};
use storage::Storage;

fn lists_tagged(tag: i64) -> Vec<BoardList> {
    vec![BoardList::new(ListId(tag), format!("writer {tag}"))]
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_all_succeed_and_one_wins() {
    let temp = tempfile::tempdir().expect("tempdir");
    let database_url = format!(
        "sqlite://{}",
        temp.path()
            .join("board.db")
            .to_string_lossy()
            .replace('\\', "/")
    );
    let storage = Storage::new(&database_url).await.expect("open");

    for round in 0..10 {
        let name = format!("board-{round}");
        let writers: Vec<_> = (0..5)
            .map(|tag| {
                let storage = storage.clone();
                let name = name.clone();
                tokio::spawn(async move { storage.replace_board_lists(&name, &lists_tagged(tag)).await })
            })
            .collect();

        let mut inserted = 0;
        for writer in writers {
            let result = writer.await.expect("join").expect("write succeeds");
            inserted += result.upserted_count;
        }
        assert_eq!(inserted, 1, "exactly one writer creates {name}");

        let board = storage
            .fetch_board(&name)
            .await
            .expect("fetch")
            .expect("board exists");
        assert_eq!(board.lists.len(), 1);
        assert!((0..5).any(|tag| board.lists == lists_tagged(tag)));
    }
}
