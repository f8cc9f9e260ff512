use shared::domain::sample_lists;
use storage::{BoardRepository, Storage};

#[tokio::test]
async fn creates_nested_database_file_and_persists_across_reopen() {
    let temp = tempfile::tempdir().expect("tempdir");
    let db_path = temp.path().join("nested").join("board.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("open");
    storage
        .replace_board_lists("nepa-grl", &sample_lists())
        .await
        .expect("write");
    storage.pool().close().await;
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    let reopened = Storage::new(&database_url).await.expect("reopen");
    let repo: &dyn BoardRepository = &reopened;
    let board = repo
        .fetch_board("nepa-grl")
        .await
        .expect("fetch")
        .expect("board persisted");
    assert_eq!(board.lists, sample_lists());
}
