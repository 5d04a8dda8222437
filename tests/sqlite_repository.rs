use roundcast::domain::repositories::RoundRepository;
use roundcast::domain::round::Round;
use roundcast::infrastructure::persistence::{Database, SqliteRoundRepository};

async fn repository() -> SqliteRoundRepository {
    let db = Database::new("sqlite::memory:").await.unwrap();
    SqliteRoundRepository::new(db.pool)
}

#[tokio::test]
async fn test_save_all_then_load_recent_window() {
    let repo = repository().await;
    let rounds: Vec<Round> = (100..=139)
        .map(|id| Round::new(id, (id % 10) as u8).unwrap())
        .collect();
    repo.save_all(&rounds).await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 40);

    let recent = repo.load_recent(5).await.unwrap();
    let ids: Vec<u64> = recent.iter().map(Round::id).collect();
    assert_eq!(ids, vec![135, 136, 137, 138, 139]);
    assert_eq!(recent[0].number(), 5);
}

#[tokio::test]
async fn test_empty_repository() {
    let repo = repository().await;
    assert_eq!(repo.count().await.unwrap(), 0);
    assert!(repo.load_recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_file_backed_database_survives_reopen() {
    let dir = std::env::temp_dir().join(format!("roundcast-it-{}", std::process::id()));
    let url = format!("sqlite://{}/rounds.db", dir.display());

    {
        let db = Database::new(&url).await.unwrap();
        let repo = SqliteRoundRepository::new(db.pool.clone());
        repo.save(&Round::new(7, 8).unwrap()).await.unwrap();
        db.pool.close().await;
    }

    let db = Database::new(&url).await.unwrap();
    let repo = SqliteRoundRepository::new(db.pool.clone());
    assert_eq!(repo.load_recent(1).await.unwrap(), vec![Round::new(7, 8).unwrap()]);
    db.pool.close().await;

    std::fs::remove_dir_all(&dir).ok();
}
