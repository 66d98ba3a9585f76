use std::sync::Arc;

use chrono::Duration;
use quiz_core::model::{Answer, DayIndex, DayRecord, OptionKey, Player, Progress};
use quiz_core::time::fixed_now;
use quiz_core::QuestionBank;
use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteKvStore;
use storage::{ProgressStore, StorageKey};

fn played_day(day: usize, names: &[&str]) -> DayRecord {
    let bank = QuestionBank::embedded().unwrap();
    let questions = bank.questions_for_day(DayIndex::new(day));
    let players: Vec<Player> = names
        .iter()
        .enumerate()
        .map(|(offset, name)| {
            let mut player = Player::new(*name);
            for (i, question) in questions.iter().enumerate() {
                let selected = match (i + offset) % 3 {
                    0 => Some(question.correct_option().clone()),
                    1 => Some(OptionKey::from("c")),
                    _ => None,
                };
                player.record(Answer::grade(question.clone(), selected));
            }
            player
        })
        .collect();
    DayRecord::from_players(
        DayIndex::new(day),
        &players,
        fixed_now() - Duration::days(5 - i64::try_from(day).unwrap()),
    )
}

#[tokio::test]
async fn sqlite_roundtrip_persists_progress() {
    let repo = SqliteKvStore::open("sqlite:file:memdb_progress_roundtrip?mode=memory&cache=shared")
        .await
        .expect("open");

    let store = ProgressStore::new(Arc::new(repo), StorageKey::current());
    assert!(store.load().await.unwrap().is_empty());

    let mut progress = Progress::new();
    progress.insert(played_day(0, &["Solo"]));
    progress.insert(played_day(1, &["Ane", "Jon", "Miren"]));
    store.save(&progress).await.expect("save");

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded, progress);
    let competition = loaded.get(DayIndex::new(1)).unwrap();
    assert_eq!(competition.players.as_ref().map(Vec::len), Some(3));
    assert_eq!(competition.answers.len(), 12);
}

#[tokio::test]
async fn save_of_load_is_a_fixed_point() {
    let repo = SqliteKvStore::open("sqlite:file:memdb_fixed_point?mode=memory&cache=shared")
        .await
        .expect("open");
    let kv: Arc<dyn KeyValueStore> = Arc::new(repo);
    let store = ProgressStore::new(Arc::clone(&kv), StorageKey::current());

    let mut progress = Progress::new();
    progress.insert(played_day(0, &["Solo"]));
    progress.insert(played_day(1, &["Ane", "Jon"]));
    store.save(&progress).await.unwrap();
    let first = kv.get("quiz_progress_v5").await.unwrap().unwrap();

    let loaded = store.load().await.unwrap();
    store.save(&loaded).await.unwrap();
    let second = kv.get("quiz_progress_v5").await.unwrap().unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn malformed_row_loads_as_empty_progress() {
    let storage = Storage::sqlite("sqlite:file:memdb_malformed?mode=memory&cache=shared")
        .await
        .expect("open");
    storage
        .kv
        .put("quiz_progress_v5", "this is not progress")
        .await
        .unwrap();

    let progress = storage.progress_store().load().await.unwrap();
    assert!(progress.is_empty());
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteKvStore::connect("sqlite:file:memdb_migrate_twice?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    repo.put("k", "v").await.unwrap();
    repo.put("k", "w").await.unwrap();
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("w"));
    repo.remove("k").await.unwrap();
    assert_eq!(repo.get("k").await.unwrap(), None);
}
