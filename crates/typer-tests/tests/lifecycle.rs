//! Session lifecycle: start, stop, restart, and persistence faults.

use std::sync::Arc;

use typer_core::achievements::AchievementId;
use typer_core::catalog::ItemId;
use typer_core::error::GameError;
use typer_core::types::PlayerId;
use typer_engine::{Game, GameConfig};
use typer_tests::helpers::*;

#[tokio::test(start_paused = true)]
async fn restart_preserves_progress() {
    let h = harness();
    h.game.new_game(ALICE, "Alice").unwrap();
    for _ in 0..10 {
        h.game.record_activity(ALICE, "hi").unwrap();
    }
    h.game.tick(ALICE);
    h.game.trade(ALICE, token("cb1")).unwrap();
    h.game.shutdown();
    assert_eq!(h.game.active_tasks(), 0);

    // Same store, fresh engine: the game resumes where it left off.
    let notifier = Arc::new(RecordingNotifier::default());
    let game = Game::new(GameConfig::default(), h.store.clone(), notifier);
    assert_eq!(game.resume_all().unwrap(), 1);

    let stats = game.stats(ALICE).unwrap();
    assert_eq!(stats.display_name, "Alice");
    assert_eq!(units(&stats, ItemId::Contacts), 1);
    assert_eq!(units(&stats, ItemId::Messages), 20 - 10);
    let granted = game.achievements(ALICE).unwrap();
    assert!(granted.contains(&AchievementId::GameStarted));
}

#[tokio::test(start_paused = true)]
async fn stop_game_is_terminal() {
    let h = harness();
    h.game.new_game(ALICE, "Alice").unwrap();
    h.game.new_game(BOB, "Bob").unwrap();

    h.game.stop_game(ALICE).unwrap();
    assert!(h.store.get(ALICE).is_none());
    assert!(h.store.get(BOB).is_some());
    assert!(matches!(
        h.game.record_activity(ALICE, "hi").unwrap_err(),
        GameError::UnknownPlayer(PlayerId(1))
    ));
    // Bob is untouched.
    h.game.record_activity(BOB, "hi").unwrap();
    assert_eq!(h.game.active_tasks(), 1);
}

#[tokio::test(start_paused = true)]
async fn new_game_resets_a_resumed_player() {
    let h = harness();
    resume_seeded(
        &h,
        &seeded_record(ALICE, "Alice", &[(ItemId::Messages, 5000)]),
    );
    assert_eq!(units(&h.game.stats(ALICE).unwrap(), ItemId::Messages), 5000);

    h.game.new_game(ALICE, "Alice").unwrap();
    let stats = h.game.stats(ALICE).unwrap();
    assert_eq!(units(&stats, ItemId::Messages), 0);
    assert!(!stats.items[ItemId::Contacts.index()].unlocked);
    assert_eq!(h.game.active_tasks(), 1);
}

#[tokio::test(start_paused = true)]
async fn store_outage_is_survivable() {
    let store = Arc::new(FlakyStore::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let game = Game::new(GameConfig::default(), store.clone(), notifier.clone());
    game.new_game(ALICE, "Alice").unwrap();

    // Saves fail silently; the session stays authoritative and events still
    // reach the player.
    store.set_failing(true);
    game.record_activity(ALICE, "J'aime les loutres").unwrap();
    assert!(notifier.has_achievement(ALICE, AchievementId::OtterFriend));
    let stale = store.get(ALICE).unwrap();
    assert!(!stale.restore().has_achievement(AchievementId::OtterFriend));

    // Back up: an explicit reflush persists the current state.
    store.set_failing(false);
    game.reflush(ALICE).unwrap();
    let fresh = store.get(ALICE).unwrap();
    assert!(fresh.restore().has_achievement(AchievementId::OtterFriend));
}

#[tokio::test(start_paused = true)]
async fn stored_records_survive_json_round_trips() {
    let h = harness();
    h.game.new_game(ALICE, "Alice").unwrap();
    for _ in 0..10 {
        h.game.record_activity(ALICE, "hi").unwrap();
    }
    h.game.tick(ALICE);
    h.game.trade(ALICE, token("cb1")).unwrap();
    h.game.set_pinned_message(ALICE, Some(42)).unwrap();

    // What a JSON-backed store would do between sessions.
    let record = h.store.get(ALICE).unwrap();
    let json = serde_json::to_string(&record).unwrap();
    let back: typer_core::record::PlayerRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
    assert_eq!(back.restore(), record.restore());
    assert_eq!(back.pinned_message, Some(42));
}
