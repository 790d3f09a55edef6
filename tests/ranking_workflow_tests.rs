// End-to-end workflow tests: daily settlement followed by monthly archive,
// exercised through the public service APIs and the HTTP callables.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::post,
    Router,
};
use chrono::{TimeZone, Utc};
use tower::ServiceExt; // for `oneshot`

use clubrank::archive::models::NotificationStatus;
use clubrank::player::{GameRecord, PlayerUpdate};
use clubrank::{
    ArchiveOutcome, ArchiveRepository, ArchiveService, AppState, InMemoryArchiveRepository,
    InMemoryPlayerRepository, PlayerRecord, PlayerRepository, SettlementOutcome,
    SettlementService, StoreError, ADMIN_ID,
};

fn competitor(id: &str, wins: u32, losses: u32, streak: u32, attendance: u32) -> PlayerRecord {
    let mut p = PlayerRecord::new(id, id.to_uppercase(), false);
    p.wins = wins;
    p.losses = losses;
    p.win_streak_count = streak;
    p.attendance_count = attendance;
    p
}

fn with_today(mut p: PlayerRecord, wins: u32, losses: u32, streak: u32) -> PlayerRecord {
    p.today_wins = wins;
    p.today_losses = losses;
    p.today_win_streak_count = streak;
    p.today_recent_games = vec![GameRecord {
        opponent: "sparring-partner".to_string(),
        won: wins > 0,
        played_at: Utc::now(),
    }];
    p
}

fn seeded_repo() -> Arc<InMemoryPlayerRepository> {
    let repo = Arc::new(InMemoryPlayerRepository::new());

    // The worked scenario: 2W/1L today crosses the attendance threshold
    repo.insert(with_today(competitor("alice", 5, 2, 3, 4), 2, 1, 1));
    // Two games today, no attendance credit
    repo.insert(with_today(competitor("bob", 1, 1, 0, 1), 1, 1, 0));
    // Idle competitor, must be left alone by the roll-up
    repo.insert(competitor("carol", 10, 0, 2, 6));
    // Guest with today-activity: resets only
    repo.insert(with_today(
        PlayerRecord::new("guest-1", "GUEST-1", true),
        3,
        0,
        2,
    ));

    repo
}

#[tokio::test]
async fn settlement_then_archive_full_workflow() {
    let players = seeded_repo();
    let archive = Arc::new(InMemoryArchiveRepository::new());

    // Daily settlement
    let settlement = SettlementService::new(players.clone() as Arc<dyn PlayerRepository>);
    let outcome = settlement.run_daily_settlement().await.unwrap();
    assert_eq!(
        outcome,
        SettlementOutcome::Settled {
            settled: 3, // alice, bob, guest-1
            scored: 3,  // alice, bob, carol
        }
    );

    // Worked scenario from the scoring rules
    let alice = players.get("alice").unwrap();
    assert_eq!(alice.wins, 7);
    assert_eq!(alice.losses, 3);
    assert_eq!(alice.win_streak_count, 4);
    assert_eq!(alice.attendance_count, 5);
    assert_eq!(alice.rp, 420);

    // Below the attendance threshold
    let bob = players.get("bob").unwrap();
    assert_eq!(bob.wins, 2);
    assert_eq!(bob.losses, 2);
    assert_eq!(bob.attendance_count, 1);
    assert_eq!(bob.rp, 30 * 2 + 10 * 2 + 20 * 1);

    // Idle competitor untouched by roll-up but rescored
    let carol = players.get("carol").unwrap();
    assert_eq!(carol.wins, 10);
    assert_eq!(carol.rp, 30 * 10 + 20 * 6 + 20 * 2);

    // Guest lifetime counters untouched, today counters zeroed
    let guest = players.get("guest-1").unwrap();
    assert_eq!(guest.wins, 0);
    assert_eq!(guest.win_streak_count, 0);
    assert_eq!(guest.today_wins, 0);
    assert!(guest.today_recent_games.is_empty());

    // Every settled player has zeroed today counters
    for id in ["alice", "bob", "guest-1"] {
        let p = players.get(id).unwrap();
        assert_eq!(p.today_wins, 0);
        assert_eq!(p.today_losses, 0);
        assert_eq!(p.today_win_streak_count, 0);
        assert!(p.today_recent_games.is_empty());
    }

    // Monthly archive, production path, fixed clock in March
    let service = ArchiveService::new(
        players.clone() as Arc<dyn PlayerRepository>,
        archive.clone() as Arc<dyn ArchiveRepository>,
        ADMIN_ID,
    );
    let march = Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap();
    let outcome = service
        .archive_monthly_ranking_at(march, false)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ArchiveOutcome::Archived {
            key: "2025-02".to_string(),
            ranked: 3,
        }
    );

    let snapshot = archive.get_snapshot("2025-02").await.unwrap().unwrap();
    // carol 460 > alice 420 > bob 100; guest excluded
    let ids: Vec<&str> = snapshot.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["carol", "alice", "bob"]);
    let ranks: Vec<u32> = snapshot.entries.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    assert_eq!(snapshot.entries[1].rp, 420);
    assert_eq!(snapshot.entries[1].wins, 7);

    let notification = archive.get_notification(ADMIN_ID).await.unwrap().unwrap();
    assert_eq!(notification.status, NotificationStatus::Pending);
    assert!(notification.message.contains("2025-02"));
}

#[tokio::test]
async fn settlement_rerun_is_idempotent_after_success() {
    let players = seeded_repo();
    let settlement = SettlementService::new(players.clone() as Arc<dyn PlayerRepository>);

    settlement.run_daily_settlement().await.unwrap();
    let alice_first = players.get("alice").unwrap();

    let outcome = settlement.run_daily_settlement().await.unwrap();
    assert_eq!(outcome, SettlementOutcome::NothingToSettle);

    let alice_second = players.get("alice").unwrap();
    assert_eq!(alice_second.wins, alice_first.wins);
    assert_eq!(alice_second.attendance_count, alice_first.attendance_count);
    assert_eq!(alice_second.rp, alice_first.rp);
}

#[tokio::test]
async fn streak_bonus_compounds_across_cycles() {
    // The cumulative streak counter feeds the streak weight every cycle,
    // so two cycles with one streak each score 20 + 40, not 20 + 20
    let players = Arc::new(InMemoryPlayerRepository::new());
    players.insert(with_today(PlayerRecord::new("dan", "DAN", false), 1, 0, 1));

    let settlement = SettlementService::new(players.clone() as Arc<dyn PlayerRepository>);
    settlement.run_daily_settlement().await.unwrap();
    assert_eq!(players.get("dan").unwrap().rp, 30 + 20);

    // Second day of activity
    players.insert(with_today(players.get("dan").unwrap(), 1, 0, 1));
    settlement.run_daily_settlement().await.unwrap();
    assert_eq!(players.get("dan").unwrap().rp, 60 + 40);
}

#[tokio::test]
async fn http_callables_run_both_engines() {
    let players = seeded_repo();
    let archive = Arc::new(InMemoryArchiveRepository::new());
    let state = AppState::new(
        players.clone() as Arc<dyn PlayerRepository>,
        archive.clone() as Arc<dyn ArchiveRepository>,
    );

    let app = Router::new()
        .route(
            "/admin/settlement/run",
            post(clubrank::settlement::handlers::run_settlement),
        )
        .route(
            "/admin/archive/run",
            post(clubrank::archive::handlers::run_archive),
        )
        .with_state(state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/settlement/run")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(players.get("alice").unwrap().rp, 420);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/archive/run")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Test-mode archive writes only under the suffixed key
    let keys: Vec<bool> = vec![
        archive
            .get_snapshot(&clubrank::archive::archive_key(Utc::now(), true))
            .await
            .unwrap()
            .is_some(),
        archive
            .get_snapshot(&clubrank::archive::archive_key(Utc::now(), false))
            .await
            .unwrap()
            .is_none(),
    ];
    assert_eq!(keys, vec![true, true]);
}

/// Repository that fails every read, for exercising the failure contract
struct FailingPlayerRepository;

#[async_trait]
impl PlayerRepository for FailingPlayerRepository {
    async fn fetch_all_players(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        Err(StoreError::Backend("read rejected".to_string()))
    }
    async fn fetch_competitors(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        Err(StoreError::Backend("read rejected".to_string()))
    }
    async fn batch_update(&self, _updates: Vec<PlayerUpdate>) -> Result<(), StoreError> {
        Err(StoreError::Backend("commit rejected".to_string()))
    }
}

#[tokio::test]
async fn scheduled_archive_failure_leaves_error_notification() {
    let archive = Arc::new(InMemoryArchiveRepository::new());
    let service = ArchiveService::new(
        Arc::new(FailingPlayerRepository),
        archive.clone() as Arc<dyn ArchiveRepository>,
        ADMIN_ID,
    );

    // The scheduled path catches the failure and records the fallback
    let err = service.archive_monthly_ranking(false).await.unwrap_err();
    service.record_failure(&err).await.unwrap();

    let notification = archive.get_notification(ADMIN_ID).await.unwrap().unwrap();
    assert_eq!(notification.status, NotificationStatus::Error);
    assert!(notification.message.contains("No ranking data was reset"));
}

#[tokio::test]
async fn settlement_aborts_on_store_failure() {
    let settlement = SettlementService::new(Arc::new(FailingPlayerRepository));
    let result = settlement.run_daily_settlement().await;
    assert!(matches!(result, Err(StoreError::Backend(_))));
}
