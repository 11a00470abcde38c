use chrono::{DateTime, Duration, Utc};

use planner_api::domain::repository::LoginTokenRepository;
use planner_api::domain::types::{ConsumeOutcome, ConsumeRejection, LoginToken};
use planner_api::infra::db::DbLoginTokenRepository;
use planner_api_schema::login_tokens;
use sea_orm::EntityTrait;

use crate::helpers::{seed_user, test_db};

fn token_row(token: &str, user_id: i32, expires_at: DateTime<Utc>) -> LoginToken {
    LoginToken {
        token: token.to_owned(),
        user_id,
        expires_at,
        consumed_at: None,
        created_at: Utc::now(),
    }
}

async fn repo_with_user() -> DbLoginTokenRepository {
    let db = test_db().await;
    seed_user(&db, 42, "user@example.com", "User").await;
    DbLoginTokenRepository { db }
}

#[tokio::test]
async fn should_grant_once_then_reject_as_consumed() {
    let repo = repo_with_user().await;
    let now = Utc::now();
    repo.create(&token_row("tok-once", 42, now + Duration::minutes(30)))
        .await
        .unwrap();

    let first = repo.consume("tok-once", now).await.unwrap();
    assert_eq!(first, ConsumeOutcome::Granted { user_id: 42 });

    let second = repo.consume("tok-once", now).await.unwrap();
    assert_eq!(
        second,
        ConsumeOutcome::Rejected(ConsumeRejection::Consumed)
    );
}

#[tokio::test]
async fn should_reject_expired_token() {
    let repo = repo_with_user().await;
    let now = Utc::now();
    repo.create(&token_row("tok-expired", 42, now - Duration::minutes(1)))
        .await
        .unwrap();

    let outcome = repo.consume("tok-expired", now).await.unwrap();
    assert_eq!(outcome, ConsumeOutcome::Rejected(ConsumeRejection::Expired));

    // Expiry is terminal — a retry does not flip it to consumed.
    let outcome = repo.consume("tok-expired", now).await.unwrap();
    assert_eq!(outcome, ConsumeOutcome::Rejected(ConsumeRejection::Expired));
}

#[tokio::test]
async fn should_reject_unknown_token() {
    let repo = repo_with_user().await;
    let outcome = repo.consume("no-such-token", Utc::now()).await.unwrap();
    assert_eq!(
        outcome,
        ConsumeOutcome::Rejected(ConsumeRejection::NotFound)
    );
}

#[tokio::test]
async fn should_grant_exactly_once_under_concurrent_consumes() {
    let repo = repo_with_user().await;
    let now = Utc::now();
    repo.create(&token_row("tok-race", 42, now + Duration::minutes(30)))
        .await
        .unwrap();

    let (a, b) = tokio::join!(repo.consume("tok-race", now), repo.consume("tok-race", now));
    let outcomes = [a.unwrap(), b.unwrap()];

    let granted = outcomes
        .iter()
        .filter(|o| matches!(o, ConsumeOutcome::Granted { .. }))
        .count();
    assert_eq!(granted, 1, "exactly one consumer may win, got {outcomes:?}");
    assert!(
        outcomes.contains(&ConsumeOutcome::Rejected(ConsumeRejection::Consumed)),
        "the loser must see Consumed, got {outcomes:?}"
    );
}

#[tokio::test]
async fn should_not_set_consumed_at_on_rejection() {
    let repo = repo_with_user().await;
    let now = Utc::now();
    repo.create(&token_row("tok-stays", 42, now - Duration::minutes(5)))
        .await
        .unwrap();

    let outcome = repo.consume("tok-stays", now).await.unwrap();
    assert_eq!(outcome, ConsumeOutcome::Rejected(ConsumeRejection::Expired));

    let row = login_tokens::Entity::find_by_id("tok-stays".to_owned())
        .one(&repo.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.consumed_at, None);
}

#[tokio::test]
async fn should_purge_only_tokens_past_retention_cutoff() {
    let repo = repo_with_user().await;
    let now = Utc::now();

    // Past the 24h retention window, one consumed and one not — both go.
    repo.create(&token_row("tok-old", 42, now - Duration::hours(25)))
        .await
        .unwrap();
    repo.create(&token_row("tok-old-consumed", 42, now - Duration::hours(30)))
        .await
        .unwrap();
    repo.consume("tok-old-consumed", now - Duration::hours(31))
        .await
        .unwrap();

    // Expired but within retention, and still valid — both stay.
    repo.create(&token_row("tok-recent", 42, now - Duration::hours(1)))
        .await
        .unwrap();
    repo.create(&token_row("tok-live", 42, now + Duration::minutes(30)))
        .await
        .unwrap();

    let purged = repo
        .delete_expired_before(now - Duration::hours(24))
        .await
        .unwrap();
    assert_eq!(purged, 2);

    let remaining = login_tokens::Entity::find().all(&repo.db).await.unwrap();
    let mut tokens: Vec<&str> = remaining.iter().map(|t| t.token.as_str()).collect();
    tokens.sort();
    assert_eq!(tokens, ["tok-live", "tok-recent"]);

    // Idempotent: a second purge with the same cutoff deletes nothing.
    let purged = repo
        .delete_expired_before(now - Duration::hours(24))
        .await
        .unwrap();
    assert_eq!(purged, 0);
}

#[tokio::test]
async fn should_follow_token_lifecycle_for_user_42() {
    let repo = repo_with_user().await;
    let issued = Utc::now();

    // 30-minute token, consumed 10 minutes in — granted.
    repo.create(&token_row("tok-42", 42, issued + Duration::minutes(30)))
        .await
        .unwrap();
    let outcome = repo
        .consume("tok-42", issued + Duration::minutes(10))
        .await
        .unwrap();
    assert_eq!(outcome, ConsumeOutcome::Granted { user_id: 42 });

    // One minute later the same link is dead.
    let outcome = repo
        .consume("tok-42", issued + Duration::minutes(11))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        ConsumeOutcome::Rejected(ConsumeRejection::Consumed)
    );

    // A 1-minute token consumed 2 minutes in is expired, not consumed.
    repo.create(&token_row("tok-42-short", 42, issued + Duration::minutes(1)))
        .await
        .unwrap();
    let outcome = repo
        .consume("tok-42-short", issued + Duration::minutes(2))
        .await
        .unwrap();
    assert_eq!(outcome, ConsumeOutcome::Rejected(ConsumeRejection::Expired));
}
