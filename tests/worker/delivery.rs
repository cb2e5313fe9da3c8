//! Tests for delivering queued messages through the messaging channel.

use std::{collections::HashSet, time::Duration};

use chrono::Utc;
use kidcheck::server::{
    data::message::MessageRepository,
    error::delivery::DeliveryError,
    service::notification::NotificationQueue,
};

use super::*;

/// Tests delivering a due message.
///
/// Expected: message is SENT with one send recorded and attempts untouched
#[tokio::test]
async fn sends_due_message() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    let message = test
        .message()
        .insert_pending(
            emma.guardian.id,
            emma.child.id,
            &emma.guardian.phone,
            Utc::now().naive_utc(),
        )
        .await?;

    let channel = ready_channel();
    let worker = delivery_worker(
        &test,
        &channel,
        DeliveryWorkerConfig::default(),
        RetryPolicy::default(),
    );

    let processed = worker.run_once().await.unwrap();
    assert_eq!(processed, 1);

    let sent = channel.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].address, emma.guardian.phone);
    assert_eq!(sent[0].body, message.body);

    let stored = MessageRepository::new(&test.db)
        .get_by_id(message.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, "SENT");
    assert_eq!(stored.attempts, 0);
    assert!(stored.sent_at.is_some());
    assert!(stored.claimed_at.is_none());

    Ok(())
}

/// Tests concurrent claims over the same due messages.
///
/// Expected: every message is claimed exactly once across all claimers
#[tokio::test]
async fn concurrent_claims_never_overlap() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    let now = Utc::now().naive_utc();

    for _ in 0..12 {
        test.message()
            .insert_pending(emma.guardian.id, emma.child.id, &emma.guardian.phone, now)
            .await?;
    }

    let mut handles = Vec::new();
    for _ in 0..4 {
        let db = test.db.clone();
        handles.push(tokio::spawn(async move {
            let policy = RetryPolicy::default();
            NotificationQueue::new(&db, &policy)
                .claim_batch(5)
                .await
                .unwrap()
                .into_iter()
                .map(|m| m.id)
                .collect::<Vec<_>>()
        }));
    }

    let mut claimed = Vec::new();
    for handle in handles {
        claimed.extend(handle.await.unwrap());
    }

    // Whatever lost a race is still claimable afterwards
    let policy = RetryPolicy::default();
    let rest = NotificationQueue::new(&test.db, &policy)
        .claim_batch(100)
        .await
        .unwrap();
    claimed.extend(rest.into_iter().map(|m| m.id));

    let unique: HashSet<i32> = claimed.iter().copied().collect();
    assert_eq!(unique.len(), claimed.len());
    assert_eq!(claimed.len(), 12);

    Ok(())
}

/// Tests a transient send failure.
///
/// Expected: message moves to RETRY with one attempt and is not due again before the backoff
#[tokio::test]
async fn transient_failure_schedules_retry() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    let message = test
        .message()
        .insert_pending(
            emma.guardian.id,
            emma.child.id,
            &emma.guardian.phone,
            Utc::now().naive_utc(),
        )
        .await?;

    let channel = ready_channel();
    channel
        .fail_next(DeliveryError::Disconnected("disconnected".to_string()))
        .await;
    let worker = delivery_worker(
        &test,
        &channel,
        DeliveryWorkerConfig::default(),
        RetryPolicy::default(),
    );

    let before = Utc::now().naive_utc();
    assert_eq!(worker.run_once().await.unwrap(), 1);

    let stored = MessageRepository::new(&test.db)
        .get_by_id(message.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, "RETRY");
    assert_eq!(stored.attempts, 1);
    assert!(stored.next_attempt_at.unwrap() > before);
    assert!(stored.last_error.unwrap().contains("not connected"));

    // Backoff has not elapsed yet
    assert_eq!(worker.run_once().await.unwrap(), 0);
    assert!(channel.sent().await.is_empty());

    Ok(())
}

/// Tests a message failing on every attempt.
///
/// Uses a zero backoff so each retry is due immediately.
///
/// Expected: FAILED after exactly `max_attempts` sends with the last error kept
#[tokio::test]
async fn exhausting_attempts_marks_failed() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    let message = test
        .message()
        .insert_pending(
            emma.guardian.id,
            emma.child.id,
            &emma.guardian.phone,
            Utc::now().naive_utc(),
        )
        .await?;

    let channel = ready_channel();
    let worker = delivery_worker(
        &test,
        &channel,
        DeliveryWorkerConfig::default(),
        RetryPolicy::new(5, 0, 0),
    );

    for attempt in 1..=5 {
        channel
            .fail_next(DeliveryError::SendFailed(format!("rate limited {attempt}")))
            .await;
        assert_eq!(worker.run_once().await.unwrap(), 1);
    }

    let stored = MessageRepository::new(&test.db)
        .get_by_id(message.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, "FAILED");
    assert_eq!(stored.attempts, 5);
    assert_eq!(stored.last_error.as_deref(), Some("Send failed: rate limited 5"));

    // Terminal messages are never claimed again
    assert_eq!(worker.run_once().await.unwrap(), 0);

    Ok(())
}

/// Tests sending to an address the channel can never deliver to.
///
/// Expected: FAILED after a single attempt
#[tokio::test]
async fn invalid_address_fails_immediately() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    let message = test
        .message()
        .insert_pending(
            emma.guardian.id,
            emma.child.id,
            "not-a-number",
            Utc::now().naive_utc(),
        )
        .await?;

    let channel = ready_channel();
    let worker = delivery_worker(
        &test,
        &channel,
        DeliveryWorkerConfig::default(),
        RetryPolicy::default(),
    );

    worker.run_once().await.unwrap();

    let stored = MessageRepository::new(&test.db)
        .get_by_id(message.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, "FAILED");
    assert_eq!(stored.attempts, 1);
    assert!(stored.next_attempt_at.is_none());

    Ok(())
}

/// Tests a tick while the channel is not connected.
///
/// Expected: nothing is claimed and no attempt is spent
#[tokio::test]
async fn skips_tick_while_disconnected() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    let message = test
        .message()
        .insert_pending(
            emma.guardian.id,
            emma.child.id,
            &emma.guardian.phone,
            Utc::now().naive_utc(),
        )
        .await?;

    let channel = ready_channel();
    channel.connection().set(ConnectionStatus::Disconnected);
    let worker = delivery_worker(
        &test,
        &channel,
        DeliveryWorkerConfig::default(),
        RetryPolicy::default(),
    );

    assert_eq!(worker.run_once().await.unwrap(), 0);

    let stored = MessageRepository::new(&test.db)
        .get_by_id(message.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, "PENDING");
    assert_eq!(stored.attempts, 0);

    channel.connection().set(ConnectionStatus::Ready);
    assert_eq!(worker.run_once().await.unwrap(), 1);
    assert_eq!(channel.sent().await.len(), 1);

    Ok(())
}

/// Tests a send that outlives the send timeout.
///
/// Expected: the attempt is abandoned and the message moves to RETRY
#[tokio::test]
async fn slow_send_times_out() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    let message = test
        .message()
        .insert_pending(
            emma.guardian.id,
            emma.child.id,
            &emma.guardian.phone,
            Utc::now().naive_utc(),
        )
        .await?;

    let channel = ready_channel();
    channel.set_delay(Duration::from_millis(1500)).await;
    let config = DeliveryWorkerConfig {
        send_timeout_seconds: 1,
        ..Default::default()
    };
    let worker = delivery_worker(&test, &channel, config, RetryPolicy::default());

    worker.run_once().await.unwrap();

    let stored = MessageRepository::new(&test.db)
        .get_by_id(message.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, "RETRY");
    assert_eq!(stored.attempts, 1);
    assert!(stored.last_error.unwrap().contains("timed out"));
    assert!(channel.sent().await.is_empty());

    Ok(())
}

/// Tests the worker's background task lifecycle.
///
/// Expected: start and stop are idempotent and the running task delivers queued messages
#[tokio::test]
async fn start_and_stop_are_idempotent() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    test.message()
        .insert_pending(
            emma.guardian.id,
            emma.child.id,
            &emma.guardian.phone,
            Utc::now().naive_utc(),
        )
        .await?;

    let channel = ready_channel();
    let config = DeliveryWorkerConfig {
        poll_interval_ms: 20,
        ..Default::default()
    };
    let worker = delivery_worker(&test, &channel, config, RetryPolicy::default());

    worker.start().await.unwrap();
    worker.start().await.unwrap();
    assert!(worker.is_running().await);

    for _ in 0..50 {
        if !channel.sent().await.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(channel.sent().await.len(), 1);

    worker.stop().await.unwrap();
    assert!(!worker.is_running().await);
    worker.stop().await.unwrap();

    Ok(())
}

/// Tests recovery of a claim abandoned by a crashed process.
///
/// Expected: starting the worker releases the stale claim and the message is delivered
#[tokio::test]
async fn start_releases_stale_claims() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    let message = test
        .message()
        .insert_pending(
            emma.guardian.id,
            emma.child.id,
            &emma.guardian.phone,
            Utc::now().naive_utc(),
        )
        .await?;

    let long_ago = Utc::now().naive_utc() - chrono::TimeDelta::hours(1);
    assert!(MessageRepository::new(&test.db)
        .try_claim(message.id, long_ago)
        .await?);

    let channel = ready_channel();
    let worker = delivery_worker(
        &test,
        &channel,
        DeliveryWorkerConfig::default(),
        RetryPolicy::default(),
    );

    // Still claimed, nothing to deliver
    assert_eq!(worker.run_once().await.unwrap(), 0);

    worker.start().await.unwrap();
    worker.stop().await.unwrap();

    let stored = MessageRepository::new(&test.db)
        .get_by_id(message.id)
        .await?
        .unwrap();
    assert_ne!(stored.status, "IN_PROGRESS");

    Ok(())
}
