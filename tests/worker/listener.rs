//! Tests for handling guardian replies on the messaging channel.

use chrono::Utc;
use kidcheck::server::{
    data::guardian::GuardianRepository,
    worker::{channel::InboundMessage, listener::InboundOutcome},
};
use sea_orm::EntityTrait;

use super::*;

fn inbound(sender: &str, body: &str) -> InboundMessage {
    InboundMessage {
        sender: sender.to_string(),
        body: body.to_string(),
        received_at: Utc::now().naive_utc(),
    }
}

/// Tests a guardian replying YES from the channel's address format.
///
/// Expected: the guardian behind `15550000001@c.us` is opted in
#[tokio::test]
async fn yes_reply_opts_guardian_in() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", false)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;

    let channel = ready_channel();
    channel.push_inbound("15550000001@c.us", " Yes ").await;
    let listener = opt_in_listener(&test, &channel);

    assert_eq!(listener.poll_once().await.unwrap(), 1);

    let guardians = GuardianRepository::new(&test.db)
        .find_by_phone(&emma.guardian.phone)
        .await?;
    assert_eq!(guardians.len(), 1);
    assert!(guardians[0].notify_opt_in);

    Ok(())
}

/// Tests a reply that is not an opt-in phrase.
///
/// Expected: Ignored and the guardian stays opted out
#[tokio::test]
async fn other_replies_are_ignored() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", false)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    let listener = opt_in_listener(&test, &ready_channel());

    let outcome = listener
        .handle_inbound(&inbound(&emma.guardian.phone, "yes please, what time is pickup?"))
        .await
        .unwrap();

    assert_eq!(outcome, InboundOutcome::Ignored);
    let guardians = GuardianRepository::new(&test.db)
        .find_by_phone(&emma.guardian.phone)
        .await?;
    assert!(!guardians[0].notify_opt_in);

    Ok(())
}

/// Tests an opt-in from a guardian who already receives notices.
///
/// Expected: Ignored
#[tokio::test]
async fn repeated_opt_in_is_ignored() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    let listener = opt_in_listener(&test, &ready_channel());

    let outcome = listener
        .handle_inbound(&inbound(&emma.guardian.phone, "START"))
        .await
        .unwrap();

    assert_eq!(outcome, InboundOutcome::Ignored);

    Ok(())
}

/// Tests one number shared by guardians in two families.
///
/// Expected: both guardians are opted in
#[tokio::test]
async fn opts_in_every_guardian_with_the_number() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", false)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    let other_family = test.family().insert_family("Garcia").await?;
    test.family()
        .insert_guardian(other_family.id, &emma.guardian.phone, false)
        .await?;
    let listener = opt_in_listener(&test, &ready_channel());

    let outcome = listener
        .handle_inbound(&inbound("+1 (555) 000-0001", "subscribe"))
        .await
        .unwrap();

    assert_eq!(outcome, InboundOutcome::OptedIn(2));

    Ok(())
}

/// Tests a reply from a number no guardian is registered with.
///
/// Expected: Unlinked with the normalized number and text stored
#[tokio::test]
async fn unknown_sender_is_stored_as_unlinked_contact() -> Result<(), TestError> {
    let test = TestBuilder::new().with_checkin_tables().build().await?;
    let listener = opt_in_listener(&test, &ready_channel());

    let outcome = listener
        .handle_inbound(&inbound("447700900123@c.us", "YES"))
        .await
        .unwrap();

    assert_eq!(outcome, InboundOutcome::Unlinked);

    let contacts = entity::prelude::UnlinkedContact::find().all(&test.db).await?;
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].phone, "+447700900123");
    assert_eq!(contacts[0].body, "YES");

    Ok(())
}

/// Tests polling while the channel is disconnected.
///
/// Expected: nothing is read and the reply is handled once the channel is ready
#[tokio::test]
async fn poll_waits_for_connection() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", false)
        .build()
        .await?;

    let channel = ready_channel();
    channel.push_inbound("+15550000001", "yes").await;
    channel.connection().set(ConnectionStatus::Authenticating);
    let listener = opt_in_listener(&test, &channel);

    assert_eq!(listener.poll_once().await.unwrap(), 0);

    channel.connection().set(ConnectionStatus::Ready);
    assert_eq!(listener.poll_once().await.unwrap(), 1);

    Ok(())
}

/// Tests draining replies while the database rejects every write.
///
/// Expected: Ok with nothing applied and every queued reply consumed
#[tokio::test]
async fn failed_reply_does_not_stop_the_drain() -> Result<(), TestError> {
    // No tables, so every guardian lookup fails
    let test = TestBuilder::new().build().await?;

    let channel = ready_channel();
    channel.push_inbound("+15550000001", "yes").await;
    channel.push_inbound("+15550000002", "yes").await;
    let listener = opt_in_listener(&test, &channel);

    assert_eq!(listener.poll_once().await.unwrap(), 0);
    assert_eq!(channel.pending_inbound().await, 0);

    Ok(())
}
