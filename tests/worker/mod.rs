//! Tests for the background delivery worker and opt-in listener.

mod delivery;
mod listener;

use std::sync::Arc;

use kidcheck::server::{
    service::notification::RetryPolicy,
    worker::{
        config::{DeliveryWorkerConfig, OptInListenerConfig},
        ConnectionState, ConnectionStatus, DeliveryWorker, OptInListener, RecordingChannel,
    },
};
use kidcheck_test_utils::prelude::*;

/// Recording channel whose connection starts out ready
fn ready_channel() -> RecordingChannel {
    RecordingChannel::new(ConnectionState::new(ConnectionStatus::Ready))
}

fn delivery_worker(
    test: &TestContext,
    channel: &RecordingChannel,
    config: DeliveryWorkerConfig,
    retry: RetryPolicy,
) -> DeliveryWorker {
    DeliveryWorker::new(
        config,
        retry,
        test.db.clone(),
        Arc::new(channel.clone()),
        channel.connection().clone(),
    )
}

fn opt_in_listener(test: &TestContext, channel: &RecordingChannel) -> OptInListener {
    OptInListener::new(
        OptInListenerConfig::default(),
        test.db.clone(),
        Arc::new(channel.clone()),
        channel.connection().clone(),
    )
}
