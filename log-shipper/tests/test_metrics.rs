use std::collections::HashMap;

use httpmock::prelude::*;
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};

use log_shipper::config::Environment;
use log_shipper::{Level, LogShipper, Metadata};

use crate::common::*;
mod common;

/// Counter value per `outcome` label of `log_shipper_entries_total`.
fn outcomes(snapshotter: &Snapshotter) -> HashMap<String, u64> {
    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter(|(key, _, _, _)| key.key().name() == "log_shipper_entries_total")
        .filter_map(|(key, _, _, value)| {
            let outcome = key
                .key()
                .labels()
                .find(|label| label.key() == "outcome")?
                .value()
                .to_owned();
            match value {
                DebugValue::Counter(count) => Some((outcome, count)),
                _ => None,
            }
        })
        .collect()
}

fn current_thread_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime")
}

#[test]
fn it_counts_development_entries_as_console() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let shipper = LogShipper::new(&config_for(
        "http://127.0.0.1:1/loki/api/v1/push".to_owned(),
        Environment::Development,
    ))
    .expect("failed to build shipper");

    metrics::with_local_recorder(&recorder, || {
        shipper.info("local only", Metadata::new());
    });

    assert_eq!(
        outcomes(&snapshotter),
        HashMap::from([("console".to_owned(), 1)])
    );
}

#[test]
fn it_counts_entries_without_a_runtime_as_failed() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let shipper = LogShipper::new(&config_for(
        "http://127.0.0.1:1/loki/api/v1/push".to_owned(),
        Environment::Production,
    ))
    .expect("failed to build shipper");

    metrics::with_local_recorder(&recorder, || {
        shipper.warn("nowhere to send from", Metadata::new());
    });

    assert_eq!(
        outcomes(&snapshotter),
        HashMap::from([("failed".to_owned(), 1)])
    );
}

#[test]
fn it_counts_rejected_deliveries_once_as_failed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(PUSH_PATH);
        then.status(500);
    });

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let shipper = LogShipper::new(&config_for(server.url(PUSH_PATH), Environment::Production))
        .expect("failed to build shipper");
    let entry = shipper.entry(Level::Error, "rejected", Metadata::new());
    let runtime = current_thread_runtime();

    metrics::with_local_recorder(&recorder, || runtime.block_on(shipper.ship(entry)));

    assert_eq!(
        outcomes(&snapshotter),
        HashMap::from([("failed".to_owned(), 1)])
    );
}

#[test]
fn it_counts_accepted_deliveries_as_delivered() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(PUSH_PATH);
        then.status(204);
    });

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let shipper = LogShipper::new(&config_for(server.url(PUSH_PATH), Environment::Production))
        .expect("failed to build shipper");
    let entry = shipper.entry(Level::Info, "accepted", Metadata::new());
    let runtime = current_thread_runtime();

    metrics::with_local_recorder(&recorder, || runtime.block_on(shipper.ship(entry)));

    assert_eq!(
        outcomes(&snapshotter),
        HashMap::from([("delivered".to_owned(), 1)])
    );
}
