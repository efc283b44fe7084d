//! End-to-end tests: event sender with the JSON factory and real sinks.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use cuke_emit_core::json_messages::WireTimestamp;
use cuke_emit_core::{
    ChannelSink, Envelope, EventSender, FixedClock, JsonMessageFactory, MapOverrides,
    MemorySink, Message, NdjsonSink, SendError,
};
use cuke_emit_proto::{PickleId, TestOutcome, TestStatus, override_keys};
use serde_json::Value;
use tempfile::TempDir;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()))
}

fn pickle() -> PickleId {
    "3f2504e0-4f89-11d3-9a0c-0305e82c3301".parse().unwrap()
}

#[test]
fn full_run_writes_ndjson_stream() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("messages.ndjson");
    let sink = Arc::new(NdjsonSink::append_to(&path).unwrap());
    let sender = EventSender::new(
        clock(),
        Arc::new(JsonMessageFactory),
        sink,
        Arc::new(MapOverrides::new()),
    );

    sender.send_run_started().unwrap();
    sender.send_case_started(pickle()).unwrap();
    sender
        .send_case_finished(
            pickle(),
            &TestOutcome::passed().with_duration(Duration::from_millis(250)),
        )
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].get("testRunStarted").is_some());
    assert_eq!(
        lines[1]["testCaseStarted"]["pickleId"],
        "3f2504e0-4f89-11d3-9a0c-0305e82c3301"
    );
    assert_eq!(lines[2]["testCaseFinished"]["testResult"]["status"], "PASSED");
    assert_eq!(
        lines[2]["testCaseFinished"]["testResult"]["duration"]["nanos"],
        250_000_000
    );
}

#[test]
fn overrides_make_output_deterministic() {
    let overrides = MapOverrides::new()
        .with(override_keys::TEST_RUN_STARTED_TIME, "2020-01-01T00:00:00+02:00")
        .with(override_keys::TEST_CASE_STARTED_TIME, "2020-01-01T00:00:01Z")
        .with(override_keys::TEST_CASE_FINISHED_TIME, "2020-01-01T00:00:02Z")
        .with(
            override_keys::TEST_CASE_STARTED_PICKLE_ID,
            "00000000-0000-0000-0000-000000000001",
        )
        .with(
            override_keys::TEST_CASE_FINISHED_PICKLE_ID,
            "00000000-0000-0000-0000-000000000002",
        );
    let sink = Arc::new(MemorySink::<Envelope>::new());
    let sender = EventSender::new(
        clock(),
        Arc::new(JsonMessageFactory),
        sink.clone(),
        Arc::new(overrides),
    );

    sender.send_run_started().unwrap();
    sender.send_case_started(PickleId::random()).unwrap();
    sender
        .send_case_finished(PickleId::random(), &TestOutcome::failed("nope"))
        .unwrap();

    let messages: Vec<Message> = sink.take().into_iter().map(Envelope::into_message).collect();
    match &messages[..] {
        [
            Message::TestRunStarted(run),
            Message::TestCaseStarted(started),
            Message::TestCaseFinished(finished),
        ] => {
            assert_eq!(
                run.timestamp,
                WireTimestamp {
                    seconds: 1_577_829_600,
                    nanos: 0
                }
            );
            assert_eq!(started.pickle_id.to_string(), "00000000-0000-0000-0000-000000000001");
            assert_eq!(started.timestamp.seconds, 1_577_836_801);
            assert_eq!(finished.pickle_id.to_string(), "00000000-0000-0000-0000-000000000002");
            assert_eq!(finished.timestamp.seconds, 1_577_836_802);
            assert_eq!(finished.test_result.status, TestStatus::Failed);
            assert_eq!(finished.test_result.message.as_deref(), Some("nope"));
        }
        other => panic!("unexpected messages: {other:?}"),
    }
}

#[test]
fn nil_pickle_id_surfaces_as_failure() {
    let sink = Arc::new(MemorySink::<Envelope>::new());
    let sender = EventSender::new(
        clock(),
        Arc::new(JsonMessageFactory),
        sink.clone(),
        Arc::new(MapOverrides::new()),
    );

    let err = sender.send_case_started(PickleId::nil()).unwrap_err();
    assert!(matches!(err, SendError::Failure(_)));
    assert_eq!(
        err.to_string(),
        "the message could not be created. pickle id must not be nil"
    );
    assert!(sink.is_empty());
}

#[test]
fn pre_epoch_override_surfaces_as_wrapped_failure() {
    let overrides =
        MapOverrides::new().with(override_keys::TEST_RUN_STARTED_TIME, "1969-12-31T23:59:59Z");
    let sink = Arc::new(MemorySink::<Envelope>::new());
    let sender = EventSender::new(
        clock(),
        Arc::new(JsonMessageFactory),
        sink.clone(),
        Arc::new(overrides),
    );

    let err = sender.send_run_started().unwrap_err();
    assert!(matches!(err, SendError::Wrapped(_)));
    assert!(err.to_string().contains("testRunStarted"));
    assert!(sink.is_empty());
}

#[tokio::test]
async fn channel_sink_feeds_async_consumer() {
    let (sink, mut rx) = ChannelSink::<Envelope>::channel();
    let sender = EventSender::new(
        clock(),
        Arc::new(JsonMessageFactory),
        Arc::new(sink),
        Arc::new(MapOverrides::new()),
    );

    let consumer = tokio::spawn(async move {
        let mut kinds = Vec::new();
        while let Some(envelope) = rx.recv().await {
            kinds.push(envelope.message().kind());
        }
        kinds
    });

    sender.send_run_started().unwrap();
    sender.send_case_started(pickle()).unwrap();
    drop(sender);

    assert_eq!(consumer.await.unwrap(), vec!["testRunStarted", "testCaseStarted"]);
}
