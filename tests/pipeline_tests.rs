//! End-to-end report cycle tests with stubbed exchanges.

mod harness;
mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::NaiveTime;
use rust_decimal_macros::dec;

use harness::recording_notifier::RecordingNotifier;
use moverwatch::adapter::outbound::snapshot::JsonSnapshotStore;
use moverwatch::application::{Aggregator, ReportCycle, Reporter, ReporterConfig};
use moverwatch::domain::ExchangeId;
use moverwatch::port::{Event, NotifierRegistry, SnapshotStore};
use support::clients::{FailingClient, StubClient};

fn reporter() -> Reporter {
    Reporter::new(ReporterConfig {
        display_limit: 10,
        next_run: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
    })
}

fn registry(recorder: &RecordingNotifier) -> Arc<NotifierRegistry> {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(recorder.clone()));
    Arc::new(registry)
}

fn aggregator(clients: Vec<Arc<dyn moverwatch::port::ExchangeClient>>) -> Aggregator {
    let mut aggregator = Aggregator::new();
    for client in clients {
        aggregator.register(client).unwrap();
    }
    aggregator
}

#[tokio::test]
async fn partial_failure_sends_one_message_with_failure_block() {
    let recorder = RecordingNotifier::new();
    let dir = tempfile::tempdir().unwrap();
    let cycle = ReportCycle::new(
        aggregator(vec![
            Arc::new(StubClient::typical(ExchangeId::CoinGecko)),
            Arc::new(FailingClient::new(ExchangeId::Binance)),
            Arc::new(StubClient::typical(ExchangeId::Bybit)),
        ]),
        reporter(),
        registry(&recorder),
    )
    .with_store(Arc::new(JsonSnapshotStore::new(dir.path())));

    let outcome = cycle.run().await;

    assert_eq!(outcome.report.results().len(), 3);
    assert_eq!(outcome.report.failure_count(), 1);
    assert!(outcome.failure().is_none());

    let reports = recorder.reports();
    assert_eq!(reports.len(), 1, "exactly one report per cycle");
    assert_eq!(recorder.len(), 1);

    let message = &reports[0];
    assert!(message.contains("<b>COINGECKO</b>"));
    assert!(message.contains("<b>BYBIT</b>"));
    assert!(message.contains("❌ Failed: HTTP 503: Service &lt;Unavailable&gt;"));
    assert!(message.contains("<b>BTC</b> <i>BTC Token</i> +5.25%"));
    assert!(message.ends_with("⏰ Next update: daily at 07:00"));
}

#[tokio::test]
async fn snapshot_round_trips_the_report() {
    let recorder = RecordingNotifier::new();
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonSnapshotStore::new(dir.path()));
    let cycle = ReportCycle::new(
        aggregator(vec![Arc::new(StubClient::typical(ExchangeId::Binance))]),
        reporter(),
        registry(&recorder),
    )
    .with_store(store.clone());

    let outcome = cycle.run().await;

    let path = outcome.snapshot_path.clone().expect("snapshot written");
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("crypto_data_"));
    assert!(file_name.ends_with(".json"));

    let (latest_path, latest) = store.latest().unwrap().expect("latest snapshot");
    assert_eq!(latest_path, path);
    assert_eq!(latest.report, outcome.report);
}

#[tokio::test]
async fn rankings_are_ordered_and_split_by_sign() {
    let recorder = RecordingNotifier::new();
    let cycle = ReportCycle::new(
        aggregator(vec![Arc::new(StubClient::new(
            ExchangeId::Bybit,
            &[
                ("AAA", dec!(1.5)),
                ("BBB", dec!(12.0)),
                ("FLAT", dec!(0)),
                ("CCC", dec!(-8.25)),
                ("DDD", dec!(-0.5)),
            ],
        ))]),
        reporter(),
        registry(&recorder),
    );

    let outcome = cycle.run().await;
    let result = outcome.report.result(ExchangeId::Bybit).unwrap();

    let gainers: Vec<&str> = result.gainers().iter().map(|o| o.symbol()).collect();
    let losers: Vec<&str> = result.losers().iter().map(|o| o.symbol()).collect();
    assert_eq!(gainers, vec!["BBB", "AAA"]);
    assert_eq!(losers, vec!["CCC", "DDD"]);
}

#[tokio::test]
async fn every_exchange_failing_still_reports() {
    let recorder = RecordingNotifier::new();
    let cycle = ReportCycle::new(
        aggregator(vec![
            Arc::new(FailingClient::new(ExchangeId::Binance)),
            Arc::new(FailingClient::new(ExchangeId::Bybit)),
        ]),
        reporter(),
        registry(&recorder),
    );

    let outcome = cycle.run().await;

    assert!(outcome.report.all_failed());
    assert_eq!(
        outcome.failure().as_deref(),
        Some("all 2 exchanges failed")
    );
    assert_eq!(recorder.reports().len(), 1);
    assert!(outcome.rendered.console.contains("Status: FAILED"));
}

#[tokio::test]
async fn each_client_is_called_once_per_cycle() {
    let recorder = RecordingNotifier::new();
    let client = StubClient::typical(ExchangeId::CoinGecko);
    let calls = client.calls();
    let cycle = ReportCycle::new(
        aggregator(vec![Arc::new(client)]),
        reporter(),
        registry(&recorder),
    );

    cycle.run().await;
    cycle.run().await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        recorder.count(|e| matches!(e, Event::Report(_))),
        2
    );
}

#[tokio::test]
async fn unwritable_snapshot_dir_degrades_the_cycle() {
    let recorder = RecordingNotifier::new();
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let cycle = ReportCycle::new(
        aggregator(vec![Arc::new(StubClient::typical(ExchangeId::Binance))]),
        reporter(),
        registry(&recorder),
    )
    .with_store(Arc::new(JsonSnapshotStore::new(&blocker)));

    let outcome = cycle.run().await;

    assert!(outcome.snapshot_path.is_none());
    assert!(outcome
        .failure()
        .is_some_and(|reason| reason.starts_with("snapshot not saved")));
    assert_eq!(recorder.reports().len(), 1, "report still delivered");
}

#[tokio::test]
async fn report_event_carries_the_console_summary() {
    let recorder = RecordingNotifier::new();
    let cycle = ReportCycle::new(
        aggregator(vec![Arc::new(StubClient::typical(ExchangeId::Binance))]),
        reporter(),
        registry(&recorder),
    );

    let outcome = cycle.run().await;

    let summaries: Vec<String> = recorder
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Event::Report(report) => Some(report.summary),
            _ => None,
        })
        .collect();
    assert_eq!(summaries, vec![outcome.rendered.console.clone()]);
    assert!(summaries[0].contains("CRYPTO TOP GAINERS & LOSERS SUMMARY"));
}
