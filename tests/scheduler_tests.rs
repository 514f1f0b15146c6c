//! Scheduler loop behavior under a paused tokio clock.

mod harness;
mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveTime;

use harness::recording_notifier::RecordingNotifier;
use moverwatch::application::{
    Aggregator, IntervalTrigger, ReportCycle, Reporter, ReporterConfig, RunSummary, Scheduler,
    SchedulerState,
};
use moverwatch::domain::ExchangeId;
use moverwatch::port::{Event, ExchangeClient, NotifierRegistry};
use support::clients::{FailingClient, SlowClient, StubClient};

fn scheduler(
    clients: Vec<Arc<dyn ExchangeClient>>,
    every: Duration,
    run_on_start: bool,
) -> (Scheduler, RecordingNotifier) {
    let recorder = RecordingNotifier::new();
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(recorder.clone()));
    let registry = Arc::new(registry);

    let mut aggregator = Aggregator::new();
    for client in clients {
        aggregator.register(client).unwrap();
    }
    let reporter = Reporter::new(ReporterConfig {
        display_limit: 10,
        next_run: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
    });
    let cycle = ReportCycle::new(aggregator, reporter, Arc::clone(&registry));

    let scheduler = Scheduler::new(
        cycle,
        Box::new(IntervalTrigger::new(every)),
        registry,
        run_on_start,
    );
    (scheduler, recorder)
}

fn kinds(recorder: &RecordingNotifier) -> Vec<&'static str> {
    recorder
        .events()
        .iter()
        .map(|event| match event {
            Event::SchedulerStarted(_) => "started",
            Event::SchedulerStopped(_) => "stopped",
            Event::Report(_) => "report",
            Event::CycleFailed(_) => "failed",
            Event::Test => "test",
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn interrupt_before_first_trigger_sends_only_lifecycle() {
    let (scheduler, recorder) = scheduler(
        vec![Arc::new(StubClient::typical(ExchangeId::Binance))],
        Duration::from_secs(3600),
        false,
    );

    let summary = scheduler.run(std::future::ready(())).await;

    assert_eq!(summary, RunSummary::default());
    assert_eq!(kinds(&recorder), vec!["started", "stopped"]);
}

#[tokio::test(start_paused = true)]
async fn runs_on_start_then_on_every_trigger() {
    let (scheduler, recorder) = scheduler(
        vec![Arc::new(StubClient::typical(ExchangeId::Bybit))],
        Duration::from_secs(10),
        true,
    );

    let summary = scheduler
        .run(tokio::time::sleep(Duration::from_secs(25)))
        .await;

    assert_eq!(summary.cycles, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        kinds(&recorder),
        vec!["started", "report", "report", "report", "stopped"]
    );
}

#[tokio::test(start_paused = true)]
async fn total_failure_raises_an_alert_and_keeps_running() {
    let (scheduler, recorder) = scheduler(
        vec![
            Arc::new(FailingClient::new(ExchangeId::Binance)),
            Arc::new(FailingClient::new(ExchangeId::CoinGecko)),
        ],
        Duration::from_secs(10),
        true,
    );

    let summary = scheduler
        .run(tokio::time::sleep(Duration::from_secs(15)))
        .await;

    assert_eq!(summary, RunSummary { cycles: 2, failed: 2 });
    assert_eq!(
        kinds(&recorder),
        vec!["started", "report", "failed", "report", "failed", "stopped"]
    );
    let alert = recorder
        .events()
        .into_iter()
        .find_map(|event| match event {
            Event::CycleFailed(failed) => Some(failed.error),
            _ => None,
        })
        .unwrap();
    assert_eq!(alert, "all 2 exchanges failed");
}

#[tokio::test(start_paused = true)]
async fn shutdown_during_cycle_waits_for_it_to_finish() {
    let (scheduler, recorder) = scheduler(
        vec![Arc::new(SlowClient::new(
            ExchangeId::CoinGecko,
            Duration::from_secs(5),
        ))],
        Duration::from_secs(3600),
        true,
    );

    let summary = scheduler
        .run(tokio::time::sleep(Duration::from_secs(1)))
        .await;

    assert_eq!(summary.cycles, 1);
    assert_eq!(kinds(&recorder), vec!["started", "report", "stopped"]);
}

#[tokio::test(start_paused = true)]
async fn state_is_observable() {
    let (scheduler, _recorder) = scheduler(
        vec![Arc::new(StubClient::typical(ExchangeId::Binance))],
        Duration::from_secs(60),
        false,
    );
    let state = scheduler.subscribe();
    assert_eq!(*state.borrow(), SchedulerState::Stopped);

    let scheduler = Arc::new(scheduler);
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let running = {
        let scheduler = Arc::clone(&scheduler);
        tokio::spawn(async move {
            scheduler
                .run(async {
                    let _ = stop_rx.await;
                })
                .await
        })
    };

    let mut watcher = scheduler.subscribe();
    watcher
        .wait_for(|s| *s == SchedulerState::Running)
        .await
        .unwrap();

    stop_tx.send(()).unwrap();
    let summary = running.await.unwrap();

    assert_eq!(summary.cycles, 0);
    assert_eq!(*state.borrow(), SchedulerState::Stopped);
}
