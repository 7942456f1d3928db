use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};
use tickcast_domain::repositories::price_sink::PriceSink;
use tickcast_domain::services::price_generator::PriceSource;
use tickcast_domain::services::run_control::RunControl;
use tickcast_domain::value_objects::delivery::DeliveryOutcome;
use tickcast_domain::value_objects::price_sample::PriceSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopPlan {
    pub interval: Duration,
    /// `None` runs until the control cancels.
    pub max_iterations: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Cancelled,
    IterationLimit,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushSummary {
    pub target: String,
    pub iterations: u64,
    pub delivered: u64,
    pub rejected: u64,
    pub transport_errors: u64,
    pub last_price: Option<PriceSample>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stop_reason: StopReason,
}

impl PushSummary {
    fn record(&mut self, sample: PriceSample, outcome: &DeliveryOutcome) {
        self.iterations += 1;
        self.last_price = Some(sample);
        match outcome {
            DeliveryOutcome::Delivered { .. } => self.delivered += 1,
            DeliveryOutcome::Rejected { .. } => self.rejected += 1,
            DeliveryOutcome::TransportFailed { .. } => self.transport_errors += 1,
        }
    }
}

/// Generates, transmits and pauses until the control cancels or the plan's
/// iteration cap is hit. Delivery failures are logged and never end the loop.
pub fn run_push_loop(
    source: &mut dyn PriceSource,
    sink: &dyn PriceSink,
    control: &dyn RunControl,
    plan: LoopPlan,
) -> PushSummary {
    let span = tracing::info_span!(
        "app.push.loop",
        target_url = %sink.target(),
        interval_ms = plan.interval.as_millis() as u64,
        max_iterations = ?plan.max_iterations
    );
    let _enter = span.enter();

    let mut summary = PushSummary {
        target: sink.target().to_string(),
        iterations: 0,
        delivered: 0,
        rejected: 0,
        transport_errors: 0,
        last_price: None,
        started_at: Utc::now(),
        finished_at: Utc::now(),
        stop_reason: StopReason::Cancelled,
    };

    loop {
        if control.should_cancel() {
            summary.stop_reason = StopReason::Cancelled;
            break;
        }

        let sample = source.next_sample();
        let start = Instant::now();
        let outcome = sink.deliver(&sample);
        report_outcome(sink.target(), sample, &outcome, start.elapsed());
        summary.record(sample, &outcome);

        if plan
            .max_iterations
            .is_some_and(|limit| summary.iterations >= limit)
        {
            summary.stop_reason = StopReason::IterationLimit;
            break;
        }
        if !control.pause(plan.interval) {
            summary.stop_reason = StopReason::Cancelled;
            break;
        }
    }

    summary.finished_at = Utc::now();
    tracing::info!(
        iterations = summary.iterations,
        delivered = summary.delivered,
        rejected = summary.rejected,
        transport_errors = summary.transport_errors,
        stop_reason = ?summary.stop_reason,
        "push loop stopped"
    );
    summary
}

fn report_outcome(
    target: &str,
    sample: PriceSample,
    outcome: &DeliveryOutcome,
    elapsed: Duration,
) {
    metrics::counter!("tickcast.push.iterations_total").increment(1);
    metrics::counter!("tickcast.push.outcomes_total", "kind" => outcome.kind()).increment(1);
    metrics::gauge!("tickcast.push.last_price").set(sample.value());

    let elapsed_ms = elapsed.as_millis() as u64;
    match outcome {
        DeliveryOutcome::Delivered { .. } => {
            tracing::info!(
                price = %sample,
                elapsed_ms,
                "successfully sent stock price {sample} to {target}"
            );
        }
        DeliveryOutcome::Rejected { status } => {
            tracing::warn!(
                price = %sample,
                status,
                elapsed_ms,
                "failed to send stock price {sample}: status code {status}"
            );
        }
        DeliveryOutcome::TransportFailed { error } => {
            tracing::warn!(
                price = %sample,
                elapsed_ms,
                "error sending stock price {sample}: {error}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{run_push_loop, LoopPlan, StopReason};
    use std::cell::{Cell, RefCell};
    use std::time::Duration;
    use tickcast_domain::repositories::price_sink::PriceSink;
    use tickcast_domain::services::price_generator::PriceSource;
    use tickcast_domain::services::run_control::RunControl;
    use tickcast_domain::value_objects::delivery::DeliveryOutcome;
    use tickcast_domain::value_objects::price_sample::PriceSample;

    struct CountingSource {
        next: i64,
    }

    impl PriceSource for CountingSource {
        fn next_sample(&mut self) -> PriceSample {
            self.next += 1;
            PriceSample::from_cents(10_000 + self.next)
        }
    }

    struct ScriptedSink {
        outcomes: RefCell<Vec<DeliveryOutcome>>,
        seen: RefCell<Vec<PriceSample>>,
    }

    impl ScriptedSink {
        fn new(mut outcomes: Vec<DeliveryOutcome>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: RefCell::new(outcomes),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl PriceSink for ScriptedSink {
        fn target(&self) -> &str {
            "scripted"
        }

        fn deliver(&self, sample: &PriceSample) -> DeliveryOutcome {
            self.seen.borrow_mut().push(*sample);
            self.outcomes
                .borrow_mut()
                .pop()
                .unwrap_or(DeliveryOutcome::Delivered { status: 200 })
        }
    }

    /// Cancels after a fixed number of pauses; never actually sleeps.
    struct PauseBudget {
        remaining: Cell<u32>,
        pauses: Cell<u32>,
        cancelled_up_front: bool,
    }

    impl PauseBudget {
        fn new(remaining: u32) -> Self {
            Self {
                remaining: Cell::new(remaining),
                pauses: Cell::new(0),
                cancelled_up_front: false,
            }
        }
    }

    impl RunControl for PauseBudget {
        fn should_cancel(&self) -> bool {
            self.cancelled_up_front
        }

        fn pause(&self, _duration: Duration) -> bool {
            self.pauses.set(self.pauses.get() + 1);
            if self.remaining.get() == 0 {
                return false;
            }
            self.remaining.set(self.remaining.get() - 1);
            true
        }
    }

    fn plan(max_iterations: Option<u64>) -> LoopPlan {
        LoopPlan {
            interval: Duration::from_millis(500),
            max_iterations,
        }
    }

    #[test]
    fn iteration_cap_stops_without_a_trailing_pause() {
        let mut source = CountingSource { next: 0 };
        let sink = ScriptedSink::new(Vec::new());
        let control = PauseBudget::new(100);

        let summary = run_push_loop(&mut source, &sink, &control, plan(Some(3)));

        assert_eq!(summary.iterations, 3);
        assert_eq!(summary.delivered, 3);
        assert_eq!(summary.stop_reason, StopReason::IterationLimit);
        assert_eq!(control.pauses.get(), 2);
        assert_eq!(sink.seen.borrow().len(), 3);
        assert_eq!(summary.last_price, Some(PriceSample::from_cents(10_003)));
    }

    #[test]
    fn failures_are_counted_and_loop_continues() {
        let mut source = CountingSource { next: 0 };
        let sink = ScriptedSink::new(vec![
            DeliveryOutcome::Rejected { status: 500 },
            DeliveryOutcome::TransportFailed {
                error: "connection refused".to_string(),
            },
            DeliveryOutcome::Delivered { status: 200 },
            DeliveryOutcome::Rejected { status: 404 },
        ]);
        let control = PauseBudget::new(100);

        let summary = run_push_loop(&mut source, &sink, &control, plan(Some(4)));

        assert_eq!(summary.iterations, 4);
        assert_eq!(summary.delivered, 1);
        assert_eq!(summary.rejected, 2);
        assert_eq!(summary.transport_errors, 1);
    }

    #[test]
    fn cancellation_during_pause_ends_unbounded_loop() {
        let mut source = CountingSource { next: 0 };
        let sink = ScriptedSink::new(Vec::new());
        let control = PauseBudget::new(4);

        let summary = run_push_loop(&mut source, &sink, &control, plan(None));

        assert_eq!(summary.iterations, 5);
        assert_eq!(summary.stop_reason, StopReason::Cancelled);
    }

    #[test]
    fn cancelled_before_start_sends_nothing() {
        let mut source = CountingSource { next: 0 };
        let sink = ScriptedSink::new(Vec::new());
        let control = PauseBudget {
            cancelled_up_front: true,
            ..PauseBudget::new(10)
        };

        let summary = run_push_loop(&mut source, &sink, &control, plan(None));

        assert_eq!(summary.iterations, 0);
        assert!(summary.last_price.is_none());
        assert!(sink.seen.borrow().is_empty());
        assert_eq!(summary.stop_reason, StopReason::Cancelled);
    }

    #[test]
    fn summary_serializes_for_json_output() {
        let mut source = CountingSource { next: 0 };
        let sink = ScriptedSink::new(Vec::new());
        let control = PauseBudget::new(0);

        let summary = run_push_loop(&mut source, &sink, &control, plan(Some(1)));
        let json = serde_json::to_value(&summary).expect("json");

        assert_eq!(json["iterations"], 1);
        assert_eq!(json["stop_reason"], "iteration_limit");
        assert_eq!(json["last_price"], 100.01);
        assert_eq!(json["target"], "scripted");
    }
}
