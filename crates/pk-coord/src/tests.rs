//! Integration tests for pk-coord, driven over the in-process mailbox
//! transport.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use pk_core::{Hour, ParkConfig};
use pk_venue::{Decision, HourReport};
use pk_wire::{
    MailboxHub, MailboxSink, MailboxSource, Message, MessageKind, MessageSource, OutcomeCode, ReplySink,
};

use crate::{CoordError, CoordinatorBuilder, ParkObserver, RunSummary};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config(open: i32, close: i32, hour_ms: u64) -> ParkConfig {
    ParkConfig {
        open_hour:     Hour(open),
        close_hour:    Hour(close),
        hour_duration: Duration::from_millis(hour_ms),
        capacity:      10,
    }
}

/// Every message left in mailbox `name` after a run.  The hub's own sender
/// is removed first so the mailbox reaches end-of-stream.
fn collect(hub: &MailboxHub, name: &str, source: &mut MailboxSource) -> Vec<Message> {
    hub.remove(name);
    let mut out = Vec::new();
    while let Some(msg) = source.recv().unwrap() {
        out.push(msg);
    }
    out
}

#[derive(Default)]
struct Recorder {
    hours:     Mutex<Vec<HourReport>>,
    decisions: Mutex<Vec<(String, Decision)>>,
    shutdown:  Mutex<Option<(Hour, usize)>>,
    ended:     Mutex<bool>,
}

impl ParkObserver for Recorder {
    fn on_decision(&self, request: &Message, decision: &Decision) {
        self.decisions.lock().push((request.family.clone(), *decision));
    }

    fn on_hour(&self, report: &HourReport) {
        self.hours.lock().push(report.clone());
    }

    fn on_shutdown(&self, final_hour: Hour, agents: usize) {
        *self.shutdown.lock() = Some((final_hour, agents));
    }

    fn on_run_end(&self, _report: &pk_venue::FinalReport) {
        *self.ended.lock() = true;
    }
}

/// Sends `messages` to the coordinator from the clock's shutdown hook.  It
/// holds a sender for the whole run, so the inbound channel never closes.
struct AtClose {
    inbound:  MailboxSink,
    messages: Vec<Message>,
}

impl ParkObserver for AtClose {
    fn on_shutdown(&self, _final_hour: Hour, _agents: usize) {
        for msg in &self.messages {
            self.inbound.send(msg).unwrap();
        }
    }
}

/// Run a coordinator over `hub` with messages already queued on the
/// inbound channel.  The sender is dropped once everything is queued.
fn run_with(config: ParkConfig, hub: &MailboxHub, queued: &[Message]) -> RunSummary {
    let (tx, inbound) = MailboxHub::inbound("coordinator");
    for msg in queued {
        tx.send(msg).unwrap();
    }
    drop(tx);
    CoordinatorBuilder::new(config, hub.clone())
        .build()
        .unwrap()
        .run(inbound)
        .unwrap()
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn invalid_config_rejected() {
        let result = CoordinatorBuilder::new(config(5, 17, 10), MailboxHub::new()).build();
        assert!(matches!(result, Err(CoordError::Config(_))));
    }

    #[test]
    fn open_after_close_rejected() {
        let result = CoordinatorBuilder::new(config(12, 10, 10), MailboxHub::new()).build();
        assert!(result.is_err());
    }

    #[test]
    fn keeps_config() {
        let coordinator = CoordinatorBuilder::new(config(9, 17, 10), MailboxHub::new())
            .build()
            .unwrap();
        assert_eq!(coordinator.config().capacity, 10);
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod clock_tests {
    use super::*;

    #[test]
    fn clock_runs_to_close_and_reports_each_hour() {
        let recorder = Arc::new(Recorder::default());
        let (_tx, inbound) = MailboxHub::inbound("coordinator");
        let summary = CoordinatorBuilder::new(config(9, 12, 10), MailboxHub::new())
            .observer(Arc::clone(&recorder))
            .build()
            .unwrap()
            .run(inbound)
            .unwrap();

        assert_eq!(summary.final_hour, Hour(12));
        assert_eq!(summary.agents, 0);
        let hours: Vec<Hour> = recorder.hours.lock().iter().map(|r| r.hour).collect();
        assert_eq!(hours, vec![Hour(10), Hour(11), Hour(12)]);
        assert_eq!(*recorder.shutdown.lock(), Some((Hour(12), 0)));
        assert!(*recorder.ended.lock());
    }

    #[test]
    fn single_hour_window_stops_after_one_interval() {
        let start = Instant::now();
        let summary = run_with(config(9, 9, 20), &MailboxHub::new(), &[]);
        assert_eq!(summary.final_hour, Hour(9));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn every_registered_agent_gets_shutdown() {
        let hub = MailboxHub::new();
        let mut a = hub.open("pipe_resp_a");
        let mut b = hub.open("pipe_resp_b");
        let summary = run_with(config(9, 10, 20), &hub, &[
            Message::register("a", "pipe_resp_a"),
            Message::register("b", "pipe_resp_b"),
        ]);
        assert_eq!(summary.agents, 2);
        for (name, source) in [("pipe_resp_a", &mut a), ("pipe_resp_b", &mut b)] {
            let kinds: Vec<MessageKind> = collect(&hub, name, source).iter().map(|m| m.kind).collect();
            assert_eq!(kinds, [MessageKind::RegisterAck, MessageKind::Shutdown]);
        }
    }
}

// ── Request processing ────────────────────────────────────────────────────────

#[cfg(test)]
mod processor_tests {
    use super::*;

    #[test]
    fn register_then_requests_get_ordered_replies() {
        let hub = MailboxHub::new();
        let mut replies = hub.open("pipe_resp_a1");
        let summary = run_with(config(9, 12, 150), &hub, &[
            Message::register("a1", "pipe_resp_a1"),
            Message::request("a1", "Lopez", Hour(9), 5),
            Message::request("a1", "Diaz", Hour(9), 8),
            Message::request("a1", "Big", Hour(9), 15),
            Message::request("a1", "Late", Hour(20), 2),
        ]);

        let msgs = collect(&hub, "pipe_resp_a1", &mut replies);
        assert_eq!(msgs.len(), 6);

        assert_eq!(msgs[0].kind, MessageKind::RegisterAck);
        assert_eq!(msgs[0].hour, Hour(9));

        assert_eq!(msgs[1].kind, MessageKind::Response);
        assert_eq!(msgs[1].family, "Lopez");
        assert_eq!(msgs[1].outcome, Some(OutcomeCode::AcceptedOriginal));
        assert_eq!(msgs[1].assigned_hour, Some(Hour(9)));

        assert_eq!(msgs[2].family, "Diaz");
        assert_eq!(msgs[2].hour, Hour(9));
        assert_eq!(msgs[2].people, 8);
        assert_eq!(msgs[2].outcome, Some(OutcomeCode::Reprogrammed));
        assert_eq!(msgs[2].assigned_hour, Some(Hour(11)));

        assert_eq!(msgs[3].outcome, Some(OutcomeCode::DeniedNoOption));
        assert_eq!(msgs[3].assigned_hour, None);
        assert_eq!(msgs[4].outcome, Some(OutcomeCode::DeniedNoOption));

        assert_eq!(msgs[5].kind, MessageKind::Shutdown);

        let c = summary.report.counters;
        assert_eq!((c.accepted_original, c.reprogrammed, c.denied), (1, 1, 2));
        assert_eq!(summary.processor.requests, 4);
        assert_eq!(summary.venue.reservations().len(), 2);
    }

    #[test]
    fn repeated_register_reuses_the_reply_channel() {
        let hub = MailboxHub::new();
        let mut replies = hub.open("pipe_resp_a1");
        let (tx, inbound) = MailboxHub::inbound("coordinator");
        let coordinator = CoordinatorBuilder::new(config(9, 10, 200), hub.clone()).build().unwrap();
        let run = std::thread::spawn(move || coordinator.run(inbound));

        tx.send(&Message::register("a1", "pipe_resp_a1")).unwrap();
        assert_eq!(replies.recv().unwrap().unwrap().kind, MessageKind::RegisterAck);

        // A second connect would now fail; the existing entry must be used.
        hub.remove("pipe_resp_a1");
        tx.send(&Message::register("a1", "somewhere_else")).unwrap();
        assert_eq!(replies.recv().unwrap().unwrap().kind, MessageKind::RegisterAck);
        drop(tx);

        let summary = run.join().unwrap().unwrap();
        assert_eq!(summary.agents, 1);
        assert_eq!(summary.processor.registrations, 2);
        assert_eq!(replies.recv().unwrap().unwrap().kind, MessageKind::Shutdown);
    }

    #[test]
    fn unknown_agent_decision_still_counts() {
        let recorder = Arc::new(Recorder::default());
        let (tx, inbound) = MailboxHub::inbound("coordinator");
        tx.send(&Message::request("ghost", "Lopez", Hour(9), 5)).unwrap();
        drop(tx);
        let summary = CoordinatorBuilder::new(config(9, 10, 100), MailboxHub::new())
            .observer(Arc::clone(&recorder))
            .build()
            .unwrap()
            .run(inbound)
            .unwrap();

        assert_eq!(summary.processor.undelivered, 1);
        assert_eq!(summary.report.counters.accepted_original, 1);
        assert_eq!(summary.venue.reservations().len(), 1);
        assert_eq!(recorder.decisions.lock().len(), 1);
    }

    #[test]
    fn unexpected_kinds_are_ignored() {
        let summary = run_with(config(9, 10, 20), &MailboxHub::new(), &[
            Message::shutdown(),
            Message::register_ack("x", Hour(9)),
        ]);
        assert_eq!(summary.processor.anomalies, 2);
        assert_eq!(summary.report.counters.total(), 0);
    }

    #[test]
    fn departed_agent_is_not_fatal() {
        let hub = MailboxHub::new();
        let mut replies = hub.open("pipe_resp_a1");
        let (tx, inbound) = MailboxHub::inbound("coordinator");
        let coordinator = CoordinatorBuilder::new(config(9, 10, 100), hub.clone()).build().unwrap();
        let run = std::thread::spawn(move || coordinator.run(inbound));

        tx.send(&Message::register("a1", "pipe_resp_a1")).unwrap();
        assert_eq!(replies.recv().unwrap().unwrap().kind, MessageKind::RegisterAck);
        drop(replies);
        tx.send(&Message::request("a1", "Lopez", Hour(9), 2)).unwrap();
        drop(tx);

        let summary = run.join().unwrap().unwrap();
        assert_eq!(summary.processor.undelivered, 1);
        assert_eq!(summary.report.counters.total(), 1);
    }

    #[test]
    fn unreachable_reply_channel_is_fatal_without_waiting_for_close() {
        let (tx, inbound) = MailboxHub::inbound("coordinator");
        tx.send(&Message::register("a1", "nobody_listens")).unwrap();
        let start = Instant::now();
        let result = CoordinatorBuilder::new(config(9, 17, 10_000), MailboxHub::new())
            .build()
            .unwrap()
            .run(inbound);
        assert!(matches!(result, Err(CoordError::Transport { .. })));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn register_after_close_is_answered_with_shutdown() {
        let hub = MailboxHub::new();
        let mut late = hub.open("pipe_resp_late");
        let (tx, inbound) = MailboxHub::inbound("coordinator");
        let observer = AtClose {
            inbound:  tx.clone(),
            messages: vec![Message::register("late", "pipe_resp_late")],
        };
        let summary = CoordinatorBuilder::new(config(9, 10, 20), hub.clone())
            .observer(observer)
            .build()
            .unwrap()
            .run(inbound)
            .unwrap();

        assert_eq!(summary.agents, 0);
        assert_eq!(summary.processor.registrations, 1);
        assert_eq!(summary.processor.anomalies, 1);
        let kinds: Vec<MessageKind> = collect(&hub, "pipe_resp_late", &mut late).iter().map(|m| m.kind).collect();
        assert_eq!(kinds, [MessageKind::Shutdown]);
        drop(tx);
    }

    #[test]
    fn request_queued_at_close_is_decided_before_exit() {
        let hub = MailboxHub::new();
        let mut replies = hub.open("pipe_resp_a1");
        let (tx, inbound) = MailboxHub::inbound("coordinator");
        tx.send(&Message::register("a1", "pipe_resp_a1")).unwrap();
        let observer = AtClose {
            inbound:  tx.clone(),
            messages: vec![Message::request("a1", "Lopez", Hour(9), 2)],
        };
        let summary = CoordinatorBuilder::new(config(9, 10, 50), hub.clone())
            .observer(observer)
            .build()
            .unwrap()
            .run(inbound)
            .unwrap();

        assert_eq!(summary.processor.requests, 1);
        // Hour 9 has passed and no block starts at 10 or later.
        assert_eq!(summary.report.counters.denied, 1);

        let msgs = collect(&hub, "pipe_resp_a1", &mut replies);
        let kinds: Vec<MessageKind> = msgs.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, [MessageKind::RegisterAck, MessageKind::Shutdown, MessageKind::Response]);
        assert_eq!(msgs[2].outcome, Some(OutcomeCode::DeniedNoOption));
        drop(tx);
    }

    #[test]
    fn outcome_codes() {
        use pk_venue::{DenyReason, Outcome};

        use crate::outcome_code;

        assert_eq!(outcome_code(Outcome::AcceptedOriginal).code(), 1);
        assert_eq!(outcome_code(Outcome::Reprogrammed).code(), 2);
        for reason in [DenyReason::OverCapacity, DenyReason::AfterClose, DenyReason::NoFeasibleSlot] {
            assert_eq!(outcome_code(Outcome::Denied(reason)), OutcomeCode::DeniedNoOption);
        }
    }
}

// ── FIFO transport ────────────────────────────────────────────────────────────

#[cfg(all(test, unix))]
mod fifo_tests {
    use std::thread;

    use pk_wire::FifoConnector;
    use pk_wire::fifo::ensure_fifo;

    use super::*;

    #[test]
    fn agent_that_never_listens_does_not_block_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipe_resp_ghost");
        ensure_fifo(&path).unwrap();

        let (tx, inbound) = MailboxHub::inbound("coordinator");
        tx.send(&Message::register("ghost", path.to_str().unwrap())).unwrap();
        drop(tx);

        let coordinator = CoordinatorBuilder::new(config(9, 10, 20), FifoConnector).build().unwrap();
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        thread::spawn(move || {
            let _ = done_tx.send(coordinator.run(inbound));
        });

        let summary = done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("run did not finish")
            .unwrap();
        assert_eq!(summary.final_hour, Hour(10));
        assert_eq!(summary.agents, 0);
        assert_eq!(summary.processor.anomalies, 1);
    }

    #[test]
    fn listening_agent_gets_ack_and_shutdown_over_fifo() {
        use pk_wire::FifoSource;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipe_resp_a1");
        ensure_fifo(&path).unwrap();

        let (tx, inbound) = MailboxHub::inbound("coordinator");
        tx.send(&Message::register("a1", path.to_str().unwrap())).unwrap();
        drop(tx);

        let coordinator = CoordinatorBuilder::new(config(9, 10, 50), FifoConnector).build().unwrap();
        let run = thread::spawn(move || coordinator.run(inbound));

        let mut source = FifoSource::open(&path).unwrap();
        let mut kinds = Vec::new();
        while let Some(msg) = source.recv().unwrap() {
            kinds.push(msg.kind);
        }
        assert_eq!(kinds, [MessageKind::RegisterAck, MessageKind::Shutdown]);

        let summary = run.join().unwrap().unwrap();
        assert_eq!(summary.agents, 1);
    }
}
