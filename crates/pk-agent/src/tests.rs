//! Unit tests for pk-agent.

use std::time::Duration;

use crossbeam_channel::Receiver;
use pk_core::Hour;
use pk_wire::{Connector, MailboxHub, MailboxSink, MailboxSource, Message, OutcomeCode, ReplySink};

use crate::{AgentError, AgentSession, ParkRequest};

fn req(family: &str, hour: i32, people: u32) -> ParkRequest {
    ParkRequest { family: family.into(), hour: Hour(hour), people }
}

/// A reply mailbox pre-loaded with `script`.  The hub and sink are dropped,
/// so the mailbox reports end-of-stream once the script is consumed.
fn scripted(script: &[Message]) -> MailboxSource {
    let hub = MailboxHub::new();
    let source = hub.open("pipe_resp_t");
    let sink = hub.connect("pipe_resp_t").unwrap();
    for msg in script {
        sink.send(msg).unwrap();
    }
    source
}

/// Register against a scripted reply mailbox.  The returned receiver is the
/// coordinator's inbound side; keep it alive or sends fail.
fn register_scripted(
    script: &[Message],
) -> (AgentSession<MailboxSink, MailboxSource>, Receiver<Message>) {
    let (tx, rx) = MailboxHub::inbound("coordinator");
    let replies = scripted(script);
    let session = AgentSession::register("t", "pipe_resp_t", tx, || Ok(replies))
        .unwrap()
        .with_pause(Duration::ZERO);
    (session, rx)
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader_tests {
    use std::io::Write;

    use super::*;
    use crate::{load_requests, read_requests};

    #[test]
    fn parses_rows_with_whitespace_and_blank_lines() {
        let text = "Lopez,9,5\n\n Diaz , 10 , 8 \nRuiz,-1,0\n";
        let got = read_requests(text.as_bytes()).unwrap();
        assert_eq!(got, vec![req("Lopez", 9, 5), req("Diaz", 10, 8), req("Ruiz", -1, 0)]);
    }

    #[test]
    fn wrong_field_count_names_the_line() {
        let text = "Lopez,9,5\nDiaz,10\n";
        match read_requests(text.as_bytes()) {
            Err(AgentError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn negative_people_rejected() {
        let err = read_requests("Lopez,9,-3\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("people"));
    }

    #[test]
    fn non_numeric_hour_rejected() {
        assert!(matches!(
            read_requests("Lopez,nine,3\n".as_bytes()),
            Err(AgentError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn empty_family_rejected() {
        assert!(read_requests(" ,9,3\n".as_bytes()).is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Lopez,9,5").unwrap();
        writeln!(file, "Diaz,11,2").unwrap();
        let got = load_requests(file.path()).unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[1], req("Diaz", 11, 2));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_requests(&dir.path().join("nope.csv")), Err(AgentError::Io(_))));
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod session_tests {
    use pk_wire::MessageKind;

    use super::*;
    use crate::reply_channel_name;

    fn response(family: &str, hour: i32, people: u32, code: OutcomeCode, assigned: Option<i32>) -> Message {
        let request = Message::request("t", family, Hour(hour), people);
        Message::response(&request, code, assigned.map(Hour))
    }

    #[test]
    fn reply_channel_naming() {
        assert_eq!(reply_channel_name("a1"), "pipe_resp_a1");
    }

    #[test]
    fn register_sends_register_and_remembers_hour() {
        let (session, inbound) = register_scripted(&[Message::register_ack("t", Hour(11))]);
        assert_eq!(session.registered_hour(), Hour(11));
        assert_eq!(session.name(), "t");
        let sent = inbound.try_recv().unwrap();
        assert_eq!(sent.kind, MessageKind::Register);
        assert_eq!(sent.reply_channel, "pipe_resp_t");
    }

    #[test]
    fn unexpected_register_reply_still_supplies_hour() {
        let (session, _inbound) = register_scripted(&[Message::register("x", "y")]);
        assert_eq!(session.registered_hour(), Hour(0));
    }

    #[test]
    fn shutdown_instead_of_ack_ends_the_session_without_sending() {
        let (mut session, inbound) = register_scripted(&[Message::shutdown()]);
        assert!(session.is_closed());

        let summary = session.run(&[req("A", 9, 1), req("B", 10, 2)]).unwrap();
        assert!(summary.shut_down);
        assert_eq!(summary.sent(), 0);
        let sent: Vec<MessageKind> = inbound.try_iter().map(|m| m.kind).collect();
        assert_eq!(sent, [MessageKind::Register]);
    }

    #[test]
    fn missing_ack_is_end_of_stream() {
        let (tx, _rx) = MailboxHub::inbound("coordinator");
        let replies = scripted(&[]);
        let result = AgentSession::register("t", "pipe_resp_t", tx, || Ok(replies));
        assert!(matches!(result, Err(AgentError::EndOfStream(_))));
    }

    #[test]
    fn past_hours_skipped_and_rest_sent_in_order() {
        let (mut session, inbound) = register_scripted(&[
            Message::register_ack("t", Hour(10)),
            response("B", 10, 2, OutcomeCode::AcceptedOriginal, Some(10)),
            response("C", 12, 4, OutcomeCode::Reprogrammed, Some(13)),
        ]);
        let summary = session
            .run(&[req("A", 9, 1), req("B", 10, 2), req("C", 12, 4)])
            .unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.sent(), 2);
        assert!(!summary.shut_down);
        assert_eq!(summary.responses[1].assigned_hour, Some(Hour(13)));

        let sent: Vec<Message> = inbound.try_iter().collect();
        let families: Vec<&str> = sent.iter().skip(1).map(|m| m.family.as_str()).collect();
        assert_eq!(families, ["B", "C"]);
        assert!(sent[1..].iter().all(|m| m.kind == MessageKind::Request));
    }

    #[test]
    fn shutdown_ends_the_session_early() {
        let (mut session, _inbound) = register_scripted(&[
            Message::register_ack("t", Hour(9)),
            Message::shutdown(),
        ]);
        let summary = session.run(&[req("A", 9, 1), req("B", 10, 1)]).unwrap();
        assert!(summary.shut_down);
        assert_eq!(summary.sent(), 0);
    }

    #[test]
    fn stray_replies_are_skipped_while_waiting() {
        let (mut session, _inbound) = register_scripted(&[
            Message::register_ack("t", Hour(9)),
            Message::register_ack("t", Hour(9)),
            response("A", 9, 1, OutcomeCode::AcceptedOriginal, Some(9)),
        ]);
        let summary = session.run(&[req("A", 9, 1)]).unwrap();
        assert_eq!(summary.sent(), 1);
    }

    #[test]
    fn end_of_stream_while_waiting_is_an_error() {
        let (mut session, _inbound) = register_scripted(&[Message::register_ack("t", Hour(9))]);
        assert!(matches!(session.run(&[req("A", 9, 1)]), Err(AgentError::EndOfStream(_))));
    }

    #[test]
    fn end_to_end_against_a_coordinator() {
        use std::thread;

        use pk_coord::CoordinatorBuilder;
        use pk_core::ParkConfig;

        let config = ParkConfig {
            open_hour:     Hour(9),
            close_hour:    Hour(12),
            hour_duration: Duration::from_millis(150),
            capacity:      10,
        };
        let hub = MailboxHub::new();
        let (tx, inbound) = MailboxHub::inbound("coordinator");
        let coordinator = CoordinatorBuilder::new(config, hub.clone()).build().unwrap();
        let run = thread::spawn(move || coordinator.run(inbound));

        let channel = reply_channel_name("a1");
        let replies = hub.open(&channel);
        let mut session = AgentSession::register("a1", &channel, tx, || Ok(replies))
            .unwrap()
            .with_pause(Duration::ZERO);
        assert_eq!(session.registered_hour(), Hour(9));

        let summary = session
            .run(&[req("Lopez", 9, 5), req("Diaz", 9, 8), req("Big", 9, 15)])
            .unwrap();
        let codes: Vec<Option<OutcomeCode>> = summary.responses.iter().map(|m| m.outcome).collect();
        assert_eq!(codes, [
            Some(OutcomeCode::AcceptedOriginal),
            Some(OutcomeCode::Reprogrammed),
            Some(OutcomeCode::DeniedNoOption),
        ]);
        assert_eq!(summary.responses[1].assigned_hour, Some(Hour(11)));

        drop(session);
        let result = run.join().unwrap().unwrap();
        assert_eq!(result.report.counters.total(), 3);
        assert_eq!(result.agents, 1);
    }
}
