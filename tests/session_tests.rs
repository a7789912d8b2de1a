//! End-to-end tests for the session layer — routing, state machines, reset
//! semantics, and outbound gating, driven through raw payload bytes the way
//! the transport would deliver them.

use coderoom::connection::ConnectionState;
use coderoom::editor::PLACEHOLDER_CODE;
use coderoom::feedback::FeedbackState;
use coderoom::messages::{
    Outbound, TOPIC_CODE, TOPIC_INTERVIEW_TIME, TOPIC_QUESTION_DATA, TOPIC_TEST_RESULTS,
    TOPIC_TRANSCRIPTION,
};
use coderoom::router::route;
use coderoom::Session;
use tokio::sync::mpsc;

fn connected() -> Session {
    let mut session = Session::new();
    session.set_connection_state(ConnectionState::Connecting);
    session.set_connection_state(ConnectionState::Connected);
    session
}

fn send(session: &mut Session, topic: &str, json: &str) {
    route(session, topic, json.as_bytes());
}

fn question_payload() -> String {
    r#"{"type": "question_data", "data": {
        "description": "Given an array, return indices of two numbers adding to target.",
        "skeleton_code": "def f(): pass"
    }}"#
        .to_string()
}

fn run_results_payload(outcomes: &[bool]) -> String {
    let cases: Vec<String> = outcomes
        .iter()
        .map(|ok| format!(r#"{{"input": [1, 2], "expected": 3, "actual": 3, "success": {ok}}}"#))
        .collect();
    let passed = outcomes.iter().filter(|o| **o).count();
    format!(
        r#"{{"type": "test_results", "data": {{
            "success": {},
            "mode": "run",
            "results": {{
                "test_results": [{}],
                "summary": {{"total": {}, "passed": {}, "failed": {}}}
            }}
        }}}}"#,
        passed == outcomes.len(),
        cases.join(","),
        outcomes.len(),
        passed,
        outcomes.len() - passed,
    )
}

// ---------------------------------------------------------------------------
// Malformed payloads
// ---------------------------------------------------------------------------

#[test]
fn test_malformed_payloads_leave_all_stores_unchanged() {
    let mut session = connected();
    let garbage: &[&[u8]] = &[b"", b"{", b"\xff\xfe", b"[1,2,3]", b"\"just a string\""];
    for topic in [
        TOPIC_TRANSCRIPTION,
        TOPIC_QUESTION_DATA,
        TOPIC_TEST_RESULTS,
        TOPIC_INTERVIEW_TIME,
        TOPIC_CODE,
    ] {
        for raw in garbage {
            route(&mut session, topic, raw);
        }
    }
    assert!(session.transcript.is_empty());
    assert!(!session.question.is_loaded());
    assert_eq!(session.editor.text(), PLACEHOLDER_CODE);
    assert_eq!(*session.feedback.state(), FeedbackState::Idle);
    assert_eq!(session.timer.seconds_remaining(), None);
    assert_eq!(session.connection(), ConnectionState::Connected);
}

#[test]
fn test_wrong_shape_on_recognized_topic_is_dropped() {
    let mut session = connected();
    send(&mut session, TOPIC_INTERVIEW_TIME, r#"{"wrong": "field"}"#);
    send(&mut session, TOPIC_TRANSCRIPTION, r#"{"no_text": true}"#);
    assert_eq!(session.timer.seconds_remaining(), None);
    assert!(session.transcript.is_empty());
}

// ---------------------------------------------------------------------------
// Question data round trip
// ---------------------------------------------------------------------------

#[test]
fn test_question_data_seeds_code_buffer() {
    let mut session = connected();
    send(&mut session, TOPIC_QUESTION_DATA, &question_payload());
    assert_eq!(session.editor.text(), "def f(): pass");
    assert!(session.question.is_loaded());
}

#[test]
fn test_code_edit_does_not_alter_question_description() {
    let mut session = connected();
    send(&mut session, TOPIC_QUESTION_DATA, &question_payload());
    let description_before = session.question.active().unwrap().description.clone();
    session.on_local_edit("def f(): return [0, 1]");
    assert_eq!(
        session.question.active().unwrap().description,
        description_before
    );
    assert_eq!(session.editor.text(), "def f(): return [0, 1]");
}

// ---------------------------------------------------------------------------
// Execution feedback
// ---------------------------------------------------------------------------

#[test]
fn test_last_write_wins_across_test_results() {
    let mut session = connected();
    send(&mut session, TOPIC_TEST_RESULTS, &run_results_payload(&[true]));
    send(&mut session, TOPIC_TEST_RESULTS, &run_results_payload(&[false, false]));
    send(&mut session, TOPIC_TEST_RESULTS, &run_results_payload(&[true, false, true]));
    match session.feedback.state() {
        FeedbackState::RunDetail { cases, selected, .. } => {
            assert_eq!(cases.len(), 3);
            assert_eq!(*selected, 0);
        }
        other => panic!("unexpected state: {other:?}"),
    }
}

#[test]
fn test_run_detail_selection_always_in_range() {
    let mut session = connected();
    send(&mut session, TOPIC_TEST_RESULTS, &run_results_payload(&[true, false, true, false]));
    session.feedback.select_case(3);
    send(&mut session, TOPIC_TEST_RESULTS, &run_results_payload(&[true, true]));
    match session.feedback.state() {
        FeedbackState::RunDetail { cases, selected, .. } => {
            assert!(*selected < cases.len());
            assert_eq!(*selected, 0);
        }
        other => panic!("unexpected state: {other:?}"),
    }
}

#[test]
fn test_cooldown_never_shows_case_data() {
    let mut session = connected();
    let payload = r#"{"type": "test_results", "data": {
        "success": true,
        "mode": "run",
        "cooldown": true,
        "error": "Too many runs",
        "results": {
            "test_results": [{"success": true}],
            "summary": {"total": 1, "passed": 1, "failed": 0}
        }
    }}"#;
    send(&mut session, TOPIC_TEST_RESULTS, payload);
    assert_eq!(
        *session.feedback.state(),
        FeedbackState::Cooldown {
            message: "Too many runs".to_string()
        }
    );
}

#[test]
fn test_scenario_run_then_submit() {
    let mut session = connected();
    send(&mut session, TOPIC_QUESTION_DATA, &question_payload());

    send(&mut session, TOPIC_TEST_RESULTS, &run_results_payload(&[true, false]));
    match session.feedback.state() {
        FeedbackState::RunDetail { cases, summary, selected } => {
            assert_eq!(cases.len(), 2);
            assert_eq!(*selected, 0);
            assert_eq!(summary.passed, 1);
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(session.feedback.banner().unwrap(), "1/2 Passed");

    send(
        &mut session,
        TOPIC_TEST_RESULTS,
        r#"{"type": "test_results", "data": {"success": false, "mode": "submit"}}"#,
    );
    match session.feedback.state() {
        FeedbackState::SubmitSummary { passed, .. } => assert!(!passed),
        other => panic!("case list not discarded: {other:?}"),
    }
    assert_eq!(session.feedback.banner().unwrap(), "Submission failed");
}

#[test]
fn test_submit_results_carry_summary_only() {
    let mut session = connected();
    let payload = r#"{"type": "test_results", "data": {
        "success": true,
        "mode": "submit",
        "results": {
            "test_results": [
                {"input": [1], "expected": 1, "actual": 1, "success": true},
                {"input": [2], "expected": 2, "actual": 2, "success": true}
            ],
            "summary": {"total": 2, "passed": 2, "failed": 0}
        }
    }}"#;
    send(&mut session, TOPIC_TEST_RESULTS, payload);
    // The SubmitSummary variant has no field for cases; only the aggregate
    // survives the transition.
    match session.feedback.state() {
        FeedbackState::SubmitSummary { summary, passed } => {
            assert!(*passed);
            assert_eq!(summary.total, 2);
        }
        other => panic!("unexpected state: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

#[test]
fn test_timer_formatting_contract() {
    let mut session = connected();
    send(&mut session, TOPIC_INTERVIEW_TIME, r#"{"timeLeft": "00:04:30"}"#);
    assert_eq!(session.timer.display(), "04:30");
    send(&mut session, TOPIC_INTERVIEW_TIME, r#"{"timeLeft": 45}"#);
    assert_eq!(session.timer.display(), "0:45");
    send(&mut session, TOPIC_INTERVIEW_TIME, r#"{"timeLeft": "01:02:03"}"#);
    assert_eq!(session.timer.display(), "01:02:03");
}

#[test]
fn test_timer_holds_value_between_snapshots() {
    let mut session = connected();
    send(&mut session, TOPIC_INTERVIEW_TIME, r#"{"timeLeft": 300}"#);
    // No local ticking: the value only changes on the next snapshot.
    assert_eq!(session.timer.seconds_remaining(), Some(300));
    assert_eq!(session.timer.seconds_remaining(), Some(300));
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

#[test]
fn test_transcription_appends_in_arrival_order() {
    let mut session = connected();
    send(&mut session, TOPIC_TRANSCRIPTION, r#"{"text": "first", "timestamp": 900}"#);
    send(&mut session, TOPIC_TRANSCRIPTION, r#"{"text": "second", "timestamp": 100}"#);
    let texts: Vec<&str> = session
        .transcript
        .entries()
        .iter()
        .map(|e| e.text.as_str())
        .collect();
    assert_eq!(texts, vec!["first", "second"]);
}

// ---------------------------------------------------------------------------
// Disconnect reset
// ---------------------------------------------------------------------------

#[test]
fn test_disconnect_restores_all_five_stores_to_initial() {
    let mut session = connected();
    send(&mut session, TOPIC_QUESTION_DATA, &question_payload());
    session.on_local_edit("half-finished solution");
    send(&mut session, TOPIC_TEST_RESULTS, &run_results_payload(&[false]));
    send(&mut session, TOPIC_INTERVIEW_TIME, r#"{"timeLeft": 1500}"#);
    send(&mut session, TOPIC_TRANSCRIPTION, r#"{"text": "let's begin"}"#);
    session.record_local_utterance("ok");

    session.set_connection_state(ConnectionState::Disconnected);

    assert!(!session.question.is_loaded());
    assert_eq!(session.editor.text(), PLACEHOLDER_CODE);
    assert_eq!(*session.feedback.state(), FeedbackState::Idle);
    assert_eq!(session.timer.seconds_remaining(), None);
    assert!(session.transcript.is_empty());
}

#[test]
fn test_run_detail_never_displayed_while_reconnecting() {
    let mut session = connected();
    send(&mut session, TOPIC_QUESTION_DATA, &question_payload());
    send(&mut session, TOPIC_TEST_RESULTS, &run_results_payload(&[true, false]));
    assert!(matches!(
        session.feedback.state(),
        FeedbackState::RunDetail { .. }
    ));

    session.set_connection_state(ConnectionState::Reconnecting);
    assert_eq!(*session.feedback.state(), FeedbackState::Idle);

    // Everything else is session-scoped and waits for a real disconnect.
    assert!(session.question.is_loaded());
    assert_eq!(session.editor.text(), "def f(): pass");

    session.set_connection_state(ConnectionState::Connected);
    assert_eq!(*session.feedback.state(), FeedbackState::Idle);
    send(&mut session, TOPIC_TEST_RESULTS, &run_results_payload(&[true]));
    assert!(matches!(
        session.feedback.state(),
        FeedbackState::RunDetail { .. }
    ));
}

#[test]
fn test_results_arriving_after_disconnect_are_dropped() {
    let mut session = connected();
    session.set_connection_state(ConnectionState::Reconnecting);
    send(&mut session, TOPIC_TEST_RESULTS, &run_results_payload(&[true]));
    assert_eq!(*session.feedback.state(), FeedbackState::Idle);
}

// ---------------------------------------------------------------------------
// Outbound gating
// ---------------------------------------------------------------------------

#[test]
fn test_outbound_code_updates_only_while_connected() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = Session::new().with_outbound(tx);

    session.on_local_edit("offline");
    session.set_connection_state(ConnectionState::Connecting);
    session.on_local_edit("still offline");
    assert!(rx.try_recv().is_err());

    session.set_connection_state(ConnectionState::Connected);
    session.on_local_edit("online");
    match rx.try_recv().unwrap().payload {
        Outbound::CodeUpdate { code, .. } => assert_eq!(code, "online"),
        other => panic!("unexpected outbound: {other:?}"),
    }
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_run_and_submit_requests_emit_on_code_topic() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = Session::new().with_outbound(tx);
    session.set_connection_state(ConnectionState::Connecting);
    session.set_connection_state(ConnectionState::Connected);

    assert!(session.request_run());
    assert!(session.request_submit());

    let first = rx.try_recv().unwrap();
    assert_eq!(first.topic, TOPIC_CODE);
    assert!(matches!(first.payload, Outbound::RunCode { .. }));
    let second = rx.try_recv().unwrap();
    assert!(matches!(second.payload, Outbound::SubmitCode { .. }));
}
