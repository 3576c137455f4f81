//! Unit tests for command serialisation.

use rstest::rstest;

use crate::job::{BackgroundJob, ForegroundJob, ScheduledJob};

use super::*;

const JOB_ID: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c4";

fn background_job() -> BackgroundJob {
    BackgroundJob {
        id: JOB_ID.into(),
        name: "j1".into(),
        ttr: 60,
        ttl: 60_000,
        payload: b"a".to_vec(),
        ..BackgroundJob::default()
    }
}

#[test]
fn add_serialises_the_minimal_job() {
    let frame = add(&background_job());
    assert_eq!(
        frame,
        format!("add {JOB_ID} j1 60 60000 1\r\na\r\n").into_bytes()
    );
}

#[rstest]
#[case::priority_only(100, 0, 0, " -priority=100")]
#[case::max_attempts_only(0, 3, 0, " -max-attempts=3")]
#[case::max_fails_only(0, 0, 3, " -max-fails=3")]
#[case::all_flags_in_fixed_order(1, 3, 1, " -priority=1 -max-attempts=3 -max-fails=1")]
fn add_emits_only_non_zero_flags(
    #[case] priority: i32,
    #[case] max_attempts: u32,
    #[case] max_fails: u32,
    #[case] flags: &str,
) {
    let job = BackgroundJob {
        id: JOB_ID.into(),
        name: "j1".into(),
        ttr: 1,
        ttl: 2,
        payload: Vec::new(),
        priority,
        max_attempts,
        max_fails,
    };
    let frame = add(&job);
    assert_eq!(
        frame,
        format!("add {JOB_ID} j1 1 2 0{flags}\r\n\r\n").into_bytes()
    );
}

#[test]
fn add_without_flags_has_no_trailing_space() {
    let frame = add(&background_job());
    let line_end = frame
        .windows(2)
        .position(|window| window == b"\r\n")
        .expect("terminator");
    assert_ne!(frame[line_end - 1], b' ');
}

#[test]
fn run_serialises_ttr_then_timeout() {
    let job = ForegroundJob {
        id: JOB_ID.into(),
        name: "j1".into(),
        ttr: 5000,
        timeout: 1000,
        payload: b"a".to_vec(),
        priority: 0,
    };
    assert_eq!(
        run(&job),
        format!("run {JOB_ID} j1 5000 1000 1\r\na\r\n").into_bytes()
    );
}

#[test]
fn run_emits_priority_when_set() {
    let job = ForegroundJob {
        id: JOB_ID.into(),
        name: "j1".into(),
        ttr: 5000,
        timeout: 1000,
        payload: b"a".to_vec(),
        priority: 1,
    };
    assert_eq!(
        run(&job),
        format!("run {JOB_ID} j1 5000 1000 1 -priority=1\r\na\r\n").into_bytes()
    );
}

#[test]
fn schedule_places_the_time_before_the_size() {
    let job = ScheduledJob {
        id: JOB_ID.into(),
        name: "j1".into(),
        ttr: 5000,
        ttl: 60_000,
        time: "2016-01-02T15:04:05Z".into(),
        payload: b"a".to_vec(),
        ..ScheduledJob::default()
    };
    assert_eq!(
        schedule(&job),
        format!("schedule {JOB_ID} j1 5000 60000 2016-01-02T15:04:05Z 1\r\na\r\n").into_bytes()
    );
}

#[test]
fn schedule_emits_all_flags_in_fixed_order() {
    let job = ScheduledJob {
        id: JOB_ID.into(),
        name: "j1".into(),
        ttr: 1,
        ttl: 2,
        time: "2016-12-01T00:00:00Z".into(),
        payload: Vec::new(),
        priority: 1,
        max_attempts: 3,
        max_fails: 1,
    };
    assert_eq!(
        schedule(&job),
        format!(
            "schedule {JOB_ID} j1 1 2 2016-12-01T00:00:00Z 0 \
             -priority=1 -max-attempts=3 -max-fails=1\r\n\r\n"
        )
        .into_bytes()
    );
}

#[rstest]
#[case::single_name(&["j1"], "lease j1 1000\r\n")]
#[case::multiple_names(&["j1", "j2", "j3"], "lease j1 j2 j3 1000\r\n")]
fn lease_joins_names_before_the_timeout(#[case] names: &[&str], #[case] expected: &str) {
    assert_eq!(lease(names, 1000), expected.as_bytes());
}

#[test]
fn result_serialises_id_and_timeout() {
    assert_eq!(
        result(JOB_ID, 1000),
        format!("result {JOB_ID} 1000\r\n").into_bytes()
    );
}

#[rstest]
#[case::with_payload(b"a".as_slice(), "1\r\na\r\n")]
#[case::empty_payload(b"".as_slice(), "0\r\n\r\n")]
fn complete_carries_a_sized_payload(#[case] payload: &[u8], #[case] tail: &str) {
    assert_eq!(
        complete(JOB_ID, payload),
        format!("complete {JOB_ID} {tail}").into_bytes()
    );
}

#[test]
fn fail_carries_a_sized_payload() {
    assert_eq!(
        fail(JOB_ID, b"a"),
        format!("fail {JOB_ID} 1\r\na\r\n").into_bytes()
    );
}

#[test]
fn delete_serialises_the_id_alone() {
    assert_eq!(delete(JOB_ID), format!("delete {JOB_ID}\r\n").into_bytes());
}

#[test]
fn inspect_jobs_serialises_cursor_and_limit() {
    assert_eq!(inspect_jobs("ping", 0, 10), b"inspect jobs ping 0 10\r\n");
}
