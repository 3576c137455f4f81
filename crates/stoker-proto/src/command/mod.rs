//! Wire serialisation for client commands.
//!
//! Each function assembles the complete byte frame for one operation,
//! including the trailing CRLF after any payload, so the caller can issue a
//! single write. Optional numeric flags are emitted only when non-zero, in
//! the fixed order `-priority`, `-max-attempts`, `-max-fails`.

use crate::job::{BackgroundJob, ForegroundJob, ScheduledJob};

/// Serialises an `add` submission.
#[must_use]
pub fn add(job: &BackgroundJob) -> Vec<u8> {
    let mut head = format!(
        "add {} {} {} {} {}",
        job.id,
        job.name,
        job.ttr,
        job.ttl,
        job.payload.len()
    );
    push_flags(&mut head, job.priority, job.max_attempts, job.max_fails);
    frame(head, Some(&job.payload))
}

/// Serialises a `run` submission.
#[must_use]
pub fn run(job: &ForegroundJob) -> Vec<u8> {
    let mut head = format!(
        "run {} {} {} {} {}",
        job.id,
        job.name,
        job.ttr,
        job.timeout,
        job.payload.len()
    );
    push_flags(&mut head, job.priority, 0, 0);
    frame(head, Some(&job.payload))
}

/// Serialises a `schedule` submission.
#[must_use]
pub fn schedule(job: &ScheduledJob) -> Vec<u8> {
    let mut head = format!(
        "schedule {} {} {} {} {} {}",
        job.id,
        job.name,
        job.ttr,
        job.ttl,
        job.time,
        job.payload.len()
    );
    push_flags(&mut head, job.priority, job.max_attempts, job.max_fails);
    frame(head, Some(&job.payload))
}

/// Serialises a `lease` request over one or more queue names.
#[must_use]
pub fn lease(names: &[&str], timeout: u64) -> Vec<u8> {
    let mut head = String::from("lease");
    for name in names {
        head.push(' ');
        head.push_str(name);
    }
    head.push_str(&format!(" {timeout}"));
    frame(head, None)
}

/// Serialises a `result` fetch.
#[must_use]
pub fn result(id: &str, timeout: u64) -> Vec<u8> {
    frame(format!("result {id} {timeout}"), None)
}

/// Serialises a `complete` acknowledgement carrying the result payload.
#[must_use]
pub fn complete(id: &str, payload: &[u8]) -> Vec<u8> {
    frame(format!("complete {id} {}", payload.len()), Some(payload))
}

/// Serialises a `fail` acknowledgement carrying the failure payload.
#[must_use]
pub fn fail(id: &str, payload: &[u8]) -> Vec<u8> {
    frame(format!("fail {id} {}", payload.len()), Some(payload))
}

/// Serialises a `delete` request.
#[must_use]
pub fn delete(id: &str) -> Vec<u8> {
    frame(format!("delete {id}"), None)
}

/// Serialises an `inspect jobs` pagination request.
#[must_use]
pub fn inspect_jobs(name: &str, cursor: u64, limit: u64) -> Vec<u8> {
    frame(format!("inspect jobs {name} {cursor} {limit}"), None)
}

/// Appends the optional flags that carry a non-zero value.
fn push_flags(head: &mut String, priority: i32, max_attempts: u32, max_fails: u32) {
    if priority != 0 {
        head.push_str(&format!(" -priority={priority}"));
    }
    if max_attempts != 0 {
        head.push_str(&format!(" -max-attempts={max_attempts}"));
    }
    if max_fails != 0 {
        head.push_str(&format!(" -max-fails={max_fails}"));
    }
}

/// Terminates the command line and appends the payload block when present.
///
/// A zero-length payload still carries its own CRLF terminator.
fn frame(head: String, payload: Option<&[u8]>) -> Vec<u8> {
    let mut bytes = head.into_bytes();
    bytes.extend_from_slice(b"\r\n");
    if let Some(payload) = payload {
        bytes.extend_from_slice(payload);
        bytes.extend_from_slice(b"\r\n");
    }
    bytes
}

#[cfg(test)]
mod tests;
