//! Reply decoding for the `stokerd` wire protocol.
//!
//! The reply grammar is not self-describing: `+OK 1` opens a result, a lease,
//! or an inspect aggregate depending on the command that was issued. Callers
//! therefore select the expected shape explicitly by entry point —
//! [`read_ack`], [`read_result`], [`read_lease`], or
//! [`read_inspected_jobs`] — instead of sniffing the stream.
//!
//! Classification is strict. Bytes that read successfully but violate the
//! grammar raise [`FrameError::Malformed`] (or
//! [`FrameError::PayloadOutOfOrder`] for the inspect ordering rule); a coded
//! `-CODE` line raises [`ResponseError`] with the server's classification
//! taken as authoritative; end-of-stream on the status line is a transport
//! error. Truncation inside a counted aggregate is demoted to a framing
//! violation: the status line promised content the stream did not supply.

use std::io::Read;
use std::str::FromStr;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::MAX_PAYLOAD_SIZE;
use crate::error::{ClientError, FrameError, ResponseError};
use crate::job::{InspectedJob, JobResult, LeasedJob};
use crate::scanner::Scanner;

/// Reads a bare acknowledgement: `+OK` with no reply count.
pub fn read_ack<T: Read>(scanner: &mut Scanner<T>) -> Result<(), ClientError> {
    match read_status(scanner)? {
        Status::Ok => Ok(()),
        Status::OkCount(_) => Err(FrameError::Malformed.into()),
    }
}

/// Reads a result reply: `+OK 1`, then `<id> <success> <size>` and the
/// result payload.
pub fn read_result<T: Read>(scanner: &mut Scanner<T>) -> Result<JobResult, ClientError> {
    expect_single_reply(scanner)?;
    let line = read_record_line(scanner)?;
    let tokens = split_tokens(&line, 3)?;
    let success = parse_success(tokens[1])?;
    let size = parse_size(tokens[2])?;
    let result = read_payload(scanner, size)?;
    Ok(JobResult { success, result })
}

/// Reads a lease reply: `+OK 1`, then `<id> <name> <ttr> <size>` and the job
/// payload.
pub fn read_lease<T: Read>(scanner: &mut Scanner<T>) -> Result<LeasedJob, ClientError> {
    expect_single_reply(scanner)?;
    let line = read_record_line(scanner)?;
    let tokens = split_tokens(&line, 4)?;
    validate_name(tokens[1])?;
    let ttr = parse_decimal(tokens[2])?;
    let size = parse_size(tokens[3])?;
    let payload = read_payload(scanner, size)?;
    Ok(LeasedJob {
        id: tokens[0].to_owned(),
        name: tokens[1].to_owned(),
        ttr,
        payload,
    })
}

/// Reads an inspect aggregate: `+OK <n>` followed by `n` key/value records.
pub fn read_inspected_jobs<T: Read>(
    scanner: &mut Scanner<T>,
) -> Result<Vec<InspectedJob>, ClientError> {
    let count = match read_status(scanner)? {
        Status::OkCount(count) => count,
        Status::Ok => return Err(FrameError::Malformed.into()),
    };
    let mut jobs = Vec::new();
    for _ in 0..count {
        jobs.push(read_inspect_record(scanner)?);
    }
    Ok(jobs)
}

/// Status line of a reply: `+OK` or `+OK <count>`.
enum Status {
    Ok,
    OkCount(u64),
}

fn read_status<T: Read>(scanner: &mut Scanner<T>) -> Result<Status, ClientError> {
    let line = scanner.read_line()?;
    let (sentinel, rest) = line.split_first().ok_or(FrameError::Malformed)?;
    match *sentinel {
        b'+' => parse_ok(rest),
        b'-' => Err(error_reply(rest)),
        _ => Err(FrameError::Malformed.into()),
    }
}

fn parse_ok(rest: &[u8]) -> Result<Status, ClientError> {
    if rest == b"OK" {
        return Ok(Status::Ok);
    }
    let count = rest.strip_prefix(b"OK ").ok_or(FrameError::Malformed)?;
    let count = str::from_utf8(count).map_err(|_| FrameError::Malformed)?;
    Ok(Status::OkCount(parse_decimal(count)?))
}

/// Classifies the remainder of a `-` line into the error it raises.
///
/// An empty or whitespace code is a framing violation, as is a separator
/// space followed by whitespace-only text.
fn error_reply(rest: &[u8]) -> ClientError {
    let Ok(rest) = str::from_utf8(rest) else {
        return FrameError::Malformed.into();
    };
    let (code, text) = match rest.split_once(' ') {
        Some((code, text)) => {
            if text.trim().is_empty() {
                return FrameError::Malformed.into();
            }
            (code, text)
        }
        None => (rest, ""),
    };
    if code.is_empty() || code.contains(char::is_whitespace) {
        return FrameError::Malformed.into();
    }
    ResponseError::new(code, text).into()
}

fn expect_single_reply<T: Read>(scanner: &mut Scanner<T>) -> Result<(), ClientError> {
    match read_status(scanner)? {
        Status::OkCount(1) => Ok(()),
        Status::Ok | Status::OkCount(_) => Err(FrameError::Malformed.into()),
    }
}

/// Demotes end-of-stream inside a counted aggregate to a framing violation.
fn demote_truncation(error: ClientError) -> ClientError {
    match error {
        ClientError::Net(ref net) if net.is_eof() => FrameError::Malformed.into(),
        other => other,
    }
}

fn read_record_line<T: Read>(scanner: &mut Scanner<T>) -> Result<Vec<u8>, ClientError> {
    scanner.read_line().map_err(demote_truncation)
}

fn read_payload<T: Read>(scanner: &mut Scanner<T>, size: usize) -> Result<Vec<u8>, ClientError> {
    scanner.read_block(size).map_err(demote_truncation)
}

/// Splits a record line into exactly `expected` non-empty tokens separated
/// by single ASCII spaces.
fn split_tokens(line: &[u8], expected: usize) -> Result<Vec<&str>, ClientError> {
    let line = str::from_utf8(line).map_err(|_| FrameError::Malformed)?;
    let tokens: Vec<&str> = line.split(' ').collect();
    if tokens.len() != expected || tokens.iter().any(|token| token.is_empty()) {
        return Err(FrameError::Malformed.into());
    }
    Ok(tokens)
}

/// Parses a strict non-negative decimal: digits only, no sign, no padding.
fn parse_decimal<N: FromStr>(token: &str) -> Result<N, ClientError> {
    if token.is_empty() || !token.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(FrameError::Malformed.into());
    }
    token
        .parse()
        .map_err(|_| ClientError::from(FrameError::Malformed))
}

fn parse_size(token: &str) -> Result<usize, ClientError> {
    let size: usize = parse_decimal(token)?;
    if size > MAX_PAYLOAD_SIZE {
        return Err(FrameError::Malformed.into());
    }
    Ok(size)
}

fn parse_success(token: &str) -> Result<bool, ClientError> {
    match token {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => Err(FrameError::Malformed.into()),
    }
}

/// Queue names are restricted to `[A-Za-z0-9_.-]+`.
fn validate_name(name: &str) -> Result<(), ClientError> {
    let legal = !name.is_empty()
        && name
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'.' | b'-'));
    if legal {
        Ok(())
    } else {
        Err(FrameError::Malformed.into())
    }
}

const CREATED_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

fn parse_created(value: &str) -> Result<OffsetDateTime, ClientError> {
    let parsed =
        PrimitiveDateTime::parse(value, CREATED_FORMAT).map_err(|_| FrameError::Malformed)?;
    Ok(parsed.assume_utc())
}

/// Keys an inspect record carries, one slot each in the seen-set.
const INSPECT_KEYS: [&str; 12] = [
    "name",
    "ttr",
    "ttl",
    "payload-size",
    "payload",
    "max-attempts",
    "attempts",
    "max-fails",
    "fails",
    "priority",
    "state",
    "created",
];

fn key_slot(key: &str) -> Option<usize> {
    INSPECT_KEYS.iter().position(|&known| known == key)
}

/// Decodes one `<id> <key-count>` record and its key/value lines.
///
/// Keys may arrive in any order except that `payload` must immediately
/// follow `payload-size`; `pending_size` is armed only for the line directly
/// after the size key, so any other arrangement raises
/// [`FrameError::PayloadOutOfOrder`]. A record must carry the complete key
/// set, each key at most once.
fn read_inspect_record<T: Read>(scanner: &mut Scanner<T>) -> Result<InspectedJob, ClientError> {
    let header = read_record_line(scanner)?;
    let tokens = split_tokens(&header, 2)?;
    let mut job = InspectedJob {
        id: tokens[0].to_owned(),
        ..InspectedJob::default()
    };
    let key_count: u64 = parse_decimal(tokens[1])?;
    let mut seen = [false; INSPECT_KEYS.len()];
    let mut pending_size: Option<usize> = None;
    for _ in 0..key_count {
        let line = read_record_line(scanner)?;
        let separator = line
            .iter()
            .position(|&byte| byte == b' ')
            .ok_or(FrameError::Malformed)?;
        let key = str::from_utf8(&line[..separator]).map_err(|_| FrameError::Malformed)?;
        let value = &line[separator + 1..];

        let slot = key_slot(key).ok_or(FrameError::Malformed)?;
        if seen[slot] {
            return Err(FrameError::Malformed.into());
        }
        seen[slot] = true;

        if key == "payload" {
            let Some(size) = pending_size.take() else {
                return Err(FrameError::PayloadOutOfOrder.into());
            };
            if value.len() != size {
                return Err(FrameError::Malformed.into());
            }
            job.payload = value.to_vec();
            continue;
        }
        pending_size = None;

        // The payload value may contain spaces; every other value is a
        // single token.
        let value = str::from_utf8(value).map_err(|_| FrameError::Malformed)?;
        if value.is_empty() || value.contains(' ') {
            return Err(FrameError::Malformed.into());
        }
        match key {
            "name" => {
                validate_name(value)?;
                job.name = value.to_owned();
            }
            "ttr" => job.ttr = parse_decimal(value)?,
            "ttl" => job.ttl = parse_decimal(value)?,
            "payload-size" => pending_size = Some(parse_size(value)?),
            "max-attempts" => job.max_attempts = parse_decimal(value)?,
            "attempts" => job.attempts = parse_decimal(value)?,
            "max-fails" => job.max_fails = parse_decimal(value)?,
            "fails" => job.fails = parse_decimal(value)?,
            "priority" => job.priority = value.parse().map_err(|_| FrameError::Malformed)?,
            "state" => job.state = value.parse().map_err(|_| FrameError::Malformed)?,
            "created" => job.created = parse_created(value)?,
            _ => return Err(FrameError::Malformed.into()),
        }
    }
    if seen.iter().any(|&present| !present) {
        return Err(FrameError::Malformed.into());
    }
    Ok(job)
}
