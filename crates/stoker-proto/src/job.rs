//! Job value types exchanged with the server.
//!
//! Submission records ([`BackgroundJob`], [`ForegroundJob`], [`ScheduledJob`])
//! are supplied by the caller and serialised by [`crate::command`]; the
//! remaining types are produced by [`crate::reply`] when decoding server
//! replies. Optional numeric fields are zero-valued; a zero value means the
//! corresponding wire flag is omitted.

use time::OffsetDateTime;

/// A job submitted for asynchronous execution with `add`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackgroundJob {
    /// Server-opaque job identifier.
    pub id: String,
    /// Queue name the job is routed to.
    pub name: String,
    /// Milliseconds a worker holds a lease before the job may be re-leased.
    pub ttr: u64,
    /// Milliseconds the job may live in the queue.
    pub ttl: u64,
    /// Opaque job payload, possibly empty.
    pub payload: Vec<u8>,
    /// Scheduling priority; zero omits the flag.
    pub priority: i32,
    /// Maximum lease attempts; zero omits the flag.
    pub max_attempts: u32,
    /// Maximum recorded failures; zero omits the flag.
    pub max_fails: u32,
}

/// A job submitted for synchronous execution with `run`.
///
/// The caller blocks until a worker returns a result or the submission times
/// out server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForegroundJob {
    pub id: String,
    pub name: String,
    pub ttr: u64,
    /// Milliseconds to wait for a worker before the server times out.
    pub timeout: u64,
    pub payload: Vec<u8>,
    pub priority: i32,
}

/// A job submitted with `schedule` for execution at a fixed UTC time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduledJob {
    pub id: String,
    pub name: String,
    pub ttr: u64,
    pub ttl: u64,
    /// UTC run time in the form `YYYY-MM-DDTHH:MM:SSZ`, passed through
    /// verbatim.
    pub time: String,
    pub payload: Vec<u8>,
    pub priority: i32,
    pub max_attempts: u32,
    pub max_fails: u32,
}

/// A job handed to a worker by a successful `lease`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeasedJob {
    pub id: String,
    pub name: String,
    pub ttr: u64,
    pub payload: Vec<u8>,
}

/// Outcome of a foreground run or a `result` fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobResult {
    /// Whether the worker completed the job successfully.
    pub success: bool,
    /// Result bytes reported by the worker.
    pub result: Vec<u8>,
}

/// A queue entry decoded from an `inspect jobs` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectedJob {
    pub id: String,
    pub name: String,
    pub ttr: u64,
    pub ttl: u64,
    pub payload: Vec<u8>,
    pub max_attempts: u32,
    pub attempts: u32,
    pub max_fails: u32,
    pub fails: u32,
    pub priority: i32,
    /// Server-side lifecycle state discriminant.
    pub state: i32,
    /// Creation time reported by the server.
    pub created: OffsetDateTime,
}

impl Default for InspectedJob {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            ttr: 0,
            ttl: 0,
            payload: Vec::new(),
            max_attempts: 0,
            attempts: 0,
            max_fails: 0,
            fails: 0,
            priority: 0,
            state: 0,
            created: OffsetDateTime::UNIX_EPOCH,
        }
    }
}
