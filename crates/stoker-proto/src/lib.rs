//! Wire codec for the `stokerd` job-queue protocol.
//!
//! The `stoker-proto` crate implements the request/response engine shared by
//! every client of a `stokerd` server: command serialisation, buffered CRLF
//! framing over an arbitrary byte stream, and reply decoding for the four
//! reply shapes the server produces (bare acknowledgement, result, lease,
//! and inspect aggregates). The crate performs no networking of its own —
//! the [`scanner::Scanner`] is generic over `std::io::Read`, so a TCP stream
//! and an in-memory buffer decode identically.
//!
//! Errors fall into three disjoint kinds (see [`error`]): transport failures,
//! framing violations, and server-signalled response errors. The parser is
//! strict: replies that carry excess or missing bytes around an advertised
//! payload length are rejected rather than resynchronised.

pub mod command;
pub mod error;
pub mod job;
pub mod reply;
pub mod scanner;

pub use error::{ClientError, FrameError, NetError, ResponseError};
pub use job::{BackgroundJob, ForegroundJob, InspectedJob, JobResult, LeasedJob, ScheduledJob};

/// Upper bound on any payload size advertised on the wire, in bytes.
///
/// Sizes beyond this bound are rejected as framing errors before any payload
/// bytes are consumed.
pub const MAX_PAYLOAD_SIZE: usize = 1_048_576;
