//! TCP client for the `stokerd` job-queue server.
//!
//! The crate layers a typed request/response client over the wire codec in
//! `stoker-proto`. A [`Client`] owns exactly one connection and issues one
//! request at a time: serialise the command, write the frame, decode the
//! reply in the shape that command expects. There is no pipelining, no
//! internal locking, and no retry policy — callers wanting concurrency run
//! one client per worker, and callers wanting recovery close and reconnect.
//!
//! The transport is a seam: [`Client`] accepts anything implementing
//! [`Transport`], so tests substitute scripted in-memory streams for the
//! [`TcpTransport`] that production code dials via [`Client::connect`].

pub mod client;
pub mod endpoint;
pub mod transport;


pub use client::Client;
pub use endpoint::{Endpoint, EndpointParseError};
pub use stoker_proto::{
    BackgroundJob, ClientError, ForegroundJob, FrameError, InspectedJob, JobResult, LeasedJob,
    NetError, ResponseError, ScheduledJob,
};
pub use transport::{TcpTransport, Transport};
