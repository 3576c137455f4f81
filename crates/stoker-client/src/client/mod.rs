//! Client operations and connection lifecycle.

use tracing::{debug, trace};

use stoker_proto::scanner::Scanner;
use stoker_proto::{
    BackgroundJob, ClientError, ForegroundJob, InspectedJob, JobResult, LeasedJob, NetError,
    ScheduledJob, command, reply,
};

use crate::endpoint::Endpoint;
use crate::transport::{TcpTransport, Transport};

const CLIENT_TARGET: &str = "stoker::client";

/// Client owning a single connection to a `stokerd` server.
///
/// Strictly request/response: each operation writes one command frame and
/// decodes one reply, so replies pair unambiguously with the most recent
/// write. The client is not thread safe and does not multiplex. After a
/// failed operation the connection state is undefined; callers should close
/// and reconnect.
#[derive(Debug)]
pub struct Client<T: Transport> {
    scanner: Scanner<T>,
    closed: bool,
}

impl Client<TcpTransport> {
    /// Dials `address` (`host:port` or `tcp://host:port`).
    ///
    /// Address and dial failures surface as transport errors.
    pub fn connect(address: &str) -> Result<Self, ClientError> {
        let endpoint: Endpoint = address
            .parse()
            .map_err(|error| NetError::new(format!("invalid address {address}: {error}")))?;
        let transport = TcpTransport::connect(&endpoint)?;
        debug!(target: CLIENT_TARGET, %endpoint, "connected");
        Ok(Self::new(transport))
    }
}

impl<T: Transport> Client<T> {
    /// Wraps an established transport.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            scanner: Scanner::new(transport),
            closed: false,
        }
    }

    /// Submits a background job for asynchronous execution.
    pub fn add(&mut self, job: &BackgroundJob) -> Result<(), ClientError> {
        self.send(&command::add(job))?;
        reply::read_ack(&mut self.scanner)
    }

    /// Submits a foreground job and blocks for its result.
    ///
    /// The server holds the reply until a worker finishes or the job's
    /// timeout elapses, so this call can block for up to that long.
    pub fn run(&mut self, job: &ForegroundJob) -> Result<JobResult, ClientError> {
        self.send(&command::run(job))?;
        reply::read_result(&mut self.scanner)
    }

    /// Submits a job for execution at a fixed UTC time.
    pub fn schedule(&mut self, job: &ScheduledJob) -> Result<(), ClientError> {
        self.send(&command::schedule(job))?;
        reply::read_ack(&mut self.scanner)
    }

    /// Fetches the result of a previously submitted job, waiting up to
    /// `timeout` milliseconds server-side.
    pub fn result(&mut self, id: &str, timeout: u64) -> Result<JobResult, ClientError> {
        self.send(&command::result(id, timeout))?;
        reply::read_result(&mut self.scanner)
    }

    /// Leases the next job from any of the named queues, waiting up to
    /// `timeout` milliseconds server-side.
    pub fn lease(&mut self, names: &[&str], timeout: u64) -> Result<LeasedJob, ClientError> {
        self.send(&command::lease(names, timeout))?;
        reply::read_lease(&mut self.scanner)
    }

    /// Marks a leased job as completed, attaching the result payload.
    pub fn complete(&mut self, id: &str, result: &[u8]) -> Result<(), ClientError> {
        self.send(&command::complete(id, result))?;
        reply::read_ack(&mut self.scanner)
    }

    /// Marks a leased job as failed, attaching the failure payload.
    pub fn fail(&mut self, id: &str, result: &[u8]) -> Result<(), ClientError> {
        self.send(&command::fail(id, result))?;
        reply::read_ack(&mut self.scanner)
    }

    /// Deletes a job from its queue.
    pub fn delete(&mut self, id: &str) -> Result<(), ClientError> {
        self.send(&command::delete(id))?;
        reply::read_ack(&mut self.scanner)
    }

    /// Pages through the queue entries of `name`, starting at `cursor` and
    /// returning at most `limit` records.
    pub fn inspect_jobs(
        &mut self,
        name: &str,
        cursor: u64,
        limit: u64,
    ) -> Result<Vec<InspectedJob>, ClientError> {
        self.send(&command::inspect_jobs(name, cursor, limit))?;
        reply::read_inspected_jobs(&mut self.scanner)
    }

    /// Shuts the transport down.
    ///
    /// The first close after a successful open succeeds; any further close
    /// is a transport error, as is any operation issued afterwards.
    pub fn close(&mut self) -> Result<(), ClientError> {
        if self.closed {
            return Err(NetError::new("connection already closed").into());
        }
        self.scanner.get_mut().close().map_err(NetError::from)?;
        self.closed = true;
        debug!(target: CLIENT_TARGET, "connection closed");
        Ok(())
    }

    /// Writes one command frame.
    ///
    /// A failed write aborts the operation; no reply is read for it.
    fn send(&mut self, frame: &[u8]) -> Result<(), ClientError> {
        if self.closed {
            return Err(NetError::new("connection already closed").into());
        }
        trace!(target: CLIENT_TARGET, bytes = frame.len(), "writing command frame");
        let transport = self.scanner.get_mut();
        transport.write_all(frame).map_err(NetError::from)?;
        transport.flush().map_err(NetError::from)?;
        Ok(())
    }
}
