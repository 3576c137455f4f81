//! Transport seam between the client and the network.
//!
//! [`Transport`] is the four-operation contract the client drives: read,
//! write, and close over a reliable byte stream, with optional deadline
//! setters on concrete implementations. [`TcpTransport`] is the production
//! implementation over `std::net::TcpStream`; behavioural tests substitute
//! scripted in-memory streams.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use stoker_proto::{ClientError, NetError};

use crate::endpoint::Endpoint;

/// Bound on establishing a connection; reads and writes carry no local
/// deadline unless the caller sets one.
pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Full-duplex byte stream the client owns exclusively.
pub trait Transport: Read + Write {
    /// Shuts the stream down in both directions.
    ///
    /// Any read pending on another handle of the same stream fails once the
    /// shutdown takes effect.
    fn close(&mut self) -> io::Result<()>;
}

/// TCP transport over the standard library stream.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Resolves the endpoint and dials it with a bounded connect timeout.
    pub fn connect(endpoint: &Endpoint) -> Result<Self, ClientError> {
        let address = resolve(endpoint)?;
        let stream = TcpStream::connect_timeout(&address, CONNECT_TIMEOUT).map_err(|error| {
            NetError::new(format!("failed to connect to {endpoint}: {error}"))
        })?;
        Ok(Self { stream })
    }

    /// Bounds blocking reads; `None` restores indefinite blocking.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.stream.set_read_timeout(timeout)
    }

    /// Bounds blocking writes; `None` restores indefinite blocking.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.stream.set_write_timeout(timeout)
    }
}

impl Read for TcpTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for TcpTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl Transport for TcpTransport {
    fn close(&mut self) -> io::Result<()> {
        self.stream.shutdown(Shutdown::Both)
    }
}

fn resolve(endpoint: &Endpoint) -> Result<SocketAddr, ClientError> {
    let mut addresses = (endpoint.host(), endpoint.port())
        .to_socket_addrs()
        .map_err(|error| NetError::new(format!("failed to resolve {endpoint}: {error}")))?;
    addresses
        .next()
        .ok_or_else(|| NetError::new(format!("no addresses resolved for {endpoint}")).into())
}
