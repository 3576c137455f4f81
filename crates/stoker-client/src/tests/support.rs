//! Test doubles for client behaviour tests.
//!
//! [`ScriptedTransport`] replays canned reply bytes and records everything
//! the client writes, so operations can be exercised without a socket.
//! [`FakeServer`] is a mock TCP server that accepts a single connection and
//! streams a canned reply, for tests that need a real dial.

use std::cell::{Cell, RefCell};
use std::io::{self, BufRead, BufReader, Cursor, Read, Write};
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result, anyhow};

use crate::transport::Transport;

/// In-memory transport replaying a scripted reply.
pub(crate) struct ScriptedTransport {
    reply: Cursor<Vec<u8>>,
    written: Rc<RefCell<Vec<u8>>>,
    closes: Rc<Cell<usize>>,
    fail_writes: bool,
}

/// Shared view onto a [`ScriptedTransport`] after the client takes ownership.
pub(crate) struct TransportProbe {
    written: Rc<RefCell<Vec<u8>>>,
    closes: Rc<Cell<usize>>,
}

impl ScriptedTransport {
    /// Builds a transport whose reads replay `reply`.
    pub(crate) fn new(reply: &[u8]) -> (Self, TransportProbe) {
        Self::build(reply, false)
    }

    /// Builds a transport whose writes always fail.
    pub(crate) fn failing_writes() -> (Self, TransportProbe) {
        Self::build(b"", true)
    }

    fn build(reply: &[u8], fail_writes: bool) -> (Self, TransportProbe) {
        let written = Rc::new(RefCell::new(Vec::new()));
        let closes = Rc::new(Cell::new(0));
        let probe = TransportProbe {
            written: Rc::clone(&written),
            closes: Rc::clone(&closes),
        };
        let transport = Self {
            reply: Cursor::new(reply.to_vec()),
            written,
            closes,
            fail_writes,
        };
        (transport, probe)
    }
}

impl TransportProbe {
    /// Returns everything the client has written so far.
    pub(crate) fn written(&self) -> Vec<u8> {
        self.written.borrow().clone()
    }

    /// Returns how many times the transport was closed.
    pub(crate) fn closes(&self) -> usize {
        self.closes.get()
    }
}

impl Read for ScriptedTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reply.read(buf)
    }
}

impl Write for ScriptedTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::other("scripted write failure"));
        }
        self.written.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for ScriptedTransport {
    fn close(&mut self) -> io::Result<()> {
        self.closes.set(self.closes.get() + 1);
        Ok(())
    }
}

/// A mock server that accepts one connection and streams a canned reply.
pub(crate) struct FakeServer {
    port: u16,
    request: Arc<Mutex<Vec<u8>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeServer {
    /// Spawns a server on an ephemeral port.
    ///
    /// The server records `request_lines` newline-terminated lines from the
    /// client, then streams `reply` and closes.
    pub(crate) fn spawn(request_lines: usize, reply: Vec<u8>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake server")?;
        let port = listener.local_addr().context("local addr")?.port();
        let request: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
        let request_clone = Arc::clone(&request);
        let handle = thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut reader =
                BufReader::new(stream.try_clone().expect("clone fake server stream"));
            let mut recorded = Vec::new();
            for _ in 0..request_lines {
                let mut line = Vec::new();
                if reader.read_until(b'\n', &mut line).is_err() || line.is_empty() {
                    break;
                }
                recorded.extend_from_slice(&line);
            }
            if let Ok(mut guard) = request_clone.lock() {
                *guard = recorded;
            }
            let _ = stream.write_all(&reply);
        });
        Ok(Self {
            port,
            request,
            handle: Some(handle),
        })
    }

    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the server thread and returns the recorded request bytes.
    pub(crate) fn take_request(&mut self) -> Result<Vec<u8>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake server thread panicked"))?;
        }
        let request = self
            .request
            .lock()
            .map_err(|error| anyhow!("lock request: {error}"))?;
        Ok(request.clone())
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
