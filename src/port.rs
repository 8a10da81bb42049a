//! Serial transport abstraction.
//!
//! Mirrors the teacher's device-trait-plus-factory shape (see
//! `sid_device.rs`'s `SidDevice`/`create_device`), generalized from a
//! SID chip to a generic serial endpoint so the link layer can be
//! driven by either a real OS serial port or an in-memory test double.

use std::time::Duration;

use crate::error::{LinkError, Result};

pub trait SerialPort: Send {
    /// Open (or reopen) the underlying device.
    fn open(&mut self) -> Result<()>;

    /// Close the underlying device. Idempotent.
    fn close(&mut self);

    /// Write the given bytes, blocking until the OS buffer accepts them.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Drain whatever bytes are currently available without blocking.
    /// Returns an empty vector when nothing is available.
    fn poll_read(&mut self) -> Result<Vec<u8>>;

    fn is_open(&self) -> bool;
}

/// A real serial port backed by the `serialport` crate. 8N1, no flow
/// control, non-blocking reads, synchronous writes.
pub struct RealSerialPort {
    name: String,
    baud_rate: u32,
    inner: Option<Box<dyn serialport::SerialPort>>,
}

impl RealSerialPort {
    pub fn new(name: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            name: name.into(),
            baud_rate,
            inner: None,
        }
    }
}

impl SerialPort for RealSerialPort {
    fn open(&mut self) -> Result<()> {
        let port = serialport::new(&self.name, self.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(Duration::from_millis(10))
            .open()
            .map_err(LinkError::Port)?;
        self.inner = Some(port);
        Ok(())
    }

    fn close(&mut self) {
        self.inner = None;
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        use std::io::Write;
        let port = self
            .inner
            .as_mut()
            .ok_or_else(|| LinkError::Protocol("write on closed port".into()))?;
        port.write_all(bytes).map_err(LinkError::Io)
    }

    fn poll_read(&mut self) -> Result<Vec<u8>> {
        use std::io::Read;
        let port = match self.inner.as_mut() {
            Some(p) => p,
            None => return Ok(Vec::new()),
        };
        let mut buf = [0u8; 512];
        match port.read(&mut buf) {
            Ok(n) => Ok(buf[..n].to_vec()),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(Vec::new()),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(Vec::new()),
            Err(e) => {
                self.inner = None;
                Err(LinkError::Io(e))
            }
        }
    }

    fn is_open(&self) -> bool {
        self.inner.is_some()
    }
}

/// In-memory double used by tests and by the framer/dispatcher test
/// suites: bytes pushed with `push_incoming` are returned by
/// `poll_read`; bytes sent with `write` accumulate in `sent`.
#[derive(Default)]
pub struct MockSerialPort {
    open: bool,
    incoming: std::collections::VecDeque<u8>,
    pub sent: Vec<u8>,
    pub fail_next_open: bool,
}

impl MockSerialPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_incoming(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().copied());
    }
}

impl SerialPort for MockSerialPort {
    fn open(&mut self) -> Result<()> {
        if self.fail_next_open {
            self.fail_next_open = false;
            return Err(LinkError::Protocol("mock open failure".into()));
        }
        self.open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.sent.extend_from_slice(bytes);
        Ok(())
    }

    fn poll_read(&mut self) -> Result<Vec<u8>> {
        Ok(self.incoming.drain(..).collect())
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// List the serial ports visible to the OS, for config UIs.
pub fn available_ports() -> Vec<String> {
    serialport::available_ports()
        .map(|ports| ports.into_iter().map(|p| p.port_name).collect())
        .unwrap_or_default()
}
