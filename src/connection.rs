//! Connection lifecycle: handshake, reconnection timer, liveness ping.
//!
//! Grounded on `SerialController`'s `handleIncomingFrame` branches for
//! Handshake/Disconnect/Ping and its `scheduleReconnect` /
//! `attemptReconnect` pair (a 2 second `QTimer::singleShot`).

use std::time::{Duration, Instant};

pub const HANDSHAKE_MAGIC: &[u8] = b"PUSHCLONE_GUI";
pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    WaitingHandshake,
    Connected,
}

/// Side effects the FSM asks the caller to perform. Kept as plain data
/// so the FSM itself stays synchronous and free of I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAction {
    SendHandshakeReply,
    EchoPing,
    ReopenPort,
}

pub struct ConnectionFsm {
    state: ConnectionState,
    reconnect_deadline: Option<Instant>,
}

impl Default for ConnectionFsm {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionFsm {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            reconnect_deadline: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// The port was just opened (initially, or after a reconnect).
    pub fn on_port_opened(&mut self) {
        self.state = ConnectionState::WaitingHandshake;
        self.reconnect_deadline = None;
    }

    /// A port error or user-initiated disconnect request closed the
    /// port outright; arm the reconnect timer.
    pub fn on_port_closed(&mut self, now: Instant) {
        self.state = ConnectionState::Disconnected;
        self.reconnect_deadline = Some(now + RECONNECT_INTERVAL);
    }

    /// The device sent a protocol-level Disconnect frame, or the user
    /// requested a disconnect without an underlying port failure: drop
    /// back to waiting for a fresh handshake, but keep the port open so
    /// a later frame from the device can re-establish the session.
    pub fn on_disconnect_frame(&mut self) {
        self.state = ConnectionState::WaitingHandshake;
    }

    /// Handle an inbound frame relevant to connection lifecycle.
    /// Returns the action(s) the caller should take, if any.
    pub fn on_handshake_frame(&mut self, magic: &[u8]) -> Option<ConnectionAction> {
        if magic == HANDSHAKE_MAGIC {
            self.state = ConnectionState::Connected;
            Some(ConnectionAction::SendHandshakeReply)
        } else {
            None
        }
    }

    pub fn on_ping_frame(&mut self) -> Option<ConnectionAction> {
        if self.state == ConnectionState::Connected {
            Some(ConnectionAction::EchoPing)
        } else {
            None
        }
    }

    /// Called once per tick; fires the reconnect action if the timer
    /// has elapsed.
    pub fn poll_timer(&mut self, now: Instant) -> Option<ConnectionAction> {
        match self.reconnect_deadline {
            Some(deadline) if now >= deadline => {
                self.reconnect_deadline = None;
                Some(ConnectionAction::ReopenPort)
            }
            _ => None,
        }
    }
}
