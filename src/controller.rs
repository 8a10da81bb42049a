//! The event loop gluing Port, Framer, ConnectionFsm, Dispatcher, and
//! the shadow models together, plus the background-thread command/
//! status channel a view layer consumes.
//!
//! The background-thread wiring (`spawn_link`, the `bounded` command
//! and status channels, the `select!`/`tick()` loop) is modeled
//! directly on `player::spawn_player`/`player_loop`.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, select, tick, Receiver, Sender};

use crate::codec::{self, cmd};
use crate::connection::{ConnectionAction, ConnectionFsm, ConnectionState};
use crate::dispatcher::{self, DispatchContext};
use crate::framer::Framer;
use crate::observer::ObserverBus;
use crate::port::SerialPort;
use crate::reaper::TrackBatchReaper;
use crate::ring::RingProjection;
use crate::shadow::ShadowState;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Outbound actions a view layer can request of the link.
pub enum LinkCommand {
    TransportPlay(bool),
    TransportRecord(bool),
    TransportLoop(bool),
    TriggerClip { track: u8, scene: u8 },
    Disconnect,
    Reconnect,
    Quit,
}

/// Periodic connection snapshot pushed to the status channel.
#[derive(Debug, Clone)]
pub struct LinkStatus {
    pub connection_state: ConnectionState,
    pub last_error: Option<String>,
}

/// Owns the whole link layer for one serial device.
pub struct LinkController {
    port: Box<dyn SerialPort>,
    framer: Framer,
    connection: ConnectionFsm,
    ring: RingProjection,
    reaper: TrackBatchReaper,
    observers: ObserverBus,
    pub shadow: ShadowState,
    last_error: Option<String>,
}

impl LinkController {
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self {
            port,
            framer: Framer::new(),
            connection: ConnectionFsm::new(),
            ring: RingProjection::new(),
            reaper: TrackBatchReaper::new(),
            observers: ObserverBus::new(),
            shadow: ShadowState::new(),
            last_error: None,
        }
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&crate::observer::ChangeEvent) + Send + 'static,
    {
        self.observers.subscribe(listener);
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Open the port for the first time and enter `WaitingHandshake`.
    pub fn open(&mut self) {
        match self.port.open() {
            Ok(()) => {
                self.connection.on_port_opened();
                self.last_error = None;
            }
            Err(e) => {
                log::warn!("failed to open serial port: {e}");
                self.last_error = Some(e.to_string());
                self.connection.on_port_closed(Instant::now());
            }
        }
    }

    fn send(&mut self, bytes: &[u8]) {
        if let Err(e) = self.port.write(bytes) {
            log::warn!("write failed, closing port: {e}");
            self.last_error = Some(e.to_string());
            self.port.close();
            self.connection.on_port_closed(Instant::now());
        }
    }

    fn apply_command(&mut self, command: LinkCommand) {
        match command {
            LinkCommand::TransportPlay(v) => self.send_simple(cmd::TRANSPORT_PLAY, v as u8),
            LinkCommand::TransportRecord(v) => self.send_simple(cmd::TRANSPORT_RECORD, v as u8),
            LinkCommand::TransportLoop(v) => self.send_simple(cmd::TRANSPORT_LOOP, v as u8),
            LinkCommand::TriggerClip { track, scene } => {
                if let Ok(bytes) = codec::encode_frame(cmd::CLIP_TRIGGER, &[track, scene]) {
                    self.send(&bytes);
                }
            }
            LinkCommand::Disconnect => {
                if let Ok(bytes) = codec::encode_frame(cmd::DISCONNECT, &[]) {
                    self.send(&bytes);
                }
                self.connection.on_disconnect_frame();
            }
            LinkCommand::Reconnect => {
                self.port.close();
                self.open();
            }
            LinkCommand::Quit => {}
        }
    }

    fn send_simple(&mut self, command: u8, value: u8) {
        if let Ok(bytes) = codec::encode_frame(command, &[value]) {
            self.send(&bytes);
        }
    }

    /// One iteration: drain the port, dispatch every frame it yielded,
    /// then check the reconnect and track-reaper timers.
    pub fn tick(&mut self, now: Instant) {
        if let Some(ConnectionAction::ReopenPort) = self.connection.poll_timer(now) {
            self.open();
        }

        match self.port.poll_read() {
            Ok(bytes) if !bytes.is_empty() => {
                let frames = self.framer.feed(&bytes);
                let mut outbound = Vec::new();
                for frame in &frames {
                    let mut ctx = DispatchContext {
                        shadow: &mut self.shadow,
                        ring: &mut self.ring,
                        reaper: &mut self.reaper,
                        observers: &self.observers,
                        connection: &mut self.connection,
                    };
                    outbound.extend(dispatcher::dispatch(&mut ctx, frame, now));
                }
                for bytes in outbound {
                    self.send(&bytes);
                }
            }
            Ok(_) => {}
            Err(e) => {
                log::warn!("serial read failed, closing port: {e}");
                self.last_error = Some(e.to_string());
                self.port.close();
                self.connection.on_port_closed(now);
            }
        }

        if let Some(keep_through) = self.reaper.poll_timer(now) {
            self.shadow.tracks.clear_above(keep_through);
            self.observers.notify(crate::observer::ChangeEvent::TrackReset);
        }
    }

    fn status(&self) -> LinkStatus {
        LinkStatus {
            connection_state: self.connection.state(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Spawn the link controller on a dedicated background thread and
/// return the command/status channel pair a view layer talks to.
pub fn spawn_link(mut controller: LinkController) -> (Sender<LinkCommand>, Receiver<LinkStatus>) {
    let (cmd_tx, cmd_rx) = bounded::<LinkCommand>(64);
    let (status_tx, status_rx) = bounded::<LinkStatus>(16);

    thread::Builder::new()
        .name("pushlink-controller".into())
        .spawn(move || {
            controller.open();
            controller_loop(controller, cmd_rx, status_tx);
        })
        .expect("failed to spawn pushlink controller thread");

    (cmd_tx, status_rx)
}

fn controller_loop(mut controller: LinkController, cmd_rx: Receiver<LinkCommand>, status_tx: Sender<LinkStatus>) {
    let poll_tick = tick(POLL_INTERVAL);
    loop {
        select! {
            recv(cmd_rx) -> msg => {
                match msg {
                    Ok(LinkCommand::Quit) | Err(_) => {
                        controller.port.close();
                        return;
                    }
                    Ok(command) => controller.apply_command(command),
                }
            }
            recv(poll_tick) -> _ => {
                controller.tick(Instant::now());
                let _ = status_tx.try_send(controller.status());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MockSerialPort;

    fn handshake_bytes() -> Vec<u8> {
        codec::encode_frame(cmd::HANDSHAKE, b"PUSHCLONE_GUI").unwrap()
    }

    #[test]
    fn tick_processes_handshake_and_replies() {
        let mut mock = MockSerialPort::new();
        mock.open().unwrap();
        mock.push_incoming(&handshake_bytes());
        let mut controller = LinkController::new(Box::new(mock));
        controller.connection.on_port_opened();
        controller.tick(Instant::now());
        assert_eq!(controller.connection_state(), ConnectionState::Connected);
    }

    #[test]
    fn tick_with_no_bytes_does_not_panic() {
        let mut mock = MockSerialPort::new();
        mock.open().unwrap();
        let mut controller = LinkController::new(Box::new(mock));
        controller.connection.on_port_opened();
        controller.tick(Instant::now());
        assert_eq!(controller.connection_state(), ConnectionState::WaitingHandshake);
    }

    #[test]
    fn track_batch_reaper_fires_from_tick_after_timeout() {
        let mut mock = MockSerialPort::new();
        mock.open().unwrap();
        let frame0 = codec::encode_frame(cmd::TRACK_NAME, &[0, 1, b'A']).unwrap();
        mock.push_incoming(&frame0);
        let mut controller = LinkController::new(Box::new(mock));
        controller.connection.on_port_opened();

        let t0 = Instant::now();
        controller.tick(t0);
        assert!(controller.shadow.tracks.get(0).unwrap().active());

        controller.tick(t0 + crate::reaper::BATCH_TIMEOUT);
        assert!(!controller.shadow.tracks.get(3).unwrap().active());
    }
}
