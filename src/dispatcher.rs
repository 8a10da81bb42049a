//! Command dispatch: map a validated frame to a shadow-state mutation,
//! consulting the ring projection for the handful of commands that
//! carry absolute track/scene coordinates.
//!
//! Grounded on `SerialController::handleIncomingFrame`'s big command
//! switch, generalized here into one dispatch function per command
//! plus the shared `CoordKind` table (consulted through `project_cell`
//! / `project_track_only` below) so the absolute/relative split for the
//! commands listed in spec section 4.6 lives in one place instead of
//! being reinvented per handler. `GridUpdate*` and the pad-index form
//! of `PadUpdate14bit` are window-relative by construction and never
//! call into this table; the dual-coordinate form of `PadUpdate14bit`
//! is absolute but mixed with the relative form inside one command
//! byte, so it is projected directly rather than through the table.

use std::time::Instant;

use crate::codec::{self, cmd};
use crate::connection::{ConnectionAction, ConnectionFsm};
use crate::framer::Frame;
use crate::observer::{ChangeEvent, ObserverBus};
use crate::reaper::TrackBatchReaper;
use crate::ring::{RingOffset, RingProjection};
use crate::shadow::ShadowState;

/// Whether a command's track/scene fields are absolute (must be run
/// through the ring projection) or already window-relative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordKind {
    Absolute,
    Relative,
    None,
}

pub fn coord_kind(command: u8) -> CoordKind {
    match command {
        cmd::CLIP_NAME | cmd::CLIP_STATE | cmd::PAD_UPDATE_7BIT => CoordKind::Absolute,
        cmd::TRACK_NAME | cmd::TRACK_COLOR => CoordKind::Absolute,
        cmd::GRID_UPDATE_7BIT | cmd::GRID_UPDATE_14BIT => CoordKind::Relative,
        _ => CoordKind::None,
    }
}

/// Project a (track, scene) pair for one of the commands `coord_kind`
/// classifies as `Absolute` (runs it through the ring) or `Relative`
/// (already windowed; only bounds-checked).
fn project_cell(ctx: &DispatchContext, command: u8, track: u16, scene: u16) -> Option<(usize, usize)> {
    match coord_kind(command) {
        CoordKind::Absolute => ctx.ring.project(track, scene),
        CoordKind::Relative => {
            let (t, s) = (track as usize, scene as usize);
            (t < crate::ring::RING_WIDTH as usize && s < crate::ring::RING_HEIGHT as usize)
                .then_some((t, s))
        }
        CoordKind::None => None,
    }
}

/// Project a lone track index for one of the commands `coord_kind`
/// classifies as `Absolute` (runs it through the ring) or `Relative`.
fn project_track_only(ctx: &DispatchContext, command: u8, track: u16) -> Option<usize> {
    match coord_kind(command) {
        CoordKind::Absolute => ctx.ring.project_track(track),
        CoordKind::Relative => {
            let t = track as usize;
            (t < crate::ring::RING_WIDTH as usize).then_some(t)
        }
        CoordKind::None => None,
    }
}

/// Bytes the caller should write back to the device as a result of
/// processing this frame (handshake replies, ping echoes).
pub type Outbound = Vec<u8>;

pub struct DispatchContext<'a> {
    pub shadow: &'a mut ShadowState,
    pub ring: &'a mut RingProjection,
    pub reaper: &'a mut TrackBatchReaper,
    pub observers: &'a ObserverBus,
    pub connection: &'a mut ConnectionFsm,
}

pub fn dispatch(ctx: &mut DispatchContext, frame: &Frame, now: Instant) -> Vec<Outbound> {
    let mut outbound = Vec::new();
    let p = &frame.payload;

    match frame.cmd {
        cmd::HANDSHAKE => {
            if let Some(ConnectionAction::SendHandshakeReply) =
                ctx.connection.on_handshake_frame(p)
            {
                ctx.observers.notify(ChangeEvent::Connection);
                if let Ok(bytes) = codec::encode_frame(cmd::HANDSHAKE_REPLY, p) {
                    outbound.push(bytes);
                }
            }
        }
        cmd::DISCONNECT => {
            ctx.connection.on_disconnect_frame();
            ctx.observers.notify(ChangeEvent::Connection);
        }
        cmd::PING => {
            if let Some(ConnectionAction::EchoPing) = ctx.connection.on_ping_frame() {
                if let Ok(bytes) = codec::encode_frame(cmd::PING, p) {
                    outbound.push(bytes);
                }
            }
        }

        cmd::CLIP_NAME => handle_clip_name(ctx, p),
        cmd::CLIP_STATE => handle_clip_state(ctx, p),
        cmd::PAD_UPDATE_7BIT => handle_pad_update_7bit(ctx, p),
        cmd::PAD_UPDATE_14BIT => handle_pad_update_14bit(ctx, p),
        cmd::GRID_UPDATE_7BIT => handle_grid_update_7bit(ctx, p),
        cmd::GRID_UPDATE_14BIT => handle_grid_update_14bit(ctx, p),

        cmd::SCENE_NAME => handle_scene_name(ctx, p),
        cmd::SCENE_COLOR => handle_scene_color(ctx, p),
        cmd::SCENE_STATE | cmd::SCENE_TRIGGERED => handle_scene_triggered(ctx, p),

        cmd::TRACK_NAME => handle_track_name(ctx, p, now),
        cmd::TRACK_COLOR => handle_track_color(ctx, p),
        cmd::SELECTED_TRACK => handle_selected_track(ctx, p),

        cmd::MIXER_VOLUME => handle_mixer_volume(ctx, p),
        cmd::MIXER_PAN => handle_mixer_pan(ctx, p),
        cmd::MIXER_MUTE => handle_mixer_bool(ctx, p, |m, i, v| m.set_muted(i, v)),
        cmd::MIXER_SOLO => handle_mixer_bool(ctx, p, |m, i, v| m.set_solo(i, v)),
        cmd::MIXER_ARM => handle_mixer_bool(ctx, p, |m, i, v| m.set_armed(i, v)),
        cmd::MIXER_SEND => handle_mixer_send(ctx, p),
        cmd::MIXER_MODE => {} // acknowledged but not shadow-visible

        cmd::TRANSPORT_PLAY => handle_transport_bool(ctx, p, |t, v| t.set_playing(v)),
        cmd::TRANSPORT_RECORD => handle_transport_bool(ctx, p, |t, v| t.set_recording(v)),
        cmd::TRANSPORT_LOOP => handle_transport_bool(ctx, p, |t, v| t.set_looping(v)),
        cmd::TRANSPORT_TEMPO => handle_transport_tempo(ctx, p),
        cmd::TRANSPORT_POSITION => handle_transport_position(ctx, p),
        cmd::TRANSPORT_STATE => handle_transport_state(ctx, p),

        cmd::SHIFT_STATE => handle_shift_state(ctx, p),
        cmd::RING_POSITION => handle_ring_position(ctx, p),
        cmd::CLIP_TRIGGER => {} // host->device only; nothing to shadow

        other => {
            log::warn!("unknown command byte {:#04x} ({} byte payload)", other, p.len());
        }
    }

    outbound
}

fn handle_clip_name(ctx: &mut DispatchContext, p: &[u8]) {
    if p.len() < 2 {
        return;
    }
    let (abs_track, abs_scene) = (p[0] as u16, p[1] as u16);
    let Some((track, scene)) = project_cell(ctx, cmd::CLIP_NAME, abs_track, abs_scene) else { return };
    let Some(name) = codec::read_length_prefixed_utf8(p, 2) else { return };
    if ctx.shadow.clips.set_name(track, scene, name) {
        ctx.observers.notify(ChangeEvent::Clip { track, scene });
    }
}

fn handle_clip_state(ctx: &mut DispatchContext, p: &[u8]) {
    if p.len() < 3 {
        return;
    }
    let (abs_track, abs_scene, state) = (p[0] as u16, p[1] as u16, p[2]);
    let Some((track, scene)) = project_cell(ctx, cmd::CLIP_STATE, abs_track, abs_scene) else { return };
    let mut changed = ctx.shadow.clips.set_state(track, scene, state);
    if p.len() >= 9 {
        let buf: [u8; 6] = p[3..9].try_into().unwrap();
        changed |= ctx.shadow.clips.set_color(track, scene, codec::color_from_14(&buf));
    }
    if changed {
        ctx.observers.notify(ChangeEvent::Clip { track, scene });
    }
}

fn handle_pad_update_7bit(ctx: &mut DispatchContext, p: &[u8]) {
    if p.len() < 5 {
        return;
    }
    let (abs_track, abs_scene) = (p[0] as u16, p[1] as u16);
    let Some((track, scene)) = project_cell(ctx, cmd::PAD_UPDATE_7BIT, abs_track, abs_scene) else { return };
    let buf: [u8; 3] = p[2..5].try_into().unwrap();
    if ctx.shadow.clips.set_color(track, scene, codec::color_from_7(&buf)) {
        ctx.observers.notify(ChangeEvent::Clip { track, scene });
    }
}

fn handle_pad_update_14bit(ctx: &mut DispatchContext, p: &[u8]) {
    let (track, scene, color_offset) = if p.len() >= 8 && p[0] < 8 && p[1] < 4 {
        let Some(rel) = ctx.ring.project(p[0] as u16, p[1] as u16) else { return };
        (rel.0, rel.1, 2)
    } else {
        if p.is_empty() {
            return;
        }
        let pad_index = p[0] as usize;
        let (track, scene) = (pad_index % 8, pad_index / 8);
        if scene >= 4 {
            return;
        }
        (track, scene, 1)
    };
    if p.len() < color_offset + 6 {
        return;
    }
    let buf: [u8; 6] = p[color_offset..color_offset + 6].try_into().unwrap();
    if ctx.shadow.clips.set_color(track, scene, codec::color_from_14(&buf)) {
        ctx.observers.notify(ChangeEvent::Clip { track, scene });
    }
}

fn handle_grid_update_7bit(ctx: &mut DispatchContext, p: &[u8]) {
    for (i, chunk) in p.chunks_exact(3).enumerate() {
        let (track, scene) = (i % 8, i / 8);
        if scene >= 4 {
            break;
        }
        let buf: [u8; 3] = chunk.try_into().unwrap();
        if ctx.shadow.clips.set_color(track, scene, codec::color_from_7(&buf)) {
            ctx.observers.notify(ChangeEvent::Clip { track, scene });
        }
    }
}

fn handle_grid_update_14bit(ctx: &mut DispatchContext, p: &[u8]) {
    for (i, chunk) in p.chunks_exact(6).enumerate() {
        let (track, scene) = (i % 8, i / 8);
        if scene >= 4 {
            break;
        }
        let buf: [u8; 6] = chunk.try_into().unwrap();
        if ctx.shadow.clips.set_color(track, scene, codec::color_from_14(&buf)) {
            ctx.observers.notify(ChangeEvent::Clip { track, scene });
        }
    }
}

fn handle_scene_name(ctx: &mut DispatchContext, p: &[u8]) {
    if p.is_empty() {
        return;
    }
    let index = p[0] as usize;
    // Unlike ClipName/TrackName, SceneName carries no length prefix: the
    // remainder of the payload is the whole name, verbatim.
    let name = String::from_utf8_lossy(&p[1..]).into_owned();
    if ctx.shadow.scenes.set_name(index, name) {
        ctx.observers.notify(ChangeEvent::Scene { index });
    }
}

fn handle_scene_color(ctx: &mut DispatchContext, p: &[u8]) {
    if p.len() < 2 {
        return;
    }
    let index = p[0] as usize;
    let color = if p.len() >= 7 {
        codec::color_from_14(&p[1..7].try_into().unwrap())
    } else if p.len() >= 4 {
        codec::color_from_7(&p[1..4].try_into().unwrap())
    } else {
        return;
    };
    if ctx.shadow.scenes.set_color(index, color) {
        ctx.observers.notify(ChangeEvent::Scene { index });
    }
}

fn handle_scene_triggered(ctx: &mut DispatchContext, p: &[u8]) {
    if p.len() < 2 {
        return;
    }
    let index = p[0] as usize;
    let triggered = p[1] != 0;
    if ctx.shadow.scenes.set_triggered(index, triggered) {
        ctx.observers.notify(ChangeEvent::Scene { index });
    }
}

fn handle_track_name(ctx: &mut DispatchContext, p: &[u8], now: Instant) {
    if p.is_empty() {
        return;
    }
    let abs_track = p[0] as u16;
    let Some(name) = codec::read_length_prefixed_utf8(p, 1) else { return };

    // Mixer is globally indexed; always applies.
    if ctx.shadow.mixer.set_name(abs_track as usize, name.clone()) {
        ctx.observers.notify(ChangeEvent::Mixer { index: abs_track as usize });
    }

    // Track list is windowed. The batch timer is (re)armed here but
    // polled by the controller's tick loop, since its whole purpose is
    // to fire once frames *stop* arriving.
    if let Some(track) = project_track_only(ctx, cmd::TRACK_NAME, abs_track) {
        if ctx.shadow.tracks.set_name(track, name) {
            ctx.observers.notify(ChangeEvent::Track { index: track });
        }
        ctx.reaper.mark_present(track, now);
    }
}

fn handle_track_color(ctx: &mut DispatchContext, p: &[u8]) {
    if p.len() < 2 {
        return;
    }
    let abs_track = p[0] as u16;
    let color = if p.len() >= 7 {
        codec::color_from_14(&p[1..7].try_into().unwrap())
    } else if p.len() >= 4 {
        codec::color_from_7(&p[1..4].try_into().unwrap())
    } else {
        return;
    };

    if ctx.shadow.mixer.set_color(abs_track as usize, color) {
        ctx.observers.notify(ChangeEvent::Mixer { index: abs_track as usize });
    }
    if let Some(track) = project_track_only(ctx, cmd::TRACK_COLOR, abs_track) {
        if ctx.shadow.tracks.set_color(track, color) {
            ctx.observers.notify(ChangeEvent::Track { index: track });
        }
    }
}

fn handle_selected_track(ctx: &mut DispatchContext, p: &[u8]) {
    if p.is_empty() {
        return;
    }
    if ctx.shadow.mixer.set_selected(p[0] as usize) {
        ctx.observers.notify(ChangeEvent::Mixer { index: ctx.shadow.mixer.selected() });
    }
}

fn handle_mixer_volume(ctx: &mut DispatchContext, p: &[u8]) {
    if p.len() < 3 {
        return;
    }
    let index = p[0] as usize;
    let volume = codec::normalize_volume_14(p[1], p[2]);
    if ctx.shadow.mixer.set_volume(index, volume) {
        ctx.observers.notify(ChangeEvent::Mixer { index });
    }
}

fn handle_mixer_pan(ctx: &mut DispatchContext, p: &[u8]) {
    if p.len() < 3 {
        return;
    }
    let index = p[0] as usize;
    let pan = codec::normalize_volume_14(p[1], p[2]);
    if ctx.shadow.mixer.set_pan(index, pan) {
        ctx.observers.notify(ChangeEvent::Mixer { index });
    }
}

fn handle_mixer_bool(
    ctx: &mut DispatchContext,
    p: &[u8],
    apply: impl Fn(&mut crate::shadow::MixerModel, usize, bool) -> bool,
) {
    if p.len() < 2 {
        return;
    }
    let index = p[0] as usize;
    let value = p[1] != 0;
    if apply(ctx.shadow.mixer, index, value) {
        ctx.observers.notify(ChangeEvent::Mixer { index });
    }
}

fn handle_mixer_send(ctx: &mut DispatchContext, p: &[u8]) {
    if p.len() < 4 {
        return;
    }
    let index = p[0] as usize;
    let send_index = p[1] as usize;
    let value = codec::normalize_volume_14(p[2], p[3]);
    if ctx.shadow.mixer.set_send(index, send_index, value) {
        ctx.observers.notify(ChangeEvent::Mixer { index });
    }
}

fn handle_transport_bool(
    ctx: &mut DispatchContext,
    p: &[u8],
    apply: impl Fn(&mut crate::shadow::TransportState, bool) -> bool,
) {
    if p.is_empty() {
        return;
    }
    if apply(&mut ctx.shadow.transport, p[0] != 0) {
        ctx.observers.notify(ChangeEvent::Transport);
    }
}

fn handle_transport_tempo(ctx: &mut DispatchContext, p: &[u8]) {
    if p.len() < 2 {
        return;
    }
    let tempo = codec::decode_u14(p[0], p[1]) as f64 / 10.0;
    if ctx.shadow.transport.set_tempo(tempo) {
        ctx.observers.notify(ChangeEvent::Transport);
    }
}

fn handle_transport_position(ctx: &mut DispatchContext, p: &[u8]) {
    let Some(position) = codec::read_length_prefixed_utf8(p, 0) else { return };
    if ctx.shadow.transport.set_position(position) {
        ctx.observers.notify(ChangeEvent::Transport);
    }
}

fn handle_transport_state(ctx: &mut DispatchContext, p: &[u8]) {
    if p.is_empty() {
        return;
    }
    if ctx.shadow.transport.apply_state_flags(p[0]) {
        ctx.observers.notify(ChangeEvent::Transport);
    }
}

fn handle_shift_state(ctx: &mut DispatchContext, p: &[u8]) {
    if p.is_empty() {
        return;
    }
    if ctx.shadow.transport.set_shift_pressed(p[0] != 0) {
        ctx.observers.notify(ChangeEvent::Transport);
    }
}

fn handle_ring_position(ctx: &mut DispatchContext, p: &[u8]) {
    if p.len() < 4 {
        return;
    }
    let offset = RingOffset {
        track_offset: codec::decode_u14(p[0], p[1]),
        scene_offset: codec::decode_u14(p[2], p[3]),
    };
    if ctx.ring.set_offset(offset) {
        ctx.shadow.clips.reset_all(crate::shadow::clip::DEFAULT_CLIP_COLOR);
        ctx.shadow.tracks.reset_all();
        ctx.observers.notify(ChangeEvent::RingOffset);
        ctx.observers.notify(ChangeEvent::ClipReset);
        ctx.observers.notify(ChangeEvent::TrackReset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_frame;

    fn new_ctx() -> (ShadowState, RingProjection, TrackBatchReaper, ObserverBus, ConnectionFsm) {
        (
            ShadowState::new(),
            RingProjection::new(),
            TrackBatchReaper::new(),
            ObserverBus::new(),
            ConnectionFsm::new(),
        )
    }

    fn dispatch_frame(
        shadow: &mut ShadowState,
        ring: &mut RingProjection,
        reaper: &mut TrackBatchReaper,
        observers: &ObserverBus,
        connection: &mut ConnectionFsm,
        frame: Frame,
    ) -> Vec<Outbound> {
        let mut ctx = DispatchContext { shadow, ring, reaper, observers, connection };
        dispatch(&mut ctx, &frame, Instant::now())
    }

    #[test]
    fn handshake_triggers_reply_and_connects() {
        let (mut shadow, mut ring, mut reaper, observers, mut connection) = new_ctx();
        connection.on_port_opened();
        let frame = Frame { cmd: cmd::HANDSHAKE, payload: b"PUSHCLONE_GUI".to_vec() };
        let out = dispatch_frame(&mut shadow, &mut ring, &mut reaper, &observers, &mut connection, frame);
        assert_eq!(out, vec![encode_frame(cmd::HANDSHAKE_REPLY, b"PUSHCLONE_GUI").unwrap()]);
        assert!(connection.is_connected());
    }

    #[test]
    fn mixer_volume_frame_sets_unity_gain() {
        let (mut shadow, mut ring, mut reaper, observers, mut connection) = new_ctx();
        let frame = Frame { cmd: cmd::MIXER_VOLUME, payload: vec![2, 0x7F, 0x7F] };
        dispatch_frame(&mut shadow, &mut ring, &mut reaper, &observers, &mut connection, frame);
        let track = shadow.mixer.get(2).unwrap();
        assert!((track.volume - 1.0).abs() < 1e-3);
        assert_eq!(track.volume_label(), "0.0 dB");
    }

    #[test]
    fn mixer_pan_center_labels_as_c() {
        let (mut shadow, mut ring, mut reaper, observers, mut connection) = new_ctx();
        let frame = Frame { cmd: cmd::MIXER_PAN, payload: vec![0, 0x40, 0x00] };
        dispatch_frame(&mut shadow, &mut ring, &mut reaper, &observers, &mut connection, frame);
        assert_eq!(shadow.mixer.get(0).unwrap().pan_label(), "C");
    }

    #[test]
    fn ring_move_clears_clip_and_track_but_not_mixer() {
        let (mut shadow, mut ring, mut reaper, observers, mut connection) = new_ctx();
        shadow.tracks.set_name(2, "Drums".into());
        shadow.mixer.set_name(2, "Drums".into());

        let frame = Frame {
            cmd: cmd::RING_POSITION,
            payload: vec![0, 8, 0, 0], // track_offset = decode_u14(0,8) = 8
        };
        dispatch_frame(&mut shadow, &mut ring, &mut reaper, &observers, &mut connection, frame);

        assert!(!shadow.tracks.get(2).unwrap().active());
        assert_eq!(shadow.mixer.get(2).unwrap().name, "Drums");
    }

    #[test]
    fn checksum_mismatch_never_reaches_dispatch() {
        // sanity: a malformed payload for clip_state with too few bytes
        // is silently ignored, not a panic.
        let (mut shadow, mut ring, mut reaper, observers, mut connection) = new_ctx();
        let frame = Frame { cmd: cmd::CLIP_STATE, payload: vec![0] };
        dispatch_frame(&mut shadow, &mut ring, &mut reaper, &observers, &mut connection, frame);
        assert_eq!(shadow.clips.cell(0, 0).unwrap().state, 0);
    }

    #[test]
    fn pad_update_14bit_dual_format_absolute() {
        let (mut shadow, mut ring, mut reaper, observers, mut connection) = new_ctx();
        let mut payload = vec![3u8, 1u8]; // track=3, scene=1
        payload.extend_from_slice(&[0x7F, 0x7F, 0, 0, 0, 0]); // red
        let frame = Frame { cmd: cmd::PAD_UPDATE_14BIT, payload };
        dispatch_frame(&mut shadow, &mut ring, &mut reaper, &observers, &mut connection, frame);
        assert_eq!(shadow.clips.cell(3, 1).unwrap().color.r, 255);
    }

    #[test]
    fn pad_update_14bit_padindex_format_relative() {
        let (mut shadow, mut ring, mut reaper, observers, mut connection) = new_ctx();
        let mut payload = vec![10u8]; // padIndex=10 -> track=2, scene=1
        payload.extend_from_slice(&[0x7F, 0x7F, 0, 0, 0, 0]);
        let frame = Frame { cmd: cmd::PAD_UPDATE_14BIT, payload };
        dispatch_frame(&mut shadow, &mut ring, &mut reaper, &observers, &mut connection, frame);
        assert_eq!(shadow.clips.cell(2, 1).unwrap().color.r, 255);
    }

    #[test]
    fn clip_name_outside_window_is_dropped_via_projection_table() {
        let (mut shadow, mut ring, mut reaper, observers, mut connection) = new_ctx();
        // absTrack=8 is outside the default 0..8 window: coord_kind
        // classifies ClipName as Absolute, so project_cell must route
        // it through the ring and reject it.
        let mut payload = vec![8u8, 0u8, 1u8];
        payload.extend_from_slice(b"Drums");
        let frame = Frame { cmd: cmd::CLIP_NAME, payload };
        dispatch_frame(&mut shadow, &mut ring, &mut reaper, &observers, &mut connection, frame);
        assert_eq!(shadow.clips.cell(0, 0).unwrap().name, "");
    }

    #[test]
    fn scene_name_decodes_raw_remainder_without_length_prefix() {
        let (mut shadow, mut ring, mut reaper, observers, mut connection) = new_ctx();
        // No length byte: the whole remainder after the scene index is
        // the name, verbatim (unlike ClipName/TrackName).
        let mut payload = vec![1u8];
        payload.extend_from_slice(b"Drums");
        let frame = Frame { cmd: cmd::SCENE_NAME, payload };
        dispatch_frame(&mut shadow, &mut ring, &mut reaper, &observers, &mut connection, frame);
        assert_eq!(shadow.scenes.get(1).unwrap().name, "Drums");
    }

    #[test]
    fn scene_name_first_byte_is_not_misread_as_a_length_prefix() {
        let (mut shadow, mut ring, mut reaper, observers, mut connection) = new_ctx();
        // The name's first byte is 0x02, which a length-prefixed reader
        // would treat as "length 2, non-overrunning" and slice out only
        // the next two bytes ("XY"), dropping the leading 0x02. The raw
        // decode must keep the whole remainder intact.
        let mut payload = vec![0u8, 0x02];
        payload.extend_from_slice(b"XY");
        let frame = Frame { cmd: cmd::SCENE_NAME, payload };
        dispatch_frame(&mut shadow, &mut ring, &mut reaper, &observers, &mut connection, frame);
        assert_eq!(shadow.scenes.get(0).unwrap().name, "\u{2}XY");
    }
}
