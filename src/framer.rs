//! Byte-stream to frame-stream conversion, with single-byte resync on
//! corruption.
//!
//! Grounded on `SerialController::processIncomingData`'s buffer-scan
//! loop: on a checksum mismatch we drop exactly the leading sync byte
//! and rescan, rather than discarding the whole accumulated prefix, so
//! a false sync byte inside corrupted data doesn't swallow the next
//! genuine frame.

use crate::codec::{self, SYNC};

/// A decoded, checksum-valid frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub cmd: u8,
    pub payload: Vec<u8>,
}

#[derive(Default)]
pub struct Framer {
    buf: Vec<u8>,
}

impl Framer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Append newly read bytes and drain every complete frame the
    /// buffer now holds, in wire order.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Frame> {
        self.buf.extend_from_slice(bytes);
        let mut out = Vec::new();
        while let Some(frame) = self.try_extract_one() {
            out.push(frame);
        }
        out
    }

    fn try_extract_one(&mut self) -> Option<Frame> {
        loop {
            let sync_pos = self.buf.iter().position(|&b| b == SYNC)?;
            if sync_pos > 0 {
                self.buf.drain(..sync_pos);
            }

            // header = SYNC, cmd, len
            if self.buf.len() < 3 {
                return None;
            }
            let cmd = self.buf[1];
            let len = self.buf[2] as usize;
            let total = 3 + len + 1;
            if self.buf.len() < total {
                return None;
            }

            let payload = self.buf[3..3 + len].to_vec();
            let received_checksum = self.buf[3 + len];
            let expected = codec::checksum(cmd, len as u8, &payload);

            if received_checksum != expected {
                log::warn!(
                    "frame checksum mismatch (cmd={:#04x} len={}), resyncing",
                    cmd,
                    len
                );
                self.buf.drain(..1);
                continue;
            }

            self.buf.drain(..total);
            return Some(Frame { cmd, payload });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_frame;

    #[test]
    fn single_valid_frame_round_trips() {
        let bytes = encode_frame(0x40, &[1]).unwrap();
        let mut framer = Framer::new();
        let frames = framer.feed(&bytes);
        assert_eq!(frames, vec![Frame { cmd: 0x40, payload: vec![1] }]);
    }

    #[test]
    fn two_frames_back_to_back() {
        let mut bytes = encode_frame(0x40, &[1]).unwrap();
        bytes.extend(encode_frame(0x42, &[0]).unwrap());
        let mut framer = Framer::new();
        let frames = framer.feed(&bytes);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].cmd, 0x40);
        assert_eq!(frames[1].cmd, 0x42);
    }

    #[test]
    fn partial_frame_waits_for_more_bytes() {
        let bytes = encode_frame(0x40, &[1]).unwrap();
        let mut framer = Framer::new();
        assert!(framer.feed(&bytes[..3]).is_empty());
        let frames = framer.feed(&bytes[3..]);
        assert_eq!(frames, vec![Frame { cmd: 0x40, payload: vec![1] }]);
    }

    #[test]
    fn corrupt_checksum_drops_one_byte_and_resyncs() {
        let mut bad = encode_frame(0x40, &[1]).unwrap();
        let last = bad.len() - 1;
        bad[last] ^= 0xFF; // corrupt checksum
        let good = encode_frame(0x42, &[1]).unwrap();

        let mut stream = bad;
        stream.extend(good);

        let mut framer = Framer::new();
        let frames = framer.feed(&stream);
        assert_eq!(frames, vec![Frame { cmd: 0x42, payload: vec![1] }]);
    }

    #[test]
    fn garbage_prefix_is_skipped() {
        let mut stream = vec![0x00, 0x11, 0x22];
        stream.extend(encode_frame(0x03, &[]).unwrap());
        let mut framer = Framer::new();
        let frames = framer.feed(&stream);
        assert_eq!(frames, vec![Frame { cmd: 0x03, payload: vec![] }]);
    }

    #[test]
    fn no_sync_byte_clears_nothing_but_yields_no_frame() {
        let mut framer = Framer::new();
        assert!(framer.feed(&[1, 2, 3]).is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::codec::encode_frame;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn round_trips_for_any_payload(cmd in any::<u8>(), payload in prop::collection::vec(any::<u8>(), 0..64)) {
            let bytes = encode_frame(cmd, &payload).unwrap();
            let mut framer = Framer::new();
            let frames = framer.feed(&bytes);
            prop_assert_eq!(frames, vec![Frame { cmd, payload }]);
        }

        #[test]
        fn survives_arbitrary_split_points(
            cmd in any::<u8>(),
            payload in prop::collection::vec(any::<u8>(), 0..32),
            split in 0usize..200,
        ) {
            let bytes = encode_frame(cmd, &payload).unwrap();
            let split = split.min(bytes.len());
            let mut framer = Framer::new();
            let mut frames = framer.feed(&bytes[..split]);
            frames.extend(framer.feed(&bytes[split..]));
            prop_assert_eq!(frames, vec![Frame { cmd, payload }]);
        }

        #[test]
        fn random_prefix_does_not_prevent_following_valid_frame(
            prefix in prop::collection::vec(any::<u8>(), 0..16),
            cmd in any::<u8>(),
            payload in prop::collection::vec(any::<u8>(), 0..16),
        ) {
            let mut stream = prefix;
            stream.extend(encode_frame(cmd, &payload).unwrap());
            let mut framer = Framer::new();
            let frames = framer.feed(&stream);
            prop_assert_eq!(frames.last(), Some(&Frame { cmd, payload }));
        }
    }
}
