//! Frame-Codec für Controller-Pakete (Bluefruit Connect Format)
//!
//! Aufbau eines Frames: `'!'`, Typ-Buchstabe, Nutzdaten, Prüfsumme.
//! Die Prüfsumme ist das bitweise NOT der 8-Bit-Summe aller vorherigen Bytes.
//!
//! | Typ | Nutzdaten                 | Länge |
//! |-----|---------------------------|-------|
//! | `C` | r, g, b                   | 6     |
//! | `B` | Tasten-Ziffer, '1' / '0'  | 5     |
//! | `A` `G` `M` `L` | 3 × f32     | 15    |
//! | `Q` | 4 × f32                   | 19    |
//!
//! Nur `C` und `B` werden ausgewertet, Sensor-Frames liefern
//! [`PacketError::Unsupported`].

use rgb::RGB8;

use crate::types::{Button, Packet, PacketError};

pub const FRAME_START: u8 = b'!';

const KIND_COLOR: u8 = b'C';
const KIND_BUTTON: u8 = b'B';

pub const COLOR_FRAME_LEN: usize = 6;
pub const BUTTON_FRAME_LEN: usize = 5;

/// Längster bekannter Frame (Quaternion)
pub const MAX_FRAME_LEN: usize = 19;

/// Erwartete Frame-Länge für einen Typ-Buchstaben
///
/// Ein Stream-Link kann damit erkennen, wann ein Frame vollständig ist.
pub fn frame_len(kind: u8) -> Option<usize> {
    match kind {
        KIND_COLOR => Some(COLOR_FRAME_LEN),
        KIND_BUTTON => Some(BUTTON_FRAME_LEN),
        b'A' | b'G' | b'M' | b'L' => Some(15),
        b'Q' => Some(MAX_FRAME_LEN),
        _ => None,
    }
}

/// Zerlegt aneinandergereihte Frames in einzelne Slices
///
/// Bytes, die keinen bekannten Frame beginnen, laufen bis zum nächsten `'!'`
/// und kommen als eigener Slice heraus (der Decoder lehnt ihn dann ab).
/// Ein unvollständiger letzter Frame wird unverändert geliefert.
///
/// ```
/// # use globe_core::codec::split_frames;
/// let frames: Vec<&[u8]> = split_frames(b"!B516!B507").collect();
/// assert_eq!(frames, [&b"!B516"[..], &b"!B507"[..]]);
/// ```
pub fn split_frames(bytes: &[u8]) -> SplitFrames<'_> {
    SplitFrames { rest: bytes }
}

/// Iterator aus [`split_frames`]
pub struct SplitFrames<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for SplitFrames<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let known = match self.rest {
            [FRAME_START, kind, ..] => frame_len(*kind),
            _ => None,
        };
        let len = match known {
            Some(len) => len.min(self.rest.len()),
            None => self.rest[1..]
                .iter()
                .position(|b| *b == FRAME_START)
                .map_or(self.rest.len(), |pos| pos + 1),
        };
        let (frame, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(frame)
    }
}

/// Prüfsumme über die Bytes vor dem Prüfsummen-Byte
pub fn checksum(bytes: &[u8]) -> u8 {
    !bytes.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}

impl Packet {
    /// Dekodiert den ersten Frame in `frame`
    ///
    /// Bytes hinter dem Frame werden ignoriert.
    ///
    /// # Beispiele
    ///
    /// ```
    /// # use globe_core::{Button, Packet};
    /// let packet = Packet::decode(b"!B516").unwrap();
    /// assert_eq!(packet, Packet::Button { button: Button::Up, pressed: true });
    /// ```
    pub fn decode(frame: &[u8]) -> Result<Self, PacketError> {
        let (&start, rest) = frame.split_first().ok_or(PacketError::Empty)?;
        if start != FRAME_START {
            return Err(PacketError::MissingStart);
        }
        let &kind = rest.first().ok_or(PacketError::Truncated)?;
        let len = frame_len(kind).ok_or(PacketError::UnknownKind(kind))?;
        let frame = frame.get(..len).ok_or(PacketError::Truncated)?;

        let (body, &[sum]) = frame.split_at(len - 1) else {
            return Err(PacketError::Truncated);
        };
        if checksum(body) != sum {
            return Err(PacketError::BadChecksum);
        }

        match kind {
            KIND_COLOR => Ok(Packet::Color(RGB8 {
                r: body[2],
                g: body[3],
                b: body[4],
            })),
            KIND_BUTTON => {
                let button =
                    Button::from_digit(body[2]).ok_or(PacketError::UnknownButton(body[2]))?;
                let pressed = match body[3] {
                    b'1' => true,
                    b'0' => false,
                    other => return Err(PacketError::BadState(other)),
                };
                Ok(Packet::Button { button, pressed })
            }
            other => Err(PacketError::Unsupported(other)),
        }
    }

    /// Kodiert das Paket in `buf` und gibt die Frame-Länge zurück
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, PacketError> {
        let len = match self {
            Packet::Color(_) => COLOR_FRAME_LEN,
            Packet::Button { .. } => BUTTON_FRAME_LEN,
        };
        let out = buf.get_mut(..len).ok_or(PacketError::Truncated)?;

        out[0] = FRAME_START;
        match *self {
            Packet::Color(color) => {
                out[1] = KIND_COLOR;
                out[2] = color.r;
                out[3] = color.g;
                out[4] = color.b;
            }
            Packet::Button { button, pressed } => {
                out[1] = KIND_BUTTON;
                out[2] = button.digit();
                out[3] = if pressed { b'1' } else { b'0' };
            }
        }
        out[len - 1] = checksum(&out[..len - 1]);
        Ok(len)
    }
}
