// WebSocket Transport-Link
//
// Verbindet den HTTP-Server (Producer) mit dem Controller-Task (Consumer).
// Eine WebSocket-Session ist genau eine "Verbindung" im Sinne von
// globe_core::TransportLink, jede Nachricht trägt einen oder mehrere
// Bluefruit-Frames.

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::warn;
use globe_core::codec::{MAX_FRAME_LEN, split_frames};
use globe_core::{Packet, PacketError, TransportLink};

use crate::{Frame, FrameChannel};

/// Geteilter Zustand zwischen HTTP-Tasks und Controller-Task
///
/// - `accepting`: Controller hat Advertising gestartet, eine Session darf öffnen
/// - `connected`: Eine Session ist offen
/// - `frames`: Empfangene Frames in Ankunftsreihenfolge
pub struct LinkShared {
    accepting: AtomicBool,
    connected: AtomicBool,
    frames: FrameChannel,
}

impl LinkShared {
    pub const fn new() -> Self {
        Self {
            accepting: AtomicBool::new(false),
            connected: AtomicBool::new(false),
            frames: FrameChannel::new(),
        }
    }

    /// Nimmt der Controller gerade eine neue Session an?
    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::Acquire)
    }

    /// Öffnet eine Session, falls der Controller eine annimmt
    ///
    /// Gibt `false` zurück wenn bereits eine Session offen ist oder der
    /// Controller die letzte Trennung noch nicht verarbeitet hat.
    pub fn try_open_session(&self) -> bool {
        let opened = self
            .accepting
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if opened {
            self.connected.store(true, Ordering::Release);
        }
        opened
    }

    /// Schließt die aktuelle Session
    pub fn close_session(&self) {
        self.connected.store(false, Ordering::Release);
    }

    /// Reiht alle Frames einer WebSocket-Nachricht für den Controller ein
    ///
    /// Eine Nachricht darf mehrere Frames hintereinander enthalten (wie im
    /// Byte-Stream einer UART). Wartet wenn die Queue voll ist.
    pub async fn push_frames(&self, data: &[u8]) {
        for chunk in split_frames(data) {
            // Nur unbekannte Bytes können länger sein, der Decoder lehnt sie ab
            let len = chunk.len().min(MAX_FRAME_LEN);
            if len < chunk.len() {
                warn!("Link: {} unframed bytes truncated", chunk.len());
            }
            match Frame::from_slice(&chunk[..len]) {
                Ok(frame) => self.frames.send(frame).await,
                Err(_) => warn!("Link: frame of {} bytes dropped", chunk.len()),
            }
        }
    }
}

impl Default for LinkShared {
    fn default() -> Self {
        Self::new()
    }
}

/// Controller-Seite des Links
pub struct WebSocketLink {
    shared: &'static LinkShared,
}

impl WebSocketLink {
    pub fn new(shared: &'static LinkShared) -> Self {
        Self { shared }
    }
}

impl TransportLink for WebSocketLink {
    fn begin_accepting(&mut self) {
        // Frames einer alten Session gehören nicht zur neuen
        self.shared.frames.clear();
        self.shared.accepting.store(true, Ordering::Release);
    }

    fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::Acquire)
    }

    fn has_pending_packet(&self) -> bool {
        !self.shared.frames.is_empty()
    }

    fn next_packet(&mut self) -> Result<Packet, PacketError> {
        let frame = self
            .shared
            .frames
            .try_receive()
            .map_err(|_| PacketError::Empty)?;
        Packet::decode(&frame)
    }
}
