//! Mock-Peripherie und Skript-Link für die Host-Tests
//!
//! Zeichnet jeden Port-Aufruf auf, damit Tests den kompletten Verlauf prüfen können.

#![allow(dead_code)]

use std::collections::VecDeque;

use globe_core::codec::{MAX_FRAME_LEN, split_frames};
use globe_core::{
    Button, Controller, LedError, LoopEvent, MonotonicClock, Packet, PacketError, PwmError,
    PwmOutput, SmartLedWriter, StatusIndicator, TransportLink,
};
use rgb::RGB8;

// ============================================================================
// Mock Board
// ============================================================================

#[derive(Default)]
pub struct MockBoard {
    pub now_ms: u64,
    /// Jeder geschriebene Strip-Inhalt
    pub frames: Vec<Vec<RGB8>>,
    /// Jeder geschriebene Duty-Cycle
    pub duties: Vec<u16>,
    pub indicator: bool,
    pub indicator_history: Vec<bool>,
    pub fail_next_write: bool,
    pub fail_next_duty: bool,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&[RGB8]> {
        self.frames.last().map(Vec::as_slice)
    }

    pub fn last_duty(&self) -> Option<u16> {
        self.duties.last().copied()
    }
}

impl SmartLedWriter for MockBoard {
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }
        self.frames.push(pixels.to_vec());
        Ok(())
    }
}

impl PwmOutput for MockBoard {
    fn set_duty(&mut self, duty: u16) -> Result<(), PwmError> {
        if self.fail_next_duty {
            self.fail_next_duty = false;
            return Err(PwmError::DutyRejected);
        }
        self.duties.push(duty);
        Ok(())
    }
}

impl StatusIndicator for MockBoard {
    fn set_indicator(&mut self, on: bool) {
        self.indicator = on;
        self.indicator_history.push(on);
    }
}

impl MonotonicClock for MockBoard {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

// ============================================================================
// Scripted Transport Link
// ============================================================================

#[derive(Default)]
pub struct ScriptedLink {
    pub connected: bool,
    pub accept_count: usize,
    pub frames: VecDeque<Vec<u8>>,
}

impl ScriptedLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, packet: Packet) {
        let mut buf = [0u8; MAX_FRAME_LEN];
        let n = packet.encode(&mut buf).unwrap();
        self.frames.push_back(buf[..n].to_vec());
    }

    pub fn push_raw(&mut self, frame: &[u8]) {
        self.frames.push_back(frame.to_vec());
    }

    /// Eine Nachricht mit mehreren Frames, zerlegt wie im WebSocket-Link
    pub fn push_batch(&mut self, message: &[u8]) {
        for frame in split_frames(message) {
            self.push_raw(frame);
        }
    }
}

impl TransportLink for ScriptedLink {
    fn begin_accepting(&mut self) {
        self.accept_count += 1;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn has_pending_packet(&self) -> bool {
        !self.frames.is_empty()
    }

    fn next_packet(&mut self) -> Result<Packet, PacketError> {
        let frame = self.frames.pop_front().ok_or(PacketError::Empty)?;
        Packet::decode(&frame)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Test-Rig: Controller plus Mocks
pub struct Rig {
    pub controller: Controller,
    pub board: MockBoard,
    pub link: ScriptedLink,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            controller: Controller::new(),
            board: MockBoard::new(),
            link: ScriptedLink::new(),
        }
    }

    /// Advertising starten und Verbindung herstellen
    pub fn connected() -> Self {
        let mut rig = Self::new();
        assert_eq!(rig.poll(), LoopEvent::AdvertisingStarted);
        rig.link.connected = true;
        assert_eq!(rig.poll(), LoopEvent::Connected);
        rig
    }

    pub fn poll(&mut self) -> LoopEvent {
        self.controller.poll(&mut self.board, &mut self.link)
    }

    /// Paket einreihen und genau einen Loop-Durchlauf ausführen
    pub fn send(&mut self, packet: Packet) -> LoopEvent {
        self.link.push(packet);
        self.poll()
    }

    pub fn press(&mut self, button: Button) -> LoopEvent {
        self.send(Packet::Button {
            button,
            pressed: true,
        })
    }

    pub fn release(&mut self, button: Button) -> LoopEvent {
        self.send(Packet::Button {
            button,
            pressed: false,
        })
    }

    /// Uhr weiterstellen und einen Loop-Durchlauf ausführen
    pub fn advance(&mut self, ms: u64) -> LoopEvent {
        self.board.now_ms += ms;
        self.poll()
    }
}
