//! Controller-Loop
//!
//! Verbindet Transport-Link, Dispatcher und Rampen-Sequencer.
//! Jeder Aufruf von [`Controller::poll`] ist genau ein Loop-Durchlauf:
//!
//! 1. Status-LED schwarz, Advertising starten
//! 2. Auf Verbindung warten (kein Timeout)
//! 3. Status-LED blau
//! 4. Solange verbunden: höchstens ein Paket dispatchen, dann ein Tick-Versuch
//! 5. Bei Trennung zurück zu 1 (Farbe, PWM und LEDs bleiben erhalten)
//!
//! Die äußere Schleife gehört dem Aufrufer. Auf Targets mit Scheduler
//! (Embassy) wird zwischen zwei `poll()`-Aufrufen kurz gewartet.

use crate::dispatch::{DispatchOutcome, dispatch};
use crate::ramp::{TickOutcome, tick};
use crate::state::{ControllerState, StatusSnapshot};
use crate::traits::{Board, PortError, SmartLedWriter, TransportLink};
use crate::types::{BLACK, BLUE, PacketError};

/// Position im Verbindungs-Lebenszyklus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkPhase {
    /// Noch nie advertised (direkt nach dem Start)
    Idle,
    /// Advertising läuft, wartet auf Verbindung
    Advertising,
    Connected,
}

/// Was mit einem eingetroffenen Paket passiert ist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketEvent {
    Dispatched(DispatchOutcome),
    /// Frame konnte nicht dekodiert werden, kein Effekt
    Rejected(PacketError),
    /// Zustand übernommen, aber Port-Zugriff fehlgeschlagen
    Failed(PortError),
}

/// Ergebnis eines Loop-Durchlaufs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopEvent {
    AdvertisingStarted,
    Waiting,
    Connected,
    /// Verbindung verloren, Advertising wurde neu gestartet
    Disconnected,
    Serviced {
        packet: Option<PacketEvent>,
        tick: Result<TickOutcome, PortError>,
    },
}

/// Die Steuerung: Zustand plus Verbindungs-Phase
pub struct Controller {
    state: ControllerState,
    phase: LinkPhase,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            state: ControllerState::new(),
            phase: LinkPhase::Idle,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn phase(&self) -> LinkPhase {
        self.phase
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.state.snapshot(self.phase == LinkPhase::Connected)
    }

    /// Führt einen Loop-Durchlauf aus
    ///
    /// Panikt nie: Port-Fehler werden geloggt und im [`LoopEvent`] gemeldet,
    /// kaputte Frames als [`PacketEvent::Rejected`].
    pub fn poll<H, L>(&mut self, hw: &mut H, link: &mut L) -> LoopEvent
    where
        H: Board,
        L: TransportLink,
    {
        match self.phase {
            LinkPhase::Idle => {
                self.start_advertising(hw, link);
                LoopEvent::AdvertisingStarted
            }
            LinkPhase::Advertising => {
                if !link.is_connected() {
                    return LoopEvent::Waiting;
                }
                #[cfg(feature = "defmt")]
                defmt::info!("Link: connected");
                self.state.set_status_pixel(BLUE);
                self.flush(hw);
                self.phase = LinkPhase::Connected;
                LoopEvent::Connected
            }
            LinkPhase::Connected => {
                if !link.is_connected() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Link: disconnected");
                    self.start_advertising(hw, link);
                    return LoopEvent::Disconnected;
                }
                self.service(hw, link)
            }
        }
    }

    fn start_advertising<H, L>(&mut self, hw: &mut H, link: &mut L)
    where
        H: SmartLedWriter,
        L: TransportLink,
    {
        self.state.set_status_pixel(BLACK);
        self.flush(hw);
        link.begin_accepting();
        self.phase = LinkPhase::Advertising;
        #[cfg(feature = "defmt")]
        defmt::info!("Link: advertising, waiting for connection...");
    }

    fn service<H, L>(&mut self, hw: &mut H, link: &mut L) -> LoopEvent
    where
        H: Board,
        L: TransportLink,
    {
        let packet = if link.has_pending_packet() {
            hw.set_indicator(false);
            self.state.indicator = false;
            Some(self.handle_packet(hw, link))
        } else {
            None
        };

        let now = hw.now_ms();
        let tick_result = tick(&mut self.state, hw, now);
        if let Err(_e) = tick_result {
            #[cfg(feature = "defmt")]
            defmt::error!("Ramp: port write failed: {}", _e);
        }

        self.flush(hw);
        LoopEvent::Serviced {
            packet,
            tick: tick_result,
        }
    }

    fn handle_packet<H, L>(&mut self, hw: &mut H, link: &mut L) -> PacketEvent
    where
        H: Board,
        L: TransportLink,
    {
        let packet = match link.next_packet() {
            Ok(packet) => packet,
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Link: frame rejected: {}", e);
                return PacketEvent::Rejected(e);
            }
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("Link: packet {}", packet);

        match dispatch(&mut self.state, hw, packet) {
            Ok(DispatchOutcome::Ignored) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Dispatch: packet ignored: {}", packet);
                PacketEvent::Dispatched(DispatchOutcome::Ignored)
            }
            Ok(outcome) => PacketEvent::Dispatched(outcome),
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Dispatch: port write failed: {}", e);
                PacketEvent::Failed(e)
            }
        }
    }

    /// Schreibt den Pixel-Buffer, falls er sich geändert hat
    fn flush<H: SmartLedWriter>(&mut self, hw: &mut H) {
        if !self.state.take_dirty() {
            return;
        }
        if let Err(_e) = hw.write(self.state.leds()) {
            #[cfg(feature = "defmt")]
            defmt::error!("Failed to write LED strip: {}", _e);
            // Nächster Durchlauf versucht es erneut
            self.state.leds_dirty = true;
        }
    }
}
