//! Hardware Abstraction Traits
//!
//! Diese Traits definieren die Ports zu Peripherie und Transport-Link
//! ohne konkrete Implementierung.
//!
//! # Implementierungen
//! - **Production:** `globe-firmware/src/hal` (RMT, LEDC, GPIO) und `globe-firmware/src/link.rs`
//! - **Testing:** Mocks in `globe-tests`

use rgb::RGB8;

use crate::types::{Packet, PacketError};

// ============================================================================
// Fehler
// ============================================================================

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    WriteFailed,
}

/// Fehler-Typ für PWM-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    DutyRejected,
}

/// Sammel-Fehler für Port-Zugriffe aus Dispatcher und Sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortError {
    Led(LedError),
    Pwm(PwmError),
}

impl From<LedError> for PortError {
    fn from(e: LedError) -> Self {
        PortError::Led(e)
    }
}

impl From<PwmError> for PortError {
    fn from(e: PwmError) -> Self {
        PortError::Pwm(e)
    }
}

// ============================================================================
// Peripherie-Ports
// ============================================================================

/// Trait für SmartLED Hardware-Zugriff
///
/// Abstrahiert den Zugriff auf den RGB LED-Strip (WS2812/Neopixel).
/// Der Controller hält den Pixel-Buffer selbst und schreibt ihn komplett.
pub trait SmartLedWriter {
    /// Schreibt alle Pixel auf den Strip
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError>;
}

/// PWM-Ausgang mit 16-Bit Duty-Cycle (0..=65535)
pub trait PwmOutput {
    fn set_duty(&mut self, duty: u16) -> Result<(), PwmError>;
}

/// Digitaler Status-Ausgang (blinkt bei jedem Tastendruck)
pub trait StatusIndicator {
    fn set_indicator(&mut self, on: bool);
}

/// Monotone Uhr in Millisekunden
pub trait MonotonicClock {
    fn now_ms(&self) -> u64;
}

/// Alle Peripherie-Ports zusammen
///
/// Wird für jeden Typ automatisch implementiert, die alle vier Ports bietet.
pub trait Board: SmartLedWriter + PwmOutput + StatusIndicator + MonotonicClock {}

impl<T> Board for T where T: SmartLedWriter + PwmOutput + StatusIndicator + MonotonicClock {}

// ============================================================================
// Transport-Link
// ============================================================================

/// Verbindungsorientierter Kanal, der dekodierte Pakete liefert
///
/// Eine Trennung ist zwischen zwei Aufrufen jederzeit möglich.
pub trait TransportLink {
    /// Startet Advertising und nimmt eine neue Verbindung an
    fn begin_accepting(&mut self);

    fn is_connected(&self) -> bool;

    fn has_pending_packet(&self) -> bool;

    /// Liefert das nächste Paket
    ///
    /// # Fehlerbehandlung
    /// Gibt `PacketError` zurück für leere, kaputte oder unbekannte Frames.
    /// Der Controller ignoriert solche Frames ohne Zustandsänderung.
    fn next_packet(&mut self) -> Result<Packet, PacketError>;
}
