//! Core Types für die Globus-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use rgb::RGB8;

// ============================================================================
// Farb-Presets
// ============================================================================

pub const RED: RGB8 = RGB8 { r: 200, g: 0, b: 0 };
pub const GREEN: RGB8 = RGB8 { r: 0, g: 200, b: 0 };
pub const BLUE: RGB8 = RGB8 { r: 0, g: 0, b: 200 };
pub const PURPLE: RGB8 = RGB8 {
    r: 120,
    g: 0,
    b: 160,
};
pub const YELLOW: RGB8 = RGB8 {
    r: 100,
    g: 100,
    b: 0,
};
pub const AQUA: RGB8 = RGB8 {
    r: 0,
    g: 100,
    b: 100,
};
pub const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

// ============================================================================
// Pakete
// ============================================================================

/// Tasten des Controller-Pads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    B1,
    B2,
    B3,
    B4,
}

impl Button {
    /// Alle Tasten in Reihenfolge der Ziffern '1'..'8'
    pub const ALL: [Button; 8] = [
        Button::B1,
        Button::B2,
        Button::B3,
        Button::B4,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
    ];

    /// Ziffer im Button-Frame ('1'..'4' Zahlen-Tasten, '5'..'8' Pfeile)
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            b'1' => Some(Button::B1),
            b'2' => Some(Button::B2),
            b'3' => Some(Button::B3),
            b'4' => Some(Button::B4),
            b'5' => Some(Button::Up),
            b'6' => Some(Button::Down),
            b'7' => Some(Button::Left),
            b'8' => Some(Button::Right),
            _ => None,
        }
    }

    pub fn digit(self) -> u8 {
        match self {
            Button::B1 => b'1',
            Button::B2 => b'2',
            Button::B3 => b'3',
            Button::B4 => b'4',
            Button::Up => b'5',
            Button::Down => b'6',
            Button::Left => b'7',
            Button::Right => b'8',
        }
    }
}

/// Dekodiertes Kommando-Paket vom Transport-Link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packet {
    /// Neue Füllfarbe
    Color(RGB8),
    /// Taste gedrückt (`pressed = true`) oder losgelassen
    Button { button: Button, pressed: bool },
}

/// Fehler beim Dekodieren eines Frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Kein Frame verfügbar
    Empty,
    /// Frame kürzer als für seinen Typ nötig
    Truncated,
    /// Erstes Byte ist nicht '!'
    MissingStart,
    /// Unbekannter Typ-Buchstabe
    UnknownKind(u8),
    /// Bekannter Typ, den die Steuerung nicht auswertet (Sensor-Daten)
    Unsupported(u8),
    /// Button-Ziffer außerhalb '1'..'8'
    UnknownButton(u8),
    /// Button-Zustand weder '0' noch '1'
    BadState(u8),
    BadChecksum,
}

// ============================================================================
// Zustände
// ============================================================================

/// Ob der Rampen-Sequencer aktiv ist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    None,
    Ramp,
}

/// Phase des Rampen-Sequencers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RampState {
    #[default]
    Idle,
    Prime,
    RampUp,
    RampDown,
    Done,
}

impl RampState {
    /// Idle ist der einzige Zustand ohne aktive Rampe
    pub fn mode(self) -> Mode {
        match self {
            RampState::Idle => Mode::None,
            RampState::Prime | RampState::RampUp | RampState::RampDown | RampState::Done => {
                Mode::Ramp
            }
        }
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Packet {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Packet::Color(color) => {
                defmt::write!(fmt, "Color {{ rgb: ({}, {}, {}) }}", color.r, color.g, color.b)
            }
            Packet::Button { button, pressed } => {
                defmt::write!(fmt, "Button {{ {}, pressed: {} }}", button, pressed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_digits_are_unique_and_reversible() {
        for button in Button::ALL {
            assert_eq!(Button::from_digit(button.digit()), Some(button));
        }
        assert_eq!(Button::from_digit(b'0'), None);
        assert_eq!(Button::from_digit(b'9'), None);
    }

    #[test]
    fn test_mode_follows_ramp_state() {
        assert_eq!(RampState::Idle.mode(), Mode::None);
        assert_eq!(RampState::Prime.mode(), Mode::Ramp);
        assert_eq!(RampState::RampUp.mode(), Mode::Ramp);
        assert_eq!(RampState::RampDown.mode(), Mode::Ramp);
        assert_eq!(RampState::Done.mode(), Mode::Ramp);
    }
}
