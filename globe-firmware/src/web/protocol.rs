// WebSocket-Protokoll-Definitionen
//
// Client → Server: Bluefruit-Frames als Binary-Nachrichten (siehe globe_core::codec)
// Server → Client: JSON-Nachrichten mit Status und Fehlern

use globe_core::{RampState, StatusSnapshot};
use serde::Serialize;

/// RGB-Struct für JSON-Serialisierung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Server → Client Nachrichten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum WsServerMessage {
    /// Aktueller Controller-Zustand, gesendet bei jeder Änderung
    #[serde(rename = "status")]
    Status {
        rgb: RgbColor,
        duty: u16,
        step: u8,
        ramp: RampState,
        connected: bool,
    },
    #[serde(rename = "error")]
    Error { message: &'static str },
}

impl From<StatusSnapshot> for WsServerMessage {
    fn from(snapshot: StatusSnapshot) -> Self {
        WsServerMessage::Status {
            rgb: RgbColor {
                r: snapshot.color.r,
                g: snapshot.color.g,
                b: snapshot.color.b,
            },
            duty: snapshot.duty,
            step: snapshot.step,
            ramp: snapshot.ramp,
            connected: snapshot.connected,
        }
    }
}
