//! Globe Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Typen, Port-Traits und die komplette Steuerlogik:
//! Kommando-Dispatcher, Rampen-Sequencer und Controller-Loop.

#![no_std]

pub mod codec;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod ramp;
pub mod state;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use controller::{Controller, LinkPhase, LoopEvent, PacketEvent};
pub use dispatch::{DispatchOutcome, dispatch, step_duty};
pub use ramp::{TickOutcome, ramp_down_duty, ramp_up_duty, tick};
pub use state::{ControllerState, StatusSnapshot};
pub use traits::{
    Board, LedError, MonotonicClock, PortError, PwmError, PwmOutput, SmartLedWriter,
    StatusIndicator, TransportLink,
};
pub use types::{Button, Mode, Packet, PacketError, RampState};
