//! Controller-Zustand
//!
//! Alles, was zwischen zwei Loop-Durchläufen erhalten bleibt, liegt in
//! [`ControllerState`]. Dispatcher und Sequencer bekommen ihn als `&mut`.

use rgb::RGB8;

use crate::config::{LED_COUNT, STATUS_PIXEL};
use crate::types::{Mode, PURPLE, RampState};

/// Flüchtiger Zustand der Steuerung (überlebt Reconnects, keinen Neustart)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    pub(crate) color: RGB8,
    pub(crate) pwm_step: u8,
    pub(crate) duty: u16,
    pub(crate) leds: [RGB8; LED_COUNT],
    pub(crate) leds_dirty: bool,
    pub(crate) indicator: bool,
    pub(crate) ramp: RampState,
    pub(crate) progress: u8,
    pub(crate) last_tick_ms: Option<u64>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerState {
    /// Startzustand: Lila, PWM aus, Rampe inaktiv
    pub fn new() -> Self {
        Self {
            color: PURPLE,
            pwm_step: 0,
            duty: 0,
            leds: [PURPLE; LED_COUNT],
            leds_dirty: true,
            indicator: false,
            ramp: RampState::Idle,
            progress: 0,
            last_tick_ms: None,
        }
    }

    /// Aktuelle Füllfarbe
    pub fn color(&self) -> RGB8 {
        self.color
    }

    pub fn pwm_step(&self) -> u8 {
        self.pwm_step
    }

    pub fn duty(&self) -> u16 {
        self.duty
    }

    pub fn leds(&self) -> &[RGB8; LED_COUNT] {
        &self.leds
    }

    pub fn indicator(&self) -> bool {
        self.indicator
    }

    pub fn mode(&self) -> Mode {
        self.ramp.mode()
    }

    pub fn ramp_state(&self) -> RampState {
        self.ramp
    }

    /// Schrittzähler der laufenden Rampen-Phase
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn last_tick_ms(&self) -> Option<u64> {
        self.last_tick_ms
    }

    pub(crate) fn fill(&mut self, color: RGB8) {
        self.leds = [color; LED_COUNT];
        self.leds_dirty = true;
    }

    pub(crate) fn set_pixel(&mut self, index: usize, color: RGB8) {
        if let Some(pixel) = self.leds.get_mut(index) {
            *pixel = color;
            self.leds_dirty = true;
        }
    }

    pub(crate) fn set_status_pixel(&mut self, color: RGB8) {
        self.set_pixel(STATUS_PIXEL, color);
    }

    /// Gibt zurück, ob seit dem letzten Aufruf LEDs geändert wurden
    pub(crate) fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.leds_dirty, false)
    }

    /// Momentaufnahme für Telemetrie
    pub fn snapshot(&self, connected: bool) -> StatusSnapshot {
        StatusSnapshot {
            color: self.color,
            duty: self.duty,
            step: self.pwm_step,
            ramp: self.ramp,
            connected,
        }
    }
}

/// Telemetrie-Momentaufnahme (ersetzt die "PWM level" Ausgaben)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub color: RGB8,
    pub duty: u16,
    pub step: u8,
    pub ramp: RampState,
    pub connected: bool,
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusSnapshot {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "StatusSnapshot {{ rgb: ({}, {}, {}), duty: {}, step: {}, ramp: {}, connected: {} }}",
            self.color.r,
            self.color.g,
            self.color.b,
            self.duty,
            self.step,
            self.ramp,
            self.connected
        )
    }
}
