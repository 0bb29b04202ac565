//! Konstanten der Steuerlogik
//!
//! Hardware-Zuordnungen (GPIOs, Helligkeit, Taktfrequenzen) liegen in
//! `globe-firmware/src/config.rs`. Hier steht nur, was das Verhalten bestimmt.

// ============================================================================
// LED-Array
// ============================================================================

/// Anzahl der adressierbaren LEDs
pub const LED_COUNT: usize = 10;

/// Index der Status-LED (schwarz = getrennt, blau = verbunden)
pub const STATUS_PIXEL: usize = 0;

// ============================================================================
// PWM
// ============================================================================

/// Maximaler Duty-Cycle
pub const PWM_MAX: u16 = u16::MAX;

/// Halber Duty-Cycle (65535 / 2, abgerundet)
pub const PWM_MAX_HALF: u16 = PWM_MAX / 2;

/// Schrittweite für UP/DOWN
pub const PWM_STEP: u32 = 1024;

/// Maximale Anzahl Schritte (64 * 1024 = 65536)
pub const PWM_STEP_MAX: u8 = 64;

// ============================================================================
// Rampen-Sequencer
// ============================================================================

/// Schritte pro Rampe (hoch und runter jeweils)
pub const RAMP_STEPS: u8 = 50;

/// Mindest-Abstand zwischen zwei Ticks in Millisekunden
pub const TICK_INTERVAL_MS: u64 = 500;

/// Rampen-Schritte pro LED im Fortschrittsbalken (50 / 10)
pub const STEPS_PER_PIXEL: u8 = RAMP_STEPS / LED_COUNT as u8;
