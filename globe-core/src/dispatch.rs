//! Kommando-Dispatcher
//!
//! Bildet genau ein dekodiertes Paket auf Port-Ausgaben und
//! Zustandsübergänge ab. Blockiert nie, unbekannte Kombinationen
//! werden ohne Zustandsänderung ignoriert.

use rgb::RGB8;

use crate::config::{PWM_MAX_HALF, PWM_STEP, PWM_STEP_MAX};
use crate::state::ControllerState;
use crate::traits::{PortError, PwmError, PwmOutput, StatusIndicator};
use crate::types::{BLUE, Button, GREEN, PURPLE, Packet, RED, RampState, YELLOW};

/// Ergebnis eines Dispatch-Aufrufs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchOutcome {
    /// Paket hat Zustand oder Ausgänge verändert
    Applied,
    /// Kein Effekt (z.B. UP bei Maximum, losgelassene Zahlen-Taste)
    Ignored,
}

/// Duty-Cycle für einen PWM-Schritt
///
/// `step * 1024 - 1`, außer Schritt 0 ergibt 0.
///
/// ```
/// # use globe_core::step_duty;
/// assert_eq!(step_duty(0), 0);
/// assert_eq!(step_duty(1), 1023);
/// assert_eq!(step_duty(64), 65535);
/// ```
pub fn step_duty(step: u8) -> u16 {
    match step {
        0 => 0,
        n => (n as u32 * PWM_STEP - 1) as u16,
    }
}

/// Verarbeitet ein Paket
///
/// Der Status-Ausgang wird bei jedem Tastendruck eingeschaltet; das
/// Ausschalten beim Eintreffen eines Pakets übernimmt der Controller-Loop.
pub fn dispatch<H>(
    state: &mut ControllerState,
    hw: &mut H,
    packet: Packet,
) -> Result<DispatchOutcome, PortError>
where
    H: PwmOutput + StatusIndicator,
{
    match packet {
        Packet::Color(color) => {
            set_color(state, color);
            Ok(DispatchOutcome::Applied)
        }
        Packet::Button {
            button,
            pressed: true,
        } => {
            hw.set_indicator(true);
            state.indicator = true;
            press(state, hw, button)
        }
        Packet::Button {
            button: Button::Up | Button::Down,
            pressed: false,
        } => {
            state.fill(RED);
            Ok(DispatchOutcome::Applied)
        }
        Packet::Button { pressed: false, .. } => Ok(DispatchOutcome::Ignored),
    }
}

fn press<H: PwmOutput>(
    state: &mut ControllerState,
    hw: &mut H,
    button: Button,
) -> Result<DispatchOutcome, PortError> {
    match button {
        Button::Up => {
            if state.pwm_step >= PWM_STEP_MAX {
                return Ok(DispatchOutcome::Ignored);
            }
            state.fill(state.color);
            state.pwm_step += 1;
            write_duty(state, hw, step_duty(state.pwm_step))?;
        }
        Button::Down => {
            if state.pwm_step == 0 {
                return Ok(DispatchOutcome::Ignored);
            }
            state.fill(state.color);
            state.pwm_step -= 1;
            write_duty(state, hw, step_duty(state.pwm_step))?;
        }
        Button::Right => {
            // Halbe Leistung wird direkt gesetzt, nicht über step_duty(32)
            set_color(state, YELLOW);
            state.pwm_step = PWM_STEP_MAX / 2;
            write_duty(state, hw, PWM_MAX_HALF)?;
        }
        Button::Left => {
            set_color(state, YELLOW);
            state.pwm_step = 0;
            write_duty(state, hw, 0)?;
        }
        Button::B1 => {
            #[cfg(feature = "defmt")]
            defmt::info!("Ramp: armed");
            state.ramp = RampState::Prime;
        }
        Button::B2 => set_color(state, GREEN),
        Button::B3 => set_color(state, BLUE),
        Button::B4 => set_color(state, PURPLE),
    }
    Ok(DispatchOutcome::Applied)
}

fn set_color(state: &mut ControllerState, color: RGB8) {
    state.color = color;
    state.fill(color);
}

/// Speichert den Duty-Cycle und schreibt ihn auf den PWM-Port
pub(crate) fn write_duty<H: PwmOutput>(
    state: &mut ControllerState,
    hw: &mut H,
    duty: u16,
) -> Result<(), PwmError> {
    state.duty = duty;
    #[cfg(feature = "defmt")]
    defmt::info!("PWM level {}", duty);
    hw.set_duty(duty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pins {
        duty: Option<u16>,
        indicator: bool,
    }

    impl PwmOutput for Pins {
        fn set_duty(&mut self, duty: u16) -> Result<(), PwmError> {
            self.duty = Some(duty);
            Ok(())
        }
    }

    impl StatusIndicator for Pins {
        fn set_indicator(&mut self, on: bool) {
            self.indicator = on;
        }
    }

    fn pressed(button: Button) -> Packet {
        Packet::Button {
            button,
            pressed: true,
        }
    }

    #[test]
    fn test_step_duty_formula() {
        assert_eq!(step_duty(0), 0);
        assert_eq!(step_duty(3), 3071);
        assert_eq!(step_duty(32), 32767);
        assert_eq!(step_duty(63), 64511);
        assert_eq!(step_duty(64), 65535);
    }

    #[test]
    fn test_up_press_steps_and_fills() {
        let mut state = ControllerState::new();
        let mut pins = Pins::default();
        state.color = GREEN;

        let outcome = dispatch(&mut state, &mut pins, pressed(Button::Up)).unwrap();

        assert_eq!(outcome, DispatchOutcome::Applied);
        assert_eq!(state.pwm_step, 1);
        assert_eq!(state.duty, 1023);
        assert_eq!(pins.duty, Some(1023));
        assert!(pins.indicator);
        assert_eq!(state.leds[9], GREEN);
    }

    #[test]
    fn test_down_at_zero_is_noop() {
        let mut state = ControllerState::new();
        let mut pins = Pins::default();

        let outcome = dispatch(&mut state, &mut pins, pressed(Button::Down)).unwrap();

        assert_eq!(outcome, DispatchOutcome::Ignored);
        assert_eq!(state.pwm_step, 0);
        assert_eq!(pins.duty, None);
    }

    #[test]
    fn test_right_sets_half_scale() {
        let mut state = ControllerState::new();
        let mut pins = Pins::default();
        state.pwm_step = 10;

        dispatch(&mut state, &mut pins, pressed(Button::Right)).unwrap();

        assert_eq!(state.pwm_step, 32);
        assert_eq!(state.duty, 32767);
        assert_eq!(state.color, YELLOW);
    }

    #[test]
    fn test_release_of_up_fills_red_without_touching_color() {
        let mut state = ControllerState::new();
        let mut pins = Pins::default();

        let packet = Packet::Button {
            button: Button::Up,
            pressed: false,
        };
        dispatch(&mut state, &mut pins, packet).unwrap();

        assert_eq!(state.leds[0], RED);
        assert_eq!(state.color, PURPLE);
        assert!(!pins.indicator);
    }

    #[test]
    fn test_button_one_arms_ramp() {
        let mut state = ControllerState::new();
        let mut pins = Pins::default();

        dispatch(&mut state, &mut pins, pressed(Button::B1)).unwrap();

        assert_eq!(state.ramp, RampState::Prime);
        assert_eq!(pins.duty, None);
    }
}
