//! Rampen-Sequencer
//!
//! Zeitgesteuerte Zustandsmaschine:
//! Idle → Prime → RampUp (50 Ticks) → RampDown (50 Ticks) → Done → Idle.
//!
//! Pro Tick-Intervall ([`TICK_INTERVAL_MS`]) wird höchstens ein Schritt
//! ausgeführt, unabhängig davon wie oft der Loop läuft.

use crate::config::{
    LED_COUNT, PWM_MAX, PWM_MAX_HALF, RAMP_STEPS, STEPS_PER_PIXEL, TICK_INTERVAL_MS,
};
use crate::dispatch::write_duty;
use crate::state::ControllerState;
use crate::traits::{PortError, PwmOutput};
use crate::types::{AQUA, RED, RampState};

/// Ergebnis eines Tick-Versuchs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Keine Rampe aktiv
    Inactive,
    /// Intervall seit dem letzten Tick noch nicht abgelaufen
    NotDue,
    /// Schritt der angegebenen Phase wurde ausgeführt
    Stepped(RampState),
}

/// Duty-Cycle für Schritt `i` der Aufwärts-Rampe (halb → voll)
///
/// Ganzzahlige Form von `int(65535 * (1 + 0.5 * (i/50 - 1)))`.
pub fn ramp_up_duty(i: u8) -> u16 {
    let steps = RAMP_STEPS as u32;
    (PWM_MAX as u32 * (steps + i as u32) / (2 * steps)) as u16
}

/// Duty-Cycle für Schritt `i` der Abwärts-Rampe (voll → halb)
///
/// Ganzzahlige Form von `int(65535 * (1 - 0.5 * i/50))`.
pub fn ramp_down_duty(i: u8) -> u16 {
    let steps = RAMP_STEPS as u32;
    (PWM_MAX as u32 * (2 * steps - i as u32) / (2 * steps)) as u16
}

/// Versucht einen Sequencer-Schritt zum Zeitpunkt `now_ms`
///
/// Der Zeitstempel wird auch dann übernommen, wenn der Port-Zugriff
/// fehlschlägt; der Takt bleibt damit stabil.
pub fn tick<H: PwmOutput>(
    state: &mut ControllerState,
    hw: &mut H,
    now_ms: u64,
) -> Result<TickOutcome, PortError> {
    let phase = state.ramp;
    if phase == RampState::Idle {
        return Ok(TickOutcome::Inactive);
    }
    if let Some(last) = state.last_tick_ms
        && now_ms < last.saturating_add(TICK_INTERVAL_MS)
    {
        return Ok(TickOutcome::NotDue);
    }

    let result = step(state, hw, phase);
    state.last_tick_ms = Some(now_ms);
    result.map(|()| TickOutcome::Stepped(phase))
}

fn step<H: PwmOutput>(
    state: &mut ControllerState,
    hw: &mut H,
    phase: RampState,
) -> Result<(), PortError> {
    match phase {
        RampState::Idle => {}
        RampState::Prime => {
            state.fill(AQUA);
            state.progress = 0;
            enter(state, RampState::RampUp);
            write_duty(state, hw, PWM_MAX_HALF)?;
        }
        RampState::RampUp => {
            let i = state.progress;
            state.set_pixel((i / STEPS_PER_PIXEL) as usize, RED);
            state.progress += 1;
            if state.progress >= RAMP_STEPS {
                state.progress = 0;
                enter(state, RampState::RampDown);
            }
            write_duty(state, hw, ramp_up_duty(i))?;
        }
        RampState::RampDown => {
            let i = state.progress;
            state.set_pixel(LED_COUNT - 1 - (i / STEPS_PER_PIXEL) as usize, AQUA);
            state.progress += 1;
            if state.progress >= RAMP_STEPS {
                state.progress = 0;
                enter(state, RampState::Done);
            }
            write_duty(state, hw, ramp_down_duty(i))?;
        }
        RampState::Done => {
            state.fill(state.color);
            enter(state, RampState::Idle);
            write_duty(state, hw, 0)?;
        }
    }
    Ok(())
}

fn enter(state: &mut ControllerState, next: RampState) {
    #[cfg(feature = "defmt")]
    defmt::info!("Ramp: {} -> {}", state.ramp, next);
    state.ramp = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::PwmError;

    #[derive(Default)]
    struct Pwm {
        writes: usize,
        last: u16,
    }

    impl PwmOutput for Pwm {
        fn set_duty(&mut self, duty: u16) -> Result<(), PwmError> {
            self.writes += 1;
            self.last = duty;
            Ok(())
        }
    }

    #[test]
    fn test_ramp_duty_endpoints() {
        assert_eq!(ramp_up_duty(0), 32767);
        assert_eq!(ramp_up_duty(1), 33422);
        assert_eq!(ramp_up_duty(10), 39321);
        assert_eq!(ramp_up_duty(49), 64879);
        assert_eq!(ramp_down_duty(0), 65535);
        assert_eq!(ramp_down_duty(20), 52428);
        assert_eq!(ramp_down_duty(49), 33422);
    }

    #[test]
    fn test_idle_tick_is_inactive_and_keeps_time() {
        let mut state = ControllerState::new();
        let mut pwm = Pwm::default();

        assert_eq!(tick(&mut state, &mut pwm, 1000), Ok(TickOutcome::Inactive));
        assert_eq!(state.last_tick_ms, None);
        assert_eq!(pwm.writes, 0);
    }

    #[test]
    fn test_prime_moves_to_ramp_up() {
        let mut state = ControllerState::new();
        let mut pwm = Pwm::default();
        state.ramp = RampState::Prime;

        let outcome = tick(&mut state, &mut pwm, 0).unwrap();

        assert_eq!(outcome, TickOutcome::Stepped(RampState::Prime));
        assert_eq!(state.ramp, RampState::RampUp);
        assert_eq!(state.leds, [AQUA; LED_COUNT]);
        assert_eq!(pwm.last, PWM_MAX_HALF);
        assert_eq!(state.last_tick_ms, Some(0));
    }

    #[test]
    fn test_tick_is_gated_by_interval() {
        let mut state = ControllerState::new();
        let mut pwm = Pwm::default();
        state.ramp = RampState::Prime;

        tick(&mut state, &mut pwm, 1000).unwrap();
        assert_eq!(tick(&mut state, &mut pwm, 1499), Ok(TickOutcome::NotDue));
        assert_eq!(
            tick(&mut state, &mut pwm, 1500),
            Ok(TickOutcome::Stepped(RampState::RampUp))
        );
        assert_eq!(pwm.writes, 2);
    }
}
