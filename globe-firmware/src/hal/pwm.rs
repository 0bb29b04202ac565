// PWM- und Status-Ausgang
//
// Beide Adapter sind generisch über embedded-hal 1.0, damit LEDC-Kanal
// und GPIO-Output aus esp-hal direkt eingesetzt werden können.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;
use globe_core::config::PWM_MAX;
use globe_core::{PwmError, PwmOutput, StatusIndicator};

/// PWM-Ausgang über einen `SetDutyCycle`-Kanal (z.B. LEDC)
///
/// Der Core rechnet mit 16 Bit (0..=65535). Die Hardware-Auflösung
/// (z.B. 14 Bit) wird über `set_duty_cycle_fraction` umgerechnet.
pub struct DutyPwm<P> {
    channel: P,
}

impl<P: SetDutyCycle> DutyPwm<P> {
    pub fn new(channel: P) -> Self {
        Self { channel }
    }
}

impl<P: SetDutyCycle> PwmOutput for DutyPwm<P> {
    fn set_duty(&mut self, duty: u16) -> Result<(), PwmError> {
        self.channel
            .set_duty_cycle_fraction(duty, PWM_MAX)
            .map_err(|_| PwmError::DutyRejected)
    }
}

/// Status-LED an einem digitalen Ausgang
pub struct IndicatorPin<P> {
    pin: P,
}

impl<P: OutputPin> IndicatorPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> StatusIndicator for IndicatorPin<P> {
    fn set_indicator(&mut self, on: bool) {
        // GPIO-Ausgänge auf dem ESP32 sind infallible
        let _ = self.pin.set_state(PinState::from(on));
    }
}
