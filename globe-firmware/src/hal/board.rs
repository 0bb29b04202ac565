// Board: fasst Strip, PWM, Status-LED und Uhr zu einem globe_core::Board zusammen

use embassy_time::Instant;
use globe_core::{
    LedError, MonotonicClock, PwmError, PwmOutput, SmartLedWriter, StatusIndicator,
};
use rgb::RGB8;

/// Alle Peripherie-Ports des Globus
///
/// Generisch über die einzelnen Adapter, damit der Controller-Task
/// nur `globe_core::Board` sieht.
pub struct GlobeBoard<S, P, I> {
    strip: S,
    pwm: P,
    indicator: I,
}

impl<S, P, I> GlobeBoard<S, P, I>
where
    S: SmartLedWriter,
    P: PwmOutput,
    I: StatusIndicator,
{
    pub fn new(strip: S, pwm: P, indicator: I) -> Self {
        Self {
            strip,
            pwm,
            indicator,
        }
    }
}

impl<S: SmartLedWriter, P, I> SmartLedWriter for GlobeBoard<S, P, I> {
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError> {
        self.strip.write(pixels)
    }
}

impl<S, P: PwmOutput, I> PwmOutput for GlobeBoard<S, P, I> {
    fn set_duty(&mut self, duty: u16) -> Result<(), PwmError> {
        self.pwm.set_duty(duty)
    }
}

impl<S, P, I: StatusIndicator> StatusIndicator for GlobeBoard<S, P, I> {
    fn set_indicator(&mut self, on: bool) {
        self.indicator.set_indicator(on)
    }
}

/// Uhr über den Embassy Time-Driver (läuft ab Boot)
impl<S, P, I> MonotonicClock for GlobeBoard<S, P, I> {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
