// Hardware Abstraction Layer (HAL) Module
//
// Adapter von esp-hal Peripherie auf die Port-Traits aus globe_core.

pub mod board;
pub mod led_writer;
pub mod pwm;

pub use board::GlobeBoard;
pub use led_writer::{LED_BUFFER_SIZE, RmtLedWriter, dim};
pub use pwm::{DutyPwm, IndicatorPin};
