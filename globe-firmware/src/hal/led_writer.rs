// SmartLED Writer für den 10er LED-Strip
//
// Implementiert globe_core::SmartLedWriter über das RMT Peripheral.
// Die Farben aus dem Core sind volle Werte, gedimmt wird erst hier.

use esp_hal::Blocking;
use esp_hal::rmt::{PulseCode, Rmt};
use esp_hal::time::Rate;
use esp_hal_smartled::SmartLedsAdapter;
use globe_core::config::LED_COUNT;
use globe_core::{LedError, SmartLedWriter};
use rgb::RGB8;
use smart_leds_trait::SmartLedsWrite;

use crate::config::LED_BRIGHTNESS;

/// Buffer-Größe für den Strip (3 Farben * 8 Bits pro LED + 1 Reset)
pub const LED_BUFFER_SIZE: usize = LED_COUNT * 24 + 1;

/// Skaliert eine Farbe linear auf `level` / 255
pub fn dim(color: RGB8, level: u8) -> RGB8 {
    let scale = |c: u8| ((c as u16 * level as u16) / 255) as u8;
    RGB8 {
        r: scale(color.r),
        g: scale(color.g),
        b: scale(color.b),
    }
}

/// Real Hardware LED Writer
///
/// Nutzt ESP32 RMT Peripheral um den WS2812 Strip anzusteuern.
///
/// Hinweis: Der Buffer wird im Task erstellt und als Parameter übergeben,
/// statt im Constructor allokiert.
pub struct RmtLedWriter<'a> {
    led: SmartLedsAdapter<'a, LED_BUFFER_SIZE>,
}

impl<'a> RmtLedWriter<'a> {
    /// Erstellt einen neuen RmtLedWriter
    ///
    /// # Parameter
    /// - `data_pin`: GPIO für die Datenleitung (siehe `LED_GPIO_PIN`)
    /// - `rmt_peripheral`: RMT Peripheral
    /// - `rmt_clock_mhz`: RMT Clock Frequenz in MHz (z.B. 80)
    /// - `buffer`: Buffer für LED-Daten (erstellt mit `smart_led_buffer!(LED_COUNT)`)
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn das RMT Peripheral
    /// die Taktfrequenz nicht annimmt.
    pub fn new(
        data_pin: esp_hal::peripherals::GPIO8<'a>,
        rmt_peripheral: esp_hal::peripherals::RMT<'a>,
        rmt_clock_mhz: u32,
        buffer: &'a mut [PulseCode; LED_BUFFER_SIZE],
    ) -> Result<Self, LedError> {
        let rmt: Rmt<'a, Blocking> = Rmt::new(rmt_peripheral, Rate::from_mhz(rmt_clock_mhz))
            .map_err(|_| LedError::WriteFailed)?;

        let led = SmartLedsAdapter::new(rmt.channel0, data_pin, buffer);

        Ok(Self { led })
    }
}

impl SmartLedWriter for RmtLedWriter<'_> {
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError> {
        self.led
            .write(pixels.iter().map(|pixel| dim(*pixel, LED_BRIGHTNESS)))
            .map_err(|_| LedError::WriteFailed)
    }
}
