// Controller Task - Treibt globe_core::Controller auf echter Hardware
use defmt::{Debug2Format, debug, error, info};
use embassy_time::{Duration, Timer};
use esp_hal::gpio::{DriveMode, Level, Output, OutputConfig};
use esp_hal::ledc::channel::{self, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::time::Rate;
use esp_hal_smartled::smart_led_buffer;
use globe_core::config::LED_COUNT;
use globe_core::{Board, Controller, LoopEvent, StatusSnapshot, TransportLink};

use crate::StatusPublisher;
use crate::config::{POLL_INTERVAL_MS, PWM_FREQUENCY_KHZ, RMT_CLOCK_MHZ};
use crate::hal::{DutyPwm, GlobeBoard, IndicatorPin, RmtLedWriter};
use crate::link::{LinkShared, WebSocketLink};

/// Controller Logic - Testbare Schleife ohne Hardware-Abhängigkeit
///
/// Ruft `Controller::poll()` endlos auf und gibt zwischen zwei Durchläufen
/// die CPU für `POLL_INTERVAL_MS` an andere Tasks ab. Jede Änderung am
/// Status wird an die WebSocket-Clients gepublished.
///
/// # Parameter
/// - `board`: Alle Peripherie-Ports (Hardware oder Mock)
/// - `link`: Transport-Link (WebSocket-Session)
/// - `status_publisher`: PubSub Publisher für Status-Broadcasts
pub async fn controller_logic<H: Board, L: TransportLink>(
    mut board: H,
    mut link: L,
    status_publisher: StatusPublisher,
) -> ! {
    let mut controller = Controller::new();
    let mut last_status: Option<StatusSnapshot> = None;

    loop {
        if let LoopEvent::AdvertisingStarted = controller.poll(&mut board, &mut link) {
            info!("Controller: waiting for a WebSocket session on /ws");
        }

        // Nur publishen wenn sich der Status geändert hat
        let snapshot = controller.snapshot();
        if last_status != Some(snapshot) {
            debug!("Controller: {}", snapshot);
            status_publisher.publish_immediate(snapshot);
            last_status = Some(snapshot);
        }

        Timer::after(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}

/// Controller Task - Embassy Task für parallele Ausführung
///
/// Initialisiert LED-Strip (RMT), PWM-Ausgang (LEDC) und Status-LED (GPIO)
/// und ruft dann `controller_logic()` auf.
///
/// # Parameter
/// - `strip_pin`: GPIO8 für die Datenleitung des Strips
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `ledc_peripheral`: LEDC Peripheral für den PWM-Ausgang
/// - `pwm_pin`: GPIO4 für den PWM-Ausgang
/// - `indicator_pin`: GPIO5 für die Status-LED
/// - `link`: Geteilter Link-Zustand (vom HTTP-Server befüllt)
/// - `status_publisher`: PubSub Publisher für Status-Broadcasts
#[embassy_executor::task]
pub async fn controller_task(
    strip_pin: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    ledc_peripheral: esp_hal::peripherals::LEDC<'static>,
    pwm_pin: esp_hal::peripherals::GPIO4<'static>,
    indicator_pin: esp_hal::peripherals::GPIO5<'static>,
    link: &'static LinkShared,
    status_publisher: StatusPublisher,
) {
    // Buffer für SmartLED Daten (LED_COUNT LEDs)
    let mut rmt_buffer = smart_led_buffer!(LED_COUNT);
    let strip = match RmtLedWriter::new(strip_pin, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer)
    {
        Ok(strip) => strip,
        Err(e) => {
            error!("Controller: LED strip init failed: {}", e);
            return;
        }
    };

    // LEDC: Low-Speed Timer 0 mit 14 Bit Auflösung, Kanal 0
    let mut ledc = Ledc::new(ledc_peripheral);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    let mut pwm_timer = ledc.timer::<LowSpeed>(timer::Number::Timer0);
    if let Err(e) = pwm_timer.configure(timer::config::Config {
        duty: timer::config::Duty::Duty14Bit,
        clock_source: timer::LSClockSource::APBClk,
        frequency: Rate::from_khz(PWM_FREQUENCY_KHZ),
    }) {
        error!("Controller: PWM timer init failed: {}", Debug2Format(&e));
        return;
    }

    let mut pwm_channel = ledc.channel(channel::Number::Channel0, pwm_pin);
    if let Err(e) = pwm_channel.configure(channel::config::Config {
        timer: &pwm_timer,
        duty_pct: 0,
        drive_mode: DriveMode::PushPull,
    }) {
        error!("Controller: PWM channel init failed: {}", Debug2Format(&e));
        return;
    }

    let indicator = Output::new(indicator_pin, Level::Low, OutputConfig::default());

    let board = GlobeBoard::new(
        strip,
        DutyPwm::new(pwm_channel),
        IndicatorPin::new(indicator),
    );

    controller_logic(board, WebSocketLink::new(link), status_publisher).await
}
