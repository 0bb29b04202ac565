//! Integration Tests für den Kommando-Dispatcher
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockBoard + ScriptedLink

mod common;

use common::Rig;
use globe_core::config::{LED_COUNT, PWM_STEP_MAX};
use globe_core::types::{BLUE, GREEN, PURPLE, RED, YELLOW};
use globe_core::{
    Button, DispatchOutcome, LoopEvent, Mode, Packet, PacketEvent, RampState, step_duty,
};
use rgb::RGB8;

fn dispatched(event: LoopEvent) -> Option<PacketEvent> {
    match event {
        LoopEvent::Serviced { packet, .. } => packet,
        other => panic!("Expected Serviced, got {:?}", other),
    }
}

/// Rig mit `steps` UP-Drücken
fn rig_at_step(steps: u8) -> Rig {
    let mut rig = Rig::connected();
    for _ in 0..steps {
        rig.press(Button::Up);
    }
    assert_eq!(rig.controller.state().pwm_step(), steps);
    rig
}

// ============================================================================
// Tests: PWM-Schritte
// ============================================================================

#[test]
fn test_up_press_for_every_step_below_max() {
    for start in 0..PWM_STEP_MAX {
        let mut rig = rig_at_step(start);

        let event = rig.press(Button::Up);

        let state = rig.controller.state();
        assert_eq!(
            dispatched(event),
            Some(PacketEvent::Dispatched(DispatchOutcome::Applied))
        );
        assert_eq!(state.pwm_step(), start + 1);
        assert_eq!(state.duty(), ((start as u32 + 1) * 1024 - 1) as u16);
        assert_eq!(rig.board.last_duty(), Some(state.duty()));
    }
}

#[test]
fn test_up_press_at_max_is_noop() {
    let mut rig = rig_at_step(PWM_STEP_MAX);
    let writes = rig.board.duties.len();

    let event = rig.press(Button::Up);

    assert_eq!(
        dispatched(event),
        Some(PacketEvent::Dispatched(DispatchOutcome::Ignored))
    );
    assert_eq!(rig.controller.state().pwm_step(), PWM_STEP_MAX);
    assert_eq!(rig.controller.state().duty(), 65535);
    assert_eq!(rig.board.duties.len(), writes);
}

#[test]
fn test_down_press_for_every_step_above_zero() {
    for start in 1..=PWM_STEP_MAX {
        let mut rig = rig_at_step(start);

        rig.press(Button::Down);

        let state = rig.controller.state();
        let expected_step = start - 1;
        assert_eq!(state.pwm_step(), expected_step);
        if expected_step == 0 {
            assert_eq!(state.duty(), 0);
        } else {
            assert_eq!(state.duty(), expected_step as u16 * 1024 - 1);
        }
    }
}

#[test]
fn test_down_press_at_zero_is_noop() {
    let mut rig = Rig::connected();

    let event = rig.press(Button::Down);

    assert_eq!(
        dispatched(event),
        Some(PacketEvent::Dispatched(DispatchOutcome::Ignored))
    );
    assert_eq!(rig.controller.state().pwm_step(), 0);
    assert!(rig.board.duties.is_empty());
}

#[test]
fn test_right_press_sets_half_regardless_of_prior_state() {
    for start in [0, 1, 31, 32, 33, 64] {
        let mut rig = rig_at_step(start);
        rig.press(Button::B3);

        rig.press(Button::Right);

        let state = rig.controller.state();
        assert_eq!(state.pwm_step(), 32);
        assert_eq!(state.duty(), 32767);
        assert_eq!(state.color(), YELLOW);
        assert_eq!(state.leds(), &[YELLOW; LED_COUNT]);
    }
}

#[test]
fn test_left_press_turns_off_regardless_of_prior_state() {
    for start in [0, 1, 32, 64] {
        let mut rig = rig_at_step(start);

        rig.press(Button::Left);

        let state = rig.controller.state();
        assert_eq!(state.pwm_step(), 0);
        assert_eq!(state.duty(), 0);
        assert_eq!(state.color(), YELLOW);
        assert_eq!(rig.board.last_duty(), Some(0));
    }
}

#[test]
fn test_up_after_right_continues_from_step_32() {
    let mut rig = Rig::connected();
    rig.press(Button::Right);

    rig.press(Button::Up);

    assert_eq!(rig.controller.state().pwm_step(), 33);
    assert_eq!(rig.controller.state().duty(), step_duty(33));
}

// ============================================================================
// Tests: Farben
// ============================================================================

#[test]
fn test_color_packet_sets_and_fills() {
    let mut rig = Rig::connected();
    let orange = RGB8 {
        r: 255,
        g: 128,
        b: 0,
    };

    rig.send(Packet::Color(orange));

    assert_eq!(rig.controller.state().color(), orange);
    assert_eq!(rig.board.last_frame(), Some(&[orange; LED_COUNT][..]));
}

#[test]
fn test_number_buttons_select_preset_colors() {
    let mut rig = Rig::connected();

    rig.press(Button::B2);
    assert_eq!(rig.controller.state().color(), GREEN);

    rig.press(Button::B3);
    assert_eq!(rig.controller.state().color(), BLUE);

    rig.press(Button::B4);
    assert_eq!(rig.controller.state().color(), PURPLE);
    assert_eq!(rig.board.last_frame(), Some(&[PURPLE; LED_COUNT][..]));
}

#[test]
fn test_up_and_down_release_fill_red_but_keep_color() {
    let mut rig = Rig::connected();
    rig.press(Button::B2);

    rig.release(Button::Up);
    assert_eq!(rig.controller.state().leds(), &[RED; LED_COUNT]);

    rig.press(Button::B3);
    rig.release(Button::Down);
    assert_eq!(rig.controller.state().leds(), &[RED; LED_COUNT]);
    assert_eq!(rig.controller.state().color(), BLUE);
}

#[test]
fn test_up_press_refills_with_current_color() {
    let mut rig = Rig::connected();
    rig.press(Button::B2);
    rig.release(Button::Up);

    rig.press(Button::Up);

    assert_eq!(rig.controller.state().leds(), &[GREEN; LED_COUNT]);
}

// ============================================================================
// Tests: Status-Ausgang
// ============================================================================

#[test]
fn test_indicator_pulses_on_press_and_clears_on_next_packet() {
    let mut rig = Rig::connected();

    rig.press(Button::B2);
    assert!(rig.board.indicator);
    assert_eq!(rig.board.indicator_history, vec![false, true]);

    rig.send(Packet::Color(RED));
    assert!(!rig.board.indicator);
    assert!(!rig.controller.state().indicator());
}

#[test]
fn test_indicator_pulses_even_when_press_has_no_effect() {
    let mut rig = Rig::connected();

    rig.press(Button::Down);

    assert!(rig.board.indicator);
}

#[test]
fn test_release_does_not_pulse_indicator() {
    let mut rig = Rig::connected();

    rig.release(Button::Left);

    assert_eq!(rig.board.indicator_history, vec![false]);
}

// ============================================================================
// Tests: No-Ops und kaputte Frames
// ============================================================================

#[test]
fn test_ignored_release_leaves_state_unchanged() {
    for button in [
        Button::Left,
        Button::Right,
        Button::B1,
        Button::B2,
        Button::B3,
        Button::B4,
    ] {
        let mut rig = rig_at_step(5);
        rig.press(Button::B2);
        let before = rig.controller.state().clone();

        let event = rig.release(button);

        let after = rig.controller.state();
        assert_eq!(
            dispatched(event),
            Some(PacketEvent::Dispatched(DispatchOutcome::Ignored))
        );
        assert_eq!(after.color(), before.color());
        assert_eq!(after.pwm_step(), before.pwm_step());
        assert_eq!(after.duty(), before.duty());
        assert_eq!(after.leds(), before.leds());
        assert_eq!(after.mode(), before.mode());
        assert_eq!(after.ramp_state(), before.ramp_state());
    }
}

#[test]
fn test_unknown_button_frame_is_rejected_without_state_change() {
    let mut rig = rig_at_step(2);
    let before = rig.controller.state().clone();

    // '!' 'B' '9' '1' + Prüfsumme
    let body = [b'!', b'B', b'9', b'1'];
    let sum = !body.iter().fold(0u8, |s, b| s.wrapping_add(*b));
    rig.link.push_raw(&[body[0], body[1], body[2], body[3], sum]);
    let event = rig.poll();

    assert_eq!(
        dispatched(event),
        Some(PacketEvent::Rejected(globe_core::PacketError::UnknownButton(
            b'9'
        )))
    );
    let after = rig.controller.state();
    assert_eq!(after.color(), before.color());
    assert_eq!(after.duty(), before.duty());
    assert_eq!(after.leds(), before.leds());
    assert_eq!(after.ramp_state(), before.ramp_state());
}

#[test]
fn test_garbage_frame_is_rejected() {
    let mut rig = Rig::connected();

    rig.link.push_raw(b"hello");
    let event = rig.poll();

    assert!(matches!(dispatched(event), Some(PacketEvent::Rejected(_))));
    assert_eq!(rig.controller.state().color(), PURPLE);
}

#[test]
fn test_batched_message_yields_every_frame() {
    let mut rig = Rig::connected();

    rig.link.push_batch(b"!B516!B507!B516");
    assert_eq!(rig.link.frames.len(), 3);

    for _ in 0..3 {
        assert!(matches!(
            dispatched(rig.poll()),
            Some(PacketEvent::Dispatched(_))
        ));
    }
    assert_eq!(rig.controller.state().pwm_step(), 2);
}

// ============================================================================
// Tests: Szenarien
// ============================================================================

#[test]
fn test_scenario_purple_then_three_up_presses() {
    let mut rig = Rig::connected();

    rig.send(Packet::Color(PURPLE));
    rig.press(Button::Up);
    rig.press(Button::Up);
    rig.press(Button::Up);

    let state = rig.controller.state();
    assert_eq!(state.duty(), 3071);
    assert_eq!(state.pwm_step(), 3);
    assert_eq!(state.leds(), &[PURPLE; LED_COUNT]);
    assert_eq!(rig.board.last_duty(), Some(3071));
}

#[test]
fn test_button_one_starts_ramp() {
    let mut rig = Rig::connected();

    rig.press(Button::B1);

    assert_eq!(rig.controller.state().mode(), Mode::Ramp);
    // Der erste Tick läuft im selben Durchlauf
    assert_eq!(rig.controller.state().ramp_state(), RampState::RampUp);
}
