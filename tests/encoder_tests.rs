//! Integration tests driving the encoder the way the platform layer does:
//! the mock pins play the hardware, `on_edge` plays the interrupt.

use std::sync::atomic::{AtomicUsize, Ordering};

use rs_periph::hal::MockPins;
use rs_periph::{ActiveLevel, Encoder, EncoderConfig, PinSetup, RotationConvention};

fn push_pull_config() -> EncoderConfig {
    EncoderConfig::default()
        .with_pin_a(PinSetup::push_pull(ActiveLevel::High))
        .with_pin_b(PinSetup::push_pull(ActiveLevel::High))
        .with_pin_z(PinSetup::push_pull(ActiveLevel::High))
}

fn rotate_cw(pins: &MockPins, encoder: &Encoder<MockPins>, edges: usize) {
    let mut phase = pins.phase() as usize;
    for _ in 0..edges {
        phase = (phase + 1) % 4;
        pins.set_phase(phase as u8);
        encoder.on_edge();
    }
}

fn rotate_ccw(pins: &MockPins, encoder: &Encoder<MockPins>, edges: usize) {
    let mut phase = pins.phase() as usize;
    for _ in 0..edges {
        phase = (phase + 3) % 4;
        pins.set_phase(phase as u8);
        encoder.on_edge();
    }
}

#[test]
fn counts_many_revolutions_without_drift() {
    let pins = MockPins::new();
    let encoder = Encoder::new(pins.clone(), &push_pull_config());

    rotate_cw(&pins, &encoder, 4000); // ten 400-edge revolutions
    assert_eq!(encoder.position(), 4000);

    rotate_ccw(&pins, &encoder, 4000);
    assert_eq!(encoder.position(), 0);
    assert_eq!(pins.phase(), 0);
}

#[test]
fn zsync_corrects_accumulated_drift_each_cycle() {
    let pins = MockPins::new().with_z(false);
    let config = push_pull_config().with_zsync(100, 0);
    let encoder = Encoder::new(pins.clone(), &config);

    // First cycle: three spurious counts sneak in.
    rotate_cw(&pins, &encoder, 101);
    encoder.adjust(3);
    pins.set_z(true);
    rotate_cw(&pins, &encoder, 1); // enters (1,1): 105 snaps down to 100
    pins.set_z(false);

    assert_eq!(encoder.position(), 100);
    let drift = encoder.drift();
    assert_eq!(drift.net, -5);
    assert_eq!(drift.absolute, 5);

    // Second cycle: three counts go missing.
    rotate_cw(&pins, &encoder, 99);
    encoder.adjust(-3);
    pins.set_z(true);
    rotate_cw(&pins, &encoder, 1); // 197 snaps up to 200
    pins.set_z(false);

    assert_eq!(encoder.position(), 200);
    let drift = encoder.drift();
    assert_eq!(drift.net, -2);
    assert_eq!(drift.absolute, 8);
}

#[test]
fn zsync_honors_sync_offset() {
    let pins = MockPins::new().with_z(false);
    let config = push_pull_config().with_zsync(400, 50);
    let encoder = Encoder::new(pins.clone(), &config);

    // Index pulse while the counter reads 448: expected values are
    // 50 + k*400, so it snaps to 450.
    encoder.set_position(446);
    rotate_cw(&pins, &encoder, 1); // 447, phase 1
    pins.set_z(true);
    rotate_cw(&pins, &encoder, 1); // 448, snapped

    assert_eq!(encoder.position(), 450);
    assert_eq!(encoder.drift().net, 2);
}

#[test]
fn trigger_rearms_across_revolutions() {
    static FIRES: AtomicUsize = AtomicUsize::new(0);
    FIRES.store(0, Ordering::SeqCst);

    let pins = MockPins::new();
    let encoder = Encoder::new(pins.clone(), &push_pull_config());

    encoder.set_trigger_at(150, || {
        FIRES.fetch_add(1, Ordering::SeqCst);
    });
    rotate_cw(&pins, &encoder, 200);
    assert_eq!(FIRES.load(Ordering::SeqCst), 1);
    assert!(!encoder.trigger_armed());

    // One-shot: a second pass does nothing until re-armed.
    rotate_ccw(&pins, &encoder, 100);
    assert_eq!(FIRES.load(Ordering::SeqCst), 1);

    encoder.set_trigger_at(50, || {
        FIRES.fetch_add(1, Ordering::SeqCst);
    });
    rotate_ccw(&pins, &encoder, 100);
    assert_eq!(FIRES.load(Ordering::SeqCst), 2);
}

#[test]
fn runtime_reconfiguration_mid_rotation() {
    let pins = MockPins::new().with_z(false);
    let encoder = Encoder::new(pins.clone(), &push_pull_config());

    rotate_cw(&pins, &encoder, 10);
    assert_eq!(encoder.position(), 10);

    // Enable Z-sync and flip the convention while "interrupts" keep firing.
    encoder.set_zsync(100, 0);
    encoder.set_convention(RotationConvention::CcwPositive);
    assert!(encoder.zsync_enabled());

    rotate_cw(&pins, &encoder, 10);
    assert_eq!(encoder.position(), 0);

    encoder.disable_zsync();
    assert!(!encoder.zsync_enabled());
}
