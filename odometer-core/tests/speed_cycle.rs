mod support;

use odometer_core::{
    CaptureOutcome, Odometer, OdometerConfig, PulseMailbox, SpeedEstimator, SpeedSample,
};

use support::{ManualCounter, RecordingBar};

fn mph(sample: SpeedSample) -> f32 {
    sample.speed().expect("measured speed").per_hour()
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn speed_is_inverse_of_elapsed_time() {
    let estimator = SpeedEstimator::new(&OdometerConfig::BICYCLE);
    let slow = estimator.estimate(1_000).unwrap().per_hour();
    let fast = estimator.estimate(500).unwrap().per_hour();

    assert_close(slow, 88.0 * (3_600_000.0 / 63_360.0) / 1_000.0);
    assert_close(slow, 5.0);
    assert_close(fast, 2.0 * slow);
}

#[test]
fn counter_reset_makes_each_sample_interval_relative() {
    let mailbox = PulseMailbox::new();
    let capture = mailbox.capture(4);
    let mut odometer = Odometer::new(OdometerConfig::BICYCLE, mailbox.receiver()).unwrap();
    let counter = ManualCounter::default();
    let mut bar = RecordingBar::default();

    for _ in 0..3 {
        // 1000 ms between pulses at 16 raw ticks per ms
        counter.advance(16_000);
        capture.on_edge_with(true, &counter);
        let report = odometer.poll(&counter, &mut bar).unwrap();
        assert_close(mph(report.speed), 5.0);
    }
    assert_eq!(counter.resets(), 3);
}

#[test]
fn zero_elapsed_reports_unknown_speed_without_stalling() {
    let mailbox = PulseMailbox::new();
    let capture = mailbox.capture(4);
    let mut odometer = Odometer::new(OdometerConfig::BICYCLE, mailbox.receiver()).unwrap();
    let counter = ManualCounter::default();
    let mut bar = RecordingBar::default();

    // Below one time unit after the prescale.
    counter.advance(15);
    capture.on_edge_with(true, &counter);
    let report = odometer.poll(&counter, &mut bar).unwrap();

    assert_eq!(report.speed, SpeedSample::Unknown);
    assert_eq!(report.feet, 7);
    assert_eq!(bar.patterns, [0b1000_0000]);

    counter.advance(8_000);
    capture.on_edge_with(true, &counter);
    let report = odometer.poll(&counter, &mut bar).unwrap();
    assert_close(mph(report.speed), 10.0);
}

#[test]
fn later_capture_wins_when_two_arrive_before_one_cycle() {
    let mailbox = PulseMailbox::new();
    let capture = mailbox.capture(0);
    let mut odometer = Odometer::new(OdometerConfig::BICYCLE, mailbox.receiver()).unwrap();
    let counter = ManualCounter::default();
    let mut bar = RecordingBar::default();

    counter.advance(400);
    assert_eq!(capture.on_edge_with(true, &counter), CaptureOutcome::Latched);
    counter.advance(600);
    assert_eq!(
        capture.on_edge_with(true, &counter),
        CaptureOutcome::Overwrote
    );

    let report = odometer.poll(&counter, &mut bar).unwrap();
    assert_close(mph(report.speed), 5.0);
    assert_eq!(report.feet, 7);
    assert!(odometer.poll(&counter, &mut bar).is_none());
    assert_eq!(odometer.cycles(), 1);
}

#[test]
fn inactive_edge_never_starts_a_cycle() {
    let mailbox = PulseMailbox::new();
    let capture = mailbox.capture(4);
    let mut odometer = Odometer::new(OdometerConfig::BICYCLE, mailbox.receiver()).unwrap();
    let counter = ManualCounter::default();
    let mut bar = RecordingBar::default();

    counter.advance(16_000);
    assert_eq!(
        capture.on_edge_with(false, &counter),
        CaptureOutcome::Ignored
    );
    assert!(odometer.poll(&counter, &mut bar).is_none());
    assert_eq!(counter.resets(), 0);
    assert_eq!(odometer.state().intermediate_total(), 0);
}
