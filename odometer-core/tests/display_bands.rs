mod support;

use odometer_core::{DisplayLevel, Odometer, OdometerConfig, PulseMailbox};

use support::{ManualCounter, RecordingBar};

/// One foot per pulse so the display residue equals the pulse count.
const FOOT_WHEEL: OdometerConfig = OdometerConfig::new(12, 12, 5_280, 660);

#[test]
fn band_boundaries_drive_levels_and_wrap() {
    let mailbox = PulseMailbox::new();
    let capture = mailbox.capture(0);
    let mut odometer = Odometer::new(FOOT_WHEEL, mailbox.receiver()).unwrap();
    let counter = ManualCounter::default();
    let mut bar = RecordingBar::default();

    let mut level_at = |odometer: &mut Odometer<'_>| {
        counter.advance(500);
        capture.on_edge_with(true, &counter);
        odometer.poll(&counter, &mut bar).expect("pulse pending")
    };

    for pulse in 1..=5_281_u16 {
        let report = level_at(&mut odometer);
        match pulse {
            1 | 660 => assert_eq!(report.level, DisplayLevel::new(1).unwrap()),
            661 => assert_eq!(report.level, DisplayLevel::new(2).unwrap()),
            5_280 => {
                assert_eq!(report.level, DisplayLevel::FULL);
                assert_eq!(report.pattern, 0b1111_1111);
                assert_eq!(odometer.state().display_residue(), 5_280);
            }
            5_281 => {
                assert_eq!(report.level, DisplayLevel::OFF);
                assert_eq!(report.pattern, 0);
                assert_eq!(odometer.state().display_residue(), 0);
            }
            _ => {}
        }
    }

    let report = level_at(&mut odometer);
    assert_eq!(report.level, DisplayLevel::new(1).unwrap());
    assert_eq!(odometer.state().display_residue(), 1);
}

#[test]
fn bar_sequence_matches_reference_patterns() {
    let mailbox = PulseMailbox::new();
    let capture = mailbox.capture(0);
    let mut odometer = Odometer::new(FOOT_WHEEL, mailbox.receiver()).unwrap();
    let counter = ManualCounter::default();
    let mut bar = RecordingBar::default();

    for _ in 0..5_281 {
        counter.advance(500);
        capture.on_edge_with(true, &counter);
        odometer.poll(&counter, &mut bar);
    }

    let mut distinct = bar.patterns.clone();
    distinct.dedup();
    assert_eq!(
        distinct,
        [
            0b1000_0000,
            0b1100_0000,
            0b1110_0000,
            0b1111_0000,
            0b1111_1000,
            0b1111_1100,
            0b0111_1110,
            0b1111_1111,
            0b0000_0000,
        ]
    );
}

#[test]
fn level_is_stable_while_residue_stays_in_band() {
    let mailbox = PulseMailbox::new();
    let capture = mailbox.capture(0);
    let mut odometer = Odometer::new(OdometerConfig::BICYCLE, mailbox.receiver()).unwrap();
    let counter = ManualCounter::default();
    let mut bar = RecordingBar::default();

    for _ in 0..10 {
        counter.advance(1_000);
        capture.on_edge_with(true, &counter);
        odometer.poll(&counter, &mut bar);
    }

    assert!(bar.patterns.iter().all(|&pattern| pattern == 0b1000_0000));
}
