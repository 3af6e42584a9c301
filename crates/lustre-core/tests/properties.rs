//! Property-based tests for lustre-core DSP primitives.
//!
//! Filter stability across the gain ranges the stages use, smoothing
//! convergence, and delay line integrity.

use proptest::prelude::*;
use lustre_core::{
    Biquad, InterpolatedDelay, SmoothedParam, db_to_linear, high_shelf_coefficients,
    linear_to_db, low_shelf_coefficients, peaking_eq_coefficients,
};

/// Coefficient generators indexed 0..3 (peak, low shelf, high shelf).
fn configure_biquad(biquad: &mut Biquad, variant: usize, freq: f32, gain_db: f32) {
    let sr = 48000.0;
    let coeffs = match variant % 3 {
        0 => peaking_eq_coefficients(freq, 1.0, gain_db, sr),
        1 => low_shelf_coefficients(freq, 0.707, gain_db, sr),
        2 => high_shelf_coefficients(freq, 0.707, gain_db, sr),
        _ => unreachable!(),
    };
    biquad.apply(coeffs);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Boosts and cuts up to 12 dB stay stable for any audible frequency.
    #[test]
    fn eq_stability(
        freq in 40.0f32..16000.0f32,
        gain_db in -12.0f32..12.0f32,
        variant in 0usize..3,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut biquad = Biquad::new();
        configure_biquad(&mut biquad, variant, freq, gain_db);

        for _ in 0..32 {
            for &sample in &input {
                let out = biquad.process(sample);
                prop_assert!(
                    out.is_finite() && out.abs() < 100.0,
                    "variant {} (freq={}, gain={}) produced {}",
                    variant, freq, gain_db, out
                );
            }
        }
    }

    /// A smoothed parameter always lands exactly on its target and never
    /// leaves the interval between start and target.
    #[test]
    fn smoothing_converges_within_bounds(
        start in -2.0f32..2.0f32,
        target in -2.0f32..2.0f32,
    ) {
        let mut param = SmoothedParam::standard(start, 48000.0);
        param.set_target(target);
        let (lo, hi) = if start < target { (start, target) } else { (target, start) };

        for _ in 0..48000 {
            let value = param.advance();
            prop_assert!(value >= lo - 1e-6 && value <= hi + 1e-6);
        }
        prop_assert_eq!(param.get(), target);
    }

    /// Whole-sample delays return the exact input written that many
    /// samples earlier.
    #[test]
    fn delay_returns_past_input(
        delay in 0usize..64,
        input in prop::collection::vec(-1.0f32..1.0f32, 128),
    ) {
        let mut line = InterpolatedDelay::new(64);
        for (i, &sample) in input.iter().enumerate() {
            let out = line.write_read(sample, delay as f32);
            let expected = if i >= delay { input[i - delay] } else { 0.0 };
            prop_assert_eq!(out, expected);
        }
    }

    /// dB conversions invert each other over the useful range.
    #[test]
    fn db_round_trip(db in -100.0f32..24.0f32) {
        let back = linear_to_db(db_to_linear(db));
        prop_assert!((back - db).abs() < 1e-3, "{} came back as {}", db, back);
    }
}
