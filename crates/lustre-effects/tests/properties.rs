//! Property-based tests for the dynamics and saturation nodes.

use lustre_core::{Effect, db_to_linear};
use lustre_effects::{Compressor, Limiter, WaveShaper, saturation_curve};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// No sample leaves the limiter above its ceiling, whatever comes in.
    #[test]
    fn limiter_respects_ceiling(
        ceiling in -24.0f32..0.0f32,
        input in prop::collection::vec((-8.0f32..8.0f32, -8.0f32..8.0f32), 256),
    ) {
        let mut limiter = Limiter::new(48000.0);
        limiter.set_ceiling_db(ceiling);
        let linear = db_to_linear(ceiling);

        for (l, r) in input {
            let (out_l, out_r) = limiter.process_stereo(l, r);
            prop_assert!(out_l.abs() <= linear && out_r.abs() <= linear);
        }
    }

    /// With unity makeup a compressor only ever attenuates.
    #[test]
    fn compressor_never_boosts(
        threshold in -60.0f32..0.0f32,
        ratio in 1.0f32..20.0f32,
        input in prop::collection::vec(-1.0f32..1.0f32, 256),
    ) {
        let mut comp = Compressor::new(48000.0);
        comp.set_threshold_db(threshold);
        comp.set_ratio(ratio);

        for x in input {
            let (l, r) = comp.process_stereo(x, x);
            prop_assert!(l.abs() <= x.abs() + 1e-6);
            prop_assert_eq!(l, r);
        }
    }

    /// The saturation curve keeps [-1, 1] inside [-1, 1] and preserves sign.
    #[test]
    fn saturation_is_bounded(amount in 0.0f32..1.0f32, x in -1.0f32..=1.0f32) {
        let mut shaper = WaveShaper::new();
        shaper.set_amount(amount);
        let y = shaper.shape(x);
        prop_assert!(y.abs() <= 1.0 + 1e-6);
        prop_assert!(y * x >= 0.0 || y.abs() < 1e-4);
        prop_assert!(saturation_curve(x, 50.0 * amount).abs() <= 1.0 + 1e-6);
    }
}
