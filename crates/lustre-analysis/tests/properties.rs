//! Property-based tests for the analyser and its display reductions.

use lustre_analysis::levels::{decimate_clamped, group_max, normalize_db, peak, rms};
use lustre_analysis::{Analyser, AnalyserConfig, Window};
use proptest::prelude::*;

fn small_analyser(smoothing: f32, window: Window) -> Analyser {
    Analyser::new(AnalyserConfig {
        fft_size: 256,
        smoothing,
        window,
        ..AnalyserConfig::default()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever is pushed, published bins stay in `0..=1` and the
    /// time buffer holds the down-mixed input.
    #[test]
    fn published_buffers_stay_in_range(
        smoothing in 0.0f32..1.0f32,
        blocks in prop::collection::vec(
            prop::collection::vec((-8.0f32..8.0f32, -8.0f32..8.0f32), 1..300),
            1..6,
        ),
    ) {
        let mut analyser = small_analyser(smoothing, Window::Blackman);
        let readout = analyser.readout();

        for block in &blocks {
            let (left, right): (Vec<f32>, Vec<f32>) = block.iter().copied().unzip();
            analyser.push(&left, &right);
            analyser.publish();
        }

        let mut bins = vec![f32::NAN; readout.frequency_bin_count()];
        readout.copy_frequency(&mut bins);
        prop_assert!(bins.iter().all(|v| (0.0..=1.0).contains(v)));

        let mut time = vec![f32::NAN; readout.time_len()];
        readout.copy_time(&mut time);
        prop_assert!(time.iter().all(|v| v.is_finite() && v.abs() <= 8.0));

        // The newest sample sits at the end of the window.
        let last = blocks.last().and_then(|b| b.last()).copied();
        if let Some((l, r)) = last {
            prop_assert!((time[time.len() - 1] - (l + r) * 0.5).abs() < 1e-6);
        }
    }

    /// Clearing drops history: a silent window publishes an empty spectrum.
    #[test]
    fn clear_then_silence_is_empty(
        input in prop::collection::vec(-1.0f32..1.0f32, 256),
    ) {
        let mut analyser = small_analyser(0.0, Window::Hann);
        let readout = analyser.readout();
        analyser.push(&input, &input);
        analyser.publish();

        analyser.clear();
        analyser.publish();

        let mut bins = vec![1.0; readout.frequency_bin_count()];
        readout.copy_frequency(&mut bins);
        prop_assert!(bins.iter().all(|&v| v == 0.0));
    }

    /// Group maxima are finite and bounded by the source's extremes.
    #[test]
    fn group_max_is_bounded(
        src in prop::collection::vec(-8.0f32..8.0f32, 1..2048),
        dst_len in 1usize..300,
    ) {
        let mut dst = vec![f32::NAN; dst_len];
        group_max(&src, &mut dst);

        let groups = if src.len() >= dst_len { dst_len } else { src.len() };
        let lo = src.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = src.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        for &v in &dst[..groups] {
            prop_assert!(v.is_finite());
            prop_assert!(v >= lo && v <= hi);
        }
    }

    /// Decimated samples never leave `±limit`.
    #[test]
    fn decimation_respects_limit(
        src in prop::collection::vec(prop_oneof![
            8 => -8.0f32..8.0f32,
            1 => Just(f32::NAN),
            1 => Just(f32::INFINITY),
            1 => Just(f32::NEG_INFINITY),
        ], 1..2048),
        dst_len in 1usize..300,
        limit in 0.1f32..4.0f32,
    ) {
        let mut dst = vec![0.0; dst_len];
        decimate_clamped(&src, &mut dst, limit);
        prop_assert!(dst.iter().all(|v| v.abs() <= limit));
    }

    /// dB normalisation lands in `0..=1` for any input, NaN included.
    #[test]
    fn normalize_db_is_unit_range(
        db in prop_oneof![-400.0f32..100.0f32, Just(f32::NAN), Just(f32::NEG_INFINITY)],
    ) {
        prop_assert!((0.0..=1.0).contains(&normalize_db(db, -100.0, -30.0)));
    }

    /// RMS never exceeds the peak of the same buffer.
    #[test]
    fn rms_is_at_most_peak(samples in prop::collection::vec(-4.0f32..4.0f32, 0..1024)) {
        let top = peak(&samples);
        prop_assert!(rms(&samples) <= top * (1.0 + 1e-4) + 1e-6);
    }
}
