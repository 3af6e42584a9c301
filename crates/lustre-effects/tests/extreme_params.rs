//! Extreme parameter tests for the lustre nodes.
//!
//! Every node must produce finite output with settings at the ends of
//! their ranges and at unusual sample rates (8 kHz and 192 kHz).

use lustre_core::Effect;
use lustre_effects::{
    Compressor, ConvolutionKernel, Convolver, FilterShape, Limiter, StereoFilter, WaveShaper,
};

const SAMPLE_RATES: [f32; 3] = [8000.0, 48000.0, 192000.0];
const NUM_SAMPLES: usize = 2000;

fn assert_finite_output(effect: &mut dyn Effect, label: &str) {
    for i in 0..NUM_SAMPLES {
        let input = match i % 3 {
            0 => 1.0,
            1 => -1.0,
            _ => 0.0,
        };
        let (l, r) = effect.process_stereo(input, -input * 0.5);
        assert!(
            l.is_finite() && r.is_finite(),
            "{}: non-finite output at sample {}: ({}, {})",
            label,
            i,
            l,
            r
        );
    }
}

#[test]
fn compressor_extremes() {
    for sr in SAMPLE_RATES {
        for (threshold, ratio, attack, release) in [(-60.0, 20.0, 0.1, 10.0), (0.0, 1.0, 100.0, 1000.0)] {
            let mut comp = Compressor::new(sr);
            comp.set_threshold_db(threshold);
            comp.set_ratio(ratio);
            comp.set_attack_ms(attack);
            comp.set_release_ms(release);
            comp.set_makeup(4.0);
            assert_finite_output(&mut comp, &format!("compressor @ {sr}"));
        }
    }
}

#[test]
fn limiter_extremes() {
    for sr in SAMPLE_RATES {
        for ceiling in [-60.0, -24.0, 0.0] {
            let mut limiter = Limiter::new(sr);
            limiter.set_ceiling_db(ceiling);
            limiter.set_release_ms(1.0);
            assert_finite_output(&mut limiter, &format!("limiter {ceiling} dB @ {sr}"));
        }
    }
}

#[test]
fn filter_extremes() {
    let shapes = [
        FilterShape::Lowpass,
        FilterShape::Highpass,
        FilterShape::Peaking,
        FilterShape::LowShelf,
        FilterShape::HighShelf,
    ];
    for sr in SAMPLE_RATES {
        for shape in shapes {
            for (freq, gain) in [(20.0, -8.0), (10000.0, 8.0), (12000.0, 0.0)] {
                let mut filter = StereoFilter::new(shape, freq, 0.707, sr);
                filter.set_gain_db(gain);
                assert_finite_output(&mut filter, &format!("{shape:?} {freq} Hz @ {sr}"));
            }
        }
    }
}

#[test]
fn waveshaper_extremes() {
    for amount in [0.0, 0.3, 10.0] {
        let mut shaper = WaveShaper::new();
        shaper.set_amount(amount);
        assert_finite_output(&mut shaper, &format!("waveshaper {amount}"));
    }
}

#[test]
fn convolver_with_silent_and_loud_kernels() {
    let silent = ConvolutionKernel::new(&vec![0.0; 3000], &vec![0.0; 3000], 48000.0, true);
    let loud = ConvolutionKernel::new(&vec![1.0; 3000], &vec![-1.0; 3000], 48000.0, true);
    let mut conv = Convolver::new(vec![silent, loud]);
    assert_finite_output(&mut conv, "convolver silent");
    conv.select(1);
    assert_finite_output(&mut conv, "convolver loud");
}
