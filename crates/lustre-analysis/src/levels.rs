//! Level measurements and display reductions over analyser buffers.

/// Root-mean-square of a buffer. Empty buffers measure `0.0`.
///
/// ```rust
/// use lustre_analysis::levels::rms;
///
/// assert!((rms(&[1.0, -1.0, 1.0, -1.0]) - 1.0).abs() < 1e-6);
/// assert_eq!(rms(&[]), 0.0);
/// ```
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|&x| x * x).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Largest absolute value in a buffer.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0_f32, |acc, &x| acc.max(x.abs()))
}

/// Reduce `src` into `dst` by taking the maximum of each group of
/// `src.len() / dst.len()` consecutive values.
///
/// Trailing values that do not fill a whole group are ignored. NaN
/// values are skipped; a group with no finite maximum reduces to `0.0`.
pub fn group_max(src: &[f32], dst: &mut [f32]) {
    if dst.is_empty() {
        return;
    }
    let group = (src.len() / dst.len()).max(1);
    for (out, chunk) in dst.iter_mut().zip(src.chunks_exact(group)) {
        let max = chunk.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        *out = if max.is_finite() { max } else { 0.0 };
    }
}

/// Keep every `src.len() / dst.len()`-th value of `src`, clamped to `±limit`.
/// NaN becomes `0.0`.
pub fn decimate_clamped(src: &[f32], dst: &mut [f32], limit: f32) {
    if dst.is_empty() {
        return;
    }
    let step = (src.len() / dst.len()).max(1);
    for (out, &x) in dst.iter_mut().zip(src.iter().step_by(step)) {
        *out = if x.is_nan() { 0.0 } else { x.clamp(-limit, limit) };
    }
}

/// Map a dB value onto `0..=1` across `[min_db, max_db]`.
#[inline]
pub fn normalize_db(db: f32, min_db: f32, max_db: f32) -> f32 {
    let t = (db - min_db) / (max_db - min_db);
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak() {
        assert_eq!(peak(&[0.1, -0.7, 0.3]), 0.7);
        assert_eq!(peak(&[]), 0.0);
    }

    #[test]
    fn test_group_max() {
        let src: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let mut dst = [0.0; 4];
        group_max(&src, &mut dst);
        assert_eq!(dst, [3.0, 7.0, 11.0, 15.0]);
    }

    #[test]
    fn test_decimate_clamped() {
        let src = [0.5, 9.0, -3.0, 1.0, -0.25, 0.0, 2.0, 2.0];
        let mut dst = [0.0; 4];
        decimate_clamped(&src, &mut dst, 1.0);
        assert_eq!(dst, [0.5, -1.0, -0.25, 1.0]);
    }

    #[test]
    fn test_normalize_db() {
        assert_eq!(normalize_db(-100.0, -100.0, -30.0), 0.0);
        assert_eq!(normalize_db(-30.0, -100.0, -30.0), 1.0);
        assert_eq!(normalize_db(-200.0, -100.0, -30.0), 0.0);
        assert_eq!(normalize_db(0.0, -100.0, -30.0), 1.0);
        assert!((normalize_db(-65.0, -100.0, -30.0) - 0.5).abs() < 1e-6);
        assert_eq!(normalize_db(f32::NAN, -100.0, -30.0), 0.0);
    }

    #[test]
    fn test_reductions_drop_nan() {
        let src = [f32::NAN, 0.5, f32::NAN, f32::NAN, f32::INFINITY, -2.0, 0.25, 0.0];
        let mut grouped = [1.0; 4];
        group_max(&src, &mut grouped);
        assert_eq!(grouped, [0.5, 0.0, 0.0, 0.25]);

        let mut decimated = [1.0; 4];
        decimate_clamped(&src, &mut decimated, 1.0);
        assert_eq!(decimated, [0.0, 0.0, 1.0, 0.25]);
    }
}
