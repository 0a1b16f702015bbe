//! Frame conditioning stages applied to float samples before the transform.
//!
//! Each stage works in place on one frame. None of them allocate.

/// Fraction of the frame level below which [`rms_gate`] silences a sample.
pub const GATE_THRESHOLD: f32 = 0.8;

/// Multiply every sample by `gain`.
pub fn apply_gain(samples: &mut [f32], gain: f32) {
    for sample in samples.iter_mut() {
        *sample *= gain;
    }
}

/// Frame level used by [`rms_gate`]: `sqrt(sum(x^2)) / len`.
pub fn frame_level(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    libm::sqrtf(sum) / samples.len() as f32
}

/// Zero samples quieter than `GATE_THRESHOLD * level` and divide the
/// survivors by the level. A silent frame is left untouched.
pub fn rms_gate(samples: &mut [f32]) {
    let level = frame_level(samples);
    if level <= 0.0 {
        return;
    }
    let threshold = GATE_THRESHOLD * level;
    for sample in samples.iter_mut() {
        if sample.abs() < threshold {
            *sample = 0.0;
        } else {
            *sample /= level;
        }
    }
}

/// Divide by the largest absolute sample so the peak reaches 1.0.
pub fn normalize_peak(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak > 0.0 {
        let inv = 1.0 / peak;
        for sample in samples.iter_mut() {
            *sample *= inv;
        }
    }
}

/// Square each sample, keeping its sign.
pub fn square_signed(samples: &mut [f32]) {
    for sample in samples.iter_mut() {
        *sample *= sample.abs();
    }
}

/// Clamp each sample to `[0.0, 1.0]`. Negative samples become zero.
pub fn clip(samples: &mut [f32]) {
    for sample in samples.iter_mut() {
        *sample = sample.clamp(0.0, 1.0);
    }
}

/// Zero every sample louder than `amplitude`.
pub fn clip_above(samples: &mut [f32], amplitude: f32) {
    for sample in samples.iter_mut() {
        if *sample > amplitude {
            *sample = 0.0;
        }
    }
}

/// Zero every sample quieter than `amplitude`.
pub fn clip_below(samples: &mut [f32], amplitude: f32) {
    for sample in samples.iter_mut() {
        if *sample < amplitude {
            *sample = 0.0;
        }
    }
}

/// Low-pass along the slice: `x[i] = f * x[i - 1] + (1 - f) * x[i]`,
/// left to right, so each value sees its already-smoothed neighbour.
/// A factor of `0` leaves the values alone.
pub fn smooth_neighbours(values: &mut [f32], factor: f32) {
    if factor == 0.0 {
        return;
    }
    for i in 1..values.len() {
        values[i] = factor * values[i - 1] + (1.0 - factor) * values[i];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_gain_scales() {
        let mut samples = [0.5f32, -0.25, 0.0];
        apply_gain(&mut samples, 2.0);
        assert_eq!(samples, [1.0, -0.5, 0.0]);
    }

    #[test]
    fn rms_gate_drops_quiet_samples() {
        // level = sqrt(133) / 4 ~= 2.88, threshold ~= 2.31
        let mut samples = [8.0f32, -8.0, 1.0, 2.0];
        assert_eq!(frame_level(&[8.0, 8.0, 0.0, 0.0]), libm::sqrtf(128.0) / 4.0);
        let level = frame_level(&samples);
        rms_gate(&mut samples);
        assert_eq!(samples[0], 8.0 / level);
        assert_eq!(samples[1], -8.0 / level);
        assert_eq!(samples[2], 0.0);
        assert_eq!(samples[3], 0.0);
    }

    #[test]
    fn rms_gate_leaves_silence() {
        let mut samples = [0.0f32; 8];
        rms_gate(&mut samples);
        assert_eq!(samples, [0.0; 8]);
    }

    #[test]
    fn normalize_peak_reaches_one() {
        let mut samples = [0.1f32, -0.4, 0.2];
        normalize_peak(&mut samples);
        assert_eq!(samples[1], -1.0);
        assert!((samples[0] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn square_signed_then_clip() {
        let mut samples = [0.5f32, -0.5, 2.0, -3.0];
        square_signed(&mut samples);
        assert_eq!(samples, [0.25, -0.25, 4.0, -9.0]);
        clip(&mut samples);
        assert_eq!(samples, [0.25, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn clip_drops_negatives() {
        let mut samples = [-0.5f32, 0.25, 2.0];
        clip(&mut samples);
        assert_eq!(samples, [0.0, 0.25, 1.0]);
    }

    #[test]
    fn threshold_clips() {
        let mut samples = [0.1f32, 0.5, 0.9];
        clip_above(&mut samples, 0.5);
        assert_eq!(samples, [0.1, 0.5, 0.0]);

        let mut samples = [0.1f32, 0.5, 0.9];
        clip_below(&mut samples, 0.5);
        assert_eq!(samples, [0.0, 0.5, 0.9]);
    }

    #[test]
    fn smooth_neighbours_carries_left_to_right() {
        let mut values = [1.0f32, 0.0, 0.0, 0.0];
        smooth_neighbours(&mut values, 0.5);
        assert_eq!(values, [1.0, 0.5, 0.25, 0.125]);

        let mut values = [0.0f32, 1.0, 0.0];
        smooth_neighbours(&mut values, 0.0);
        assert_eq!(values, [0.0, 1.0, 0.0]);

        let mut empty: [f32; 0] = [];
        smooth_neighbours(&mut empty, 0.5);
    }
}
