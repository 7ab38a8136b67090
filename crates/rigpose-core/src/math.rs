//! Scalar easing and smoothing helpers.

/// Cubic smoothstep on the unit interval: `t²(3 − 2t)`.
///
/// Input is clamped to `[0, 1]` first, so the result is always in `[0, 1]`.
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation between `a` and `b`.
///
/// Exact at both endpoints: `mix(a, b, 0) == a` and `mix(a, b, 1) == b`.
pub fn mix(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Per-frame blend factor of an exponential decay with the given rate.
///
/// `1 − e^{−dt·rate}`. Frame-rate independent: two steps of `dt/2` cover the
/// same fraction of the remaining distance as one step of `dt`. Negative or
/// non-finite `dt` yields 0.
pub fn smoothing_factor(dt: f64, rate: f64) -> f64 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    1.0 - (-dt * rate).exp()
}

/// Moves `current` toward `target` by the fraction `s`.
pub fn damp(current: f64, target: f64, s: f64) -> f64 {
    current + (target - current) * s
}

/// Sanitizes a frame delta: non-finite or negative values become 0.
pub(crate) fn sanitize_dt(dt: f64) -> f64 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        0.0
    }
}
