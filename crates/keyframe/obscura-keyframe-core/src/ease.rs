//! Easing primitives:
//! - clamp / lerp (extrapolation allowed)
//! - ease_in_out (cubic)
//! - spring_ease (damped-oscillation approximation, cosmetic)
//! - eased_progress (interpolation type -> eased segment progress)

use crate::data::Interpolation;

/// Bound `v` to `[lo, hi]`. Callers guarantee `lo <= hi`.
#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

/// Linear interpolation of scalars. `t` outside [0,1] extrapolates.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic ease-in-out over `t` in [0,1].
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// Damped-oscillation curve `1 - e^(-7t)·cos(12t)`, clamped to [0,1] input.
/// Visually resembles spring settling; it is not a physical simulation and
/// carries no mass/stiffness/damping parameters.
#[inline]
pub fn spring_ease(t: f32) -> f32 {
    let t = clamp(t, 0.0, 1.0);
    1.0 - (-7.0 * t).exp() * (12.0 * t).cos()
}

/// Map raw segment progress to eased progress for the segment's outgoing
/// interpolation type. `Hold` pins the segment to its start value.
#[inline]
pub fn eased_progress(interpolation: Interpolation, raw: f32) -> f32 {
    let t = clamp(raw, 0.0, 1.0);
    match interpolation {
        Interpolation::Linear => t,
        Interpolation::EaseInOut => ease_in_out(t),
        Interpolation::Spring => spring_ease(t),
        Interpolation::Hold => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    #[test]
    fn lerp_and_clamp() {
        approx(lerp(0.0, 1.0, 0.5), 0.5, 1e-6);
        approx(lerp(2.0, 4.0, 1.5), 5.0, 1e-6);
        approx(clamp(1.5, 0.0, 1.0), 1.0, 1e-6);
        approx(clamp(-0.5, 0.0, 1.0), 0.0, 1e-6);
    }

    #[test]
    fn ease_in_out_endpoints_and_midpoint() {
        approx(ease_in_out(0.0), 0.0, 1e-6);
        approx(ease_in_out(0.5), 0.5, 1e-6);
        approx(ease_in_out(1.0), 1.0, 1e-6);
    }

    #[test]
    fn spring_starts_at_zero_and_settles_near_one() {
        approx(spring_ease(0.0), 0.0, 1e-6);
        approx(spring_ease(1.0), 1.0, 1e-3);
        // Input outside [0,1] is clamped.
        approx(spring_ease(2.0), spring_ease(1.0), 1e-6);
    }

    #[test]
    fn hold_pins_progress_to_zero() {
        approx(eased_progress(Interpolation::Hold, 0.999), 0.0, 1e-6);
        approx(eased_progress(Interpolation::Linear, 0.25), 0.25, 1e-6);
    }
}
