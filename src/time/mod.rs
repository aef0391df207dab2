//! Time and number helpers — ms↔beat conversion, grid rounding, interpolation.
//!
//! Every function here is pure and total on finite input. `NaN` and infinite
//! values are not checked: callers supply finite numbers.

pub mod format;
pub mod snap;

pub use format::{format_beat, format_time};
pub use snap::{SnapIncrement, HIGHEST_PRECISION};

/// Convert milliseconds to beats, settled onto the [`HIGHEST_PRECISION`] grid.
///
/// Settling removes the residue that repeated ms↔beat round-trips leave
/// behind (`11.999994` becomes `12`).
pub fn ms_to_beats(ms: f64, bpm: f64) -> f64 {
    let raw = (ms / 1000.0) * (bpm / 60.0);
    round_to_nearest(raw, HIGHEST_PRECISION)
}

/// Convert beats to milliseconds. Exact inverse of [`ms_to_beats`] before settling.
pub fn beats_to_ms(beats: f64, bpm: f64) -> f64 {
    beats / (bpm / 60.0) * 1000.0
}

/// Round `value` to the nearest multiple of `increment`.
pub fn round_to_nearest(value: f64, increment: f64) -> f64 {
    (value / increment).round() * increment
}

/// Round `value` down to a multiple of `increment`.
pub fn floor_to_nearest(value: f64, increment: f64) -> f64 {
    (value / increment).floor() * increment
}

/// Round `value` up to a multiple of `increment`.
pub fn ceil_to_nearest(value: f64, increment: f64) -> f64 {
    (value / increment).ceil() * increment
}

/// Clamp `value` into `[min, max]`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Map `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// A zero-width input range divides by zero; callers pass non-degenerate ranges.
pub fn normalize(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let ratio = (value - in_min) / (in_max - in_min);
    ratio * (out_max - out_min) + out_min
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Direction of a step along the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forwards,
    Backwards,
}

impl Direction {
    /// `+1.0` for forwards, `-1.0` for backwards.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forwards => 1.0,
            Direction::Backwards => -1.0,
        }
    }
}

/// Move to the next grid line strictly past `value` in `direction`.
///
/// Values sitting within half a precision unit of a grid line count as being
/// on it, so `1.4999999` steps forward to `2.0` with a `0.5` grid.
pub fn step_on_grid(value: f64, increment: f64, direction: Direction) -> f64 {
    let tolerance = HIGHEST_PRECISION / 2.0;
    match direction {
        Direction::Forwards => floor_to_nearest(value + tolerance, increment) + increment,
        Direction::Backwards => ceil_to_nearest(value - tolerance, increment) - increment,
    }
}
