//! Display formatting for beat numbers and song time.

/// Format a beat number with exactly three fractional digits, truncated.
///
/// `12.3456` → `"12.345"`, `-0.5` → `"-0.500"`.
pub fn format_beat(beat: f64) -> String {
    // Beats arrive settled on a 1/192 grid, so a tiny nudge keeps values
    // like 2.999999999 from truncating to 2.999.
    let thousandths = (beat.abs() * 1000.0 + 1e-6).trunc() as u64;
    let sign = if beat < 0.0 && thousandths > 0 { "-" } else { "" };
    format!("{sign}{}.{:03}", thousandths / 1000, thousandths % 1000)
}

/// Format milliseconds as zero-padded `MM:SS`. Negative input renders as `00:00`.
pub fn format_time(ms: f64) -> String {
    let total_seconds = (ms.max(0.0) / 1000.0).floor() as u64;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beat_whole_number() {
        assert_eq!(format_beat(0.0), "0.000");
        assert_eq!(format_beat(12.0), "12.000");
    }

    #[test]
    fn beat_truncates_not_rounds() {
        assert_eq!(format_beat(12.3456), "12.345");
        assert_eq!(format_beat(1.9999), "1.999");
    }

    #[test]
    fn beat_settled_residue() {
        assert_eq!(format_beat(2.999_999_999_9), "3.000");
    }

    #[test]
    fn beat_negative() {
        assert_eq!(format_beat(-0.5), "-0.500");
        assert_eq!(format_beat(-0.000_000_1), "0.000");
    }

    #[test]
    fn time_zero_padded() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(5_999.0), "00:05");
        assert_eq!(format_time(65_000.0), "01:05");
        assert_eq!(format_time(600_000.0), "10:00");
    }

    #[test]
    fn time_negative_clamps() {
        assert_eq!(format_time(-2_500.0), "00:00");
    }
}
