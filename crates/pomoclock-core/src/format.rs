//! Display formatting for countdown values.

/// Format a number of seconds as `MM:SS`.
///
/// Both fields are zero-padded to two digits. The minutes field is not capped,
/// so an hour renders as `"60:00"` and longer durations grow wider.
pub fn format_duration(total_secs: u64) -> String {
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{minutes:02}:{seconds:02}")
}
