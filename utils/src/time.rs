//! Time formatting helpers.

use std::time::Duration;

/// Format an elapsed duration for log lines and run summaries.
pub fn format_duration(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    let secs = elapsed.as_secs();
    if millis < 1_000 {
        format!("{millis}ms")
    } else if secs < 60 {
        format!("{}.{:01}s", secs, elapsed.subsec_millis() / 100)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
