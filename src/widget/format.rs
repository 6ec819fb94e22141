//! Human-readable number, byte and duration formatting helpers.

/// Values whose maximum exceeds this are treated as byte quantities.
pub const BYTE_FORMAT_THRESHOLD: f64 = 1024.0 * 1024.0;

const BYTE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Format bytes with 1024-based units (e.g. "512 B", "1.5 GB").
pub fn format_bytes(bytes: f64) -> String {
    if !bytes.is_finite() || bytes <= 0.0 {
        return "0 B".to_string();
    }
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", value.round() as u64)
    } else {
        format!("{:.1} {}", value, BYTE_UNITS[unit])
    }
}

/// Format a plain number with K/M suffixes at 1,000 and 1,000,000.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Formats `value` as bytes when `max` is larger than 1 MiB, as a plain number otherwise.
pub fn format_value(value: f64, max: f64) -> String {
    if max > BYTE_FORMAT_THRESHOLD {
        format_bytes(value)
    } else {
        format_number(value)
    }
}

/// Format a percentage with one decimal, e.g. "42.5%".
pub fn format_percentage(percentage: f64) -> String {
    format!("{:.1}%", percentage)
}

/// Format seconds into a compact human duration (e.g., "3d 4h", "4h 23m", "12m").
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
