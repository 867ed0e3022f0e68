//! Human-readable sizes and durations for status lines.

use std::time::Duration;

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;

/// Bundle and page sizes. Anything past a mebibyte stays in MiB.
///
/// ```
/// use elmdev_cli::ui::format_size;
///
/// assert_eq!(format_size(312), "312 B");
/// assert_eq!(format_size(2048), "2.0 KiB");
/// assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MiB");
/// ```
pub fn format_size(bytes: u64) -> String {
    match bytes {
        b if b < KIB => format!("{b} B"),
        b if b < MIB => format!("{:.1} KiB", b as f64 / KIB as f64),
        b => format!("{:.1} MiB", b as f64 / MIB as f64),
    }
}

/// Build durations: milliseconds under a second, otherwise seconds.
///
/// ```
/// use std::time::Duration;
/// use elmdev_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(84)), "84ms");
/// assert_eq!(format_duration(Duration::from_millis(2340)), "2.3s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{millis}ms")
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
