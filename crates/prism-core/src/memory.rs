//! System memory utilization probe.
//!
//! One diagnostic log line is emitted before each interpretation so memory
//! pressure shows up next to slow runs in the logs. The reading is
//! observability only: nothing gates on it.

/// Percentage of system memory currently in use, when the platform exposes it.
///
/// Linux reads `/proc/meminfo`; other platforms return `None`.
pub fn used_percent() -> Option<f32> {
    #[cfg(target_os = "linux")]
    {
        let contents = std::fs::read_to_string("/proc/meminfo").ok()?;
        parse_meminfo(&contents)
    }

    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

/// Log the current memory utilization at INFO, or note its absence at DEBUG.
pub fn log_usage() {
    match used_percent() {
        Some(percent) => tracing::info!("RAM memory % used: {percent:.1}"),
        None => tracing::debug!("Memory utilization not available on this platform"),
    }
}

/// Extract used-memory percentage from `/proc/meminfo` contents.
///
/// Used = MemTotal - MemAvailable. MemAvailable accounts for reclaimable
/// page cache, unlike MemFree.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_meminfo(contents: &str) -> Option<f32> {
    let mut total_kb: Option<u64> = None;
    let mut available_kb: Option<u64> = None;

    for line in contents.lines() {
        if line.starts_with("MemTotal:") {
            total_kb = line.split_whitespace().nth(1)?.parse().ok();
        } else if line.starts_with("MemAvailable:") {
            available_kb = line.split_whitespace().nth(1)?.parse().ok();
        }
        if total_kb.is_some() && available_kb.is_some() {
            break;
        }
    }

    let total = total_kb?;
    let available = available_kb?;
    if total == 0 {
        return None;
    }

    let used = total.saturating_sub(available);
    Some(used as f32 / total as f32 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "MemTotal:       16384000 kB\n\
                          MemFree:         1024000 kB\n\
                          MemAvailable:    4096000 kB\n\
                          Buffers:          512000 kB\n";

    #[test]
    fn parses_used_percentage() {
        let percent = parse_meminfo(SAMPLE).unwrap();
        assert!((percent - 75.0).abs() < 0.01, "got {percent}");
    }

    #[test]
    fn missing_available_yields_none() {
        assert!(parse_meminfo("MemTotal: 16384000 kB\n").is_none());
    }

    #[test]
    fn missing_total_yields_none() {
        assert!(parse_meminfo("MemAvailable: 4096000 kB\n").is_none());
    }

    #[test]
    fn zero_total_yields_none() {
        let contents = "MemTotal: 0 kB\nMemAvailable: 0 kB\n";
        assert!(parse_meminfo(contents).is_none());
    }

    #[test]
    fn garbage_yields_none() {
        assert!(parse_meminfo("not a meminfo file").is_none());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn live_reading_in_range() {
        let percent = used_percent().unwrap();
        assert!((0.0..=100.0).contains(&percent));
    }
}
