//! Text rendering of telemetry snapshots

use chrono::Local;
use nexus_core::format;
use nexus_core::telemetry::{Metric, RawStats, TelemetrySnapshot};
use nexus_core::theme::Theme;

/// One status line per render tick. A '~' prefix marks a synthesized
/// placeholder value; a failed fetch shows as a trailing banner under
/// the (possibly stale) metrics rather than replacing them.
pub fn status_line(snapshot: &TelemetrySnapshot, theme: Theme) {
    let clock = Local::now().format("%H:%M:%S");

    println!(
        "[{clock}] [{theme}] {} {} {} {} {} | mem {}",
        gauge("cpu", snapshot.cpu_usage),
        gauge("mem", snapshot.memory_usage),
        gauge("net", snapshot.network_status),
        gauge("sys", snapshot.system_status),
        gauge("sec", snapshot.security_level),
        format::memory_detail(snapshot.raw.as_ref()),
    );

    if let Some(error) = &snapshot.error {
        println!("  ! {error} (showing last known values)");
    }
}

fn gauge(label: &str, metric: Metric) -> String {
    let marker = if metric.is_synthesized() { "~" } else { "" };
    format!("{label}:{marker}{:.0}%", metric.value())
}

/// Expanded memory view for the `m` command, one line per figure
pub fn memory_tab(raw: Option<&RawStats>) -> Vec<String> {
    let Some(memory) = raw.and_then(|r| r.memory.as_ref()) else {
        return vec!["  no memory sample yet".to_string()];
    };

    let mut lines = Vec::new();
    for (label, bytes) in [
        ("total", memory.total),
        ("used", memory.used),
        ("free", memory.free),
    ] {
        if let Some(bytes) = bytes {
            lines.push(format!(
                "  {label:>5}: {} GB ({} MB)",
                format::format_gb(bytes),
                format::format_mb(bytes),
            ));
        }
    }
    if let Some(usage) = memory.usage {
        lines.push(format!("  usage: {usage:.2}%"));
    }
    if lines.is_empty() {
        lines.push("  no memory sample yet".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_marks_synthesized_values() {
        assert_eq!(gauge("cpu", Metric::Measured(42.4)), "cpu:42%");
        assert_eq!(gauge("mem", Metric::Synthesized(75.0)), "mem:~75%");
    }

    #[test]
    fn test_memory_tab_lines() {
        use nexus_core::telemetry::MemoryStats;

        const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
        let raw = RawStats {
            memory: Some(MemoryStats {
                usage: Some(51.5),
                total: Some(24.0 * GIB),
                free: Some(11.6 * GIB),
                used: Some(12.4 * GIB),
            }),
            ..Default::default()
        };

        let lines = memory_tab(Some(&raw));
        assert_eq!(
            lines,
            vec![
                "  total: 24.00 GB (24576.00 MB)",
                "   used: 12.40 GB (12697.60 MB)",
                "   free: 11.60 GB (11878.40 MB)",
                "  usage: 51.50%",
            ]
        );
    }

    #[test]
    fn test_memory_tab_without_sample() {
        assert_eq!(memory_tab(None), vec!["  no memory sample yet"]);

        let raw = RawStats::default();
        assert_eq!(memory_tab(Some(&raw)), vec!["  no memory sample yet"]);
    }
}
