//! Formatting utilities for sizes, durations, and build summaries.

use std::path::Path;
use std::time::Duration;

use bale_bundler::BuildOutput;
use console::style;

/// Format file size in human-readable format.
///
/// ```
/// use bale_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use bale_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print one line per written file, relative to `cwd`, then the total time.
pub fn print_build_summary(output: &BuildOutput, cwd: &Path, duration: Duration) {
    if super::is_quiet() {
        return;
    }
    let display = |path: &Path| {
        path.strip_prefix(cwd)
            .unwrap_or(path)
            .display()
            .to_string()
    };

    for bundle in &output.bundles {
        eprintln!(
            "  {} {} {}",
            style(display(&bundle.file)).cyan().for_stderr(),
            style(format!("({})", bundle.target.format)).dim().for_stderr(),
            format_size(bundle.code.len() as u64)
        );
        if let Some(map) = &bundle.map {
            let map_file = bundle.file.with_file_name(
                bundle
                    .target
                    .sourcemap_file()
                    .file_name()
                    .unwrap_or_default(),
            );
            eprintln!(
                "  {} {}",
                style(display(&map_file)).dim().for_stderr(),
                format_size(map.len() as u64)
            );
        }
        for asset in &bundle.assets {
            eprintln!(
                "  {} {}",
                style(display(&bundle.dir().join(&asset.file_name))).cyan().for_stderr(),
                format_size(asset.source.len() as u64)
            );
        }
    }

    eprintln!(
        "{}",
        style(format!("Done in {}", format_duration(duration)))
            .dim()
            .for_stderr()
    );
}
