use crate::utils::env::is_development;
use log::LevelFilter;
use tauri_plugin_log::{Target, TargetKind, TimezoneStrategy};

/// Build the log plugin used by the Tauri builder.
pub fn get_builder() -> tauri_plugin_log::Builder {
    let is_dev = is_development();
    let default_log_level = if is_dev {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = tauri_plugin_log::Builder::new()
        .timezone_strategy(TimezoneStrategy::UseLocal)
        .level(default_log_level)
        .format(|out, message, record| {
            let level_color = match record.level() {
                log::Level::Error => "\x1b[31;1m",
                log::Level::Warn => "\x1b[33m",
                log::Level::Info => "\x1b[32m",
                log::Level::Debug => "\x1b[34m",
                log::Level::Trace => "\x1b[36m",
            };
            let reset = "\x1b[0m";

            let file = record.file().unwrap_or("unknown");
            let line = record.line().unwrap_or(0);
            let target = record.target();

            // Format: 2026-01-12 10:30:45.123 INFO [scheduler.rs:88] [hublink] tick pushed 6 sensors
            out.finish(format_args!(
                "{} {}{} [{}:{}] [{}] {}{}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                level_color,
                record.level(),
                file,
                line,
                target,
                message,
                reset
            ))
        });

    if is_dev {
        // Development: log into the webview devtools console
        builder = builder.target(Target::new(TargetKind::Webview));
    } else {
        // Production: log file plus terminal
        builder = builder
            .target(Target::new(TargetKind::LogDir {
                file_name: Some("hublink.log".to_string()),
            }))
            .target(Target::new(TargetKind::Stdout));
    }

    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger() {
        let _builder = get_builder();
    }
}
