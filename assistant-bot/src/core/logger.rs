//! Tracing setup for the bot process. One plain-text stream goes to stdout and to the log file
//! named by `LOG_FILE`, so the file can be tailed or grepped without ANSI noise.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::format::{FmtSpan, Writer},
    fmt::time::FormatTime,
    fmt::writer::MakeWriterExt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info";

/// Wall-clock stamp in the machine's zone, the same zone reminder times are typed in.
struct LocalStamp;

impl FormatTime for LocalStamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{} ", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Opens `path` for appending; a missing parent directory is created.
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber. Call once, after `.env` has been loaded so `RUST_LOG` is seen.
pub fn init_tracing(log_file_path: &str) -> anyhow::Result<()> {
    let file = Arc::new(open_log_file(log_file_path)?);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout.and(file))
        .event_format(
            tracing_subscriber::fmt::format()
                .with_timer(LocalStamp)
                .with_level(true)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with_span_events(FmtSpan::NONE)
        .with_ansi(false);

    Registry::default()
        .with(log_filter())
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing already initialized: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_file_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/logs/bot.log");
        let file = open_log_file(path.to_str().unwrap());
        assert!(file.is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_file_appends() {
        use std::io::{Read, Write};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.log");
        let path = path.to_str().unwrap();
        writeln!(open_log_file(path).unwrap(), "first").unwrap();
        writeln!(open_log_file(path).unwrap(), "second").unwrap();

        let mut contents = String::new();
        File::open(path).unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }
}
