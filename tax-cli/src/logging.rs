//! Console and file logging.
//!
//! The console layer writes to stderr so reports on stdout stay clean. The
//! file layer always records `debug` and is inert until
//! [`enable_file_logging`] points it at a file.

use anyhow::{Context, Result, bail};
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Level recorded in the log file regardless of console verbosity.
pub const FILE_LOG_LEVEL: &str = "debug";

// --- Formatter ---

const DIM: &str = "2";
const CYAN: &str = "36";

fn level_color(level: Level) -> &'static str {
    match level {
        Level::ERROR => "1;31",
        Level::WARN => "1;33",
        Level::INFO => "1;32",
        Level::DEBUG => "1;34",
        Level::TRACE => "1;35",
    }
}

/// Writes `text` wrapped in an SGR sequence when `ansi` is on.
fn paint(
    writer: &mut Writer<'_>,
    ansi: bool,
    sgr: &str,
    text: impl std::fmt::Display,
) -> std::fmt::Result {
    if ansi {
        write!(writer, "\x1b[{sgr}m{text}\x1b[0m ")
    } else {
        write!(writer, "{text} ")
    }
}

/// `<local timestamp> <LEVEL> [target] <file:line> <fields>`
///
/// The target is only written to uncolored sinks (the log file).
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();
        let level = *meta.level();

        paint(&mut writer, ansi, DIM, Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        paint(&mut writer, ansi, level_color(level), format_args!("{level:>5}"))?;
        if !ansi {
            write!(writer, "{} ", meta.target())?;
        }

        let location = meta
            .file()
            .zip(meta.line())
            .map(|(file, line)| (file.trim_start_matches("src/").trim_start_matches("src\\"), line));
        if let Some((file, line)) = location {
            paint(&mut writer, ansi, CYAN, format_args!("{file}:{line}"))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Late-bound file writer ---

type Slot = Arc<Mutex<Option<File>>>;

/// Log file target that can be swapped after the subscriber is installed.
/// Records are dropped while the slot is empty.
#[derive(Clone)]
struct FileSlot(Slot);

struct SlotWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for SlotWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        self.0.as_mut().map_or(Ok(buf.len()), |file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.as_mut().map_or(Ok(()), |file| file.flush())
    }
}

impl<'a> MakeWriter<'a> for FileSlot {
    type Writer = SlotWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SlotWriter(self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

static FILE_SLOT: OnceLock<Slot> = OnceLock::new();

/// Console filter: `RUST_LOG` wins, otherwise `default_level`.
fn console_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

// --- Public API ---

/// Initializes logging. Call once at startup.
///
/// - Console: stderr, colored when attached to a terminal, filtered at
///   `console_level` unless `RUST_LOG` is set.
/// - File: records at [`FILE_LOG_LEVEL`] once [`enable_file_logging`] is called.
///
/// Calling it again is a no-op.
pub fn init_logging(console_level: &str) {
    let slot: Slot = Arc::default();
    if FILE_SLOT.set(slot.clone()).is_err() {
        return;
    }

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(console_filter(console_level));

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(false)
        .with_writer(FileSlot(slot))
        .with_filter(EnvFilter::new(FILE_LOG_LEVEL));

    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Starts appending log records to `path`, replacing any open log file.
///
/// # Errors
///
/// Fails if the file cannot be opened or logging was never initialized.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let Some(slot) = FILE_SLOT.get() else {
        bail!("logging not yet initialized");
    };
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;

    *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(file);
    Ok(())
}
