use std::{
    io::{IsTerminal, Write},
    time::Duration,
};

use formula_core::Error;
use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

pub(crate) fn print_parsing(text: &str) {
    print_colourful_prefix("Parsing", Color::Magenta, text)
}

pub(crate) fn print_reading(text: &str) {
    print_colourful_prefix("Reading", Color::Magenta, text)
}

pub(crate) fn print_parsed(duration: Duration) {
    print_colourful_prefix("Parsed", Color::Green, &format!("in {}", seconds(duration)))
}

pub(crate) fn print_evaluated(duration: Duration) {
    print_colourful_prefix("Evaluated", Color::Green, &format!("in {}", seconds(duration)))
}

pub fn seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_millis() as f32 / 1000.)
}

pub fn print_colourful_prefix(prefix: &str, color: Color, text: &str) {
    // Write errors are dropped.
    let _ = write_colourful_prefix(prefix, color, text);
}

fn write_colourful_prefix(prefix: &str, color: Color, text: &str) -> std::io::Result<()> {
    let buffer_writer = stderr_buffer_writer();
    let mut buffer = buffer_writer.buffer();
    buffer.set_color(
        ColorSpec::new()
            .set_intense(true)
            .set_bold(true)
            .set_fg(Some(color)),
    )?;
    write!(buffer, "{prefix: >11}")?;
    buffer.set_color(&ColorSpec::new())?;
    writeln!(buffer, " {text}")?;
    buffer_writer.print(&buffer)
}

/// Renders `err` with source snippets to stderr.
pub fn print_error(err: &Error) {
    let buffer_writer = stderr_buffer_writer();
    let mut buffer = buffer_writer.buffer();

    let written = err.pretty(&mut buffer)
        .and_then(|()| buffer_writer.print(&buffer));

    if written.is_err() {
        eprintln!("{err}");
    }
}

pub fn stderr_buffer_writer() -> BufferWriter {
    BufferWriter::stderr(color_choice())
}

fn colour_forced() -> bool {
    if let Ok(force) = std::env::var("FORCE_COLOR") {
        !force.is_empty()
    } else {
        false
    }
}

fn color_choice() -> ColorChoice {
    if colour_forced() {
        ColorChoice::Always
    } else if std::io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Reads one line after printing `prompt`; `None` once stdin is closed.
pub fn read_line(prompt: &str) -> std::io::Result<Option<String>> {
    let mut input = String::new();

    print!("{prompt}");
    std::io::stdout().flush()?;

    if std::io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }

    if let Some('\n') = input.chars().next_back() {
        input.pop();
    }
    if let Some('\r') = input.chars().next_back() {
        input.pop();
    }

    Ok(Some(input))
}

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let colour = match record.level() {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug => Color::Cyan,
            Level::Trace => Color::Blue,
        };

        let prefix = record.level().as_str().to_lowercase();

        print_colourful_prefix(&prefix, colour, &format!("{}", record.args()));
    }

    fn flush(&self) {}
}

static LOGGER: OnceCell<StderrLogger> = OnceCell::new();

/// `-v` shows info, `-vv` debug, `-vvv` trace; warnings are always shown.
pub fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let logger = LOGGER.get_or_init(|| StderrLogger { level });

    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}
