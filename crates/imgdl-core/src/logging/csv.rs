//! Semicolon-separated log records for the log file.

use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// One record per line: `time;target;file;line;level;"message"`.
///
/// The message (including any structured fields) is always quoted, with
/// embedded double quotes doubled.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormat;

impl<S, N> FormatEvent<S, N> for CsvFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        SystemTime.format_time(&mut writer)?;
        write!(
            writer,
            ";{};{};{};{};",
            meta.target(),
            meta.file().unwrap_or("-"),
            meta.line().unwrap_or(0),
            meta.level()
        )?;
        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;
        writeln!(writer, "\"{}\"", quote_escape(&message))
    }
}

fn quote_escape(s: &str) -> String {
    s.replace('"', "\"\"")
}
