use std::fmt::Result as FmtResult;

use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    fmt::{
        FmtContext, FormattedFields,
        format::{FormatEvent, FormatFields, Writer},
    },
    registry::LookupSpan,
};

const TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]");

#[derive(Clone, Copy)]
struct Palette {
    reset: &'static str,
    bold: &'static str,
    dim: &'static str,
    ansi: bool,
}

impl Palette {
    fn new(ansi: bool) -> Self {
        if ansi {
            Self {
                reset: "\x1b[0m",
                bold: "\x1b[1m",
                dim: "\x1b[2m",
                ansi,
            }
        } else {
            Self {
                reset: "",
                bold: "",
                dim: "",
                ansi,
            }
        }
    }

    fn level(&self, level: &Level) -> &'static str {
        if !self.ansi {
            return "";
        }
        match *level {
            Level::ERROR => "\x1b[31m",
            Level::WARN => "\x1b[33m",
            Level::INFO => "\x1b[32m",
            Level::DEBUG => "\x1b[34m",
            Level::TRACE => "\x1b[35m",
        }
    }
}

/// `[timestamp] LEVEL target:line span{fields}: > message`
///
/// Spans are the ones opened by the HTTP trace layer, so every line logged
/// while serving a request carries its method and URI.
pub struct GatewayFormatter {
    palette: Palette,
}

impl GatewayFormatter {
    pub fn new(use_ansi: bool) -> Self {
        Self {
            palette: Palette::new(use_ansi),
        }
    }
}

impl<S, N> FormatEvent<S, N> for GatewayFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> FmtResult {
        let Palette {
            reset, bold, dim, ..
        } = self.palette;
        let meta = event.metadata();

        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let timestamp = now.format(TIMESTAMP).unwrap_or_else(|_| "-".into());
        write!(writer, "{dim}[{timestamp}]{reset} ")?;

        write!(
            writer,
            "{}{bold}{:<5}{reset} ",
            self.palette.level(meta.level()),
            meta.level().as_str()
        )?;

        match meta.line() {
            Some(line) => write!(writer, "{dim}{}:{line}{reset} ", meta.target())?,
            None => write!(writer, "{dim}{}{reset} ", meta.target())?,
        }

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}", span.name())?;
                if let Some(fields) = span.extensions().get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{}}}", fields)?;
                    }
                }
                write!(writer, ": ")?;
            }
        }

        write!(writer, "> ")?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer, "{reset}")
    }
}
