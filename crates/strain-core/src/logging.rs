//! Logging configuration using tracing
//!
//! Every line is rendered as
//! `<component> | <level> | <timestamp> | <indent><message>`.
//!
//! The indent reflects two kinds of nesting combined into one depth:
//! - structural: how many `tracing` spans enclose the event
//! - logical: an explicit delta driven by [`IndentContext::increase`],
//!   [`IndentContext::decrease`] and the RAII [`IndentGuard`]
//!
//! The structural part is normalized by a baseline fixed when the
//! [`IndentContext`] is constructed.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{DefaultFields, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt as tfmt, prelude::*, EnvFilter};

use crate::error::{Error, Result};

/// Environment variable holding the log filter directive
pub const LOG_ENV_VAR: &str = "STRAIN_LOG";

/// Amount added to / removed from the delta by one indent call
pub const INDENT_STEP: i64 = 2;

/// Spaces rendered per unit of effective depth
pub const SPACES_PER_DEPTH: usize = 4;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug)]
struct IndentState {
    baseline: usize,
    delta: AtomicI64,
}

/// Shared indentation state for one logger
///
/// Cloning yields another handle onto the same state. The formatter reads it,
/// the code doing the logging mutates it.
#[derive(Debug, Clone)]
pub struct IndentContext {
    state: Arc<IndentState>,
}

impl Default for IndentContext {
    fn default() -> Self {
        Self::new(0)
    }
}

impl IndentContext {
    /// Create a context whose structural depth is measured relative to `baseline`
    pub fn new(baseline: usize) -> Self {
        Self {
            state: Arc::new(IndentState {
                baseline,
                delta: AtomicI64::new(0),
            }),
        }
    }

    pub fn baseline(&self) -> usize {
        self.state.baseline
    }

    pub fn delta(&self) -> i64 {
        self.state.delta.load(Ordering::Relaxed)
    }

    pub fn increase(&self) {
        self.state.delta.fetch_add(INDENT_STEP, Ordering::Relaxed);
    }

    /// No underflow guard: the delta may go negative.
    pub fn decrease(&self) {
        self.state.delta.fetch_sub(INDENT_STEP, Ordering::Relaxed);
    }

    /// Increase now, decrease when the returned guard is dropped
    pub fn scope(&self) -> IndentGuard {
        self.increase();
        IndentGuard { ctx: self.clone() }
    }

    /// Effective depth for an event enclosed by `structural` spans, clamped at zero
    pub fn depth_at(&self, structural: usize) -> usize {
        let depth = structural as i64 - self.state.baseline as i64 + self.delta();
        depth.max(0) as usize
    }

    /// Effective depth of an event at the baseline structural level
    pub fn depth(&self) -> usize {
        self.depth_at(self.state.baseline)
    }

    /// Leading whitespace for an event enclosed by `structural` spans
    pub fn prefix(&self, structural: usize) -> String {
        " ".repeat(self.depth_at(structural) * SPACES_PER_DEPTH)
    }
}

/// Restores the indent taken by [`IndentContext::scope`] on every exit path
#[must_use = "the indent is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct IndentGuard {
    ctx: IndentContext,
}

impl Drop for IndentGuard {
    fn drop(&mut self) {
        self.ctx.decrease();
    }
}

/// Level label in the fixed-width column
fn level_label(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "TRACE",
        Level::DEBUG => "DEBUG",
        Level::INFO => "INFO",
        Level::WARN => "WARNING",
        Level::ERROR => "ERROR",
    }
}

/// Event formatter producing the pipe-separated, indented line format
#[derive(Debug, Clone)]
pub struct IndentedFormat {
    component: String,
    indent: IndentContext,
}

impl IndentedFormat {
    pub fn new(component: impl Into<String>, indent: IndentContext) -> Self {
        Self {
            component: component.into(),
            indent,
        }
    }
}

impl<S, N> FormatEvent<S, N> for IndentedFormat
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
        let structural = ctx.event_scope().map(|scope| scope.count()).unwrap_or(0);
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();

        write!(
            writer,
            "{:<12} | {:<8} | {:<30} | {}",
            self.component,
            level_label(event.metadata().level()),
            timestamp,
            self.indent.prefix(structural),
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Build the fmt layer that renders events through [`IndentedFormat`] into `make_writer`
pub fn indented_layer<S, W>(
    component: impl Into<String>,
    indent: IndentContext,
    make_writer: W,
) -> tfmt::Layer<S, DefaultFields, IndentedFormat, W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    tfmt::layer()
        .with_ansi(false)
        .with_writer(make_writer)
        .event_format(IndentedFormat::new(component, indent))
}

/// Initialize the logging subsystem
///
/// Logs go to stderr. Log level is controlled by the `STRAIN_LOG` environment
/// variable and defaults to `info`.
///
/// # Examples
/// ```bash
/// STRAIN_LOG=debug strain
/// ```
pub fn init(component: &str, indent: IndentContext) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(indented_layer(component, indent, std::io::stderr))
        .try_init()
        .map_err(|e| Error::logging_init(e.to_string()))?;

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("disk-strain starting");
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}
