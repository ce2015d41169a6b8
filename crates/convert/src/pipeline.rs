use std::io;
use std::panic::{self, AssertUnwindSafe};

use markdownizr_settings::{now_ms, HistoryStore};
use thiserror::Error;
use tracing::{debug, error};

use crate::engine::{HtmdEngine, MarkdownEngine};

/// Text shown in place of the output when a conversion fails.
pub const CONVERSION_FAILED_PLACEHOLDER: &str =
    "Error converting HTML to Markdown. Please check your input.";

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("conversion engine failed: {0}")]
    Engine(#[from] io::Error),
    #[error("conversion engine panicked: {0}")]
    Panicked(String),
}

/// Result of a conversion run that feeds the output surface.
#[derive(Debug)]
pub struct ConversionOutcome {
    /// Text for the output surface; the placeholder when the conversion failed.
    pub output: String,
    /// Whether a history entry was appended.
    pub recorded: bool,
    pub error: Option<ConversionError>,
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Only conversions with visible input and output go to history.
pub fn is_recordable(source: &str, result: &str) -> bool {
    !source.trim().is_empty() && !result.trim().is_empty()
}

pub struct ConversionPipeline<E = HtmdEngine> {
    engine: E,
}

impl Default for ConversionPipeline<HtmdEngine> {
    fn default() -> Self {
        Self::new(HtmdEngine::default())
    }
}

impl<E: MarkdownEngine> ConversionPipeline<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Converts markup to Markdown. Engine errors and panics are contained.
    pub fn convert(&self, source: &str) -> Result<String, ConversionError> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.engine.html_to_markdown(source))) {
            Ok(result) => Ok(result?),
            Err(payload) => Err(ConversionError::Panicked(panic_message(payload.as_ref()))),
        }
    }

    /// Converts and records the result in `history` when it is worth keeping.
    pub fn run(&self, source: &str, history: &mut HistoryStore) -> ConversionOutcome {
        self.run_at(source, history, now_ms())
    }

    pub fn run_at(&self, source: &str, history: &mut HistoryStore, now: i64) -> ConversionOutcome {
        match self.convert(source) {
            Ok(markdown) => {
                let recorded = is_recordable(source, &markdown);
                if recorded {
                    history.append(source, &markdown, now);
                } else {
                    debug!("Skipping history for empty conversion");
                }
                ConversionOutcome {
                    output: markdown,
                    recorded,
                    error: None,
                }
            }
            Err(err) => {
                error!("Conversion error: {err}");
                ConversionOutcome {
                    output: CONVERSION_FAILED_PLACEHOLDER.to_string(),
                    recorded: false,
                    error: Some(err),
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
