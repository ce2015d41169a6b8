pub mod debounce;
pub mod engine;
pub mod pipeline;
pub mod preview;
pub mod stats;

pub use debounce::{Debouncer, INPUT_DEBOUNCE, PASTE_DELAY};
pub use engine::{HtmdEngine, MarkdownEngine, DELETED_TAGS};
pub use pipeline::{
    is_recordable, ConversionError, ConversionOutcome, ConversionPipeline,
    CONVERSION_FAILED_PLACEHOLDER,
};
pub use preview::{
    preview_blocks, render_html, InlineSpan, Preview, PreviewBlock, EMPTY_PREVIEW_MESSAGE,
};
pub use stats::TextStats;
