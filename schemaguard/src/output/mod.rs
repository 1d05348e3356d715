//! Human-readable output: report formatting and a serialized sink.

mod reporter;
mod writer;

pub use reporter::{Palette, Reporter, GLYPH_CHECK, GLYPH_CROSS, GLYPH_QUESTION};
pub use writer::LockedWriter;
