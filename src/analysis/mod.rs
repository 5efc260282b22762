//! Analysis text handling.

pub mod segmenter;

pub use segmenter::{segment, ParsedAnalysisSections, Section};
