//! Core engine: orchestrates snapshot building + classification + reporting.

mod analyze;
mod render;

pub use analyze::{run_analysis, AnalysisPlan, AnalyzeError, BatchRun};
pub use render::{render_json_for_receipt, render_markdown_for_receipt};
