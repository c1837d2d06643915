//! Report rendering

mod pdf;

pub use pdf::{PdfLayout, PdfReportComposer};
