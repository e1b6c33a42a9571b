//! Presentation deck assembly and inspection

pub mod chart;
pub mod constants;
pub mod document;
pub mod package;
pub mod reader;
pub mod slide;
pub mod starter;
pub mod template;
pub mod workbook;

pub use chart::ChartData;
pub use document::ReportDocument;
pub use package::{Package, CONTENT_TYPES_PART};
pub use reader::{read_outline, ChartOutline, DeckOutline, SlideOutline};
pub use starter::starter_template;
pub use template::{LayoutPlaceholder, SlideLayout};
