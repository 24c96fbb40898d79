// Document rendering: canonical model → target-independent tree → HTML / PDF.
// Tree building, styling, pagination and HTML are pure; only the converter does I/O.

pub mod converter;
pub mod handlers;
pub mod html;
pub mod pagination;
pub mod renderer;
pub mod styles;
pub mod tree;

pub use converter::{BoundedConverter, DocumentConverter, HttpDocumentConverter, UnconfiguredConverter};
