//! Page model: parsed document access and metadata gathering.
//!
//! ```text
//! page/
//! ├── document   # Document / ElementRef over a tl parse
//! └── meta       # ShareParams + gather_params
//! ```

mod document;
mod meta;

pub use document::{Document, ElementRef, PageError};
pub use meta::{ShareParams, gather_params};
