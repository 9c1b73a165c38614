//! Data module - file loading and table cleaning

mod duplicates;
mod loader;
mod missing;
mod values;

pub use duplicates::{DuplicateCount, DuplicateHandler};
pub use loader::{DataLoader, FileFormat, LoadOptions, LoaderError, UploadedFile};
pub use missing::{MissingReport, MissingValueHandler};
pub use values::{cell_label, is_numeric_dtype, is_text_dtype, value_counts, ValueCount};
