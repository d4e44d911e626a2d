// File I/O: order CSV import, result CSV export, styled Mandae workbooks

pub mod csv;
pub mod error;
pub mod export;
pub mod headers;
pub mod layout;
pub mod mandae;
pub mod xlsx;

pub use error::{Error, ExportError, InputError};
pub use export::{export_mandae, Artifact};
