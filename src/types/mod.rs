//! Data types for the in-memory workbook model.

mod cell;
mod style;
mod table;
mod workbook;

pub use cell::*;
pub use style::*;
pub use table::*;
pub use workbook::*;
