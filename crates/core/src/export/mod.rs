//! Transaction exports: preset ranges and CSV rendering.

mod csv_export;
mod export_model;


pub use csv_export::{export_file_name, write_csv, CSV_HEADER};
pub use export_model::{custom_range, QuickRange};
