//! CSV table access: the header record through `csv`, the rows through Polars.

mod header;
mod reader;

pub use header::{read_header_record, rewrite_header_record};
pub use reader::read_csv_frame;
