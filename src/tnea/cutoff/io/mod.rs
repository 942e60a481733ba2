pub mod csv_write;
pub mod document;
pub mod excel_write;
pub mod fetch;
