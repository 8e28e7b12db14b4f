pub mod backup;
pub mod json;
pub mod sheets;

pub use backup::write_csv_backup;
pub use json::JsonFileSink;
pub use sheets::{GoogleSheetsClient, SheetsApi, SheetsConfig, SheetsSink};
