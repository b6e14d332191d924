mod loader;

pub use loader::{glob_match, Config, ReportConfig};
