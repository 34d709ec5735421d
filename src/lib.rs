// Library surface for the binary, headless runs and integration tests.
pub mod app;
pub mod app_dirs;
pub mod category;
pub mod classify;
pub mod config;
pub mod logging;
pub mod parser;
pub mod record;
pub mod report;
pub mod rules;
pub mod runtime;
pub mod thresholds;
pub mod ui;

pub use category::Category;
pub use classify::{classify, Classification, Dashboard, Status};
pub use parser::{parse, ParseError};
pub use record::{Record, Tier};
pub use thresholds::ThresholdTable;
