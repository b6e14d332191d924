mod json;
mod reason;
mod terminal;

pub use json::JsonReporter;
pub use reason::ReasonReporter;
pub use terminal::TerminalReporter;

use crate::model::ProjectAdvice;
use miette::Result;
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

impl ReportFormat {
    /// Parse the `report.format` value of a config file
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "terminal" => Some(ReportFormat::Terminal),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Reporter for outputting dependency advice
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
        }
    }

    pub fn report(&self, advice: &ProjectAdvice) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => TerminalReporter::new().report(advice),
            ReportFormat::Json => JsonReporter::new(self.output_path.clone()).report(advice),
        }
    }
}
