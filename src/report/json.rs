use crate::model::{Advice, ProjectAdvice};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, advice: &ProjectAdvice) -> Result<()> {
        let report = JsonReport::from_advice(advice);
        let json = serde_json::to_string_pretty(&report).into_diagnostic()?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    advice: &'a ProjectAdvice,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    remove: usize,
    add: usize,
    change: usize,
    compile_only: usize,
    processors: usize,
    downgrades: usize,
}

impl<'a> JsonReport<'a> {
    fn from_advice(advice: &'a ProjectAdvice) -> Self {
        let all = &advice.dependency_advice;
        let count = |f: fn(&Advice) -> bool| all.iter().filter(|a| f(a)).count();

        Self {
            version: env!("CARGO_PKG_VERSION"),
            advice,
            summary: JsonSummary {
                total: advice.len(),
                remove: count(Advice::is_remove),
                add: count(Advice::is_add),
                change: count(Advice::is_change),
                compile_only: count(Advice::is_compile_only),
                processors: advice.processor_advice.len(),
                downgrades: count(Advice::is_downgrade),
            },
        }
    }
}
