use crate::analysis::{AnalysisInput, AnalysisOutcome};
use crate::model::{Bucket, Classification, Coordinates};
use colored::Colorize;
use miette::{miette, Result};
use std::fmt::Write;

/// Explains how one dependency was classified in each variant and what advice followed
pub struct ReasonReporter<'a> {
    input: &'a AnalysisInput,
    outcome: &'a AnalysisOutcome,
}

impl<'a> ReasonReporter<'a> {
    pub fn new(input: &'a AnalysisInput, outcome: &'a AnalysisOutcome) -> Self {
        Self { input, outcome }
    }

    pub fn report(&self, identifier: &str) -> Result<()> {
        let text = self
            .render(identifier)
            .ok_or_else(|| miette!("No dependency with identifier '{}' in the input", identifier))?;
        print!("{}", text);
        Ok(())
    }

    /// `None` when no resolved dependency has this identifier
    pub fn render(&self, identifier: &str) -> Option<String> {
        let coordinates = self
            .input
            .dependencies
            .iter()
            .map(|dependency| &dependency.coordinates)
            .find(|coordinates| coordinates.identifier() == identifier)?;

        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} {}",
            "Reason for".bold(),
            coordinates.gav().cyan().bold()
        );
        let _ = writeln!(out);

        self.declarations(&mut out, identifier);
        self.advice(&mut out, coordinates);
        self.variants(&mut out, coordinates);
        Some(out)
    }

    fn declarations(&self, out: &mut String, identifier: &str) {
        let declared: Vec<&str> = self
            .input
            .locations
            .iter()
            .filter(|location| location.identifier == identifier)
            .map(|location| location.configuration_name.as_str())
            .collect();

        if declared.is_empty() {
            let _ = writeln!(out, "  Declared on: {}", "nothing".dimmed());
        } else {
            let _ = writeln!(out, "  Declared on: {}", declared.join(", "));
        }
    }

    fn advice(&self, out: &mut String, coordinates: &Coordinates) {
        let advice = &self.outcome.advice;
        let mut found = false;
        for item in advice
            .dependency_advice
            .iter()
            .chain(&advice.processor_advice)
            .filter(|item| &item.coordinates == coordinates)
        {
            let _ = writeln!(out, "  Advice: {}", item.to_string().yellow());
            found = true;
        }
        if !found {
            let _ = writeln!(out, "  Advice: {}", "none".green());
        }
        let _ = writeln!(out);
    }

    fn variants(&self, out: &mut String, coordinates: &Coordinates) {
        for report in &self.outcome.reports {
            let Some(variant) = self
                .input
                .variants
                .iter()
                .find(|variant| variant.project.variant() == report.variant)
            else {
                continue;
            };

            let verdict = match report.classification_of(coordinates) {
                Some(Classification::Used(bucket)) => describe(bucket).green(),
                Some(Classification::Unused) => "unused".red(),
                None => "not classified".dimmed(),
            };
            let _ = writeln!(out, "{} {}", format!("[{}]", report.variant).bold(), verdict);

            if let Some(trace) = report.trace_of(coordinates) {
                if !trace.reasons.is_empty() {
                    let reasons: Vec<&str> = trace.reasons.iter().map(|r| r.as_str()).collect();
                    let _ = writeln!(out, "  Evidence: {}", reasons.join(", "));
                }
            }

            let graph = &variant.graph;
            let parents: Vec<String> = graph
                .predecessors(coordinates)
                .into_iter()
                .map(|parent| parent.to_string())
                .collect();
            if !parents.is_empty() {
                let _ = writeln!(out, "  Required by: {}", parents.join(", "));
            }

            let transitive = graph.reachable_from(coordinates).len();
            if transitive > 0 {
                let _ = writeln!(out, "  Brings in {} transitive dependencies", transitive);
            }
        }
    }
}

fn describe(bucket: Bucket) -> String {
    format!("used as {}", bucket)
}
