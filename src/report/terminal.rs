use crate::model::{Advice, ProjectAdvice};
use colored::Colorize;
use miette::Result;
use std::fmt::Write;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// Mark advice that narrows an api-like declaration
    show_downgrades: bool,
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            show_downgrades: true,
        }
    }

    pub fn with_downgrades(mut self, show: bool) -> Self {
        self.show_downgrades = show;
        self
    }

    pub fn report(&self, advice: &ProjectAdvice) -> Result<()> {
        print!("{}", self.render(advice));
        Ok(())
    }

    pub fn render(&self, advice: &ProjectAdvice) -> String {
        let mut out = String::new();

        if advice.is_empty() {
            let message = "No dependency advice. Declarations look right!";
            let _ = writeln!(out, "{}", message.green().bold());
            return out;
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            format!("Found {} pieces of dependency advice:", advice.len())
                .yellow()
                .bold()
        );
        let _ = writeln!(out);

        let dependency_advice = &advice.dependency_advice;
        self.section(
            &mut out,
            "Unused dependencies which should be removed:",
            dependency_advice.iter().filter(|a| a.is_remove()),
        );
        self.section(
            &mut out,
            "Transitively used dependencies that should be declared directly:",
            dependency_advice.iter().filter(|a| a.is_add()),
        );
        self.section(
            &mut out,
            "Existing dependencies which should be modified to be as indicated:",
            dependency_advice.iter().filter(|a| a.is_change()),
        );
        self.section(
            &mut out,
            "Dependencies which could be compile-only:",
            dependency_advice.iter().filter(|a| a.is_compile_only()),
        );
        self.section(
            &mut out,
            "Unused annotation processors that should be removed:",
            advice.processor_advice.iter(),
        );

        self.summary(&mut out, advice);
        out
    }

    fn section<'a>(
        &self,
        out: &mut String,
        title: &str,
        items: impl Iterator<Item = &'a Advice>,
    ) {
        let items: Vec<_> = items.collect();
        if items.is_empty() {
            return;
        }

        let _ = writeln!(out, "{}", title.cyan().bold());
        for advice in items {
            self.item(out, advice);
        }
        let _ = writeln!(out);
    }

    fn item(&self, out: &mut String, advice: &Advice) {
        let line = match (&advice.from_configuration, &advice.to_configuration) {
            (Some(from), Some(to)) => format!(
                "{}(\"{}\") {}",
                to.green(),
                advice.coordinates.gav(),
                format!("(was {})", from).dimmed()
            ),
            (Some(from), None) => format!("{}(\"{}\")", from.red(), advice.coordinates.gav()),
            (None, Some(to)) => format!("{}(\"{}\")", to.green(), advice.coordinates.gav()),
            (None, None) => advice.coordinates.gav(),
        };

        let badge = if self.show_downgrades && advice.is_downgrade() {
            format!(" {}", "[downgrade]".yellow().bold())
        } else {
            String::new()
        };

        let _ = writeln!(out, "  {}{}", line, badge);
    }

    fn summary(&self, out: &mut String, advice: &ProjectAdvice) {
        let all = &advice.dependency_advice;
        let count = |f: fn(&Advice) -> bool| all.iter().filter(|a| f(a)).count();

        let _ = writeln!(out, "{}", "Summary:".bold());
        let _ = writeln!(
            out,
            "  {} remove, {} add, {} change, {} compile-only, {} processors",
            count(Advice::is_remove).to_string().red(),
            count(Advice::is_add).to_string().green(),
            count(Advice::is_change).to_string().yellow(),
            count(Advice::is_compile_only).to_string().blue(),
            advice.processor_advice.len().to_string().magenta()
        );

        let downgrades = count(Advice::is_downgrade);
        if downgrades > 0 {
            let _ = writeln!(
                out,
                "  {}",
                format!("{} may break consumers of this module's API", downgrades).yellow()
            );
        }
    }
}
