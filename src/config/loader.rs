use crate::analysis::AdvicePolicy;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a depadvisor run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Identifier patterns that never receive advice (e.g. `com.google.dagger:*`)
    pub ignore: Vec<String>,

    /// Only analyze these variants; empty means all of them
    pub variants: Vec<String>,

    /// Advice policy knobs
    pub advice: AdvicePolicy,

    /// Report configuration
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: terminal, json
    pub format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "terminal".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(root: &Path) -> Result<Self> {
        let default_names = [
            ".depadvisor.yml",
            ".depadvisor.yaml",
            ".depadvisor.toml",
            "depadvisor.yml",
            "depadvisor.yaml",
            "depadvisor.toml",
        ];

        for name in &default_names {
            let path = root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    /// Check if advice about a dependency should be suppressed
    pub fn should_ignore(&self, identifier: &str) -> bool {
        self.ignore.iter().any(|pattern| glob_match(pattern, identifier))
    }

    /// Check if a variant is selected for analysis
    pub fn includes_variant(&self, variant: &str) -> bool {
        self.variants.is_empty() || self.variants.iter().any(|v| v == variant)
    }
}

/// Simple glob matching where `*` matches any run of characters,
/// e.g. `com.google.*`, `*:annotations` or `*dagger*`
pub fn glob_match(pattern: &str, text: &str) -> bool {
    if !pattern.contains('*') {
        return text == pattern;
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let (first, rest) = match parts.split_first() {
        Some(split) => split,
        None => return false,
    };
    let Some(mut remaining) = text.strip_prefix(first) else {
        return false;
    };

    // Every part but the last may float; the last must anchor at the end
    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return true,
    };
    for part in middle {
        match remaining.find(part) {
            Some(idx) => remaining = &remaining[idx + part.len()..],
            None => return false,
        }
    }
    remaining.ends_with(last)
}
