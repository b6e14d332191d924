use crate::model::Coordinates;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors raised by the analysis engine.
///
/// Everything except `Io` and `Json` is an internal consistency failure: an
/// upstream extraction stage produced facts that contradict each other. These
/// abort the whole analysis rather than degrade it.
#[derive(Error, Diagnostic, Debug)]
pub enum AnalysisError {
    #[error("classpath entry {0} has no synthesized dependency record")]
    #[diagnostic(
        code(depadvisor::missing_dependency),
        help("every node on the variant classpath needs an artifact and capability record")
    )]
    MissingDependency(Coordinates),

    #[error("Android lint jar {0} must declare a lint registry")]
    #[diagnostic(code(depadvisor::lint_registry))]
    LintJarWithoutRegistry(String),

    #[error("no backing artifact recorded for {0}")]
    #[diagnostic(code(depadvisor::missing_artifact))]
    MissingArtifact(Coordinates),

    #[error("no relative path recorded for class {0}")]
    #[diagnostic(code(depadvisor::missing_relative_path))]
    MissingRelativePath(String),

    #[error("not a coordinates file name: {0}")]
    #[diagnostic(code(depadvisor::invalid_file_name))]
    InvalidFileName(String),

    #[error("failed to read {}", path.display())]
    #[diagnostic(code(depadvisor::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    #[diagnostic(code(depadvisor::json))]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
