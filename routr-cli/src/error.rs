//! Error types emitted by the `routr` CLI.
//!
//! Keep this error type reasonably small: every CLI helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use routr_core::RoutingError;
use routr_data::routing::ContextError;
use routr_data::table::TableError;
use thiserror::Error;

/// Errors emitted by the `routr` CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation, or help was requested.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (pass <{field}> or set {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the input table failed.
    #[error("failed to open input table at {path:?}: {source}")]
    OpenSource {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The input table could not be parsed.
    #[error("failed to parse input table at {path:?}: {source}")]
    ReadSource {
        path: Utf8PathBuf,
        #[source]
        source: TableError,
    },
    /// The routing client could not be built from configuration.
    #[error(transparent)]
    BuildClient(#[from] ContextError),
    /// The batch aborted on a routing failure.
    #[error("distance computation aborted: {0}")]
    Routing(#[from] RoutingError),
    /// Creating the output file failed.
    #[error("failed to create output table at {path:?}: {source}")]
    CreateOutput {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Writing the output table failed.
    #[error(transparent)]
    WriteOutput(TableError),
}
