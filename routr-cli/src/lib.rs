//! Command-line interface for batch road-distance computation.
#![forbid(unsafe_code)]

use std::io::{BufReader, BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{MergeComposer, OrthoConfig, SubcmdConfigMerge, sanitize_value};
use routr_core::{BatchPipeline, FixedDelay, InputRow, OutputRow, RoutingClient, Throttle};
use routr_data::routing::{ClientSettings, ExecutionContext};
use routr_data::table::{read_rows, write_rows};
use serde::{Deserialize, Serialize};

mod environment;
mod error;
mod fs;

pub use error::CliError;

const ARG_SOURCE: &str = "source";
const ARG_OUTPUT: &str = "output";
const ARG_URLBASE: &str = "urlbase";
const ARG_APIKEY: &str = "apikey";
const ARG_ENGINE: &str = "engine";
const ENV_SOURCE: &str = "ROUTE_SOURCE";
const SETTING_KEYS: [&str; 3] = [ARG_URLBASE, ARG_APIKEY, ARG_ENGINE];

/// Run the `routr` CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, the
/// input table cannot be read, the batch aborts, or the output cannot be
/// written.
pub fn run() -> Result<(), CliError> {
    let args = ComputeArgs::try_parse().map_err(CliError::ArgumentParsing)?;
    let config = resolve_compute_config(args)?;
    run_compute(&config)
}

/// CLI arguments for distance computation.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "routr",
    about = "Compute road distances between origin and destination pairs",
    long_about = "Read a CSV table of origin/destination coordinates, query \
                  an OSRM-compatible routing service for the car route \
                  between each pair, and write the distances as CSV. The \
                  service location can come from CLI flags, configuration \
                  files, or ROUTE_* environment variables.",
    version
)]
#[ortho_config(prefix = "ROUTE")]
pub(crate) struct ComputeArgs {
    /// CSV file with origin_long, origin_lat, dest_long and dest_lat columns.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) source: Option<Utf8PathBuf>,
    /// Write the result table here instead of standard output.
    #[arg(short = 'o', long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Base URL of the routing service (e.g. "http://localhost:5000").
    #[arg(long = ARG_URLBASE, value_name = "url")]
    #[serde(default)]
    pub(crate) urlbase: Option<String>,
    /// API key for the routing service.
    #[arg(long = ARG_APIKEY, value_name = "key")]
    #[serde(default)]
    pub(crate) apikey: Option<String>,
    /// Routing engine identifier; defaults to OSRM.
    #[arg(long = ARG_ENGINE, value_name = "name")]
    #[serde(default)]
    pub(crate) engine: Option<String>,
}

impl ComputeArgs {
    /// Resolve against configuration files and the process environment.
    ///
    /// Precedence, highest first: CLI, `ROUTE_` variables, files.
    fn into_config(self) -> Result<ComputeConfig, CliError> {
        let files = self.load_and_merge().map_err(CliError::Configuration)?;
        ComputeConfig::from_sources(&files, environment::process_settings(), &self)
    }

    /// Settings given by this layer, as factory key-value pairs.
    fn setting_pairs(&self) -> Vec<(String, String)> {
        let values = [&self.urlbase, &self.apikey, &self.engine];
        SETTING_KEYS
            .into_iter()
            .zip(values)
            .filter_map(|(key, value)| value.clone().map(|present| (key.to_owned(), present)))
            .collect()
    }
}

/// Resolved compute configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ComputeConfig {
    /// Input table.
    pub(crate) source: Utf8PathBuf,
    /// Output table; standard output when absent.
    pub(crate) output: Option<Utf8PathBuf>,
    /// Settings handed to the client factory.
    pub(crate) settings: ClientSettings,
}

impl ComputeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        let path = &self.source;
        match fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field: ARG_SOURCE,
                path: path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field: ARG_SOURCE,
                    path: path.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_SOURCE,
                path: path.clone(),
                source,
            }),
        }
    }

    /// Layer `cli` over `env` over `files`.
    ///
    /// `env` holds normalised `ROUTE_` pairs. Besides the argument fields it
    /// may carry engine-namespaced keys (`osrm.urlbase`) and the
    /// `service`/`profile`/`version` settings, which reach the client
    /// factory directly. A namespaced key beats the plain keys of files and
    /// the environment but not an explicit CLI flag.
    pub(crate) fn from_sources(
        files: &ComputeArgs,
        env: Vec<(String, String)>,
        cli: &ComputeArgs,
    ) -> Result<Self, CliError> {
        let mut composer = MergeComposer::new();
        composer.push_file(sanitize_value(files)?, None);
        composer.push_environment(environment::args_layer(&env));
        composer.push_cli(sanitize_value(cli)?);
        let merged = ComputeArgs::merge_from_layers(composer.layers())?;

        let cli_pairs = cli.setting_pairs();
        let mut pairs = env;
        pairs.extend(merged.setting_pairs());
        pairs.extend(cli_pairs.iter().cloned());
        let mut settings = ClientSettings::from_pairs(pairs);
        if !cli_pairs.is_empty() {
            // Namespaced keys were promoted over the plain ones; restore flags.
            let flags = ClientSettings::from_pairs(cli_pairs);
            settings.urlbase = flags.urlbase.or(settings.urlbase);
            settings.apikey = flags.apikey.or(settings.apikey);
            settings.engine = flags.engine.or(settings.engine);
        }
        Self::with_settings(merged, settings)
    }

    fn with_settings(args: ComputeArgs, settings: ClientSettings) -> Result<Self, CliError> {
        let source = args.source.ok_or(CliError::MissingArgument {
            field: ARG_SOURCE,
            env: ENV_SOURCE,
        })?;
        Ok(Self {
            source,
            output: args.output,
            settings,
        })
    }
}

impl TryFrom<ComputeArgs> for ComputeConfig {
    type Error = CliError;

    fn try_from(args: ComputeArgs) -> Result<Self, Self::Error> {
        let settings = ClientSettings::from_pairs(args.setting_pairs());
        Self::with_settings(args, settings)
    }
}

fn resolve_compute_config(args: ComputeArgs) -> Result<ComputeConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn run_compute(config: &ComputeConfig) -> Result<(), CliError> {
    let context = ExecutionContext::new(config.settings.clone());
    let client = context.client()?;
    let table = execute_compute(&config.source, client, FixedDelay::default())?;
    match &config.output {
        Some(path) => {
            let file = fs::create_utf8_file(path).map_err(|source| CliError::CreateOutput {
                path: path.clone(),
                source,
            })?;
            write_table(BufWriter::new(file), &table)?;
            info!("wrote {} row(s) to {path}", table.len());
        }
        None => write_table(std::io::stdout().lock(), &table)?,
    }
    Ok(())
}

/// Read `source`, compute every distance and return the output rows.
pub(crate) fn execute_compute<C, T>(
    source: &Utf8Path,
    client: &C,
    throttle: T,
) -> Result<Vec<OutputRow>, CliError>
where
    C: RoutingClient,
    T: Throttle,
{
    let rows = load_rows(source)?;
    info!("loaded {} row(s) from {source}", rows.len());
    let table = BatchPipeline::new(client).with_throttle(throttle).run(rows)?;
    Ok(table)
}

/// Parse the input table at `path`.
pub(crate) fn load_rows(path: &Utf8Path) -> Result<Vec<InputRow>, CliError> {
    let file = fs::open_utf8_file(path).map_err(|source| CliError::OpenSource {
        path: path.to_path_buf(),
        source,
    })?;
    read_rows(BufReader::new(file)).map_err(|source| CliError::ReadSource {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_table<W: Write>(writer: W, table: &[OutputRow]) -> Result<(), CliError> {
    write_rows(writer, table).map_err(CliError::WriteOutput)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ComputeConfig, CliError> {
    let merged = ComputeArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ComputeConfig::try_from(merged)
}

#[cfg(test)]
mod tests;
