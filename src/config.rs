//! Configuration
//!
//! Settings come from two layers: an optional YAML config file providing
//! defaults, and the command line. Config file lookup order:
//! 1. `--config PATH`
//! 2. `$EMX_RANK_CONFIG`
//! 3. `<config dir>/emx-rank/config.yaml`, if it exists
//!
//! Tag lists from both layers are merged; scalar CLI values override the
//! file. Everything is validated into [`Settings`] before any note is read.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::cli::Cli;
use crate::constants as C;
use crate::error::{Error, Result};
use crate::filter::TagFilterSpec;
use crate::registry::ScanOptions;
use crate::select::SelectionConstraints;
use crate::util;

/// Contents of the YAML config file
///
/// ```yaml
/// recursive: true
/// ignore_tags: [draft, private]
/// select_tags: []
/// csv_delimiter: ","
/// extension: md
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub select_tags: Vec<String>,
    pub ignore_tags: Vec<String>,
    pub recursive: Option<bool>,
    pub csv_delimiter: Option<char>,
    pub extension: Option<String>,
}

impl Config {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|source| Error::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config file using the lookup order, or defaults when none exists
    ///
    /// An explicitly named file (flag or environment) must exist; the default
    /// location is optional.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(C::ENV_CONFIG)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        if let Some(path) = explicit.map(Path::to_path_buf).or(env_path) {
            debug!("loading config from {}", util::display_path(&path));
            return Self::load(&path).map_err(|e| match e {
                Error::Io { path, source } => Error::config(format!(
                    "cannot read config file {}: {}",
                    util::display_path(&path),
                    source
                )),
                other => other,
            });
        }

        match default_config_path() {
            Some(path) if path.is_file() => {
                debug!("loading config from {}", util::display_path(&path));
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `<config dir>/emx-rank/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(C::CONFIG_DIR_NAME).join(C::CONFIG_FILENAME))
}

/// Validated settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub scan: ScanOptions,
    pub filter: TagFilterSpec,
    pub constraints: SelectionConstraints,
    /// CSV destination; `None` when export is suppressed
    pub output_csv: Option<PathBuf>,
    pub csv_delimiter: char,
    pub copy_dest: Option<PathBuf>,
    pub combine_path: Option<PathBuf>,
    pub dry_run: bool,
    pub json: bool,
}

impl Settings {
    /// Merge CLI arguments over the config file and validate the result
    pub fn resolve(cli: &Cli, config: Config) -> Result<Self> {
        if !cli.input_dir.is_dir() {
            return Err(Error::config(format!(
                "input directory {} does not exist or is not a directory",
                util::display_path(&cli.input_dir)
            )));
        }

        let output_csv = if cli.no_csv {
            None
        } else {
            match &cli.output_csv {
                Some(path) => Some(path.clone()),
                None => {
                    return Err(Error::config(
                        "an output CSV path (-o) is required unless --no-csv is given",
                    ))
                }
            }
        };

        let max_bytes = match cli.copy_until_size {
            Some(mb) => Some(util::megabytes_to_bytes(mb).filter(|&b| b > 0).ok_or_else(|| {
                Error::config(format!("--copy-until-size must be a positive size in MB, got {}", mb))
            })?),
            None => None,
        };
        let constraints = SelectionConstraints {
            top_n: cli.copy_top,
            top_percent: cli.copy_top_percent,
            max_bytes,
        };
        constraints.validate()?;

        if !constraints.is_empty() && cli.copy_dest.is_none() && cli.combine_md.is_none() {
            return Err(Error::config(
                "--copy-top, --copy-top-percent and --copy-until-size need --copy-dest or --combine-md",
            ));
        }

        if let Some(dest) = &cli.copy_dest {
            if util::same_location(dest, &cli.input_dir) {
                return Err(Error::config("--copy-dest must differ from the input directory"));
            }
        }

        let csv_delimiter = config.csv_delimiter.unwrap_or(C::CSV_DELIMITER);
        if matches!(csv_delimiter, '"' | '\n' | '\r') {
            return Err(Error::config(format!("invalid csv_delimiter {:?}", csv_delimiter)));
        }

        let extension = config
            .extension
            .map(|e| e.trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| C::MARKDOWN_EXTENSION.to_string());

        let select = config.select_tags.iter().chain(&cli.select_tags);
        let ignore = config.ignore_tags.iter().chain(&cli.ignore_tags);

        Ok(Self {
            input_dir: cli.input_dir.clone(),
            scan: ScanOptions {
                recursive: cli.recursive || config.recursive.unwrap_or(false),
                extension,
            },
            filter: TagFilterSpec::new(select, ignore),
            constraints,
            output_csv,
            csv_delimiter,
            copy_dest: cli.copy_dest.clone(),
            combine_path: cli.combine_md.clone(),
            dry_run: cli.dry_run,
            json: cli.json,
        })
    }
}
