//! Run configuration: built-in defaults, an optional TOML settings file and
//! the command line, merged in that order into one `Config` value that is
//! passed explicitly to everything that needs it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

use crate::combined::{MaskError, OperationMask};
use crate::fs_op::FsErrorKind;

pub const DEFAULT_DIRECTORY: &str = "/media/nfs/fs";
pub const DEFAULT_BASENAME: &str = "testfile-";
pub const DEFAULT_COMBINED_N: usize = 100;
pub const DEFAULT_STAT_FILE: &str = "/tmp/basicStat.csv";
pub const SETTINGS_FILE_NAME: &str = "fsbasics.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("working directory `{}` does not exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("working directory `{}` is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("basename `{0}` must be a single non-empty path component")]
    InvalidBasename(String),

    #[error("invalid type mask: {0}")]
    Mask(#[from] MaskError),

    #[error("failed to read settings file `{}`: {source}", path.display())]
    ReadSettings { path: PathBuf, source: io::Error },

    #[error("failed to parse settings file `{}`: {source}", path.display())]
    ParseSettings {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn kind(&self) -> FsErrorKind {
        match self {
            ConfigError::MissingDirectory(_) => FsErrorKind::NotFound,
            ConfigError::ReadSettings { source, .. } => FsErrorKind::classify(source.kind()),
            ConfigError::NotADirectory(_)
            | ConfigError::InvalidBasename(_)
            | ConfigError::Mask(_)
            | ConfigError::ParseSettings { .. } => FsErrorKind::InvalidArgument,
        }
    }
}

/// Which suite the driver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    /// The basic file + directory sequence.
    Quick,
    /// One combined workload over a file set of the given requested size.
    Combined { files: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub directory: PathBuf,
    pub suite: Suite,
    pub profiling: bool,
    pub verbose: bool,
    pub basename: String,
    pub loop_count: u32,
    pub mask: OperationMask,
    /// Append-only, timestamped result log.
    pub log_file: Option<PathBuf>,
    /// CSV receiving create-rate samples while profiling.
    pub stat_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            suite: Suite::Quick,
            profiling: false,
            verbose: false,
            basename: DEFAULT_BASENAME.to_string(),
            loop_count: 1,
            mask: OperationMask::ALL,
            log_file: None,
            stat_file: Some(PathBuf::from(DEFAULT_STAT_FILE)),
        }
    }
}

/// Command line of the `fsbasics` binary.
#[derive(Parser, Debug, Default)]
#[command(
    name = "fsbasics",
    version,
    about = "A testing tool for the basic features of a filesystem",
    long_about = "Exercises a working directory with atomic filesystem operations \
                  (create, rename, chmod, chown, utime, delete) or a combined \
                  create / readdir / delete workload and reports pass or fail per test."
)]
pub struct Cli {
    /// Working directory for the tests
    #[arg(short = 'd', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Check basic functions (default unless --combined is given)
    #[arg(short, long)]
    pub quick: bool,

    /// Create, list and delete N (empty) files
    #[arg(short, long, value_name = "N")]
    pub combined: Option<usize>,

    /// Show how long each bulk operation took
    #[arg(short, long)]
    pub profiling: bool,

    /// Print progress and per-phase announcements
    #[arg(short, long)]
    pub verbose: bool,

    /// Prefix for generated file and directory names
    #[arg(short, long, value_name = "PREFIX")]
    pub basename: Option<String>,

    /// Repeat the whole process N times
    #[arg(short = 'l', long = "loop", value_name = "N")]
    pub loop_count: Option<u32>,

    /// Operations of a combined run: any of C(reate), R(eaddir), D(elete)
    #[arg(short = 't', long = "type", value_name = "CRD")]
    pub mask: Option<OperationMask>,

    /// TOML settings file (defaults to fsbasics.toml in the user config dir)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Append timestamped results to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// CSV file for create-rate samples while profiling
    #[arg(long, value_name = "FILE")]
    pub stat_file: Option<PathBuf>,
}

/// Keys accepted in the settings file. Everything is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub directory: Option<PathBuf>,
    pub basename: Option<String>,
    /// When set, a combined run of this size is the default suite.
    pub combined: Option<usize>,
    #[serde(rename = "loop")]
    pub loop_count: Option<u32>,
    #[serde(rename = "type")]
    pub mask: Option<String>,
    pub profiling: Option<bool>,
    pub verbose: Option<bool>,
    pub log_file: Option<PathBuf>,
    pub stat_file: Option<PathBuf>,
}

impl Settings {
    pub fn parse(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::ParseSettings {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadSettings {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, path)
    }

    /// Explicit `path` must exist; the per-user default is used only if it
    /// is there.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(p) = path {
            return Self::load(p);
        }
        match default_settings_path() {
            Some(p) if p.is_file() => {
                tracing::debug!(path = %p.display(), "loading settings");
                Self::load(&p)
            }
            _ => Ok(Settings::default()),
        }
    }
}

/// `<user config dir>/fsbasics/fsbasics.toml`, if a home directory exists.
pub fn default_settings_path() -> Option<PathBuf> {
    directories_next::ProjectDirs::from("", "", "fsbasics")
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
}

impl Config {
    /// Merge defaults, `settings` and `cli`. The working directory is not
    /// checked here; see [`validate_directory`].
    pub fn merge(settings: Settings, cli: &Cli) -> Result<Self, ConfigError> {
        let mut cfg = Config::default();

        if let Some(d) = settings.directory {
            cfg.directory = d;
        }
        if let Some(b) = settings.basename {
            cfg.basename = b;
        }
        if let Some(n) = settings.combined {
            cfg.suite = Suite::Combined { files: n };
        }
        if let Some(l) = settings.loop_count {
            cfg.loop_count = l;
        }
        if let Some(m) = settings.mask {
            cfg.mask = OperationMask::parse(&m)?;
        }
        cfg.profiling = settings.profiling.unwrap_or(cfg.profiling);
        cfg.verbose = settings.verbose.unwrap_or(cfg.verbose);
        if settings.log_file.is_some() {
            cfg.log_file = settings.log_file;
        }
        if settings.stat_file.is_some() {
            cfg.stat_file = settings.stat_file;
        }

        if let Some(d) = &cli.directory {
            cfg.directory = d.clone();
        }
        if let Some(b) = &cli.basename {
            cfg.basename = b.clone();
        }
        if let Some(n) = cli.combined {
            cfg.suite = Suite::Combined { files: n };
        }
        // --quick wins over --combined.
        if cli.quick {
            cfg.suite = Suite::Quick;
        }
        if let Some(l) = cli.loop_count {
            cfg.loop_count = l;
        }
        if let Some(m) = cli.mask {
            cfg.mask = m;
        }
        cfg.profiling |= cli.profiling;
        cfg.verbose |= cli.verbose;
        if cli.log_file.is_some() {
            cfg.log_file = cli.log_file.clone();
        }
        if cli.stat_file.is_some() {
            cfg.stat_file = cli.stat_file.clone();
        }

        validate_basename(&cfg.basename)?;
        Ok(cfg)
    }

    /// Full startup path: settings discovery, merge, directory validation.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let settings = Settings::discover(cli.config.as_deref())?;
        let mut cfg = Config::merge(settings, cli)?;
        cfg.directory = validate_directory(&cfg.directory)?;
        Ok(cfg)
    }
}

/// The basename is joined onto the working directory, so it must name an
/// entry inside it and never the directory itself or its parent.
pub fn validate_basename(basename: &str) -> Result<(), ConfigError> {
    match basename {
        "" | "." | ".." => Err(ConfigError::InvalidBasename(basename.to_string())),
        b if b.contains('/') || b.contains('\0') => Err(ConfigError::InvalidBasename(b.to_string())),
        _ => Ok(()),
    }
}

/// Strip trailing separators and require an existing directory.
pub fn validate_directory(dir: &Path) -> Result<PathBuf, ConfigError> {
    let normalized: PathBuf = dir.components().collect();
    match fs::metadata(&normalized) {
        Err(_) => Err(ConfigError::MissingDirectory(normalized)),
        Ok(meta) if !meta.is_dir() => Err(ConfigError::NotADirectory(normalized)),
        Ok(_) => Ok(normalized),
    }
}
