//! Runtime configuration and logger setup.

use crate::processing::DEFAULT_MAX_RESULTS;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}";

/// Settings shared by every front end, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Address the HTTP service listens on.
    pub bind: SocketAddr,
    /// Most subnets a single request may realise.
    pub max_results: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Where log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Programmatic stderr appender.
    Stderr,
    /// log4rs yaml file, falls back to stderr when it does not exist.
    ConfigFile(PathBuf),
    /// Everything appended to this file, for running under a supervisor.
    File(PathBuf),
}

/// Install the global log4rs logger.
///
/// `level` applies to the programmatic configurations only; a yaml file sets
/// its own levels.
pub fn init_logging(target: &LogTarget, level: LevelFilter) -> Result<(), Box<dyn Error>> {
    let config = match target {
        LogTarget::ConfigFile(path) if path.exists() => {
            log4rs::init_file(path, Default::default())
                .map_err(|e| format!("Error initializing log4rs from {}: {e}", path.display()))?;
            log::debug!("logging configured from {}", path.display());
            return Ok(());
        }
        LogTarget::ConfigFile(_) | LogTarget::Stderr => stderr_config(level)?,
        LogTarget::File(path) => file_config(path, level)?,
    };
    log4rs::init_config(config).map_err(|e| format!("Error initializing log4rs: {e}"))?;
    Ok(())
}

fn stderr_config(level: LevelFilter) -> Result<Config, Box<dyn Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|e| format!("Invalid log config: {e}"))?;
    Ok(config)
}

fn file_config(path: &Path, level: LevelFilter) -> Result<Config, Box<dyn Error>> {
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(path)
        .map_err(|e| format!("Error opening log file {}: {e}", path.display()))?;
    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(Root::builder().appender("file").build(level))
        .map_err(|e| format!("Invalid log config: {e}"))?;
    Ok(config)
}
