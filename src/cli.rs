//! Command line interface.
//!
//! Flags fall back to `PLANNER_*` environment variables, which `main` may
//! load from a `.env` file first.

use crate::config::{LogTarget, PlannerConfig, DEFAULT_BIND, DEFAULT_LOG_CONFIG};
use crate::interactive::run_interactive;
use crate::output::{format_summary, format_warning, write_plan, OutputFormat};
use crate::processing::{enumerate_limited, DEFAULT_MAX_RESULTS};
use crate::server;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::net::SocketAddr;
use std::path::PathBuf;

/// IPv6 subnet planner: split a prefix into equally sized subnets
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// log4rs yaml configuration, stderr logging is used when it does not exist
    #[arg(long, env = "PLANNER_LOG_CONFIG", default_value = DEFAULT_LOG_CONFIG, global = true)]
    pub log_config: PathBuf,

    /// Most subnets a single request may generate
    #[arg(long, env = "PLANNER_MAX_RESULTS", default_value_t = DEFAULT_MAX_RESULTS, global = true)]
    pub max_results: u64,

    /// Log debug messages to stderr, overriding --log-config
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split a prefix and print or save the subnets
    Plan(PlanArgs),
    /// Ask for the prefix and new prefix length on stdin
    Interactive,
    /// Serve the planner over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// IPv6 prefix (e.g., 3fff:1::/32)
    #[arg(short, long)]
    pub subnet: String,

    /// New subnet prefix length (e.g., 48)
    #[arg(short, long, allow_negative_numbers = true)]
    pub prefix: i64,

    /// Output file name
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long)]
    pub json: bool,

    /// Only return the first N subnets
    #[arg(short, long)]
    pub limit: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, env = "PLANNER_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Append logs to this file instead of the console
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn config(&self) -> PlannerConfig {
        let mut config = PlannerConfig {
            max_results: self.max_results,
            ..Default::default()
        };
        if let Command::Serve(serve) = &self.command {
            config.bind = serve.bind;
        }
        config
    }

    pub fn log_target(&self) -> LogTarget {
        match &self.command {
            Command::Serve(ServeArgs {
                log_file: Some(path),
                ..
            }) => LogTarget::File(path.clone()),
            _ if self.verbose => LogTarget::Stderr,
            _ => LogTarget::ConfigFile(self.log_config.clone()),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match (&self.command, self.verbose) {
            (_, true) => LevelFilter::Debug,
            (Command::Serve(_), false) => LevelFilter::Info,
            _ => LevelFilter::Warn,
        }
    }
}

impl PlanArgs {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Run the selected command.
///
/// Returns `Ok(false)` when a request was rejected and the reason has already
/// been shown to the user.
pub async fn run(cli: Cli) -> Result<bool, Box<dyn Error>> {
    let config = cli.config();
    match cli.command {
        Command::Plan(args) => {
            let stdout = io::stdout();
            run_plan(&args, &config, &mut stdout.lock())?;
            Ok(true)
        }
        Command::Interactive => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_interactive(&mut stdin.lock(), &mut stdout.lock(), &config)
        }
        Command::Serve(_) => {
            server::serve(config).await?;
            Ok(true)
        }
    }
}

/// Plan the split described by `args` and write it to the output file or `out`.
///
/// The alignment warning goes to stderr so `out` stays machine readable.
pub fn run_plan<W: Write>(
    args: &PlanArgs,
    config: &PlannerConfig,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let plan = enumerate_limited(&args.subnet, args.prefix, args.limit, config.max_results)?;
    log::info!("{}", format_summary(&plan));
    if let Some(warning) = plan.warning() {
        eprintln!("{}", format_warning(&warning));
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| format!("Error creating {}: {e}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_plan(&plan, args.format(), &mut writer)
                .and_then(|_| writer.flush())
                .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
            writeln!(out, "Subnets written to {}", path.display())?;
        }
        None => {
            let mut writer = BufWriter::new(&mut *out);
            write_plan(&plan, args.format(), &mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}
