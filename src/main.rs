use clap::Parser;
use ipv6_subnet_planner::cli::{self, Cli};
use ipv6_subnet_planner::config::init_logging;
use ipv6_subnet_planner::output::format_error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let args = Cli::parse();
    if let Err(e) = init_logging(&args.log_target(), args.log_level()) {
        eprintln!("{}", format_error(&*e));
        return ExitCode::FAILURE;
    }
    log::info!("#Start main()");

    match cli::run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{}", format_error(&*e));
            ExitCode::FAILURE
        }
    }
}
