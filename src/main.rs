use anyhow::Result;
use clap::Parser;
use testalign::cli::Cli;
use testalign::commands::{run_validation, ValidationOptions};

fn init_logging(cli: &Cli) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<i32> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(run_validation(&ValidationOptions::from(cli)))?;
    Ok(report.exit_code())
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Validation failed: {:#}", e);
            1
        }
    };
    std::process::exit(code);
}
