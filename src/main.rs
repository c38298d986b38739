use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use squid::logger::Logger;
use squid::{BuildService, CliArgs, Config};

fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = Logger::init(args.log_level(), !args.no_color) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let config = Config::from_args(args);
    let runtime = match config.runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Cannot start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let service = BuildService::new(config);
    match runtime.block_on(service.run()) {
        Ok(summary) => {
            info!("Done: {}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
