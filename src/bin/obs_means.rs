use simobs_rust::{
    config::{ConfigError, ObservationalConfig},
    diagnostics::run_observational_job,
    logging::init_logging,
    SimObsError,
};

fn main() {
    let config = match ObservationalConfig::from_args() {
        Ok(config) => config,
        Err(ConfigError::Cli(e)) => e.exit(),
        Err(e) => {
            eprintln!("error: {}", SimObsError::from(e));
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(config.verbose) {
        eprintln!("Failed to initialise logging: {}", e);
        std::process::exit(1);
    }

    match run_observational_job(&config) {
        Ok(scalars) => println!("{}", scalars),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
