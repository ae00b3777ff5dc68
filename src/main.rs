use simobs_rust::{
    config::{ConfigError, ModelConfig},
    diagnostics::run_model_job,
    logging::init_logging,
    SimObsError,
};

fn main() {
    let config = match ModelConfig::from_args() {
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

    if let Err(e) = run_model_job(&config) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
