use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Log level for a `-v` count: none shows warnings, `-v` info, `-vv` and up debug
pub fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Install the global subscriber writing to stderr
pub fn init_logging(verbose: u8) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level_for_verbosity(verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}
