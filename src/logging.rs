// logging.rs
// Console logging via tracing-subscriber
//
// Console only. RUST_LOG wins over the level picked on the command line;
// span close events print the elapsed time of every scenario step.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Map -v / -q counts onto a base level
pub fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "warn";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Build the filter from RUST_LOG, or from `level` with noisy HTTP crates held back
pub fn build_env_filter(level: &str) -> Result<EnvFilter, String> {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        return Ok(from_env);
    }

    let mut directives = vec![level.to_string()];
    let noisy: &[(&str, &str)] = &[
        ("hyper", "warn"),
        ("hyper_util", "warn"),
        ("reqwest", "warn"),
        ("rustls", "warn"),
    ];
    for (target, lvl) in noisy {
        directives.push(format!("{}={}", target, lvl));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| format!("Invalid tracing filter '{}': {}", filter_str, e))
}

pub fn init_logging(level: &str) -> Result<(), String> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(build_env_filter(level)?)
        .with(console_layer)
        .try_init()
        .map_err(|e| format!("Failed to install tracing subscriber: {}", e))
}
