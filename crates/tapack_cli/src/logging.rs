use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "TAPACK_LOG";

/// `--log-level` wins over `TAPACK_LOG`. Without either only warnings are shown.
pub fn init_logging(level: Option<&str>) {
  let filter = match level {
    Some(level) => EnvFilter::new(level),
    None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
  };

  let fmt_layer =
    fmt::layer().compact().with_target(false).without_time().with_writer(std::io::stderr);

  tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
