use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber. Logs go to stderr so reports written to
/// stdout stay machine readable. `RUST_LOG` wins over `default_level`.
pub fn init(default_level: tracing::Level) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::Layer::new().compact().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}
