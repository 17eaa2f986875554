use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a stderr subscriber. `RUST_LOG` wins over `level` when set.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,{}={}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
            level
        ))
    });

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .try_init();
}
