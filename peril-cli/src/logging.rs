use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const CRATES: [&str; 5] = [
    "peril_cli",
    "peril_client",
    "peril_server",
    "peril_game",
    "peril_messaging_rabbitmq",
];

fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|c| format!("{c}={level}")));
    directives.join(",")
}

/// `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_own_crates_only() {
        let quiet = default_directives(false);
        assert!(quiet.starts_with("warn,"));
        assert!(quiet.contains("peril_game=info"));

        let loud = default_directives(true);
        assert!(loud.contains("peril_messaging_rabbitmq=debug"));
        assert!(!loud.contains("lapin"));
    }
}
