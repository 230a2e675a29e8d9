// CounselDesk - util/logging.rs
//
// tracing subscriber setup for the CLI. Everything goes to stderr so stdout
// carries only command output and exports. Student names and note text are
// logged at debug level at most.

use tracing_subscriber::EnvFilter;

/// Where the effective filter came from, reported once logging is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOrigin {
    Environment,
    DebugFlag,
    ConfigFile,
    Default,
}

/// Pick the filter directive: `RUST_LOG` wins, then `--debug`, then the
/// config file's `[logging] level`, then `DEFAULT_LOG_LEVEL`.
pub fn resolve_level(
    rust_log: Option<&str>,
    debug_flag: bool,
    config_level: Option<&str>,
) -> (String, LevelOrigin) {
    match (rust_log.filter(|v| !v.trim().is_empty()), debug_flag, config_level) {
        (Some(env), _, _) => (env.to_string(), LevelOrigin::Environment),
        (None, true, _) => ("debug".to_string(), LevelOrigin::DebugFlag),
        (None, false, Some(level)) => (level.to_string(), LevelOrigin::ConfigFile),
        (None, false, None) => (
            super::constants::DEFAULT_LOG_LEVEL.to_string(),
            LevelOrigin::Default,
        ),
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let (directive, origin) = resolve_level(rust_log.as_deref(), debug_flag, config_level);

    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(super::constants::DEFAULT_LOG_LEVEL));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            app = super::constants::APP_NAME,
            version = super::constants::APP_VERSION,
            directive = %directive,
            origin = ?origin,
            "Logging initialised"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants::DEFAULT_LOG_LEVEL;

    #[test]
    fn test_environment_overrides_everything() {
        let (directive, origin) = resolve_level(Some("counseldesk=trace"), true, Some("info"));
        assert_eq!(directive, "counseldesk=trace");
        assert_eq!(origin, LevelOrigin::Environment);
    }

    #[test]
    fn test_debug_flag_beats_config() {
        assert_eq!(
            resolve_level(None, true, Some("error")),
            ("debug".to_string(), LevelOrigin::DebugFlag)
        );
        // A blank RUST_LOG counts as unset.
        assert_eq!(resolve_level(Some("  "), true, None).1, LevelOrigin::DebugFlag);
    }

    #[test]
    fn test_config_then_default() {
        assert_eq!(
            resolve_level(None, false, Some("info")),
            ("info".to_string(), LevelOrigin::ConfigFile)
        );
        assert_eq!(
            resolve_level(None, false, None),
            (DEFAULT_LOG_LEVEL.to_string(), LevelOrigin::Default)
        );
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(false, Some("warn"));
        init(true, None);
    }
}
