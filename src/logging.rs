//! Console logging for the prototypes.
//!
//! Debug builds log at `debug` so every bootstrap step and enumerated adapter
//! is visible; release builds log at `info`. `DX12GAME_PROTO_LOG` takes an
//! `env_logger` filter string and overrides both.

/// Environment variable holding the log filter
pub const LOG_ENV_VAR: &str = "DX12GAME_PROTO_LOG";

/// Filter used when `DX12GAME_PROTO_LOG` is unset
pub fn default_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Initialize the global logger. Safe to call more than once.
pub fn init_logging() {
    let env = env_logger::Env::new().filter_or(LOG_ENV_VAR, default_filter());

    if env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .format_target(false)
        .try_init()
        .is_ok()
    {
        log::debug!("[init_logging] Logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_follows_build_profile() {
        let expected = if cfg!(debug_assertions) { "debug" } else { "info" };
        assert_eq!(default_filter(), expected);
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logging();
        init_logging();
    }
}
