use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config_from() first.")
        .load_full()
}

/// Initialize the global configuration
///
/// Reads `path` (or "config.toml" when `None`) and the environment. If the
/// file doesn't exist, uses in-memory defaults. Only the first call has an
/// effect; later calls keep the loaded config.
///
/// # Examples
/// ```no_run
/// use viewcounter::config::init_config_from;
/// init_config_from(Some("config.toml"));
/// ```
pub fn init_config_from(path: Option<&str>) {
    CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::load(path)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_init_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\ncooldown_secs = 7\n").unwrap();

        init_config_from(path.to_str());
        assert_eq!(get_config().session.cooldown_secs, 7);

        // 之后的初始化不会覆盖已加载的配置
        init_config_from(Some("/nonexistent/config.toml"));
        assert_eq!(get_config().session.cooldown_secs, 7);
    }
}
