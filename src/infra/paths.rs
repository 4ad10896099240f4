// src/infra/paths.rs — Path management
//
// All paths respect the ORAMIND_HOME environment variable for isolation.
// When ORAMIND_HOME is set, config and data live under that directory.

use std::path::PathBuf;

/// Returns the ORAMIND_HOME override, if set.
fn oramind_home() -> Option<PathBuf> {
    std::env::var_os("ORAMIND_HOME").map(PathBuf::from)
}

/// Configuration directory: $ORAMIND_HOME/ or ~/.oramind/
pub fn config_dir() -> PathBuf {
    if let Some(home) = oramind_home() {
        return home;
    }
    dirs_home().join(".oramind")
}

/// Data directory holding extraction snapshots and audit caches:
/// $ORAMIND_HOME/data/ or ~/.oramind/data/
pub fn data_dir() -> PathBuf {
    if let Some(home) = oramind_home() {
        return home.join("data");
    }
    config_dir().join("data")
}

/// Home directory
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .expect("Could not determine home directory")
        .home_dir()
        .to_path_buf()
}

/// Default config file path
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
