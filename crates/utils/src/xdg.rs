use std::env;
use std::path::PathBuf;

/// XDG Base Directory paths for edgescope
pub struct XdgPaths;

impl XdgPaths {
    /// Get XDG_CONFIG_HOME/edgescope or fallback
    pub fn config_dir() -> PathBuf {
        env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .map(|home| home.join(".config"))
                    .unwrap_or_else(|| PathBuf::from(".config"))
            })
            .join("edgescope")
    }

    /// Get XDG_STATE_HOME/edgescope or fallback
    pub fn state_dir() -> PathBuf {
        env::var("XDG_STATE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .map(|home| home.join(".local/state"))
                    .unwrap_or_else(|| PathBuf::from(".local/state"))
            })
            .join("edgescope")
    }

    /// Default directory for persisted service identities
    pub fn identity_store_dir() -> PathBuf {
        Self::state_dir().join("identities")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_xdg_paths_with_env() {
        let config_orig = env::var("XDG_CONFIG_HOME").ok();
        let state_orig = env::var("XDG_STATE_HOME").ok();

        env::set_var("XDG_CONFIG_HOME", "/tmp/config");
        env::set_var("XDG_STATE_HOME", "/tmp/state");

        assert_eq!(XdgPaths::config_dir(), PathBuf::from("/tmp/config/edgescope"));
        assert_eq!(XdgPaths::state_dir(), PathBuf::from("/tmp/state/edgescope"));
        assert_eq!(
            XdgPaths::identity_store_dir(),
            PathBuf::from("/tmp/state/edgescope/identities")
        );

        match config_orig {
            Some(val) => env::set_var("XDG_CONFIG_HOME", val),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }
        match state_orig {
            Some(val) => env::set_var("XDG_STATE_HOME", val),
            None => env::remove_var("XDG_STATE_HOME"),
        }
    }
}
