//! Subcommand handlers for config actions.

use std::path::Path;

use super::args::ConfigAction;
use crate::config::{self, Config, ConfigError};

/// Handle config subcommand actions against the file at `path`.
pub fn handle_config_action(action: ConfigAction, path: &Path) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(path))?;
            if path.exists() {
                println!("Config file: {} (exists)", path.display());
            } else {
                println!("Config file: {} (not found, showing defaults)", path.display());
            }
            println!();
            print!("{}", config.to_toml());
        }
        ConfigAction::Init => {
            config::init(path)?;
            println!("Created config file: {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_show() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        handle_config_action(ConfigAction::Init, &path).unwrap();
        assert!(path.exists());
        handle_config_action(ConfigAction::Show, &path).unwrap();
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ascii]\ncolumns = 40\n").unwrap();

        assert!(handle_config_action(ConfigAction::Init, &path).is_err());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[ascii]\ncolumns = 40\n"
        );
    }

    #[test]
    fn test_show_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ascii\n").unwrap();

        assert!(matches!(
            handle_config_action(ConfigAction::Show, &path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
