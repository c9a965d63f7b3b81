//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{CharacterSet, Sampling};
use crate::ascii::{CharSet, SampleFilter};
use crate::config::Config;

/// Live webcam feed rendered as ASCII art in the terminal
#[derive(Parser, Debug)]
#[command(name = "ascii-face")]
#[command(version, about = "Webcam to ASCII art in your terminal", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Number of character columns
    #[arg(long)]
    pub columns: Option<u16>,

    /// ASCII character set
    #[arg(long)]
    pub charset: Option<CharacterSet>,

    /// Start in mono (accent color) mode
    #[arg(long)]
    pub mono: bool,

    /// Start the camera immediately
    #[arg(long)]
    pub autostart: bool,

    /// Downsampling filter
    #[arg(long)]
    pub sampling: Option<Sampling>,

    /// Hide status bar
    #[arg(long)]
    pub no_status: bool,

    /// Take N timed snapshots once the camera runs, then close
    #[arg(long, value_name = "N")]
    pub captures: Option<u32>,

    /// Seconds between timed snapshots
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,
}

impl Args {
    /// Override file values with the flags that were given.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(columns) = self.columns {
            config.ascii.columns = columns;
        }
        if let Some(charset) = self.charset {
            config.ascii.charset = CharSet::from(charset).name().to_string();
            // an explicit preset wins over a custom ramp from the file
            config.ascii.ramp = None;
        }
        if let Some(sampling) = self.sampling {
            config.ascii.sampling = SampleFilter::from(sampling).name().to_string();
        }
        if self.mono {
            config.ascii.color = false;
        }
        if self.autostart {
            config.display.autostart = true;
        }
        if self.no_status {
            config.display.status_bar = false;
        }
        if let Some(count) = self.captures {
            config.snapshot.count = count;
        }
        if let Some(secs) = self.interval {
            config.snapshot.interval_secs = secs;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["ascii-face"]);
        assert!(args.config.is_none());
        assert!(args.columns.is_none());
        assert!(args.charset.is_none());
        assert!(!args.mono);
        assert!(!args.autostart);
        assert!(args.sampling.is_none());
        assert!(!args.no_status);
        assert!(args.captures.is_none());
        assert!(args.interval.is_none());
        assert!(args.command.is_none());
    }

    #[test]
    fn test_args_config_option() {
        let args = Args::parse_from(["ascii-face", "--config", "/tmp/config.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/config.toml")));

        let args = Args::parse_from(["ascii-face", "-c", "/tmp/test.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/test.toml")));
    }

    #[test]
    fn test_args_charset_values() {
        let args = Args::parse_from(["ascii-face", "--charset", "blocks"]);
        assert_eq!(args.charset, Some(CharacterSet::Blocks));

        let args = Args::parse_from(["ascii-face", "--charset", "dense"]);
        assert_eq!(args.charset, Some(CharacterSet::Dense));
    }

    #[test]
    fn test_args_rejects_unknown_charset() {
        assert!(Args::try_parse_from(["ascii-face", "--charset", "braille"]).is_err());
    }

    #[test]
    fn test_args_config_subcommands() {
        let args = Args::parse_from(["ascii-face", "config", "show"]);
        match args.command {
            Some(Command::Config {
                action: ConfigAction::Show,
            }) => (),
            _ => panic!("Expected Config Show subcommand"),
        }

        let args = Args::parse_from(["ascii-face", "config", "init"]);
        match args.command {
            Some(Command::Config {
                action: ConfigAction::Init,
            }) => (),
            _ => panic!("Expected Config Init subcommand"),
        }
    }

    #[test]
    fn test_no_flags_leave_config_untouched() {
        let mut config = Config::default();
        Args::parse_from(["ascii-face"]).apply_to(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.ascii.ramp = Some(" .#".to_string());

        Args::parse_from([
            "ascii-face",
            "--columns",
            "80",
            "--charset",
            "minimal",
            "--sampling",
            "nearest",
            "--mono",
            "--autostart",
            "--no-status",
            "--captures",
            "2",
            "--interval",
            "3",
        ])
        .apply_to(&mut config);

        assert_eq!(config.ascii.columns, 80);
        assert_eq!(config.ascii.charset, "minimal");
        assert!(config.ascii.ramp.is_none());
        assert_eq!(config.ascii.sampling, "nearest");
        assert!(!config.ascii.color);
        assert!(config.display.autostart);
        assert!(!config.display.status_bar);
        assert_eq!(config.snapshot.count, 2);
        assert_eq!(config.snapshot.interval_secs, 3);
        assert!(config.validate().is_ok());
    }
}
