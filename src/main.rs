use clap::Parser;

use ascii_face::cli::{handle_config_action, Args, Command};
use ascii_face::config::{self, Config};
use ascii_face::{app, logging, terminal};

fn main() {
    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(config::default_path);

    if let Some(Command::Config { action }) = args.command {
        if let Err(e) = handle_config_action(action, &config_path) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let mut cfg = match Config::load(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    args.apply_to(&mut cfg);
    if let Err(e) = cfg.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let level = match cfg.log_level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    match logging::init(cfg.log_file().as_deref(), level) {
        Ok(Some(path)) => log::info!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => eprintln!("Warning: {}", e),
    }

    if let Err(e) = app::run(&cfg) {
        // the TUI may still own the terminal if it failed mid-session
        terminal::emergency_restore();
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
