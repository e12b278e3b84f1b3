//! Entry point for the **deckctl** command.
//!
//! Fires one key event through the default action table and exits:
//!
//! ```text
//! deckctl [--config <path>] [--list] <action> [<payload-json>]
//! ```
//!
//! `<action>` may be the full action key or the part after the plugin
//! prefix (`shutter-stop`, `rectangle.left-half`, …).  The payload is the
//! key's settings object, e.g.
//! `'{"settings":{"address":"192.168.1.40:8838","shadeId":"03","motorType":"1"}}'`.
//!
//! Exit status: `0` on success, `1` if the action failed, `2` on a usage or
//! configuration error.

use deckctl::config::Config;
use deckctl::dispatcher::Dispatcher;
use deckctl::event::KeyEvent;
use deckctl::shade::client::ShadeClient;
use deckctl::system::launcher::SystemLauncher;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;

const USAGE: &str = "usage: deckctl [--config <path>] [--list] <action> [<payload-json>]";

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    list: bool,
    action: Option<String>,
    payload: Option<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut out = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                out.config = Some(PathBuf::from(path));
            }
            "--list" => out.list = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            s if s.starts_with("--") => return Err(format!("unknown option {}", s)),
            _ if out.action.is_none() => out.action = Some(arg.clone()),
            _ if out.payload.is_none() => out.payload = Some(arg.clone()),
            _ => return Err(format!("unexpected argument {:?}", arg)),
        }
    }
    if out.action.is_none() && !out.list {
        return Err(USAGE.to_string());
    }
    Ok(out)
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/deckctl`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("deckctl")
}

/// Load an explicitly given config (which must exist), or try the default
/// location and fall back to compiled-in defaults.
///
/// The logger is not installed yet, so the outcome is returned as a note
/// to log afterwards.
fn load_config(explicit: Option<&PathBuf>) -> Result<(Config, String), String> {
    if let Some(path) = explicit {
        let cfg = Config::load(path).map_err(|e| e.to_string())?;
        return Ok((cfg, format!("loaded config from {}", path.display())));
    }
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => Ok((cfg, format!("loaded config from {}", path.display()))),
        Err(e) => Ok((Config::default(), format!("no config file ({}), using defaults", e))),
    }
}

fn main() {
    std::process::exit(run(std::env::args().skip(1)));
}

fn run(argv: impl IntoIterator<Item = String>) -> i32 {
    let args = match parse_args(argv) {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("{}", msg);
            return 2;
        }
    };

    let (config, note) = match load_config(args.config.as_ref()) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{}", msg);
            return 2;
        }
    };

    if let Some(path) = deckctl::logging::init(&config.log, &config.plugin_prefix) {
        eprintln!("logging to {}", path.display());
    }
    info!("{}", note);

    let dispatcher = Dispatcher::with_defaults(
        &config,
        Arc::new(SystemLauncher::new()),
        Arc::new(ShadeClient::new(config.shade.clone())),
    );

    if args.list {
        for action in dispatcher.actions() {
            println!("{}", action);
        }
        if args.action.is_none() {
            return 0;
        }
    }

    let Some(action) = args.action else {
        return 0;
    };

    let payload = match args.payload.as_deref().map(serde_json::from_str::<serde_json::Value>).transpose() {
        Ok(p) => p.unwrap_or(serde_json::Value::Null),
        Err(e) => {
            eprintln!("invalid payload: {}", e);
            return 2;
        }
    };

    let event = KeyEvent::new(dispatcher.qualify(&action), payload);
    match dispatcher.dispatch(&event) {
        Ok(()) => {
            info!("{} done", event.action);
            0
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            1
        }
    }
}
