//! Entry point for **swaytree**.
//!
//! Loads the configuration, layers command-line flags on top, spawns the
//! sway listener on a background thread and hands the main thread to the
//! GTK4 main loop, which polls the snapshot mailbox.

use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;
use swaytree::config::{Config, Mode, ViewOverrides};
use swaytree::mailbox::SnapshotMailbox;
use swaytree::sway::ipc::SwayIpc;
use swaytree::sway::listener::SwayListener;
use swaytree::traits::{TreeSource, WindowManager};

#[derive(Parser)]
#[command(version, about = "Live diagram of the focused sway workspace")]
struct Cli {
    /// `window` (breadcrumb, dark background) or `transparent` (overlay).
    #[arg(long)]
    mode: Option<Mode>,

    /// Draw floating containers and search them for the workspace.
    #[arg(long)]
    include_floating: bool,

    /// Opacity of every drawn element, 0.0 to 1.0.
    #[arg(long)]
    alpha: Option<f64>,

    /// Window width in pixels (`800`) or percent of the output (`50%`).
    #[arg(long)]
    width: Option<String>,

    /// Window height in pixels or percent of the output.
    #[arg(long)]
    height: Option<String>,

    /// Config file to read instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ViewOverrides {
        ViewOverrides {
            mode: self.mode,
            include_floating: self.include_floating,
            alpha: self.alpha,
            width: self.width.clone(),
            height: self.height.clone(),
        }
    }
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/swaytree`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("swaytree")
}

/// Try to load the config from `path` (default
/// `$XDG_CONFIG_HOME/swaytree/config.json`), falling back to defaults.
fn load_config(path: Option<PathBuf>) -> Config {
    let path = path.unwrap_or_else(|| config_dir().join("config.json"));
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let overrides = cli.overrides();
    let mut config = load_config(cli.config);
    config.view.apply(overrides);

    let ipc = match SwayIpc::from_env() {
        Ok(ipc) => {
            info!("sway socket: {}", ipc.socket().display());
            ipc
        }
        Err(e) => {
            error!("cannot reach sway: {}", e);
            std::process::exit(1);
        }
    };

    let output = match ipc.primary_output() {
        Ok(output) => output.map(|o| o.rect),
        Err(e) => {
            warn!("failed to query outputs: {}", e);
            None
        }
    };

    let mailbox = SnapshotMailbox::new();
    spawn_listener(ipc, mailbox.clone());

    start_event_loop(config, mailbox, output);
}

fn spawn_listener(ipc: SwayIpc, mailbox: SnapshotMailbox) {
    std::thread::spawn(move || {
        let mut source = SwayListener::new(ipc);
        if let Err(e) = source.run(mailbox) {
            error!("sway listener error: {}", e);
        }
    });
}

//  Event loops

#[cfg(feature = "visualizer-gtk")]
fn start_event_loop(
    config: Config,
    mailbox: SnapshotMailbox,
    output: Option<swaytree::tree::NativeRect>,
) {
    if let Err(e) = swaytree::visualizer::gtk::run_main_loop(&config.view, mailbox, output.as_ref())
    {
        error!("failed to start GTK: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "visualizer-gtk"))]
fn start_event_loop(
    _config: Config,
    _mailbox: SnapshotMailbox,
    _output: Option<swaytree::tree::NativeRect>,
) {
    error!("swaytree was built without the `visualizer-gtk` feature, nothing to show");
    std::process::exit(1);
}
