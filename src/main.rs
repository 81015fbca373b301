use std::sync::Arc;

use clap::Parser;
use timewarp::cli::commands::Cli;
use timewarp::io::config_io::{load_config, resolve_api_key};
use timewarp::io::paths;
use timewarp::ops::live::GeminiProvider;
use timewarp::ops::responder::ResponseProvider;
use timewarp::tui::{self, LaunchOptions};
use timewarp::util::logging;

fn main() {
    let cli = Cli::parse();
    let data_dir = paths::data_dir(cli.data_dir.as_deref());
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("error: could not create {}: {}", data_dir.display(), e);
        std::process::exit(1);
    }
    logging::init(&paths::log_path(&data_dir));

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| paths::config_path(&data_dir));
    let config = load_config(&config_path);

    let live: Option<Arc<dyn ResponseProvider>> = if cli.offline {
        log::info!("offline: live companion disabled");
        None
    } else {
        match resolve_api_key(&config.companion) {
            None => {
                log::info!("no API key configured; companion replies are local");
                None
            }
            Some(key) => match GeminiProvider::new(&config.companion, key) {
                Ok(provider) => Some(Arc::new(provider)),
                Err(e) => {
                    log::warn!("live companion unavailable: {}", e);
                    None
                }
            },
        }
    };

    let opts = LaunchOptions {
        config,
        data_dir,
        live,
    };
    if let Err(e) = tui::run(opts) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
