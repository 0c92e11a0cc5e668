use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use casement::cli::{Cli, Sub};
use casement::host::Host;
use casement::layout::Options;
use casement::utils::geometry::Size;
use casement_config::Config;
use clap::Parser;
use directories::ProjectDirs;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "casement=info,casement_config=info";

/// Where the config comes from.
enum ConfigPath {
    /// Set on the command line or in the environment; must exist.
    Explicit(PathBuf),
    /// The default location; a missing file means the default config.
    Default(Option<PathBuf>),
}

impl ConfigPath {
    fn new(cli_path: Option<PathBuf>) -> Self {
        let explicit = cli_path.or_else(|| env::var_os("CASEMENT_CONFIG").map(PathBuf::from));
        if let Some(path) = explicit {
            return ConfigPath::Explicit(path);
        }

        let path = ProjectDirs::from("", "", "casement")
            .map(|dirs| dirs.config_dir().join("config.kdl"));
        ConfigPath::Default(path)
    }

    /// Loads the config, printing diagnostics on failure.
    fn load(&self) -> Option<Config> {
        let path = match self {
            ConfigPath::Explicit(path) => path,
            ConfigPath::Default(Some(path)) if path.exists() => path,
            ConfigPath::Default(_) => {
                info!("no config file found, using the default config");
                return Some(Config::default());
            }
        };

        match Config::load(path) {
            Ok(config) => {
                info!("loaded config from {path:?}");
                Some(config)
            }
            Err(err) => {
                error!("error loading config from {path:?}");
                eprintln!("{err:?}");
                None
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let directives = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_owned());
    let env_filter = EnvFilter::builder().parse_lossy(directives);
    tracing_subscriber::fmt()
        .compact()
        .with_writer(io::stderr)
        .with_env_filter(env_filter)
        .init();

    let cli = Cli::parse();

    let _client = tracy_client::Client::start();

    let Some(config) = ConfigPath::new(cli.config).load() else {
        process::exit(1);
    };

    match cli.subcommand {
        Sub::Validate => {
            info!("config is valid");
        }
        Sub::Run {
            script,
            width,
            height,
        } => {
            anyhow::ensure!(
                width > 0. && height > 0.,
                "container size must be positive, got {width}x{height}"
            );

            let options = Options::from_config(&config).context("invalid config")?;
            let mut host = Host::new(options, Size::new(width, height));
            let stdout = io::stdout().lock();

            match script {
                Some(path) => {
                    let file =
                        File::open(&path).with_context(|| format!("error opening {path:?}"))?;
                    host.run(BufReader::new(file), stdout)?;
                }
                None => host.run(io::stdin().lock(), stdout)?,
            }
        }
    }

    Ok(())
}
