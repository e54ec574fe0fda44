use std::path::PathBuf;

use emote::{config::ConfigRoot, gateway::Gateway, journal, Error};
use serde::Serialize;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(clap::Args)]
pub struct Common {
    /// config file to load
    #[clap(long, value_parser)]
    pub config: Option<PathBuf>,

    /// json file with the journal entries to work on
    #[clap(long, value_parser)]
    pub entries: Option<PathBuf>,
}

pub fn setup_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .with_env_var("RUST_LOG")
        .from_env_lossy();

    // stdout is reserved for command output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

impl Common {
    pub fn load_config(&self) -> Result<ConfigRoot, Error> {
        ConfigRoot::new(&self.config).map_err(Error::config)
    }

    pub fn load_entries(&self) -> Result<Vec<journal::JournalEntry>, Error> {
        match &self.entries {
            Some(path) => {
                let entries = journal::load_entries(path)?;
                debug!(count = entries.len(), "loaded journal entries");
                Ok(entries)
            }
            None => Ok(vec![]),
        }
    }
}

/// Builds the runtime and the gateway, then drives `task` to completion.
pub fn with_gateway<T, F, Fut>(config: &ConfigRoot, task: F) -> Result<T, Error>
where
    F: FnOnce(Gateway) -> Fut,
    Fut: std::future::Future<Output = Result<T, Error>>,
{
    let tokio_rt = tokio::runtime::Builder::new_multi_thread()
        .enable_io()
        .enable_time()
        .build()?;

    tokio_rt.block_on(async {
        let gateway = Gateway::new(config)?;
        task(gateway).await
    })
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), Error> {
    let output = serde_json::to_string_pretty(value).map_err(Error::parse)?;
    println!("{output}");

    Ok(())
}
