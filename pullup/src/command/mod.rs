use clap::{Args, Subcommand};
use eyre::Result;
use pullup_client::backend::BackendKind;
use pullup_client::settings::Settings;
use pullup_client::ApiProvider;
use tracing_subscriber::{self, fmt, prelude::*, EnvFilter};

mod account;
mod comments;
mod events;
mod info;
mod wristband;

#[derive(Args, Debug)]
pub struct Options {
    /// Override the configured backend ("real" or "mock")
    #[arg(long, global = true)]
    pub backend: Option<BackendKind>,

    /// Override the configured server address
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand, Debug)]
#[clap(infer_subcommands = true)]
pub enum PullupCmd {
    /// Show where things are stored and who is logged in
    Info,

    #[command(subcommand)]
    Events(events::Cmd),

    #[command(subcommand)]
    Comments(comments::Cmd),

    #[command(subcommand)]
    Wristband(wristband::Cmd),

    #[command(subcommand)]
    Account(account::Cmd),
}

impl PullupCmd {
    #[tokio::main]
    pub async fn run(self, options: Options) -> Result<()> {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();

        tracing::trace!(command = ?self, "pullup command");

        let mut settings = Settings::new()?;
        if let Some(backend) = options.backend {
            settings.backend = backend;
        }
        if let Some(server) = options.server {
            settings.server_address = server;
        }

        let api = ApiProvider::from_settings(&settings)?;

        match self {
            Self::Info => info::run(&settings, &api),
            Self::Events(cmd) => cmd.run(&api).await,
            Self::Comments(cmd) => cmd.run(&api).await,
            Self::Wristband(cmd) => cmd.run(&api).await,
            Self::Account(cmd) => cmd.run(&api).await,
        }
    }
}
