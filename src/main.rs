use invite::{config::Config, error::Error, invite_server::InviteServer};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::{error, info, Level};
use tracing_appender::non_blocking::WorkerGuard;

fn init_logging(log_directory: Option<&Path>) -> WorkerGuard {
    let (writer, guard) = match log_directory {
        Some(log_directory) => {
            tracing_appender::non_blocking(tracing_appender::rolling::daily(log_directory, "invite.log"))
        }
        None => tracing_appender::non_blocking(std::io::stdout()),
    };
    tracing_subscriber::fmt()
        .with_max_level(if cfg!(feature = "debug-logging") {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_ansi(log_directory.is_none())
        .with_writer(writer)
        .init();
    guard
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config_path: PathBuf = match env::args().nth(1) {
        Some(config_path) => PathBuf::from(config_path),
        None => Config::default_path()?,
    };
    let config: Config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!(
                "Failed to load configuration from {}: {}",
                config_path.display(),
                err
            );
            return Err(err.into());
        }
    };
    let _guard: WorkerGuard = init_logging(config.log_directory.as_deref());
    info!("Loaded configuration from {}", config_path.display());

    let invite_server = match InviteServer::builder().config(config).start_server().await {
        Ok(invite_server) => invite_server,
        Err(err) => {
            error!("Failed to start invite server: {}", err);
            return Err(err);
        }
    };

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    invite_server.signals.stop();
    Ok(())
}
