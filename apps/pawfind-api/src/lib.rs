pub mod routes;
pub mod state;

use std::{future, net::SocketAddr, path::PathBuf};

use axum::Router;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = pawfind_cli::VERSION,
	rename_all = "kebab",
	styles = pawfind_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = pawfind_config::load(&args.config)?;

	init_tracing(&config.service.log_level);

	tracing::info!(
		version = pawfind_cli::VERSION,
		config = %args.config.display(),
		"Starting pawfind API."
	);

	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let admin_addr: SocketAddr = config.service.admin_bind.parse()?;
	let state = AppState::new(config).await?;

	tokio::try_join!(
		serve("HTTP", http_addr, routes::router(state.clone())),
		serve("Admin", admin_addr, routes::admin_router(state)),
	)?;

	tracing::info!("Servers stopped.");

	Ok(())
}

async fn serve(label: &'static str, addr: SocketAddr, app: Router) -> color_eyre::Result<()> {
	let listener = TcpListener::bind(addr).await?;

	tracing::info!(%addr, "{label} server listening.");

	axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

	Ok(())
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		tracing::warn!(error = %err, "Shutdown signal unavailable; serving until killed.");

		future::pending::<()>().await;
	}
}

fn init_tracing(log_level: &str) {
	let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}
