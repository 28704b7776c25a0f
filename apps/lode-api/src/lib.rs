pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(version, rename_all = "kebab")]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = lode_config::load(&args.config)?;

	init_tracing(&config)?;

	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let idle = Duration::from_secs(config.rate_limit.idle_entry_seconds);
	let state = AppState::new(config).await?;

	spawn_rate_limit_sweep(&state, idle);

	let app = routes::router(state).into_make_service_with_connect_info::<SocketAddr>();
	let listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, "HTTP server listening.");

	axum::serve(listener, app).await?;

	Ok(())
}

/// Periodically drops idle client windows so the limiter's memory stays
/// bounded over long uptimes.
fn spawn_rate_limit_sweep(state: &AppState, idle: Duration) {
	let limiter = state.rate_limiter.clone();

	tokio::spawn(async move {
		let mut ticker = tokio::time::interval(idle);

		// The first tick completes immediately; skip it.
		ticker.tick().await;

		loop {
			ticker.tick().await;
			limiter.cleanup_old_entries(idle);
		}
	});
}

fn init_tracing(config: &lode_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}
