mod api;
mod trace;

#[cfg(test)]
mod tests;

use tokio::signal;

use crate::api::config::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  liblinkage::init();

  let config = Config::from_env()?;
  let _guards = trace::init_tracing(&config, std::io::stdout());
  let app = api::routes(&config)?;
  let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;

  tracing::info!(linkage = env!("CARGO_PKG_VERSION"), "listening on {}", listener.local_addr()?.to_string());

  axum::serve(listener, app).with_graceful_shutdown(shutdown()).await?;

  Ok(())
}

async fn shutdown() {
  let ctrl_c = async {
    signal::ctrl_c().await.expect("failed to install ^C handler");
  };

  let terminate = async {
    signal::unix::signal(signal::unix::SignalKind::terminate())
      .expect("failed to install terminate signal handler")
      .recv()
      .await;
  };

  tokio::select! {
      () = ctrl_c => tracing::info!("received ^C, initiating shutdown"),
      () = terminate => tracing::info!("received terminate signal, initiating shutdown"),
  }
}
