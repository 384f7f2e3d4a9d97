use std::sync::Arc;

use axum::{routing::get, Router};
use tracing_subscriber::EnvFilter;

mod config;
mod date;
mod error;
mod feed;
mod podcast;
mod profile;
mod source;
mod util;

pub use error::{Error, Result};

use crate::{
  config::Config,
  feed::AppState,
  profile::SiteProfile,
  source::{http_client, Ivoox},
};

pub const GENERATOR_STR: &str = concat!(
  env!("CARGO_PKG_NAME"),
  " ",
  env!("CARGO_PKG_VERSION")
);

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .init();

  let config = Config::from_env()?;

  let profile = match &config.site_profile {
    Some(path) => {
      tracing::info!("loading site profile from {}", path.display());
      SiteProfile::from_json_file(path)?
    }
    None => SiteProfile::ivoox(),
  };

  let source = Ivoox::new(http_client(config.fetch_timeout)?, profile)?
    .with_concurrency(config.episode_concurrency)
    .with_failure_policy(config.failure_policy);

  let state = AppState {
    source: Arc::new(source),
    public_url: config.public_url.as_str().into(),
  };

  let app = Router::new()
    .route("/health", get(health))
    .route("/get-podcast", get(feed::channel_podcast_url::<Ivoox>))
    .route("/channel/:channel_name", get(feed::channel_podcast_xml::<Ivoox>))
    .with_state(state);

  tracing::info!("listening on {}", config.listen_addr);

  axum::Server::try_bind(&config.listen_addr)
    .map_err(io_error)?
    .serve(app.into_make_service())
    .await
    .map_err(io_error)?;

  Ok(())
}

fn io_error(e: impl std::error::Error + Send + Sync + 'static) -> Error {
  Error::Io(std::io::Error::other(e))
}

async fn health() -> &'static str {
  "ok"
}
