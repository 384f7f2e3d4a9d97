use std::sync::Arc;

use axum::{
  extract::{Path, Query, State},
  headers::ContentType,
  http::header,
  response::IntoResponse,
  TypedHeader,
};
use serde::Deserialize;
use url::Url;

use crate::{source::SourceChannel, Error, Result};

pub struct AppState<S> {
  pub source: Arc<S>,
  pub public_url: Arc<str>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      source: self.source.clone(),
      public_url: self.public_url.clone(),
    }
  }
}

pub async fn channel_podcast_xml<S: SourceChannel + 'static>(
  State(state): State<AppState<S>>,
  Path(channel_name): Path<String>,
) -> Result<impl IntoResponse> {
  let output = render_feed(&*state.source, &channel_name).await?;

  Ok((
    [(header::CONTENT_TYPE, "application/rss+xml; charset=UTF-8")],
    output,
  ))
}

#[derive(Deserialize)]
pub struct GetPodcastReq {
  name: String,
}

pub async fn channel_podcast_url<S: SourceChannel + 'static>(
  State(state): State<AppState<S>>,
  Query(req): Query<GetPodcastReq>,
) -> Result<impl IntoResponse> {
  let podcast_url = feed_url(&state.public_url, &req.name)?;
  let content_type = TypedHeader(ContentType::text());

  Ok((content_type, podcast_url))
}

async fn render_feed<S: SourceChannel + ?Sized>(
  source: &S,
  channel_name: &str,
) -> Result<Vec<u8>> {
  let podcast = source
    .harvest(channel_name)
    .await?
    .ok_or_else(|| Error::ChannelNotFound(channel_name.to_owned()))?;

  tracing::info!(
    "feed for {:?} has {} episodes",
    podcast.name,
    podcast.episodes.len()
  );
  podcast.to_xml()
}

fn feed_url(public_url: &str, channel_name: &str) -> Result<String> {
  let invalid = || Error::Config(format!("invalid public url {public_url:?}"));

  let mut url = Url::parse(public_url).map_err(|_| invalid())?;
  url
    .path_segments_mut()
    .map_err(|_| invalid())?
    .pop_if_empty()
    .push("channel")
    .push(channel_name.trim());

  Ok(url.into())
}
