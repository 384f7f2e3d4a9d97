mod ivoox;

use std::time::Duration;

use async_trait::async_trait;

pub use ivoox::Ivoox;

use crate::{
  podcast::{ChannelMetadata, Episode, Podcast},
  Error, Result,
};

const USER_AGENT: &str = "Mozilla/5.0";

/// What to do when a single episode page can't be fetched or parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
  /// Any failure discards the whole episode list.
  #[default]
  FailFast,
  /// Failed episodes are logged and left out of the feed.
  Skip,
}

impl std::str::FromStr for FailurePolicy {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "fail-fast" => Ok(Self::FailFast),
      "skip" => Ok(Self::Skip),
      other => Err(Error::Config(format!(
        "unknown episode failure policy {other:?}, expected fail-fast or skip"
      ))),
    }
  }
}

/// A channel page as fetched, with its metadata already extracted.
///
/// The raw HTML is kept so that episodes can be listed from it without a
/// second request.
#[derive(Debug, Clone)]
pub struct ChannelPage {
  pub metadata: ChannelMetadata,
  pub html: String,
}

/// A podcast host that channels can be scraped from.
#[async_trait]
pub trait SourceChannel: Send + Sync {
  /// Maps a channel name to the channel's page, `None` if the site
  /// doesn't know the channel.
  async fn locate(&self, channel_name: &str) -> Result<Option<String>>;

  async fn fetch_metadata(&self, channel_url: &str) -> Result<ChannelPage>;

  async fn fetch_episodes(&self, channel_page_html: &str)
    -> Result<Vec<Episode>>;

  async fn harvest(&self, channel_name: &str) -> Result<Option<Podcast>> {
    tracing::info!("creating feed for {channel_name:?}");

    let Some(channel_url) = self.locate(channel_name).await? else {
      tracing::warn!("channel url not found for {channel_name:?}");
      return Ok(None);
    };
    tracing::info!("channel url is {channel_url}");

    let page = self.fetch_metadata(&channel_url).await?;
    let episodes = self.fetch_episodes(&page.html).await?;

    Ok(Some(Podcast::new(page.metadata, episodes)))
  }
}

pub fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
  let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
  if let Some(timeout) = timeout {
    builder = builder.timeout(timeout);
  }
  Ok(builder.build()?)
}

pub async fn fetch_html(client: &reqwest::Client, url: &str) -> Result<String> {
  let resp = client.get(url).send().await?.error_for_status()?;
  Ok(resp.text().await?)
}
