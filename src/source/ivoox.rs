use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

use crate::{
  date::{fallback_date, parse_spanish_date},
  podcast::{ChannelMetadata, Episode, REFRESH_INTERVAL_MINUTES},
  profile::{element_text, select_attr, select_text, Selectors, SiteProfile},
  util::{join_ordered, try_join_ordered},
  Error, Result,
};

use super::{fetch_html, ChannelPage, FailurePolicy, SourceChannel};

static EPISODE_ID_REGEX: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"\d{6,12}").unwrap());

// scrapes channels hosted on ivoox.com, or any site sharing its markup
// when given a different profile.
pub struct Ivoox {
  client: reqwest::Client,
  profile: SiteProfile,
  selectors: Selectors,
  concurrency: Option<usize>,
  failure_policy: FailurePolicy,
}

impl Ivoox {
  pub fn new(client: reqwest::Client, profile: SiteProfile) -> Result<Self> {
    let selectors = profile.compile()?;

    Ok(Self {
      client,
      profile,
      selectors,
      concurrency: None,
      failure_policy: FailurePolicy::default(),
    })
  }

  /// Caps how many episode pages are fetched at once. `None` fetches
  /// all of them together.
  pub fn with_concurrency(self, concurrency: Option<usize>) -> Self {
    Self {
      concurrency,
      ..self
    }
  }

  pub fn with_failure_policy(self, failure_policy: FailurePolicy) -> Self {
    Self {
      failure_policy,
      ..self
    }
  }

  async fn fetch_episode(&self, link: EpisodeLink) -> Result<Episode> {
    tracing::debug!(
      "retrieving info for episode {} ({})",
      link.title,
      link.url
    );
    let html = fetch_html(&self.client, &link.url).await?;
    parse_episode_page(link, &html, &self.profile, &self.selectors)
  }
}

#[async_trait]
impl SourceChannel for Ivoox {
  async fn locate(&self, channel_name: &str) -> Result<Option<String>> {
    tracing::info!("searching for the program {channel_name:?}");
    let search_url = self
      .profile
      .search_url_for(&normalize_channel_name(channel_name));
    tracing::debug!("search url: {search_url}");

    let html = fetch_html(&self.client, &search_url).await?;
    let channel_url = parse_search_page(&html, &self.profile, &self.selectors);
    tracing::debug!("program url: {channel_url:?}");

    Ok(channel_url)
  }

  async fn fetch_metadata(&self, channel_url: &str) -> Result<ChannelPage> {
    tracing::info!("configuring feed from {channel_url}");
    let html = fetch_html(&self.client, channel_url).await?;
    let metadata =
      parse_channel_page(&html, channel_url, &self.profile, &self.selectors);
    tracing::info!("podcast image: {:?}", metadata.image_url);

    Ok(ChannelPage { metadata, html })
  }

  async fn fetch_episodes(
    &self,
    channel_page_html: &str,
  ) -> Result<Vec<Episode>> {
    let links =
      parse_episode_links(channel_page_html, &self.profile, &self.selectors);
    tracing::debug!("found {} episodes", links.len());

    let futs: Vec<_> = links
      .into_iter()
      .map(|link| self.fetch_episode(link))
      .collect();

    match self.failure_policy {
      FailurePolicy::FailFast => try_join_ordered(futs, self.concurrency).await,
      FailurePolicy::Skip => {
        let episodes = join_ordered(futs, self.concurrency)
          .await
          .into_iter()
          .filter_map(|res| match res {
            Ok(episode) => Some(episode),
            Err(e) => {
              tracing::warn!("skipping episode: {e}");
              None
            }
          })
          .collect();
        Ok(episodes)
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EpisodeLink {
  title: String,
  url: String,
}

fn normalize_channel_name(name: &str) -> String {
  name.trim().to_lowercase().replace(' ', "-")
}

fn parse_search_page(
  html: &str,
  profile: &SiteProfile,
  selectors: &Selectors,
) -> Option<String> {
  let doc = Html::parse_document(html);
  select_attr(&doc, &selectors.search_result_link, &profile.link_attr)
    .map(str::to_owned)
}

fn parse_channel_page(
  html: &str,
  channel_url: &str,
  profile: &SiteProfile,
  selectors: &Selectors,
) -> ChannelMetadata {
  let doc = Html::parse_document(html);

  let image_url =
    select_attr(&doc, &selectors.channel_image, &profile.image_attr)
      .map(str::trim)
      .filter(|url| !url.is_empty())
      .map(str::to_owned);

  ChannelMetadata {
    name: select_text(&doc, &selectors.channel_name),
    author: select_text(&doc, &selectors.channel_author),
    description: select_text(&doc, &selectors.channel_description),
    image_url,
    site_url: channel_url.to_owned(),
    refresh_interval_minutes: REFRESH_INTERVAL_MINUTES,
  }
}

fn parse_episode_links(
  html: &str,
  profile: &SiteProfile,
  selectors: &Selectors,
) -> Vec<EpisodeLink> {
  let doc = Html::parse_document(html);

  doc
    .select(&selectors.episode_link)
    .filter_map(|anchor| {
      let title = element_text(anchor);
      let Some(href) = anchor.value().attr(&profile.link_attr) else {
        tracing::warn!("ignoring episode link without target: {title:?}");
        return None;
      };

      Some(EpisodeLink {
        title,
        url: format!("{}{}", profile.episode_origin, href),
      })
    })
    .collect()
}

fn extract_episode_id(url: &str) -> Result<String> {
  EPISODE_ID_REGEX
    .find(url)
    .map(|m| m.as_str().to_owned())
    .ok_or_else(|| Error::MissingField {
      field: "id",
      url: url.to_owned(),
    })
}

fn audio_url(profile: &SiteProfile, id: &str) -> String {
  // the placeholder is eight digits while ids can be 6 to 12, so other
  // lengths give a url the site probably doesn't serve
  if id.len() != profile.audio_id_placeholder.len() {
    tracing::warn!(
      "episode id {id} doesn't match the {}-digit audio url placeholder",
      profile.audio_id_placeholder.len()
    );
  }

  profile
    .audio_url_template
    .replace(&profile.audio_id_placeholder, id)
}

// image urls are sometimes served through a proxy carrying the real url
// in its `url=` parameter
fn unwrap_image_url(raw: &str) -> &str {
  match raw.split("url=").nth(1) {
    Some(inner) => inner,
    None => raw,
  }
}

fn parse_episode_date(raw: &str, url: &str) -> chrono::NaiveDate {
  let text = raw.split('·').next().unwrap_or_default().trim();
  if text.is_empty() {
    return fallback_date();
  }

  parse_spanish_date(text).unwrap_or_else(|e| {
    tracing::warn!("{e} in {url}, using fallback date");
    fallback_date()
  })
}

fn parse_episode_page(
  link: EpisodeLink,
  html: &str,
  profile: &SiteProfile,
  selectors: &Selectors,
) -> Result<Episode> {
  let id = extract_episode_id(&link.url)?;
  let audio_url = audio_url(profile, &id);

  let doc = Html::parse_document(html);

  let description = select_text(&doc, &selectors.episode_description);
  let published_at =
    parse_episode_date(&select_text(&doc, &selectors.episode_date), &link.url);
  let image_url =
    select_attr(&doc, &selectors.episode_image, &profile.image_attr)
      .map(unwrap_image_url)
      .map(str::trim)
      .filter(|url| !url.is_empty())
      .map(str::to_owned);

  Ok(Episode {
    id,
    title: link.title,
    audio_url,
    description,
    published_at,
    image_url,
  })
}
