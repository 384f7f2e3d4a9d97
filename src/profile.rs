//! Site-specific literals for scraping a podcast host.
//!
//! The selectors mirror the host's current markup and break whenever the
//! markup changes, which is why they live in data instead of in the
//! extraction code. A profile can be loaded from a JSON file to follow a
//! markup change without a rebuild.

use std::path::Path;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const NAME_PLACEHOLDER: &str = "{name}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
  /// Search results page, with `{name}` standing for the normalized
  /// channel name.
  pub search_url: String,
  pub search_result_link: String,

  pub channel_name: String,
  pub channel_author: String,
  pub channel_description: String,
  pub channel_image: String,

  pub episode_link: String,
  /// Prefixed to the relative `href` of every episode anchor.
  pub episode_origin: String,
  pub episode_description: String,
  pub episode_date: String,
  pub episode_image: String,

  pub audio_url_template: String,
  pub audio_id_placeholder: String,

  pub link_attr: String,
  pub image_attr: String,
}

impl SiteProfile {
  pub fn ivoox() -> Self {
    Self {
      search_url: "https://www.ivoox.com/{name}_sw_1_1.html".into(),
      search_result_link: ".modulo-type-programa .header-modulo a".into(),
      channel_name: "h1".into(),
      channel_author: ".d-flex > .text-medium a".into(),
      channel_description: ".d-flex > .d-none > .text-truncate-3".into(),
      channel_image: ".d-flex > .image-wrapper.pr-2 > img".into(),
      episode_link: ".pl-1 > .d-flex > .d-flex > .w-100 > a".into(),
      episode_origin: "https://ivoox.com".into(),
      episode_description: "div.mb-3 > div > p.text-truncate-5".into(),
      episode_date: "span.text-medium.ml-sm-1".into(),
      episode_image: ".d-flex > .image-wrapper.pr-2 > img".into(),
      audio_url_template: "https://www.ivoox.com/listenembeded_mn_12345678_1.mp3?source=EMBEDEDHTML5".into(),
      audio_id_placeholder: "12345678".into(),
      link_attr: "href".into(),
      image_attr: "data-lazy-src".into(),
    }
  }

  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
  }

  pub fn search_url_for(&self, normalized_name: &str) -> String {
    self.search_url.replace(NAME_PLACEHOLDER, normalized_name)
  }

  pub fn compile(&self) -> Result<Selectors> {
    Ok(Selectors {
      search_result_link: compile_selector(&self.search_result_link)?,
      channel_name: compile_selector(&self.channel_name)?,
      channel_author: compile_selector(&self.channel_author)?,
      channel_description: compile_selector(&self.channel_description)?,
      channel_image: compile_selector(&self.channel_image)?,
      episode_link: compile_selector(&self.episode_link)?,
      episode_description: compile_selector(&self.episode_description)?,
      episode_date: compile_selector(&self.episode_date)?,
      episode_image: compile_selector(&self.episode_image)?,
    })
  }
}

/// Selectors of a [`SiteProfile`], parsed once up front.
#[derive(Debug, Clone)]
pub struct Selectors {
  pub search_result_link: Selector,
  pub channel_name: Selector,
  pub channel_author: Selector,
  pub channel_description: Selector,
  pub channel_image: Selector,
  pub episode_link: Selector,
  pub episode_description: Selector,
  pub episode_date: Selector,
  pub episode_image: Selector,
}

fn compile_selector(selector: &str) -> Result<Selector> {
  Selector::parse(selector).map_err(|e| Error::InvalidSelector {
    selector: selector.to_owned(),
    reason: format!("{e:?}"),
  })
}

// Text of every match joined together, then trimmed.
pub fn select_text(doc: &Html, selector: &Selector) -> String {
  doc
    .select(selector)
    .flat_map(|el| el.text())
    .collect::<String>()
    .trim()
    .to_owned()
}

// Attribute of the first match only.
pub fn select_attr<'a>(
  doc: &'a Html,
  selector: &Selector,
  attr: &str,
) -> Option<&'a str> {
  doc.select(selector).next().and_then(|el| el.value().attr(attr))
}

pub fn element_text(el: ElementRef<'_>) -> String {
  el.text().collect::<String>().trim().to_owned()
}
