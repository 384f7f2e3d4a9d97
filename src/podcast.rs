use chrono::{Local, NaiveDate, TimeZone};

use crate::GENERATOR_STR;

/// Minutes a feed reader should wait before asking for the feed again.
pub const REFRESH_INTERVAL_MINUTES: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMetadata {
  pub name: String,
  pub author: String,
  pub description: String,
  pub image_url: Option<String>,
  pub site_url: String,
  pub refresh_interval_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Podcast {
  pub name: String,
  pub author: String,
  pub description: String,
  pub image_url: Option<String>,
  pub site_url: String,
  pub refresh_interval_minutes: u32,
  pub episodes: Vec<Episode>,
}

impl Podcast {
  pub fn new(metadata: ChannelMetadata, episodes: Vec<Episode>) -> Self {
    let ChannelMetadata {
      name,
      author,
      description,
      image_url,
      site_url,
      refresh_interval_minutes,
    } = metadata;

    Self {
      name,
      author,
      description,
      image_url,
      site_url,
      refresh_interval_minutes,
      episodes,
    }
  }

  pub fn to_xml(self) -> crate::Result<Vec<u8>> {
    let channel: rss::Channel = self.into();
    let mut output = Vec::new();
    channel.pretty_write_to(&mut output, b' ', 2)?;
    Ok(output)
  }
}

impl From<Podcast> for rss::Channel {
  fn from(podcast: Podcast) -> Self {
    let itunes_ext =
      rss::extension::itunes::ITunesChannelExtensionBuilder::default()
        .author(Some(podcast.author))
        .image(podcast.image_url.clone())
        .summary(Some(podcast.description.clone()))
        .build();

    let image = podcast.image_url.map(|url| {
      rss::ImageBuilder::default()
        .url(url)
        .title(podcast.name.clone())
        .link(podcast.site_url.clone())
        .build()
    });

    let mut channel = rss::ChannelBuilder::default()
      .title(podcast.name)
      .description(podcast.description)
      .link(podcast.site_url)
      .ttl(Some(podcast.refresh_interval_minutes.to_string()))
      .image(image)
      .itunes_ext(Some(itunes_ext))
      .generator(Some(GENERATOR_STR.to_owned()))
      .build();

    for episode in podcast.episodes {
      channel.items.push(episode.into());
    }

    channel
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
  pub id: String,
  pub title: String,
  pub audio_url: String,
  pub description: String,
  pub published_at: NaiveDate,
  pub image_url: Option<String>,
}

impl From<Episode> for rss::Item {
  fn from(episode: Episode) -> Self {
    let enclosure = rss::EnclosureBuilder::default()
      .url(episode.audio_url)
      .mime_type("audio/mpeg".to_owned())
      .build();

    let itunes =
      rss::extension::itunes::ITunesItemExtensionBuilder::default()
        .summary(Some(episode.description.clone()))
        .image(episode.image_url)
        .build();

    rss::Item {
      title: Some(episode.title),
      pub_date: Some(local_midnight_rfc2822(episode.published_at)),
      guid: Some(rss::Guid {
        value: episode.id,
        permalink: false,
      }),
      description: Some(episode.description),
      itunes_ext: Some(itunes),
      enclosure: Some(enclosure),
      ..Default::default()
    }
  }
}

fn local_midnight_rfc2822(date: NaiveDate) -> String {
  let midnight = date.and_time(chrono::NaiveTime::MIN);
  match Local.from_local_datetime(&midnight).earliest() {
    Some(dt) => dt.to_rfc2822(),
    // midnight skipped by a DST jump; UTC keeps the calendar day
    None => midnight.and_utc().to_rfc2822(),
  }
}
