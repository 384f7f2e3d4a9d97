use std::{net::SocketAddr, path::PathBuf, time::Duration};

use crate::{source::FailurePolicy, Error, Result};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_EPISODE_CONCURRENCY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub listen_addr: SocketAddr,
  pub public_url: String,
  pub fetch_timeout: Option<Duration>,
  /// `None` lets every episode page be fetched at once.
  pub episode_concurrency: Option<usize>,
  pub failure_policy: FailurePolicy,
  pub site_profile: Option<PathBuf>,
}

impl Config {
  pub fn from_env() -> Result<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let listen_addr: SocketAddr = parse_var(
      "LISTEN_ADDR",
      lookup("LISTEN_ADDR").as_deref().unwrap_or(DEFAULT_LISTEN_ADDR),
    )?;

    let public_url = lookup("PUBLIC_URL")
      .map(|url| url.trim_end_matches('/').to_owned())
      .unwrap_or_else(|| format!("http://{listen_addr}"));

    let fetch_timeout = match lookup("FETCH_TIMEOUT_SECS") {
      Some(v) => parse_var::<u64>("FETCH_TIMEOUT_SECS", &v)?,
      None => DEFAULT_FETCH_TIMEOUT_SECS,
    };

    let episode_concurrency = match lookup("EPISODE_CONCURRENCY") {
      Some(v) => parse_var::<usize>("EPISODE_CONCURRENCY", &v)?,
      None => DEFAULT_EPISODE_CONCURRENCY,
    };

    let failure_policy = match lookup("EPISODE_FAILURES") {
      Some(v) => v.parse()?,
      None => FailurePolicy::default(),
    };

    Ok(Self {
      listen_addr,
      public_url,
      fetch_timeout: (fetch_timeout > 0)
        .then(|| Duration::from_secs(fetch_timeout)),
      episode_concurrency: (episode_concurrency > 0)
        .then_some(episode_concurrency),
      failure_policy,
      site_profile: lookup("SITE_PROFILE").map(PathBuf::from),
    })
  }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  value
    .trim()
    .parse()
    .map_err(|e| Error::Config(format!("{key}={value:?}: {e}")))
}
