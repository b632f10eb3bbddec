//! Read routes and source URLs accepted by the episode server

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::{EpisodeAddress, READ_ROUTE_PREFIX};

/// Longest series id the server accepts
pub const MAX_SERIES_ID_LEN: usize = 20;

/// Highest episode number the server accepts
pub const MAX_EPISODE: u32 = 10_000;

static SOURCE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://ncode\.syosetu\.com/([a-zA-Z0-9]+)(?:/(\d+))?/?")
        .expect("source url pattern compiles")
});

/// Errors produced while validating an episode route or URL
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("not a read route: {0}")]
    NotARoute(String),

    #[error("not a recognized source URL: {0}")]
    UnrecognizedUrl(String),

    #[error("invalid series id: {0:?}")]
    InvalidSeriesId(String),

    #[error("invalid episode number: {0:?}")]
    InvalidEpisode(String),

    #[error("episode {0} out of range (1..=10000)")]
    EpisodeOutOfRange(u64),
}

fn validate(series_id: &str, episode: &str) -> Result<EpisodeAddress, AddressError> {
    let id_ok = !series_id.is_empty()
        && series_id.len() <= MAX_SERIES_ID_LEN
        && series_id.chars().all(|c| c.is_ascii_alphanumeric());
    if !id_ok {
        return Err(AddressError::InvalidSeriesId(series_id.to_string()));
    }

    if episode.is_empty() || !episode.chars().all(|c| c.is_ascii_digit()) {
        return Err(AddressError::InvalidEpisode(episode.to_string()));
    }
    let number: u64 = episode
        .parse()
        .map_err(|_| AddressError::InvalidEpisode(episode.to_string()))?;
    if !(1..=u64::from(MAX_EPISODE)).contains(&number) {
        return Err(AddressError::EpisodeOutOfRange(number));
    }

    // Bounded by MAX_EPISODE above
    Ok(EpisodeAddress::new(series_id, number as u32))
}

/// Parse `/read/{series_id}/{episode}` into an address.
pub fn parse_read_route(path: &str) -> Result<EpisodeAddress, AddressError> {
    let rest = path
        .strip_prefix(READ_ROUTE_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| AddressError::NotARoute(path.to_string()))?;

    let mut segments = rest.split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(series_id), Some(episode), None) => validate(series_id, episode),
        _ => Err(AddressError::NotARoute(path.to_string())),
    }
}

/// Parse a series page URL (`https://ncode.syosetu.com/{id}/{episode}/`).
///
/// A URL without an episode segment points at the series table of contents
/// and resolves to episode 1.
pub fn parse_source_url(url: &str) -> Result<EpisodeAddress, AddressError> {
    let url = url.trim();
    let captures = SOURCE_URL
        .captures(url)
        .ok_or_else(|| AddressError::UnrecognizedUrl(url.to_string()))?;
    let episode = captures.get(2).map_or("1", |m| m.as_str());
    validate(&captures[1], episode)
}
