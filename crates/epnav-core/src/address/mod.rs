//! Episode addresses and the routes derived from them

use serde::{Deserialize, Serialize};
use std::fmt;

mod codec;
mod route;

pub use codec::{derive_address, parse_address, query_param};
pub use route::{parse_read_route, parse_source_url, AddressError, MAX_EPISODE, MAX_SERIES_ID_LEN};

/// Route prefix for reading a single episode
pub const READ_ROUTE_PREFIX: &str = "/read";

/// Directory the server stores generated episode books under
pub const BOOK_DIR: &str = "narou";

/// Fragment appended to a route so the destination opens at its final unit
pub const EDGE_FOOT_FRAGMENT: &str = "#bibi(edge=foot)";

/// Marker looked for in the location fragment on arrival
pub const EDGE_FOOT_MARKER: &str = "edge=foot";

/// Identifies one episode within a series
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeAddress {
    pub series_id: String,
    pub episode: u32,
}

impl EpisodeAddress {
    pub fn new(series_id: impl Into<String>, episode: u32) -> Self {
        Self {
            series_id: series_id.into(),
            episode,
        }
    }

    /// File name of the generated book, `{series_id}_{episode}.epub`
    pub fn book_file(&self) -> String {
        format!("{}_{}.epub", self.series_id, self.episode)
    }

    /// Value of the reader's `book` query parameter for this episode
    pub fn book_param(&self) -> String {
        format!("{}/{}", BOOK_DIR, self.book_file())
    }

    /// Reader location query a read route redirects to
    pub fn reader_location(&self) -> String {
        format!("?book={}", self.book_param())
    }

    /// `/read/{series_id}/{episode}`
    pub fn read_route(&self) -> String {
        format!("{}/{}/{}", READ_ROUTE_PREFIX, self.series_id, self.episode)
    }

    /// The neighbouring episode in `direction`, if there is one
    pub fn offset(&self, direction: Direction) -> Option<EpisodeAddress> {
        let episode = match direction {
            Direction::Forward => self.episode.checked_add(1)?,
            Direction::Backward => self.episode.checked_sub(1)?,
        };
        if episode < 1 {
            return None;
        }
        Some(EpisodeAddress::new(self.series_id.clone(), episode))
    }
}

impl fmt::Display for EpisodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.series_id, self.episode)
    }
}

/// Direction of a cross-document move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Towards the next episode (+1)
    Forward,
    /// Towards the previous episode (-1)
    Backward,
}

impl Direction {
    pub fn step(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Where the destination document should open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeHint {
    /// Scroll to the final navigable unit on arrival
    Foot,
}

impl EdgeHint {
    pub fn fragment(self) -> &'static str {
        match self {
            EdgeHint::Foot => EDGE_FOOT_FRAGMENT,
        }
    }

    /// Detect a hint in a location fragment (with or without the leading `#`)
    pub fn from_fragment(fragment: &str) -> Option<EdgeHint> {
        fragment.contains(EDGE_FOOT_MARKER).then_some(EdgeHint::Foot)
    }
}

/// A full-document navigation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTarget {
    pub address: EpisodeAddress,
    pub edge: Option<EdgeHint>,
}

impl NavigationTarget {
    pub fn url(&self) -> String {
        match self.edge {
            Some(edge) => format!("{}{}", self.address.read_route(), edge.fragment()),
            None => self.address.read_route(),
        }
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}
