//! Location query parsing and neighbour derivation

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;

use super::{Direction, EdgeHint, EpisodeAddress, NavigationTarget};

static BOOK_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)_(\d+)\.epub$").expect("book file pattern compiles"));

/// Look up the first value of `name` in a URL query string.
///
/// Accepts the query with or without its leading `?`. Keys and values are
/// form-decoded (`+` is a space, percent escapes are resolved).
pub fn query_param(query: &str, name: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key) == name).then(|| decode_component(value))
        })
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Resolve the episode address encoded in the reader's location query.
///
/// The `book` parameter holds a path whose last segment is
/// `{series_id}_{episode}.epub`.
pub fn parse_address(location_query: &str) -> Option<EpisodeAddress> {
    let book = query_param(location_query, "book")?;
    let file_name = book.rsplit('/').next().filter(|segment| !segment.is_empty())?;
    let captures = BOOK_FILE.captures(file_name)?;
    let episode: u32 = captures[2].parse().ok()?;
    if episode < 1 {
        return None;
    }
    Some(EpisodeAddress::new(&captures[1], episode))
}

/// Compute the navigation target one episode away from `current`.
///
/// Backward targets ask the destination to open at its final unit so the
/// reader continues from where the previous episode ends.
pub fn derive_address(current: &EpisodeAddress, direction: Direction) -> Option<NavigationTarget> {
    let address = current.offset(direction)?;
    let edge = match direction {
        Direction::Forward => None,
        Direction::Backward => Some(EdgeHint::Foot),
    };
    Some(NavigationTarget { address, edge })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_from_book_param() {
        let address = parse_address("?book=narou/abc_3.epub").unwrap();
        assert_eq!(address, EpisodeAddress::new("abc", 3));

        // Leading `?` is optional and other params are skipped
        let address = parse_address("lang=ja&book=narou%2Fn9669bk_120.epub").unwrap();
        assert_eq!(address, EpisodeAddress::new("n9669bk", 120));
    }

    #[test]
    fn test_series_id_keeps_inner_underscores() {
        let address = parse_address("?book=a_b_c_7.epub").unwrap();
        assert_eq!(address.series_id, "a_b_c");
        assert_eq!(address.episode, 7);
    }

    #[test]
    fn test_parse_address_rejects_unrecognized_locations() {
        for query in [
            "",
            "?",
            "?book=",
            "?other=narou/abc_3.epub",
            "?book=narou/",
            "?book=narou/abc.epub",
            "?book=narou/abc_3.zip",
            "?book=narou/_3.epub",
            "?book=narou/abc_x3.epub",
            "?book=narou/abc_0.epub",
            "?book=narou/abc_99999999999.epub",
        ] {
            assert_eq!(parse_address(query), None, "query {query:?}");
        }
    }

    #[test]
    fn test_first_book_param_wins() {
        let address = parse_address("?book=x_1.epub&book=y_2.epub").unwrap();
        assert_eq!(address, EpisodeAddress::new("x", 1));
    }

    #[test]
    fn test_derive_address() {
        let current = EpisodeAddress::new("abc", 3);

        let next = derive_address(&current, Direction::Forward).unwrap();
        assert_eq!(next.url(), "/read/abc/4");

        let previous = derive_address(&current, Direction::Backward).unwrap();
        assert_eq!(previous.url(), "/read/abc/2#bibi(edge=foot)");

        let first = EpisodeAddress::new("abc", 1);
        assert_eq!(derive_address(&first, Direction::Backward), None);
    }

    #[test]
    fn test_advance_then_retreat_returns_to_start() {
        for episode in 1..=20 {
            let start = EpisodeAddress::new("series", episode);
            let next = derive_address(&start, Direction::Forward).unwrap();
            let back = derive_address(&next.address, Direction::Backward).unwrap();
            assert_eq!(back.address, start);
        }
    }
}
