use thiserror::Error;

const VANITY_MARKER: &str = "/id/";
const PROFILES_MARKER: &str = "/profiles/";

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Invalid Steam URL format")]
pub struct InvalidProfileUrl;

/// The two accepted profile URL shapes.
///
/// `.../id/<vanity>[/...]` needs a `ResolveVanityURL` call; `.../profiles/<steamid>[/...]`
/// already carries the identifier. The vanity shape is checked first, and the
/// segment ends at the next `/`. Anything else, or an empty segment, is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileUrl {
    Vanity(String),
    SteamId(String),
}

impl ProfileUrl {
    pub fn parse(raw: &str) -> Result<Self, InvalidProfileUrl> {
        if let Some(segment) = segment_after(raw, VANITY_MARKER) {
            return non_empty(segment).map(|s| Self::Vanity(s.to_string()));
        }
        if let Some(segment) = segment_after(raw, PROFILES_MARKER) {
            return non_empty(segment).map(|s| Self::SteamId(s.to_string()));
        }
        Err(InvalidProfileUrl)
    }
}

fn segment_after<'a>(raw: &'a str, marker: &str) -> Option<&'a str> {
    let (_, rest) = raw.split_once(marker)?;
    Some(rest.split('/').next().unwrap_or(rest))
}

fn non_empty(segment: &str) -> Result<&str, InvalidProfileUrl> {
    if segment.is_empty() { Err(InvalidProfileUrl) } else { Ok(segment) }
}
