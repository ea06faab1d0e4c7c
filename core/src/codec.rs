//! Shared-link codec.
//!
//! A finished result travels as three query parameters:
//!   a — archetype key
//!   c — candidate id
//!   p — compatibility, one decimal
//!
//! Links are plain and spoofable. Decoding checks that the archetype key
//! and the candidate id both exist and never yields a partial result. The
//! pair is not cross-checked: a result picked by the fallback candidate
//! rule must survive its own share link.

use crate::{
    archetype::Archetype,
    catalog::Catalog,
    compatibility::Compatibility,
    error::LinkError,
    types::EntityId,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub const PARAM_ARCHETYPE: &str = "a";
pub const PARAM_CANDIDATE: &str = "c";
pub const PARAM_COMPATIBILITY: &str = "p";

/// The outcome of a completed quiz or a decoded link. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub archetype:     Archetype,
    pub compatibility: Compatibility,
    pub candidate_id:  EntityId,
}

/// Encode as `a=..&c=..&p=..`.
pub fn encode(result: &SessionResult) -> String {
    encode_params(&result_params(result))
}

/// Decode from a query string, a bare `?query`, or a full URL.
/// Parameter order and unrelated parameters do not matter.
pub fn decode(query: &str, catalog: &Catalog) -> Result<SessionResult, LinkError> {
    let params = parse_query(query);
    let find = |key: &'static str| -> Result<&str, LinkError> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .ok_or(LinkError::MissingParam(key))
    };

    let archetype_raw = find(PARAM_ARCHETYPE)?;
    let candidate_raw = find(PARAM_CANDIDATE)?;
    let compatibility_raw = find(PARAM_COMPATIBILITY)?;

    let archetype = Archetype::from_key(archetype_raw)
        .ok_or_else(|| LinkError::UnknownArchetype(archetype_raw.to_string()))?;

    if catalog.candidate(candidate_raw).is_none() {
        return Err(LinkError::UnknownCandidate(candidate_raw.to_string()));
    }

    let compatibility: Compatibility = compatibility_raw
        .parse()
        .map_err(|_| LinkError::InvalidCompatibility(compatibility_raw.to_string()))?;

    Ok(SessionResult {
        archetype,
        compatibility,
        candidate_id: candidate_raw.to_string(),
    })
}

/// `base_url` with `a`, `c` and `p` set. Existing values of those three
/// are replaced; other parameters and any fragment are kept.
pub fn share_link(base_url: &str, result: &SessionResult) -> String {
    let (without_fragment, fragment) = match base_url.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (base_url, None),
    };
    let (path, query) = match without_fragment.split_once('?') {
        Some((path, query)) => (path, query),
        None => (without_fragment, ""),
    };

    let mut params: Vec<(String, String)> = parse_pairs(query)
        .into_iter()
        .filter(|(k, _)| {
            k != PARAM_ARCHETYPE && k != PARAM_CANDIDATE && k != PARAM_COMPATIBILITY
        })
        .collect();
    params.extend(result_params(result));

    let mut link = format!("{path}?{}", encode_params(&params));
    if let Some(frag) = fragment {
        link.push('#');
        link.push_str(frag);
    }
    link
}

/// The text handed to a share sheet.
pub fn share_message(result: &SessionResult, link: &str) -> String {
    format!(
        "My canon event:\nArchetype: {}\nCompatibility: {}%\n{}\n",
        result.archetype.label(),
        result.compatibility,
        link
    )
}

fn result_params(result: &SessionResult) -> Vec<(String, String)> {
    vec![
        (PARAM_ARCHETYPE.to_string(), result.archetype.key().to_string()),
        (PARAM_CANDIDATE.to_string(), result.candidate_id.clone()),
        (PARAM_COMPATIBILITY.to_string(), result.compatibility.to_string()),
    ]
}

fn encode_params(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Split a query into decoded key/value pairs. Accepts a full URL, a
/// leading `?`, `+` for spaces, and keys without `=` (empty value).
/// Lookups use the first occurrence of a key.
pub fn parse_query(input: &str) -> Vec<(String, String)> {
    let without_fragment = input.split('#').next().unwrap_or_default();
    let query = match without_fragment.split_once('?') {
        Some((_, q)) => q,
        None if without_fragment.contains('=') => without_fragment,
        None => "",
    };
    parse_pairs(query)
}

fn parse_pairs(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(k), decode_component(v))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced.into_owned(),
    }
}
