//! Share URL construction from `{placeholder}` templates.
//!
//! Templates carry two token forms: `{key}` substitutes the percent-encoded
//! parameter value, `{key-ne}` ("not encoded") substitutes the raw value.
//! Tokens with no matching parameter are stripped, and the query string is
//! rebuilt from the well-formed `key=value` pairs that remain, so a missing
//! parameter never leaves `?foo=` dangling in the final URL.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use std::sync::LazyLock;

use crate::page::ShareParams;

/// Characters escaped by URI component encoding: everything except ASCII
/// alphanumerics and `- _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Placeholder tokens left unresolved after substitution.
static LEFTOVER_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^{}]*\}").unwrap());

/// Well-formed `key=value` query fragments.
static QUERY_PAIR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^=&?]+=[^=&?]+").unwrap());

/// Percent-encode a parameter value with URI component rules.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Substitute share parameters into a URL template.
///
/// Every `{key}` occurrence becomes the percent-encoded value, every
/// `{key-ne}` occurrence the raw value. Whatever tokens remain are
/// stripped and the query string is normalized by [`clean_url`].
pub fn build_url(template: &str, params: &ShareParams) -> String {
    let mut url = template.to_string();

    for (key, value) in params.iter() {
        let token = format!("{{{key}}}");
        if url.contains(&token) {
            url = url.replace(&token, &encode_component(value));
        }

        let raw_token = format!("{{{key}-ne}}");
        if url.contains(&raw_token) {
            url = url.replace(&raw_token, value);
        }
    }

    clean_url(&url)
}

/// Strip unresolved tokens and rebuild the query string.
///
/// The base is everything before the first `?`; the query is rebuilt by
/// scanning the whole token-stripped string for `key=value` fragments
/// (neither side containing `=`, `&` or `?`) and joining them with `&`.
/// Only well-formed pairs survive, which drops the dangling `&foo=`
/// fragments left behind by stripped tokens.
///
/// Raw `-ne` values containing `&`, `=` or `?` get split apart by this
/// scan; percent-encoded values are unaffected since component encoding
/// escapes those characters.
pub fn clean_url(full_url: &str) -> String {
    let stripped = LEFTOVER_TOKEN.replace_all(full_url, "");

    let mut url = stripped.split('?').next().unwrap_or_default().to_string();
    let pairs: Vec<&str> = QUERY_PAIR
        .find_iter(&stripped)
        .map(|m| m.as_str())
        .collect();

    if !pairs.is_empty() {
        url.push('?');
        url.push_str(&pairs.join("&"));
    }

    url
}

// ============================================================================
// tests
// ============================================================================
