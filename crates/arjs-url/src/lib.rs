// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # arjs-url
//!
//! Path-style URL algebra for the arjs module loader.
//!
//! Locations are joined the way filesystem paths are: an absolute URL resets
//! everything, a `/`-rooted fragment resets the path, and relative fragments
//! are walked against the accumulated segments with `.` and `..` resolved.
//!
//! ```
//! use arjs_url::Url;
//!
//! assert_eq!(Url::concat("https://a.com/x/y/", ["../z"]), "https://a.com/x/z");
//! assert_eq!(Url::concat("https://a.com", ["x", "y"]), "https://a.com/x/y");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod location;

pub use location::Location;

use std::fmt;

/// An opaque resolved location.
///
/// Thin wrapper whose string form is the location it was built from. The
/// resolution primitives hang off it as associated functions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Url(String);

impl Url {
    /// Wrap a location string
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The wrapped location
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// See [`find_protocol`]
    pub fn find_protocol(url: &str) -> Option<&str> {
        find_protocol(url)
    }

    /// See [`find_pathnames`]
    pub fn find_pathnames(url: &str, remove_host: bool) -> Vec<&str> {
        find_pathnames(url, remove_host)
    }

    /// See [`concat`]
    pub fn concat<I, S>(base: &str, fragments: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        concat(base, fragments)
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Url {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl AsRef<str> for Url {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract the leading scheme of a location, separator included.
///
/// A `://` anywhere in the string wins and yields everything up to and
/// including it. Otherwise a leading run of ASCII letters followed by `:`
/// (`mailto:`) is returned.
pub fn find_protocol(url: &str) -> Option<&str> {
    if let Some(index) = url.find("://") {
        return Some(&url[..index + 3]);
    }

    let letters = url
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();

    (letters > 0 && url.as_bytes().get(letters) == Some(&b':')).then(|| &url[..=letters])
}

/// Split a location into its `/`-separated pieces, protocol removed.
///
/// When a protocol is present the first piece is the host; it is dropped
/// unless `remove_host` is false.
pub fn find_pathnames(url: &str, remove_host: bool) -> Vec<&str> {
    let protocol = find_protocol(url);
    let mut pathnames: Vec<&str> = url[protocol.map_or(0, str::len)..].split('/').collect();

    if protocol.is_some_and(|p| !p.is_empty()) && remove_host {
        pathnames.remove(0);
    }

    pathnames
}

/// Join `base` with each fragment, left to right.
pub fn concat<I, S>(base: &str, fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut location = Location::parse(base);
    for fragment in fragments {
        location.push_fragment(fragment.as_ref());
    }
    location.to_string()
}

/// Join a list whose first element is the base and the rest are fragments.
///
/// An empty list yields an empty string.
pub fn join<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parts = parts.into_iter();
    match parts.next() {
        Some(base) => concat(base.as_ref(), parts),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_FRAGMENTS: [&str; 0] = [];

    #[test]
    fn test_find_protocol() {
        assert_eq!(find_protocol("https://a.com/x"), Some("https://"));
        assert_eq!(find_protocol("mailto:someone@a.com"), Some("mailto:"));
        assert_eq!(find_protocol("file:///tmp"), Some("file://"));
        assert_eq!(find_protocol("./lib/index.js"), None);
        assert_eq!(find_protocol("lodash/get"), None);
        assert_eq!(find_protocol("a/b:c"), None);
        assert_eq!(find_protocol(":cache:"), None);
    }

    #[test]
    fn test_find_protocol_double_slash_form_wins() {
        assert_eq!(find_protocol("ar:x://y"), Some("ar:x://"));
    }

    #[test]
    fn test_find_pathnames() {
        assert_eq!(find_pathnames("https://a.com/x/y", true), vec!["x", "y"]);
        assert_eq!(
            find_pathnames("https://a.com/x/y", false),
            vec!["a.com", "x", "y"]
        );
        assert_eq!(find_pathnames("x/y", true), vec!["x", "y"]);
        assert_eq!(find_pathnames("/x", true), vec!["", "x"]);
    }

    #[test]
    fn test_concat_without_fragments_normalizes() {
        assert_eq!(concat("https://a.com//x///y/", NO_FRAGMENTS), "https://a.com/x/y");
        assert_eq!(concat("https://a.com", NO_FRAGMENTS), "https://a.com");

        for sample in ["https://a.com//x/./y", "/a//b/../c", "file:///tmp//m.js", "x/y"] {
            let once = concat(sample, NO_FRAGMENTS);
            assert_eq!(concat(&once, NO_FRAGMENTS), once);
        }
    }

    #[test]
    fn test_concat_absolute_fragment_resets() {
        assert_eq!(concat("https://a.com/x/y", ["https://b.com/z"]), "https://b.com/z");
    }

    #[test]
    fn test_concat_root_relative_keeps_host() {
        assert_eq!(concat("https://a.com/x/y", ["/z/w"]), "https://a.com/z/w");
        assert_eq!(concat("/srv/app", ["/lib"]), "/lib");
        assert_eq!(concat("app/src", ["/lib"]), "/lib");
    }

    #[test]
    fn test_concat_relative_with_dot_segments() {
        assert_eq!(concat("https://a.com/x/y/", ["../z"]), "https://a.com/x/z");
        assert_eq!(concat("https://a.com/x/y", ["./z"]), "https://a.com/x/y/z");
        assert_eq!(concat("/a/b", ["../c"]), "/a/c");
        assert_eq!(concat("https://a.com/x", ["y/."]), "https://a.com/x/y");
    }

    #[test]
    fn test_concat_folds_left_to_right() {
        assert_eq!(concat("https://a.com", ["x", "y"]), "https://a.com/x/y");
        assert_eq!(
            concat("https://a.com/x/y", ["a", "/b", "c"]),
            "https://a.com/b/c"
        );
        assert_eq!(
            concat("https://a.com/x", ["https://b.com", "c", "../d"]),
            "https://b.com/d"
        );
    }

    #[test]
    fn test_concat_collapses_slashes_but_keeps_scheme() {
        assert_eq!(
            concat("https://a.com/", ["x//y", "z///"]),
            "https://a.com/x/y/z"
        );
        assert_eq!(concat("file:///tmp/", ["mods//a.js"]), "file:///tmp/mods/a.js");
    }

    #[test]
    fn test_concat_parent_clamps_at_root() {
        assert_eq!(concat("https://a.com/x", ["../../y"]), "https://a.com/y");
        assert_eq!(concat("https://a.com", [".."]), "https://a.com");
        assert_eq!(concat("/a", ["../../b"]), "/b");
    }

    #[test]
    fn test_concat_cdn_roots() {
        assert_eq!(concat("https://unpkg.com/", ["lodash"]), "https://unpkg.com/lodash");
        assert_eq!(
            concat("https://cdn.jsdelivr.net/npm/", ["lodash@4/get.js"]),
            "https://cdn.jsdelivr.net/npm/lodash@4/get.js"
        );
    }

    #[test]
    fn test_join() {
        assert_eq!(join(["https://h.com", "/app/", "./mod.js"]), "https://h.com/app/mod.js");
        assert_eq!(join(NO_FRAGMENTS), "");
    }

    #[test]
    fn test_url_display() {
        let url = Url::new("https://a.com/x");
        assert_eq!(url.to_string(), "https://a.com/x");
        assert_eq!(url.as_str(), "https://a.com/x");
        assert_eq!(Url::concat(url.as_str(), ["y"]), "https://a.com/x/y");
    }
}
