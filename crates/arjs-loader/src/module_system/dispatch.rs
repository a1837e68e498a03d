// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Identifier classification and resolution.
//!
//! An identifier is classified by its leading characters, in this order:
//!
//! | prefix                | kind          | resolves to                       |
//! |-----------------------|---------------|-----------------------------------|
//! | `.`, `/`, `..`        | relative      | joined onto the base location     |
//! | `:`                   | literal key   | the rest, verbatim                |
//! | `cache:`              | cache ref     | `""` if empty, else the rest      |
//! | `ar:`                 | namespace     | the identifier itself             |
//! | `text:`               | text          | the rest                          |
//! | anything else         | bare package  | joined onto the CDN, if any       |

use std::iter;

/// Prefix of a literal cache key
pub const LITERAL_PREFIX: &str = ":";
/// Prefix of a cache reference
pub const CACHE_PREFIX: &str = "cache:";
/// Prefix of the loader's own namespace
pub const NAMESPACE_PREFIX: &str = "ar:";
/// Prefix forcing a raw text fetch
pub const TEXT_PREFIX: &str = "text:";

/// A parsed module identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier<'a> {
    /// Path relative to the base location (whole identifier)
    Relative(&'a str),
    /// Literal cache key (prefix stripped)
    LiteralKey(&'a str),
    /// Cache reference (prefix stripped)
    CacheRef(&'a str),
    /// Loader namespace key (whole identifier)
    Namespace(&'a str),
    /// Raw text request (prefix stripped)
    Text(&'a str),
    /// Package name resolved against the CDN (whole identifier)
    BarePackage(&'a str),
}

impl<'a> Identifier<'a> {
    /// Classify an identifier by its leading characters
    pub fn parse(identifier: &'a str) -> Self {
        if identifier.starts_with(['.', '/']) {
            Identifier::Relative(identifier)
        } else if let Some(key) = identifier.strip_prefix(LITERAL_PREFIX) {
            Identifier::LiteralKey(key)
        } else if let Some(rest) = identifier.strip_prefix(CACHE_PREFIX) {
            Identifier::CacheRef(rest)
        } else if identifier.starts_with(NAMESPACE_PREFIX) {
            Identifier::Namespace(identifier)
        } else if let Some(rest) = identifier.strip_prefix(TEXT_PREFIX) {
            Identifier::Text(rest)
        } else {
            Identifier::BarePackage(identifier)
        }
    }
}

/// Base and CDN locations identifiers resolve against.
///
/// Each is a list of fragments; the first is the root and the rest are joined
/// onto it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locations {
    /// Root for relative identifiers
    pub base: Vec<String>,
    /// Root for bare package names; empty when no CDN is configured
    pub cdn: Vec<String>,
}

/// Resolve an identifier to a location or cache key.
///
/// Returns `None` for a bare package name when no CDN is configured.
pub fn resolve(identifier: &str, locations: &Locations) -> Option<String> {
    let mut current = identifier;

    // Each pass strips a prefix, so this terminates
    loop {
        match Identifier::parse(current) {
            Identifier::Relative(path) => return Some(join_onto(&locations.base, path)),
            Identifier::LiteralKey(key) => return Some(key.to_string()),
            Identifier::CacheRef("") => return Some(String::new()),
            Identifier::CacheRef(rest) | Identifier::Text(rest) => current = rest,
            Identifier::Namespace(key) => return Some(key.to_string()),
            Identifier::BarePackage(name) => {
                return (!locations.cdn.is_empty()).then(|| join_onto(&locations.cdn, name));
            }
        }
    }
}

fn join_onto(root: &[String], fragment: &str) -> String {
    arjs_url::join(root.iter().map(String::as_str).chain(iter::once(fragment)))
}
