// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Response classification

use crate::fetch::FetchResponse;

/// How a fetched body is to be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// The transport followed a redirect; evaluate as code under the final URL
    Redirect,
    /// Parse as JSON
    Json,
    /// Evaluate as a module body
    Code,
    /// None of the above
    Error,
}

/// Classify `response` to the request for `location`.
///
/// The checks run in a fixed order: redirect, then JSON by extension or
/// content type, then status. A redirected JSON response is a redirect.
pub fn classify(location: &str, response: &FetchResponse) -> ContentKind {
    if response.redirected {
        ContentKind::Redirect
    } else if has_json_extension(location) || response.content_type().is_some_and(is_json_mime) {
        ContentKind::Json
    } else if response.status < 400 {
        ContentKind::Code
    } else {
        ContentKind::Error
    }
}

fn has_json_extension(location: &str) -> bool {
    location
        .rsplit('/')
        .next()
        .is_some_and(|last| last.ends_with(".json"))
}

fn is_json_mime(content_type: &str) -> bool {
    let normalized: String = content_type
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    normalized.contains("application/json") || normalized.contains("text/json")
}
