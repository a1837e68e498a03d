// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Structured form of a location: protocol, host and path segments

use std::fmt;

/// A location broken into its protocol, host and path segments.
///
/// Segments are always normalized: they never contain empty strings, `.` or
/// `..`. A location without a protocol never has a host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Scheme including its separator (`https://`, `mailto:`)
    pub protocol: Option<String>,
    /// Authority segment, only present after a protocol
    pub host: Option<String>,
    /// Whether a protocol-less path starts at `/`
    pub rooted: bool,
    /// Normalized path segments
    pub segments: Vec<String>,
}

impl Location {
    /// Parse a single location string.
    pub fn parse(input: &str) -> Self {
        let mut location = Self::default();
        location.reset_to(input);
        location
    }

    /// Merge one fragment into this location.
    ///
    /// A fragment with its own protocol replaces everything, a fragment
    /// starting with `/` replaces the path, anything else is walked segment by
    /// segment against the current path.
    pub fn push_fragment(&mut self, fragment: &str) {
        if crate::find_protocol(fragment).is_some() {
            self.reset_to(fragment);
        } else if fragment.starts_with('/') {
            self.segments.clear();
            if self.protocol.is_none() {
                self.rooted = true;
            }
            self.walk(fragment);
        } else {
            self.walk(fragment);
        }
    }

    fn reset_to(&mut self, input: &str) {
        let protocol = crate::find_protocol(input);
        let rest = &input[protocol.map_or(0, str::len)..];

        let (host, path) = match protocol {
            Some(_) => match rest.split_once('/') {
                Some((host, path)) => (Some(host), path),
                None => (Some(rest), ""),
            },
            None => (None, rest),
        };

        self.protocol = protocol.map(String::from);
        self.host = host.map(String::from);
        self.rooted = protocol.is_none() && rest.starts_with('/');
        self.segments.clear();
        self.walk(path);
    }

    fn walk(&mut self, path: &str) {
        for segment in path.split('/') {
            match segment {
                "" | "." => continue,
                // Clamped: popping an empty path stays at the root
                ".." => {
                    self.segments.pop();
                }
                segment => self.segments.push(segment.to_string()),
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(protocol) = &self.protocol {
            f.write_str(protocol)?;
        }

        match &self.host {
            Some(host) => {
                f.write_str(host)?;
                if !host.ends_with('/') && !self.segments.is_empty() {
                    f.write_str("/")?;
                }
            }
            None if self.rooted => f.write_str("/")?,
            None => {}
        }

        f.write_str(&self.segments.join("/"))
    }
}
