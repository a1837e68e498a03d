// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the module loader

use std::fmt;
use thiserror::Error;

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors that can occur while resolving, fetching or evaluating a module
#[derive(Debug, Error)]
pub enum LoadError {
    /// Bare package name with no CDN configured
    #[error("Can't require library/package '{0}', reason: no cdn has been set")]
    UnresolvableIdentifier(String),

    /// Literal cache key that is not in the cache
    #[error("Can't find module '{0}'")]
    ModuleNotFound(String),

    /// Alias source is not in the cache
    #[error("Can't alias '{alias}' to '{key}': module is not cached")]
    AliasSourceMissing {
        /// Alias that was requested
        alias: String,
        /// Resolved key of the missing source
        key: String,
    },

    /// Response is not a redirect, JSON, or executable text
    #[error("Response from '{url}' (HTTP {status}) isn't a redirect, json, or string")]
    UnexpectedResponseKind {
        /// Requested location
        url: String,
        /// Response status code
        status: u16,
    },

    /// Loaded code threw while executing
    #[error("Error evaluating module '{key}': {source}")]
    Evaluation {
        /// Cache key of the module
        key: String,
        /// Error raised by the sandbox, stack already rewritten
        #[source]
        source: ScriptError,
    },

    /// Transport failure
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// JSON body failed to parse
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl LoadError {
    /// Create an unresolvable identifier error
    pub fn unresolvable(identifier: impl Into<String>) -> Self {
        Self::UnresolvableIdentifier(identifier.into())
    }

    /// Create a module not found error
    pub fn module_not_found(key: impl Into<String>) -> Self {
        Self::ModuleNotFound(key.into())
    }
}

/// Errors raised by a [`Fetch`](crate::fetch::Fetch) implementation
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Local file error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Location could not be parsed as a URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No transport for this scheme
    #[error("Unsupported scheme in '{0}'")]
    UnsupportedScheme(String),
}

/// Errors raised while loading [`LoaderConfig`](crate::config::LoaderConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// An exception thrown by evaluated module code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    /// Error message
    pub message: String,
    /// Stack trace, one frame per line after the message line
    pub stack: String,
}

impl ScriptError {
    /// Create an error with a message and stack
    pub fn new(message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: stack.into(),
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ScriptError {}
