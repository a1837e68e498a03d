// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # arjs-loader
//!
//! An asynchronous, network-backed module loader.
//!
//! `require(identifier)` resolves the identifier to a location, fetches it,
//! classifies the response (code, JSON or redirect), runs code through an
//! injected sandbox as a CommonJS module body and caches the result, so a
//! second `require` of the same module never fetches again.
//!
//! Transport and evaluation are capabilities supplied by the host:
//!
//! - [`Fetch`] retrieves a location ([`HttpFetcher`] covers `http(s)://` and `file://`)
//! - [`ModuleSandbox`] runs a module body and returns its exports
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use arjs_loader::{HttpFetcher, Loader};
//!
//! let loader = Loader::new(HttpFetcher::new()?, MySandbox::default());
//! loader.set_cdn("unpkg", Vec::<String>::new());
//!
//! let lodash = loader.require("lodash")?.await?;
//! let config = loader.require("./config.json")?.await?;
//! let readme = loader.require("text:./README.md")?.await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod config;
pub mod error;
pub mod fetch;
pub mod module_system;

// Re-exports
pub use classify::{ContentKind, classify};
pub use config::{CdnShorthand, LoaderConfig};
pub use error::{ConfigError, FetchError, LoadError, Result, ScriptError};
pub use fetch::{Fetch, FetchResponse, HttpFetcher};
pub use module_system::{
    Builtin, Deferred, Identifier, Loader, ModuleCache, ModuleHost, ModuleSandbox, ModuleScope,
    ModuleValue,
};

/// Version of the arjs loader
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
