// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! arjs - load CommonJS-style modules over the network
//!
//! This crate bundles the location helpers of [`url`] and the loader of
//! [`loader`], and wires up the default instance: a [`Loader`] fetching over
//! HTTP(S) and `file://`, configured from the usual config files and
//! `ARJS_*` environment variables.

pub use arjs_loader as loader;
pub use arjs_url as url;

pub use arjs_loader::{
    HttpFetcher, LoadError, Loader, LoaderConfig, ModuleSandbox, ModuleValue, Result,
};

use tracing::debug;

/// A loader over the default HTTP transport
pub type HttpLoader<S> = Loader<HttpFetcher, S>;

/// Create the default loader for `sandbox`.
///
/// Configuration comes from [`LoaderConfig::load`].
pub fn http_loader<S: ModuleSandbox>(sandbox: S) -> Result<HttpLoader<S>> {
    http_loader_with_config(sandbox, &LoaderConfig::load()?)
}

/// Create a loader over the default HTTP transport with explicit configuration
pub fn http_loader_with_config<S: ModuleSandbox>(
    sandbox: S,
    config: &LoaderConfig,
) -> Result<HttpLoader<S>> {
    let fetcher = HttpFetcher::from_config(config)?;
    debug!(base = ?config.base_url, cdn = ?config.cdn, "Created HTTP loader");
    Ok(Loader::with_config(fetcher, sandbox, config))
}
