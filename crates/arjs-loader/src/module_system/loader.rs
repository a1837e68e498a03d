// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module loader - resolves, fetches, evaluates and caches modules

use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::classify::{ContentKind, classify};
use crate::config::{LoaderConfig, cdn_fragments};
use crate::error::{LoadError, Result};
use crate::fetch::Fetch;
use crate::module_system::cache::ModuleCache;
use crate::module_system::dispatch::{self, CACHE_PREFIX, Identifier, Locations};
use crate::module_system::evaluator::{ModuleEvaluator, ModuleHost, ModuleSandbox};
use crate::module_system::value::ModuleValue;

/// A pending `require()` result
pub type Deferred<E> = BoxFuture<'static, Result<ModuleValue<E>>>;

/// Module loader.
///
/// Cheap to clone; clones share configuration and cache. Resolution errors
/// are returned synchronously from [`Loader::require`], I/O and evaluation
/// errors through the returned future.
///
/// Overlapping requests for the same uncached key are not merged: each one
/// fetches, and the last to finish owns the cache entry.
pub struct Loader<F, S: ModuleSandbox> {
    inner: Arc<LoaderInner<F, S>>,
}

struct LoaderInner<F, S: ModuleSandbox> {
    /// Base and CDN roots
    locations: RwLock<Locations>,
    /// Module cache
    cache: ModuleCache<S::Exports>,
    /// Transport
    fetcher: F,
    /// Sandbox wrapper
    evaluator: ModuleEvaluator<S>,
}

impl<F, S: ModuleSandbox> Clone for Loader<F, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: Fetch, S: ModuleSandbox> Loader<F, S> {
    /// Create a loader with the default configuration
    pub fn new(fetcher: F, sandbox: S) -> Self {
        Self::with_config(fetcher, sandbox, &LoaderConfig::default())
    }

    /// Create a loader whose base and CDN come from `config`
    pub fn with_config(fetcher: F, sandbox: S, config: &LoaderConfig) -> Self {
        Self {
            inner: Arc::new(LoaderInner {
                locations: RwLock::new(Locations {
                    base: config.base_url.clone(),
                    cdn: cdn_fragments(config.cdn.as_slice()),
                }),
                cache: ModuleCache::with_builtins(),
                fetcher,
                evaluator: ModuleEvaluator::new(sandbox),
            }),
        }
    }

    /// Replace the base location
    pub fn set_base_url<I, T>(&self, fragments: I) -> &Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let base: Vec<String> = fragments.into_iter().map(Into::into).collect();
        debug!("Base location set to {:?}", base);
        self.inner.locations.write().base = base;
        self
    }

    /// Set the CDN used for bare package names.
    ///
    /// `unpkg` and `jsdelivr` (any case) select a public registry root;
    /// anything else is used literally, joined with `fragments`.
    pub fn set_cdn<I, T>(&self, name_or_url: &str, fragments: I) -> &Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut all = vec![name_or_url.to_string()];
        all.extend(fragments.into_iter().map(Into::into));

        let cdn = cdn_fragments(all.as_slice());
        debug!("CDN set to {:?}", cdn);
        self.inner.locations.write().cdn = cdn;
        self
    }

    /// Store the module cached for `identifier` under the key `alias` as well.
    ///
    /// The alias is reachable as `require(":alias")`. Fails without touching
    /// the cache when the source is not cached.
    pub fn set_alias(&self, alias: &str, identifier: &str) -> Result<&Self> {
        let key = self
            .resolve(identifier)
            .ok_or_else(|| LoadError::unresolvable(identifier))?;

        if !self.inner.cache.alias(alias, &key) {
            return Err(LoadError::AliasSourceMissing {
                alias: alias.to_string(),
                key,
            });
        }

        debug!("Aliased {} to {}", alias, key);
        Ok(self)
    }

    /// Current base location fragments
    pub fn base_url(&self) -> Vec<String> {
        self.inner.locations.read().base.clone()
    }

    /// Current CDN fragments
    pub fn cdn(&self) -> Vec<String> {
        self.inner.locations.read().cdn.clone()
    }

    /// Resolve an identifier without loading it
    pub fn resolve(&self, identifier: &str) -> Option<String> {
        dispatch::resolve(identifier, &self.inner.locations.read())
    }

    /// The module cache
    pub fn cache(&self) -> &ModuleCache<S::Exports> {
        &self.inner.cache
    }

    /// Look up a cache entry without fetching
    pub fn cached(&self, key: &str) -> Option<ModuleValue<S::Exports>> {
        self.inner.cache.get(key)
    }

    /// The sandbox modules run in
    pub fn sandbox(&self) -> &S {
        self.inner.evaluator.sandbox()
    }

    /// Require a module.
    ///
    /// Returns `Err` immediately when the identifier cannot be resolved or
    /// names a literal key that is not cached. Cached values come back as an
    /// already-completed future.
    pub fn require(&self, identifier: &str) -> Result<Deferred<S::Exports>> {
        if identifier == CACHE_PREFIX {
            return Ok(ready(ModuleValue::Table(self.inner.cache.snapshot())));
        }

        let parsed = Identifier::parse(identifier);
        let resolved = self.resolve(identifier);
        trace!(identifier, ?resolved, "Resolved");

        let resolved = resolved.ok_or_else(|| LoadError::unresolvable(identifier))?;

        if let Identifier::Text(_) = parsed {
            return Ok(self.require_text(resolved));
        }

        if let Some(value) = self.inner.cache.get(&resolved) {
            debug!("Cache hit for {}", resolved);
            return Ok(ready(value));
        }

        if let Identifier::LiteralKey(_) = parsed {
            return Err(LoadError::module_not_found(resolved));
        }

        Ok(self.require_url(&resolved))
    }

    /// Fetch, classify and load an absolute location, skipping dispatch.
    ///
    /// Code is cached under the response's final URL, and under `url` too when
    /// a redirect was followed. JSON is cached under `url`.
    pub fn require_url(&self, url: &str) -> Deferred<S::Exports> {
        let this = self.clone();
        let url = url.to_string();

        async move {
            debug!("Fetching {}", url);
            let response = this.inner.fetcher.fetch(&url).await?;
            let kind = classify(&url, &response);
            trace!(?kind, status = response.status, "Classified {}", url);

            match kind {
                ContentKind::Redirect | ContentKind::Code => {
                    let source = response.text();
                    let value = this.load(&response.url, &source).await?;
                    if response.url != url {
                        this.inner.cache.set(url, value.clone());
                    }
                    Ok(value)
                }
                ContentKind::Json => {
                    let value = ModuleValue::Json(response.json()?);
                    this.inner.cache.set(url, value.clone());
                    Ok(value)
                }
                ContentKind::Error => Err(LoadError::UnexpectedResponseKind {
                    url,
                    status: response.status,
                }),
            }
        }
        .boxed()
    }

    /// Evaluate `source` and cache its exports under `key`
    pub fn load(&self, key: &str, source: &str) -> Deferred<S::Exports> {
        let this = self.clone();
        let key = key.to_string();
        let source = source.to_string();

        async move {
            let host: Arc<dyn ModuleHost<S::Exports>> = Arc::new(this.clone());
            let exports = this.inner.evaluator.evaluate(&key, &source, host).await?;

            let value = ModuleValue::Exports(exports);
            this.inner.cache.set(key, value.clone());
            Ok(value)
        }
        .boxed()
    }

    /// Fetch a location and return its body as text, bypassing the cache
    fn require_text(&self, location: String) -> Deferred<S::Exports> {
        let this = self.clone();

        async move {
            debug!("Fetching text {}", location);
            let response = this.inner.fetcher.fetch(&location).await?;
            Ok(ModuleValue::Text(response.text()))
        }
        .boxed()
    }
}

impl<F: Fetch, S: ModuleSandbox> ModuleHost<S::Exports> for Loader<F, S> {
    fn require(&self, identifier: &str) -> Result<Deferred<S::Exports>> {
        Loader::require(self, identifier)
    }

    fn require_url(&self, url: &str) -> Deferred<S::Exports> {
        Loader::require_url(self, url)
    }

    fn load(&self, key: &str, source: &str) -> Deferred<S::Exports> {
        Loader::load(self, key, source)
    }

    fn cached(&self, key: &str) -> Option<ModuleValue<S::Exports>> {
        Loader::cached(self, key)
    }
}

fn ready<E: Send + 'static>(value: ModuleValue<E>) -> Deferred<E> {
    future::ready(Ok(value)).boxed()
}
