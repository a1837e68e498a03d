// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module evaluation.
//!
//! Source text is wrapped in a CommonJS shim and handed to a
//! [`ModuleSandbox`], which runs it and returns `module.exports`. The sandbox
//! is an injected capability; the loader does not care whether it shares the
//! host's globals, runs an isolated context or a subprocess.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

use crate::error::{LoadError, Result, ScriptError};
use crate::module_system::loader::Deferred;
use crate::module_system::value::ModuleValue;

/// Lines the wrapper adds before the module source
pub const WRAPPER_LINE_OFFSET: usize = 4;

const ANONYMOUS_FRAME: &str = "<anonymous>:";

/// The loader as seen from inside a running module.
///
/// Backs the `require` binding and the `ARJS` namespace of the wrapper.
pub trait ModuleHost<E>: Send + Sync {
    /// `require(identifier)`
    fn require(&self, identifier: &str) -> Result<Deferred<E>>;

    /// `ARJS.requireURL(url)`
    fn require_url(&self, url: &str) -> Deferred<E>;

    /// `ARJS.load(key, source)`
    fn load(&self, key: &str, source: &str) -> Deferred<E>;

    /// Look up a cache entry without fetching
    fn cached(&self, key: &str) -> Option<ModuleValue<E>>;
}

/// Everything a sandbox needs to run one module.
pub struct ModuleScope<E> {
    /// Cache key the module is loaded under
    pub key: String,
    /// Original source text
    pub source: String,
    /// Source wrapped by [`wrap_module`]
    pub wrapped: String,
    /// Binding for `require` and `ARJS`
    pub host: Arc<dyn ModuleHost<E>>,
}

impl<E> ModuleScope<E> {
    /// Shorthand for `self.host.require(identifier)`
    pub fn require(&self, identifier: &str) -> Result<Deferred<E>> {
        self.host.require(identifier)
    }
}

impl<E> fmt::Debug for ModuleScope<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleScope")
            .field("key", &self.key)
            .field("source_len", &self.source.len())
            .finish_non_exhaustive()
    }
}

/// Executes module bodies.
///
/// A thrown exception is reported as a [`ScriptError`] whose stack uses the
/// `<anonymous>:LINE:COL` convention for frames inside the evaluated text, so
/// the evaluator can point them back at the module key.
#[async_trait]
pub trait ModuleSandbox: Send + Sync + 'static {
    /// The `module.exports` value
    type Exports: Clone + fmt::Debug + Send + Sync + 'static;

    /// Run the module and return its exports
    async fn execute(
        &self,
        scope: ModuleScope<Self::Exports>,
    ) -> std::result::Result<Self::Exports, ScriptError>;
}

/// Wrap source code in the CommonJS module shim
pub fn wrap_module(source: &str) -> String {
    format!(
        r#"(function(global) {{
  var module = {{ exports: {{}} }}
  var exports = module.exports
  return (async function(require, ARJS) {{
{}
  }})(require, ARJS)
  .then(function() {{ return module.exports }})
}})(this)"#,
        source
    )
}

/// Point the first evaluated-source frame of `stack` at `key`.
///
/// The frame is replaced with `    at KEY:LINE:COL`, the line adjusted for the
/// wrapper prologue. Stacks without such a frame are returned unchanged.
pub fn rewrite_stack(stack: &str, key: &str) -> String {
    let mut rewritten = false;

    stack
        .lines()
        .enumerate()
        .map(|(index, line)| {
            // Line 0 is the message
            if index > 0 && !rewritten {
                if let Some(frame) = rewrite_frame(line, key) {
                    rewritten = true;
                    return frame;
                }
            }
            line.to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn rewrite_frame(line: &str, key: &str) -> Option<String> {
    let index = line.find(ANONYMOUS_FRAME)?;
    let position = &line[index + ANONYMOUS_FRAME.len()..];

    let (row, rest) = position.split_once(':')?;
    let row: usize = row.parse().ok()?;
    let col: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if col.is_empty() {
        return None;
    }

    Some(format!(
        "    at {}:{}:{}",
        key,
        row.saturating_sub(WRAPPER_LINE_OFFSET),
        col
    ))
}

/// Runs sources through a sandbox and maps failures to [`LoadError`].
pub struct ModuleEvaluator<S> {
    sandbox: Arc<S>,
}

impl<S: ModuleSandbox> ModuleEvaluator<S> {
    /// Create an evaluator around a sandbox
    pub fn new(sandbox: S) -> Self {
        Self {
            sandbox: Arc::new(sandbox),
        }
    }

    /// The wrapped sandbox
    pub fn sandbox(&self) -> &S {
        &self.sandbox
    }

    /// Evaluate `source` as the module `key`.
    pub async fn evaluate(
        &self,
        key: &str,
        source: &str,
        host: Arc<dyn ModuleHost<S::Exports>>,
    ) -> Result<S::Exports> {
        trace!("Evaluating {} ({} bytes)", key, source.len());

        let scope = ModuleScope {
            key: key.to_string(),
            source: source.to_string(),
            wrapped: wrap_module(source),
            host,
        };

        self.sandbox.execute(scope).await.map_err(|mut error| {
            error.stack = rewrite_stack(&error.stack, key);
            warn!("Module {} threw: {}", key, error.message);
            LoadError::Evaluation {
                key: key.to_string(),
                source: error,
            }
        })
    }
}
