// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Shared fixtures: an in-memory fetcher and a line-scripted sandbox

#![allow(dead_code)]

use arjs_loader::module_system::WRAPPER_LINE_OFFSET;
use arjs_loader::{
    Fetch, FetchError, FetchResponse, Loader, LoaderConfig, ModuleSandbox, ModuleScope,
    ModuleValue, ScriptError,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const BASE: &str = "https://a.com/app/";

pub type Exports = BTreeMap<String, String>;
pub type TestLoader = Loader<Arc<MockFetcher>, ScriptedSandbox>;

/// Loader over a fresh [`MockFetcher`], base location [`BASE`]
pub fn loader() -> (Arc<MockFetcher>, TestLoader) {
    let fetcher = Arc::new(MockFetcher::default());
    let config = LoaderConfig {
        base_url: vec![BASE.to_string()],
        ..LoaderConfig::default()
    };
    let loader = Loader::with_config(Arc::clone(&fetcher), ScriptedSandbox::default(), &config);
    (fetcher, loader)
}

/// Serves canned responses and records every request
#[derive(Default)]
pub struct MockFetcher {
    routes: Mutex<HashMap<String, FetchResponse>>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Serve `body` with status 200 at `url`
    pub fn serve(&self, url: &str, body: &str) -> &Self {
        self.route(url, FetchResponse::ok(url, body.to_string()))
    }

    /// Serve an arbitrary response at `url`
    pub fn route(&self, url: &str, response: FetchResponse) -> &Self {
        self.routes.lock().insert(url.to_string(), response);
        self
    }

    /// Number of requests made for `url`
    pub fn hits(&self, url: &str) -> usize {
        self.requests.lock().iter().filter(|r| *r == url).count()
    }

    /// Number of requests made in total
    pub fn total_hits(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Fetch for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.requests.lock().push(url.to_string());
        self.routes.lock().get(url).cloned().ok_or_else(|| {
            FetchError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("no route to {}", url),
            ))
        })
    }
}

/// Runs a tiny line language instead of JavaScript:
///
/// - `export NAME VALUE...` sets an export
/// - `require ID as NAME` requires ID and exports a summary of it as NAME
/// - `throw MESSAGE` fails at that line
#[derive(Default)]
pub struct ScriptedSandbox {
    runs: AtomicUsize,
}

impl ScriptedSandbox {
    /// Number of modules executed
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModuleSandbox for ScriptedSandbox {
    type Exports = Exports;

    async fn execute(&self, scope: ModuleScope<Exports>) -> Result<Exports, ScriptError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let mut exports = Exports::new();

        for (index, line) in scope.source.lines().enumerate() {
            let wrapped_line = index + 1 + WRAPPER_LINE_OFFSET;
            let words: Vec<&str> = line.split_whitespace().collect();

            match words.as_slice() {
                ["export", name, value @ ..] => {
                    exports.insert(name.to_string(), value.join(" "));
                }
                ["require", identifier, "as", name] => {
                    let value = match scope.require(identifier) {
                        Ok(deferred) => deferred.await,
                        Err(err) => Err(err),
                    }
                    .map_err(|err| thrown(&err.to_string(), wrapped_line))?;
                    exports.insert(name.to_string(), describe(&value));
                }
                ["throw", message @ ..] => return Err(thrown(&message.join(" "), wrapped_line)),
                _ => {}
            }
        }

        Ok(exports)
    }
}

/// A V8-shaped stack with the failing frame inside the evaluated source
fn thrown(message: &str, line: usize) -> ScriptError {
    ScriptError::new(
        message,
        format!(
            "Error: {}\n    at eval (eval at load (arjs.js:1:1), <anonymous>:{}:7)\n    at arjs.js:2:2",
            message, line
        ),
    )
}

fn describe(value: &ModuleValue<Exports>) -> String {
    match value {
        ModuleValue::Exports(exports) => exports.get("name").cloned().unwrap_or_default(),
        ModuleValue::Json(json) => json.to_string(),
        ModuleValue::Text(text) => text.clone(),
        ModuleValue::Builtin(builtin) => builtin.name().to_string(),
        ModuleValue::Table(table) => table.len().to_string(),
    }
}
