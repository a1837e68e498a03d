// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Values produced by `require()`

use std::collections::BTreeMap;

/// Modules served by the loader itself, seeded into every cache
pub const BUILTIN_MODULES: &[(&str, Builtin)] = &[("ar:url", Builtin::Url)];

/// An intrinsic module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// The URL helper (`arjs_url::Url`)
    Url,
}

impl Builtin {
    /// Cache key the builtin is registered under
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Url => "ar:url",
        }
    }
}

/// The result of a `require()`, generic over the sandbox's exports type.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleValue<E> {
    /// `module.exports` of an evaluated module
    Exports(E),
    /// Parsed JSON document
    Json(serde_json::Value),
    /// Raw text from a `text:` request
    Text(String),
    /// Intrinsic module
    Builtin(Builtin),
    /// Snapshot of the whole cache, from `require("cache:")`
    Table(BTreeMap<String, ModuleValue<E>>),
}

impl<E> ModuleValue<E> {
    /// The exports object, if this is an evaluated module
    pub fn as_exports(&self) -> Option<&E> {
        match self {
            ModuleValue::Exports(exports) => Some(exports),
            _ => None,
        }
    }

    /// The JSON document, if this is one
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ModuleValue::Json(json) => Some(json),
            _ => None,
        }
    }

    /// The raw text, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ModuleValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The cache snapshot, if this is one
    pub fn as_table(&self) -> Option<&BTreeMap<String, ModuleValue<E>>> {
        match self {
            ModuleValue::Table(table) => Some(table),
            _ => None,
        }
    }
}
