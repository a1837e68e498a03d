// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Asynchronous CommonJS-style module system
//!
//! - `require()` with scheme dispatch (`./`, `:`, `cache:`, `ar:`, `text:`, bare names)
//! - `module.exports` captured through an injected sandbox
//! - Process-lifetime cache keyed by resolved location

mod cache;
mod dispatch;
mod evaluator;
mod loader;
mod value;

pub use cache::ModuleCache;
pub use dispatch::{
    CACHE_PREFIX, Identifier, LITERAL_PREFIX, Locations, NAMESPACE_PREFIX, TEXT_PREFIX, resolve,
};
pub use evaluator::{
    ModuleEvaluator, ModuleHost, ModuleSandbox, ModuleScope, WRAPPER_LINE_OFFSET, rewrite_stack,
    wrap_module,
};
pub use loader::{Deferred, Loader};
pub use value::{BUILTIN_MODULES, Builtin, ModuleValue};
