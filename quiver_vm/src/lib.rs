// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Quiver VM
//!
//! A tree-walking interpreter for a subset of ECMAScript, built around the
//! two ways a function body can observe `this`: ordinary functions bind it
//! per call from the call site, arrow functions capture it from the code
//! they were defined in.

pub mod ecmascript;
pub(crate) mod engine;
pub mod heap;

pub use ecmascript::{
    builtins::{CallSite, ThisMode, resolve_this_environment},
    execution::{
        Agent, AgentOptions, DefaultHostHooks, Environment, ExceptionType, HostHooks, JsError,
        JsResult, ThisBindingStatus, TimerId, get_this_environment,
    },
    scripts_and_modules::script::{Script, ScriptOptions, parse_script},
    types::{Function, Object, PropertyKey, Value},
};
pub use heap::HeapStatistics;
