// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10 Ordinary and Exotic Objects Behaviours](https://tc39.es/ecma262/#sec-ordinary-and-exotic-objects-behaviours)
//!
//! Function objects and the built-in objects installed on the global object.

pub(crate) mod array;
mod bound_function;
mod builtin_function;
pub mod console;
mod ecmascript_function;
pub(crate) mod error;
mod function_prototype;
pub(crate) mod global_object;
mod object_prototype;
mod timers;

pub(crate) use array::ArrayHeapData;
pub(crate) use bound_function::{
    BoundFunctionHeapData, bound_function_call, bound_function_construct, bound_function_create,
};
pub(crate) use builtin_function::{
    ArgumentsList, Behaviour, Builtin, BuiltinFunctionHeapData, builtin_call, builtin_construct,
    create_builtin_function, define_builtin_function,
};
pub use ecmascript_function::{CallSite, ThisMode, resolve_this_environment};
pub(crate) use ecmascript_function::{
    ECMAScriptFunctionHeapData, FunctionBodyKind, OrdinaryFunctionCreateParams,
    ecmascript_function_call, ecmascript_function_construct, ordinary_function_create,
};
