// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod language;

pub use language::{Function, Object, PropertyKey, Value};
pub(crate) use language::{ObjectHeapData, StringHeapData};

pub use crate::heap::{
    Array, BoundFunction, BuiltinFunction, ECMAScriptFunction, HeapString, OrdinaryObject,
};
