// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [19 The Global Object](https://tc39.es/ecma262/#sec-global-object)

use super::{
    array::ArrayPrototype, console::ConsoleObject, error, function_prototype::FunctionPrototype,
    object_prototype::ObjectPrototype, timers::Timers,
};
use crate::ecmascript::{
    execution::Agent,
    types::{PropertyKey, Value},
};

/// ### [9.3.4 SetDefaultGlobalBindings ( realmRec )](https://tc39.es/ecma262/#sec-setdefaultglobalbindings)
///
/// Fills in the intrinsic prototypes and installs the global bindings.
pub(crate) fn initialize_global_object(agent: &mut Agent) {
    ObjectPrototype::create_intrinsic(agent);
    FunctionPrototype::create_intrinsic(agent);
    ArrayPrototype::create_intrinsic(agent);
    error::create_intrinsics(agent);

    let global = agent.global_object();
    // 19.1 Value Properties of the Global Object
    let value_properties = [
        ("globalThis", Value::Object(global)),
        ("Infinity", Value::Number(f64::INFINITY)),
        ("NaN", Value::Number(f64::NAN)),
        ("undefined", Value::Undefined),
    ];
    for (name, value) in value_properties {
        let key = PropertyKey::from_str(agent, name);
        agent[global].set_own(key, value);
    }

    let console = ConsoleObject::create_intrinsic(agent);
    let console_key = PropertyKey::from_str(agent, "console");
    agent[global].set_own(console_key, Value::Object(console));

    Timers::create_intrinsic(agent, global);
}
