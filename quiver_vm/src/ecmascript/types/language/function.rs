// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::Value;
use crate::{
    ecmascript::{
        builtins::{
            CallSite, ThisMode, bound_function_call, bound_function_construct, builtin_call, builtin_construct,
            ecmascript_function_call, ecmascript_function_construct,
        },
        execution::{Agent, JsResult},
    },
    heap::{
        BoundFunction, BuiltinFunction, ECMAScriptFunction, OrdinaryObject,
        heap_gc::{HeapMarkAndSweep, WorkQueues},
    },
};

/// Any callable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    ECMAScriptFunction(ECMAScriptFunction),
    BuiltinFunction(BuiltinFunction),
    BoundFunction(BoundFunction),
}

impl From<ECMAScriptFunction> for Function {
    fn from(value: ECMAScriptFunction) -> Self {
        Function::ECMAScriptFunction(value)
    }
}

impl From<BuiltinFunction> for Function {
    fn from(value: BuiltinFunction) -> Self {
        Function::BuiltinFunction(value)
    }
}

impl From<BoundFunction> for Function {
    fn from(value: BoundFunction) -> Self {
        Function::BoundFunction(value)
    }
}

impl Function {
    /// ### [7.3.13 Call ( F, V \[ , argumentsList \] )](https://tc39.es/ecma262/#sec-call)
    ///
    /// The call site decides what an ordinary function observes as `this`;
    /// arrow functions ignore it.
    pub fn call(
        self,
        agent: &mut Agent,
        call_site: CallSite,
        arguments: &[Value],
    ) -> JsResult<Value> {
        match self {
            Function::ECMAScriptFunction(f) => {
                ecmascript_function_call(agent, f, call_site, arguments)
            }
            Function::BuiltinFunction(f) => {
                builtin_call(agent, f, call_site.this_argument(), arguments)
            }
            Function::BoundFunction(f) => bound_function_call(agent, f, arguments),
        }
    }

    /// ### [7.2.4 IsConstructor ( argument )](https://tc39.es/ecma262/#sec-isconstructor)
    pub fn is_constructor(self, agent: &Agent) -> bool {
        match self {
            Function::ECMAScriptFunction(f) => {
                let data = &agent[f];
                data.constructor && data.this_mode != ThisMode::Lexical
            }
            Function::BuiltinFunction(f) => agent[f].behaviour.is_constructor(),
            Function::BoundFunction(f) => agent[f].target.is_constructor(agent),
        }
    }

    /// ### [7.3.14 Construct ( F \[ , argumentsList \[ , newTarget \] \] )](https://tc39.es/ecma262/#sec-construct)
    ///
    /// Callers check [`Function::is_constructor`] first.
    pub(crate) fn construct(
        self,
        agent: &mut Agent,
        arguments: &[Value],
        new_target: Function,
    ) -> JsResult<Value> {
        match self {
            Function::ECMAScriptFunction(f) => {
                ecmascript_function_construct(agent, f, arguments, new_target)
            }
            Function::BoundFunction(f) => bound_function_construct(agent, f, arguments, new_target),
            Function::BuiltinFunction(f) => builtin_construct(agent, f, arguments, new_target),
        }
    }

    /// The function's `name` as it was at creation.
    pub fn name(self, agent: &Agent) -> String {
        match self {
            Function::ECMAScriptFunction(f) => agent[f]
                .name
                .map(|name| name.as_str(agent).to_owned())
                .unwrap_or_default(),
            Function::BuiltinFunction(f) => agent[f].name.to_owned(),
            Function::BoundFunction(f) => format!("bound {}", agent[f].target.name(agent)),
        }
    }

    /// The number of formal parameters before any default or rest parameter.
    pub fn length(self, agent: &Agent) -> u32 {
        match self {
            Function::ECMAScriptFunction(f) => agent[f].length,
            Function::BuiltinFunction(f) => agent[f].length.into(),
            Function::BoundFunction(f) => {
                let data = &agent[f];
                data.target
                    .length(agent)
                    .saturating_sub(data.bound_arguments.len() as u32)
            }
        }
    }

    /// Storage for properties assigned onto the function object.
    pub(crate) fn backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        match self {
            Function::ECMAScriptFunction(f) => agent[f].backing_object,
            Function::BuiltinFunction(f) => agent[f].backing_object,
            Function::BoundFunction(f) => agent[f].backing_object,
        }
    }

    pub(crate) fn get_or_create_backing_object(self, agent: &mut Agent) -> OrdinaryObject {
        if let Some(object) = self.backing_object(agent) {
            return object;
        }
        let object = agent.heap.create_object(None);
        match self {
            Function::ECMAScriptFunction(f) => agent[f].backing_object = Some(object),
            Function::BuiltinFunction(f) => agent[f].backing_object = Some(object),
            Function::BoundFunction(f) => agent[f].backing_object = Some(object),
        }
        object
    }
}

impl HeapMarkAndSweep for Function {
    fn mark_values(&self, queues: &mut WorkQueues) {
        match self {
            Function::ECMAScriptFunction(f) => f.mark_values(queues),
            Function::BuiltinFunction(f) => f.mark_values(queues),
            Function::BoundFunction(f) => f.mark_values(queues),
        }
    }
}
