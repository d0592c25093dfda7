// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::CallSite;
use crate::{
    ecmascript::{
        abstract_operations::operations_on_objects::construct,
        execution::{Agent, JsResult},
        types::{Function, Value},
    },
    heap::{
        BoundFunction, OrdinaryObject,
        heap_gc::{HeapMarkAndSweep, WorkQueues},
    },
};

/// ### [10.4.1 Bound Function Exotic Objects](https://tc39.es/ecma262/#sec-bound-function-exotic-objects)
#[derive(Debug, Clone)]
pub struct BoundFunctionHeapData {
    /// ### \[\[BoundTargetFunction\]\]
    ///
    /// The wrapped function object.
    pub(crate) target: Function,
    /// ### \[\[BoundThis\]\]
    ///
    /// The value that is always passed as the **this** value when calling the
    /// wrapped function. An arrow function target ignores it.
    pub(crate) bound_this: Value,
    /// ### \[\[BoundArguments\]\]
    pub(crate) bound_arguments: Box<[Value]>,
    pub(crate) backing_object: Option<OrdinaryObject>,
}

impl HeapMarkAndSweep for BoundFunctionHeapData {
    fn mark_values(&self, queues: &mut WorkQueues) {
        self.target.mark_values(queues);
        self.bound_this.mark_values(queues);
        self.bound_arguments.mark_values(queues);
        self.backing_object.mark_values(queues);
    }
}

/// ### [10.4.1.3 BoundFunctionCreate ( targetFunction, boundThis, boundArgs )](https://tc39.es/ecma262/#sec-boundfunctioncreate)
pub(crate) fn bound_function_create(
    agent: &mut Agent,
    target_function: Function,
    bound_this: Value,
    bound_args: &[Value],
) -> BoundFunction {
    agent.heap.create_bound_function(BoundFunctionHeapData {
        target: target_function,
        bound_this,
        bound_arguments: bound_args.into(),
        backing_object: None,
    })
}

fn bound_arguments_with(agent: &Agent, f: BoundFunction, arguments_list: &[Value]) -> Vec<Value> {
    // 3. Let boundArgs be F.[[BoundArguments]].
    // 4. Let args be the list-concatenation of boundArgs and argumentsList.
    let bound_args = &agent[f].bound_arguments;
    let mut args = Vec::with_capacity(bound_args.len() + arguments_list.len());
    args.extend_from_slice(bound_args);
    args.extend_from_slice(arguments_list);
    args
}

/// ### [10.4.1.1 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-bound-function-exotic-objects-call-thisargument-argumentslist)
///
/// The call site of the bound function itself is ignored.
pub(crate) fn bound_function_call(
    agent: &mut Agent,
    f: BoundFunction,
    arguments_list: &[Value],
) -> JsResult<Value> {
    // 1. Let target be F.[[BoundTargetFunction]].
    let target = agent[f].target;
    // 2. Let boundThis be F.[[BoundThis]].
    let bound_this = agent[f].bound_this;
    let args = bound_arguments_with(agent, f, arguments_list);
    // 5. Return ? Call(target, boundThis, args).
    target.call(agent, CallSite::from_this_argument(bound_this), &args)
}

/// ### [10.4.1.2 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-bound-function-exotic-objects-construct-argumentslist-newtarget)
pub(crate) fn bound_function_construct(
    agent: &mut Agent,
    f: BoundFunction,
    arguments_list: &[Value],
    new_target: Function,
) -> JsResult<Value> {
    // 1. Let target be F.[[BoundTargetFunction]].
    let target = agent[f].target;
    let args = bound_arguments_with(agent, f, arguments_list);
    // 5. If SameValue(F, newTarget) is true, set newTarget to target.
    let new_target = if new_target == Function::BoundFunction(f) {
        target
    } else {
        new_target
    };
    // 6. Return ? Construct(target, args, newTarget).
    construct(agent, target, &args, Some(new_target))
}
