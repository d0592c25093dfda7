// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::ops::Deref;

use crate::{
    ecmascript::{
        execution::{Agent, ExecutionContext, JsResult, agent::ExceptionType},
        types::{Function, Object, PropertyKey, Value},
    },
    heap::{
        BuiltinFunction, OrdinaryObject,
        heap_gc::{HeapMarkAndSweep, WorkQueues},
    },
};

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ArgumentsList<'a>(pub(crate) &'a [Value]);

impl<'a> Deref for ArgumentsList<'a> {
    type Target = &'a [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ArgumentsList<'_> {
    #[inline]
    pub(crate) fn get(&self, index: usize) -> Value {
        *self.0.get(index).unwrap_or(&Value::Undefined)
    }
}

pub(crate) type RegularFn = fn(&mut Agent, Value, ArgumentsList<'_>) -> JsResult<Value>;
pub(crate) type ConstructorFn =
    fn(&mut Agent, Value, ArgumentsList<'_>, Option<Object>) -> JsResult<Value>;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Behaviour {
    Regular(RegularFn),
    Constructor(ConstructorFn),
}

impl Behaviour {
    pub(crate) fn is_constructor(&self) -> bool {
        matches!(self, Behaviour::Constructor(_))
    }
}

pub(crate) trait Builtin {
    const NAME: &'static str;
    const LENGTH: u8;
    const BEHAVIOUR: Behaviour;
}

/// ### [10.3 Built-in Function Objects](https://tc39.es/ecma262/#sec-built-in-function-objects)
#[derive(Debug, Clone)]
pub struct BuiltinFunctionHeapData {
    pub(crate) name: &'static str,
    pub(crate) length: u8,
    pub(crate) behaviour: Behaviour,
    /// Holds any properties assigned onto the function, such as a
    /// constructor's `prototype`.
    pub(crate) backing_object: Option<OrdinaryObject>,
}

impl HeapMarkAndSweep for BuiltinFunctionHeapData {
    fn mark_values(&self, queues: &mut WorkQueues) {
        self.backing_object.mark_values(queues);
    }
}

/// ### [10.3.1 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-built-in-function-objects-call-thisargument-argumentslist)
pub(crate) fn builtin_call(
    agent: &mut Agent,
    f: BuiltinFunction,
    this_argument: Value,
    arguments: &[Value],
) -> JsResult<Value> {
    builtin_call_or_construct(agent, f, this_argument, ArgumentsList(arguments), None)
}

/// ### [10.3.2 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-built-in-function-objects-construct-argumentslist-newtarget)
pub(crate) fn builtin_construct(
    agent: &mut Agent,
    f: BuiltinFunction,
    arguments: &[Value],
    new_target: Function,
) -> JsResult<Value> {
    builtin_call_or_construct(
        agent,
        f,
        Value::Undefined,
        ArgumentsList(arguments),
        Some(new_target),
    )
}

/// ### [10.3.3 BuiltinCallOrConstruct ( F, thisArgument, argumentsList, newTarget )](https://tc39.es/ecma262/#sec-builtincallorconstruct)
fn builtin_call_or_construct(
    agent: &mut Agent,
    f: BuiltinFunction,
    this_argument: Value,
    arguments_list: ArgumentsList,
    new_target: Option<Function>,
) -> JsResult<Value> {
    let behaviour = agent[f].behaviour;
    if agent.options.print_internals {
        eprintln!(
            "Calling builtin {} with this {}",
            agent[f].name,
            this_argument.string_repr(agent)
        );
    }
    // 3. Let calleeContext be a new execution context.
    let callee_context = ExecutionContext {
        // 8. Perform any necessary implementation-defined initialization of calleeContext.
        ecmascript_code: None,
        // 4. Set the Function of calleeContext to F.
        function: Some(Function::BuiltinFunction(f)),
    };
    // 9. Push calleeContext onto the execution context stack; calleeContext
    //    is now the running execution context.
    agent.push_execution_context(callee_context)?;
    // 10. Let result be the Completion Record that is the result of evaluating
    //     F in a manner that conforms to the specification of F.
    let result = match behaviour {
        Behaviour::Regular(func) => {
            if new_target.is_some() {
                Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    format!("{} is not a constructor", agent[f].name),
                ))
            } else {
                func(agent, this_argument, arguments_list)
            }
        }
        Behaviour::Constructor(func) => func(
            agent,
            this_argument,
            arguments_list,
            new_target.map(Object::Function),
        ),
    };
    // 11. Remove calleeContext from the execution context stack and restore
    //     callerContext as the running execution context.
    agent.execution_context_stack.pop();
    // 12. Return ? result.
    result
}

/// ### [10.3.4 CreateBuiltinFunction ( behaviour, length, name, additionalInternalSlotsList \[ , realm \[ , prototype \[ , prefix \] \] \] )](https://tc39.es/ecma262/#sec-createbuiltinfunction)
pub(crate) fn create_builtin_function<T: Builtin>(agent: &mut Agent) -> BuiltinFunction {
    agent.heap.create_builtin_function(BuiltinFunctionHeapData {
        name: T::NAME,
        length: T::LENGTH,
        behaviour: T::BEHAVIOUR,
        backing_object: None,
    })
}

/// Creates a builtin function and installs it as a property of `object`
/// under its name.
pub(crate) fn define_builtin_function<T: Builtin>(
    agent: &mut Agent,
    object: OrdinaryObject,
) -> BuiltinFunction {
    let function = create_builtin_function::<T>(agent);
    let key = PropertyKey::from_str(agent, T::NAME);
    agent[object].set_own(key, Value::Function(Function::BuiltinFunction(function)));
    function
}
