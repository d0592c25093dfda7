// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.2.3 Properties of the Function Prototype Object](https://tc39.es/ecma262/#sec-properties-of-the-function-prototype-object)
//!
//! `call`, `apply` and `bind` supply an explicit receiver. Arrow functions
//! ignore it, as they ignore every other call site.

use super::{
    ArgumentsList, Behaviour, Builtin, CallSite, bound_function_create, define_builtin_function,
};
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{get, length_of_array_like},
        testing_and_comparison::is_callable,
    },
    execution::{Agent, JsResult, agent::ExceptionType},
    types::{Function, PropertyKey, Value},
};

pub(crate) struct FunctionPrototype;

struct FunctionPrototypeApply;
impl Builtin for FunctionPrototypeApply {
    const NAME: &'static str = "apply";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::apply);
}

struct FunctionPrototypeBind;
impl Builtin for FunctionPrototypeBind {
    const NAME: &'static str = "bind";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::bind);
}

struct FunctionPrototypeCall;
impl Builtin for FunctionPrototypeCall {
    const NAME: &'static str = "call";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::call);
}

struct FunctionPrototypeToString;
impl Builtin for FunctionPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::to_string);
}

fn this_function(agent: &mut Agent, this_value: Value, method: &str) -> JsResult<Function> {
    match is_callable(this_value) {
        Some(func) => Ok(func),
        None => {
            let message = format!("Function.prototype.{method} called on a non-function");
            Err(agent.throw_exception(ExceptionType::TypeError, message))
        }
    }
}

impl FunctionPrototype {
    /// ### [20.2.3.1 Function.prototype.apply ( thisArg, argArray )](https://tc39.es/ecma262/#sec-function.prototype.apply)
    fn apply(agent: &mut Agent, this_value: Value, args: ArgumentsList) -> JsResult<Value> {
        // 1. Let func be the this value.
        // 2. If IsCallable(func) is false, throw a TypeError exception.
        let func = this_function(agent, this_value, "apply")?;
        let this_arg = args.get(0);
        let arg_array = args.get(1);
        let call_site = CallSite::from_this_argument(this_arg);
        // 3. If argArray is either undefined or null, then
        if arg_array.is_nullish() {
            //   b. Return ? Call(func, thisArg).
            return func.call(agent, call_site, &[]);
        }
        // 4. Let argList be ? CreateListFromArrayLike(argArray).
        let args = create_list_from_array_like(agent, arg_array)?;
        // 6. Return ? Call(func, thisArg, argList).
        func.call(agent, call_site, &args)
    }

    /// ### [20.2.3.2 Function.prototype.bind ( thisArg, ...args )](https://tc39.es/ecma262/#sec-function.prototype.bind)
    ///
    /// > #### Note 2
    /// >
    /// > If `Target` is either an arrow function or a bound function exotic
    /// > object, then the `thisArg` passed to this method will not be used by
    /// > subsequent calls to `F`.
    fn bind(agent: &mut Agent, this_value: Value, args: ArgumentsList) -> JsResult<Value> {
        // 1. Let Target be the this value.
        // 2. If IsCallable(Target) is false, throw a TypeError exception.
        let target = this_function(agent, this_value, "bind")?;
        let this_arg = args.get(0);
        let bound_args = args.0.get(1..).unwrap_or(&[]);
        // 3. Let F be ? BoundFunctionCreate(Target, thisArg, args).
        let f = bound_function_create(agent, target, this_arg, bound_args);
        // 11. Return F.
        Ok(Value::Function(Function::BoundFunction(f)))
    }

    /// ### [20.2.3.3 Function.prototype.call ( thisArg, ...args )](https://tc39.es/ecma262/#sec-function.prototype.call)
    fn call(agent: &mut Agent, this_value: Value, args: ArgumentsList) -> JsResult<Value> {
        // 1. Let func be the this value.
        // 2. If IsCallable(func) is false, throw a TypeError exception.
        let func = this_function(agent, this_value, "call")?;
        let this_arg = args.get(0);
        let rest = args.0.get(1..).unwrap_or(&[]);
        // 4. Return ? Call(func, thisArg, args).
        func.call(agent, CallSite::from_this_argument(this_arg), rest)
    }

    /// ### [20.2.3.5 Function.prototype.toString ( )](https://tc39.es/ecma262/#sec-function.prototype.tostring)
    fn to_string(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let func = this_function(agent, this_value, "toString")?;
        // 2. If func is an Object, func has a [[SourceText]] internal slot,
        //    func.[[SourceText]] is a sequence of Unicode code points, and
        //    HostHasSourceTextAvailable(func) is true, then
        //    a. Return CodePointsToString(func.[[SourceText]]).
        // 3. If func is a built-in function object, return an
        //    implementation-defined String source code representation of func.
        let source_text = match func {
            Function::ECMAScriptFunction(f) => agent[f].source_text.to_owned(),
            Function::BuiltinFunction(f) => {
                format!("function {}() {{ [native code] }}", agent[f].name)
            }
            Function::BoundFunction(_) => "function () { [native code] }".to_owned(),
        };
        Ok(Value::from_str(agent, &source_text))
    }

    pub(crate) fn create_intrinsic(agent: &mut Agent) {
        let prototype = agent.intrinsics().function_prototype;
        define_builtin_function::<FunctionPrototypeApply>(agent, prototype);
        define_builtin_function::<FunctionPrototypeBind>(agent, prototype);
        define_builtin_function::<FunctionPrototypeCall>(agent, prototype);
        define_builtin_function::<FunctionPrototypeToString>(agent, prototype);
    }
}

/// ### [7.3.19 CreateListFromArrayLike ( obj )](https://tc39.es/ecma262/#sec-createlistfromarraylike)
fn create_list_from_array_like(agent: &mut Agent, obj: Value) -> JsResult<Vec<Value>> {
    // 2. If obj is not an Object, throw a TypeError exception.
    let Some(obj) = obj.as_object() else {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "CreateListFromArrayLike called on non-object".to_owned(),
        ));
    };
    // 3. Let len be ? LengthOfArrayLike(obj).
    let len = length_of_array_like(agent, obj)?;
    // 4. Let list be a new empty List.
    // 6. Repeat, while index < len,
    (0..len)
        .map(|index| get(agent, obj, PropertyKey::Index(index)))
        .collect()
}
