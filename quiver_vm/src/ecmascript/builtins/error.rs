// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.5 Error Objects](https://tc39.es/ecma262/#sec-error-objects)
//!
//! Error objects are ordinary objects whose prototype is one of the error
//! prototypes. The prototypes carry `name`; each instance carries its own
//! `message`.

use super::{
    ArgumentsList, Behaviour, Builtin, create_builtin_function, define_builtin_function,
};
use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_objects::{get, get_prototype_from_constructor},
            type_conversion::to_string,
        },
        execution::{Agent, JsResult, agent::ExceptionType},
        types::{Function, Object, PropertyKey, Value},
    },
    heap::{HeapString, OrdinaryObject},
};

/// Allocates an error object of `kind` with the given own `message`.
pub(crate) fn create_error_object(
    agent: &mut Agent,
    kind: ExceptionType,
    message: Option<HeapString>,
) -> OrdinaryObject {
    let prototype = agent.intrinsics().error_prototype_for(kind);
    let o = agent.heap.create_object(Some(prototype));
    if let Some(message) = message {
        install_message(agent, o, message);
    }
    o
}

fn install_message(agent: &mut Agent, o: OrdinaryObject, message: HeapString) {
    let key = PropertyKey::from_str(agent, "message");
    agent[o].set_own(key, Value::String(message));
}

/// ### [20.5.1.1 Error ( message \[ , options \] )](https://tc39.es/ecma262/#sec-error-message)
/// ### [20.5.6.1.1 NativeError ( message \[ , options \] )](https://tc39.es/ecma262/#sec-nativeerror)
fn construct_error(
    agent: &mut Agent,
    kind: ExceptionType,
    arguments: ArgumentsList,
    new_target: Option<Object>,
) -> JsResult<Value> {
    // 1. If NewTarget is undefined, let newTarget be the active function
    //    object; else let newTarget be NewTarget.
    let new_target = match new_target {
        Some(Object::Function(new_target)) => Some(new_target),
        _ => agent
            .running_execution_context()
            .and_then(|context| context.function),
    };
    // 2. Let O be ? OrdinaryCreateFromConstructor(newTarget, "%NativeError.prototype%", « [[ErrorData]] »).
    let prototype = match new_target {
        Some(new_target) => get_prototype_from_constructor(agent, new_target)?,
        None => agent.intrinsics().error_prototype_for(kind),
    };
    let o = agent.heap.create_object(Some(prototype));
    // 3. If message is not undefined, then
    let message = arguments.get(0);
    if !message.is_undefined() {
        // a. Let msg be ? ToString(message).
        let msg = to_string(agent, message)?;
        // b. Perform CreateNonEnumerableDataPropertyOrThrow(O, "message", msg).
        install_message(agent, o, msg);
    }
    // 5. Return O.
    Ok(Value::Object(o))
}

macro_rules! error_constructor {
    ($name: ident, $kind: ident) => {
        struct $name;
        impl Builtin for $name {
            const NAME: &'static str = stringify!($kind);
            const LENGTH: u8 = 1;
            const BEHAVIOUR: Behaviour = Behaviour::Constructor(Self::constructor);
        }
        impl $name {
            fn constructor(
                agent: &mut Agent,
                _this_value: Value,
                arguments: ArgumentsList,
                new_target: Option<Object>,
            ) -> JsResult<Value> {
                construct_error(agent, ExceptionType::$kind, arguments, new_target)
            }
        }
    };
}

error_constructor!(ErrorConstructor, Error);
error_constructor!(RangeErrorConstructor, RangeError);
error_constructor!(ReferenceErrorConstructor, ReferenceError);
error_constructor!(SyntaxErrorConstructor, SyntaxError);
error_constructor!(TypeErrorConstructor, TypeError);

pub(crate) struct ErrorPrototype;

struct ErrorPrototypeToString;
impl Builtin for ErrorPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ErrorPrototype::to_string);
}

impl ErrorPrototype {
    /// ### [20.5.3.4 Error.prototype.toString ( )](https://tc39.es/ecma262/#sec-error.prototype.tostring)
    fn to_string(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. If O is not an Object, throw a TypeError exception.
        let Some(o) = this_value.as_object() else {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Error.prototype.toString called on non-object".to_owned(),
            ));
        };
        // 3. Let name be ? Get(O, "name").
        let name_key = PropertyKey::from_str(agent, "name");
        let name = get(agent, o, name_key)?;
        // 4. If name is undefined, set name to "Error"; otherwise set name to ? ToString(name).
        let name = if name.is_undefined() {
            "Error".to_owned()
        } else {
            to_string(agent, name)?.as_str(agent).to_owned()
        };
        // 5. Let msg be ? Get(O, "message").
        let message_key = PropertyKey::from_str(agent, "message");
        let msg = get(agent, o, message_key)?;
        // 6. If msg is undefined, set msg to the empty String; otherwise set msg to ? ToString(msg).
        let msg = if msg.is_undefined() {
            String::new()
        } else {
            to_string(agent, msg)?.as_str(agent).to_owned()
        };
        // 7. If name is the empty String, return msg.
        // 8. If msg is the empty String, return name.
        // 9. Return the string-concatenation of name, the code unit 0x003A
        //    (COLON), the code unit 0x0020 (SPACE), and msg.
        let result = match (name.is_empty(), msg.is_empty()) {
            (true, _) => msg,
            (_, true) => name,
            _ => format!("{name}: {msg}"),
        };
        Ok(Value::from_str(agent, &result))
    }
}

fn install_constructor<T: Builtin>(agent: &mut Agent, kind: ExceptionType) {
    let constructor = Function::BuiltinFunction(create_builtin_function::<T>(agent));
    let prototype = agent.intrinsics().error_prototype_for(kind);
    // The prototype's `name` and `message`, and the constructor links.
    let name_key = PropertyKey::from_str(agent, "name");
    let name = Value::from_str(agent, T::NAME);
    let message_key = PropertyKey::from_str(agent, "message");
    let empty = Value::from_str(agent, "");
    let constructor_key = PropertyKey::from_str(agent, "constructor");
    let prototype_key = PropertyKey::from_str(agent, "prototype");
    let prototype_data = &mut agent[prototype];
    prototype_data.set_own(constructor_key, constructor.into());
    prototype_data.set_own(name_key, name);
    prototype_data.set_own(message_key, empty);
    let backing_object = constructor.get_or_create_backing_object(agent);
    agent[backing_object].set_own(prototype_key, Value::Object(prototype));
    // The global binding.
    let global = agent.global_object();
    let global_key = PropertyKey::from_str(agent, T::NAME);
    agent[global].set_own(global_key, constructor.into());
}

/// Installs `Error` and the native error constructors on the global object.
pub(crate) fn create_intrinsics(agent: &mut Agent) {
    install_constructor::<ErrorConstructor>(agent, ExceptionType::Error);
    install_constructor::<RangeErrorConstructor>(agent, ExceptionType::RangeError);
    install_constructor::<ReferenceErrorConstructor>(agent, ExceptionType::ReferenceError);
    install_constructor::<SyntaxErrorConstructor>(agent, ExceptionType::SyntaxError);
    install_constructor::<TypeErrorConstructor>(agent, ExceptionType::TypeError);
    let error_prototype = agent.intrinsics().error_prototype;
    define_builtin_function::<ErrorPrototypeToString>(agent, error_prototype);
}
