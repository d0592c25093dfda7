// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.1.3 Properties of the Object Prototype Object](https://tc39.es/ecma262/#sec-properties-of-the-object-prototype-object)

use super::{ArgumentsList, Behaviour, Builtin, define_builtin_function};
use crate::ecmascript::{
    abstract_operations::operations_on_objects::has_own_property,
    execution::{Agent, JsResult, agent::ExceptionType},
    types::{PropertyKey, Value},
};

pub(crate) struct ObjectPrototype;

struct ObjectPrototypeHasOwnProperty;
impl Builtin for ObjectPrototypeHasOwnProperty {
    const NAME: &'static str = "hasOwnProperty";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::has_own_property);
}

struct ObjectPrototypeToString;
impl Builtin for ObjectPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::to_string);
}

struct ObjectPrototypeValueOf;
impl Builtin for ObjectPrototypeValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::value_of);
}

impl ObjectPrototype {
    /// ### [20.1.3.2 Object.prototype.hasOwnProperty ( V )](https://tc39.es/ecma262/#sec-object.prototype.hasownproperty)
    fn has_own_property(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Let P be ? ToPropertyKey(V).
        let p = PropertyKey::from_value(agent, arguments.get(0))?;
        // 2. Let O be ? ToObject(this value).
        // 3. Return ? HasOwnProperty(O, P).
        match this_value.as_object() {
            Some(o) => Ok(has_own_property(agent, o, p).into()),
            None if this_value.is_nullish() => Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Cannot convert undefined or null to object".to_owned(),
            )),
            None => Ok(false.into()),
        }
    }

    /// ### [20.1.3.6 Object.prototype.toString ( )](https://tc39.es/ecma262/#sec-object.prototype.tostring)
    fn to_string(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. If the this value is undefined, return "[object Undefined]".
        // 2. If the this value is null, return "[object Null]".
        let builtin_tag = match this_value {
            Value::Undefined => "Undefined",
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            // 5. If isArray is true, let builtinTag be "Array".
            Value::Array(_) => "Array",
            // 7. Else if O has a [[Call]] internal method, let builtinTag be "Function".
            Value::Function(_) => "Function",
            Value::Object(o) => {
                let error_prototype = agent.intrinsics().error_prototype;
                let mut prototype = agent[o].prototype;
                let mut tag = "Object";
                while let Some(current) = prototype {
                    if current == error_prototype {
                        tag = "Error";
                        break;
                    }
                    prototype = agent[current].prototype;
                }
                tag
            }
        };
        let tag = format!("[object {builtin_tag}]");
        Ok(Value::from_str(agent, &tag))
    }

    /// ### [20.1.3.7 Object.prototype.valueOf ( )](https://tc39.es/ecma262/#sec-object.prototype.valueof)
    fn value_of(_agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return ? ToObject(this value).
        Ok(this_value)
    }

    pub(crate) fn create_intrinsic(agent: &mut Agent) {
        let prototype = agent.intrinsics().object_prototype;
        define_builtin_function::<ObjectPrototypeHasOwnProperty>(agent, prototype);
        define_builtin_function::<ObjectPrototypeToString>(agent, prototype);
        define_builtin_function::<ObjectPrototypeValueOf>(agent, prototype);
    }
}
