// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [7.3 Operations on Objects](https://tc39.es/ecma262/#sec-operations-on-objects)
//!
//! Objects only carry data properties. Arrays keep their elements inline
//! and functions compute `name` and `length`; every other property of
//! either lives on a lazily created backing object.

use super::{testing_and_comparison::is_callable, type_conversion::to_number};
use crate::{
    ecmascript::{
        builtins::{CallSite, array::array_set_length},
        execution::{Agent, JsResult, agent::ExceptionType},
        types::{Function, Object, PropertyKey, Value},
    },
    heap::{Array, OrdinaryObject},
};

fn is_key(agent: &Agent, key: PropertyKey, name: &str) -> bool {
    key.as_str(agent) == Some(name)
}

/// ### \[\[GetPrototypeOf\]\] ( )
pub(crate) fn get_prototype_of(agent: &Agent, o: Object) -> Option<OrdinaryObject> {
    match o {
        Object::Object(o) => agent[o].prototype,
        Object::Array(_) => Some(agent.intrinsics().array_prototype),
        Object::Function(_) => Some(agent.intrinsics().function_prototype),
    }
}

/// ### \[\[GetOwnProperty\]\] ( P )
///
/// Returns the value of an own data property.
pub(crate) fn get_own_property(agent: &mut Agent, o: Object, key: PropertyKey) -> Option<Value> {
    match o {
        Object::Object(o) => agent[o].get_own(key),
        Object::Array(a) => {
            if let PropertyKey::Index(index) = key {
                return agent[a].elements.get(index as usize).copied();
            }
            if is_key(agent, key, "length") {
                return Some(agent[a].elements.len().into());
            }
            let backing_object = agent[a].backing_object?;
            agent[backing_object].get_own(key)
        }
        Object::Function(f) => {
            if is_key(agent, key, "name") {
                let name = f.name(agent);
                return Some(Value::from_str(agent, &name));
            }
            if is_key(agent, key, "length") {
                return Some(f.length(agent).into());
            }
            let backing_object = f.backing_object(agent)?;
            agent[backing_object].get_own(key)
        }
    }
}

/// ### [7.3.12 HasOwnProperty ( O, P )](https://tc39.es/ecma262/#sec-hasownproperty)
pub(crate) fn has_own_property(agent: &mut Agent, o: Object, key: PropertyKey) -> bool {
    get_own_property(agent, o, key).is_some()
}

/// ### [7.3.11 HasProperty ( O, P )](https://tc39.es/ecma262/#sec-hasproperty)
pub(crate) fn has_property(agent: &mut Agent, o: Object, key: PropertyKey) -> bool {
    if has_own_property(agent, o, key) {
        return true;
    }
    let mut prototype = get_prototype_of(agent, o);
    while let Some(current) = prototype {
        if agent[current].has_own(key) {
            return true;
        }
        prototype = agent[current].prototype;
    }
    false
}

/// ### [7.3.2 Get ( O, P )](https://tc39.es/ecma262/#sec-get-o-p)
pub(crate) fn get(agent: &mut Agent, o: Object, key: PropertyKey) -> JsResult<Value> {
    if let Some(value) = get_own_property(agent, o, key) {
        return Ok(value);
    }
    Ok(get_from_prototype_chain(agent, get_prototype_of(agent, o), key))
}

fn get_from_prototype_chain(
    agent: &Agent,
    mut prototype: Option<OrdinaryObject>,
    key: PropertyKey,
) -> Value {
    while let Some(current) = prototype {
        if let Some(value) = agent[current].get_own(key) {
            return value;
        }
        prototype = agent[current].prototype;
    }
    Value::Undefined
}

/// ### [7.3.3 GetV ( V, P )](https://tc39.es/ecma262/#sec-getv)
///
/// Primitives have no wrapper objects: strings answer `length` and index
/// reads themselves, and otherwise every primitive reads through
/// `Object.prototype`.
pub(crate) fn get_v(agent: &mut Agent, v: Value, key: PropertyKey) -> JsResult<Value> {
    if let Some(o) = v.as_object() {
        return get(agent, o, key);
    }
    match v {
        Value::Undefined | Value::Null => {
            let message = format!(
                "Cannot read properties of {} (reading '{}')",
                if v.is_null() { "null" } else { "undefined" },
                key.display(agent)
            );
            Err(agent.throw_exception(ExceptionType::TypeError, message))
        }
        Value::String(s) => {
            if is_key(agent, key, "length") {
                return Ok(s.utf16_len(agent).into());
            }
            if let PropertyKey::Index(index) = key {
                let code_unit = s.as_str(agent).encode_utf16().nth(index as usize);
                if let Some(code_unit) = code_unit {
                    let data = String::from_utf16_lossy(&[code_unit]);
                    return Ok(Value::from_str(agent, &data));
                }
            }
            let object_prototype = agent.intrinsics().object_prototype;
            Ok(get_from_prototype_chain(agent, Some(object_prototype), key))
        }
        _ => {
            let object_prototype = agent.intrinsics().object_prototype;
            Ok(get_from_prototype_chain(agent, Some(object_prototype), key))
        }
    }
}

/// ### [7.3.4 Set ( O, P, V, Throw )](https://tc39.es/ecma262/#sec-set-o-p-v-throw)
///
/// The only properties that refuse writes are the `name` and `length` of
/// functions; with `throw` set that is a TypeError, otherwise the write is
/// ignored.
pub(crate) fn set(
    agent: &mut Agent,
    o: Object,
    key: PropertyKey,
    value: Value,
    throw: bool,
) -> JsResult<()> {
    match o {
        Object::Object(o) => {
            agent[o].set_own(key, value);
            Ok(())
        }
        Object::Array(a) => array_set(agent, a, key, value),
        Object::Function(f) => {
            if is_key(agent, key, "name") || is_key(agent, key, "length") {
                if throw {
                    let message = format!(
                        "Cannot assign to read only property '{}' of function '{}'",
                        key.display(agent),
                        f.name(agent)
                    );
                    return Err(agent.throw_exception(ExceptionType::TypeError, message));
                }
                return Ok(());
            }
            let backing_object = f.get_or_create_backing_object(agent);
            agent[backing_object].set_own(key, value);
            Ok(())
        }
    }
}

/// ### [10.4.2.1 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-array-exotic-objects-defineownproperty-p-desc)
///
/// Writing past the end grows the array, filling the gap with `undefined`.
fn array_set(agent: &mut Agent, a: Array, key: PropertyKey, value: Value) -> JsResult<()> {
    if let PropertyKey::Index(index) = key {
        let index = index as usize;
        if index >= agent[a].elements.len() {
            array_set_length(agent, a, index + 1)?;
        }
        agent[a].elements[index] = value;
        return Ok(());
    }
    if is_key(agent, key, "length") {
        // ArraySetLength ( A, Desc )
        let number_len = to_number(agent, value)?;
        let new_len = number_len as u32;
        if new_len as f64 != number_len {
            return Err(agent.throw_exception(
                ExceptionType::RangeError,
                "Invalid array length".to_owned(),
            ));
        }
        return array_set_length(agent, a, new_len as usize);
    }
    let backing_object = match agent[a].backing_object {
        Some(backing_object) => backing_object,
        None => {
            let backing_object = agent.heap.create_object(None);
            agent[a].backing_object = Some(backing_object);
            backing_object
        }
    };
    agent[backing_object].set_own(key, value);
    Ok(())
}

/// PutValue on a primitive base: writes to `undefined` and `null` throw,
/// writes to other primitives are dropped, or throw in strict mode code.
pub(crate) fn set_v(
    agent: &mut Agent,
    v: Value,
    key: PropertyKey,
    value: Value,
    strict: bool,
) -> JsResult<()> {
    if let Some(o) = v.as_object() {
        return set(agent, o, key, value, strict);
    }
    if v.is_nullish() {
        let message = format!(
            "Cannot set properties of {} (setting '{}')",
            if v.is_null() { "null" } else { "undefined" },
            key.display(agent)
        );
        return Err(agent.throw_exception(ExceptionType::TypeError, message));
    }
    if strict {
        let message = format!(
            "Cannot create property '{}' on {} '{}'",
            key.display(agent),
            type_name(v),
            v.string_repr(agent)
        );
        return Err(agent.throw_exception(ExceptionType::TypeError, message));
    }
    Ok(())
}

fn type_name(v: Value) -> &'static str {
    match v {
        Value::Boolean(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        _ => "object",
    }
}

/// ### [7.3.9 DeletePropertyOrThrow ( O, P )](https://tc39.es/ecma262/#sec-deletepropertyorthrow)
pub(crate) fn delete_property(agent: &mut Agent, o: Object, key: PropertyKey) -> bool {
    match o {
        Object::Object(o) => agent[o].delete_own(key),
        Object::Array(a) => match key {
            // Elements are kept dense: only the last one can go away.
            PropertyKey::Index(index) => {
                let elements = &mut agent[a].elements;
                if index as usize + 1 == elements.len() {
                    elements.pop();
                    true
                } else {
                    index as usize >= elements.len()
                }
            }
            _ if is_key(agent, key, "length") => false,
            _ => agent[a]
                .backing_object
                .is_none_or(|backing_object| agent[backing_object].delete_own(key)),
        },
        Object::Function(f) => {
            if is_key(agent, key, "name") || is_key(agent, key, "length") {
                return false;
            }
            f.backing_object(agent)
                .is_none_or(|backing_object| agent[backing_object].delete_own(key))
        }
    }
}

/// ### [7.3.13 Call ( F, V \[ , argumentsList \] )](https://tc39.es/ecma262/#sec-call)
pub(crate) fn call(
    agent: &mut Agent,
    f: Value,
    call_site: CallSite,
    arguments_list: &[Value],
) -> JsResult<Value> {
    // 2. If IsCallable(F) is false, throw a TypeError exception.
    let Some(f) = is_callable(f) else {
        let message = format!("{} is not a function", f.string_repr(agent));
        return Err(agent.throw_exception(ExceptionType::TypeError, message));
    };
    // 3. Return ? F.[[Call]](V, argumentsList).
    f.call(agent, call_site, arguments_list)
}

/// ### [7.3.14 Construct ( F \[ , argumentsList \[ , newTarget \] \] )](https://tc39.es/ecma262/#sec-construct)
pub(crate) fn construct(
    agent: &mut Agent,
    f: Function,
    arguments_list: &[Value],
    new_target: Option<Function>,
) -> JsResult<Value> {
    // 1. If newTarget is not present, set newTarget to F.
    let new_target = new_target.unwrap_or(f);
    if !f.is_constructor(agent) {
        let name = f.name(agent);
        let message = if name.is_empty() {
            "anonymous function is not a constructor".to_owned()
        } else {
            format!("{name} is not a constructor")
        };
        return Err(agent.throw_exception(ExceptionType::TypeError, message));
    }
    // 3. Return ? F.[[Construct]](argumentsList, newTarget).
    f.construct(agent, arguments_list, new_target)
}

/// ### [10.1.14 GetPrototypeFromConstructor ( constructor, intrinsicDefaultProto )](https://tc39.es/ecma262/#sec-getprototypefromconstructor)
///
/// Falls back to `Object.prototype` when `constructor.prototype` is not an
/// ordinary object.
pub(crate) fn get_prototype_from_constructor(
    agent: &mut Agent,
    constructor: Function,
) -> JsResult<OrdinaryObject> {
    // 2. Let proto be ? Get(constructor, "prototype").
    let key = PropertyKey::from_str(agent, "prototype");
    let proto = get(agent, Object::Function(constructor), key)?;
    // 3. If proto is not an Object, then
    match proto {
        Value::Object(proto) => Ok(proto),
        // a. Let realm be ? GetFunctionRealm(constructor).
        // b. Set proto to realm's intrinsic object named intrinsicDefaultProto.
        _ => Ok(agent.intrinsics().object_prototype),
    }
}

/// ### [7.3.21 OrdinaryHasInstance ( C, O )](https://tc39.es/ecma262/#sec-ordinaryhasinstance)
pub(crate) fn ordinary_has_instance(agent: &mut Agent, c: Value, o: Value) -> JsResult<bool> {
    // 1. If IsCallable(C) is false, return false.
    let Some(c) = is_callable(c) else {
        let message = "Right-hand side of 'instanceof' is not callable".to_owned();
        return Err(agent.throw_exception(ExceptionType::TypeError, message));
    };
    // 2. If C has a [[BoundTargetFunction]] internal slot, then
    if let Function::BoundFunction(bound) = c {
        // a. Let BC be C.[[BoundTargetFunction]].
        // b. Return ? InstanceofOperator(O, BC).
        let target = agent[bound].target;
        return ordinary_has_instance(agent, target.into(), o);
    }
    // 3. If O is not an Object, return false.
    let Some(o) = o.as_object() else {
        return Ok(false);
    };
    // 4. Let P be ? Get(C, "prototype").
    let key = PropertyKey::from_str(agent, "prototype");
    let p = get(agent, Object::Function(c), key)?;
    // 5. If P is not an Object, throw a TypeError exception.
    let Value::Object(p) = p else {
        return Ok(false);
    };
    // 6. Repeat,
    let mut prototype = get_prototype_of(agent, o);
    while let Some(current) = prototype {
        // c. If SameValue(P, O) is true, return true.
        if current == p {
            return Ok(true);
        }
        prototype = agent[current].prototype;
    }
    Ok(false)
}

/// ### [7.3.18 LengthOfArrayLike ( obj )](https://tc39.es/ecma262/#sec-lengthofarraylike)
pub(crate) fn length_of_array_like(agent: &mut Agent, obj: Object) -> JsResult<u32> {
    if let Object::Array(a) = obj {
        return Ok(agent[a].elements.len() as u32);
    }
    // 1. Return ℝ(? ToLength(? Get(obj, "length"))).
    let key = PropertyKey::from_str(agent, "length");
    let length = get(agent, obj, key)?;
    let length = to_number(agent, length)?;
    if length.is_nan() || length <= 0.0 {
        return Ok(0);
    }
    Ok(length.min(u32::MAX as f64) as u32)
}

/// ### [7.3.17 CreateArrayFromList ( elements )](https://tc39.es/ecma262/#sec-createarrayfromlist)
pub(crate) fn create_array_from_list(agent: &mut Agent, elements: Vec<Value>) -> Array {
    agent.heap.create_array(elements)
}
