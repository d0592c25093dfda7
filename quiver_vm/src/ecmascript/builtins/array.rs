// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [23.1 Array Objects](https://tc39.es/ecma262/#sec-array-objects)

use super::{ArgumentsList, Behaviour, Builtin, CallSite, define_builtin_function};
use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_objects::{
                create_array_from_list, get, has_property, length_of_array_like, set,
            },
            testing_and_comparison::{is_callable, is_strictly_equal},
            type_conversion::{to_boolean, to_number, to_string},
        },
        execution::{Agent, JsResult, agent::ExceptionType},
        types::{Function, Object, PropertyKey, Value},
    },
    heap::{
        Array, OrdinaryObject,
        heap_gc::{HeapMarkAndSweep, WorkQueues},
    },
};

/// Longest array that can be created. Elements are stored densely, so the
/// length is capped far below the 2^32 - 1 that ECMA-262 allows.
pub(crate) const MAXIMUM_ARRAY_LENGTH: usize = 1 << 22;

/// Storage of an Array exotic object. Elements are dense; writing past the
/// end fills the gap with `undefined`.
#[derive(Debug, Clone, Default)]
pub struct ArrayHeapData {
    pub(crate) elements: Vec<Value>,
    /// Holds non-index properties assigned onto the array.
    pub(crate) backing_object: Option<OrdinaryObject>,
}

impl ArrayHeapData {
    pub(crate) fn new(elements: Vec<Value>) -> Self {
        Self {
            elements,
            backing_object: None,
        }
    }
}

/// Resizes the elements of `a` to `new_len`, filling new slots with
/// `undefined`. Throws a RangeError past [`MAXIMUM_ARRAY_LENGTH`].
pub(crate) fn array_set_length(agent: &mut Agent, a: Array, new_len: usize) -> JsResult<()> {
    if new_len > MAXIMUM_ARRAY_LENGTH {
        return Err(agent.throw_exception(
            ExceptionType::RangeError,
            "Invalid array length".to_owned(),
        ));
    }
    agent[a].elements.resize(new_len, Value::Undefined);
    Ok(())
}

impl HeapMarkAndSweep for ArrayHeapData {
    fn mark_values(&self, queues: &mut WorkQueues) {
        self.elements.mark_values(queues);
        self.backing_object.mark_values(queues);
    }
}

pub(crate) struct ArrayPrototype;

struct ArrayPrototypeFilter;
impl Builtin for ArrayPrototypeFilter {
    const NAME: &'static str = "filter";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayPrototype::filter);
}
struct ArrayPrototypeForEach;
impl Builtin for ArrayPrototypeForEach {
    const NAME: &'static str = "forEach";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayPrototype::for_each);
}
struct ArrayPrototypeIndexOf;
impl Builtin for ArrayPrototypeIndexOf {
    const NAME: &'static str = "indexOf";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayPrototype::index_of);
}
struct ArrayPrototypeJoin;
impl Builtin for ArrayPrototypeJoin {
    const NAME: &'static str = "join";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayPrototype::join);
}
struct ArrayPrototypeMap;
impl Builtin for ArrayPrototypeMap {
    const NAME: &'static str = "map";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayPrototype::map);
}
struct ArrayPrototypePush;
impl Builtin for ArrayPrototypePush {
    const NAME: &'static str = "push";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayPrototype::push);
}
struct ArrayPrototypeToString;
impl Builtin for ArrayPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayPrototype::to_string);
}

/// The `this` value of an Array.prototype method as an object.
///
/// Primitives have no wrapper objects, so only objects are accepted.
fn this_object(agent: &mut Agent, this_value: Value, method: &str) -> JsResult<Object> {
    match this_value.as_object() {
        Some(o) => Ok(o),
        None => {
            let message = if this_value.is_nullish() {
                format!("Array.prototype.{method} called on null or undefined")
            } else {
                format!("Array.prototype.{method} called on non-object")
            };
            Err(agent.throw_exception(ExceptionType::TypeError, message))
        }
    }
}

fn callback_function(agent: &mut Agent, callback_fn: Value) -> JsResult<Function> {
    match is_callable(callback_fn) {
        Some(callback_fn) => Ok(callback_fn),
        None => {
            let message = format!("{} is not a function", callback_fn.string_repr(agent));
            Err(agent.throw_exception(ExceptionType::TypeError, message))
        }
    }
}

impl ArrayPrototype {
    /// ### [23.1.3.8 Array.prototype.filter ( callbackfn \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.filter)
    ///
    /// > #### Note 1
    /// >
    /// > `callbackfn` should be a function that accepts three arguments and
    /// > returns a value that is coercible to a Boolean value. **filter**
    /// > calls `callbackfn` once for each element in the array, in ascending
    /// > order, and constructs a new array of all the values for which
    /// > `callbackfn` returns **true**.
    /// >
    /// > If a `thisArg` parameter is provided, it will be used as the **this**
    /// > value for each invocation of `callbackfn`. If it is not provided,
    /// > `callbackfn` is invoked without a receiver.
    fn filter(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let callback_fn = arguments.get(0);
        let this_arg = arguments.get(1);

        // 1. Let O be ? ToObject(this value).
        let o = this_object(agent, this_value, "filter")?;
        // 2. Let len be ? LengthOfArrayLike(O).
        let len = length_of_array_like(agent, o)?;
        // 3. If IsCallable(callbackfn) is false, throw a TypeError exception.
        let callback_fn = callback_function(agent, callback_fn)?;
        let call_site = CallSite::from_this_argument(this_arg);
        // 4. Let A be ? ArraySpeciesCreate(O, 0).
        let mut selected_values = Vec::new();
        // 5. Let k be 0.
        // 7. Repeat, while k < len,
        for k in 0..len {
            // a. Let Pk be ! ToString(𝔽(k)).
            let pk = PropertyKey::Index(k);
            // b. Let kPresent be ? HasProperty(O, Pk).
            // c. If kPresent is true, then
            if has_property(agent, o, pk) {
                // i. Let kValue be ? Get(O, Pk).
                let k_value = get(agent, o, pk)?;
                // ii. Let selected be ToBoolean(? Call(callbackfn, thisArg, « kValue, 𝔽(k), O »)).
                let result = callback_fn.call(agent, call_site, &[k_value, k.into(), o.into()])?;
                // iii. If selected is true, then
                if to_boolean(agent, result) {
                    // 1. Perform ? CreateDataPropertyOrThrow(A, ! ToString(𝔽(to)), kValue).
                    // 2. Set to to to + 1.
                    selected_values.push(k_value);
                }
            }
        }
        // 8. Return A.
        Ok(create_array_from_list(agent, selected_values).into())
    }

    /// ### [23.1.3.15 Array.prototype.forEach ( callbackfn \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.foreach)
    fn for_each(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be ? ToObject(this value).
        let o = this_object(agent, this_value, "forEach")?;
        // 2. Let len be ? LengthOfArrayLike(O).
        let len = length_of_array_like(agent, o)?;
        // 3. If IsCallable(callbackfn) is false, throw a TypeError exception.
        let callback_fn = callback_function(agent, arguments.get(0))?;
        let call_site = CallSite::from_this_argument(arguments.get(1));
        // 5. Repeat, while k < len,
        for k in 0..len {
            let pk = PropertyKey::Index(k);
            if has_property(agent, o, pk) {
                let k_value = get(agent, o, pk)?;
                // iii. Perform ? Call(callbackfn, thisArg, « kValue, 𝔽(k), O »).
                callback_fn.call(agent, call_site, &[k_value, k.into(), o.into()])?;
            }
        }
        // 6. Return undefined.
        Ok(Value::Undefined)
    }

    /// ### [23.1.3.17 Array.prototype.indexOf ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-array.prototype.indexof)
    fn index_of(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let search_element = arguments.get(0);
        let o = this_object(agent, this_value, "indexOf")?;
        let len = length_of_array_like(agent, o)?;
        // 3. If len = 0, return -1𝔽.
        if len == 0 {
            return Ok(Value::Number(-1.0));
        }
        // 4. Let n be ? ToIntegerOrInfinity(fromIndex).
        let n = to_number(agent, arguments.get(1))?;
        let n = if n.is_nan() { 0.0 } else { n.trunc() };
        // 6. If n = +∞, return -1𝔽.
        if n >= len as f64 {
            return Ok(Value::Number(-1.0));
        }
        // 8. If n ≥ 0, let k be n.
        // 9. Else, let k be len + n; if k < 0, set k to 0.
        let k = if n >= 0.0 {
            n as u32
        } else {
            (len as f64 + n).max(0.0) as u32
        };
        for k in k..len {
            let pk = PropertyKey::Index(k);
            if has_property(agent, o, pk) {
                let element_k = get(agent, o, pk)?;
                if is_strictly_equal(search_element, element_k) {
                    return Ok(k.into());
                }
            }
        }
        Ok(Value::Number(-1.0))
    }

    /// ### [23.1.3.18 Array.prototype.join ( separator )](https://tc39.es/ecma262/#sec-array.prototype.join)
    fn join(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let o = this_object(agent, this_value, "join")?;
        let len = length_of_array_like(agent, o)?;
        // 3. If separator is undefined, let sep be ",".
        // 4. Else, let sep be ? ToString(separator).
        let separator = arguments.get(0);
        let sep = if separator.is_undefined() {
            ",".to_owned()
        } else {
            let sep = to_string(agent, separator)?;
            sep.as_str(agent).to_owned()
        };
        // 5. Let R be the empty String.
        let mut r = String::new();
        // 7. Repeat, while k < len,
        for k in 0..len {
            // a. If k > 0, set R to the string-concatenation of R and sep.
            if k > 0 {
                r.push_str(&sep);
            }
            // b. Let element be ? Get(O, ! ToString(𝔽(k))).
            let element = get(agent, o, PropertyKey::Index(k))?;
            // c. If element is either undefined or null, let next be the empty String;
            //    otherwise, let next be ? ToString(element).
            if !element.is_nullish() {
                let next = to_string(agent, element)?;
                r.push_str(next.as_str(agent));
            }
        }
        // 8. Return R.
        Ok(Value::from_str(agent, &r))
    }

    /// ### [23.1.3.21 Array.prototype.map ( callbackfn \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.map)
    fn map(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let o = this_object(agent, this_value, "map")?;
        let len = length_of_array_like(agent, o)?;
        let callback_fn = callback_function(agent, arguments.get(0))?;
        let call_site = CallSite::from_this_argument(arguments.get(1));
        // 4. Let A be ? ArraySpeciesCreate(O, len).
        let mut mapped_values = Vec::with_capacity(len as usize);
        for k in 0..len {
            let pk = PropertyKey::Index(k);
            let mapped_value = if has_property(agent, o, pk) {
                let k_value = get(agent, o, pk)?;
                // ii. Let mappedValue be ? Call(callbackfn, thisArg, « kValue, 𝔽(k), O »).
                callback_fn.call(agent, call_site, &[k_value, k.into(), o.into()])?
            } else {
                Value::Undefined
            };
            // iii. Perform ? CreateDataPropertyOrThrow(A, Pk, mappedValue).
            mapped_values.push(mapped_value);
        }
        Ok(create_array_from_list(agent, mapped_values).into())
    }

    /// ### [23.1.3.23 Array.prototype.push ( ...items )](https://tc39.es/ecma262/#sec-array.prototype.push)
    fn push(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let o = this_object(agent, this_value, "push")?;
        if let Object::Array(a) = o {
            let len = agent[a].elements.len();
            array_set_length(agent, a, len + arguments.len())?;
            agent[a].elements[len..].copy_from_slice(arguments.0);
            return Ok(agent[a].elements.len().into());
        }
        // 2. Let len be ? LengthOfArrayLike(O).
        let mut len = length_of_array_like(agent, o)?;
        // 5. For each element E of items, do
        for e in arguments.iter() {
            // a. Perform ? Set(O, ! ToString(𝔽(len)), E, true).
            set(agent, o, PropertyKey::Index(len), *e, true)?;
            // b. Set len to len + 1.
            len += 1;
        }
        // 6. Perform ? Set(O, "length", 𝔽(len), true).
        let length_key = PropertyKey::from_str(agent, "length");
        set(agent, o, length_key, len.into(), true)?;
        // 7. Return 𝔽(len).
        Ok(len.into())
    }

    /// ### [23.1.3.36 Array.prototype.toString ( )](https://tc39.es/ecma262/#sec-array.prototype.tostring)
    fn to_string(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        Self::join(agent, this_value, ArgumentsList::default())
    }

    pub(crate) fn create_intrinsic(agent: &mut Agent) {
        let prototype = agent.intrinsics().array_prototype;
        define_builtin_function::<ArrayPrototypeFilter>(agent, prototype);
        define_builtin_function::<ArrayPrototypeForEach>(agent, prototype);
        define_builtin_function::<ArrayPrototypeIndexOf>(agent, prototype);
        define_builtin_function::<ArrayPrototypeJoin>(agent, prototype);
        define_builtin_function::<ArrayPrototypeMap>(agent, prototype);
        define_builtin_function::<ArrayPrototypePush>(agent, prototype);
        define_builtin_function::<ArrayPrototypeToString>(agent, prototype);
    }
}
