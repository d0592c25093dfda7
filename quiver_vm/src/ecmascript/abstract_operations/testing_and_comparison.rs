// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [7.2 Testing and Comparison Operations](https://tc39.es/ecma262/#sec-testing-and-comparison-operations)

use super::type_conversion::{PreferredType, to_number, to_primitive};
use crate::ecmascript::{
    execution::{Agent, JsResult},
    types::{Function, Value},
};

/// ### [7.2.3 IsCallable ( argument )](https://tc39.es/ecma262/#sec-iscallable)
pub(crate) fn is_callable(argument: Value) -> Option<Function> {
    argument.as_function()
}

/// ### [7.2.4 IsConstructor ( argument )](https://tc39.es/ecma262/#sec-isconstructor)
pub(crate) fn is_constructor(agent: &Agent, argument: Value) -> Option<Function> {
    argument
        .as_function()
        .filter(|function| function.is_constructor(agent))
}

/// ### [7.2.14 IsLessThan ( x, y, LeftFirst )](https://tc39.es/ecma262/#sec-islessthan)
///
/// Returns `None` where ECMA-262 returns undefined: at least one
/// operand is NaN.
pub(crate) fn is_less_than(
    agent: &mut Agent,
    x: Value,
    y: Value,
    left_first: bool,
) -> JsResult<Option<bool>> {
    // 1. If LeftFirst is true, then
    let (px, py) = if left_first {
        // a. Let px be ? ToPrimitive(x, NUMBER).
        // b. Let py be ? ToPrimitive(y, NUMBER).
        let px = to_primitive(agent, x, Some(PreferredType::Number))?;
        let py = to_primitive(agent, y, Some(PreferredType::Number))?;
        (px, py)
    } else {
        // 2. Else,
        // a. NOTE: The order of evaluation needs to be reversed to preserve
        //    left to right evaluation.
        let py = to_primitive(agent, y, Some(PreferredType::Number))?;
        let px = to_primitive(agent, x, Some(PreferredType::Number))?;
        (px, py)
    };
    // 3. If px is a String and py is a String, then
    if let (Value::String(px), Value::String(py)) = (px, py) {
        // Comparison is by UTF-16 code units.
        let px = px.as_str(agent).encode_utf16();
        let py = py.as_str(agent).encode_utf16();
        return Ok(Some(px.lt(py)));
    }
    // 4. Else,
    // c. NOTE: Because px and py are primitive values, evaluation order is
    //    not important.
    // d. Let nx be ? ToNumeric(px).
    // e. Let ny be ? ToNumeric(py).
    let nx = to_number(agent, px)?;
    let ny = to_number(agent, py)?;
    // h. If nx or ny is NaN, return undefined.
    if nx.is_nan() || ny.is_nan() {
        return Ok(None);
    }
    Ok(Some(nx < ny))
}

/// ### [7.2.15 IsLooselyEqual ( x, y )](https://tc39.es/ecma262/#sec-islooselyequal)
pub(crate) fn is_loosely_equal(agent: &mut Agent, x: Value, y: Value) -> JsResult<bool> {
    // 1. If Type(x) is Type(y), then
    //    a. Return IsStrictlyEqual(x, y).
    if same_type(x, y) {
        return Ok(is_strictly_equal(x, y));
    }
    // 2. If x is null and y is undefined, return true.
    // 3. If x is undefined and y is null, return true.
    if x.is_nullish() && y.is_nullish() {
        return Ok(true);
    }
    match (x, y) {
        // 5. If x is a Number and y is a String, return ! IsLooselyEqual(x, ! ToNumber(y)).
        // 6. If x is a String and y is a Number, return ! IsLooselyEqual(! ToNumber(x), y).
        (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            let x = to_number(agent, x)?;
            let y = to_number(agent, y)?;
            Ok(x == y)
        }
        // 9. If x is a Boolean, return ! IsLooselyEqual(! ToNumber(x), y).
        (Value::Boolean(_), _) => {
            let x = to_number(agent, x)?;
            is_loosely_equal(agent, Value::Number(x), y)
        }
        // 10. If y is a Boolean, return ! IsLooselyEqual(x, ! ToNumber(y)).
        (_, Value::Boolean(_)) => {
            let y = to_number(agent, y)?;
            is_loosely_equal(agent, x, Value::Number(y))
        }
        // 11. If x is either a String or a Number and y is an Object, return
        //     ! IsLooselyEqual(x, ? ToPrimitive(y)).
        (Value::String(_) | Value::Number(_), _) if y.is_object() => {
            let y = to_primitive(agent, y, None)?;
            is_loosely_equal(agent, x, y)
        }
        // 12. If x is an Object and y is either a String or a Number, return
        //     ! IsLooselyEqual(? ToPrimitive(x), y).
        (_, Value::String(_) | Value::Number(_)) if x.is_object() => {
            let x = to_primitive(agent, x, None)?;
            is_loosely_equal(agent, x, y)
        }
        // 14. Return false.
        _ => Ok(false),
    }
}

/// ### [7.2.16 IsStrictlyEqual ( x, y )](https://tc39.es/ecma262/#sec-isstrictlyequal)
///
/// Strings are interned, so comparing handles compares contents.
pub(crate) fn is_strictly_equal(x: Value, y: Value) -> bool {
    x == y
}

fn same_type(x: Value, y: Value) -> bool {
    if x.is_object() && y.is_object() {
        return true;
    }
    core::mem::discriminant(&x) == core::mem::discriminant(&y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_equality_equates_zeros_but_not_nans() {
        assert!(!is_strictly_equal(Value::Number(f64::NAN), Value::Number(f64::NAN)));
        assert!(is_strictly_equal(Value::Number(0.0), Value::Number(-0.0)));
    }

    #[test]
    fn objects_of_different_kinds_share_a_type() {
        use crate::heap::{Array, OrdinaryObject};
        let object = Value::Object(OrdinaryObject::from_index(0));
        let array = Value::Array(Array::from_index(0));
        assert!(same_type(object, array));
        assert!(!same_type(Value::Null, Value::Undefined));
    }
}
