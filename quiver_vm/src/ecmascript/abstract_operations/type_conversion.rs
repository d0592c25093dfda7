// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [7.1 Type Conversion](https://tc39.es/ecma262/#sec-type-conversion)
//!
//! The ECMAScript language implicitly performs automatic type conversion as
//! needed. To clarify the semantics of certain constructs it is useful to
//! define a set of conversion abstract operations.

use super::{operations_on_objects::get, testing_and_comparison::is_callable};
use crate::{
    ecmascript::{
        builtins::CallSite,
        execution::{Agent, JsResult, agent::ExceptionType},
        types::{Object, PropertyKey, Value},
    },
    heap::HeapString,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PreferredType {
    String,
    Number,
}

/// ### [7.1.1 ToPrimitive ( input \[ , preferredType \] )](https://tc39.es/ecma262/#sec-toprimitive)
pub(crate) fn to_primitive(
    agent: &mut Agent,
    input: Value,
    preferred_type: Option<PreferredType>,
) -> JsResult<Value> {
    // 1. If input is an Object, then
    let Some(input) = input.as_object() else {
        // 2. Return input.
        return Ok(input);
    };
    // a. Let exoticToPrim be ? GetMethod(input, @@toPrimitive).
    // Symbols are not supported, so there is no exotic conversion.
    // c. If preferredType is not present, let preferredType be NUMBER.
    // d. Return ? OrdinaryToPrimitive(input, preferredType).
    ordinary_to_primitive(agent, input, preferred_type.unwrap_or(PreferredType::Number))
}

/// ### [7.1.1.1 OrdinaryToPrimitive ( O, hint )](https://tc39.es/ecma262/#sec-ordinarytoprimitive)
pub(crate) fn ordinary_to_primitive(
    agent: &mut Agent,
    o: Object,
    hint: PreferredType,
) -> JsResult<Value> {
    // 1. If hint is STRING, then
    //    a. Let methodNames be « "toString", "valueOf" ».
    // 2. Else,
    //    a. Let methodNames be « "valueOf", "toString" ».
    let method_names = match hint {
        PreferredType::String => ["toString", "valueOf"],
        PreferredType::Number => ["valueOf", "toString"],
    };
    // 3. For each element name of methodNames, do
    for name in method_names {
        // a. Let method be ? Get(O, name).
        let key = PropertyKey::from_str(agent, name);
        let method = get(agent, o, key)?;
        // b. If IsCallable(method) is true, then
        if let Some(method) = is_callable(method) {
            // i. Let result be ? Call(method, O).
            let result = method.call(agent, CallSite::Method(o.into()), &[])?;
            // ii. If result is not an Object, return result.
            if !result.is_object() {
                return Ok(result);
            }
        }
    }
    // 4. Throw a TypeError exception.
    Err(agent.throw_exception(
        ExceptionType::TypeError,
        "Cannot convert object to primitive value".to_owned(),
    ))
}

/// ### [7.1.2 ToBoolean ( argument )](https://tc39.es/ecma262/#sec-toboolean)
pub(crate) fn to_boolean(agent: &Agent, argument: Value) -> bool {
    match argument {
        // 1. If argument is a Boolean, return argument.
        Value::Boolean(b) => b,
        // 2. If argument is one of undefined, null, +0𝔽, -0𝔽, NaN, 0ℤ, or the
        //    empty String, return false.
        Value::Undefined | Value::Null => false,
        Value::Number(n) => !(n == 0.0 || n.is_nan()),
        Value::String(s) => !s.is_empty(agent),
        // 4. Return true.
        Value::Object(_) | Value::Array(_) | Value::Function(_) => true,
    }
}

/// ### [7.1.4 ToNumber ( argument )](https://tc39.es/ecma262/#sec-tonumber)
pub(crate) fn to_number(agent: &mut Agent, argument: Value) -> JsResult<f64> {
    match argument {
        // 1. If argument is a Number, return argument.
        Value::Number(n) => Ok(n),
        // 3. If argument is undefined, return NaN.
        Value::Undefined => Ok(f64::NAN),
        // 4. If argument is either null or false, return +0𝔽.
        // 5. If argument is true, return 1𝔽.
        Value::Null => Ok(0.0),
        Value::Boolean(b) => Ok(if b { 1.0 } else { 0.0 }),
        // 6. If argument is a String, return StringToNumber(argument).
        Value::String(s) => Ok(string_to_number(s.as_str(agent))),
        // 8. Assert: argument is an Object.
        // 9. Let primValue be ? ToPrimitive(argument, NUMBER).
        // 11. Return ? ToNumber(primValue).
        Value::Object(_) | Value::Array(_) | Value::Function(_) => {
            let prim_value = to_primitive(agent, argument, Some(PreferredType::Number))?;
            to_number(agent, prim_value)
        }
    }
}

/// ### [7.1.4.1.1 StringToNumber ( str )](https://tc39.es/ecma262/#sec-stringtonumber)
pub(crate) fn string_to_number(str: &str) -> f64 {
    let str = str.trim_matches(is_trimmable_whitespace);
    if str.is_empty() {
        return 0.0;
    }
    let (sign, unsigned) = match str.as_bytes()[0] {
        b'-' => (-1.0, &str[1..]),
        b'+' => (1.0, &str[1..]),
        _ => (1.0, str),
    };
    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }
    // Non-decimal literals have no sign.
    if sign == 1.0 && unsigned.len() == str.len() && str.len() > 2 {
        let radix = match &str.as_bytes()[..2] {
            b"0x" | b"0X" => Some(16),
            b"0o" | b"0O" => Some(8),
            b"0b" | b"0B" => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return parse_radix(&str[2..], radix).unwrap_or(f64::NAN);
        }
    }
    // fast-float also accepts "inf" and "nan" spellings which are not
    // StringNumericLiterals.
    if !unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return f64::NAN;
    }
    match fast_float::parse::<f64, _>(unsigned) {
        Ok(value) => sign * value,
        Err(_) => f64::NAN,
    }
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0, |acc, c| {
        c.to_digit(radix).map(|digit| acc * radix as f64 + digit as f64)
    })
}

fn is_trimmable_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}' | '\u{000B}' | '\u{000C}' | '\u{FEFF}' | '\u{000A}' | '\u{000D}' | '\u{2028}'
            | '\u{2029}'
    ) || c.is_whitespace()
}

/// ### [7.1.6 ToInt32 ( argument )](https://tc39.es/ecma262/#sec-toint32)
pub(crate) fn to_int32(agent: &mut Agent, argument: Value) -> JsResult<i32> {
    Ok(to_uint32(agent, argument)? as i32)
}

/// ### [7.1.7 ToUint32 ( argument )](https://tc39.es/ecma262/#sec-touint32)
pub(crate) fn to_uint32(agent: &mut Agent, argument: Value) -> JsResult<u32> {
    // 1. Let number be ? ToNumber(argument).
    let number = to_number(agent, argument)?;
    // 2. If number is not finite or number is either +0𝔽 or -0𝔽, return +0𝔽.
    if !number.is_finite() || number == 0.0 {
        return Ok(0);
    }
    // 3. Let int be truncate(ℝ(number)).
    // 4. Let int32bit be int modulo 2^32.
    // 5. Return 𝔽(int32bit).
    Ok(number.trunc().rem_euclid(4294967296.0) as u32)
}

/// ### [7.1.17 ToString ( argument )](https://tc39.es/ecma262/#sec-tostring)
pub(crate) fn to_string(agent: &mut Agent, argument: Value) -> JsResult<HeapString> {
    let data = match argument {
        // 1. If argument is a String, return argument.
        Value::String(s) => return Ok(s),
        // 3. If argument is undefined, return "undefined".
        Value::Undefined => "undefined".to_owned(),
        // 4. If argument is null, return "null".
        Value::Null => "null".to_owned(),
        // 5. If argument is true, return "true".
        // 6. If argument is false, return "false".
        Value::Boolean(b) => b.to_string(),
        // 7. If argument is a Number, return Number::toString(argument, 10).
        Value::Number(n) => number_to_string(n),
        // 10. Assert: argument is an Object.
        // 11. Let primValue be ? ToPrimitive(argument, STRING).
        // 13. Return ? ToString(primValue).
        Value::Object(_) | Value::Array(_) | Value::Function(_) => {
            let prim_value = to_primitive(agent, argument, Some(PreferredType::String))?;
            return to_string(agent, prim_value);
        }
    };
    Ok(agent.heap.create_string(&data))
}

/// ### [6.1.6.1.20 Number::toString ( x, radix )](https://tc39.es/ecma262/#sec-numeric-types-number-tostring)
pub(crate) fn number_to_string(x: f64) -> String {
    // -0 prints as "0".
    if x == 0.0 {
        return "0".to_owned();
    }
    let mut buffer = ryu_js::Buffer::new();
    buffer.format(x).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_print_like_javascript() {
        assert_eq!(number_to_string(42.0), "42");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn string_to_number_follows_string_numeric_literal() {
        assert_eq!(string_to_number("  42  "), 42.0);
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("-1.5e3"), -1500.0);
        assert_eq!(string_to_number("0x1F"), 31.0);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("12px").is_nan());
        assert!(string_to_number("-0x10").is_nan());
    }
}
