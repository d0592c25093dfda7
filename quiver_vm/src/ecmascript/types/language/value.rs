// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{Function, Object};
use crate::{
    ecmascript::{
        abstract_operations::type_conversion::{to_number, to_string},
        execution::{Agent, JsResult},
    },
    heap::{
        Array, HeapString, OrdinaryObject,
        heap_gc::{HeapMarkAndSweep, WorkQueues},
    },
};

/// ### [6.1 ECMAScript Language Types](https://tc39.es/ecma262/#sec-ecmascript-language-types)
///
/// Values are small `Copy` handles; anything that does not fit inline lives
/// on the agent's heap.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Value {
    /// ### [6.1.1 The Undefined Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-undefined-type)
    #[default]
    Undefined,
    /// ### [6.1.2 The Null Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-null-type)
    Null,
    /// ### [6.1.3 The Boolean Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-boolean-type)
    Boolean(bool),
    /// ### [6.1.6.1 The Number Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-number-type)
    Number(f64),
    /// ### [6.1.4 The String Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-string-type)
    String(HeapString),
    /// ### [6.1.7 The Object Type](https://tc39.es/ecma262/#sec-object-type)
    Object(OrdinaryObject),
    Array(Array),
    Function(Function),
}

impl Value {
    pub fn from_str(agent: &mut Agent, data: &str) -> Self {
        Value::String(HeapString::from_str(agent, data))
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for `undefined` and `null`.
    pub fn is_nullish(self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_object(self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_) | Value::Function(_))
    }

    pub fn as_number(self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_object(self) -> Option<Object> {
        Object::try_from(self).ok()
    }

    pub fn as_function(self) -> Option<Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Reads a string value without going through ToString.
    pub fn as_str<'b>(self, agent: &'b Agent<'_>) -> Option<&'b str> {
        match self {
            Value::String(s) => Some(s.as_str(agent)),
            _ => None,
        }
    }

    pub fn to_number(self, agent: &mut Agent) -> JsResult<f64> {
        to_number(agent, self)
    }

    pub fn to_string(self, agent: &mut Agent) -> JsResult<HeapString> {
        to_string(agent, self)
    }

    /// A printable rendering of the value for diagnostics, such as uncaught
    /// exceptions. Never runs user code.
    pub fn string_repr(self, agent: &Agent) -> String {
        crate::ecmascript::builtins::console::inspect(agent, self)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(value.into())
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Number(value as f64)
    }
}

impl From<HeapString> for Value {
    fn from(value: HeapString) -> Self {
        Value::String(value)
    }
}

impl From<OrdinaryObject> for Value {
    fn from(value: OrdinaryObject) -> Self {
        Value::Object(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Value::Function(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        match value {
            Object::Object(o) => Value::Object(o),
            Object::Array(a) => Value::Array(a),
            Object::Function(f) => Value::Function(f),
        }
    }
}

impl HeapMarkAndSweep for Value {
    fn mark_values(&self, queues: &mut WorkQueues) {
        match self {
            Value::Undefined | Value::Null | Value::Boolean(_) | Value::Number(_) => {}
            Value::String(s) => s.mark_values(queues),
            Value::Object(o) => o.mark_values(queues),
            Value::Array(a) => a.mark_values(queues),
            Value::Function(f) => f.mark_values(queues),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_equality_follows_ieee_754() {
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_eq!(Value::Number(0.0), Value::Number(-0.0));
        assert_ne!(Value::Undefined, Value::Null);
    }

    #[test]
    fn nullish_covers_undefined_and_null() {
        assert!(Value::Undefined.is_nullish());
        assert!(Value::Null.is_nullish());
        assert!(!Value::Boolean(false).is_nullish());
    }
}
