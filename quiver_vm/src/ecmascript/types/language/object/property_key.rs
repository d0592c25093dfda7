// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    ecmascript::{
        abstract_operations::type_conversion::to_string,
        execution::{Agent, JsResult},
        types::Value,
    },
    heap::{
        HeapString,
        heap_gc::{HeapMarkAndSweep, WorkQueues},
    },
};

/// A property key. Array indexes are kept as integers so that element
/// access never round-trips through the string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Index(u32),
    String(HeapString),
}

/// Parses a canonical array index: no sign, no leading zeros, below
/// 2^32 - 1.
fn parse_array_index(data: &str) -> Option<u32> {
    if data.is_empty() || (data.len() > 1 && data.starts_with('0')) {
        return None;
    }
    if !data.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    data.parse::<u32>().ok().filter(|index| *index != u32::MAX)
}

impl PropertyKey {
    pub fn from_str(agent: &mut Agent, data: &str) -> Self {
        match parse_array_index(data) {
            Some(index) => PropertyKey::Index(index),
            None => PropertyKey::String(agent.heap.create_string(data)),
        }
    }

    /// ### [7.1.19 ToPropertyKey ( argument )](https://tc39.es/ecma262/#sec-topropertykey)
    pub fn from_value(agent: &mut Agent, value: Value) -> JsResult<Self> {
        if let Value::Number(n) = value {
            if n >= 0.0 && n < u32::MAX as f64 && n.fract() == 0.0 {
                return Ok(PropertyKey::Index(n as u32));
            }
        }
        let string = to_string(agent, value)?;
        let data = agent[string].as_str().to_owned();
        Ok(Self::from_str(agent, &data))
    }

    pub fn as_str<'b>(self, agent: &'b Agent<'_>) -> Option<&'b str> {
        match self {
            PropertyKey::String(s) => Some(s.as_str(agent)),
            PropertyKey::Index(_) => None,
        }
    }

    /// Renders the key for messages and `console.log`.
    pub fn display(self, agent: &Agent) -> String {
        match self {
            PropertyKey::Index(index) => index.to_string(),
            PropertyKey::String(s) => s.as_str(agent).to_owned(),
        }
    }

    /// Converts the key back into the language value `ToPropertyKey`
    /// would have produced it from.
    pub fn into_value(self, agent: &mut Agent) -> Value {
        match self {
            PropertyKey::Index(index) => {
                let data = index.to_string();
                Value::String(agent.heap.create_string(&data))
            }
            PropertyKey::String(s) => Value::String(s),
        }
    }
}

impl HeapMarkAndSweep for PropertyKey {
    fn mark_values(&self, queues: &mut WorkQueues) {
        if let PropertyKey::String(s) = self {
            s.mark_values(queues);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_array_index;

    #[test]
    fn array_indexes_are_canonical() {
        assert_eq!(parse_array_index("0"), Some(0));
        assert_eq!(parse_array_index("42"), Some(42));
        assert_eq!(parse_array_index("042"), None);
        assert_eq!(parse_array_index("-1"), None);
        assert_eq!(parse_array_index("1.5"), None);
        assert_eq!(parse_array_index("4294967295"), None);
        assert_eq!(parse_array_index("value"), None);
    }
}
