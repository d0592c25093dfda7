// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `console` namespace object and the value formatting it prints with.

use super::{ArgumentsList, Behaviour, Builtin, define_builtin_function};
use crate::{
    ecmascript::{
        abstract_operations::type_conversion::number_to_string,
        execution::{Agent, JsResult},
        types::{Function, Object, PropertyKey, Value},
    },
    heap::{Array, OrdinaryObject},
};

/// Nesting below this depth prints as `[Object]` or `[Array]`.
const MAX_DEPTH: usize = 2;

pub(crate) struct ConsoleObject;

struct ConsoleLog;
impl Builtin for ConsoleLog {
    const NAME: &'static str = "log";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ConsoleObject::log);
}

impl ConsoleObject {
    /// Formats every argument and prints them as one space-separated line
    /// through the host. Strings print as they are.
    fn log(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let line = arguments
            .iter()
            .map(|value| match value {
                Value::String(s) => s.as_str(agent).to_owned(),
                _ => inspect(agent, *value),
            })
            .collect::<Vec<_>>()
            .join(" ");
        if agent.options.print_internals {
            eprintln!("console.log at {} ms", agent.now());
        }
        agent.host_hooks.print(&line);
        Ok(Value::Undefined)
    }

    pub(crate) fn create_intrinsic(agent: &mut Agent) -> OrdinaryObject {
        let object_prototype = agent.intrinsics().object_prototype;
        let console = agent.heap.create_object(Some(object_prototype));
        define_builtin_function::<ConsoleLog>(agent, console);
        console
    }
}

/// Renders a value the way `console.log` shows a nested value: strings are
/// quoted, arrays print as `[ 1, 2 ]`, objects as `Name { key: value }`
/// and functions as `[Function: name]`. Never runs user code.
pub fn inspect(agent: &Agent, value: Value) -> String {
    let mut formatter = Inspector {
        agent,
        seen: Vec::new(),
    };
    formatter.format_value(value, 0)
}

struct Inspector<'r, 'a> {
    agent: &'r Agent<'a>,
    /// Objects currently being printed, outermost first.
    seen: Vec<Object>,
}

impl Inspector<'_, '_> {
    fn format_value(&mut self, value: Value, depth: usize) -> String {
        match value {
            Value::Undefined => "undefined".to_owned(),
            Value::Null => "null".to_owned(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) if n == 0.0 && n.is_sign_negative() => "-0".to_owned(),
            Value::Number(n) => number_to_string(n),
            Value::String(s) => quote(s.as_str(self.agent)),
            Value::Object(_) | Value::Array(_) | Value::Function(_) => {
                let Some(object) = value.as_object() else {
                    return String::new();
                };
                if self.seen.contains(&object) {
                    return "[Circular *1]".to_owned();
                }
                self.seen.push(object);
                let result = match object {
                    Object::Object(o) => self.format_object(o, depth),
                    Object::Array(a) => self.format_array(a, depth),
                    Object::Function(f) => self.format_function(f, depth),
                };
                self.seen.pop();
                result
            }
        }
    }

    fn format_key(&self, key: PropertyKey) -> String {
        match key {
            PropertyKey::Index(index) => format!("'{index}'"),
            PropertyKey::String(s) => {
                let name = s.as_str(self.agent);
                if is_identifier_name(name) {
                    name.to_owned()
                } else {
                    quote(name)
                }
            }
        }
    }

    fn format_entries(
        &mut self,
        object: Option<OrdinaryObject>,
        skip: &[&str],
        depth: usize,
    ) -> Vec<String> {
        let Some(object) = object else {
            return Vec::new();
        };
        let entries: Vec<(PropertyKey, Value)> = self.agent[object]
            .entries()
            .filter(|(key, _)| {
                key.as_str(self.agent)
                    .is_none_or(|name| !skip.contains(&name))
            })
            .collect();
        entries
            .into_iter()
            .map(|(key, value)| {
                format!(
                    "{}: {}",
                    self.format_key(key),
                    self.format_value(value, depth + 1)
                )
            })
            .collect()
    }

    fn format_object(&mut self, o: OrdinaryObject, depth: usize) -> String {
        let intrinsics = self.agent.intrinsics();
        if let Some(error) = self.error_summary(o) {
            return if depth == 0 { error } else { format!("[{error}]") };
        }
        let prefix = match self.agent[o].prototype {
            None => Some("[Object: null prototype]".to_owned()),
            Some(prototype) if prototype == intrinsics.object_prototype => None,
            Some(prototype) => self.constructor_name(prototype),
        };
        if depth > MAX_DEPTH {
            return format!("[{}]", prefix.as_deref().unwrap_or("Object"));
        }
        let entries = self.format_entries(Some(o), &["constructor"], depth);
        let body = if entries.is_empty() {
            "{}".to_owned()
        } else {
            format!("{{ {} }}", entries.join(", "))
        };
        match prefix {
            Some(prefix) => format!("{prefix} {body}"),
            None => body,
        }
    }

    fn format_array(&mut self, a: Array, depth: usize) -> String {
        if depth > MAX_DEPTH {
            return "[Array]".to_owned();
        }
        let elements = self.agent[a].elements.clone();
        let mut items: Vec<String> = elements
            .into_iter()
            .map(|element| self.format_value(element, depth + 1))
            .collect();
        items.extend(self.format_entries(self.agent[a].backing_object, &[], depth));
        if items.is_empty() {
            "[]".to_owned()
        } else {
            format!("[ {} ]", items.join(", "))
        }
    }

    fn format_function(&mut self, f: Function, depth: usize) -> String {
        let name = f.name(self.agent);
        let head = if name.is_empty() {
            "[Function (anonymous)]".to_owned()
        } else {
            format!("[Function: {name}]")
        };
        let entries = self.format_entries(f.backing_object(self.agent), &["prototype"], depth);
        if entries.is_empty() {
            head
        } else {
            format!("{head} {{ {} }}", entries.join(", "))
        }
    }

    /// The `name` of the `constructor` found on a prototype object.
    fn constructor_name(&self, prototype: OrdinaryObject) -> Option<String> {
        let mut current = Some(prototype);
        while let Some(object) = current {
            let constructor = self.agent[object]
                .entries()
                .find(|(key, _)| key.as_str(self.agent) == Some("constructor"))
                .and_then(|(_, value)| value.as_function());
            if let Some(constructor) = constructor {
                let name = constructor.name(self.agent);
                return Some(if name.is_empty() {
                    "Object".to_owned()
                } else {
                    name
                });
            }
            current = self.agent[object].prototype;
        }
        None
    }

    /// `Name: message` for objects that inherit from `Error.prototype`.
    fn error_summary(&self, o: OrdinaryObject) -> Option<String> {
        let error_prototype = self.agent.intrinsics().error_prototype;
        let mut current = self.agent[o].prototype;
        let mut is_error = false;
        while let Some(object) = current {
            if object == error_prototype {
                is_error = true;
                break;
            }
            current = self.agent[object].prototype;
        }
        if !is_error {
            return None;
        }
        let lookup = |name: &str| {
            let mut current = Some(o);
            while let Some(object) = current {
                let found = self.agent[object]
                    .entries()
                    .find(|(key, _)| key.as_str(self.agent) == Some(name));
                if let Some((_, value)) = found {
                    return value.as_str(self.agent).map(str::to_owned);
                }
                current = self.agent[object].prototype;
            }
            None
        };
        let name = lookup("name").unwrap_or_else(|| "Error".to_owned());
        Some(match lookup("message") {
            Some(message) if !message.is_empty() => format!("{name}: {message}"),
            _ => name,
        })
    }
}

fn quote(data: &str) -> String {
    let mut quoted = String::with_capacity(data.len() + 2);
    quoted.push('\'');
    for c in data.chars() {
        match c {
            '\'' => quoted.push_str("\\'"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_strings_are_single_quoted() {
        assert_eq!(quote("it's"), "'it\\'s'");
        assert_eq!(quote("a\nb"), "'a\\nb'");
    }

    #[test]
    fn only_identifier_keys_print_bare() {
        assert!(is_identifier_name("age"));
        assert!(is_identifier_name("$value_2"));
        assert!(!is_identifier_name("my-key"));
        assert!(!is_identifier_name("2nd"));
        assert!(!is_identifier_name(""));
    }
}
