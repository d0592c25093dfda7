// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::AHashMap;

use super::{DeclarativeEnvironment, Environment};
use crate::{
    ecmascript::{
        execution::{Agent, JsResult, agent::ExceptionType},
        types::Value,
    },
    heap::{
        HeapString,
        heap_gc::{HeapMarkAndSweep, WorkQueues},
    },
};

/// #### [9.1.1.1 Declarative Environment Records](https://tc39.es/ecma262/#sec-declarative-environment-records)
///
/// A Declarative Environment Record is used to define the effect of ECMAScript
/// language syntactic elements such as FunctionDeclarations,
/// VariableDeclarations, and Catch clauses that directly associate identifier
/// bindings with ECMAScript language values.
#[derive(Debug, Clone, Default)]
pub struct DeclarativeEnvironmentRecord {
    /// ### \[\[OuterEnv\]\]
    pub(crate) outer_env: Option<Environment>,

    /// The environment's bindings.
    pub(crate) bindings: AHashMap<HeapString, Binding>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Binding {
    /// `None` while the binding is in its temporal dead zone.
    pub(crate) value: Option<Value>,
    pub(crate) strict: bool,
    pub(crate) mutable: bool,
}

impl DeclarativeEnvironmentRecord {
    /// #### [9.1.2.2 NewDeclarativeEnvironment ( E )](https://tc39.es/ecma262/#sec-newdeclarativeenvironment)
    pub(crate) fn new(outer_env: Option<Environment>) -> DeclarativeEnvironmentRecord {
        // 1. Let env be a new Declarative Environment Record containing no bindings.
        // 2. Set env.[[OuterEnv]] to E.
        // 3. Return env.
        DeclarativeEnvironmentRecord {
            outer_env,
            bindings: AHashMap::default(),
        }
    }

    /// ##### [9.1.1.1.1 HasBinding ( N )](https://tc39.es/ecma262/#sec-declarative-environment-records-hasbinding-n)
    pub(crate) fn has_binding(&self, name: HeapString) -> bool {
        self.bindings.contains_key(&name)
    }

    /// ##### [9.1.1.1.2 CreateMutableBinding ( N, D )](https://tc39.es/ecma262/#sec-declarative-environment-records-createmutablebinding-n-d)
    pub(crate) fn create_mutable_binding(&mut self, name: HeapString) {
        // 1. Assert: envRec does not already have a binding for N.
        debug_assert!(!self.has_binding(name));
        // 2. Create a mutable binding in envRec for N and record that it is
        //    uninitialized.
        self.bindings.insert(
            name,
            Binding {
                value: None,
                strict: false,
                mutable: true,
            },
        );
    }

    /// ##### [9.1.1.1.3 CreateImmutableBinding ( N, S )](https://tc39.es/ecma262/#sec-declarative-environment-records-createimmutablebinding-n-s)
    ///
    /// Immutable bindings are only created for `const` declarations, which
    /// are always strict bindings.
    pub(crate) fn create_immutable_binding(&mut self, name: HeapString) {
        debug_assert!(!self.has_binding(name));
        self.bindings.insert(
            name,
            Binding {
                value: None,
                strict: true,
                mutable: false,
            },
        );
    }

    /// ##### [9.1.1.1.4 InitializeBinding ( N, V )](https://tc39.es/ecma262/#sec-declarative-environment-records-initializebinding-n-v)
    pub(crate) fn initialize_binding(&mut self, name: HeapString, value: Value) {
        // 1. Assert: envRec must have an uninitialized binding for N.
        let binding = self
            .bindings
            .get_mut(&name)
            .expect("InitializeBinding on a missing binding");
        // 2. Set the bound value for N in envRec to V.
        // 3. Record that the binding for N in envRec has been initialized.
        binding.value = Some(value);
    }

    pub(crate) fn get_binding(&self, name: HeapString) -> Option<&Binding> {
        self.bindings.get(&name)
    }
}

impl HeapMarkAndSweep for DeclarativeEnvironmentRecord {
    fn mark_values(&self, queues: &mut WorkQueues) {
        self.outer_env.mark_values(queues);
        for (name, binding) in self.bindings.iter() {
            name.mark_values(queues);
            binding.value.mark_values(queues);
        }
    }
}

impl DeclarativeEnvironment {
    /// ##### [9.1.1.1.5 SetMutableBinding ( N, V, S )](https://tc39.es/ecma262/#sec-declarative-environment-records-setmutablebinding-n-v-s)
    pub(crate) fn set_mutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        value: Value,
        mut is_strict: bool,
    ) -> JsResult<()> {
        let Some(binding) = agent[self].bindings.get(&name).copied() else {
            // 1. If envRec does not have a binding for N, then
            // a. If S is true, throw a ReferenceError exception.
            if is_strict {
                let error_message =
                    format!("Identifier '{}' does not exist.", name.as_str(agent));
                return Err(agent.throw_exception(ExceptionType::ReferenceError, error_message));
            }
            // b. Perform ! envRec.CreateMutableBinding(N, true).
            // c. Perform ! envRec.InitializeBinding(N, V).
            let env_rec = &mut agent[self];
            env_rec.create_mutable_binding(name);
            env_rec.initialize_binding(name, value);
            // d. Return UNUSED.
            return Ok(());
        };

        // 2. If the binding for N in envRec is a strict binding, set S to true.
        if binding.strict {
            is_strict = true;
        }

        // 3. If the binding for N in envRec has not yet been initialized, then
        if binding.value.is_none() {
            // a. Throw a ReferenceError exception.
            let error_message = format!(
                "Cannot access '{}' before initialization",
                name.as_str(agent)
            );
            return Err(agent.throw_exception(ExceptionType::ReferenceError, error_message));
        }

        if binding.mutable {
            // 4. Else if the binding for N in envRec is a mutable binding, then
            // a. Change its bound value to V.
            if let Some(binding) = agent[self].bindings.get_mut(&name) {
                binding.value = Some(value);
            }
        } else if is_strict {
            // 5. Else,
            // a. Assert: This is an attempt to change the value of an immutable binding.
            // b. If S is true, throw a TypeError exception.
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Assignment to constant variable.".to_owned(),
            ));
        }

        // 6. Return UNUSED.
        Ok(())
    }

    /// ##### [9.1.1.1.6 GetBindingValue ( N, S )](https://tc39.es/ecma262/#sec-declarative-environment-records-getbindingvalue-n-s)
    ///
    /// The binding is known to exist; an uninitialized binding throws a
    /// ReferenceError regardless of strictness.
    pub(crate) fn get_binding_value(self, agent: &mut Agent, name: HeapString) -> JsResult<Value> {
        // 1. Assert: envRec has a binding for N.
        match agent[self].get_binding(name).and_then(|binding| binding.value) {
            // 3. Return the value currently bound to N in envRec.
            Some(value) => Ok(value),
            // 2. If the binding for N in envRec is an uninitialized binding,
            //    throw a ReferenceError exception.
            None => {
                let error_message = format!(
                    "Cannot access '{}' before initialization",
                    name.as_str(agent)
                );
                Err(agent.throw_exception(ExceptionType::ReferenceError, error_message))
            }
        }
    }
}

/// #### [9.1.2.2 NewDeclarativeEnvironment ( E )](https://tc39.es/ecma262/#sec-newdeclarativeenvironment)
pub(crate) fn new_declarative_environment(
    agent: &mut Agent,
    outer_env: Option<Environment>,
) -> DeclarativeEnvironment {
    agent
        .heap
        .environments
        .push_declarative_environment(DeclarativeEnvironmentRecord::new(outer_env))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::HeapString;

    #[test]
    fn bindings_start_uninitialized() {
        let name = HeapString::from_index(0);
        let mut env = DeclarativeEnvironmentRecord::new(None);
        env.create_immutable_binding(name);
        assert!(env.has_binding(name));
        assert_eq!(env.get_binding(name).and_then(|b| b.value), None);
        env.initialize_binding(name, Value::Number(1.0));
        assert_eq!(
            env.get_binding(name).and_then(|b| b.value),
            Some(Value::Number(1.0))
        );
    }
}
