// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{DeclarativeEnvironment, DeclarativeEnvironmentRecord, FunctionEnvironment};
use crate::{
    ecmascript::{
        builtins::ThisMode,
        execution::{Agent, JsResult, agent::ExceptionType},
        types::{Function, Object, Value},
    },
    heap::{
        ECMAScriptFunction,
        heap_gc::{HeapMarkAndSweep, WorkQueues},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThisBindingStatus {
    /// Function is an ArrowFunction and does not have a local `this` value.
    Lexical,
    /// Function is a normal function and has a bound `this` value.
    Initialized,
    /// Function is a normal function that has not yet bound its `this`
    /// value.
    Uninitialized,
}

/// ### [9.1.1.3 Function Environment Records](https://tc39.es/ecma262/#sec-function-environment-records)
///
/// A Function Environment Record is a Declarative Environment Record that is
/// used to represent the top-level scope of a function and, if the function is
/// not an ArrowFunction, provides a this binding.
#[derive(Debug)]
pub struct FunctionEnvironmentRecord {
    /// ### \[\[ThisValue\]\]
    ///
    /// This is the this value used for this invocation of the function.
    pub(crate) this_value: Option<Value>,

    /// ### \[\[ThisBindingStatus\]\]
    ///
    /// If the value is LEXICAL, this is an ArrowFunction and does not have a
    /// local this value.
    pub(crate) this_binding_status: ThisBindingStatus,

    /// ### \[\[FunctionObject\]\]
    ///
    /// The function object whose invocation caused this Environment Record to
    /// be created.
    pub(crate) function_object: Function,

    /// ### \[\[NewTarget\]\]
    ///
    /// If this Environment Record was created by the \[\[Construct\]\]
    /// internal method, \[\[NewTarget\]\] is the value of the
    /// \[\[Construct\]\] newTarget parameter. Otherwise, its value is
    /// undefined.
    pub(crate) new_target: Option<Object>,

    /// Function Environment Records support all of the Declarative Environment
    /// Record methods and share the same specifications for all of those
    /// methods except for HasThisBinding.
    pub(crate) declarative_environment: DeclarativeEnvironment,
}

impl HeapMarkAndSweep for FunctionEnvironmentRecord {
    fn mark_values(&self, queues: &mut WorkQueues) {
        let Self {
            this_value,
            this_binding_status: _,
            function_object,
            new_target,
            declarative_environment,
        } = self;
        declarative_environment.mark_values(queues);
        function_object.mark_values(queues);
        new_target.mark_values(queues);
        this_value.mark_values(queues);
    }
}

/// ### [9.1.2.4 NewFunctionEnvironment ( F, newTarget )](https://tc39.es/ecma262/#sec-newfunctionenvironment)
///
/// The abstract operation NewFunctionEnvironment takes arguments F (an
/// ECMAScript function object) and newTarget (an Object or undefined) and
/// returns a Function Environment Record.
pub(crate) fn new_function_environment(
    agent: &mut Agent,
    f: ECMAScriptFunction,
    new_target: Option<Object>,
) -> FunctionEnvironment {
    let this_mode = agent[f].this_mode;
    // 1. Let env be a new Function Environment Record containing no bindings.
    // 6. Set env.[[OuterEnv]] to F.[[Environment]].
    let dcl_env = DeclarativeEnvironmentRecord::new(Some(agent[f].environment));
    let declarative_environment = agent.heap.environments.push_declarative_environment(dcl_env);
    // 3. If F.[[ThisMode]] is LEXICAL, set env.[[ThisBindingStatus]] to LEXICAL.
    let this_binding_status = if this_mode == ThisMode::Lexical {
        ThisBindingStatus::Lexical
    } else {
        // 4. Else, set env.[[ThisBindingStatus]] to UNINITIALIZED.
        ThisBindingStatus::Uninitialized
    };
    let env = FunctionEnvironmentRecord {
        this_value: None,
        // 2. Set env.[[FunctionObject]] to F.
        function_object: Function::ECMAScriptFunction(f),
        this_binding_status,
        // 5. Set env.[[NewTarget]] to newTarget.
        new_target,
        declarative_environment,
    };
    // 7. Return env.
    agent.heap.environments.push_function_environment(env)
}

impl FunctionEnvironment {
    pub fn get_this_binding_status(self, agent: &Agent) -> ThisBindingStatus {
        agent[self].this_binding_status
    }

    /// ### [9.1.1.3.1 BindThisValue ( V )](https://tc39.es/ecma262/#sec-bindthisvalue)
    ///
    /// The BindThisValue concrete method of a Function Environment Record
    /// envRec takes argument V (an ECMAScript language value) and returns
    /// either a normal completion containing an ECMAScript language value or a
    /// throw completion.
    pub(crate) fn bind_this_value(self, agent: &mut Agent, value: Value) -> JsResult<Value> {
        let env_rec = &mut agent[self];
        // 1. Assert: envRec.[[ThisBindingStatus]] is not LEXICAL.
        debug_assert!(env_rec.this_binding_status != ThisBindingStatus::Lexical);

        // 2. If envRec.[[ThisBindingStatus]] is INITIALIZED, throw a
        //    ReferenceError exception.
        if env_rec.this_binding_status == ThisBindingStatus::Initialized {
            return Err(agent.throw_exception(
                ExceptionType::ReferenceError,
                "[[ThisBindingStatus]] is INITIALIZED".to_owned(),
            ));
        }

        // 3. Set envRec.[[ThisValue]] to V.
        env_rec.this_value = Some(value);

        // 4. Set envRec.[[ThisBindingStatus]] to INITIALIZED.
        env_rec.this_binding_status = ThisBindingStatus::Initialized;

        // 5. Return V.
        Ok(value)
    }

    /// ### [9.1.1.3.4 GetThisBinding ( )](https://tc39.es/ecma262/#sec-function-environment-records-getthisbinding)
    ///
    /// The GetThisBinding concrete method of a Function Environment Record
    /// envRec takes no arguments and returns either a normal completion
    /// containing an ECMAScript language value or a throw completion.
    pub(crate) fn get_this_binding(self, agent: &mut Agent) -> JsResult<Value> {
        let env_rec = &agent[self];
        // 1. Assert: envRec.[[ThisBindingStatus]] is not lexical.
        // 2. If envRec.[[ThisBindingStatus]] is uninitialized, throw a ReferenceError exception.
        // 3. Return envRec.[[ThisValue]].
        match (env_rec.this_binding_status, env_rec.this_value) {
            (ThisBindingStatus::Lexical, _) => unreachable!(),
            (ThisBindingStatus::Initialized, Some(value)) => Ok(value),
            _ => Err(agent.throw_exception(
                ExceptionType::ReferenceError,
                "Uninitialized this binding".to_owned(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;

    use super::*;
    use crate::ecmascript::{
        execution::{AgentOptions, DefaultHostHooks},
        scripts_and_modules::script::{ScriptOptions, parse_script},
    };

    #[test]
    fn this_is_bound_only_once() {
        let allocator = Box::leak(Box::new(Allocator::default()));
        let script = parse_script(allocator, "function f() {}", ScriptOptions::default()).unwrap();
        let script = Box::leak(Box::new(script));
        let mut agent = Agent::new(AgentOptions::default(), &DefaultHostHooks);
        agent.run_script(script).unwrap();
        let Ok(Value::Function(Function::ECMAScriptFunction(f))) = agent.get_global("f") else {
            panic!("f is not an ECMAScript function");
        };

        let env = new_function_environment(&mut agent, f, None);
        assert_eq!(
            env.get_this_binding_status(&agent),
            ThisBindingStatus::Uninitialized
        );
        assert_eq!(env.bind_this_value(&mut agent, Value::Null), Ok(Value::Null));
        assert_eq!(
            env.get_this_binding_status(&agent),
            ThisBindingStatus::Initialized
        );
        let error = env.bind_this_value(&mut agent, Value::Undefined).unwrap_err();
        assert_eq!(
            error.to_string(&mut agent),
            "ReferenceError: [[ThisBindingStatus]] is INITIALIZED"
        );
    }
}
