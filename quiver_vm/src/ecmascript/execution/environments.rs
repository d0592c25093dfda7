// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [9.1 Environment Records](https://tc39.es/ecma262/#sec-environment-records)
//!
//! Environment Record is a specification type used to define the association
//! of Identifiers to specific variables and functions, based upon the lexical
//! nesting structure of ECMAScript code. Usually an Environment Record is
//! associated with some specific syntactic structure of ECMAScript code such
//! as a FunctionDeclaration, a BlockStatement, or a Catch clause of a
//! TryStatement. Each time such code is evaluated, a new Environment Record
//! is created to record the identifier bindings that are created by that
//! code.
//!
//! Only Function Environment Records of non-arrow functions and the Global
//! Environment Record carry a `this` binding. Resolving `this` walks the
//! \[\[OuterEnv\]\] chain to the first record that has one, which is what
//! makes arrow functions observe the `this` of the code they were defined in.

mod declarative_environment;
mod function_environment;
mod global_environment;

pub(crate) use declarative_environment::{
    DeclarativeEnvironmentRecord, new_declarative_environment,
};
pub use function_environment::ThisBindingStatus;
pub(crate) use function_environment::{FunctionEnvironmentRecord, new_function_environment};
pub(crate) use global_environment::{GlobalEnvironmentRecord, new_global_environment};

use super::{Agent, JsResult, agent::ExceptionType};
use crate::{
    ecmascript::types::Value,
    heap::{
        HeapString,
        heap_gc::{HeapMarkAndSweep, WorkQueues},
        indexes::create_heap_index,
    },
};

create_heap_index!(
    /// A Declarative Environment Record: block scopes and catch clauses.
    DeclarativeEnvironment
);
create_heap_index!(
    /// A Function Environment Record: the top-level scope of a function call.
    FunctionEnvironment
);
create_heap_index!(
    /// The Global Environment Record of the realm.
    GlobalEnvironment
);

macro_rules! impl_environment_index {
    ($index: ident, $data: ident, $entry: ident) => {
        impl core::ops::Index<$index> for Vec<Option<$data>> {
            type Output = $data;

            fn index(&self, index: $index) -> &Self::Output {
                self.get(index.into_index())
                    .expect("Environment out of bounds")
                    .as_ref()
                    .expect("Environment slot empty")
            }
        }

        impl core::ops::IndexMut<$index> for Vec<Option<$data>> {
            fn index_mut(&mut self, index: $index) -> &mut Self::Output {
                self.get_mut(index.into_index())
                    .expect("Environment out of bounds")
                    .as_mut()
                    .expect("Environment slot empty")
            }
        }

        impl core::ops::Index<$index> for Agent<'_> {
            type Output = $data;

            fn index(&self, index: $index) -> &Self::Output {
                &self.heap.environments.$entry[index]
            }
        }

        impl core::ops::IndexMut<$index> for Agent<'_> {
            fn index_mut(&mut self, index: $index) -> &mut Self::Output {
                &mut self.heap.environments.$entry[index]
            }
        }
    };
}

impl_environment_index!(DeclarativeEnvironment, DeclarativeEnvironmentRecord, declarative);
impl_environment_index!(FunctionEnvironment, FunctionEnvironmentRecord, function);
impl_environment_index!(GlobalEnvironment, GlobalEnvironmentRecord, global);

/// Storage of every environment record of the agent.
#[derive(Debug, Default)]
pub(crate) struct Environments {
    pub(crate) declarative: Vec<Option<DeclarativeEnvironmentRecord>>,
    pub(crate) function: Vec<Option<FunctionEnvironmentRecord>>,
    pub(crate) global: Vec<Option<GlobalEnvironmentRecord>>,
}

impl Environments {
    pub(crate) fn push_declarative_environment(
        &mut self,
        env: DeclarativeEnvironmentRecord,
    ) -> DeclarativeEnvironment {
        self.declarative.push(Some(env));
        DeclarativeEnvironment::last(&self.declarative)
    }

    pub(crate) fn push_function_environment(
        &mut self,
        env: FunctionEnvironmentRecord,
    ) -> FunctionEnvironment {
        self.function.push(Some(env));
        FunctionEnvironment::last(&self.function)
    }

    pub(crate) fn push_global_environment(
        &mut self,
        env: GlobalEnvironmentRecord,
    ) -> GlobalEnvironment {
        self.global.push(Some(env));
        GlobalEnvironment::last(&self.global)
    }
}

/// A Binding Record: any of the environment record kinds the evaluator can
/// have as its LexicalEnvironment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Declarative(DeclarativeEnvironment),
    Function(FunctionEnvironment),
    Global(GlobalEnvironment),
}

impl Environment {
    /// ### \[\[OuterEnv\]\]
    pub(crate) fn get_outer_env(self, agent: &Agent) -> Option<Environment> {
        match self {
            Environment::Declarative(env) => agent[env].outer_env,
            Environment::Function(env) => agent[agent[env].declarative_environment].outer_env,
            Environment::Global(_) => None,
        }
    }

    /// ### HasBinding ( N )
    pub(crate) fn has_binding(self, agent: &Agent, name: HeapString) -> bool {
        match self {
            Environment::Declarative(env) => agent[env].has_binding(name),
            Environment::Function(env) => {
                agent[agent[env].declarative_environment].has_binding(name)
            }
            Environment::Global(env) => env.has_binding(agent, name),
        }
    }

    /// ### CreateMutableBinding ( N, D )
    pub(crate) fn create_mutable_binding(self, agent: &mut Agent, name: HeapString) {
        match self {
            Environment::Declarative(env) => agent[env].create_mutable_binding(name),
            Environment::Function(env) => {
                let dcl_env = agent[env].declarative_environment;
                agent[dcl_env].create_mutable_binding(name)
            }
            Environment::Global(env) => {
                let dcl_env = agent[env].declarative_record;
                agent[dcl_env].create_mutable_binding(name)
            }
        }
    }

    /// ### CreateImmutableBinding ( N, S )
    pub(crate) fn create_immutable_binding(self, agent: &mut Agent, name: HeapString) {
        match self {
            Environment::Declarative(env) => agent[env].create_immutable_binding(name),
            Environment::Function(env) => {
                let dcl_env = agent[env].declarative_environment;
                agent[dcl_env].create_immutable_binding(name)
            }
            Environment::Global(env) => {
                let dcl_env = agent[env].declarative_record;
                agent[dcl_env].create_immutable_binding(name)
            }
        }
    }

    /// ### InitializeBinding ( N, V )
    pub(crate) fn initialize_binding(self, agent: &mut Agent, name: HeapString, value: Value) {
        match self {
            Environment::Declarative(env) => agent[env].initialize_binding(name, value),
            Environment::Function(env) => {
                let dcl_env = agent[env].declarative_environment;
                agent[dcl_env].initialize_binding(name, value)
            }
            Environment::Global(env) => env.initialize_binding(agent, name, value),
        }
    }

    /// ### SetMutableBinding ( N, V, S )
    pub(crate) fn set_mutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        value: Value,
        strict: bool,
    ) -> JsResult<()> {
        match self {
            Environment::Declarative(env) => env.set_mutable_binding(agent, name, value, strict),
            Environment::Function(env) => {
                let dcl_env = agent[env].declarative_environment;
                dcl_env.set_mutable_binding(agent, name, value, strict)
            }
            Environment::Global(env) => env.set_mutable_binding(agent, name, value, strict),
        }
    }

    /// ### GetBindingValue ( N, S )
    pub(crate) fn get_binding_value(
        self,
        agent: &mut Agent,
        name: HeapString,
        strict: bool,
    ) -> JsResult<Value> {
        match self {
            Environment::Declarative(env) => env.get_binding_value(agent, name),
            Environment::Function(env) => {
                let dcl_env = agent[env].declarative_environment;
                dcl_env.get_binding_value(agent, name)
            }
            Environment::Global(env) => env.get_binding_value(agent, name, strict),
        }
    }

    /// ### HasThisBinding ( )
    ///
    /// Declarative records and the function records of arrow functions never
    /// have a `this` binding of their own.
    pub fn has_this_binding(self, agent: &Agent) -> bool {
        match self {
            Environment::Declarative(_) => false,
            Environment::Function(env) => {
                env.get_this_binding_status(agent) != ThisBindingStatus::Lexical
            }
            Environment::Global(_) => true,
        }
    }

    /// ### GetThisBinding ( )
    ///
    /// Returns `None` for records without a `this` binding.
    pub fn get_this_binding(self, agent: &mut Agent) -> Option<JsResult<Value>> {
        match self {
            Environment::Declarative(_) => None,
            Environment::Function(env) => {
                if env.get_this_binding_status(agent) == ThisBindingStatus::Lexical {
                    None
                } else {
                    Some(env.get_this_binding(agent))
                }
            }
            Environment::Global(env) => Some(Ok(env.get_this_binding(agent))),
        }
    }
}

impl HeapMarkAndSweep for Environment {
    fn mark_values(&self, queues: &mut WorkQueues) {
        match self {
            Environment::Declarative(env) => queues.declarative_environments.push(*env),
            Environment::Function(env) => queues.function_environments.push(*env),
            Environment::Global(env) => queues.global_environments.push(*env),
        }
    }
}

/// ### [9.1.2.1 GetIdentifierReference ( env, name, strict )](https://tc39.es/ecma262/#sec-getidentifierreference)
///
/// Returns the environment record holding a binding for `name`, or `None` if
/// the reference is unresolvable.
pub(crate) fn get_identifier_reference(
    agent: &Agent,
    env: Environment,
    name: HeapString,
) -> Option<Environment> {
    let mut env = Some(env);
    while let Some(current) = env {
        if current.has_binding(agent, name) {
            return Some(current);
        }
        env = current.get_outer_env(agent);
    }
    None
}

/// ### [9.4.3 GetThisEnvironment ( )](https://tc39.es/ecma262/#sec-getthisenvironment)
///
/// Finds the Environment Record that supplies the binding of the keyword
/// `this`, starting from `env`. The chain always ends in the global
/// environment, which has a `this` binding, so this never fails.
pub fn get_this_environment(agent: &Agent, env: Environment) -> Environment {
    let mut env = env;
    // 2. Repeat,
    loop {
        // a. Let exists be env.HasThisBinding().
        // b. If exists is true, return env.
        if env.has_this_binding(agent) {
            return env;
        }
        // c. Let outer be env.[[OuterEnv]].
        // d. Assert: outer is not null.
        // e. Set env to outer.
        env = env
            .get_outer_env(agent)
            .expect("environment chain did not end in a global environment");
    }
}

/// ### [9.4.4 ResolveThisBinding ( )](https://tc39.es/ecma262/#sec-resolvethisbinding)
pub(crate) fn resolve_this_binding(agent: &mut Agent) -> JsResult<Value> {
    // 1. Let envRec be GetThisEnvironment().
    let env_rec = get_this_environment(agent, agent.current_lexical_environment());
    // 2. Return ? envRec.GetThisBinding().
    env_rec
        .get_this_binding(agent)
        .expect("GetThisEnvironment returned a record without a this binding")
}

/// Builds the message of a ReferenceError for an unresolvable identifier.
pub(crate) fn throw_not_defined(agent: &mut Agent, name: HeapString) -> super::JsError {
    let message = format!("{} is not defined", name.as_str(agent));
    agent.throw_exception(ExceptionType::ReferenceError, message)
}
