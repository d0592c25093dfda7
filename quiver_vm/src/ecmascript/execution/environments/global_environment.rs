// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::AHashSet;

use super::{
    DeclarativeEnvironment, DeclarativeEnvironmentRecord, Environments, GlobalEnvironment,
};
use crate::{
    ecmascript::{
        execution::{Agent, JsResult, agent::ExceptionType},
        types::{PropertyKey, Value},
    },
    heap::{
        HeapString, OrdinaryObject,
        heap_gc::{HeapMarkAndSweep, WorkQueues},
    },
};

/// ### [9.1.1.4 Global Environment Records](https://tc39.es/ecma262/#sec-global-environment-records)
///
/// A Global Environment Record is used to represent the outer most scope that
/// is shared by all of the ECMAScript Script elements that are processed in a
/// common realm. A Global Environment Record provides the bindings for built-in
/// globals, properties of the global object, and for all top-level
/// declarations that occur within a Script.
#[derive(Debug)]
pub struct GlobalEnvironmentRecord {
    /// ### \[\[ObjectRecord\]\]
    ///
    /// Binding object is the global object. It contains global built-in
    /// bindings as well as FunctionDeclaration and VariableDeclaration
    /// bindings in global code for the associated realm.
    pub(crate) object_record: OrdinaryObject,

    /// ### \[\[GlobalThisValue\]\]
    ///
    /// The value returned by this in global scope.
    pub(crate) global_this_value: OrdinaryObject,

    /// ### \[\[DeclarativeRecord\]\]
    ///
    /// Contains bindings for all declarations in global code for the
    /// associated realm code except for FunctionDeclaration and
    /// VariableDeclaration bindings.
    pub(crate) declarative_record: DeclarativeEnvironment,

    /// ### \[\[VarNames\]\]
    ///
    /// The string names bound by FunctionDeclaration or VariableDeclaration
    /// declarations in global code for the associated realm.
    pub(crate) var_names: AHashSet<HeapString>,
}

impl HeapMarkAndSweep for GlobalEnvironmentRecord {
    fn mark_values(&self, queues: &mut WorkQueues) {
        self.object_record.mark_values(queues);
        self.global_this_value.mark_values(queues);
        self.declarative_record.mark_values(queues);
        self.var_names
            .iter()
            .for_each(|name| name.mark_values(queues));
    }
}

/// ### [9.1.2.5 NewGlobalEnvironment ( G, thisValue )](https://tc39.es/ecma262/#sec-newglobalenvironment)
///
/// Runs before the agent exists, while the realm is being created.
pub(crate) fn new_global_environment(
    environments: &mut Environments,
    global: OrdinaryObject,
    this_value: OrdinaryObject,
) -> GlobalEnvironment {
    // 1. Let objRec be NewObjectEnvironment(G, false, null).
    // 2. Let dclRec be NewDeclarativeEnvironment(null).
    let declarative_record =
        environments.push_declarative_environment(DeclarativeEnvironmentRecord::new(None));
    // 3. Let env be a new Global Environment Record.
    let env = GlobalEnvironmentRecord {
        // 4. Set env.[[ObjectRecord]] to objRec.
        object_record: global,
        // 5. Set env.[[GlobalThisValue]] to thisValue.
        global_this_value: this_value,
        // 6. Set env.[[DeclarativeRecord]] to dclRec.
        declarative_record,
        // 7. Set env.[[VarNames]] to a new empty List.
        var_names: AHashSet::default(),
    };
    // 8. Set env.[[OuterEnv]] to null.
    // 9. Return env.
    environments.push_global_environment(env)
}

impl GlobalEnvironment {
    fn has_global_property(self, agent: &Agent, name: HeapString) -> bool {
        let global = agent[self].object_record;
        agent[global].has_own(PropertyKey::String(name))
    }

    /// ### [9.1.1.4.1 HasBinding ( N )](https://tc39.es/ecma262/#sec-global-environment-records-hasbinding-n)
    pub(crate) fn has_binding(self, agent: &Agent, name: HeapString) -> bool {
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. If ! DclRec.HasBinding(N) is true, return true.
        let dcl_rec = agent[self].declarative_record;
        if agent[dcl_rec].has_binding(name) {
            return true;
        }
        // 3. Let ObjRec be envRec.[[ObjectRecord]].
        // 4. Return ? ObjRec.HasBinding(N).
        self.has_global_property(agent, name)
    }

    /// ### [9.1.1.4.4 InitializeBinding ( N, V )](https://tc39.es/ecma262/#sec-global-environment-records-initializebinding-n-v)
    pub(crate) fn initialize_binding(self, agent: &mut Agent, name: HeapString, value: Value) {
        let dcl_rec = agent[self].declarative_record;
        if agent[dcl_rec].has_binding(name) {
            agent[dcl_rec].initialize_binding(name, value);
        } else {
            let global = agent[self].object_record;
            agent[global].set_own(PropertyKey::String(name), value);
        }
    }

    /// ### [9.1.1.4.5 SetMutableBinding ( N, V, S )](https://tc39.es/ecma262/#sec-global-environment-records-setmutablebinding-n-v-s)
    pub(crate) fn set_mutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        let dcl_rec = agent[self].declarative_record;
        // 2. If ! DclRec.HasBinding(N) is true, then
        if agent[dcl_rec].has_binding(name) {
            // a. Return ? DclRec.SetMutableBinding(N, V, S).
            return dcl_rec.set_mutable_binding(agent, name, value, is_strict);
        }
        // 3. Let ObjRec be envRec.[[ObjectRecord]].
        // 4. Return ? ObjRec.SetMutableBinding(N, V, S).
        if is_strict && !self.has_global_property(agent, name) {
            let error_message = format!("{} is not defined", name.as_str(agent));
            return Err(agent.throw_exception(ExceptionType::ReferenceError, error_message));
        }
        let global = agent[self].object_record;
        agent[global].set_own(PropertyKey::String(name), value);
        Ok(())
    }

    /// ### [9.1.1.4.6 GetBindingValue ( N, S )](https://tc39.es/ecma262/#sec-global-environment-records-getbindingvalue-n-s)
    pub(crate) fn get_binding_value(
        self,
        agent: &mut Agent,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<Value> {
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        let dcl_rec = agent[self].declarative_record;
        // 2. If ! DclRec.HasBinding(N) is true, then
        if agent[dcl_rec].has_binding(name) {
            // a. Return ? DclRec.GetBindingValue(N, S).
            return dcl_rec.get_binding_value(agent, name);
        }
        // 3. Let ObjRec be envRec.[[ObjectRecord]].
        // 4. Return ? ObjRec.GetBindingValue(N, S).
        let global = agent[self].object_record;
        match agent[global].get_own(PropertyKey::String(name)) {
            Some(value) => Ok(value),
            None if is_strict => {
                let error_message = format!("{} is not defined", name.as_str(agent));
                Err(agent.throw_exception(ExceptionType::ReferenceError, error_message))
            }
            None => Ok(Value::Undefined),
        }
    }

    /// ### [9.1.1.4.11 GetThisBinding ( )](https://tc39.es/ecma262/#sec-global-environment-records-getthisbinding)
    pub(crate) fn get_this_binding(self, agent: &Agent) -> Value {
        // 1. Return envRec.[[GlobalThisValue]].
        Value::Object(agent[self].global_this_value)
    }

    /// ### [9.1.1.4.12 HasVarDeclaration ( N )](https://tc39.es/ecma262/#sec-hasvardeclaration)
    pub(crate) fn has_var_declaration(self, agent: &Agent, name: HeapString) -> bool {
        // 1. Let varDeclaredNames be envRec.[[VarNames]].
        // 2. If varDeclaredNames contains N, return true.
        // 3. Return false.
        agent[self].var_names.contains(&name)
    }

    /// ### [9.1.1.4.13 HasLexicalDeclaration ( N )](https://tc39.es/ecma262/#sec-haslexicaldeclaration)
    pub(crate) fn has_lexical_declaration(self, agent: &Agent, name: HeapString) -> bool {
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. Return ! DclRec.HasBinding(N).
        let dcl_rec = agent[self].declarative_record;
        agent[dcl_rec].has_binding(name)
    }

    /// ### [9.1.1.4.17 CreateGlobalVarBinding ( N, D )](https://tc39.es/ecma262/#sec-createglobalvarbinding)
    pub(crate) fn create_global_var_binding(self, agent: &mut Agent, name: HeapString) {
        // 3. Let hasProperty be ? HasOwnProperty(globalObject, N).
        // 4. Let extensible be ? IsExtensible(globalObject).
        // 5. If hasProperty is false and extensible is true, then
        if !self.has_global_property(agent, name) {
            // a. Perform ? ObjRec.CreateMutableBinding(N, D).
            // b. Perform ? ObjRec.InitializeBinding(N, undefined).
            let global = agent[self].object_record;
            agent[global].set_own(PropertyKey::String(name), Value::Undefined);
        }
        // 6. If envRec.[[VarNames]] does not contain N, then
        //    a. Append N to envRec.[[VarNames]].
        agent[self].var_names.insert(name);
    }

    /// ### [9.1.1.4.18 CreateGlobalFunctionBinding ( N, V, D )](https://tc39.es/ecma262/#sec-createglobalfunctionbinding)
    pub(crate) fn create_global_function_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        value: Value,
    ) {
        let global = agent[self].object_record;
        agent[global].set_own(PropertyKey::String(name), value);
        // 8. If envRec.[[VarNames]] does not contain N, then
        //    a. Append N to envRec.[[VarNames]].
        agent[self].var_names.insert(name);
    }
}
