// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::Environment;
use crate::{
    ecmascript::types::Function,
    heap::heap_gc::{HeapMarkAndSweep, WorkQueues},
};

/// ### [code evaluation state](https://tc39.es/ecma262/#table-state-components-for-all-execution-contexts)
///
/// ECMAScript code execution contexts have the additional state components
/// listed in Table 26.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ECMAScriptCode<'a> {
    /// ### LexicalEnvironment
    ///
    /// Identifies the Environment Record used to resolve identifier references
    /// made by code within this execution context.
    pub(crate) lexical_environment: Environment,

    /// ### VariableEnvironment
    ///
    /// Identifies the Environment Record that holds bindings created by
    /// VariableStatements within this execution context.
    pub(crate) variable_environment: Environment,

    /// Although ECMA-262 does not track this here, we also use
    /// [`ECMAScriptCode`] to track whether some ECMAScript code is in strict
    /// mode.
    pub(crate) is_strict_mode: bool,

    /// Source text of the script that the running code was parsed from.
    /// Spans of the code's syntax nodes are offsets into it.
    pub(crate) source_code: &'a str,
}

/// ### [9.4 Execution Contexts](https://tc39.es/ecma262/#sec-execution-contexts)
///
/// An execution context is a specification device that is used to track the
/// runtime evaluation of code by an ECMAScript implementation. At any point in
/// time, there is at most one execution context per agent that is actually
/// executing code. This is known as the agent's running execution context.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ExecutionContext<'a> {
    /// ### code evaluation state
    ///
    /// `None` for the contexts of builtin functions.
    pub(crate) ecmascript_code: Option<ECMAScriptCode<'a>>,

    /// ### Function
    ///
    /// If this execution context is evaluating the code of a function object,
    /// then the value of this component is that function object. If the
    /// context is evaluating the code of a Script, the value is null.
    pub(crate) function: Option<Function>,
}

impl HeapMarkAndSweep for ExecutionContext<'_> {
    fn mark_values(&self, queues: &mut WorkQueues) {
        if let Some(code) = &self.ecmascript_code {
            code.lexical_environment.mark_values(queues);
            code.variable_environment.mark_values(queues);
        }
        self.function.mark_values(queues);
    }
}
