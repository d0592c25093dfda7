// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tree-walking evaluation of statements and expressions.
//!
//! Evaluation runs directly over the oxc AST that a [`Script`] owns. The
//! running execution context supplies the LexicalEnvironment that
//! identifiers and `this` resolve through; block scopes swap it for the
//! duration of the block and always restore it, also on abrupt
//! completions.
//!
//! [`Script`]: crate::ecmascript::scripts_and_modules::script::Script

mod expressions;
mod statements;

pub(crate) use expressions::{evaluate_expression, evaluate_named_expression};
pub(crate) use statements::{evaluate_statement_list, evaluate_statements};

use crate::ecmascript::{
    execution::{Agent, ExceptionType, JsError},
    types::Value,
};

/// Evaluation recurses on the native stack. When less than this much of it
/// remains, evaluation continues on a freshly allocated segment.
pub(crate) const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each additional stack segment.
pub(crate) const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// ### [6.2.4 The Completion Record Specification Type](https://tc39.es/ecma262/#sec-completion-record-specification-type)
///
/// Throw completions travel as the `Err` of a [`JsResult`]; this holds the
/// remaining kinds.
///
/// [`JsResult`]: crate::ecmascript::execution::JsResult
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Completion {
    /// A normal completion. `None` is the empty completion value.
    Normal(Option<Value>),
    Return(Value),
    Break,
    Continue,
}

impl Completion {
    /// ### [6.2.4.4 UpdateEmpty ( completionRecord, value )](https://tc39.es/ecma262/#sec-updateempty)
    pub(crate) fn update_empty(self, value: Value) -> Self {
        match self {
            Completion::Normal(None) => Completion::Normal(Some(value)),
            completion => completion,
        }
    }
}

/// Throws the SyntaxError reported for syntax that parses but that the
/// interpreter does not evaluate.
pub(crate) fn throw_unsupported(agent: &mut Agent, feature: &str) -> JsError {
    agent.throw_exception(
        ExceptionType::SyntaxError,
        format!("{feature} are not supported"),
    )
}
