// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![allow(dead_code)]

use std::{cell::RefCell, fs, path::PathBuf};

use oxc_allocator::Allocator;
use quiver_vm::{Agent, AgentOptions, HostHooks, JsResult, ScriptOptions, Value, parse_script};

/// Collects `console.log` lines instead of printing them.
#[derive(Debug, Default)]
pub struct RecordingHostHooks {
    lines: RefCell<Vec<String>>,
}

impl HostHooks for RecordingHostHooks {
    fn print(&self, message: &str) {
        self.lines.borrow_mut().push(message.to_owned());
    }
}

impl RecordingHostHooks {
    /// Every line printed since the last call.
    pub fn take_lines(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.borrow_mut())
    }
}

pub fn new_agent() -> (Agent<'static>, &'static RecordingHostHooks) {
    new_agent_with(AgentOptions::default())
}

pub fn new_agent_with(options: AgentOptions) -> (Agent<'static>, &'static RecordingHostHooks) {
    let host_hooks: &'static RecordingHostHooks =
        Box::leak(Box::new(RecordingHostHooks::default()));
    (Agent::new(options, host_hooks), host_hooks)
}

/// Parses and runs `source` as a new script in the agent's realm.
pub fn evaluate(agent: &mut Agent<'static>, source: &str) -> JsResult<Value> {
    evaluate_with(agent, source, ScriptOptions::default())
}

pub fn evaluate_with(
    agent: &mut Agent<'static>,
    source: &str,
    options: ScriptOptions,
) -> JsResult<Value> {
    let source: &'static str = Box::leak(source.to_owned().into_boxed_str());
    let allocator: &'static Allocator = Box::leak(Box::new(Allocator::default()));
    let script = parse_script(allocator, source, options)
        .unwrap_or_else(|errors| panic!("Parse errors in {source:?}: {errors:?}"));
    agent.run_script(Box::leak(Box::new(script)))
}

/// Runs `source` and renders its completion value the way `console.log`
/// would show it nested, so strings come back quoted.
pub fn evaluate_repr(agent: &mut Agent<'static>, source: &str) -> String {
    match evaluate(agent, source) {
        Ok(value) => value.string_repr(agent),
        Err(error) => panic!("Uncaught exception: {}", error.to_string(agent)),
    }
}

/// Runs `source` and returns the uncaught exception as `Name: message`.
pub fn evaluate_error(agent: &mut Agent<'static>, source: &str) -> String {
    match evaluate(agent, source) {
        Ok(value) => panic!("Expected an exception, got {}", value.string_repr(agent)),
        Err(error) => error.to_string(agent),
    }
}

pub fn read_source(name: &str) -> String {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "sources", name]
        .iter()
        .collect();
    fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("Could not read {}: {err}", path.display()))
}
