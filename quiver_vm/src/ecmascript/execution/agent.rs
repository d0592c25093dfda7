// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [9.7 Agents](https://tc39.es/ecma262/#sec-agents)

use super::{
    Environment, ExecutionContext, GlobalEnvironment, Intrinsics, Realm,
    jobs::{JobQueue, TimerId},
};
use crate::{
    ecmascript::{
        builtins::{CallSite, error::create_error_object, global_object::initialize_global_object},
        scripts_and_modules::script::{Script, script_evaluation},
        types::{Function, PropertyKey, Value},
    },
    heap::{Heap, HeapStatistics, OrdinaryObject, heap_gc::heap_gc},
};

/// Calls nested deeper than this throw a RangeError.
const MAXIMUM_CALL_DEPTH: usize = 3_000;

#[derive(Debug, Default, Clone, Copy)]
pub struct AgentOptions {
    /// Turns [`Agent::gc`] into a no-op.
    pub disable_gc: bool,
    /// Traces calls, `this` resolution and job execution to stderr.
    pub print_internals: bool,
}

pub type JsResult<T> = std::result::Result<T, JsError>;

/// A thrown JavaScript value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsError(Value);

impl JsError {
    pub(crate) fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(self) -> Value {
        self.0
    }

    /// Renders the thrown value the way an uncaught exception is reported:
    /// `Name: message` for error objects, the inspected value otherwise.
    pub fn to_string(self, agent: &mut Agent) -> String {
        let Some(object) = self.0.as_object() else {
            return self.0.string_repr(agent);
        };
        let name = agent.get_property(object.into(), "name");
        let message = agent.get_property(object.into(), "message");
        match (name, message) {
            (Ok(Value::String(name)), Ok(Value::String(message))) => {
                let name = name.as_str(agent);
                let message = message.as_str(agent);
                if message.is_empty() {
                    name.to_owned()
                } else {
                    format!("{name}: {message}")
                }
            }
            _ => self.0.string_repr(agent),
        }
    }
}

/// Hooks through which the agent reaches its embedder.
pub trait HostHooks: std::fmt::Debug {
    /// Receives one line of `console.log` output.
    fn print(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionType {
    Error,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
}

impl ExceptionType {
    pub fn name(self) -> &'static str {
        match self {
            ExceptionType::Error => "Error",
            ExceptionType::RangeError => "RangeError",
            ExceptionType::ReferenceError => "ReferenceError",
            ExceptionType::SyntaxError => "SyntaxError",
            ExceptionType::TypeError => "TypeError",
        }
    }
}

/// ### [9.7 Agents](https://tc39.es/ecma262/#sec-agents)
///
/// The agent owns the heap, its single realm, the execution context stack
/// and the queue of deferred callbacks. `'a` is the lifetime of the parsed
/// scripts that its functions point into.
#[derive(Debug)]
pub struct Agent<'a> {
    pub(crate) heap: Heap<'a>,
    pub(crate) options: AgentOptions,
    pub(crate) host_hooks: &'static dyn HostHooks,
    pub(crate) realm: Realm,
    pub(crate) execution_context_stack: Vec<ExecutionContext<'a>>,
    pub(crate) job_queue: JobQueue,
}

impl<'a> Agent<'a> {
    /// ### [9.6 InitializeHostDefinedRealm ( )](https://tc39.es/ecma262/#sec-initializehostdefinedrealm)
    pub fn new(options: AgentOptions, host_hooks: &'static dyn HostHooks) -> Self {
        let mut heap = Heap::new();
        let realm = Realm::create(&mut heap);
        let mut agent = Self {
            heap,
            options,
            host_hooks,
            realm,
            execution_context_stack: Vec::new(),
            job_queue: JobQueue::default(),
        };
        initialize_global_object(&mut agent);
        agent
    }

    pub fn options(&self) -> &AgentOptions {
        &self.options
    }

    pub(crate) fn intrinsics(&self) -> &Intrinsics {
        &self.realm.intrinsics
    }

    pub fn global_object(&self) -> OrdinaryObject {
        self.realm.global_object
    }

    pub fn global_env(&self) -> GlobalEnvironment {
        self.realm.global_env
    }

    /// ### [5.2.3.2 Throw an Exception](https://tc39.es/ecma262/#sec-throw-an-exception)
    pub fn throw_exception(&mut self, kind: ExceptionType, message: String) -> JsError {
        let message = self.heap.create_string(&message);
        let error = create_error_object(self, kind, Some(message));
        JsError(Value::Object(error))
    }

    pub(crate) fn running_execution_context(&self) -> Option<&ExecutionContext<'a>> {
        self.execution_context_stack.last()
    }

    /// Pushes `context` as the running execution context, or throws a
    /// RangeError when the stack is already [`MAXIMUM_CALL_DEPTH`] deep.
    pub(crate) fn push_execution_context(
        &mut self,
        context: ExecutionContext<'a>,
    ) -> JsResult<()> {
        if self.execution_context_stack.len() >= MAXIMUM_CALL_DEPTH {
            return Err(self.throw_exception(
                ExceptionType::RangeError,
                "Maximum call stack size exceeded".to_owned(),
            ));
        }
        self.execution_context_stack.push(context);
        Ok(())
    }

    /// The LexicalEnvironment of the nearest ECMAScript code context; the
    /// global environment when no code is running.
    pub fn current_lexical_environment(&self) -> Environment {
        self.execution_context_stack
            .iter()
            .rev()
            .find_map(|context| context.ecmascript_code)
            .map_or(
                Environment::Global(self.realm.global_env),
                |code| code.lexical_environment,
            )
    }

    pub(crate) fn set_current_lexical_environment(&mut self, env: Environment) {
        if let Some(code) = self
            .execution_context_stack
            .last_mut()
            .and_then(|context| context.ecmascript_code.as_mut())
        {
            code.lexical_environment = env;
        }
    }

    /// Source text of the running ECMAScript code.
    pub(crate) fn current_source_code(&self) -> &'a str {
        self.execution_context_stack
            .iter()
            .rev()
            .find_map(|context| context.ecmascript_code)
            .map_or("", |code| code.source_code)
    }

    /// Whether the running ECMAScript code is strict mode code.
    pub(crate) fn is_strict_mode(&self) -> bool {
        self.execution_context_stack
            .iter()
            .rev()
            .find_map(|context| context.ecmascript_code)
            .is_some_and(|code| code.is_strict_mode)
    }

    /// Evaluates a parsed script in the agent's realm.
    pub fn run_script(&mut self, script: &'a Script<'a>) -> JsResult<Value> {
        script_evaluation(self, script)
    }

    /// Reads a property of a value by name, as `value[name]` would.
    pub fn get_property(&mut self, value: Value, name: &str) -> JsResult<Value> {
        let key = PropertyKey::from_str(self, name);
        crate::ecmascript::abstract_operations::operations_on_objects::get_v(self, value, key)
    }

    /// Reads a global binding: a top-level `let`/`const` or a property of
    /// the global object. Missing bindings read as `undefined`.
    pub fn get_global(&mut self, name: &str) -> JsResult<Value> {
        let name = self.heap.create_string(name);
        let global_env = self.realm.global_env;
        if global_env.has_binding(self, name) {
            global_env.get_binding_value(self, name, false)
        } else {
            Ok(Value::Undefined)
        }
    }

    /// Calls a function value with no receiver.
    pub fn call_function(&mut self, function: Value, arguments: &[Value]) -> JsResult<Value> {
        crate::ecmascript::abstract_operations::operations_on_objects::call(
            self,
            function,
            CallSite::Plain,
            arguments,
        )
    }

    /// Runs a garbage collection, unless disabled by the options.
    pub fn gc(&mut self) {
        if self.options.disable_gc {
            return;
        }
        if self.options.print_internals {
            eprintln!("Running GC with {:?}", self.heap.statistics());
        }
        heap_gc(self);
        if self.options.print_internals {
            eprintln!("GC finished with {:?}", self.heap.statistics());
        }
    }

    pub fn heap_statistics(&self) -> HeapStatistics {
        self.heap.statistics()
    }

    /// Current virtual time of the job queue in milliseconds.
    pub fn now(&self) -> u64 {
        self.job_queue.now()
    }

    pub fn pending_jobs(&self) -> usize {
        self.job_queue.len()
    }

    /// Due time of the next pending job.
    pub fn next_job_due(&self) -> Option<u64> {
        self.job_queue.next_due()
    }

    pub(crate) fn schedule_job(
        &mut self,
        callback: Function,
        arguments: Box<[Value]>,
        delay: u64,
        repeat: bool,
    ) -> TimerId {
        let id = self.job_queue.schedule(callback, arguments, delay, repeat);
        if self.options.print_internals {
            eprintln!(
                "Scheduled {id:?} at {} ms (delay {delay} ms, repeat: {repeat})",
                self.job_queue.now()
            );
        }
        id
    }

    pub(crate) fn cancel_job(&mut self, id: TimerId) {
        let cancelled = self.job_queue.cancel(id);
        if self.options.print_internals {
            eprintln!("Cancelled {id:?}: {cancelled}");
        }
    }

    fn run_job(&mut self, deadline: Option<u64>) -> Option<JsResult<()>> {
        let job = self.job_queue.pop_due(deadline)?;
        if self.options.print_internals {
            eprintln!("Running {:?} at {} ms", job.id, self.job_queue.now());
        }
        // Deferred callbacks are invoked without a receiver.
        let result = Function::call(job.callback, self, CallSite::Plain, &job.arguments);
        Some(result.map(|_| ()))
    }

    /// Runs the earliest pending job, advancing the virtual clock to its due
    /// time. Returns `None` when no job is pending.
    pub fn run_next_job(&mut self) -> Option<JsResult<()>> {
        self.run_job(None)
    }

    /// Runs every job due at or before `deadline` in order, then advances
    /// the clock to `deadline`. Stops at the first uncaught exception.
    pub fn run_jobs_until(&mut self, deadline: u64) -> JsResult<usize> {
        let mut count = 0;
        while let Some(result) = self.run_job(Some(deadline)) {
            result?;
            count += 1;
        }
        self.job_queue.advance_to(deadline);
        Ok(count)
    }

    /// Runs at most `limit` jobs. Returns how many ran.
    pub fn run_jobs(&mut self, limit: usize) -> JsResult<usize> {
        let mut count = 0;
        while count < limit {
            let Some(result) = self.run_job(None) else {
                break;
            };
            result?;
            count += 1;
        }
        Ok(count)
    }
}
