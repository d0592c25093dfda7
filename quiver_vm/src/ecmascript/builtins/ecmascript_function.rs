// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use oxc_ast::ast::{FormalParameters, FunctionBody};

use crate::{
    ecmascript::{
        abstract_operations::operations_on_objects::get_prototype_from_constructor,
        execution::{
            Agent, ECMAScriptCode, Environment, ExecutionContext, FunctionEnvironment, JsResult,
            ThisBindingStatus, environments::new_function_environment, get_this_environment,
        },
        syntax_directed_operations::function_definitions::evaluate_function_body,
        types::{Function, Object, PropertyKey, Value},
    },
    engine::evaluation::{STACK_GROW_SIZE, STACK_RED_ZONE},
    heap::{
        ECMAScriptFunction, HeapString, OrdinaryObject,
        heap_gc::{HeapMarkAndSweep, WorkQueues},
    },
};

/// ### \[\[ThisMode\]\]
///
/// Defines how `this` references are interpreted within the formal
/// parameters and code body of the function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThisMode {
    /// `this` refers to the `this` value of a lexically enclosing function.
    Lexical,
    /// The `this` value is used exactly as provided by an invocation of the
    /// function.
    Strict,
    /// A `this` value of undefined or null is interpreted as a reference to
    /// the global object.
    Global,
}

/// How a function is being invoked, which is what decides the `this` value
/// of a function that does not capture it lexically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CallSite {
    /// `f()`: no receiver.
    Plain,
    /// `receiver.f()`, or an explicit receiver passed through
    /// `Function.prototype.call` and friends.
    Method(Value),
    /// `new F()`: the newly allocated instance.
    Construct(Object),
}

impl CallSite {
    /// An explicit receiver; `undefined` is the same as no receiver.
    pub fn from_this_argument(this_argument: Value) -> Self {
        if this_argument.is_undefined() {
            CallSite::Plain
        } else {
            CallSite::Method(this_argument)
        }
    }

    /// The `thisArgument` of the \[\[Call\]\] this call site performs.
    pub fn this_argument(self) -> Value {
        match self {
            CallSite::Plain => Value::Undefined,
            CallSite::Method(receiver) => receiver,
            CallSite::Construct(instance) => instance.into(),
        }
    }
}

/// The body of an ECMAScript function.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FunctionBodyKind<'a> {
    /// A FunctionBody: statements, completed by an explicit `return`.
    Statements(&'a FunctionBody<'a>),
    /// An arrow function's ExpressionBody: the single expression is the
    /// return value.
    Concise(&'a FunctionBody<'a>),
}

/// ### [10.2 ECMAScript Function Objects](https://tc39.es/ecma262/#sec-ecmascript-function-objects)
#[derive(Debug)]
pub struct ECMAScriptFunctionHeapData<'a> {
    /// ### \[\[Environment\]\]
    ///
    /// The Environment Record that the function was closed over. Used as the
    /// outer environment when evaluating the code of the function, and the
    /// starting point when an arrow function resolves `this`.
    pub(crate) environment: Environment,

    /// ### \[\[FormalParameters\]\]
    pub(crate) formal_parameters: &'a FormalParameters<'a>,

    /// ### \[\[ECMAScriptCode\]\]
    pub(crate) ecmascript_code: FunctionBodyKind<'a>,

    /// ### \[\[ThisMode\]\]
    pub(crate) this_mode: ThisMode,

    /// ### \[\[Strict\]\]
    pub(crate) strict: bool,

    /// Whether the function has a \[\[Construct\]\] internal method.
    pub(crate) constructor: bool,

    /// ### \[\[SourceText\]\]
    pub(crate) source_text: &'a str,

    /// Source text of the whole script the function was parsed from.
    pub(crate) source_code: &'a str,

    /// The function's `name` property.
    pub(crate) name: Option<HeapString>,

    /// The function's `length` property: ExpectedArgumentCount.
    pub(crate) length: u32,

    /// Holds every other property of the function object, including the
    /// `prototype` of constructors.
    pub(crate) backing_object: Option<OrdinaryObject>,
}

impl HeapMarkAndSweep for ECMAScriptFunctionHeapData<'_> {
    fn mark_values(&self, queues: &mut WorkQueues) {
        self.environment.mark_values(queues);
        self.name.mark_values(queues);
        self.backing_object.mark_values(queues);
    }
}

impl<'a> core::ops::Index<ECMAScriptFunction> for Vec<Option<ECMAScriptFunctionHeapData<'a>>> {
    type Output = ECMAScriptFunctionHeapData<'a>;

    fn index(&self, index: ECMAScriptFunction) -> &Self::Output {
        self.get(index.into_index())
            .expect("ECMAScriptFunction out of bounds")
            .as_ref()
            .expect("ECMAScriptFunction slot empty")
    }
}

impl<'a> core::ops::IndexMut<ECMAScriptFunction> for Vec<Option<ECMAScriptFunctionHeapData<'a>>> {
    fn index_mut(&mut self, index: ECMAScriptFunction) -> &mut Self::Output {
        self.get_mut(index.into_index())
            .expect("ECMAScriptFunction out of bounds")
            .as_mut()
            .expect("ECMAScriptFunction slot empty")
    }
}

impl<'a> core::ops::Index<ECMAScriptFunction> for Agent<'a> {
    type Output = ECMAScriptFunctionHeapData<'a>;

    fn index(&self, index: ECMAScriptFunction) -> &Self::Output {
        &self.heap.ecmascript_functions[index]
    }
}

impl<'a> core::ops::IndexMut<ECMAScriptFunction> for Agent<'a> {
    fn index_mut(&mut self, index: ECMAScriptFunction) -> &mut Self::Output {
        &mut self.heap.ecmascript_functions[index]
    }
}

pub(crate) struct OrdinaryFunctionCreateParams<'a> {
    pub(crate) source_code: &'a str,
    pub(crate) source_text: &'a str,
    pub(crate) parameters_list: &'a FormalParameters<'a>,
    pub(crate) body: FunctionBodyKind<'a>,
    pub(crate) this_mode: ThisMode,
    pub(crate) strict: bool,
    pub(crate) env: Environment,
    pub(crate) name: Option<HeapString>,
}

/// ### [10.2.1 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-ecmascript-function-objects-call-thisargument-argumentslist)
///
/// The \[\[Call\]\] internal method of an ECMAScript function object `F`
/// takes the call site that supplies `thisArgument` and `argumentsList` (a
/// List of ECMAScript language values) and returns either a normal
/// completion containing an ECMAScript language value or a throw completion.
pub(crate) fn ecmascript_function_call(
    agent: &mut Agent,
    f: ECMAScriptFunction,
    call_site: CallSite,
    arguments_list: &[Value],
) -> JsResult<Value> {
    if agent.options.print_internals {
        eprintln!(
            "Calling {} ({:?}) as {:?}",
            Function::ECMAScriptFunction(f).name(agent),
            agent[f].this_mode,
            call_site
        );
    }
    // 1. Let callerContext be the running execution context.
    // 2. Let calleeContext be PrepareForOrdinaryCall(F, undefined).
    let local_env = prepare_for_ordinary_call(agent, f, None)?;
    // 3. Assert: calleeContext is now the running execution context.
    // 4. If F.[[IsClassConstructor]] is true, then
    // Classes are not supported.
    // 5. Perform OrdinaryCallBindThis(F, calleeContext, thisArgument).
    ordinary_call_bind_this(agent, f, local_env, call_site.this_argument());
    // 6. Let result be Completion(OrdinaryCallEvaluateBody(F, argumentsList)).
    let result = ordinary_call_evaluate_body(agent, f, arguments_list);
    // 7. Remove calleeContext from the execution context stack and restore
    //    callerContext as the running execution context.
    agent.execution_context_stack.pop();
    // 8. If result is a return completion, return result.[[Value]].
    // 9. ReturnIfAbrupt(result).
    // 10. Return undefined.
    result
}

/// ### [10.2.2 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-ecmascript-function-objects-construct-argumentslist-newtarget)
///
/// Callers check that `f` is a constructor.
pub(crate) fn ecmascript_function_construct(
    agent: &mut Agent,
    f: ECMAScriptFunction,
    arguments_list: &[Value],
    new_target: Function,
) -> JsResult<Value> {
    // 1. Let callerContext be the running execution context.
    // 2. Let kind be F.[[ConstructorKind]].
    // 3. If kind is BASE, then
    //    a. Let thisArgument be ? OrdinaryCreateFromConstructor(newTarget, "%Object.prototype%").
    let prototype = get_prototype_from_constructor(agent, new_target)?;
    let this_argument = agent.heap.create_object(Some(prototype));
    if agent.options.print_internals {
        eprintln!(
            "Constructing {} into {:?}",
            Function::ECMAScriptFunction(f).name(agent),
            this_argument
        );
    }
    // 4. Let calleeContext be PrepareForOrdinaryCall(F, newTarget).
    let local_env = prepare_for_ordinary_call(agent, f, Some(Object::Function(new_target)))?;
    // 5. Assert: calleeContext is now the running execution context.
    // 6. If kind is BASE, then
    //    a. Perform OrdinaryCallBindThis(F, calleeContext, thisArgument).
    let call_site = CallSite::Construct(Object::Object(this_argument));
    ordinary_call_bind_this(agent, f, local_env, call_site.this_argument());
    // 7. Let constructorEnv be the LexicalEnvironment of calleeContext.
    // 8. Let result be Completion(OrdinaryCallEvaluateBody(F, argumentsList)).
    let result = ordinary_call_evaluate_body(agent, f, arguments_list);
    // 9. Remove calleeContext from the execution context stack and restore
    //    callerContext as the running execution context.
    agent.execution_context_stack.pop();
    // 10. If result is a return completion, then
    //     a. If result.[[Value]] is an Object, return result.[[Value]].
    //     b. If kind is BASE, return thisArgument.
    // 11. Else, ReturnIfAbrupt(result).
    match result? {
        value if value.is_object() => Ok(value),
        _ => Ok(Value::Object(this_argument)),
    }
}

/// ### [10.2.1.1 PrepareForOrdinaryCall ( F, newTarget )](https://tc39.es/ecma262/#sec-prepareforordinarycall)
///
/// Pushes the callee context and returns its function environment, which is
/// all that later steps need from it. Throws a RangeError instead when the
/// call would nest too deeply.
pub(crate) fn prepare_for_ordinary_call(
    agent: &mut Agent,
    f: ECMAScriptFunction,
    new_target: Option<Object>,
) -> JsResult<FunctionEnvironment> {
    let strict = agent[f].strict;
    let source_code = agent[f].source_code;
    // 1. Let callerContext be the running execution context.
    // 7. Let localEnv be NewFunctionEnvironment(F, newTarget).
    let local_env = new_function_environment(agent, f, new_target);
    // 2. Let calleeContext be a new ECMAScript code execution context.
    let callee_context = ExecutionContext {
        // 8. Set the LexicalEnvironment of calleeContext to localEnv.
        // 9. Set the VariableEnvironment of calleeContext to localEnv.
        ecmascript_code: Some(ECMAScriptCode {
            lexical_environment: Environment::Function(local_env),
            variable_environment: Environment::Function(local_env),
            is_strict_mode: strict,
            source_code,
        }),
        // 3. Set the Function of calleeContext to F.
        function: Some(Function::ECMAScriptFunction(f)),
    };
    // 11. If callerContext is not already suspended, suspend callerContext.
    // 12. Push calleeContext onto the execution context stack; calleeContext
    //     is now the running execution context.
    agent.push_execution_context(callee_context)?;
    // 14. Return calleeContext.
    Ok(local_env)
}

/// ### [10.2.1.2 OrdinaryCallBindThis ( F, calleeContext, thisArgument )](https://tc39.es/ecma262/#sec-ordinarycallbindthis)
///
/// The abstract operation OrdinaryCallBindThis takes arguments `F` (an
/// ECMAScript function object), calleeContext (an execution context), and
/// `thisArgument` (an ECMAScript language value) and returns UNUSED.
///
/// Note: calleeContext is replaced by localEnv which is the only thing it is
/// truly used for.
pub(crate) fn ordinary_call_bind_this(
    agent: &mut Agent,
    f: ECMAScriptFunction,
    local_env: FunctionEnvironment,
    this_argument: Value,
) {
    // 1. Let thisMode be F.[[ThisMode]].
    let this_mode = agent[f].this_mode;
    // 2. If thisMode is LEXICAL, return UNUSED.
    if this_mode == ThisMode::Lexical {
        return;
    }
    // 3. Let calleeRealm be F.[[Realm]].
    // 4. Let localEnv be the LexicalEnvironment of calleeContext.
    let this_value = if this_mode == ThisMode::Strict {
        // 5. If thisMode is STRICT, then
        // a. Let thisValue be thisArgument.
        this_argument
    } else if this_argument.is_nullish() {
        // 6. Else,
        // a. If thisArgument is either undefined or null, then
        // i. Let globalEnv be calleeRealm.[[GlobalEnv]].
        // ii. Assert: globalEnv is a Global Environment Record.
        // iii. Let thisValue be globalEnv.[[GlobalThisValue]].
        agent.global_env().get_this_binding(agent)
    } else {
        // b. Else,
        // i. Let thisValue be ! ToObject(thisArgument).
        // Primitives have no wrapper objects here and are bound as they are.
        this_argument
    };
    // 7. Assert: localEnv is a Function Environment Record.
    // 8. Assert: The next step never returns an abrupt completion because
    //    localEnv.[[ThisBindingStatus]] is not INITIALIZED.
    debug_assert_ne!(
        local_env.get_this_binding_status(agent),
        ThisBindingStatus::Initialized
    );
    // 9. Perform ! localEnv.BindThisValue(thisValue).
    if agent.options.print_internals {
        eprintln!(
            "Binding this of {local_env:?} to {}",
            this_value.string_repr(agent)
        );
    }
    local_env.bind_this_value(agent, this_value).unwrap();
    // 10. Return UNUSED.
}

/// ### [10.2.1.4 OrdinaryCallEvaluateBody ( F, argumentsList )](https://tc39.es/ecma262/#sec-ordinarycallevaluatebody)
fn ordinary_call_evaluate_body(
    agent: &mut Agent,
    f: ECMAScriptFunction,
    arguments_list: &[Value],
) -> JsResult<Value> {
    // 1. Return ? EvaluateBody of F.[[ECMAScriptCode]] with arguments F and
    //    argumentsList.
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
        evaluate_function_body(agent, f, arguments_list)
    })
}

/// Determines the Environment Record whose `this` binding a reference to
/// `this` inside `f`'s body resolves to, when `f` is invoked from
/// `call_site`.
///
/// An ordinary function gets a fresh function environment whose `this` is
/// bound from the call site: the receiver of a method call, the new
/// instance of a construction, or for a plain call the global object
/// (`undefined` in strict functions). An arrow function gets no `this`
/// binding of its own; resolution walks outward from the environment it
/// closed over to the nearest record that has one, so the result depends on
/// where the arrow was defined and never on `call_site`.
pub fn resolve_this_environment(
    agent: &mut Agent,
    f: ECMAScriptFunction,
    call_site: CallSite,
) -> Environment {
    if agent[f].this_mode == ThisMode::Lexical {
        let env = get_this_environment(agent, agent[f].environment);
        if agent.options.print_internals {
            eprintln!("Lexical this of {f:?} resolved to {env:?}");
        }
        return env;
    }
    let new_target = match call_site {
        CallSite::Construct(_) => Some(Object::Function(Function::ECMAScriptFunction(f))),
        CallSite::Plain | CallSite::Method(_) => None,
    };
    let local_env = new_function_environment(agent, f, new_target);
    ordinary_call_bind_this(agent, f, local_env, call_site.this_argument());
    Environment::Function(local_env)
}

/// ### [10.2.3 OrdinaryFunctionCreate ( functionPrototype, sourceText, ParameterList, Body, thisMode, env, privateEnv )](https://tc39.es/ecma262/#sec-ordinaryfunctioncreate)
///
/// Creates a new function with a default \[\[Call\]\] internal method. Non-arrow
/// functions are additionally made constructors with a fresh `prototype`
/// object, as MakeConstructor would.
pub(crate) fn ordinary_function_create<'a>(
    agent: &mut Agent<'a>,
    params: OrdinaryFunctionCreateParams<'a>,
) -> ECMAScriptFunction {
    // 21. Let len be the ExpectedArgumentCount of ParameterList.
    let length = params
        .parameters_list
        .items
        .iter()
        .take_while(|parameter| {
            parameter.initializer.is_none() && !parameter.pattern.is_assignment_pattern()
        })
        .count() as u32;
    let constructor = params.this_mode != ThisMode::Lexical;
    // 2. Let F be OrdinaryObjectCreate(functionPrototype, internalSlotsList).
    // The [[Prototype]] of every function is %Function.prototype%.
    let function = agent
        .heap
        .create_ecmascript_function(ECMAScriptFunctionHeapData {
            // 13. Set F.[[Environment]] to env.
            environment: params.env,
            // 5. Set F.[[FormalParameters]] to ParameterList.
            formal_parameters: params.parameters_list,
            // 6. Set F.[[ECMAScriptCode]] to Body.
            ecmascript_code: params.body,
            // 9. If thisMode is LEXICAL-THIS, set F.[[ThisMode]] to LEXICAL.
            // 10. Else if Strict is true, set F.[[ThisMode]] to STRICT.
            // 11. Else, set F.[[ThisMode]] to GLOBAL.
            this_mode: params.this_mode,
            // 8. Set F.[[Strict]] to Strict.
            strict: params.strict,
            constructor,
            // 4. Set F.[[SourceText]] to sourceText.
            source_text: params.source_text,
            source_code: params.source_code,
            name: params.name,
            // 22. Perform SetFunctionLength(F, len).
            length,
            backing_object: None,
        });
    if constructor {
        make_constructor(agent, function);
    }
    // 23. Return F.
    function
}

/// ### [10.2.5 MakeConstructor ( F \[ , writablePrototype \[ , prototype \] \] )](https://tc39.es/ecma262/#sec-makeconstructor)
fn make_constructor(agent: &mut Agent, f: ECMAScriptFunction) {
    // 5. If prototype is not present, then
    //    a. Set prototype to OrdinaryObjectCreate(%Object.prototype%).
    let object_prototype = agent.intrinsics().object_prototype;
    let prototype = agent.heap.create_object(Some(object_prototype));
    //    b. Perform ! DefinePropertyOrThrow(prototype, "constructor", ...).
    let constructor_key = PropertyKey::from_str(agent, "constructor");
    agent[prototype].set_own(
        constructor_key,
        Value::Function(Function::ECMAScriptFunction(f)),
    );
    // 6. Perform ! DefinePropertyOrThrow(F, "prototype", ...).
    let prototype_key = PropertyKey::from_str(agent, "prototype");
    let backing_object = Function::ECMAScriptFunction(f).get_or_create_backing_object(agent);
    agent[backing_object].set_own(prototype_key, Value::Object(prototype));
}
