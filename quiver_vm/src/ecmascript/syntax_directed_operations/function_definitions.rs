// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [15.2 Function Definitions](https://tc39.es/ecma262/#sec-function-definitions)
//! ### [15.3 Arrow Function Definitions](https://tc39.es/ecma262/#sec-arrow-function-definitions)

use ahash::AHashSet;
use oxc_ast::ast::{self, BindingPattern, FormalParameters};
use oxc_span::Span;

use super::scope_analysis::{
    LexicallyScopedDeclaration, VarScopedDeclaration, top_level_lexically_scoped_declarations,
    top_level_var_scoped_declarations,
};
use crate::{
    ecmascript::{
        builtins::{
            FunctionBodyKind, OrdinaryFunctionCreateParams, ThisMode, ordinary_function_create,
        },
        execution::{
            Agent, Environment, JsError, JsResult, environments::new_declarative_environment,
        },
        scripts_and_modules::script::{bound_name, bound_names},
        types::{Function, Value},
    },
    engine::evaluation::{
        Completion, evaluate_expression, evaluate_named_expression, evaluate_statements,
        throw_unsupported,
    },
    heap::{ECMAScriptFunction, HeapString},
};

/// The source text matched by a syntax node of the running code.
fn source_text_of<'a>(agent: &Agent<'a>, span: Span) -> &'a str {
    agent
        .current_source_code()
        .get(span.start as usize..span.end as usize)
        .unwrap_or_default()
}

fn check_ordinary_function(agent: &mut Agent, function: &ast::Function) -> Result<(), JsError> {
    if function.generator {
        return Err(throw_unsupported(agent, "Generator functions"));
    }
    if function.r#async {
        return Err(throw_unsupported(agent, "Async functions"));
    }
    Ok(())
}

/// Creates an ordinary, non-arrow function closing over `env`.
fn create_ordinary_function<'a>(
    agent: &mut Agent<'a>,
    function: &'a ast::Function<'a>,
    env: Environment,
    name: Option<HeapString>,
) -> JsResult<ECMAScriptFunction> {
    check_ordinary_function(agent, function)?;
    let Some(body) = function.body.as_deref() else {
        return Err(throw_unsupported(agent, "Functions without a body"));
    };
    let strict = agent.is_strict_mode() || body.has_use_strict_directive();
    let params = OrdinaryFunctionCreateParams {
        source_code: agent.current_source_code(),
        source_text: source_text_of(agent, function.span),
        parameters_list: &function.params,
        body: FunctionBodyKind::Statements(body),
        this_mode: if strict {
            ThisMode::Strict
        } else {
            ThisMode::Global
        },
        strict,
        env,
        name,
    };
    Ok(ordinary_function_create(agent, params))
}

/// ### [15.2.4 Runtime Semantics: InstantiateOrdinaryFunctionObject](https://tc39.es/ecma262/#sec-runtime-semantics-instantiateordinaryfunctionobject)
///
/// The syntax-directed operation InstantiateOrdinaryFunctionObject takes
/// argument env (an Environment Record) and returns an ECMAScript function
/// object.
pub(crate) fn instantiate_ordinary_function_object<'a>(
    agent: &mut Agent<'a>,
    function: &'a ast::Function<'a>,
    env: Environment,
) -> JsResult<ECMAScriptFunction> {
    // FunctionDeclaration : function BindingIdentifier ( FormalParameters ) { FunctionBody }
    // 1. Let name be StringValue of BindingIdentifier.
    let name = bound_name(agent, function);
    // 2. Let sourceText be the source text matched by FunctionDeclaration.
    // 3. Let F be OrdinaryFunctionCreate(%Function.prototype%, sourceText,
    //    FormalParameters, FunctionBody, NON-LEXICAL-THIS, env, privateEnv).
    // 4. Perform SetFunctionName(F, name).
    // 5. Perform MakeConstructor(F).
    // 6. Return F.
    create_ordinary_function(agent, function, env, Some(name))
}

/// ### [15.2.5 Runtime Semantics: InstantiateOrdinaryFunctionExpression](https://tc39.es/ecma262/#sec-runtime-semantics-instantiateordinaryfunctionexpression)
///
/// The syntax-directed operation InstantiateOrdinaryFunctionExpression takes
/// optional argument name and returns an ECMAScript function object.
pub(crate) fn instantiate_ordinary_function_expression<'a>(
    agent: &mut Agent<'a>,
    function: &'a ast::Function<'a>,
    name: Option<HeapString>,
) -> JsResult<ECMAScriptFunction> {
    // 2. Let env be the LexicalEnvironment of the running execution context.
    let env = agent.current_lexical_environment();
    let Some(id) = &function.id else {
        // FunctionExpression : function ( FormalParameters ) { FunctionBody }
        // 1. If name is not present, set name to "".
        // 5. Let closure be OrdinaryFunctionCreate(%Function.prototype%,
        //    sourceText, FormalParameters, FunctionBody, NON-LEXICAL-THIS,
        //    env, privateEnv).
        // 6. Perform SetFunctionName(closure, name).
        // 7. Perform MakeConstructor(closure).
        // 8. Return closure.
        return create_ordinary_function(agent, function, env, name);
    };
    // FunctionExpression : function BindingIdentifier ( FormalParameters ) { FunctionBody }
    // 2. Let name be StringValue of BindingIdentifier.
    let name = agent.heap.create_string(id.name.as_str());
    // 4. Let funcEnv be NewDeclarativeEnvironment(outerEnv).
    let func_env = new_declarative_environment(agent, Some(env));
    // 5. Perform ! funcEnv.CreateImmutableBinding(name, false).
    let func_env = Environment::Declarative(func_env);
    func_env.create_immutable_binding(agent, name);
    // 8. Let closure be OrdinaryFunctionCreate(%Function.prototype%,
    //    sourceText, FormalParameters, FunctionBody, NON-LEXICAL-THIS,
    //    funcEnv, privateEnv).
    // 9. Perform SetFunctionName(closure, name).
    // 10. Perform MakeConstructor(closure).
    let closure = create_ordinary_function(agent, function, func_env, Some(name))?;
    // 11. Perform ! funcEnv.InitializeBinding(name, closure).
    func_env.initialize_binding(
        agent,
        name,
        Value::Function(Function::ECMAScriptFunction(closure)),
    );
    // 12. Return closure.
    Ok(closure)
}

/// ### [15.3.4 Runtime Semantics: InstantiateArrowFunctionExpression](https://tc39.es/ecma262/#sec-runtime-semantics-instantiatearrowfunctionexpression)
///
/// The closure captures the running LexicalEnvironment and nothing else:
/// `this` inside the body resolves through that environment.
pub(crate) fn instantiate_arrow_function_expression<'a>(
    agent: &mut Agent<'a>,
    arrow: &'a ast::ArrowFunctionExpression<'a>,
    name: Option<HeapString>,
) -> JsResult<ECMAScriptFunction> {
    if arrow.r#async {
        return Err(throw_unsupported(agent, "Async functions"));
    }
    // 1. If name is not present, set name to "".
    // 2. Let env be the LexicalEnvironment of the running execution context.
    let env = agent.current_lexical_environment();
    // 4. Let sourceText be the source text matched by ArrowFunction.
    let source_text = source_text_of(agent, arrow.span);
    let strict = agent.is_strict_mode() || arrow.body.has_use_strict_directive();
    let body = if arrow.expression {
        FunctionBodyKind::Concise(&arrow.body)
    } else {
        FunctionBodyKind::Statements(&arrow.body)
    };
    // 5. Let closure be OrdinaryFunctionCreate(%Function.prototype%,
    //    sourceText, ArrowParameters, ConciseBody, LEXICAL-THIS, env,
    //    privateEnv).
    let params = OrdinaryFunctionCreateParams {
        source_code: agent.current_source_code(),
        source_text,
        parameters_list: &arrow.params,
        body,
        this_mode: ThisMode::Lexical,
        strict,
        env,
        // 6. Perform SetFunctionName(closure, name).
        name,
    };
    // 7. Return closure.
    Ok(ordinary_function_create(agent, params))
}

/// The single binding identifier of a parameter or declarator, or an error
/// for destructuring patterns.
pub(crate) fn binding_identifier_name(
    agent: &mut Agent,
    pattern: &BindingPattern,
) -> JsResult<HeapString> {
    match pattern.get_binding_identifier() {
        Some(identifier) => Ok(agent.heap.create_string(identifier.name.as_str())),
        None => Err(throw_unsupported(agent, "Destructuring patterns")),
    }
}

/// ### [10.2.11 FunctionDeclarationInstantiation ( func, argumentsList )](https://tc39.es/ecma262/#sec-functiondeclarationinstantiation)
///
/// Binds the parameters, hoisted `var`s, function declarations and
/// top-level `let`/`const` of `func` in the running function environment.
/// Parameter defaults are evaluated left to right in that same
/// environment, so a default can see the parameters before it.
fn function_declaration_instantiation<'a>(
    agent: &mut Agent<'a>,
    func: ECMAScriptFunction,
    arguments_list: &[Value],
) -> JsResult<()> {
    // 1. Let calleeContext be the running execution context.
    // 2. Let code be func.[[ECMAScriptCode]].
    // 3. Let strict be func.[[Strict]].
    // 4. Let formals be func.[[FormalParameters]].
    let formals: &'a FormalParameters<'a> = agent[func].formal_parameters;
    let code = match agent[func].ecmascript_code {
        FunctionBodyKind::Statements(body) => Some(body),
        FunctionBodyKind::Concise(_) => None,
    };
    let env = agent.current_lexical_environment();

    // 5. Let parameterNames be the BoundNames of formals.
    let mut parameter_names = Vec::with_capacity(formals.items.len());
    for parameter in &formals.items {
        parameter_names.push(binding_identifier_name(agent, &parameter.pattern)?);
    }
    let rest_name = match &formals.rest {
        Some(rest) => Some(binding_identifier_name(agent, &rest.rest.argument)?),
        None => None,
    };

    // 21. For each String paramName of parameterNames, do
    for &param_name in parameter_names.iter().chain(rest_name.iter()) {
        // a. Let alreadyDeclared be ! env.HasBinding(paramName).
        // b. NOTE: Early errors ensure that duplicate parameter names can
        //    only occur in non-strict functions.
        // c. If alreadyDeclared is false, then
        if !env.has_binding(agent, param_name) {
            // i. Perform ! env.CreateMutableBinding(paramName, false).
            env.create_mutable_binding(agent, param_name);
        }
    }

    // 25. If hasDuplicates is true, then IteratorBindingInitialization of
    //     formals with arguments iteratorRecord and undefined.
    // 26. Else, IteratorBindingInitialization of formals with arguments
    //     iteratorRecord and env.
    for (index, (parameter, &param_name)) in formals.items.iter().zip(&parameter_names).enumerate()
    {
        let mut value = arguments_list.get(index).copied().unwrap_or_default();
        if value.is_undefined() {
            if let Some(initializer) = &parameter.initializer {
                value = if initializer.is_anonymous_function_definition() {
                    evaluate_named_expression(agent, initializer, param_name)?
                } else {
                    evaluate_expression(agent, initializer)?
                };
            }
        }
        env.initialize_binding(agent, param_name, value);
    }
    if let Some(rest_name) = rest_name {
        let rest = arguments_list
            .get(formals.items.len()..)
            .unwrap_or_default()
            .to_vec();
        let rest = agent.heap.create_array(rest);
        env.initialize_binding(agent, rest_name, Value::Array(rest));
    }

    // An arrow function with an ExpressionBody declares nothing else.
    let Some(code) = code else {
        return Ok(());
    };

    // 27. If hasParameterExpressions is false, then
    //     b. Let instantiatedVarNames be a copy of the List parameterBindings.
    let mut instantiated_var_names: AHashSet<HeapString> =
        parameter_names.iter().copied().chain(rest_name).collect();
    // 9. Let varNames be the VarDeclaredNames of code.
    // 10. Let varDeclarations be the VarScopedDeclarations of code.
    let var_declarations = top_level_var_scoped_declarations(&code.statements);
    // 32. Let functionsToInitialize be a new empty List.
    let mut functions_to_initialize = Vec::new();
    let mut declared_function_names = AHashSet::new();
    for d in var_declarations.iter().rev() {
        if let VarScopedDeclaration::Function(function) = *d {
            let function_name = bound_name(agent, function);
            if declared_function_names.insert(function_name) {
                functions_to_initialize.push((function_name, function));
            }
        }
    }
    functions_to_initialize.reverse();
    //     c. For each element n of varNames, do
    for d in &var_declarations {
        let names = match d {
            VarScopedDeclaration::Variable(decl) => bound_names(agent, &decl.id),
            VarScopedDeclaration::Function(function) => vec![bound_name(agent, *function)],
        };
        for n in names {
            // i. If instantiatedVarNames does not contain n, then
            if instantiated_var_names.insert(n) {
                // 2. Perform ! env.CreateMutableBinding(n, false).
                env.create_mutable_binding(agent, n);
                // 3. Perform ! env.InitializeBinding(n, undefined).
                env.initialize_binding(agent, n, Value::Undefined);
            }
        }
    }

    // 30. If strict is false, then
    //     a. Let lexEnv be NewDeclarativeEnvironment(varEnv).
    //     b. NOTE: Non-strict functions use a separate Environment Record
    //        for top-level lexical declarations so that a direct eval can
    //        determine whether any var scoped declarations introduced by
    //        the eval code conflict with pre-existing top-level lexically
    //        scoped declarations.
    // Direct eval is not supported, so lexEnv is varEnv.
    // 33. Let lexDeclarations be the LexicallyScopedDeclarations of code.
    // 34. For each element d of lexDeclarations, do
    for d in top_level_lexically_scoped_declarations(&code.statements) {
        let LexicallyScopedDeclaration::Variable(decl) = d else {
            continue;
        };
        // b. For each element dn of the BoundNames of d, do
        for dn in bound_names(agent, &decl.id) {
            if decl.kind.is_const() {
                // i. If IsConstantDeclaration of d is true, then
                //    1. Perform ! lexEnv.CreateImmutableBinding(dn, true).
                env.create_immutable_binding(agent, dn);
            } else {
                // ii. Else,
                //     1. Perform ! lexEnv.CreateMutableBinding(dn, false).
                env.create_mutable_binding(agent, dn);
            }
        }
    }

    // 36. For each Parse Node f of functionsToInitialize, do
    for (function_name, f) in functions_to_initialize {
        // a. Let fn be the sole element of the BoundNames of f.
        // b. Let fo be InstantiateFunctionObject of f with arguments lexEnv
        //    and privateEnv.
        let fo = instantiate_ordinary_function_object(agent, f, env)?;
        // c. Perform ! varEnv.SetMutableBinding(fn, fo, false).
        env.set_mutable_binding(
            agent,
            function_name,
            Value::Function(Function::ECMAScriptFunction(fo)),
            false,
        )?;
    }

    // 37. Return UNUSED.
    Ok(())
}

/// ### [15.2.3 Runtime Semantics: EvaluateFunctionBody](https://tc39.es/ecma262/#sec-runtime-semantics-evaluatefunctionbody)
///
/// Evaluates the body of `function_object` in the callee context that
/// PrepareForOrdinaryCall pushed. The result is the returned value; an
/// arrow function's ExpressionBody returns its value implicitly.
pub(crate) fn evaluate_function_body<'a>(
    agent: &mut Agent<'a>,
    function_object: ECMAScriptFunction,
    arguments_list: &[Value],
) -> JsResult<Value> {
    // 1. Perform ? FunctionDeclarationInstantiation(functionObject, argumentsList).
    function_declaration_instantiation(agent, function_object, arguments_list)?;
    match agent[function_object].ecmascript_code {
        FunctionBodyKind::Statements(body) => {
            // 2. Return ? Evaluation of FunctionStatementList.
            match evaluate_statements(agent, &body.statements)? {
                Completion::Return(value) => Ok(value),
                _ => Ok(Value::Undefined),
            }
        }
        // ### [15.3.5 Runtime Semantics: EvaluateConciseBody](https://tc39.es/ecma262/#sec-runtime-semantics-evaluateconcisebody)
        FunctionBodyKind::Concise(body) => {
            // ExpressionBody : AssignmentExpression
            // 1. Let exprRef be ? Evaluation of AssignmentExpression.
            // 2. Let exprValue be ? GetValue(exprRef).
            // 3. Return Completion Record { [[Type]]: RETURN, [[Value]]: exprValue }.
            match body.statements.first() {
                Some(ast::Statement::ExpressionStatement(statement)) => {
                    evaluate_expression(agent, &statement.expression)
                }
                _ => Ok(Value::Undefined),
            }
        }
    }
}
