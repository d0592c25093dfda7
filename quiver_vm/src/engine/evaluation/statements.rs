// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [14 ECMAScript Language: Statements and Declarations](https://tc39.es/ecma262/#sec-ecmascript-language-statements-and-declarations)

use oxc_ast::ast::{
    BlockStatement, CatchClause, ForStatement, ForStatementInit, Statement, SwitchStatement,
    TryStatement, VariableDeclaration,
};

use super::{Completion, evaluate_expression, evaluate_named_expression, throw_unsupported};
use crate::{
    ecmascript::{
        abstract_operations::{
            testing_and_comparison::is_strictly_equal, type_conversion::to_boolean,
        },
        execution::{Agent, Environment, JsError, JsResult, environments::new_declarative_environment},
        scripts_and_modules::script::bound_names,
        syntax_directed_operations::{
            function_definitions::{binding_identifier_name, instantiate_ordinary_function_object},
            scope_analysis::{LexicallyScopedDeclaration, lexically_scoped_declarations},
        },
        types::{Function, Value},
    },
    engine::evaluation::expressions::resolve_binding,
    heap::HeapString,
};

/// Evaluates the StatementList of a script. The result is the completion
/// value of the script: the value of the last statement that produced one.
pub(crate) fn evaluate_statement_list<'a>(
    agent: &mut Agent<'a>,
    statements: &'a [Statement<'a>],
) -> JsResult<Option<Value>> {
    match evaluate_statements(agent, statements)? {
        Completion::Normal(value) => Ok(value),
        Completion::Return(value) => Ok(Some(value)),
        Completion::Break | Completion::Continue => Ok(None),
    }
}

/// ### [14.2.2 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-block-runtime-semantics-evaluation)
///
/// StatementList : StatementList StatementListItem
pub(crate) fn evaluate_statements<'a>(
    agent: &mut Agent<'a>,
    statements: &'a [Statement<'a>],
) -> JsResult<Completion> {
    let mut value = None;
    for statement in statements {
        match evaluate_statement(agent, statement)? {
            // 3. Return ? UpdateEmpty(s, sl).
            Completion::Normal(Some(v)) => value = Some(v),
            Completion::Normal(None) => {}
            Completion::Return(v) => return Ok(Completion::Return(v)),
            Completion::Break => return Ok(Completion::Break),
            Completion::Continue => return Ok(Completion::Continue),
        }
    }
    Ok(Completion::Normal(value))
}

fn evaluate_statement<'a>(
    agent: &mut Agent<'a>,
    statement: &'a Statement<'a>,
) -> JsResult<Completion> {
    match statement {
        Statement::BlockStatement(block) => evaluate_block(agent, block),
        Statement::EmptyStatement(_) | Statement::DebuggerStatement(_) => {
            Ok(Completion::Normal(None))
        }
        Statement::ExpressionStatement(statement) => {
            // 1. Let exprRef be ? Evaluation of Expression.
            // 2. Return ? GetValue(exprRef).
            let value = evaluate_expression(agent, &statement.expression)?;
            Ok(Completion::Normal(Some(value)))
        }
        Statement::VariableDeclaration(decl) => {
            evaluate_variable_declaration(agent, decl)?;
            Ok(Completion::Normal(None))
        }
        // Function declarations were instantiated with their scope.
        Statement::FunctionDeclaration(_) => Ok(Completion::Normal(None)),
        Statement::IfStatement(statement) => {
            // 1. Let exprRef be ? Evaluation of Expression.
            // 2. Let exprValue be ToBoolean(? GetValue(exprRef)).
            let value = evaluate_expression(agent, &statement.test)?;
            let completion = if to_boolean(agent, value) {
                // 3. If exprValue is true, then
                //    a. Let stmtCompletion be Completion(Evaluation of the
                //       first Statement).
                evaluate_statement(agent, &statement.consequent)?
            } else if let Some(alternate) = &statement.alternate {
                // 4. Else,
                //    a. Let stmtCompletion be Completion(Evaluation of the
                //       second Statement).
                evaluate_statement(agent, alternate)?
            } else {
                // 3. If exprValue is false, then
                //    a. Return undefined.
                Completion::Normal(None)
            };
            // 5. Return ? UpdateEmpty(stmtCompletion, undefined).
            Ok(completion.update_empty(Value::Undefined))
        }
        Statement::WhileStatement(statement) => {
            // 1. Let V be undefined.
            let mut v = Value::Undefined;
            // 2. Repeat,
            loop {
                // a. Let exprRef be ? Evaluation of Expression.
                // b. Let exprValue be ? GetValue(exprRef).
                let value = evaluate_expression(agent, &statement.test)?;
                // c. If ToBoolean(exprValue) is false, return V.
                if !to_boolean(agent, value) {
                    return Ok(Completion::Normal(Some(v)));
                }
                // d. Let stmtResult be Completion(Evaluation of Statement).
                // e. If LoopContinues(stmtResult, labelSet) is false, return
                //    ? UpdateEmpty(stmtResult, V).
                // f. If stmtResult.[[Value]] is not EMPTY, set V to
                //    stmtResult.[[Value]].
                match evaluate_statement(agent, &statement.body)? {
                    Completion::Normal(value) => v = value.unwrap_or(v),
                    Completion::Continue => {}
                    Completion::Break => return Ok(Completion::Normal(Some(v))),
                    completion => return Ok(completion),
                }
            }
        }
        Statement::DoWhileStatement(statement) => {
            let mut v = Value::Undefined;
            loop {
                match evaluate_statement(agent, &statement.body)? {
                    Completion::Normal(value) => v = value.unwrap_or(v),
                    Completion::Continue => {}
                    Completion::Break => return Ok(Completion::Normal(Some(v))),
                    completion => return Ok(completion),
                }
                let value = evaluate_expression(agent, &statement.test)?;
                if !to_boolean(agent, value) {
                    return Ok(Completion::Normal(Some(v)));
                }
            }
        }
        Statement::ForStatement(statement) => evaluate_for_statement(agent, statement),
        Statement::SwitchStatement(statement) => evaluate_switch_statement(agent, statement),
        Statement::BreakStatement(statement) => {
            if statement.label.is_some() {
                return Err(throw_unsupported(agent, "Labeled statements"));
            }
            Ok(Completion::Break)
        }
        Statement::ContinueStatement(statement) => {
            if statement.label.is_some() {
                return Err(throw_unsupported(agent, "Labeled statements"));
            }
            Ok(Completion::Continue)
        }
        Statement::ReturnStatement(statement) => {
            // ReturnStatement : return ;
            // 1. Return Completion Record { [[Type]]: RETURN, [[Value]]:
            //    undefined, [[Target]]: EMPTY }.
            let Some(argument) = &statement.argument else {
                return Ok(Completion::Return(Value::Undefined));
            };
            // ReturnStatement : return Expression ;
            // 1. Let exprRef be ? Evaluation of Expression.
            // 2. Let exprValue be ? GetValue(exprRef).
            let value = evaluate_expression(agent, argument)?;
            // 4. Return Completion Record { [[Type]]: RETURN, [[Value]]:
            //    exprValue, [[Target]]: EMPTY }.
            Ok(Completion::Return(value))
        }
        Statement::ThrowStatement(statement) => {
            // 1. Let exprRef be ? Evaluation of Expression.
            // 2. Let exprValue be ? GetValue(exprRef).
            let value = evaluate_expression(agent, &statement.argument)?;
            // 3. Return ThrowCompletion(exprValue).
            Err(JsError::new(value))
        }
        Statement::TryStatement(statement) => evaluate_try_statement(agent, statement),
        Statement::LabeledStatement(_) => Err(throw_unsupported(agent, "Labeled statements")),
        Statement::ForInStatement(_) | Statement::ForOfStatement(_) => {
            Err(throw_unsupported(agent, "for-in and for-of loops"))
        }
        Statement::WithStatement(_) => Err(throw_unsupported(agent, "with statements")),
        Statement::ClassDeclaration(_) => Err(throw_unsupported(agent, "Classes")),
        _ => Err(throw_unsupported(agent, "Module and type declarations")),
    }
}

/// ### [14.3.1.2 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-let-and-const-declarations-runtime-semantics-evaluation)
/// ### [14.3.2.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-variable-statement-runtime-semantics-evaluation)
fn evaluate_variable_declaration<'a>(
    agent: &mut Agent<'a>,
    decl: &'a VariableDeclaration<'a>,
) -> JsResult<()> {
    if decl.kind.is_using() {
        return Err(throw_unsupported(agent, "using declarations"));
    }
    for declarator in &decl.declarations {
        let name = binding_identifier_name(agent, &declarator.id)?;
        let Some(init) = &declarator.init else {
            if decl.kind.is_lexical() {
                // LexicalBinding : BindingIdentifier
                // 2. Return ? InitializeReferencedBinding(lhs, undefined).
                let env = agent.current_lexical_environment();
                env.initialize_binding(agent, name, Value::Undefined);
            }
            // VariableDeclaration : BindingIdentifier
            // 1. Return EMPTY.
            continue;
        };
        if decl.kind.is_lexical() {
            // LexicalBinding : BindingIdentifier Initializer
            // 3. If IsAnonymousFunctionDefinition(Initializer) is true, then
            //    a. Let value be ? NamedEvaluation of Initializer with
            //       argument bindingId.
            // 4. Else,
            //    a. Let rhs be ? Evaluation of Initializer.
            //    b. Let value be ? GetValue(rhs).
            let value = evaluate_initializer(agent, init, name)?;
            // 5. Perform ! InitializeReferencedBinding(lhs, value).
            let env = agent.current_lexical_environment();
            env.initialize_binding(agent, name, value);
        } else {
            // VariableDeclaration : BindingIdentifier Initializer
            // 2. Let lhs be ? ResolveBinding(bindingId).
            let lhs = resolve_binding(agent, name);
            let value = evaluate_initializer(agent, init, name)?;
            // 6. Perform ? PutValue(lhs, value).
            lhs.put_value(agent, value)?;
        }
    }
    Ok(())
}

fn evaluate_initializer<'a>(
    agent: &mut Agent<'a>,
    init: &'a oxc_ast::ast::Expression<'a>,
    name: HeapString,
) -> JsResult<Value> {
    if init.is_anonymous_function_definition() {
        evaluate_named_expression(agent, init, name)
    } else {
        evaluate_expression(agent, init)
    }
}

/// ### [14.2.3 BlockDeclarationInstantiation ( code, env )](https://tc39.es/ecma262/#sec-blockdeclarationinstantiation)
///
/// Creates the bindings for the `let`, `const` and function declarations of
/// a block in `env`. Functions are initialized right away; the others stay
/// in their temporal dead zone until their declaration runs.
fn block_declaration_instantiation<'a>(
    agent: &mut Agent<'a>,
    declarations: &[LexicallyScopedDeclaration<'a>],
    env: Environment,
) -> JsResult<()> {
    // 3. For each element d of declarations, do
    for d in declarations {
        match *d {
            LexicallyScopedDeclaration::Variable(decl) => {
                // a. For each element dn of the BoundNames of d, do
                for dn in bound_names(agent, &decl.id) {
                    if decl.kind.is_const() {
                        // i. If IsConstantDeclaration of d is true, then
                        //    1. Perform ! env.CreateImmutableBinding(dn, true).
                        env.create_immutable_binding(agent, dn);
                    } else {
                        // ii. Else,
                        //     2. Perform ! env.CreateMutableBinding(dn, false).
                        env.create_mutable_binding(agent, dn);
                    }
                }
            }
            LexicallyScopedDeclaration::Function(function) => {
                // b. If d is either a FunctionDeclaration, a
                //    GeneratorDeclaration, an AsyncFunctionDeclaration, or
                //    an AsyncGeneratorDeclaration, then
                //    i. Let fn be the sole element of the BoundNames of d.
                let Some(id) = &function.id else {
                    continue;
                };
                let fn_name = agent.heap.create_string(id.name.as_str());
                //    ii. Let fo be InstantiateFunctionObject of d with
                //        arguments env and privateEnv.
                let fo = instantiate_ordinary_function_object(agent, function, env)?;
                //    iii. If env.HasBinding(fn) is false, then
                if !env.has_binding(agent, fn_name) {
                    // 1. Perform ! env.CreateMutableBinding(fn, false).
                    env.create_mutable_binding(agent, fn_name);
                }
                //    iv. Perform ! env.InitializeBinding(fn, fo).
                env.initialize_binding(
                    agent,
                    fn_name,
                    Value::Function(Function::ECMAScriptFunction(fo)),
                );
            }
        }
    }
    Ok(())
}

/// Evaluates `statements` in a fresh declarative environment when they
/// declare anything, restoring the running LexicalEnvironment afterwards.
fn evaluate_scoped_statements<'a>(
    agent: &mut Agent<'a>,
    statements: &'a [Statement<'a>],
) -> JsResult<Completion> {
    let declarations = lexically_scoped_declarations(statements);
    if declarations.is_empty() {
        return evaluate_statements(agent, statements);
    }
    // 1. Let oldEnv be the running execution context's LexicalEnvironment.
    let old_env = agent.current_lexical_environment();
    // 2. Let blockEnv be NewDeclarativeEnvironment(oldEnv).
    let block_env = Environment::Declarative(new_declarative_environment(agent, Some(old_env)));
    // 3. Perform BlockDeclarationInstantiation(StatementList, blockEnv).
    block_declaration_instantiation(agent, &declarations, block_env)?;
    // 4. Set the running execution context's LexicalEnvironment to blockEnv.
    agent.set_current_lexical_environment(block_env);
    // 5. Let blockValue be Completion(Evaluation of StatementList).
    let block_value = evaluate_statements(agent, statements);
    // 6. Set the running execution context's LexicalEnvironment to oldEnv.
    agent.set_current_lexical_environment(old_env);
    // 7. Return ? blockValue.
    block_value
}

/// ### [14.2.2 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-block-runtime-semantics-evaluation)
///
/// Block : { StatementList }
fn evaluate_block<'a>(agent: &mut Agent<'a>, block: &'a BlockStatement<'a>) -> JsResult<Completion> {
    evaluate_scoped_statements(agent, &block.body)
}

/// ### [14.7.4.2 Runtime Semantics: ForLoopEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-forloopevaluation)
fn evaluate_for_statement<'a>(
    agent: &mut Agent<'a>,
    statement: &'a ForStatement<'a>,
) -> JsResult<Completion> {
    let Some(ForStatementInit::VariableDeclaration(decl)) = &statement.init else {
        // ForStatement : for ( Expression ; Expression ; Expression ) Statement
        // 1. If the first Expression is present, then
        if let Some(init) = statement.init.as_ref().and_then(|init| init.as_expression()) {
            // a. Let exprRef be ? Evaluation of the first Expression.
            // b. Perform ? GetValue(exprRef).
            evaluate_expression(agent, init)?;
        }
        // 2. Return ? ForBodyEvaluation(the second Expression, the third
        //    Expression, Statement, « », labelSet).
        return for_body_evaluation(agent, statement, &[]);
    };
    if decl.kind.is_var() {
        // ForStatement : for ( var VariableDeclarationList ; Expression ; Expression ) Statement
        // 1. Let varDcl be Completion(Evaluation of VariableDeclarationList).
        // 2. Perform ? varDcl.
        evaluate_variable_declaration(agent, decl)?;
        // 3. Return ? ForBodyEvaluation(the first Expression, the second
        //    Expression, Statement, « », labelSet).
        return for_body_evaluation(agent, statement, &[]);
    }
    // ForStatement : for ( LexicalDeclaration Expression ; Expression ) Statement
    // 1. Let oldEnv be the running execution context's LexicalEnvironment.
    let old_env = agent.current_lexical_environment();
    // 2. Let loopEnv be NewDeclarativeEnvironment(oldEnv).
    let loop_env = Environment::Declarative(new_declarative_environment(agent, Some(old_env)));
    // 3. Let isConst be IsConstantDeclaration of LexicalDeclaration.
    let is_const = decl.kind.is_const();
    // 4. Let boundNames be the BoundNames of LexicalDeclaration.
    let mut bound = Vec::new();
    for declarator in &decl.declarations {
        bound.extend(bound_names(agent, &declarator.id));
    }
    // 5. For each element dn of boundNames, do
    for &dn in &bound {
        if is_const {
            // a. If isConst is true, then
            //    i. Perform ! loopEnv.CreateImmutableBinding(dn, true).
            loop_env.create_immutable_binding(agent, dn);
        } else {
            // b. Else,
            //    i. Perform ! loopEnv.CreateMutableBinding(dn, false).
            loop_env.create_mutable_binding(agent, dn);
        }
    }
    // 6. Set the running execution context's LexicalEnvironment to loopEnv.
    agent.set_current_lexical_environment(loop_env);
    // 7. Let forDcl be Completion(Evaluation of LexicalDeclaration).
    // 8. If forDcl is an abrupt completion, then
    //    a. Set the running execution context's LexicalEnvironment to oldEnv.
    //    b. Return ? forDcl.
    // 9. If isConst is false, let perIterationLets be boundNames; otherwise
    //    let perIterationLets be a new empty List.
    // 10. Let bodyResult be Completion(ForBodyEvaluation(the first
    //     Expression, the second Expression, Statement, perIterationLets,
    //     labelSet)).
    let per_iteration_lets: &[HeapString] = if is_const { &[] } else { &bound };
    let body_result = evaluate_variable_declaration(agent, decl)
        .and_then(|()| for_body_evaluation(agent, statement, per_iteration_lets));
    // 11. Set the running execution context's LexicalEnvironment to oldEnv.
    agent.set_current_lexical_environment(old_env);
    // 12. Return ? bodyResult.
    body_result
}

/// ### [14.7.4.3 ForBodyEvaluation ( test, increment, stmt, perIterationBindings, labelSet )](https://tc39.es/ecma262/#sec-forbodyevaluation)
fn for_body_evaluation<'a>(
    agent: &mut Agent<'a>,
    statement: &'a ForStatement<'a>,
    per_iteration_bindings: &[HeapString],
) -> JsResult<Completion> {
    // 1. Let V be undefined.
    let mut v = Value::Undefined;
    // 2. Perform ? CreatePerIterationEnvironment(perIterationBindings).
    create_per_iteration_environment(agent, per_iteration_bindings)?;
    // 3. Repeat,
    loop {
        // a. If test is not [empty], then
        if let Some(test) = &statement.test {
            // i. Let testRef be ? Evaluation of test.
            // ii. Let testValue be ? GetValue(testRef).
            let test_value = evaluate_expression(agent, test)?;
            // iii. If ToBoolean(testValue) is false, return V.
            if !to_boolean(agent, test_value) {
                return Ok(Completion::Normal(Some(v)));
            }
        }
        // b. Let result be Completion(Evaluation of stmt).
        // c. If LoopContinues(result, labelSet) is false, return ?
        //    UpdateEmpty(result, V).
        // d. If result.[[Value]] is not EMPTY, set V to result.[[Value]].
        match evaluate_statement(agent, &statement.body)? {
            Completion::Normal(value) => v = value.unwrap_or(v),
            Completion::Continue => {}
            Completion::Break => return Ok(Completion::Normal(Some(v))),
            completion => return Ok(completion),
        }
        // e. Perform ? CreatePerIterationEnvironment(perIterationBindings).
        create_per_iteration_environment(agent, per_iteration_bindings)?;
        // f. If increment is not [empty], then
        if let Some(update) = &statement.update {
            // i. Let incRef be ? Evaluation of increment.
            // ii. Perform ? GetValue(incRef).
            evaluate_expression(agent, update)?;
        }
    }
}

/// ### [14.7.4.4 CreatePerIterationEnvironment ( perIterationBindings )](https://tc39.es/ecma262/#sec-createperiterationenvironment)
///
/// Copies the loop's `let` bindings into a fresh environment so that
/// closures created in one iteration keep that iteration's values.
fn create_per_iteration_environment(
    agent: &mut Agent,
    per_iteration_bindings: &[HeapString],
) -> JsResult<()> {
    // 1. If perIterationBindings has any elements, then
    if per_iteration_bindings.is_empty() {
        // 2. Return UNUSED.
        return Ok(());
    }
    // a. Let lastIterationEnv be the running execution context's
    //    LexicalEnvironment.
    let last_iteration_env = agent.current_lexical_environment();
    // b. Let outer be lastIterationEnv.[[OuterEnv]].
    // c. Assert: outer is not null.
    let outer = last_iteration_env.get_outer_env(agent);
    // d. Let thisIterationEnv be NewDeclarativeEnvironment(outer).
    let this_iteration_env = Environment::Declarative(new_declarative_environment(agent, outer));
    // e. For each element bn of perIterationBindings, do
    for &bn in per_iteration_bindings {
        // i. Perform ! thisIterationEnv.CreateMutableBinding(bn, false).
        this_iteration_env.create_mutable_binding(agent, bn);
        // ii. Let lastValue be ? lastIterationEnv.GetBindingValue(bn, true).
        let last_value = last_iteration_env.get_binding_value(agent, bn, true)?;
        // iii. Perform ! thisIterationEnv.InitializeBinding(bn, lastValue).
        this_iteration_env.initialize_binding(agent, bn, last_value);
    }
    // f. Set the running execution context's LexicalEnvironment to
    //    thisIterationEnv.
    agent.set_current_lexical_environment(this_iteration_env);
    Ok(())
}

/// ### [14.12.4 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-switch-statement-runtime-semantics-evaluation)
///
/// The case clauses share one block scope. Cases are compared with
/// IsStrictlyEqual in source order; `default` runs when none matches and
/// falls through like any other clause.
fn evaluate_switch_statement<'a>(
    agent: &mut Agent<'a>,
    statement: &'a SwitchStatement<'a>,
) -> JsResult<Completion> {
    // 1. Let exprRef be ? Evaluation of Expression.
    // 2. Let switchValue be ? GetValue(exprRef).
    let switch_value = evaluate_expression(agent, &statement.discriminant)?;
    // 3. Let oldEnv be the running execution context's LexicalEnvironment.
    let old_env = agent.current_lexical_environment();
    // 4. Let blockEnv be NewDeclarativeEnvironment(oldEnv).
    let block_env = Environment::Declarative(new_declarative_environment(agent, Some(old_env)));
    // 5. Perform BlockDeclarationInstantiation(CaseBlock, blockEnv).
    let declarations: Vec<_> = statement
        .cases
        .iter()
        .flat_map(|case| lexically_scoped_declarations(&case.consequent))
        .collect();
    block_declaration_instantiation(agent, &declarations, block_env)?;
    // 6. Set the running execution context's LexicalEnvironment to blockEnv.
    agent.set_current_lexical_environment(block_env);
    // 7. Let R be Completion(CaseBlockEvaluation of CaseBlock with argument
    //    switchValue).
    let r = case_block_evaluation(agent, statement, switch_value);
    // 8. Set the running execution context's LexicalEnvironment to oldEnv.
    agent.set_current_lexical_environment(old_env);
    // 9. Return R.
    r
}

/// ### [14.12.2 Runtime Semantics: CaseBlockEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-caseblockevaluation)
fn case_block_evaluation<'a>(
    agent: &mut Agent<'a>,
    statement: &'a SwitchStatement<'a>,
    switch_value: Value,
) -> JsResult<Completion> {
    let mut matched = None;
    for (index, case) in statement.cases.iter().enumerate() {
        let Some(test) = &case.test else {
            continue;
        };
        let clause_selector = evaluate_expression(agent, test)?;
        if is_strictly_equal(switch_value, clause_selector) {
            matched = Some(index);
            break;
        }
    }
    let start = matched.or_else(|| statement.cases.iter().position(|case| case.is_default_case()));
    let Some(start) = start else {
        return Ok(Completion::Normal(Some(Value::Undefined)));
    };
    let mut v = Value::Undefined;
    for case in &statement.cases[start..] {
        match evaluate_statements(agent, &case.consequent)? {
            Completion::Normal(value) => v = value.unwrap_or(v),
            Completion::Break => break,
            completion => return Ok(completion.update_empty(v)),
        }
    }
    Ok(Completion::Normal(Some(v)))
}

/// ### [14.15.3 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-try-statement-runtime-semantics-evaluation)
fn evaluate_try_statement<'a>(
    agent: &mut Agent<'a>,
    statement: &'a TryStatement<'a>,
) -> JsResult<Completion> {
    // 1. Let B be Completion(Evaluation of Block).
    let b = evaluate_block(agent, &statement.block);
    // TryStatement : try Block Catch
    // 2. If B is a throw completion, let C be Completion(CatchClauseEvaluation
    //    of Catch with argument B.[[Value]]).
    // 3. Else, let C be B.
    let c = match (b, &statement.handler) {
        (Err(thrown), Some(handler)) => catch_clause_evaluation(agent, handler, thrown.value()),
        (b, _) => b,
    };
    // TryStatement : try Block Finally
    // 2. Let F be Completion(Evaluation of Finally).
    if let Some(finalizer) = &statement.finalizer {
        // 3. If F is a normal completion, set F to B.
        // 4. Return ? UpdateEmpty(F, undefined).
        let f = evaluate_block(agent, finalizer)?;
        if !matches!(f, Completion::Normal(_)) {
            return Ok(f.update_empty(Value::Undefined));
        }
    }
    // 4. Return ? UpdateEmpty(C, undefined).
    c.map(|c| c.update_empty(Value::Undefined))
}

/// ### [14.15.2 Runtime Semantics: CatchClauseEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-catchclauseevaluation)
fn catch_clause_evaluation<'a>(
    agent: &mut Agent<'a>,
    handler: &'a CatchClause<'a>,
    thrown_value: Value,
) -> JsResult<Completion> {
    // Catch : catch Block
    // 1. Return ? Evaluation of Block.
    let Some(param) = &handler.param else {
        return evaluate_block(agent, &handler.body);
    };
    // Catch : catch ( CatchParameter ) Block
    // 1. Let oldEnv be the running execution context's LexicalEnvironment.
    let old_env = agent.current_lexical_environment();
    // 2. Let catchEnv be NewDeclarativeEnvironment(oldEnv).
    let catch_env = Environment::Declarative(new_declarative_environment(agent, Some(old_env)));
    // 3. For each element argName of the BoundNames of CatchParameter, do
    //    a. Perform ! catchEnv.CreateMutableBinding(argName, false).
    let arg_name = binding_identifier_name(agent, &param.pattern)?;
    catch_env.create_mutable_binding(agent, arg_name);
    // 4. Set the running execution context's LexicalEnvironment to catchEnv.
    agent.set_current_lexical_environment(catch_env);
    // 5. Let status be Completion(BindingInitialization of CatchParameter
    //    with arguments thrownValue and catchEnv).
    catch_env.initialize_binding(agent, arg_name, thrown_value);
    // 7. Let B be Completion(Evaluation of Block).
    let b = evaluate_block(agent, &handler.body);
    // 8. Set the running execution context's LexicalEnvironment to oldEnv.
    agent.set_current_lexical_environment(old_env);
    // 9. Return ? B.
    b
}

#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;

    use crate::ecmascript::{
        execution::{Agent, AgentOptions, DefaultHostHooks},
        scripts_and_modules::script::{ScriptOptions, parse_script},
        types::Value,
    };

    fn eval(source: &'static str) -> Value {
        let allocator = Box::leak(Box::new(Allocator::default()));
        let script = parse_script(allocator, source, ScriptOptions::default())
            .unwrap_or_else(|errors| panic!("{errors:?}"));
        let script = Box::leak(Box::new(script));
        let mut agent = Agent::new(AgentOptions::default(), &DefaultHostHooks);
        agent
            .run_script(script)
            .unwrap_or_else(|err| panic!("{}", err.to_string(&mut agent)))
    }

    #[test]
    fn completion_value_of_loops() {
        assert_eq!(eval("let i = 0; while (i < 3) { i++; }"), Value::Number(2.0));
        assert_eq!(eval("for (;;) { break; }"), Value::Undefined);
        assert_eq!(eval("do { 7; } while (false)"), Value::Number(7.0));
    }

    #[test]
    fn break_and_continue() {
        let source = "
            let total = 0;
            for (let i = 0; i < 10; i++) {
                if (i % 2) continue;
                if (i > 6) break;
                total += i;
            }
            total";
        assert_eq!(eval(source), Value::Number(12.0));
    }

    #[test]
    fn for_let_gets_a_binding_per_iteration() {
        let source = "
            var fns = [];
            for (let i = 0; i < 3; i++) {
                fns.push(() => i);
            }
            fns[0]() + fns[1]() * 10 + fns[2]() * 100";
        assert_eq!(eval(source), Value::Number(210.0));
    }

    #[test]
    fn block_scopes_are_restored_after_throw() {
        let source = "
            let x = 'outer';
            try {
                let x = 'inner';
                throw x;
            } catch (e) {
                x + ' ' + e
            }";
        let mut agent = Agent::new(AgentOptions::default(), &DefaultHostHooks);
        let allocator = Box::leak(Box::new(Allocator::default()));
        let script = Box::leak(Box::new(
            parse_script(allocator, source, ScriptOptions::default()).unwrap(),
        ));
        let result = agent.run_script(script).unwrap();
        assert_eq!(result.as_str(&agent), Some("outer inner"));
    }

    #[test]
    fn finally_overrides_and_runs() {
        assert_eq!(
            eval("var log = 0; try { log = 1; } finally { log += 10; } log"),
            Value::Number(11.0)
        );
        assert_eq!(
            eval("function f() { try { return 1; } finally { return 2; } } f()"),
            Value::Number(2.0)
        );
    }

    #[test]
    fn switch_falls_through_until_break() {
        let source = "
            function classify(n) {
                let out = '';
                switch (n) {
                    case 1: out += 'one ';
                    case 2: out += 'two'; break;
                    default: out = 'many';
                }
                return out;
            }
            classify(1) + '|' + classify(2) + '|' + classify(9)";
        let mut agent = Agent::new(AgentOptions::default(), &DefaultHostHooks);
        let allocator = Box::leak(Box::new(Allocator::default()));
        let script = Box::leak(Box::new(
            parse_script(allocator, source, ScriptOptions::default()).unwrap(),
        ));
        let result = agent.run_script(script).unwrap();
        assert_eq!(result.as_str(&agent), Some("one two|two|many"));
    }

    #[test]
    fn const_reassignment_throws() {
        let mut agent = Agent::new(AgentOptions::default(), &DefaultHostHooks);
        let allocator = Box::leak(Box::new(Allocator::default()));
        let script = Box::leak(Box::new(
            parse_script(allocator, "const c = 1; c = 2;", ScriptOptions::default()).unwrap(),
        ));
        let err = agent.run_script(script).unwrap_err();
        assert_eq!(
            err.to_string(&mut agent),
            "TypeError: Assignment to constant variable."
        );
    }
}
