// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::AHashSet;
use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_diagnostics::OxcDiagnostic;
use oxc_ecmascript::BoundNames;
use oxc_parser::{Parser, ParserReturn};
use oxc_semantic::{SemanticBuilder, SemanticBuilderReturn};
use oxc_span::SourceType;

use crate::{
    ecmascript::{
        execution::{
            Agent, ECMAScriptCode, Environment, ExecutionContext, GlobalEnvironment, JsError,
            JsResult, agent::ExceptionType,
        },
        syntax_directed_operations::{
            function_definitions::instantiate_ordinary_function_object,
            scope_analysis::{
                LexicallyScopedDeclaration, VarScopedDeclaration,
                top_level_lexically_scoped_declarations, top_level_var_scoped_declarations,
            },
        },
        types::{Function, Value},
    },
    engine::evaluation::evaluate_statement_list,
    heap::HeapString,
};

/// ### [16.1.4 Script Records](https://tc39.es/ecma262/#sec-script-records)
///
/// A Script Record encapsulates information about a script being evaluated.
/// The parsed program lives in the allocator it was parsed into; functions
/// created while evaluating the script point into it.
#[derive(Debug)]
pub struct Script<'a> {
    /// ### \[\[ECMAScriptCode]]
    ///
    /// The result of parsing the source text of this script.
    pub(crate) ecmascript_code: Program<'a>,

    /// Whether the script is strict mode code, either because of a
    /// `"use strict"` directive or because the host asked for it.
    pub(crate) strict: bool,
}

impl<'a> Script<'a> {
    /// The parsed program.
    pub fn program(&self) -> &Program<'a> {
        &self.ecmascript_code
    }

    pub fn source_text(&self) -> &'a str {
        self.ecmascript_code.source_text
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

/// Host-provided parsing options.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptOptions {
    /// Evaluate the script as strict mode code even without a directive.
    pub strict: bool,
}

pub type ScriptOrErrors<'a> = Result<Script<'a>, Vec<OxcDiagnostic>>;

/// ### [16.1.5 ParseScript ( sourceText, realm, hostDefined )](https://tc39.es/ecma262/#sec-parse-script)
///
/// The abstract operation ParseScript takes argument sourceText (ECMAScript
/// source text) and returns a Script Record or a non-empty List of
/// SyntaxError diagnostics. Early errors found by semantic analysis are
/// reported the same way as parse errors.
pub fn parse_script<'a>(
    allocator: &'a Allocator,
    source_text: &'a str,
    options: ScriptOptions,
) -> ScriptOrErrors<'a> {
    // 1. Let script be ParseText(sourceText, Script).
    let parser = Parser::new(
        allocator,
        source_text,
        SourceType::default().with_script(true),
    );
    let ParserReturn {
        errors, program, ..
    } = parser.parse();

    // 2. If script is a List of errors, return script.
    if !errors.is_empty() {
        return Err(errors);
    }

    let SemanticBuilderReturn { errors, .. } = SemanticBuilder::new()
        .with_check_syntax_error(true)
        .build(&program);
    if !errors.is_empty() {
        return Err(errors);
    }

    let strict = options.strict || program.has_use_strict_directive();
    // 3. Return Script Record { [[ECMAScriptCode]]: script, ... }.
    Ok(Script {
        ecmascript_code: program,
        strict,
    })
}

/// ### [16.1.6 ScriptEvaluation ( scriptRecord )](https://tc39.es/ecma262/#sec-runtime-semantics-scriptevaluation)
///
/// The abstract operation ScriptEvaluation takes argument scriptRecord (a
/// Script Record) and returns either a normal completion containing an
/// ECMAScript language value or an abrupt completion.
pub(crate) fn script_evaluation<'a>(
    agent: &mut Agent<'a>,
    script: &'a Script<'a>,
) -> JsResult<Value> {
    // 1. Let globalEnv be scriptRecord.[[Realm]].[[GlobalEnv]].
    let global_env = agent.global_env();

    // 2. Let scriptContext be a new ECMAScript code execution context.
    let script_context = ExecutionContext {
        // 3. Set the Function of scriptContext to null.
        function: None,
        ecmascript_code: Some(ECMAScriptCode {
            // 6. Set the VariableEnvironment of scriptContext to globalEnv.
            variable_environment: Environment::Global(global_env),
            // 7. Set the LexicalEnvironment of scriptContext to globalEnv.
            lexical_environment: Environment::Global(global_env),
            is_strict_mode: script.strict,
            source_code: script.source_text(),
        }),
    };

    // 10. Push scriptContext onto the execution context stack; scriptContext
    //     is now the running execution context.
    agent.push_execution_context(script_context)?;

    // 12. Let result be Completion(GlobalDeclarationInstantiation(script, globalEnv)).
    let result = global_declaration_instantiation(agent, script, global_env).and_then(|()| {
        // 13. If result is a normal completion, then
        //     a. Set result to Completion(Evaluation of script).
        //     b. If result is a normal completion and result.[[Value]] is
        //        EMPTY, then
        //        i. Set result to NormalCompletion(undefined).
        evaluate_statement_list(agent, &script.ecmascript_code.body)
            .map(|value| value.unwrap_or(Value::Undefined))
    });

    // 14. Suspend scriptContext and remove it from the execution context stack.
    agent.execution_context_stack.pop();

    // 17. Return ? result.
    result
}

/// The sole element of the BoundNames of a declaration.
pub(crate) fn bound_name<'b>(agent: &mut Agent, d: &impl BoundNames<'b>) -> HeapString {
    let mut name = None;
    d.bound_names(&mut |identifier| {
        name.get_or_insert(identifier.name);
    });
    let name = name.map_or("", |name| name.as_str());
    agent.heap.create_string(name)
}

pub(crate) fn bound_names<'b>(agent: &mut Agent, d: &impl BoundNames<'b>) -> Vec<HeapString> {
    let mut names = Vec::new();
    d.bound_names(&mut |identifier| names.push(identifier.name));
    names
        .into_iter()
        .map(|name| agent.heap.create_string(name.as_str()))
        .collect()
}

fn already_declared(agent: &mut Agent, name: HeapString) -> JsError {
    let message = format!(
        "Identifier '{}' has already been declared",
        name.as_str(agent)
    );
    agent.throw_exception(ExceptionType::SyntaxError, message)
}

/// ### [16.1.7 GlobalDeclarationInstantiation ( script, env )](https://tc39.es/ecma262/#sec-globaldeclarationinstantiation)
///
/// The abstract operation GlobalDeclarationInstantiation takes arguments
/// script (a Script Parse Node) and env (a Global Environment Record) and
/// returns either a normal completion containing UNUSED or a throw completion.
/// Bindings left behind by earlier scripts in the same realm are visible, so
/// a second top-level `let x` is an error just like a duplicate in one
/// script.
pub(crate) fn global_declaration_instantiation<'a>(
    agent: &mut Agent<'a>,
    script: &'a Script<'a>,
    env: GlobalEnvironment,
) -> JsResult<()> {
    let body = &script.ecmascript_code.body;
    // 5. Let varDeclarations be the VarScopedDeclarations of script.
    let var_declarations = top_level_var_scoped_declarations(body);
    // 13. Let lexDeclarations be the LexicallyScopedDeclarations of script.
    let lex_declarations = top_level_lexically_scoped_declarations(body);

    // 1. Let lexNames be the LexicallyDeclaredNames of script.
    let mut lex_names = Vec::new();
    for d in &lex_declarations {
        if let LexicallyScopedDeclaration::Variable(decl) = d {
            lex_names.extend(bound_names(agent, &decl.id));
        }
    }
    // 2. Let varNames be the VarDeclaredNames of script.
    let mut var_names = Vec::new();
    for d in &var_declarations {
        match d {
            VarScopedDeclaration::Variable(decl) => var_names.extend(bound_names(agent, &decl.id)),
            VarScopedDeclaration::Function(function) => {
                var_names.push(bound_name(agent, *function))
            }
        }
    }

    // 3. For each element name of lexNames, do
    for &name in &lex_names {
        // a. If env.HasVarDeclaration(name) is true, throw a SyntaxError exception.
        // b. If env.HasLexicalDeclaration(name) is true, throw a SyntaxError exception.
        if env.has_var_declaration(agent, name) || env.has_lexical_declaration(agent, name) {
            return Err(already_declared(agent, name));
        }
    }
    // 4. For each element name of varNames, do
    for &name in &var_names {
        // a. If env.HasLexicalDeclaration(name) is true, throw a SyntaxError exception.
        if env.has_lexical_declaration(agent, name) {
            return Err(already_declared(agent, name));
        }
    }

    // 6. Let functionsToInitialize be a new empty List.
    let mut functions_to_initialize = Vec::new();
    // 7. Let declaredFunctionNames be a new empty List.
    let mut declared_function_names = AHashSet::new();
    // 8. For each element d of varDeclarations, in reverse List order, do
    for d in var_declarations.iter().rev() {
        if let VarScopedDeclaration::Function(function) = *d {
            // ii. NOTE: If there are multiple function declarations for the
            //     same name, the last declaration is used.
            // iii. Let fn be the sole element of the BoundNames of d.
            let function_name = bound_name(agent, function);
            // iv. If declaredFunctionNames does not contain fn, then
            if declared_function_names.insert(function_name) {
                // 4. Insert d as the first element of functionsToInitialize.
                functions_to_initialize.push((function_name, function));
            }
        }
    }
    functions_to_initialize.reverse();

    // 9. Let declaredVarNames be a new empty List.
    let mut declared_var_names = Vec::new();
    // 10. For each element d of varDeclarations, do
    for d in &var_declarations {
        if let VarScopedDeclaration::Variable(decl) = d {
            // i. For each String vn of the BoundNames of d, do
            for vn in bound_names(agent, &decl.id) {
                // 1. If declaredFunctionNames does not contain vn, then
                if !declared_function_names.contains(&vn) && !declared_var_names.contains(&vn) {
                    declared_var_names.push(vn);
                }
            }
        }
    }

    // 15. For each element d of lexDeclarations, do
    for d in lex_declarations {
        // a. NOTE: Lexically declared names are only instantiated here but
        //    not initialized.
        let LexicallyScopedDeclaration::Variable(decl) = d else {
            continue;
        };
        // b. For each element dn of the BoundNames of d, do
        for dn in bound_names(agent, &decl.id) {
            if decl.kind.is_const() {
                // i. If IsConstantDeclaration of d is true, then
                // 1. Perform ? env.CreateImmutableBinding(dn, true).
                Environment::Global(env).create_immutable_binding(agent, dn);
            } else {
                // ii. Else,
                // 1. Perform ? env.CreateMutableBinding(dn, false).
                Environment::Global(env).create_mutable_binding(agent, dn);
            }
        }
    }

    // 16. For each Parse Node f of functionsToInitialize, do
    for (function_name, f) in functions_to_initialize {
        // b. Let fo be InstantiateFunctionObject of f with arguments env and privateEnv.
        let fo = instantiate_ordinary_function_object(agent, f, Environment::Global(env))?;
        // c. Perform ? env.CreateGlobalFunctionBinding(fn, fo, false).
        env.create_global_function_binding(
            agent,
            function_name,
            Value::Function(Function::ECMAScriptFunction(fo)),
        );
    }

    // 17. For each String vn of declaredVarNames, do
    for vn in declared_var_names {
        // a. Perform ? env.CreateGlobalVarBinding(vn, false).
        env.create_global_var_binding(agent, vn);
    }
    // 18. Return UNUSED.
    Ok(())
}

#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;

    use super::*;
    use crate::ecmascript::execution::{AgentOptions, DefaultHostHooks};

    fn run(agent: &mut Agent<'static>, source: &'static str) -> JsResult<Value> {
        let allocator: &'static Allocator = Box::leak(Box::new(Allocator::default()));
        let script: &'static Script<'static> = Box::leak(Box::new(
            parse_script(allocator, source, ScriptOptions::default()).unwrap(),
        ));
        script_evaluation(agent, script)
    }

    #[test]
    fn empty_script() {
        let mut agent = Agent::new(AgentOptions::default(), &DefaultHostHooks);
        assert_eq!(run(&mut agent, "").unwrap(), Value::Undefined);
    }

    #[test]
    fn completion_value_of_last_statement() {
        let mut agent = Agent::new(AgentOptions::default(), &DefaultHostHooks);
        assert_eq!(run(&mut agent, "1 + 2;").unwrap(), Value::Number(3.0));
        assert_eq!(run(&mut agent, "var x = 4; x * 2").unwrap(), Value::Number(8.0));
    }

    #[test]
    fn parse_errors_are_reported() {
        let allocator = Allocator::default();
        assert!(parse_script(&allocator, "var = ;", ScriptOptions::default()).is_err());
        // Early error found by semantic analysis.
        assert!(parse_script(&allocator, "let a; let a;", ScriptOptions::default()).is_err());
    }

    #[test]
    fn use_strict_directive_makes_script_strict() {
        let allocator = Allocator::default();
        let script = parse_script(&allocator, "'use strict'; 1", ScriptOptions::default()).unwrap();
        assert!(script.is_strict());
        let script = parse_script(&allocator, "1", ScriptOptions { strict: true }).unwrap();
        assert!(script.is_strict());
        let script = parse_script(&allocator, "1", ScriptOptions::default()).unwrap();
        assert!(!script.is_strict());
    }

    #[test]
    fn lexical_declarations() {
        let mut agent = Agent::new(AgentOptions::default(), &DefaultHostHooks);
        run(&mut agent, "let i = 0; const a = 'foo'; i = 3;").unwrap();
        assert_eq!(agent.get_global("i").unwrap(), Value::Number(3.0));
        let a = agent.get_global("a").unwrap();
        assert_eq!(a.as_str(&agent), Some("foo"));
        // Lexical bindings do not become properties of the global object.
        let global = agent.global_object();
        assert_eq!(agent.get_property(global.into(), "i").unwrap(), Value::Undefined);
    }

    #[test]
    fn lexical_declarations_in_block() {
        let mut agent = Agent::new(AgentOptions::default(), &DefaultHostHooks);
        run(&mut agent, "{ let i = 0; const a = 'foo'; i = 3; }").unwrap();
        let i = agent.heap.create_string("i");
        assert!(!agent.global_env().has_lexical_declaration(&agent, i));
    }

    #[test]
    fn functions_are_hoisted() {
        let mut agent = Agent::new(AgentOptions::default(), &DefaultHostHooks);
        let result = run(&mut agent, "var r = f(); function f() { return 7; } r").unwrap();
        assert_eq!(result, Value::Number(7.0));
    }

    #[test]
    fn redeclaration_across_scripts_is_a_syntax_error() {
        let mut agent = Agent::new(AgentOptions::default(), &DefaultHostHooks);
        run(&mut agent, "let x = 1;").unwrap();
        let error = run(&mut agent, "var x = 2;").unwrap_err();
        assert_eq!(
            error.to_string(&mut agent),
            "SyntaxError: Identifier 'x' has already been declared"
        );
        run(&mut agent, "var y = 1;").unwrap();
        assert!(run(&mut agent, "let y = 2;").is_err());
    }
}
