// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [8.2 Scope Analysis](https://tc39.es/ecma262/#sec-syntax-directed-operations-scope-analysis)
//!
//! Collects the declarations that a script, function body or block
//! instantiates before its statements run. Nested functions are opaque: their
//! declarations belong to their own scope.

use oxc_ast::ast::{ForStatementInit, Function, Statement, VariableDeclarator};

/// A declaration instantiated in the VariableEnvironment of a scope.
#[derive(Debug, Clone, Copy)]
pub(crate) enum VarScopedDeclaration<'a> {
    Variable(&'a VariableDeclarator<'a>),
    Function(&'a Function<'a>),
}

/// A declaration instantiated in the LexicalEnvironment of a scope.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LexicallyScopedDeclaration<'a> {
    /// A `let` or `const` declarator; its `kind` tells which.
    Variable(&'a VariableDeclarator<'a>),
    /// A function declaration nested in a block.
    Function(&'a Function<'a>),
}

/// ### [8.2.9 Static Semantics: TopLevelVarScopedDeclarations](https://tc39.es/ecma262/#sec-static-semantics-toplevelvarscopeddeclarations)
///
/// The VarScopedDeclarations of a script or function body: every `var`
/// declarator, wherever it is nested, plus the function declarations that
/// appear directly in the statement list.
pub(crate) fn top_level_var_scoped_declarations<'a>(
    statements: &'a [Statement<'a>],
) -> Vec<VarScopedDeclaration<'a>> {
    let mut declarations = Vec::new();
    for statement in statements {
        // At the top level of a function, or script, function declarations
        // are treated like var declarations rather than like lexical
        // declarations.
        if let Statement::FunctionDeclaration(function) = statement {
            declarations.push(VarScopedDeclaration::Function(function));
        } else {
            var_scoped_declarations(statement, &mut |declarator| {
                declarations.push(VarScopedDeclaration::Variable(declarator));
            });
        }
    }
    declarations
}

/// ### [8.2.7 Static Semantics: VarScopedDeclarations](https://tc39.es/ecma262/#sec-static-semantics-varscopeddeclarations)
///
/// Reports every `var` declarator in `statement` without descending into
/// nested functions.
pub(crate) fn var_scoped_declarations<'a, F: FnMut(&'a VariableDeclarator<'a>)>(
    statement: &'a Statement<'a>,
    f: &mut F,
) {
    match statement {
        Statement::VariableDeclaration(decl) => {
            if decl.kind.is_var() {
                decl.declarations.iter().for_each(&mut *f);
            }
        }
        Statement::BlockStatement(block) => {
            for statement in &block.body {
                var_scoped_declarations(statement, f);
            }
        }
        Statement::IfStatement(st) => {
            var_scoped_declarations(&st.consequent, f);
            if let Some(alternate) = &st.alternate {
                var_scoped_declarations(alternate, f);
            }
        }
        Statement::DoWhileStatement(st) => var_scoped_declarations(&st.body, f),
        Statement::WhileStatement(st) => var_scoped_declarations(&st.body, f),
        Statement::ForStatement(st) => {
            if let Some(ForStatementInit::VariableDeclaration(decl)) = &st.init {
                if decl.kind.is_var() {
                    decl.declarations.iter().for_each(&mut *f);
                }
            }
            var_scoped_declarations(&st.body, f);
        }
        Statement::TryStatement(st) => {
            for statement in &st.block.body {
                var_scoped_declarations(statement, f);
            }
            if let Some(handler) = &st.handler {
                for statement in &handler.body.body {
                    var_scoped_declarations(statement, f);
                }
            }
            if let Some(finalizer) = &st.finalizer {
                for statement in &finalizer.body {
                    var_scoped_declarations(statement, f);
                }
            }
        }
        Statement::LabeledStatement(st) => var_scoped_declarations(&st.body, f),
        _ => {}
    }
}

/// ### [8.2.10 Static Semantics: TopLevelLexicallyScopedDeclarations](https://tc39.es/ecma262/#sec-static-semantics-toplevellexicallyscopeddeclarations)
///
/// The `let` and `const` declarators directly in a script or function body.
pub(crate) fn top_level_lexically_scoped_declarations<'a>(
    statements: &'a [Statement<'a>],
) -> Vec<LexicallyScopedDeclaration<'a>> {
    let mut declarations = Vec::new();
    for statement in statements {
        if let Statement::VariableDeclaration(decl) = statement {
            if decl.kind.is_lexical() {
                declarations.extend(
                    decl.declarations
                        .iter()
                        .map(LexicallyScopedDeclaration::Variable),
                );
            }
        }
    }
    declarations
}

/// ### [8.2.6 Static Semantics: LexicallyScopedDeclarations](https://tc39.es/ecma262/#sec-static-semantics-lexicallyscopeddeclarations)
///
/// The declarations a Block instantiates on entry: `let`, `const` and
/// function declarations.
pub(crate) fn lexically_scoped_declarations<'a>(
    statements: &'a [Statement<'a>],
) -> Vec<LexicallyScopedDeclaration<'a>> {
    let mut declarations = top_level_lexically_scoped_declarations(statements);
    for statement in statements {
        if let Statement::FunctionDeclaration(function) = statement {
            declarations.push(LexicallyScopedDeclaration::Function(function));
        }
    }
    declarations
}

#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;
    use oxc_ast::ast::BindingIdentifier;
    use oxc_ecmascript::BoundNames;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    use super::*;

    fn var_names(source: &str) -> Vec<String> {
        let allocator = Allocator::default();
        let program = Parser::new(&allocator, source, SourceType::default().with_script(true))
            .parse()
            .program;
        let mut names = Vec::new();
        let mut push = |identifier: &BindingIdentifier| names.push(identifier.name.to_string());
        for declaration in top_level_var_scoped_declarations(&program.body) {
            match declaration {
                VarScopedDeclaration::Variable(declarator) => declarator.id.bound_names(&mut push),
                VarScopedDeclaration::Function(function) => function.bound_names(&mut push),
            }
        }
        names
    }

    #[test]
    fn var_declarations_are_hoisted_out_of_blocks() {
        let names = var_names(
            "var a = 1;
            if (a) { var b; } else { let c; }
            for (var i = 0; i < 1; i++) { var d; }
            try { var e; } catch (err) { var f; } finally { var g; }
            function h() { var nested; }",
        );
        assert_eq!(names, ["a", "b", "i", "d", "e", "f", "g", "h"]);
    }

    #[test]
    fn block_functions_are_lexical() {
        let allocator = Allocator::default();
        let program = Parser::new(
            &allocator,
            "let a; const b = 1; var c; function d() {}",
            SourceType::default().with_script(true),
        )
        .parse()
        .program;
        assert_eq!(top_level_lexically_scoped_declarations(&program.body).len(), 2);
        assert_eq!(lexically_scoped_declarations(&program.body).len(), 3);
    }
}
