// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [13 ECMAScript Language: Expressions](https://tc39.es/ecma262/#sec-ecmascript-language-expressions)

use oxc_ast::ast::{
    Argument, ArrayExpression, ArrayExpressionElement, AssignmentExpression, CallExpression,
    Expression, MemberExpression, NewExpression, ObjectExpression, ObjectPropertyKind,
    PropertyKind, SimpleAssignmentTarget, TemplateLiteral, UnaryExpression, UpdateExpression,
};
use oxc_span::{GetSpan, Span};
use oxc_syntax::operator::{BinaryOperator, LogicalOperator, UnaryOperator, UpdateOperator};

use super::{STACK_GROW_SIZE, STACK_RED_ZONE, throw_unsupported};
use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_objects::{
                call, construct, delete_property, get_v, has_property, ordinary_has_instance,
                set_v,
            },
            testing_and_comparison::{
                is_callable, is_constructor, is_less_than, is_loosely_equal, is_strictly_equal,
            },
            type_conversion::{
                to_boolean, to_int32, to_number, to_primitive, to_string, to_uint32,
            },
        },
        builtins::CallSite,
        execution::{
            Agent, Environment, ExceptionType, JsResult,
            environments::{get_identifier_reference, resolve_this_binding, throw_not_defined},
        },
        syntax_directed_operations::function_definitions::{
            instantiate_arrow_function_expression, instantiate_ordinary_function_expression,
        },
        types::{Function, Object, PropertyKey, Value},
    },
    heap::{HeapString, OrdinaryObject},
};

/// ### [6.2.5 The Reference Record Specification Type](https://tc39.es/ecma262/#sec-reference-record-specification-type)
///
/// The resolved target of an assignment or update: a binding in an
/// environment or a property of a base value.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Reference {
    /// A binding reference; `env` is `None` when the name is unresolvable.
    Binding {
        env: Option<Environment>,
        name: HeapString,
        strict: bool,
    },
    Property {
        base: Value,
        key: PropertyKey,
        strict: bool,
    },
}

impl Reference {
    /// ### [6.2.5.5 GetValue ( V )](https://tc39.es/ecma262/#sec-getvalue)
    pub(crate) fn get_value(self, agent: &mut Agent) -> JsResult<Value> {
        match self {
            // 3. If IsUnresolvableReference(V) is true, throw a
            //    ReferenceError exception.
            Reference::Binding { env: None, name, .. } => Err(throw_not_defined(agent, name)),
            // 5. Else,
            //    b. Return ? base.GetBindingValue(V.[[ReferencedName]], V.[[Strict]]).
            Reference::Binding {
                env: Some(env),
                name,
                strict,
            } => env.get_binding_value(agent, name, strict),
            // 4. If IsPropertyReference(V) is true, then
            //    a. Let baseObj be ? ToObject(V.[[Base]]).
            //    c. Return ? baseObj.[[Get]](V.[[ReferencedName]], GetThisValue(V)).
            Reference::Property { base, key, .. } => get_v(agent, base, key),
        }
    }

    /// ### [6.2.5.6 PutValue ( V, W )](https://tc39.es/ecma262/#sec-putvalue)
    pub(crate) fn put_value(self, agent: &mut Agent, value: Value) -> JsResult<()> {
        match self {
            // 3. If IsUnresolvableReference(V) is true, then
            Reference::Binding {
                env: None,
                name,
                strict,
            } => {
                // a. If V.[[Strict]] is true, throw a ReferenceError exception.
                if strict {
                    return Err(throw_not_defined(agent, name));
                }
                // b. Let globalObj be GetGlobalObject().
                // c. Perform ? Set(globalObj, V.[[ReferencedName]], W, false).
                let global = agent.global_object();
                agent[global].set_own(PropertyKey::String(name), value);
                Ok(())
            }
            // 5. Else,
            //    c. Return ? base.SetMutableBinding(V.[[ReferencedName]], W, V.[[Strict]]).
            Reference::Binding {
                env: Some(env),
                name,
                strict,
            } => env.set_mutable_binding(agent, name, value, strict),
            // 4. If IsPropertyReference(V) is true, then
            //    b. Let succeeded be ? baseObj.[[Set]](V.[[ReferencedName]], W, GetThisValue(V)).
            //    c. If succeeded is false and V.[[Strict]] is true, throw a
            //       TypeError exception.
            Reference::Property { base, key, strict } => set_v(agent, base, key, value, strict),
        }
    }
}

/// ### [9.4.2 ResolveBinding ( name \[ , env \] )](https://tc39.es/ecma262/#sec-resolvebinding)
pub(crate) fn resolve_binding(agent: &Agent, name: HeapString) -> Reference {
    // 1. If env is not present or env is undefined, then
    //    a. Set env to the running execution context's LexicalEnvironment.
    let env = agent.current_lexical_environment();
    // 3. If the source text matched by the syntactic production that is
    //    being evaluated is contained in strict mode code, let strict be
    //    true; else let strict be false.
    let strict = agent.is_strict_mode();
    // 4. Return ? GetIdentifierReference(env, name, strict).
    Reference::Binding {
        env: get_identifier_reference(agent, env, name),
        name,
        strict,
    }
}

/// The source text of a syntax node of the running code, for messages.
fn source_text<'a>(agent: &Agent<'a>, span: Span) -> &'a str {
    agent
        .current_source_code()
        .get(span.start as usize..span.end as usize)
        .unwrap_or_default()
}

/// Evaluates an expression to a value: Evaluation followed by GetValue.
pub(crate) fn evaluate_expression<'a>(
    agent: &mut Agent<'a>,
    expression: &'a Expression<'a>,
) -> JsResult<Value> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
        evaluate_expression_value(agent, expression)
    })
}

fn evaluate_expression_value<'a>(
    agent: &mut Agent<'a>,
    expression: &'a Expression<'a>,
) -> JsResult<Value> {
    match expression {
        Expression::BooleanLiteral(literal) => Ok(Value::Boolean(literal.value)),
        Expression::NullLiteral(_) => Ok(Value::Null),
        Expression::NumericLiteral(literal) => Ok(Value::Number(literal.value)),
        Expression::StringLiteral(literal) => {
            Ok(Value::String(agent.heap.create_string(literal.value.as_str())))
        }
        Expression::TemplateLiteral(template) => evaluate_template_literal(agent, template),
        Expression::Identifier(identifier) => {
            let name = agent.heap.create_string(identifier.name.as_str());
            resolve_binding(agent, name).get_value(agent)
        }
        Expression::ThisExpression(_) => {
            // 1. Return ? ResolveThisBinding().
            let this_value = resolve_this_binding(agent)?;
            if agent.options().print_internals {
                eprintln!("Resolved this to {}", this_value.string_repr(agent));
            }
            Ok(this_value)
        }
        Expression::ArrayExpression(array) => evaluate_array_expression(agent, array),
        Expression::ObjectExpression(object) => evaluate_object_expression(agent, object),
        Expression::FunctionExpression(function) => {
            let closure = instantiate_ordinary_function_expression(agent, function, None)?;
            Ok(Function::ECMAScriptFunction(closure).into())
        }
        Expression::ArrowFunctionExpression(arrow) => {
            let closure = instantiate_arrow_function_expression(agent, arrow, None)?;
            Ok(Function::ECMAScriptFunction(closure).into())
        }
        Expression::ParenthesizedExpression(parenthesized) => {
            evaluate_expression(agent, &parenthesized.expression)
        }
        Expression::SequenceExpression(sequence) => {
            let mut value = Value::Undefined;
            for expression in &sequence.expressions {
                value = evaluate_expression(agent, expression)?;
            }
            Ok(value)
        }
        Expression::ConditionalExpression(conditional) => {
            // 1. Let lref be ? Evaluation of ShortCircuitExpression.
            // 2. Let lval be ToBoolean(? GetValue(lref)).
            let lval = evaluate_expression(agent, &conditional.test)?;
            if to_boolean(agent, lval) {
                // 3. If lval is true, then
                //    a. Let trueRef be ? Evaluation of the first AssignmentExpression.
                evaluate_expression(agent, &conditional.consequent)
            } else {
                // 4. Else,
                //    a. Let falseRef be ? Evaluation of the second AssignmentExpression.
                evaluate_expression(agent, &conditional.alternate)
            }
        }
        Expression::LogicalExpression(logical) => {
            let lval = evaluate_expression(agent, &logical.left)?;
            let short_circuits = match logical.operator {
                LogicalOperator::And => !to_boolean(agent, lval),
                LogicalOperator::Or => to_boolean(agent, lval),
                LogicalOperator::Coalesce => !lval.is_nullish(),
            };
            if short_circuits {
                Ok(lval)
            } else {
                evaluate_expression(agent, &logical.right)
            }
        }
        Expression::BinaryExpression(binary) => {
            // 1. Let lref be ? Evaluation of leftOperand.
            // 2. Let lval be ? GetValue(lref).
            let lval = evaluate_expression(agent, &binary.left)?;
            // 3. Let rref be ? Evaluation of rightOperand.
            // 4. Let rval be ? GetValue(rref).
            let rval = evaluate_expression(agent, &binary.right)?;
            apply_binary_operator(agent, binary.operator, lval, rval)
        }
        Expression::UnaryExpression(unary) => evaluate_unary_expression(agent, unary),
        Expression::UpdateExpression(update) => evaluate_update_expression(agent, update),
        Expression::AssignmentExpression(assignment) => {
            evaluate_assignment_expression(agent, assignment)
        }
        Expression::CallExpression(call) => evaluate_call_expression(agent, call),
        Expression::NewExpression(new) => evaluate_new_expression(agent, new),
        Expression::StaticMemberExpression(_)
        | Expression::ComputedMemberExpression(_)
        | Expression::PrivateFieldExpression(_) => {
            let Some(member) = expression.as_member_expression() else {
                unreachable!()
            };
            evaluate_member_reference(agent, member)?.get_value(agent)
        }
        Expression::ClassExpression(_) => Err(throw_unsupported(agent, "Classes")),
        Expression::ChainExpression(_) => Err(throw_unsupported(agent, "Optional chains")),
        Expression::RegExpLiteral(_) => Err(throw_unsupported(agent, "Regular expressions")),
        Expression::BigIntLiteral(_) => Err(throw_unsupported(agent, "BigInts")),
        Expression::TaggedTemplateExpression(_) => {
            Err(throw_unsupported(agent, "Tagged templates"))
        }
        Expression::YieldExpression(_) | Expression::AwaitExpression(_) => {
            Err(throw_unsupported(agent, "Generators and async functions"))
        }
        _ => Err(throw_unsupported(agent, "Expressions of this kind")),
    }
}

/// ### [8.4.5 Runtime Semantics: NamedEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-namedevaluation)
///
/// Evaluates an anonymous function definition so that the created closure
/// is named `name`. Any other expression evaluates normally.
pub(crate) fn evaluate_named_expression<'a>(
    agent: &mut Agent<'a>,
    expression: &'a Expression<'a>,
    name: HeapString,
) -> JsResult<Value> {
    match expression.without_parentheses() {
        Expression::FunctionExpression(function) => {
            // 1. Return InstantiateOrdinaryFunctionExpression of FunctionExpression with argument name.
            let closure = instantiate_ordinary_function_expression(agent, function, Some(name))?;
            Ok(Function::ECMAScriptFunction(closure).into())
        }
        Expression::ArrowFunctionExpression(arrow) => {
            // 1. Return InstantiateArrowFunctionExpression of ArrowFunction with argument name.
            let closure = instantiate_arrow_function_expression(agent, arrow, Some(name))?;
            Ok(Function::ECMAScriptFunction(closure).into())
        }
        _ => evaluate_expression(agent, expression),
    }
}

/// ### [13.3.2.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-property-accessors-runtime-semantics-evaluation)
fn evaluate_member_reference<'a>(
    agent: &mut Agent<'a>,
    member: &'a MemberExpression<'a>,
) -> JsResult<Reference> {
    let strict = agent.is_strict_mode();
    match member {
        MemberExpression::ComputedMemberExpression(member) => {
            // 1. Let baseReference be ? Evaluation of MemberExpression.
            // 2. Let baseValue be ? GetValue(baseReference).
            let base = evaluate_expression(agent, &member.object)?;
            // 4. Return ? EvaluatePropertyAccessWithExpressionKey(baseValue, Expression, strict).
            let property_name_value = evaluate_expression(agent, &member.expression)?;
            let key = PropertyKey::from_value(agent, property_name_value)?;
            Ok(Reference::Property { base, key, strict })
        }
        MemberExpression::StaticMemberExpression(member) => {
            let base = evaluate_expression(agent, &member.object)?;
            // 4. Return EvaluatePropertyAccessWithIdentifierKey(baseValue, IdentifierName, strict).
            let key = PropertyKey::from_str(agent, member.property.name.as_str());
            Ok(Reference::Property { base, key, strict })
        }
        MemberExpression::PrivateFieldExpression(_) => {
            Err(throw_unsupported(agent, "Private fields"))
        }
    }
}

fn evaluate_simple_assignment_target<'a>(
    agent: &mut Agent<'a>,
    target: &'a SimpleAssignmentTarget<'a>,
) -> JsResult<Reference> {
    if let SimpleAssignmentTarget::AssignmentTargetIdentifier(identifier) = target {
        let name = agent.heap.create_string(identifier.name.as_str());
        return Ok(resolve_binding(agent, name));
    }
    match target.as_member_expression() {
        Some(member) => evaluate_member_reference(agent, member),
        None => Err(throw_unsupported(agent, "Assignment targets of this kind")),
    }
}

/// ### [13.2.8.6 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-template-literals-runtime-semantics-evaluation)
fn evaluate_template_literal<'a>(
    agent: &mut Agent<'a>,
    template: &'a TemplateLiteral<'a>,
) -> JsResult<Value> {
    let mut result = String::new();
    for (index, quasi) in template.quasis.iter().enumerate() {
        let cooked = quasi.value.cooked.as_ref().unwrap_or(&quasi.value.raw);
        result.push_str(cooked.as_str());
        if let Some(expression) = template.expressions.get(index) {
            // 3. Let sub be ? GetValue(subRef).
            // 4. Let middle be ? ToString(sub).
            let sub = evaluate_expression(agent, expression)?;
            let middle = to_string(agent, sub)?;
            result.push_str(middle.as_str(agent));
        }
    }
    Ok(Value::from_str(agent, &result))
}

/// Appends the elements produced by spreading `value`: the elements of an
/// array or the characters of a string.
fn spread_into(agent: &mut Agent, value: Value, list: &mut Vec<Value>) -> JsResult<()> {
    match value {
        Value::Array(array) => {
            list.extend(agent[array].elements.iter().copied());
            Ok(())
        }
        Value::String(string) => {
            let characters: Vec<String> = string
                .as_str(agent)
                .chars()
                .map(String::from)
                .collect();
            list.extend(
                characters
                    .iter()
                    .map(|character| Value::from_str(agent, character)),
            );
            Ok(())
        }
        _ => {
            let message = format!("{} is not iterable", value.string_repr(agent));
            Err(agent.throw_exception(ExceptionType::TypeError, message))
        }
    }
}

/// ### [13.2.4.1 Runtime Semantics: ArrayAccumulation](https://tc39.es/ecma262/#sec-runtime-semantics-arrayaccumulation)
///
/// Elisions become `undefined` elements.
fn evaluate_array_expression<'a>(
    agent: &mut Agent<'a>,
    array: &'a ArrayExpression<'a>,
) -> JsResult<Value> {
    let mut elements = Vec::with_capacity(array.elements.len());
    for element in &array.elements {
        match element {
            ArrayExpressionElement::SpreadElement(spread) => {
                let spread_obj = evaluate_expression(agent, &spread.argument)?;
                spread_into(agent, spread_obj, &mut elements)?;
            }
            ArrayExpressionElement::Elision(_) => elements.push(Value::Undefined),
            _ => {
                let Some(expression) = element.as_expression() else {
                    unreachable!()
                };
                elements.push(evaluate_expression(agent, expression)?);
            }
        }
    }
    Ok(Value::Array(agent.heap.create_array(elements)))
}

/// ### [7.3.25 CopyDataProperties ( target, source, excludedItems )](https://tc39.es/ecma262/#sec-copydataproperties)
fn copy_data_properties(agent: &mut Agent, target: OrdinaryObject, source: Value) {
    let mut entries: Vec<(PropertyKey, Value)> = Vec::new();
    match source {
        Value::Object(o) => entries.extend(agent[o].entries()),
        Value::Array(a) => {
            entries.extend(
                agent[a]
                    .elements
                    .iter()
                    .enumerate()
                    .map(|(index, value)| (PropertyKey::Index(index as u32), *value)),
            );
            if let Some(backing_object) = agent[a].backing_object {
                entries.extend(agent[backing_object].entries());
            }
        }
        Value::Function(f) => {
            if let Some(backing_object) = f.backing_object(agent) {
                entries.extend(agent[backing_object].entries());
            }
        }
        Value::String(s) => {
            let characters: Vec<String> = s.as_str(agent).chars().map(String::from).collect();
            for (index, character) in characters.iter().enumerate() {
                let value = Value::from_str(agent, character);
                entries.push((PropertyKey::Index(index as u32), value));
            }
        }
        // 2. If source is either undefined or null, return unused.
        _ => {}
    }
    for (key, value) in entries {
        agent[target].set_own(key, value);
    }
}

/// ### [13.2.5.4 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-object-initializer-runtime-semantics-evaluation)
fn evaluate_object_expression<'a>(
    agent: &mut Agent<'a>,
    object_expression: &'a ObjectExpression<'a>,
) -> JsResult<Value> {
    // 1. Let obj be OrdinaryObjectCreate(%Object.prototype%).
    let prototype = agent.intrinsics().object_prototype;
    let obj = agent.heap.create_object(Some(prototype));
    // 2. Perform ? PropertyDefinitionEvaluation of PropertyDefinitionList with argument obj.
    for property in &object_expression.properties {
        let property = match property {
            ObjectPropertyKind::ObjectProperty(property) => property,
            ObjectPropertyKind::SpreadProperty(spread) => {
                // PropertyDefinition : ... AssignmentExpression
                let from_value = evaluate_expression(agent, &spread.argument)?;
                copy_data_properties(agent, obj, from_value);
                continue;
            }
        };
        if property.kind != PropertyKind::Init {
            return Err(throw_unsupported(agent, "Getters and setters"));
        }
        // PropertyDefinition : PropertyName : AssignmentExpression
        // 1. Let propKey be ? Evaluation of PropertyName.
        let prop_key = if property.computed {
            let Some(expression) = property.key.as_expression() else {
                return Err(throw_unsupported(agent, "Private names"));
            };
            let value = evaluate_expression(agent, expression)?;
            PropertyKey::from_value(agent, value)?
        } else {
            let Some(name) = property.key.static_name() else {
                return Err(throw_unsupported(agent, "Private names"));
            };
            if name == "__proto__" && !property.shorthand && !property.method {
                // PropertyDefinition : __proto__ : AssignmentExpression
                // 5. If isProtoSetter is true, then
                //    a. If propValue is an Object or propValue is null, then
                //       i. Perform ! obj.[[SetPrototypeOf]](propValue).
                match evaluate_expression(agent, &property.value)? {
                    Value::Object(proto) => agent[obj].prototype = Some(proto),
                    Value::Null => agent[obj].prototype = None,
                    _ => {}
                }
                continue;
            }
            PropertyKey::from_str(agent, &name)
        };
        // 4. If IsAnonymousFunctionDefinition(AssignmentExpression) is true and
        //    isProtoSetter is false, then
        //    a. Let propValue be ? NamedEvaluation of AssignmentExpression with argument propKey.
        let prop_value = if property.value.is_anonymous_function_definition() {
            let name = match prop_key {
                PropertyKey::String(name) => name,
                PropertyKey::Index(index) => agent.heap.create_string(&index.to_string()),
            };
            evaluate_named_expression(agent, &property.value, name)?
        } else {
            // 5. Else,
            //    a. Let exprValueRef be ? Evaluation of AssignmentExpression.
            //    b. Let propValue be ? GetValue(exprValueRef).
            evaluate_expression(agent, &property.value)?
        };
        // 7. Perform ! CreateDataPropertyOrThrow(object, propKey, propValue).
        agent[obj].set_own(prop_key, prop_value);
    }
    // 3. Return obj.
    Ok(Value::Object(obj))
}

/// ### [13.3.8.1 Runtime Semantics: ArgumentListEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-argumentlistevaluation)
fn argument_list_evaluation<'a>(
    agent: &mut Agent<'a>,
    arguments: &'a [Argument<'a>],
) -> JsResult<Vec<Value>> {
    let mut list = Vec::with_capacity(arguments.len());
    for argument in arguments {
        if let Argument::SpreadElement(spread) = argument {
            // ArgumentList : ... AssignmentExpression
            let spread_obj = evaluate_expression(agent, &spread.argument)?;
            spread_into(agent, spread_obj, &mut list)?;
        } else {
            let Some(expression) = argument.as_expression() else {
                unreachable!()
            };
            list.push(evaluate_expression(agent, expression)?);
        }
    }
    Ok(list)
}

/// ### [13.3.6.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-function-calls-runtime-semantics-evaluation)
///
/// A property reference as callee supplies its base value as the receiver;
/// any other callee is called with no receiver.
fn evaluate_call_expression<'a>(
    agent: &mut Agent<'a>,
    call_expression: &'a CallExpression<'a>,
) -> JsResult<Value> {
    if call_expression.optional {
        return Err(throw_unsupported(agent, "Optional chains"));
    }
    let callee = call_expression.callee.without_parentheses();
    // 1. Let ref be ? Evaluation of CallExpression.
    // 2. Let func be ? GetValue(ref).
    let (func, call_site) = if let Some(member) = callee.as_member_expression() {
        let reference = evaluate_member_reference(agent, member)?;
        let func = reference.get_value(agent)?;
        let Reference::Property { base, .. } = reference else {
            unreachable!()
        };
        // EvaluateCall: If IsPropertyReference(ref) is true, then
        //    i. Let thisValue be GetThisValue(ref).
        (func, CallSite::Method(base))
    } else if let Expression::Super(_) = callee {
        return Err(throw_unsupported(agent, "super calls"));
    } else {
        // Else,
        //    i. Let refEnv be ref.[[Base]].
        //    iii. Let thisValue be refEnv.WithBaseObject(), which is
        //         undefined for every supported environment.
        (evaluate_expression(agent, callee)?, CallSite::Plain)
    };
    // 2. Let argList be ? ArgumentListEvaluation of arguments.
    let arg_list = argument_list_evaluation(agent, &call_expression.arguments)?;
    // 3. If func is not an Object, throw a TypeError exception.
    // 4. If IsCallable(func) is false, throw a TypeError exception.
    if is_callable(func).is_none() {
        let message = format!("{} is not a function", source_text(agent, callee.span()));
        return Err(agent.throw_exception(ExceptionType::TypeError, message));
    }
    // 7. Return ? Call(func, thisValue, argList).
    call(agent, func, call_site, &arg_list)
}

/// ### [13.3.5.1.1 EvaluateNew ( constructExpr, arguments )](https://tc39.es/ecma262/#sec-evaluatenew)
fn evaluate_new_expression<'a>(
    agent: &mut Agent<'a>,
    new_expression: &'a NewExpression<'a>,
) -> JsResult<Value> {
    // 1. Let ref be ? Evaluation of constructExpr.
    // 2. Let constructor be ? GetValue(ref).
    let constructor = evaluate_expression(agent, &new_expression.callee)?;
    // 4. Else,
    //    a. Let argList be ? ArgumentListEvaluation of arguments.
    let arg_list = argument_list_evaluation(agent, &new_expression.arguments)?;
    // 5. If IsConstructor(constructor) is false, throw a TypeError exception.
    let Some(constructor) = is_constructor(agent, constructor) else {
        let message = format!(
            "{} is not a constructor",
            source_text(agent, new_expression.callee.span())
        );
        return Err(agent.throw_exception(ExceptionType::TypeError, message));
    };
    // 6. Return ? Construct(constructor, argList).
    construct(agent, constructor, &arg_list, None)
}

/// ### [13.5.3.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-typeof-operator-runtime-semantics-evaluation)
fn type_of(value: Value) -> &'static str {
    match value {
        Value::Undefined => "undefined",
        Value::Null | Value::Object(_) | Value::Array(_) => "object",
        Value::Boolean(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Function(_) => "function",
    }
}

fn evaluate_unary_expression<'a>(
    agent: &mut Agent<'a>,
    unary: &'a UnaryExpression<'a>,
) -> JsResult<Value> {
    let argument = unary.argument.without_parentheses();
    match unary.operator {
        UnaryOperator::Delete => {
            // 13.5.1.2 Runtime Semantics: Evaluation
            let Some(member) = argument.as_member_expression() else {
                if let Expression::Identifier(identifier) = argument {
                    // 3. If IsUnresolvableReference(ref) is true, then
                    //    b. Return true.
                    // Declared bindings cannot be deleted.
                    let name = agent.heap.create_string(identifier.name.as_str());
                    let resolved = matches!(
                        resolve_binding(agent, name),
                        Reference::Binding { env: Some(_), .. }
                    );
                    return Ok(Value::Boolean(!resolved));
                }
                // 2. If ref is not a Reference Record, return true.
                evaluate_expression(agent, argument)?;
                return Ok(Value::Boolean(true));
            };
            let Reference::Property { base, key, strict } =
                evaluate_member_reference(agent, member)?
            else {
                unreachable!()
            };
            // 4. If IsPropertyReference(ref) is true, then
            //    c. Let baseObj be ? ToObject(ref.[[Base]]).
            if base.is_nullish() {
                let message = "Cannot convert undefined or null to object".to_owned();
                return Err(agent.throw_exception(ExceptionType::TypeError, message));
            }
            let Ok(base_obj) = Object::try_from(base) else {
                return Ok(Value::Boolean(true));
            };
            //    e. Let deleteStatus be ? baseObj.[[Delete]](ref.[[ReferencedName]]).
            let delete_status = delete_property(agent, base_obj, key);
            //    f. If deleteStatus is false and ref.[[Strict]] is true, throw a
            //       TypeError exception.
            if !delete_status && strict {
                let message = format!(
                    "Cannot delete property '{}' of {}",
                    key.display(agent),
                    base.string_repr(agent)
                );
                return Err(agent.throw_exception(ExceptionType::TypeError, message));
            }
            //    g. Return deleteStatus.
            Ok(Value::Boolean(delete_status))
        }
        UnaryOperator::Typeof => {
            // 2. If val is a Reference Record, then
            //    a. If IsUnresolvableReference(val) is true, return "undefined".
            let val = if let Expression::Identifier(identifier) = argument {
                let name = agent.heap.create_string(identifier.name.as_str());
                match resolve_binding(agent, name) {
                    Reference::Binding { env: None, .. } => Value::Undefined,
                    reference => reference.get_value(agent)?,
                }
            } else {
                evaluate_expression(agent, argument)?
            };
            Ok(Value::from_str(agent, type_of(val)))
        }
        UnaryOperator::Void => {
            evaluate_expression(agent, argument)?;
            Ok(Value::Undefined)
        }
        UnaryOperator::LogicalNot => {
            let old_value = evaluate_expression(agent, argument)?;
            Ok(Value::Boolean(!to_boolean(agent, old_value)))
        }
        UnaryOperator::UnaryNegation => {
            let old_value = evaluate_expression(agent, argument)?;
            Ok(Value::Number(-to_number(agent, old_value)?))
        }
        UnaryOperator::UnaryPlus => {
            let value = evaluate_expression(agent, argument)?;
            Ok(Value::Number(to_number(agent, value)?))
        }
        UnaryOperator::BitwiseNot => {
            let old_value = evaluate_expression(agent, argument)?;
            Ok(Value::Number(f64::from(!to_int32(agent, old_value)?)))
        }
    }
}

/// ### [13.4 Update Expressions](https://tc39.es/ecma262/#sec-update-expressions)
fn evaluate_update_expression<'a>(
    agent: &mut Agent<'a>,
    update: &'a UpdateExpression<'a>,
) -> JsResult<Value> {
    // 1. Let lhs be ? Evaluation of LeftHandSideExpression.
    let lhs = evaluate_simple_assignment_target(agent, &update.argument)?;
    // 2. Let oldValue be ? ToNumeric(? GetValue(lhs)).
    let old_value = lhs.get_value(agent)?;
    let old_value = to_number(agent, old_value)?;
    // 3. Let newValue be Number::add(oldValue, 1𝔽) or Number::subtract(oldValue, 1𝔽).
    let new_value = match update.operator {
        UpdateOperator::Increment => old_value + 1.0,
        UpdateOperator::Decrement => old_value - 1.0,
    };
    // 4. Perform ? PutValue(lhs, newValue).
    lhs.put_value(agent, Value::Number(new_value))?;
    // 5. Return oldValue, or newValue for the prefix forms.
    Ok(Value::Number(if update.prefix {
        new_value
    } else {
        old_value
    }))
}

/// ### [13.15.2 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-assignment-operators-runtime-semantics-evaluation)
fn evaluate_assignment_expression<'a>(
    agent: &mut Agent<'a>,
    assignment: &'a AssignmentExpression<'a>,
) -> JsResult<Value> {
    let Some(target) = assignment.left.as_simple_assignment_target() else {
        return Err(throw_unsupported(agent, "Destructuring assignments"));
    };
    // 1. Let lref be ? Evaluation of LeftHandSideExpression.
    let lref = evaluate_simple_assignment_target(agent, target)?;
    let binding_name = match lref {
        Reference::Binding { name, .. } => Some(name),
        Reference::Property { .. } => None,
    };
    // If IsAnonymousFunctionDefinition(AssignmentExpression) and
    // IsIdentifierRef of LeftHandSideExpression are both true, then
    //    i. Let rval be ? NamedEvaluation of AssignmentExpression with argument lref.[[ReferencedName]].
    let evaluate_rval = |agent: &mut Agent<'a>| match binding_name {
        Some(name) if assignment.right.is_anonymous_function_definition() => {
            evaluate_named_expression(agent, &assignment.right, name)
        }
        _ => evaluate_expression(agent, &assignment.right),
    };

    if let Some(operator) = assignment.operator.to_logical_operator() {
        // AssignmentExpression : LeftHandSideExpression &&= AssignmentExpression
        // 2. Let lval be ? GetValue(lref).
        let lval = lref.get_value(agent)?;
        // 3. If ToBoolean(lval) is false, return lval.
        let short_circuits = match operator {
            LogicalOperator::And => !to_boolean(agent, lval),
            LogicalOperator::Or => to_boolean(agent, lval),
            LogicalOperator::Coalesce => !lval.is_nullish(),
        };
        if short_circuits {
            return Ok(lval);
        }
        let rval = evaluate_rval(agent)?;
        // 6. Perform ? PutValue(lref, rval).
        lref.put_value(agent, rval)?;
        // 7. Return rval.
        return Ok(rval);
    }

    let value = if let Some(operator) = assignment.operator.to_binary_operator() {
        // AssignmentExpression : LeftHandSideExpression AssignmentOperator AssignmentExpression
        // 2. Let lval be ? GetValue(lref).
        let lval = lref.get_value(agent)?;
        // 3. Let rref be ? Evaluation of AssignmentExpression.
        // 4. Let rval be ? GetValue(rref).
        let rval = evaluate_expression(agent, &assignment.right)?;
        // 7. Let r be ? ApplyStringOrNumericBinaryOperator(lval, opText, rval).
        apply_binary_operator(agent, operator, lval, rval)?
    } else {
        // AssignmentExpression : LeftHandSideExpression = AssignmentExpression
        evaluate_rval(agent)?
    };
    // Perform ? PutValue(lref, rval).
    lref.put_value(agent, value)?;
    // Return rval.
    Ok(value)
}

/// ### [6.1.6.1.3 Number::exponentiate ( base, exponent )](https://tc39.es/ecma262/#sec-numeric-types-number-exponentiate)
fn exponentiate(base: f64, exponent: f64) -> f64 {
    // 1. If exponent is NaN, return NaN.
    // 5. If base is either 1𝔽 or -1𝔽 and exponent is +∞𝔽 or -∞𝔽, return NaN.
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// ### [13.15.3 ApplyStringOrNumericBinaryOperator ( lval, opText, rval )](https://tc39.es/ecma262/#sec-applystringornumericbinaryoperator)
///
/// Also covers the relational and equality operators, which share the
/// operand evaluation of binary expressions.
fn apply_binary_operator(
    agent: &mut Agent,
    operator: BinaryOperator,
    lval: Value,
    rval: Value,
) -> JsResult<Value> {
    let result = match operator {
        BinaryOperator::Addition => {
            // a. Let lprim be ? ToPrimitive(lval).
            // b. Let rprim be ? ToPrimitive(rval).
            let lprim = to_primitive(agent, lval, None)?;
            let rprim = to_primitive(agent, rval, None)?;
            // c. If lprim is a String or rprim is a String, then
            if matches!(lprim, Value::String(_)) || matches!(rprim, Value::String(_)) {
                // i. Let lstr be ? ToString(lprim).
                // ii. Let rstr be ? ToString(rprim).
                let lstr = to_string(agent, lprim)?;
                let rstr = to_string(agent, rprim)?;
                // iii. Return the string-concatenation of lstr and rstr.
                let concatenated = format!("{}{}", lstr.as_str(agent), rstr.as_str(agent));
                return Ok(Value::from_str(agent, &concatenated));
            }
            to_number(agent, lprim)? + to_number(agent, rprim)?
        }
        BinaryOperator::Subtraction => to_number(agent, lval)? - to_number(agent, rval)?,
        BinaryOperator::Multiplication => to_number(agent, lval)? * to_number(agent, rval)?,
        BinaryOperator::Division => to_number(agent, lval)? / to_number(agent, rval)?,
        BinaryOperator::Remainder => to_number(agent, lval)? % to_number(agent, rval)?,
        BinaryOperator::Exponential => {
            let base = to_number(agent, lval)?;
            exponentiate(base, to_number(agent, rval)?)
        }
        BinaryOperator::ShiftLeft => {
            let lnum = to_int32(agent, lval)?;
            let shift_count = to_uint32(agent, rval)? % 32;
            f64::from(lnum.wrapping_shl(shift_count))
        }
        BinaryOperator::ShiftRight => {
            let lnum = to_int32(agent, lval)?;
            let shift_count = to_uint32(agent, rval)? % 32;
            f64::from(lnum >> shift_count)
        }
        BinaryOperator::ShiftRightZeroFill => {
            let lnum = to_uint32(agent, lval)?;
            let shift_count = to_uint32(agent, rval)? % 32;
            f64::from(lnum >> shift_count)
        }
        BinaryOperator::BitwiseAnd => f64::from(to_int32(agent, lval)? & to_int32(agent, rval)?),
        BinaryOperator::BitwiseOR => f64::from(to_int32(agent, lval)? | to_int32(agent, rval)?),
        BinaryOperator::BitwiseXOR => f64::from(to_int32(agent, lval)? ^ to_int32(agent, rval)?),
        BinaryOperator::LessThan => {
            // 5. Let r be ? IsLessThan(lval, rval, true).
            // 6. If r is undefined, return false. Otherwise, return r.
            let r = is_less_than(agent, lval, rval, true)?;
            return Ok(Value::Boolean(r == Some(true)));
        }
        BinaryOperator::GreaterThan => {
            // 5. Let r be ? IsLessThan(rval, lval, false).
            let r = is_less_than(agent, rval, lval, false)?;
            return Ok(Value::Boolean(r == Some(true)));
        }
        BinaryOperator::LessEqualThan => {
            // 5. Let r be ? IsLessThan(rval, lval, false).
            // 6. If r is either true or undefined, return false. Otherwise, return true.
            let r = is_less_than(agent, rval, lval, false)?;
            return Ok(Value::Boolean(r == Some(false)));
        }
        BinaryOperator::GreaterEqualThan => {
            let r = is_less_than(agent, lval, rval, true)?;
            return Ok(Value::Boolean(r == Some(false)));
        }
        BinaryOperator::Equality => {
            return Ok(Value::Boolean(is_loosely_equal(agent, lval, rval)?));
        }
        BinaryOperator::Inequality => {
            return Ok(Value::Boolean(!is_loosely_equal(agent, lval, rval)?));
        }
        BinaryOperator::StrictEquality => return Ok(Value::Boolean(is_strictly_equal(lval, rval))),
        BinaryOperator::StrictInequality => {
            return Ok(Value::Boolean(!is_strictly_equal(lval, rval)));
        }
        BinaryOperator::In => {
            // 5. If rval is not an Object, throw a TypeError exception.
            let Ok(rval_obj) = Object::try_from(rval) else {
                let message = format!(
                    "Cannot use 'in' operator to search for '{}' in {}",
                    lval.string_repr(agent),
                    rval.string_repr(agent)
                );
                return Err(agent.throw_exception(ExceptionType::TypeError, message));
            };
            // 6. Return ? HasProperty(rval, ? ToPropertyKey(lval)).
            let key = PropertyKey::from_value(agent, lval)?;
            return Ok(Value::Boolean(has_property(agent, rval_obj, key)));
        }
        BinaryOperator::Instanceof => {
            // 13.10.2 InstanceofOperator ( V, target )
            return Ok(Value::Boolean(ordinary_has_instance(agent, rval, lval)?));
        }
    };
    Ok(Value::Number(result))
}

#[cfg(test)]
mod tests {
    use super::exponentiate;

    #[test]
    fn exponentiate_follows_number_semantics() {
        assert_eq!(exponentiate(2.0, 10.0), 1024.0);
        assert!(exponentiate(1.0, f64::INFINITY).is_nan());
        assert!(exponentiate(-1.0, f64::NEG_INFINITY).is_nan());
        assert!(exponentiate(f64::NAN, f64::NAN).is_nan());
        assert_eq!(exponentiate(f64::NAN, 0.0), 1.0);
    }
}
