// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use common::{evaluate, evaluate_error, evaluate_repr, evaluate_with, new_agent};
use quiver_vm::{
    CallSite, Environment, Function, ScriptOptions, Value, get_this_environment,
    resolve_this_environment,
};

#[test]
fn method_call_binds_the_receiver() {
    let (mut agent, _) = new_agent();
    let source = "
        var counter = {
            count: 10,
            next: function () {
                return ++this.count;
            },
        };
        counter.next();
        counter['next']()";
    assert_eq!(evaluate_repr(&mut agent, source), "12");
}

#[test]
fn plain_call_binds_global_object_unless_strict() {
    let (mut agent, _) = new_agent();
    let source = "
        function sloppy() { return this; }
        function strict() { 'use strict'; return this; }
        [sloppy() === globalThis, strict()]";
    assert_eq!(evaluate_repr(&mut agent, source), "[ true, undefined ]");

    let (mut agent, _) = new_agent();
    let result = evaluate_with(
        &mut agent,
        "function f() { return this; } f()",
        ScriptOptions { strict: true },
    )
    .unwrap();
    assert_eq!(result, Value::Undefined);
}

#[test]
fn extracted_method_loses_its_receiver() {
    let (mut agent, _) = new_agent();
    let source = "
        var name = 'global';
        var o = {
            name: 'o',
            getName: function () { return this.name; },
        };
        var getName = o.getName;
        [o.getName(), getName(), (0, o.getName)()]";
    assert_eq!(evaluate_repr(&mut agent, source), "[ 'o', 'global', 'global' ]");
}

#[test]
fn construction_binds_the_new_instance() {
    let (mut agent, _) = new_agent();
    let source = "
        function Point(x, y) {
            this.x = x;
            this.y = y;
        }
        function Replaced() {
            this.ignored = true;
            return { replaced: true };
        }
        [new Point(1, 2), new Replaced()]";
    assert_eq!(
        evaluate_repr(&mut agent, source),
        "[ Point { x: 1, y: 2 }, { replaced: true } ]"
    );
    assert_eq!(
        evaluate_repr(&mut agent, "new Point(0, 0) instanceof Point"),
        "true"
    );
}

#[test]
fn nested_arrows_share_the_enclosing_this() {
    let (mut agent, _) = new_agent();
    let source = "
        var o = {
            name: 'outer',
            run: function () {
                var first = () => () => () => this.name;
                return first()()();
            },
        };
        o.run()";
    assert_eq!(evaluate_repr(&mut agent, source), "'outer'");
}

#[test]
fn arrow_in_nested_function_captures_the_nearest_function() {
    let (mut agent, _) = new_agent();
    let source = "
        var outer = {
            tag: 'outer',
            run: function () {
                var inner = {
                    tag: 'inner',
                    run: function () { return (() => this.tag)(); },
                };
                return [(() => this.tag)(), inner.run()];
            },
        };
        outer.run()";
    assert_eq!(evaluate_repr(&mut agent, source), "[ 'outer', 'inner' ]");
}

#[test]
fn arrows_ignore_explicit_receivers() {
    let (mut agent, _) = new_agent();
    let source = "
        var o = {
            make: function () { return () => this; },
        };
        var arrow = o.make();
        var other = {};
        [
            arrow() === o,
            arrow.call(other) === o,
            arrow.apply(other, []) === o,
            arrow.bind(other)() === o,
            (other.method = arrow, other.method() === o),
        ]";
    assert_eq!(
        evaluate_repr(&mut agent, source),
        "[ true, true, true, true, true ]"
    );
}

#[test]
fn ordinary_functions_take_explicit_receivers() {
    let (mut agent, _) = new_agent();
    let source = "
        function getX(y) { return this.x + y; }
        var bound = getX.bind({ x: 1 });
        [
            getX.call({ x: 10 }, 1),
            getX.apply({ x: 20 }, [2]),
            bound(3),
            bound.call({ x: 100 }, 4),
        ]";
    assert_eq!(evaluate_repr(&mut agent, source), "[ 11, 22, 4, 5 ]");
}

#[test]
fn arrows_are_not_constructors() {
    let (mut agent, _) = new_agent();
    assert_eq!(
        evaluate_error(&mut agent, "var f = () => 1; new f()"),
        "TypeError: f is not a constructor"
    );
    assert_eq!(
        evaluate_repr(&mut agent, "f.prototype === undefined"),
        "true"
    );
}

#[test]
fn top_level_arrow_captures_the_global_this() {
    let (mut agent, _) = new_agent();
    let source = "
        var arrow = () => this;
        var o = { arrow: arrow };
        [this === globalThis, arrow() === globalThis, o.arrow() === globalThis]";
    assert_eq!(evaluate_repr(&mut agent, source), "[ true, true, true ]");
}

#[test]
fn arrow_keeps_receiver_after_the_method_returns() {
    let (mut agent, _) = new_agent();
    let source = "
        function Counter() {
            this.count = 0;
            this.increment = () => ++this.count;
        }
        var counter = new Counter();
        var increment = counter.increment;
        increment();
        increment();
        [counter.count, increment.call(null)]";
    assert_eq!(evaluate_repr(&mut agent, source), "[ 2, 3 ]");
}

#[test]
fn filter_passes_this_arg_to_ordinary_predicates_only() {
    let (mut agent, _) = new_agent();
    let source = "
        var limits = {
            min: 2,
            withFunction: function (xs) {
                return xs.filter(function (n) { return n > this.min; }, { min: 0 });
            },
            withArrow: function (xs) {
                return xs.filter((n) => n > this.min, { min: 0 });
            },
        };
        [limits.withFunction([1, 2, 3]), limits.withArrow([1, 2, 3])]";
    assert_eq!(
        evaluate_repr(&mut agent, source),
        "[ [ 1, 2, 3 ], [ 3 ] ]"
    );
}

fn global_function(agent: &mut quiver_vm::Agent<'static>, name: &str) -> Function {
    match agent.get_global(name) {
        Ok(Value::Function(function)) => function,
        _ => panic!("{name} is not a function"),
    }
}

#[test]
fn resolve_this_environment_for_ordinary_functions() {
    let (mut agent, _) = new_agent();
    evaluate(
        &mut agent,
        "
        function sloppy() { return this; }
        function strict() { 'use strict'; return this; }
        var receiver = {};",
    )
    .unwrap();
    let Function::ECMAScriptFunction(sloppy) = global_function(&mut agent, "sloppy") else {
        panic!("sloppy is not an ECMAScript function");
    };
    let Function::ECMAScriptFunction(strict) = global_function(&mut agent, "strict") else {
        panic!("strict is not an ECMAScript function");
    };
    let receiver = agent.get_global("receiver").unwrap();
    let global_this = agent.get_global("globalThis").unwrap();

    let env = resolve_this_environment(&mut agent, sloppy, CallSite::Method(receiver));
    assert!(matches!(env, Environment::Function(_)));
    assert_eq!(env.get_this_binding(&mut agent).unwrap().unwrap(), receiver);

    let env = resolve_this_environment(&mut agent, sloppy, CallSite::Plain);
    assert_eq!(env.get_this_binding(&mut agent).unwrap().unwrap(), global_this);

    let env = resolve_this_environment(&mut agent, strict, CallSite::Plain);
    assert_eq!(
        env.get_this_binding(&mut agent).unwrap().unwrap(),
        Value::Undefined
    );

    // Every call gets its own record.
    let first = resolve_this_environment(&mut agent, sloppy, CallSite::Plain);
    let second = resolve_this_environment(&mut agent, sloppy, CallSite::Plain);
    assert_ne!(first, second);
}

#[test]
fn resolve_this_environment_for_arrows_ignores_the_call_site() {
    let (mut agent, _) = new_agent();
    evaluate(
        &mut agent,
        "
        var owner = { make: function () { return () => this; } };
        var captured = owner.make();
        var topLevel = () => this;
        var other = {};",
    )
    .unwrap();
    let Function::ECMAScriptFunction(captured) = global_function(&mut agent, "captured") else {
        panic!("captured is not an ECMAScript function");
    };
    let Function::ECMAScriptFunction(top_level) = global_function(&mut agent, "topLevel") else {
        panic!("topLevel is not an ECMAScript function");
    };
    let owner = agent.get_global("owner").unwrap();
    let other = agent.get_global("other").unwrap();
    let global_this = agent.get_global("globalThis").unwrap();

    let plain = resolve_this_environment(&mut agent, captured, CallSite::Plain);
    let method = resolve_this_environment(&mut agent, captured, CallSite::Method(other));
    assert_eq!(plain, method);
    assert!(matches!(plain, Environment::Function(_)));
    assert_eq!(plain.get_this_binding(&mut agent).unwrap().unwrap(), owner);

    let env = resolve_this_environment(&mut agent, top_level, CallSite::Method(other));
    assert!(matches!(env, Environment::Global(_)));
    assert_eq!(env.get_this_binding(&mut agent).unwrap().unwrap(), global_this);
}

#[test]
fn get_this_environment_outside_of_calls_is_global() {
    let (agent, _) = new_agent();
    let env = get_this_environment(&agent, agent.current_lexical_environment());
    assert!(matches!(env, Environment::Global(_)));
    assert!(env.has_this_binding(&agent));
}
