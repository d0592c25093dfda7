// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use common::{evaluate, evaluate_error, evaluate_repr, new_agent};

#[test]
fn console_log_joins_formatted_arguments() {
    let (mut agent, host) = new_agent();
    evaluate(
        &mut agent,
        "
        console.log('a', 1, 'b', [1, 'x'], { k: 1 }, null, undefined, function named() {}, () => 0);
        console.log();
        console.log(-0, 0.1 + 0.2, 1e21, 1 / 0, NaN, true);",
    )
    .unwrap();
    assert_eq!(
        host.take_lines(),
        [
            "a 1 b [ 1, 'x' ] { k: 1 } null undefined [Function: named] [Function (anonymous)]",
            "",
            "-0 0.30000000000000004 1e+21 Infinity NaN true",
        ]
    );
}

#[test]
fn console_log_formats_nested_values() {
    let (mut agent, host) = new_agent();
    evaluate(
        &mut agent,
        "
        var deep = { a: { b: { c: { d: 1 } } } };
        var circular = { name: 'loop' };
        circular.self = circular;
        function Named() { this.ok = true; }
        console.log(deep);
        console.log(circular);
        console.log({ 'my-key': 'it\\'s' }, new Named(), []);
        console.log(new TypeError('bad input'), [new Error('nested')]);
        var named = () => 1;
        console.log(named, [named]);",
    )
    .unwrap();
    assert_eq!(
        host.take_lines(),
        [
            "{ a: { b: { c: [Object] } } }",
            "{ name: 'loop', self: [Circular *1] }",
            "{ 'my-key': 'it\\'s' } Named { ok: true } []",
            "TypeError: bad input [ [Error: nested] ]",
            "[Function: named] [ [Function: named] ]",
        ]
    );
}

#[test]
fn filter_calls_predicate_with_value_index_and_array() {
    let (mut agent, _) = new_agent();
    let source = "
        var seen = [];
        var xs = ['a', 'b'];
        xs.filter(function (value, index, array) {
            seen.push([value, index, array === xs]);
            return false;
        });
        seen";
    assert_eq!(
        evaluate_repr(&mut agent, source),
        "[ [ 'a', 0, true ], [ 'b', 1, true ] ]"
    );
}

#[test]
fn filter_tests_truthiness_and_copies() {
    let (mut agent, _) = new_agent();
    let source = "
        var xs = [0, 1, '', 'a', null, {}];
        var kept = xs.filter(function (x) { return x; });
        [kept, kept === xs, xs.length, [].filter(() => true)]";
    assert_eq!(
        evaluate_repr(&mut agent, source),
        "[ [ 1, 'a', {} ], false, 6, [] ]"
    );
}

#[test]
fn filter_visits_only_the_original_length() {
    let (mut agent, _) = new_agent();
    let source = "
        var xs = [1, 2, 3];
        var kept = xs.filter(function (x) { xs.push(x * 10); return true; });
        [kept, xs.length]";
    assert_eq!(evaluate_repr(&mut agent, source), "[ [ 1, 2, 3 ], 6 ]");
}

#[test]
fn filter_works_on_array_likes() {
    let (mut agent, _) = new_agent();
    let source = "
        var arrayLike = { length: 3, 0: 'x', 2: 'z' };
        [].filter.call(arrayLike, function () { return true; })";
    assert_eq!(evaluate_repr(&mut agent, source), "[ 'x', 'z' ]");
}

#[test]
fn filter_rejects_bad_arguments() {
    let (mut agent, _) = new_agent();
    assert_eq!(
        evaluate_error(&mut agent, "[1, 2].filter(5)"),
        "TypeError: 5 is not a function"
    );
    assert_eq!(
        evaluate_error(&mut agent, "[].filter.call(null, function () {})"),
        "TypeError: Array.prototype.filter called on null or undefined"
    );
}

#[test]
fn other_array_methods() {
    let (mut agent, _) = new_agent();
    let source = "
        var xs = [1, 2, 3];
        var doubled = xs.map((x) => x * 2);
        var sum = 0;
        xs.forEach(function (x) { sum += x * this.factor; }, { factor: 10 });
        [doubled, sum, xs.indexOf(2), xs.indexOf(9), xs.join('-'), xs.toString(), xs.push(4, 5)]";
    assert_eq!(
        evaluate_repr(&mut agent, source),
        "[ [ 2, 4, 6 ], 60, 1, -1, '1-2-3', '1,2,3', 5 ]"
    );
}

#[test]
fn errors_can_be_thrown_and_caught() {
    let (mut agent, _) = new_agent();
    let source = "
        var caught;
        try {
            null.property;
        } catch (error) {
            caught = [error instanceof TypeError, error instanceof Error, error.name];
        }
        caught";
    assert_eq!(
        evaluate_repr(&mut agent, source),
        "[ true, true, 'TypeError' ]"
    );
    assert_eq!(
        evaluate_error(&mut agent, "undeclared"),
        "ReferenceError: undeclared is not defined"
    );
    assert_eq!(
        evaluate_error(&mut agent, "throw new RangeError('out of range')"),
        "RangeError: out of range"
    );
    assert_eq!(
        evaluate_repr(&mut agent, "new Error('plain').toString()"),
        "'Error: plain'"
    );
}

#[test]
fn runaway_recursion_throws_a_catchable_range_error() {
    let (mut agent, _) = new_agent();
    let source = "
        function depth(n) { return n === 0 ? 0 : 1 + depth(n - 1); }
        function forever() { return forever(); }
        var caught;
        try {
            forever();
        } catch (error) {
            caught = [error instanceof RangeError, error.message];
        }
        [depth(2000), caught]";
    assert_eq!(
        evaluate_repr(&mut agent, source),
        "[ 2000, [ true, 'Maximum call stack size exceeded' ] ]"
    );
    assert_eq!(
        evaluate_error(&mut agent, "[1].filter(function again() { return [1].filter(again); })"),
        "RangeError: Maximum call stack size exceeded"
    );
    assert_eq!(evaluate_repr(&mut agent, "depth(10)"), "10");
}

#[test]
fn oversized_arrays_throw_range_error() {
    let (mut agent, _) = new_agent();
    assert_eq!(
        evaluate_error(&mut agent, "var a = []; a[4294967294] = 1;"),
        "RangeError: Invalid array length"
    );
    assert_eq!(
        evaluate_error(&mut agent, "var b = [1]; b.length = 4294967295;"),
        "RangeError: Invalid array length"
    );
    let source = "
        var c = [1];
        c[3] = 4;
        c.length = 2;
        [a.length, b.length, c.length, c[1]]";
    assert_eq!(evaluate_repr(&mut agent, source), "[ 0, 1, 2, undefined ]");
}

#[test]
fn object_prototype_methods() {
    let (mut agent, _) = new_agent();
    let source = "
        var o = { own: 1 };
        [o.hasOwnProperty('own'), o.hasOwnProperty('toString'), o.toString(), o.valueOf() === o]";
    assert_eq!(
        evaluate_repr(&mut agent, source),
        "[ true, false, '[object Object]', true ]"
    );
}

#[test]
fn unsupported_syntax_throws_syntax_error() {
    let (mut agent, _) = new_agent();
    assert_eq!(
        evaluate_error(&mut agent, "class A {}"),
        "SyntaxError: Classes are not supported"
    );
}
