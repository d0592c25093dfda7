// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use common::{evaluate, evaluate_repr, new_agent, read_source};
use quiver_vm::Value;

#[test]
fn interval_callback_increments_captured_instance() {
    let (mut agent, _) = new_agent();
    evaluate(&mut agent, &read_source("intervalCounter.test.js")).unwrap();
    assert_eq!(evaluate_repr(&mut agent, "p.age"), "0");

    assert_eq!(agent.run_jobs_until(1000).unwrap(), 2);
    assert_eq!(evaluate_repr(&mut agent, "p.age"), "1");
    assert_eq!(agent.now(), 1000);

    agent.run_jobs_until(3000).unwrap();
    assert_eq!(evaluate_repr(&mut agent, "p.age"), "3");

    // The dynamic callback was invoked without a receiver, so it updated
    // the global object instead of its instance.
    assert_eq!(evaluate_repr(&mut agent, "f.age"), "0");
    assert!(matches!(agent.get_global("age"), Ok(Value::Number(n)) if n.is_nan()));
}

#[test]
fn cleared_interval_stops_counting() {
    let (mut agent, _) = new_agent();
    evaluate(&mut agent, &read_source("intervalCounter.test.js")).unwrap();
    agent.run_jobs_until(2000).unwrap();
    evaluate(&mut agent, "clearInterval(p.timer)").unwrap();
    agent.run_jobs_until(5000).unwrap();
    assert_eq!(evaluate_repr(&mut agent, "p.age"), "2");
}

#[test]
fn deferred_callbacks_see_different_receivers() {
    let (mut agent, host) = new_agent();
    evaluate(&mut agent, &read_source("deferredReceiver.test.js")).unwrap();
    assert!(host.take_lines().is_empty());
    assert_eq!(agent.pending_jobs(), 2);

    agent.run_jobs_until(99).unwrap();
    assert!(host.take_lines().is_empty());

    assert_eq!(agent.run_jobs_until(100).unwrap(), 2);
    assert_eq!(host.take_lines(), ["undefined", "42"]);
    assert_eq!(agent.pending_jobs(), 0);
}

#[test]
fn constructor_body_timeouts_see_different_receivers() {
    let (mut agent, host) = new_agent();
    evaluate(&mut agent, &read_source("constructorTimeouts.test.js")).unwrap();
    assert_eq!(evaluate_repr(&mut agent, "r.value"), "42");
    assert_eq!(agent.next_job_due(), Some(1000));

    assert_eq!(agent.run_jobs_until(1000).unwrap(), 2);
    assert_eq!(host.take_lines(), ["undefined", "42"]);

    // The dynamic callback read `value` off the global object, which has none.
    assert_eq!(evaluate_repr(&mut agent, "typeof value"), "'undefined'");
}

#[test]
fn filter_keeps_even_numbers_in_order() {
    let (mut agent, host) = new_agent();
    evaluate(&mut agent, &read_source("filterEvens.test.js")).unwrap();
    assert_eq!(
        host.take_lines(),
        ["[ 2, 4, 6 ]", "[ 2, 4, 6 ]", "[ 1, 2, 3, 4, 5, 6 ]"]
    );
}

#[test]
fn concise_arrow_returns_its_expression() {
    let (mut agent, _) = new_agent();
    let result = evaluate(&mut agent, &read_source("conciseBody.test.js")).unwrap();
    assert_eq!(result, Value::Number(7.0));

    let add = agent.get_global("add").unwrap();
    let result = agent
        .call_function(add, &[Value::from(3.0), Value::from(4.0)])
        .unwrap();
    assert_eq!(result, Value::Number(7.0));

    assert_eq!(evaluate_repr(&mut agent, "square(9)"), "81");
    assert_eq!(evaluate_repr(&mut agent, "makePoint(1, 2)"), "{ x: 1, y: 2 }");
}
