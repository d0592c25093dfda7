// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use common::{evaluate, evaluate_error, evaluate_repr, new_agent};

#[test]
fn timeouts_run_by_due_time_then_scheduling_order() {
    let (mut agent, host) = new_agent();
    evaluate(
        &mut agent,
        "
        setTimeout(function () { console.log('b'); }, 20);
        setTimeout(function () { console.log('a'); }, 10);
        setTimeout(function () { console.log('c'); }, 20);",
    )
    .unwrap();
    assert_eq!(agent.next_job_due(), Some(10));
    assert_eq!(agent.run_jobs(usize::MAX).unwrap(), 3);
    assert_eq!(host.take_lines(), ["a", "b", "c"]);
    assert_eq!(agent.now(), 20);
    assert_eq!(agent.next_job_due(), None);
}

#[test]
fn extra_arguments_are_passed_to_the_callback() {
    let (mut agent, host) = new_agent();
    evaluate(
        &mut agent,
        "setTimeout(function (x, y) { console.log(x + y); }, 5, 2, 3)",
    )
    .unwrap();
    agent.run_jobs_until(5).unwrap();
    assert_eq!(host.take_lines(), ["5"]);
}

#[test]
fn timer_ids_are_distinct_numbers() {
    let (mut agent, _) = new_agent();
    let source = "
        var a = setTimeout(function () {}, 0);
        var b = setInterval(function () {}, 0);
        [typeof a, a !== b]";
    assert_eq!(evaluate_repr(&mut agent, source), "[ 'number', true ]");
}

#[test]
fn cleared_timeout_never_runs() {
    let (mut agent, host) = new_agent();
    evaluate(
        &mut agent,
        "
        var id = setTimeout(function () { console.log('never'); }, 10);
        clearTimeout(id);
        clearTimeout(12345);
        clearTimeout('not an id');",
    )
    .unwrap();
    assert_eq!(agent.pending_jobs(), 0);
    assert_eq!(agent.run_jobs_until(100).unwrap(), 0);
    assert!(host.take_lines().is_empty());
    assert_eq!(agent.now(), 100);
}

#[test]
fn interval_can_cancel_itself() {
    let (mut agent, _) = new_agent();
    evaluate(
        &mut agent,
        "
        var ticks = 0;
        var id = setInterval(function () {
            ticks++;
            if (ticks === 3) clearInterval(id);
        }, 10);",
    )
    .unwrap();
    assert_eq!(agent.run_jobs_until(1000).unwrap(), 3);
    assert_eq!(evaluate_repr(&mut agent, "ticks"), "3");
    assert_eq!(agent.pending_jobs(), 0);
}

#[test]
fn callbacks_can_schedule_more_work() {
    let (mut agent, host) = new_agent();
    evaluate(
        &mut agent,
        "
        setTimeout(function () {
            console.log('outer');
            setTimeout(function () { console.log('inner'); }, 0);
        }, 10);",
    )
    .unwrap();
    assert_eq!(agent.run_jobs_until(10).unwrap(), 1);
    assert_eq!(agent.run_jobs_until(11).unwrap(), 1);
    assert_eq!(host.take_lines(), ["outer", "inner"]);
}

#[test]
fn zero_delay_timers_keep_scheduling_order() {
    let (mut agent, host) = new_agent();
    evaluate(
        &mut agent,
        "
        var id = setInterval(function tick() { console.log('interval'); }, 0);
        setTimeout(() => console.log('timeout'), 0);
        setTimeout(() => console.log('negative'), -5);",
    )
    .unwrap();
    assert_eq!(agent.next_job_due(), Some(1));
    assert_eq!(agent.run_jobs_until(1).unwrap(), 3);
    assert_eq!(host.take_lines(), ["interval", "timeout", "negative"]);
    evaluate(&mut agent, "clearInterval(id)").unwrap();
}

#[test]
fn run_next_job_advances_the_clock() {
    let (mut agent, _) = new_agent();
    evaluate(&mut agent, "setTimeout(function () {}, 500)").unwrap();
    assert!(matches!(agent.run_next_job(), Some(Ok(()))));
    assert_eq!(agent.now(), 500);
    assert!(agent.run_next_job().is_none());
}

#[test]
fn uncaught_exception_stops_the_run() {
    let (mut agent, host) = new_agent();
    evaluate(
        &mut agent,
        "
        setTimeout(() => { throw new Error('boom'); }, 1);
        setTimeout(() => console.log('after'), 2);",
    )
    .unwrap();
    let error = agent.run_jobs_until(10).unwrap_err();
    assert_eq!(error.to_string(&mut agent), "Error: boom");
    assert_eq!(agent.now(), 1);
    assert_eq!(agent.run_jobs_until(10).unwrap(), 1);
    assert_eq!(host.take_lines(), ["after"]);
}

#[test]
fn callback_must_be_callable() {
    let (mut agent, _) = new_agent();
    assert_eq!(
        evaluate_error(&mut agent, "setTimeout(42, 10)"),
        "TypeError: The \"callback\" argument must be of type function. Received 42"
    );
}
