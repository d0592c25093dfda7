// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use common::{evaluate, evaluate_repr, new_agent, new_agent_with, read_source};
use quiver_vm::AgentOptions;

#[test]
fn unreachable_objects_are_reclaimed() {
    let (mut agent, _) = new_agent();
    agent.gc();
    let baseline = agent.heap_statistics();
    evaluate(
        &mut agent,
        "
        (function () {
            var garbage = [];
            for (var i = 0; i < 100; i++) {
                garbage.push({ index: i });
            }
        })();",
    )
    .unwrap();
    assert!(agent.heap_statistics().objects >= baseline.objects + 100);
    agent.gc();
    let after = agent.heap_statistics();
    assert_eq!(after.objects, baseline.objects);
    assert_eq!(after.function_environments, baseline.function_environments);
}

#[test]
fn pending_timers_keep_their_closures_alive() {
    let (mut agent, _) = new_agent();
    evaluate(
        &mut agent,
        "
        var ticks = 0;
        (function () {
            var state = { count: 0 };
            setInterval(() => {
                state.count++;
                ticks = state.count;
            }, 10);
        })();",
    )
    .unwrap();
    agent.gc();
    agent.run_jobs_until(30).unwrap();
    agent.gc();
    agent.run_jobs_until(50).unwrap();
    assert_eq!(evaluate_repr(&mut agent, "ticks"), "5");
}

#[test]
fn scenarios_survive_collection_between_timer_runs() {
    let (mut agent, host) = new_agent();
    evaluate(&mut agent, &read_source("deferredReceiver.test.js")).unwrap();
    evaluate(&mut agent, "r = null;").unwrap();
    agent.gc();
    agent.run_jobs_until(100).unwrap();
    assert_eq!(host.take_lines(), ["undefined", "42"]);
}

#[test]
fn disabled_gc_keeps_everything() {
    let (mut agent, _) = new_agent_with(AgentOptions {
        disable_gc: true,
        ..Default::default()
    });
    evaluate(&mut agent, "(function () { var o = {}; })();").unwrap();
    let before = agent.heap_statistics();
    agent.gc();
    assert_eq!(agent.heap_statistics(), before);
}
