// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mark-and-sweep garbage collection of the agent heap.
//!
//! Collection only happens when the embedder calls [`Agent::gc`] between
//! scripts or jobs, so no Rust code holds heap handles across a collection.
//! Swept slots are left empty rather than compacted; indexes held by live
//! data therefore never need to be rewritten.

use super::{
    Heap,
    indexes::{
        Array, BoundFunction, BuiltinFunction, ECMAScriptFunction, HeapString, OrdinaryObject,
    },
};
use crate::ecmascript::execution::{
    Agent, DeclarativeEnvironment, Environments, FunctionEnvironment, GlobalEnvironment,
};

/// Data that can hold references to other heap entries.
pub(crate) trait HeapMarkAndSweep {
    /// Pushes every heap entry referenced by `self` onto the work queues.
    fn mark_values(&self, queues: &mut WorkQueues);
}

impl<T: HeapMarkAndSweep> HeapMarkAndSweep for Option<T> {
    fn mark_values(&self, queues: &mut WorkQueues) {
        if let Some(content) = self {
            content.mark_values(queues);
        }
    }
}

impl<T: HeapMarkAndSweep> HeapMarkAndSweep for [T] {
    fn mark_values(&self, queues: &mut WorkQueues) {
        self.iter().for_each(|entry| entry.mark_values(queues));
    }
}

/// Entries found reachable but not yet traced.
#[derive(Debug, Default)]
pub(crate) struct WorkQueues {
    pub(crate) objects: Vec<OrdinaryObject>,
    pub(crate) arrays: Vec<Array>,
    pub(crate) strings: Vec<HeapString>,
    pub(crate) ecmascript_functions: Vec<ECMAScriptFunction>,
    pub(crate) builtin_functions: Vec<BuiltinFunction>,
    pub(crate) bound_functions: Vec<BoundFunction>,
    pub(crate) declarative_environments: Vec<DeclarativeEnvironment>,
    pub(crate) function_environments: Vec<FunctionEnvironment>,
    pub(crate) global_environments: Vec<GlobalEnvironment>,
}

impl WorkQueues {
    fn is_empty(&self) -> bool {
        self.objects.is_empty()
            && self.arrays.is_empty()
            && self.strings.is_empty()
            && self.ecmascript_functions.is_empty()
            && self.builtin_functions.is_empty()
            && self.bound_functions.is_empty()
            && self.declarative_environments.is_empty()
            && self.function_environments.is_empty()
            && self.global_environments.is_empty()
    }
}

macro_rules! impl_mark_index {
    ($index: ident, $queue: ident) => {
        impl HeapMarkAndSweep for $index {
            fn mark_values(&self, queues: &mut WorkQueues) {
                queues.$queue.push(*self);
            }
        }
    };
}

impl_mark_index!(OrdinaryObject, objects);
impl_mark_index!(Array, arrays);
impl_mark_index!(HeapString, strings);
impl_mark_index!(ECMAScriptFunction, ecmascript_functions);
impl_mark_index!(BuiltinFunction, builtin_functions);
impl_mark_index!(BoundFunction, bound_functions);
impl_mark_index!(DeclarativeEnvironment, declarative_environments);
impl_mark_index!(FunctionEnvironment, function_environments);
impl_mark_index!(GlobalEnvironment, global_environments);

/// Mark bits, one per heap slot.
#[derive(Debug)]
struct HeapBits {
    objects: Box<[bool]>,
    arrays: Box<[bool]>,
    strings: Box<[bool]>,
    ecmascript_functions: Box<[bool]>,
    builtin_functions: Box<[bool]>,
    bound_functions: Box<[bool]>,
    declarative_environments: Box<[bool]>,
    function_environments: Box<[bool]>,
    global_environments: Box<[bool]>,
}

impl HeapBits {
    fn new(heap: &Heap) -> Self {
        Self {
            objects: vec![false; heap.objects.len()].into_boxed_slice(),
            arrays: vec![false; heap.arrays.len()].into_boxed_slice(),
            strings: vec![false; heap.strings.len()].into_boxed_slice(),
            ecmascript_functions: vec![false; heap.ecmascript_functions.len()].into_boxed_slice(),
            builtin_functions: vec![false; heap.builtin_functions.len()].into_boxed_slice(),
            bound_functions: vec![false; heap.bound_functions.len()].into_boxed_slice(),
            declarative_environments: vec![false; heap.environments.declarative.len()]
                .into_boxed_slice(),
            function_environments: vec![false; heap.environments.function.len()]
                .into_boxed_slice(),
            global_environments: vec![false; heap.environments.global.len()].into_boxed_slice(),
        }
    }
}

/// Drains one work queue, marking each entry and tracing its contents.
macro_rules! mark_queue {
    ($queues: ident, $queue: ident, $bits: expr, $data: expr) => {{
        let mut marks: Box<[_]> = $queues.$queue.drain(..).collect();
        marks.sort();
        marks.iter().for_each(|&idx| {
            let index = idx.into_index();
            if let Some(marked) = $bits.get_mut(index) {
                if *marked {
                    // Already marked, ignore
                    return;
                }
                *marked = true;
                if let Some(Some(data)) = $data.get(index) {
                    data.mark_values(&mut $queues);
                }
            }
        });
    }};
}

/// Leaves only the marked slots of a heap vector occupied.
fn sweep_heap_vector_values<T>(vec: &mut [Option<T>], bits: &[bool]) {
    vec.iter_mut()
        .zip(bits.iter())
        .filter(|(_, marked)| !**marked)
        .for_each(|(slot, _)| *slot = None);
}

/// Collects every heap entry not reachable from the agent's roots: the
/// realm, the execution context stack and pending jobs.
pub(crate) fn heap_gc(agent: &mut Agent) {
    let mut queues = WorkQueues::default();
    agent.realm.mark_values(&mut queues);
    for context in agent.execution_context_stack.iter() {
        context.mark_values(&mut queues);
    }
    agent.job_queue.mark_values(&mut queues);

    let heap = &mut agent.heap;
    let mut bits = HeapBits::new(heap);

    while !queues.is_empty() {
        let Heap {
            objects,
            arrays,
            strings: _,
            string_lookup: _,
            ecmascript_functions,
            builtin_functions,
            bound_functions,
            environments,
        } = &*heap;
        let Environments {
            declarative,
            function,
            global,
        } = environments;

        mark_queue!(queues, objects, bits.objects, objects);
        mark_queue!(queues, arrays, bits.arrays, arrays);
        mark_queue!(queues, ecmascript_functions, bits.ecmascript_functions, ecmascript_functions);
        mark_queue!(queues, builtin_functions, bits.builtin_functions, builtin_functions);
        mark_queue!(queues, bound_functions, bits.bound_functions, bound_functions);
        mark_queue!(queues, declarative_environments, bits.declarative_environments, declarative);
        mark_queue!(queues, function_environments, bits.function_environments, function);
        mark_queue!(queues, global_environments, bits.global_environments, global);

        // Strings hold no references.
        queues.strings.drain(..).for_each(|string| {
            if let Some(marked) = bits.strings.get_mut(string.into_index()) {
                *marked = true;
            }
        });
    }

    sweep(heap, &bits);
}

fn sweep(heap: &mut Heap, bits: &HeapBits) {
    let Heap {
        objects,
        arrays,
        strings,
        string_lookup,
        ecmascript_functions,
        builtin_functions,
        bound_functions,
        environments,
    } = heap;
    let Environments {
        declarative,
        function,
        global,
    } = environments;

    sweep_heap_vector_values(objects, &bits.objects);
    sweep_heap_vector_values(arrays, &bits.arrays);
    sweep_heap_vector_values(strings, &bits.strings);
    string_lookup.retain(|_, string| bits.strings[string.into_index()]);
    sweep_heap_vector_values(ecmascript_functions, &bits.ecmascript_functions);
    sweep_heap_vector_values(builtin_functions, &bits.builtin_functions);
    sweep_heap_vector_values(bound_functions, &bits.bound_functions);
    sweep_heap_vector_values(declarative, &bits.declarative_environments);
    sweep_heap_vector_values(function, &bits.function_environments);
    sweep_heap_vector_values(global, &bits.global_environments);
}

#[cfg(test)]
mod tests {
    use super::sweep_heap_vector_values;

    #[test]
    fn sweep_empties_unmarked_slots() {
        let mut slots = vec![Some(1), Some(2), Some(3)];
        sweep_heap_vector_values(&mut slots, &[true, false, true]);
        assert_eq!(slots, vec![Some(1), None, Some(3)]);
    }
}
