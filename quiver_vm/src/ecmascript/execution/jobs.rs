// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deferred callbacks scheduled by `setTimeout` and `setInterval`.
//!
//! Time is virtual: the queue's clock only advances when the embedder runs
//! jobs, and it jumps straight to the due time of the job being run. A job
//! never runs during the synchronous code that scheduled it.

use std::collections::BTreeMap;

use crate::{
    ecmascript::types::{Function, Value},
    heap::heap_gc::{HeapMarkAndSweep, WorkQueues},
};

/// Identifier returned by `setTimeout` and `setInterval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

/// Delays shorter than this are clamped to it, for timeouts and intervals
/// alike. A zero-delay interval would otherwise never let the clock move.
const MINIMUM_DELAY: u64 = 1;

#[derive(Debug, Clone)]
pub(crate) struct Job {
    pub(crate) id: TimerId,
    pub(crate) callback: Function,
    pub(crate) arguments: Box<[Value]>,
    /// Repeat period in milliseconds for `setInterval` jobs.
    pub(crate) interval: Option<u64>,
}

impl HeapMarkAndSweep for Job {
    fn mark_values(&self, queues: &mut WorkQueues) {
        self.callback.mark_values(queues);
        self.arguments.mark_values(queues);
    }
}

/// Pending jobs keyed by due time, then by scheduling order.
#[derive(Debug, Default)]
pub(crate) struct JobQueue {
    now: u64,
    next_id: u32,
    next_sequence: u64,
    jobs: BTreeMap<(u64, u64), Job>,
}

impl JobQueue {
    /// Current virtual time in milliseconds.
    pub(crate) fn now(&self) -> u64 {
        self.now
    }

    pub(crate) fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Due time of the earliest pending job.
    pub(crate) fn next_due(&self) -> Option<u64> {
        self.jobs.first_key_value().map(|((due, _), _)| *due)
    }

    fn insert(&mut self, due: u64, job: Job) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.jobs.insert((due, sequence), job);
    }

    /// Schedules `callback` to run `delay` milliseconds from now, and every
    /// `delay` milliseconds thereafter if `repeat` is set.
    pub(crate) fn schedule(
        &mut self,
        callback: Function,
        arguments: Box<[Value]>,
        delay: u64,
        repeat: bool,
    ) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let delay = delay.max(MINIMUM_DELAY);
        let interval = repeat.then_some(delay);
        let due = self.now.saturating_add(delay);
        self.insert(
            due,
            Job {
                id,
                callback,
                arguments,
                interval,
            },
        );
        id
    }

    /// Removes a pending job. Unknown or already finished ids are ignored.
    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.jobs.len();
        self.jobs.retain(|_, job| job.id != id);
        before != self.jobs.len()
    }

    /// Takes the earliest job due at or before `deadline`, advancing the
    /// clock to its due time. Interval jobs are re-enqueued before they are
    /// returned, so a callback can cancel its own interval.
    pub(crate) fn pop_due(&mut self, deadline: Option<u64>) -> Option<Job> {
        let due = self.next_due()?;
        if deadline.is_some_and(|deadline| due > deadline) {
            return None;
        }
        let (_, job) = self.jobs.pop_first()?;
        self.now = self.now.max(due);
        if let Some(interval) = job.interval {
            self.insert(self.now.saturating_add(interval), job.clone());
        }
        Some(job)
    }

    /// Moves the clock forward without running anything.
    pub(crate) fn advance_to(&mut self, time: u64) {
        self.now = self.now.max(time);
    }
}

impl HeapMarkAndSweep for JobQueue {
    fn mark_values(&self, queues: &mut WorkQueues) {
        self.jobs.values().for_each(|job| job.mark_values(queues));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::BuiltinFunction;

    fn callback(index: usize) -> Function {
        Function::BuiltinFunction(BuiltinFunction::from_index(index))
    }

    #[test]
    fn jobs_run_by_due_time_then_scheduling_order() {
        let mut queue = JobQueue::default();
        let late = queue.schedule(callback(0), Box::new([]), 20, false);
        let first = queue.schedule(callback(1), Box::new([]), 10, false);
        let second = queue.schedule(callback(2), Box::new([]), 10, false);
        let order: Vec<TimerId> = std::iter::from_fn(|| queue.pop_due(None))
            .map(|job| job.id)
            .collect();
        assert_eq!(order, vec![first, second, late]);
        assert_eq!(queue.now(), 20);
    }

    #[test]
    fn intervals_reschedule_until_cancelled() {
        let mut queue = JobQueue::default();
        let id = queue.schedule(callback(0), Box::new([]), 1000, true);
        assert_eq!(queue.pop_due(Some(2500)).map(|job| job.id), Some(id));
        assert_eq!(queue.pop_due(Some(2500)).map(|job| job.id), Some(id));
        assert!(queue.pop_due(Some(2500)).is_none());
        assert_eq!(queue.now(), 2000);
        assert_eq!(queue.next_due(), Some(3000));
        assert!(queue.cancel(id));
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn zero_delays_are_clamped() {
        let mut queue = JobQueue::default();
        let interval = queue.schedule(callback(0), Box::new([]), 0, true);
        let timeout = queue.schedule(callback(1), Box::new([]), 0, false);
        assert_eq!(queue.next_due(), Some(1));
        assert_eq!(queue.pop_due(Some(1)).map(|job| job.id), Some(interval));
        assert_eq!(queue.pop_due(Some(1)).map(|job| job.id), Some(timeout));
        assert_eq!(queue.next_due(), Some(2));
    }

    #[test]
    fn cancelling_unknown_ids_is_a_no_op() {
        let mut queue = JobQueue::default();
        assert!(!queue.cancel(TimerId(7)));
    }
}
