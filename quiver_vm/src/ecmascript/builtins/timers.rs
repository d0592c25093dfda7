// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `setTimeout`, `setInterval` and their cancellation functions.
//!
//! Callbacks are queued on the agent's job queue and later invoked without
//! a receiver, so an ordinary function callback sees the default `this`
//! while an arrow function keeps the one it captured.

use super::{ArgumentsList, Behaviour, Builtin, define_builtin_function};
use crate::{
    ecmascript::{
        abstract_operations::{testing_and_comparison::is_callable, type_conversion::to_number},
        execution::{Agent, JsResult, TimerId, agent::ExceptionType},
        types::Value,
    },
    heap::OrdinaryObject,
};

pub(crate) struct Timers;

struct SetTimeout;
impl Builtin for SetTimeout {
    const NAME: &'static str = "setTimeout";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(Timers::set_timeout);
}

struct SetInterval;
impl Builtin for SetInterval {
    const NAME: &'static str = "setInterval";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(Timers::set_interval);
}

struct ClearTimeout;
impl Builtin for ClearTimeout {
    const NAME: &'static str = "clearTimeout";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(Timers::clear_timer);
}

struct ClearInterval;
impl Builtin for ClearInterval {
    const NAME: &'static str = "clearInterval";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(Timers::clear_timer);
}

impl Timers {
    fn set_timeout(agent: &mut Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        Self::schedule(agent, arguments, false)
    }

    fn set_interval(agent: &mut Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        Self::schedule(agent, arguments, true)
    }

    /// Queues `callback(...args)` after `delay` milliseconds. A missing,
    /// negative or NaN delay counts as zero; the queue waits at least 1 ms.
    fn schedule(agent: &mut Agent, arguments: ArgumentsList, repeat: bool) -> JsResult<Value> {
        let callback = arguments.get(0);
        let Some(callback) = is_callable(callback) else {
            let message = format!(
                "The \"callback\" argument must be of type function. Received {}",
                callback.string_repr(agent)
            );
            return Err(agent.throw_exception(ExceptionType::TypeError, message));
        };
        let delay = to_number(agent, arguments.get(1))?;
        let delay = if delay.is_nan() || delay < 0.0 {
            0
        } else {
            delay.min(u64::MAX as f64) as u64
        };
        let callback_arguments: Box<[Value]> = arguments.0.get(2..).unwrap_or(&[]).into();
        let TimerId(id) = agent.schedule_job(callback, callback_arguments, delay, repeat);
        Ok(id.into())
    }

    /// Cancels a pending timer. Values that are not timer ids are ignored.
    fn clear_timer(agent: &mut Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        if let Value::Number(id) = arguments.get(0) {
            if id >= 1.0 && id <= u32::MAX as f64 && id.fract() == 0.0 {
                agent.cancel_job(TimerId(id as u32));
            }
        }
        Ok(Value::Undefined)
    }

    pub(crate) fn create_intrinsic(agent: &mut Agent, global: OrdinaryObject) {
        define_builtin_function::<SetTimeout>(agent, global);
        define_builtin_function::<SetInterval>(agent, global);
        define_builtin_function::<ClearTimeout>(agent, global);
        define_builtin_function::<ClearInterval>(agent, global);
    }
}
