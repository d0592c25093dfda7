// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod agent;
mod default_host_hooks;
pub(crate) mod environments;
mod execution_context;
pub(crate) mod jobs;
mod realm;

pub use agent::{Agent, AgentOptions, ExceptionType, HostHooks, JsError, JsResult};
pub use default_host_hooks::DefaultHostHooks;
pub(crate) use environments::Environments;
pub use environments::{
    DeclarativeEnvironment, Environment, FunctionEnvironment, GlobalEnvironment,
    ThisBindingStatus, get_this_environment,
};
pub(crate) use execution_context::{ECMAScriptCode, ExecutionContext};
pub use jobs::TimerId;
pub(crate) use realm::{Intrinsics, Realm};
