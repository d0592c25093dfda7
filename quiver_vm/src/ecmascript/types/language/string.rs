// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{ecmascript::execution::Agent, heap::HeapString};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringHeapData {
    data: Box<str>,
}

impl From<&str> for StringHeapData {
    fn from(data: &str) -> Self {
        Self { data: data.into() }
    }
}

impl StringHeapData {
    pub(crate) fn as_str(&self) -> &str {
        &self.data
    }
}

impl HeapString {
    pub fn from_str(agent: &mut Agent, data: &str) -> Self {
        agent.heap.create_string(data)
    }

    pub fn as_str<'b>(self, agent: &'b Agent<'_>) -> &'b str {
        agent[self].as_str()
    }

    pub fn is_empty(self, agent: &Agent) -> bool {
        agent[self].as_str().is_empty()
    }

    /// Length in UTF-16 code units, as observed through `.length`.
    pub fn utf16_len(self, agent: &Agent) -> usize {
        agent[self].as_str().encode_utf16().count()
    }
}
