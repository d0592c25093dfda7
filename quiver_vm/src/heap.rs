// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub(crate) mod heap_gc;
pub(crate) mod indexes;

use ahash::AHashMap;

pub use indexes::{
    Array, BoundFunction, BuiltinFunction, ECMAScriptFunction, HeapString, OrdinaryObject,
};

use crate::ecmascript::{
    builtins::{
        ArrayHeapData, BoundFunctionHeapData, BuiltinFunctionHeapData, ECMAScriptFunctionHeapData,
    },
    execution::Environments,
    types::{ObjectHeapData, StringHeapData, Value},
};

/// All objects, strings, functions and environment records of an agent.
///
/// Entries are addressed by the index types in [`indexes`]; a slot becomes
/// `None` once the garbage collector has found it unreachable.
#[derive(Debug, Default)]
pub(crate) struct Heap<'a> {
    pub(crate) objects: Vec<Option<ObjectHeapData>>,
    pub(crate) arrays: Vec<Option<ArrayHeapData>>,
    pub(crate) strings: Vec<Option<StringHeapData>>,
    /// Interning table: every live string appears here exactly once.
    pub(crate) string_lookup: AHashMap<Box<str>, HeapString>,
    pub(crate) ecmascript_functions: Vec<Option<ECMAScriptFunctionHeapData<'a>>>,
    pub(crate) builtin_functions: Vec<Option<BuiltinFunctionHeapData>>,
    pub(crate) bound_functions: Vec<Option<BoundFunctionHeapData>>,
    pub(crate) environments: Environments,
}

/// Counts of live heap entries, as observed by embedders and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeapStatistics {
    pub objects: usize,
    pub arrays: usize,
    pub strings: usize,
    pub functions: usize,
    pub declarative_environments: usize,
    pub function_environments: usize,
}

fn count_live<T>(vec: &[Option<T>]) -> usize {
    vec.iter().filter(|entry| entry.is_some()).count()
}

impl<'a> Heap<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the interned heap string for `data`, allocating it on first
    /// use.
    pub(crate) fn create_string(&mut self, data: &str) -> HeapString {
        if let Some(string) = self.string_lookup.get(data) {
            return *string;
        }
        self.strings.push(Some(StringHeapData::from(data)));
        let string = HeapString::last(&self.strings);
        self.string_lookup.insert(data.into(), string);
        string
    }

    pub(crate) fn create_object(&mut self, prototype: Option<OrdinaryObject>) -> OrdinaryObject {
        self.objects.push(Some(ObjectHeapData::new(prototype)));
        OrdinaryObject::last(&self.objects)
    }

    pub(crate) fn create_array(&mut self, elements: Vec<Value>) -> Array {
        self.arrays.push(Some(ArrayHeapData::new(elements)));
        Array::last(&self.arrays)
    }

    pub(crate) fn create_ecmascript_function(
        &mut self,
        data: ECMAScriptFunctionHeapData<'a>,
    ) -> ECMAScriptFunction {
        self.ecmascript_functions.push(Some(data));
        ECMAScriptFunction::last(&self.ecmascript_functions)
    }

    pub(crate) fn create_builtin_function(
        &mut self,
        data: BuiltinFunctionHeapData,
    ) -> BuiltinFunction {
        self.builtin_functions.push(Some(data));
        BuiltinFunction::last(&self.builtin_functions)
    }

    pub(crate) fn create_bound_function(&mut self, data: BoundFunctionHeapData) -> BoundFunction {
        self.bound_functions.push(Some(data));
        BoundFunction::last(&self.bound_functions)
    }

    pub(crate) fn statistics(&self) -> HeapStatistics {
        HeapStatistics {
            objects: count_live(&self.objects),
            arrays: count_live(&self.arrays),
            strings: count_live(&self.strings),
            functions: count_live(&self.ecmascript_functions)
                + count_live(&self.builtin_functions)
                + count_live(&self.bound_functions),
            declarative_environments: count_live(&self.environments.declarative),
            function_environments: count_live(&self.environments.function),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_are_interned() {
        let mut heap = Heap::new();
        let a = heap.create_string("value");
        let b = heap.create_string("value");
        let c = heap.create_string("age");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(heap.statistics().strings, 2);
    }

    #[test]
    fn objects_get_distinct_indexes() {
        let mut heap = Heap::new();
        let proto = heap.create_object(None);
        let object = heap.create_object(Some(proto));
        assert_ne!(proto, object);
        assert_eq!(heap.objects[object].prototype, Some(proto));
    }
}
