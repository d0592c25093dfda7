// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    builtins::{ArrayHeapData, BoundFunctionHeapData, BuiltinFunctionHeapData},
    execution::Agent,
    types::{ObjectHeapData, StringHeapData},
};

/// Creates a heap index type for data stored in a `Vec<Option<$data>>` of
/// the [`Heap`](super::Heap).
///
/// Internally, the index is stored in a [`NonZeroU32`] with the index plus
/// one. This allows an `Option` of the index to stay the size of a `u32`.
macro_rules! create_heap_index {
    ($(#[$attr:meta])* $index: ident) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $index(core::num::NonZeroU32);

        impl core::fmt::Debug for $index {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}({})", stringify!($index), self.into_index())
            }
        }

        impl $index {
            pub(crate) const fn from_index(index: usize) -> Self {
                assert!(index < u32::MAX as usize);
                match core::num::NonZeroU32::new(index as u32 + 1) {
                    Some(value) => Self(value),
                    None => unreachable!(),
                }
            }

            pub(crate) const fn into_index(self) -> usize {
                self.0.get() as usize - 1
            }

            pub(crate) fn last<T>(vec: &[Option<T>]) -> Self {
                Self::from_index(vec.len() - 1)
            }
        }
    };
}

/// Implements indexing into the heap vector and the agent for a heap index.
macro_rules! impl_heap_index {
    ($index: ident, $data: ident, $entry: ident) => {
        impl core::ops::Index<$index> for Vec<Option<$data>> {
            type Output = $data;

            fn index(&self, index: $index) -> &Self::Output {
                self.get(index.into_index())
                    .expect(concat!(stringify!($index), " out of bounds"))
                    .as_ref()
                    .expect(concat!(stringify!($index), " slot empty"))
            }
        }

        impl core::ops::IndexMut<$index> for Vec<Option<$data>> {
            fn index_mut(&mut self, index: $index) -> &mut Self::Output {
                self.get_mut(index.into_index())
                    .expect(concat!(stringify!($index), " out of bounds"))
                    .as_mut()
                    .expect(concat!(stringify!($index), " slot empty"))
            }
        }

        impl core::ops::Index<$index> for Agent<'_> {
            type Output = $data;

            fn index(&self, index: $index) -> &Self::Output {
                &self.heap.$entry[index]
            }
        }

        impl core::ops::IndexMut<$index> for Agent<'_> {
            fn index_mut(&mut self, index: $index) -> &mut Self::Output {
                &mut self.heap.$entry[index]
            }
        }
    };
}

pub(crate) use create_heap_index;

create_heap_index!(
    /// An ordinary object on the heap.
    OrdinaryObject
);
create_heap_index!(
    /// An Array exotic object on the heap.
    Array
);
create_heap_index!(
    /// A heap-allocated, interned string. Two equal strings always share the
    /// same index.
    HeapString
);
create_heap_index!(
    /// A function object whose behaviour is given by ECMAScript source code.
    ECMAScriptFunction
);
create_heap_index!(
    /// A function object whose behaviour is given by a Rust function.
    BuiltinFunction
);
create_heap_index!(
    /// A function object created by `Function.prototype.bind`.
    BoundFunction
);

impl_heap_index!(OrdinaryObject, ObjectHeapData, objects);
impl_heap_index!(Array, ArrayHeapData, arrays);
impl_heap_index!(HeapString, StringHeapData, strings);
impl_heap_index!(BuiltinFunction, BuiltinFunctionHeapData, builtin_functions);
impl_heap_index!(BoundFunction, BoundFunctionHeapData, bound_functions);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_through_non_zero_storage() {
        let index = OrdinaryObject::from_index(0);
        assert_eq!(index.into_index(), 0);
        assert_eq!(
            core::mem::size_of::<Option<OrdinaryObject>>(),
            core::mem::size_of::<u32>()
        );
    }

    #[test]
    fn last_points_at_the_final_slot() {
        let slots: Vec<Option<()>> = vec![Some(()), None, Some(())];
        assert_eq!(HeapString::last(&slots).into_index(), 2);
    }
}
