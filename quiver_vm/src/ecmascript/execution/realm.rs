// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{GlobalEnvironment, agent::ExceptionType, environments::new_global_environment};
use crate::heap::{
    Heap, OrdinaryObject,
    heap_gc::{HeapMarkAndSweep, WorkQueues},
};

/// The well-known intrinsic objects of the realm.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Intrinsics {
    /// %Object.prototype%
    pub(crate) object_prototype: OrdinaryObject,
    /// %Function.prototype%
    pub(crate) function_prototype: OrdinaryObject,
    /// %Array.prototype%
    pub(crate) array_prototype: OrdinaryObject,
    /// %Error.prototype%
    pub(crate) error_prototype: OrdinaryObject,
    /// %RangeError.prototype%
    pub(crate) range_error_prototype: OrdinaryObject,
    /// %ReferenceError.prototype%
    pub(crate) reference_error_prototype: OrdinaryObject,
    /// %SyntaxError.prototype%
    pub(crate) syntax_error_prototype: OrdinaryObject,
    /// %TypeError.prototype%
    pub(crate) type_error_prototype: OrdinaryObject,
}

impl Intrinsics {
    /// ### [9.3.2 CreateIntrinsics ( realmRec )](https://tc39.es/ecma262/#sec-createintrinsics)
    ///
    /// Allocates the intrinsic objects. Their properties are installed once
    /// the agent exists.
    fn create(heap: &mut Heap) -> Self {
        let object_prototype = heap.create_object(None);
        let function_prototype = heap.create_object(Some(object_prototype));
        let array_prototype = heap.create_object(Some(object_prototype));
        let error_prototype = heap.create_object(Some(object_prototype));
        Self {
            object_prototype,
            function_prototype,
            array_prototype,
            error_prototype,
            range_error_prototype: heap.create_object(Some(error_prototype)),
            reference_error_prototype: heap.create_object(Some(error_prototype)),
            syntax_error_prototype: heap.create_object(Some(error_prototype)),
            type_error_prototype: heap.create_object(Some(error_prototype)),
        }
    }

    pub(crate) fn error_prototype_for(&self, kind: ExceptionType) -> OrdinaryObject {
        match kind {
            ExceptionType::Error => self.error_prototype,
            ExceptionType::RangeError => self.range_error_prototype,
            ExceptionType::ReferenceError => self.reference_error_prototype,
            ExceptionType::SyntaxError => self.syntax_error_prototype,
            ExceptionType::TypeError => self.type_error_prototype,
        }
    }
}

impl HeapMarkAndSweep for Intrinsics {
    fn mark_values(&self, queues: &mut WorkQueues) {
        let Self {
            object_prototype,
            function_prototype,
            array_prototype,
            error_prototype,
            range_error_prototype,
            reference_error_prototype,
            syntax_error_prototype,
            type_error_prototype,
        } = self;
        object_prototype.mark_values(queues);
        function_prototype.mark_values(queues);
        array_prototype.mark_values(queues);
        error_prototype.mark_values(queues);
        range_error_prototype.mark_values(queues);
        reference_error_prototype.mark_values(queues);
        syntax_error_prototype.mark_values(queues);
        type_error_prototype.mark_values(queues);
    }
}

/// ### [9.3 Realms](https://tc39.es/ecma262/#sec-code-realms)
///
/// Before it is evaluated, all ECMAScript code must be associated with a
/// realm. An agent owns exactly one realm.
#[derive(Debug)]
pub(crate) struct Realm {
    /// ### \[\[Intrinsics\]\]
    pub(crate) intrinsics: Intrinsics,

    /// ### \[\[GlobalObject\]\]
    pub(crate) global_object: OrdinaryObject,

    /// ### \[\[GlobalEnv\]\]
    pub(crate) global_env: GlobalEnvironment,
}

impl Realm {
    /// ### [9.3.1 CreateRealm ( )](https://tc39.es/ecma262/#sec-createrealm)
    /// ### [9.3.3 SetRealmGlobalObject ( realmRec, globalObj, thisValue )](https://tc39.es/ecma262/#sec-setrealmglobalobject)
    pub(crate) fn create(heap: &mut Heap) -> Self {
        let intrinsics = Intrinsics::create(heap);
        // 1. If globalObj is undefined, then
        //    a. Let intrinsics be realmRec.[[Intrinsics]].
        //    b. Set globalObj to OrdinaryObjectCreate(intrinsics.[[%Object.prototype%]]).
        let global_object = heap.create_object(Some(intrinsics.object_prototype));
        // 2. Assert: globalObj is an Object.
        // 3. If thisValue is undefined, set thisValue to globalObj.
        // 5. Set realmRec.[[GlobalObject]] to globalObj.
        // 6. Let newGlobalEnv be NewGlobalEnvironment(globalObj, thisValue).
        let global_env = new_global_environment(&mut heap.environments, global_object, global_object);
        // 7. Set realmRec.[[GlobalEnv]] to newGlobalEnv.
        Self {
            intrinsics,
            global_object,
            global_env,
        }
    }
}

impl HeapMarkAndSweep for Realm {
    fn mark_values(&self, queues: &mut WorkQueues) {
        self.intrinsics.mark_values(queues);
        self.global_object.mark_values(queues);
        self.global_env.mark_values(queues);
    }
}
