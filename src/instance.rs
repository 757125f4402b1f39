use crate::compiler::CompiledFunc;
use crate::const_eval::ConstExprEvaluator;
use crate::errors::LinkError;
use crate::func::{Func, FuncData};
use crate::global::{Global, GlobalData};
use crate::indices::{
    DefinedFuncIndex, EntityIndex, FuncIndex, GlobalIndex, MemoryIndex, TableIndex,
};
use crate::interp;
use crate::linker::Linker;
use crate::memory::{Memory, MemoryData};
use crate::module::Module;
use crate::store::{ExternId, FuncId, GlobalId, InstanceId, MemoryId, Store, TableId};
use crate::table::{Table, TableData};
use crate::types::Limits;
use alloc::string::String;
use alloc::vec::Vec;
use cranelift_entity::PrimaryMap;
use hashbrown::HashMap;

/// The runtime identity of one instantiated module (decoded or host):
/// its four index spaces resolved to store-level entities, imports
/// interleaved before definitions.
#[derive(Default)]
pub(crate) struct InstanceData {
    /// `None` for host instances.
    pub(crate) module: Option<Module>,
    pub(crate) funcs: PrimaryMap<FuncIndex, FuncId>,
    pub(crate) tables: PrimaryMap<TableIndex, TableId>,
    pub(crate) memories: PrimaryMap<MemoryIndex, MemoryId>,
    pub(crate) globals: PrimaryMap<GlobalIndex, GlobalId>,
    pub(crate) exports: HashMap<String, EntityIndex>,
    /// Compiled entry points, present only when the store has a compiler.
    pub(crate) compiled: PrimaryMap<DefinedFuncIndex, CompiledFunc>,
}

impl InstanceData {
    pub(crate) fn lookup(&self, index: EntityIndex) -> ExternId {
        match index {
            EntityIndex::Function(i) => ExternId::Func(self.funcs[i]),
            EntityIndex::Table(i) => ExternId::Table(self.tables[i]),
            EntityIndex::Memory(i) => ExternId::Memory(self.memories[i]),
            EntityIndex::Global(i) => ExternId::Global(self.globals[i]),
        }
    }
}

/// A handle to an instantiated module.
#[derive(Debug, Clone, Copy)]
pub struct Instance(pub(crate) InstanceId);

impl Instance {
    /// Instantiates `module`: resolves its imports against `linker`,
    /// allocates its definitions, runs initializers and the `start`
    /// function.
    pub(crate) fn new_internal(
        store: &mut Store,
        linker: &Linker,
        const_eval: &mut ConstExprEvaluator,
        module: &Module,
    ) -> crate::Result<Instance> {
        let decoded = module.decoded();
        let id = store.instances.push(InstanceData::default());

        let mut funcs = PrimaryMap::with_capacity(decoded.functions.len());
        let mut tables = PrimaryMap::with_capacity(decoded.tables.len());
        let mut memories = PrimaryMap::with_capacity(decoded.memories.len());
        let mut globals = PrimaryMap::with_capacity(decoded.globals.len());

        // Imports first: each resolved entity occupies the next row of its
        // index space, so imported items precede defined ones.
        for import in &decoded.imports {
            let resolved = linker.resolve(store, &import.module, &import.field)?;
            let mismatch = || LinkError::ImportTypeMismatch {
                module: import.module.clone(),
                field: import.field.clone(),
            };

            match (import.index, resolved) {
                (EntityIndex::Function(index), ExternId::Func(fid)) => {
                    let expected = module.func_type_of(index);
                    if store.funcs[fid].ty() != expected {
                        return Err(mismatch().into());
                    }
                    funcs.push(fid);
                }
                (EntityIndex::Table(index), ExternId::Table(tid)) => {
                    let required = decoded.tables[index];
                    if !limits_match(store.tables[tid].ty().limits, required.limits) {
                        return Err(mismatch().into());
                    }
                    tables.push(tid);
                }
                (EntityIndex::Memory(index), ExternId::Memory(mid)) => {
                    let required = decoded.memories[index];
                    if !limits_match(store.memories[mid].ty().limits, required.limits) {
                        return Err(mismatch().into());
                    }
                    memories.push(mid);
                }
                (EntityIndex::Global(index), ExternId::Global(gid)) => {
                    if store.globals[gid].ty() != decoded.globals[index] {
                        return Err(mismatch().into());
                    }
                    globals.push(gid);
                }
                _ => {
                    return Err(LinkError::ImportKindMismatch {
                        module: import.module.clone(),
                        field: import.field.clone(),
                    }
                    .into())
                }
            }
        }

        for def in 0..decoded.num_defined_funcs() {
            let fid = store.funcs.push(FuncData::Wasm {
                instance: id,
                module: module.clone(),
                def: DefinedFuncIndex::from_u32(def),
            });
            funcs.push(fid);
        }

        for (index, ty) in decoded.tables.iter() {
            if !decoded.is_imported_table(index) {
                tables.push(store.tables.push(TableData::new(*ty)));
            }
        }

        for (index, ty) in decoded.memories.iter() {
            if !decoded.is_imported_memory(index) {
                memories.push(store.memories.push(MemoryData::new(*ty)));
            }
        }

        for (defined, init) in decoded.global_initializers.iter() {
            let index = decoded.global_index(defined);
            let value = const_eval.eval(store, decoded, &globals, *init);
            globals.push(store.globals.push(GlobalData::new(decoded.globals[index], value)));
        }

        for segment in &decoded.element_segments {
            let offset = const_eval.eval(store, decoded, &globals, segment.offset).get_u32();
            let indices = decoded.u32s(segment.funcs);

            let end = u64::from(offset) + indices.len() as u64;
            let end = u32::try_from(end).map_err(|_| LinkError::TableCapacityExceeded)?;

            let tid = tables[segment.table];
            if !store.tables[tid].grow_to(end) {
                return Err(LinkError::TableCapacityExceeded.into());
            }
            for (i, func) in indices.iter().enumerate() {
                let fid = funcs[FuncIndex::from_u32(*func)];
                store.tables[tid]
                    .set(offset + i as u32, Some(fid))
                    .expect("slot within grown table");
            }
        }

        for segment in &decoded.data_segments {
            let offset = const_eval.eval(store, decoded, &globals, segment.offset).get_u32();
            let bytes = decoded.bytes(segment.bytes);

            let mid = memories[segment.memory];
            let data = store.memories[mid].data_mut();
            let end = u64::from(offset) + bytes.len() as u64;
            if end > data.len() as u64 {
                return Err(LinkError::DataSegmentOutOfBounds.into());
            }
            data[offset as usize..end as usize].copy_from_slice(bytes);
        }

        // Compile up front when the store carries a compiler.
        let mut compiled = PrimaryMap::new();
        if store.compiler.is_some() {
            let mut entries = Vec::with_capacity(decoded.code.len());
            for (def, _) in decoded.code.iter() {
                let compiler = store.compiler.as_mut().expect("checked above");
                entries.push(compiler.compile(module, def)?);
            }
            for entry in entries {
                compiled.push(entry);
            }
        }

        store.instances[id] = InstanceData {
            module: Some(module.clone()),
            funcs,
            tables,
            memories,
            globals,
            exports: decoded.exports.clone(),
            compiled,
        };

        let instance = Instance(id);
        if let Some(start) = decoded.start {
            let fid = store.instances[id].funcs[start];
            tracing::trace!("running start function of instance {id:?}");
            interp::call_func(store, fid)?;
        }

        Ok(instance)
    }

    fn export_index(&self, store: &Store, name: &str) -> Option<EntityIndex> {
        store.instances[self.0].exports.get(name).copied()
    }

    /// Looks up an exported function by name.
    pub fn get_func(&self, store: &Store, name: &str) -> Option<Func> {
        match self.export_index(store, name)? {
            EntityIndex::Function(i) => Some(Func(store.instances[self.0].funcs[i])),
            _ => None,
        }
    }

    /// Looks up an exported memory by name.
    pub fn get_memory(&self, store: &Store, name: &str) -> Option<Memory> {
        match self.export_index(store, name)? {
            EntityIndex::Memory(i) => Some(Memory(store.instances[self.0].memories[i])),
            _ => None,
        }
    }

    /// Looks up an exported table by name.
    pub fn get_table(&self, store: &Store, name: &str) -> Option<Table> {
        match self.export_index(store, name)? {
            EntityIndex::Table(i) => Some(Table(store.instances[self.0].tables[i])),
            _ => None,
        }
    }

    /// Looks up an exported global by name.
    pub fn get_global(&self, store: &Store, name: &str) -> Option<Global> {
        match self.export_index(store, name)? {
            EntityIndex::Global(i) => Some(Global(store.instances[self.0].globals[i])),
            _ => None,
        }
    }
}

/// Import limits match when the candidate is at least as big and at most
/// as bounded as the declaration requires.
fn limits_match(actual: Limits, required: Limits) -> bool {
    if actual.min < required.min {
        return false;
    }
    match required.max {
        None => true,
        Some(required_max) => actual.max.is_some_and(|max| max <= required_max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_matching() {
        let limits = |min, max| Limits { min, max };
        assert!(limits_match(limits(1, None), limits(1, None)));
        assert!(limits_match(limits(2, Some(3)), limits(1, None)));
        assert!(limits_match(limits(1, Some(2)), limits(1, Some(4))));
        assert!(!limits_match(limits(0, None), limits(1, None)));
        assert!(!limits_match(limits(1, None), limits(1, Some(4))));
        assert!(!limits_match(limits(1, Some(8)), limits(1, Some(4))));
    }
}
