use crate::const_eval::ConstExprEvaluator;
use crate::errors::LinkError;
use crate::func::FuncData;
use crate::global::GlobalData;
use crate::host::HostModule;
use crate::indices::EntityIndex;
use crate::instance::{Instance, InstanceData};
use crate::memory::MemoryData;
use crate::module::Module;
use crate::store::{ExternId, InstanceId, Store};
use alloc::string::{String, ToString};
use hashbrown::HashMap;

/// Registers instances (decoded or host) under module names and resolves
/// imports against them.
#[derive(Default)]
pub struct Linker {
    instances: HashMap<String, InstanceId>,
}

impl Linker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiates `module` against everything defined so far.
    pub fn instantiate(
        &self,
        store: &mut Store,
        const_eval: &mut ConstExprEvaluator,
        module: &Module,
    ) -> crate::Result<Instance> {
        Instance::new_internal(store, self, const_eval, module)
    }

    /// Makes `instance`'s exports importable under `name`.
    pub fn define_instance(
        &mut self,
        name: impl Into<String>,
        instance: Instance,
    ) -> crate::Result<()> {
        let name = name.into();
        if self.instances.contains_key(&name) {
            return Err(LinkError::AlreadyDefined(name).into());
        }
        self.instances.insert(name, instance.0);
        Ok(())
    }

    /// Instantiates a host module and makes it importable under `name`.
    pub fn define_host(
        &mut self,
        store: &mut Store,
        name: impl Into<String>,
        host: HostModule,
    ) -> crate::Result<Instance> {
        let name = name.into();
        if self.instances.contains_key(&name) {
            return Err(LinkError::AlreadyDefined(name).into());
        }

        let mut data = InstanceData::default();
        for decl in host.funcs {
            let fid = store.funcs.push(FuncData::Host {
                ty: decl.ty,
                callee: decl.func,
            });
            let index = data.funcs.push(fid);
            data.exports.insert(decl.name, EntityIndex::Function(index));
        }
        for (field, ty) in host.memories {
            let mid = store.memories.push(MemoryData::new(ty));
            let index = data.memories.push(mid);
            data.exports.insert(field, EntityIndex::Memory(index));
        }
        for (field, ty, val) in host.globals {
            let gid = store.globals.push(GlobalData::new(ty, val.as_vmval()));
            let index = data.globals.push(gid);
            data.exports.insert(field, EntityIndex::Global(index));
        }

        let id = store.instances.push(data);
        self.instances.insert(name, id);
        Ok(Instance(id))
    }

    /// The instance defined under `name`, if any.
    pub fn instance(&self, name: &str) -> Option<Instance> {
        self.instances.get(name).copied().map(Instance)
    }

    pub(crate) fn resolve(
        &self,
        store: &Store,
        module: &str,
        field: &str,
    ) -> Result<ExternId, LinkError> {
        let id = self
            .instances
            .get(module)
            .ok_or_else(|| LinkError::UnknownModule(module.to_string()))?;
        let data = &store.instances[*id];
        let index = data
            .exports
            .get(field)
            .copied()
            .ok_or_else(|| LinkError::UnknownImport {
                module: module.to_string(),
                field: field.to_string(),
            })?;
        Ok(data.lookup(index))
    }
}
