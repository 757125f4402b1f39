use crate::errors::{Error, LinkError};
use crate::host::HostFn;
use crate::indices::DefinedFuncIndex;
use crate::interp;
use crate::module::Module;
use crate::store::{FuncId, InstanceId, Store};
use crate::types::FuncType;
use crate::values::Val;

/// How a store-level function is implemented.
pub(crate) enum FuncData {
    /// A function defined by a decoded module, run by the interpreter (or
    /// a compiled entry point when the store carries a compiler).
    Wasm {
        instance: InstanceId,
        module: Module,
        def: DefinedFuncIndex,
    },
    /// A host function; consumes its parameters from the operand stack and
    /// leaves its results in their place.
    Host { ty: FuncType, callee: HostFn },
}

impl FuncData {
    pub(crate) fn ty(&self) -> FuncType {
        match self {
            FuncData::Wasm { module, def, .. } => {
                module.func_type_of(module.decoded().func_index(*def))
            }
            FuncData::Host { ty, .. } => ty.clone(),
        }
    }
}

/// A handle to a function that lives in a [`Store`].
#[derive(Debug, Clone, Copy)]
pub struct Func(pub(crate) FuncId);

impl Func {
    pub fn ty(&self, store: &Store) -> FuncType {
        store.funcs[self.0].ty()
    }

    /// Calls the function with `params`, writing its results into
    /// `results`.
    ///
    /// # Errors
    ///
    /// Fails with [`LinkError::CallTypeMismatch`] when the argument or
    /// result slices don't match the signature, and with the trap when
    /// execution traps. A trapped call chain is unwound all the way back
    /// here; no partial results are visible.
    pub fn call(
        &self,
        store: &mut Store,
        params: &[Val],
        results: &mut [Val],
    ) -> crate::Result<()> {
        let ty = self.ty(store);
        if params.len() != ty.params().len() || results.len() != ty.results().len() {
            return Err(Error::Link(LinkError::CallTypeMismatch));
        }
        for (param, expected) in params.iter().zip(ty.params()) {
            if param.ty() != *expected {
                return Err(Error::Link(LinkError::CallTypeMismatch));
            }
        }

        let base = store.stack.len();
        for param in params {
            store.stack.push(param.as_vmval());
        }

        if let Err(trap) = interp::call_func(store, self.0) {
            store.stack.truncate(base);
            return Err(Error::Trap(trap));
        }

        debug_assert_eq!(store.stack.len(), base + results.len());
        for (i, (slot, ty)) in results.iter_mut().zip(ty.results()).enumerate() {
            *slot = Val::from_vmval(store.stack[base + i], *ty);
        }
        store.stack.truncate(base);

        Ok(())
    }
}
