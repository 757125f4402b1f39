//! The native-module interface: host-provided functions, memories and
//! globals that wasm modules can import.

use crate::store::Store;
use crate::traps::Trap;
use crate::types::{FuncType, GlobalType, Limits, MemoryType};
use crate::values::{VMVal, Val};
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

/// A host function body.
///
/// On entry the buffer holds the declared parameters in order; the function
/// writes its results in their place (the buffer is sized for whichever of
/// the two lists is longer). Returning a [`Trap`] aborts the calling wasm
/// execution.
pub type HostFn = Arc<dyn Fn(&mut Store, &mut [VMVal]) -> Result<(), Trap> + Send + Sync>;

pub(crate) struct HostFuncDecl {
    pub(crate) name: String,
    pub(crate) ty: FuncType,
    pub(crate) func: HostFn,
}

/// A named bundle of host functions, memories and globals.
///
/// Define one with [`Linker::define_host`] to make its entries importable
/// by decoded modules under the bundle's name.
///
/// [`Linker::define_host`]: crate::Linker::define_host
#[derive(Default)]
pub struct HostModule {
    pub(crate) funcs: Vec<HostFuncDecl>,
    pub(crate) memories: Vec<(String, MemoryType)>,
    pub(crate) globals: Vec<(String, GlobalType, Val)>,
}

impl HostModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a function under `name`.
    pub fn func(
        mut self,
        name: impl Into<String>,
        ty: FuncType,
        func: impl Fn(&mut Store, &mut [VMVal]) -> Result<(), Trap> + Send + Sync + 'static,
    ) -> Self {
        self.funcs.push(HostFuncDecl {
            name: name.into(),
            ty,
            func: Arc::new(func),
        });
        self
    }

    /// Adds a memory under `name` with the given limits, in pages.
    pub fn memory(mut self, name: impl Into<String>, min: u32, max: Option<u32>) -> Self {
        self.memories.push((
            name.into(),
            MemoryType {
                limits: Limits { min, max },
            },
        ));
        self
    }

    /// Adds a global under `name` with `val` as its initial value.
    pub fn global(mut self, name: impl Into<String>, mutable: bool, val: Val) -> Self {
        self.globals.push((
            name.into(),
            GlobalType {
                content: val.ty(),
                mutable,
            },
            val,
        ));
        self
    }
}
