use crate::compiler::Compiler;
use crate::func::FuncData;
use crate::global::GlobalData;
use crate::instance::InstanceData;
use crate::memory::MemoryData;
use crate::table::TableData;
use crate::values::VMVal;
use alloc::boxed::Box;
use alloc::vec::Vec;
use cranelift_entity::{entity_impl, PrimaryMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u32);
entity_impl!(InstanceId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FuncId(u32);
entity_impl!(FuncId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(u32);
entity_impl!(TableId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemoryId(u32);
entity_impl!(MemoryId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlobalId(u32);
entity_impl!(GlobalId);

/// A store-level reference to any linkable entity.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ExternId {
    Func(FuncId),
    Table(TableId),
    Memory(MemoryId),
    Global(GlobalId),
}

/// Owns all instantiated runtime state: every instance's functions,
/// tables, memories and globals across all modules, plus the shared
/// operand stack the interpreter and host functions run against.
///
/// A store is single-threaded by contract: one caller drives it at a time
/// and every call runs synchronously to completion.
#[derive(Default)]
pub struct Store {
    pub(crate) instances: PrimaryMap<InstanceId, InstanceData>,
    pub(crate) funcs: PrimaryMap<FuncId, FuncData>,
    pub(crate) tables: PrimaryMap<TableId, TableData>,
    pub(crate) memories: PrimaryMap<MemoryId, MemoryData>,
    pub(crate) globals: PrimaryMap<GlobalId, GlobalData>,

    /// The shared operand stack. Function parameters, locals and operands
    /// all live here; host functions see windows into it.
    pub(crate) stack: Vec<VMVal>,
    pub(crate) call_depth: usize,

    pub(crate) compiler: Option<Box<dyn Compiler>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose instantiations compile every function up front
    /// through `compiler` and dispatch calls through the compiled code.
    pub fn with_compiler(compiler: Box<dyn Compiler>) -> Self {
        let mut store = Self::default();
        store.compiler = Some(compiler);
        store
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        if let Some(compiler) = &mut self.compiler {
            compiler.fini();
        }
    }
}
