use crate::indices::DefinedFuncIndex;
use crate::module::Module;
use crate::store::{InstanceId, Store};
use crate::traps::Trap;
use alloc::sync::Arc;

/// The entry point of one compiled function.
///
/// A compiled function is handed the store and the identity of the function
/// it replaces, and must follow the interpreter's stack discipline: its
/// parameters sit on top of the store's operand stack on entry, and exactly
/// its results replace them on success.
pub type CompiledFunc =
    Arc<dyn Fn(&mut Store, InstanceId, DefinedFuncIndex) -> Result<(), Trap> + Send + Sync>;

/// An optional ahead-of-time code generator.
///
/// When a store carries a compiler, instantiation compiles every defined
/// function of a module up front and call dispatch prefers the compiled
/// entry point over the interpreter. Absent a compiler, execution is purely
/// interpretive; nothing in the interpreter assumes one exists.
pub trait Compiler {
    /// Compiles one defined function of `module`.
    ///
    /// # Errors
    ///
    /// Returns an error if the function cannot be compiled; instantiation
    /// of the module fails as a whole.
    fn compile(&mut self, module: &Module, func: DefinedFuncIndex) -> crate::Result<CompiledFunc>;

    /// Releases any resources the compiler holds. Called when the owning
    /// store is finalized.
    fn fini(&mut self);
}
