//! A self-contained WebAssembly 1.0 runtime with the fixed-width SIMD and
//! nontrapping float-to-int extensions: an in-crate binary decoder, an
//! abstract-stack validator matching the official algorithm and an
//! interpreting execution engine behind a small embedding API.
//!
//! ```
//! use reef_vm::{ConstExprEvaluator, Linker, Module, Store, Val};
//!
//! let module = Module::from_wat(
//!     r#"(module (func (export "add") (param i32 i32) (result i32)
//!         local.get 0
//!         local.get 1
//!         i32.add))"#,
//! ).unwrap();
//!
//! let mut store = Store::new();
//! let linker = Linker::new();
//! let mut const_eval = ConstExprEvaluator::default();
//! let instance = linker.instantiate(&mut store, &mut const_eval, &module).unwrap();
//!
//! let add = instance.get_func(&store, "add").unwrap();
//! let mut results = [Val::I32(0)];
//! add.call(&mut store, &[Val::I32(7), Val::I32(35)], &mut results).unwrap();
//! assert_eq!(results[0], Val::I32(42));
//! ```
#![cfg_attr(feature = "no_std", no_std)]

extern crate alloc;
extern crate core;

mod compiler;
mod const_eval;
mod decode;
mod errors;
mod func;
mod global;
mod host;
mod indices;
mod instance;
mod interp;
mod linker;
mod memory;
mod module;
mod opcode;
mod store;
mod table;
mod traps;
mod types;
mod utils;
mod validate;
mod values;

pub use compiler::{CompiledFunc, Compiler};
pub use const_eval::ConstExprEvaluator;
pub use decode::Import;
pub use errors::{DecodeError, Error, LinkError, ValidationError};
pub use func::Func;
pub use global::Global;
pub use host::{HostFn, HostModule};
pub use indices::{
    DataIndex, DefinedFuncIndex, DefinedGlobalIndex, DefinedMemoryIndex, DefinedTableIndex,
    ElemIndex, EntityIndex, FuncIndex, GlobalIndex, LocalIndex, MemoryIndex, TableIndex, TypeIndex,
};
pub use instance::Instance;
pub use linker::Linker;
pub use memory::Memory;
pub use module::Module;
pub use opcode::{Imm, Instr, OpSet, Opcode};
pub use store::{InstanceId, Store};
pub use table::Table;
pub use traps::Trap;
pub use types::{BlockType, FuncType, GlobalType, Limits, MemoryType, Span, TableType, ValType};
pub use values::{VMVal, Val};

pub type Result<T> = core::result::Result<T, Error>;

/// WebAssembly page sizes are defined to be 64KiB.
pub const WASM_PAGE_SIZE: u32 = 0x10000;

/// The number of pages we can have before we run out of byte index space.
pub const WASM32_MAX_PAGES: u32 = 1 << 16;

/// The maximum number of interpreter frames a call chain may nest before
/// it traps with stack exhaustion.
pub const MAX_CALL_DEPTH: usize = 512;

/// Cap on `params + locals` of a single function.
pub const MAX_FUNCTION_LOCALS: u32 = 50_000;
