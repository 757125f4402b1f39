//! Binary-format decoding: the flat module model and the section decoder
//! that produces it.

mod module_decoder;
mod reader;

use crate::indices::{
    DefinedFuncIndex, DefinedGlobalIndex, DefinedMemoryIndex, DefinedTableIndex, EntityIndex,
    FuncIndex, GlobalIndex, MemoryIndex, TableIndex, TypeIndex,
};
use crate::opcode::Instr;
use crate::types::{GlobalType, MemoryType, Span, TableType, ValType};
use alloc::string::String;
use alloc::vec::Vec;
use cranelift_entity::PrimaryMap;
use hashbrown::HashMap;

pub use module_decoder::ModuleDecoder;

/// A function signature inside a module: parameter and result lists as
/// spans into the module's value-type pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuncTypeDesc {
    pub params: Span,
    pub results: Span,
}

/// The code of one defined function.
#[derive(Debug, Clone, Copy)]
pub struct FuncBody {
    /// Run-length local declarations, a span into the local-declaration
    /// pool. Parameters are not included.
    pub locals: Span,
    /// The body expression (terminating `end` included), a span into the
    /// instruction pool.
    pub expr: Span,
    /// `params.len + sum(local declaration counts)`: the number of stack
    /// slots reserved for locals at entry.
    pub frame_size: u32,
    /// Locals beyond the parameters, i.e. the slots to zero at entry.
    pub num_locals: u32,
}

/// One run of identically-typed locals.
#[derive(Debug, Clone, Copy)]
pub struct LocalDecl {
    pub count: u32,
    pub ty: ValType,
}

#[derive(Debug)]
pub struct Import {
    pub module: String,
    pub field: String,
    /// The row in the respective index space this import occupies.
    pub index: EntityIndex,
}

#[derive(Debug, Clone, Copy)]
pub struct ElementSegment {
    pub table: TableIndex,
    /// Offset constant expression, a span into the instruction pool.
    pub offset: Span,
    /// Function indices, a span into the u32 pool.
    pub funcs: Span,
}

#[derive(Debug, Clone, Copy)]
pub struct DataSegment {
    pub memory: MemoryIndex,
    /// Offset constant expression, a span into the instruction pool.
    pub offset: Span,
    /// Segment contents, a span into the byte pool.
    pub bytes: Span,
}

/// The flat, index-based module model the decoder produces.
///
/// All cross-references are typed indices or `(offset, len)` spans into the
/// pools below; the model holds no pointers and is immutable once
/// validated.
#[derive(Debug, Default)]
pub struct DecodedModule {
    pub types: PrimaryMap<TypeIndex, FuncTypeDesc>,

    /// Signature of every function in the index space, imports first.
    pub functions: PrimaryMap<FuncIndex, TypeIndex>,
    pub tables: PrimaryMap<TableIndex, TableType>,
    pub memories: PrimaryMap<MemoryIndex, MemoryType>,
    pub globals: PrimaryMap<GlobalIndex, GlobalType>,

    /// Initializer constant expression of every defined global.
    pub global_initializers: PrimaryMap<DefinedGlobalIndex, Span>,
    /// Code of every defined function.
    pub code: PrimaryMap<DefinedFuncIndex, FuncBody>,

    pub imports: Vec<Import>,
    pub exports: HashMap<String, EntityIndex>,
    pub start: Option<FuncIndex>,
    pub element_segments: Vec<ElementSegment>,
    pub data_segments: Vec<DataSegment>,

    pub num_imported_functions: u32,
    pub num_imported_tables: u32,
    pub num_imported_memories: u32,
    pub num_imported_globals: u32,

    /// Value-type pool: function-type parameter and result lists.
    pub val_types: Vec<ValType>,
    /// Instruction pool: every function body and constant expression,
    /// concatenated.
    pub instrs: Vec<Instr>,
    /// u32 pool: `br_table` target lists and element-segment function
    /// indices.
    pub u32s: Vec<u32>,
    /// Byte pool: data-segment contents.
    pub bytes: Vec<u8>,
    /// Local-declaration pool.
    pub local_decls: Vec<LocalDecl>,
}

impl DecodedModule {
    #[inline]
    pub fn val_types(&self, span: Span) -> &[ValType] {
        &self.val_types[span.range()]
    }

    #[inline]
    pub fn instrs(&self, span: Span) -> &[Instr] {
        &self.instrs[span.range()]
    }

    #[inline]
    pub fn u32s(&self, span: Span) -> &[u32] {
        &self.u32s[span.range()]
    }

    #[inline]
    pub fn bytes(&self, span: Span) -> &[u8] {
        &self.bytes[span.range()]
    }

    #[inline]
    pub fn local_decls(&self, span: Span) -> &[LocalDecl] {
        &self.local_decls[span.range()]
    }

    /// Parameter types of the signature at `ty`.
    #[inline]
    pub fn params(&self, ty: TypeIndex) -> &[ValType] {
        self.val_types(self.types[ty].params)
    }

    /// Result types of the signature at `ty`.
    #[inline]
    pub fn results(&self, ty: TypeIndex) -> &[ValType] {
        self.val_types(self.types[ty].results)
    }

    /// Signature of the function at `index`.
    #[inline]
    pub fn func_type(&self, index: FuncIndex) -> TypeIndex {
        self.functions[index]
    }

    #[inline]
    pub fn func_index(&self, index: DefinedFuncIndex) -> FuncIndex {
        FuncIndex::from_u32(self.num_imported_functions + index.as_u32())
    }

    #[inline]
    pub fn defined_func_index(&self, index: FuncIndex) -> Option<DefinedFuncIndex> {
        if self.is_imported_func(index) {
            None
        } else {
            Some(DefinedFuncIndex::from_u32(
                index.as_u32() - self.num_imported_functions,
            ))
        }
    }

    #[inline]
    pub fn is_imported_func(&self, index: FuncIndex) -> bool {
        index.as_u32() < self.num_imported_functions
    }

    #[inline]
    pub fn table_index(&self, index: DefinedTableIndex) -> TableIndex {
        TableIndex::from_u32(self.num_imported_tables + index.as_u32())
    }

    #[inline]
    pub fn is_imported_table(&self, index: TableIndex) -> bool {
        index.as_u32() < self.num_imported_tables
    }

    #[inline]
    pub fn memory_index(&self, index: DefinedMemoryIndex) -> MemoryIndex {
        MemoryIndex::from_u32(self.num_imported_memories + index.as_u32())
    }

    #[inline]
    pub fn is_imported_memory(&self, index: MemoryIndex) -> bool {
        index.as_u32() < self.num_imported_memories
    }

    #[inline]
    pub fn global_index(&self, index: DefinedGlobalIndex) -> GlobalIndex {
        GlobalIndex::from_u32(self.num_imported_globals + index.as_u32())
    }

    #[inline]
    pub fn defined_global_index(&self, index: GlobalIndex) -> Option<DefinedGlobalIndex> {
        if self.is_imported_global(index) {
            None
        } else {
            Some(DefinedGlobalIndex::from_u32(
                index.as_u32() - self.num_imported_globals,
            ))
        }
    }

    #[inline]
    pub fn is_imported_global(&self, index: GlobalIndex) -> bool {
        index.as_u32() < self.num_imported_globals
    }

    pub fn num_defined_funcs(&self) -> u32 {
        u32::try_from(self.functions.len()).unwrap() - self.num_imported_functions
    }

    pub fn num_defined_globals(&self) -> u32 {
        u32::try_from(self.globals.len()).unwrap() - self.num_imported_globals
    }
}
