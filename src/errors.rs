use crate::traps::Trap;
use alloc::string::{String, ToString};

/// Any failure the runtime can produce, grouped by the stage that raised it.
#[derive(Debug, onlyerror::Error)]
pub enum Error {
    /// The input bytes are not a well-formed WebAssembly module.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    /// The module is well-formed but breaks a typing or structural rule.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Import resolution or instantiation failed.
    #[error("link error: {0}")]
    Link(#[from] LinkError),
    /// Execution trapped.
    #[error("trap: {0}")]
    Trap(#[from] Trap),
    /// The WAT text input could not be parsed.
    #[error("invalid WAT input: {0}")]
    Wat(String),
}

impl From<wat::Error> for Error {
    fn from(e: wat::Error) -> Self {
        Self::Wat(e.to_string())
    }
}

/// A failure while decoding the binary format.
///
/// Variants that correspond to a position in the input carry the byte offset
/// where decoding stopped.
#[derive(Debug, onlyerror::Error)]
pub enum DecodeError {
    #[error("unexpected end of input at offset {0}")]
    UnexpectedEof(usize),
    #[error("bad magic number")]
    BadMagic,
    #[error("unsupported binary version {0}")]
    BadVersion(u32),
    #[error("unknown section id {id} at offset {offset}")]
    UnknownSection { id: u8, offset: usize },
    #[error("duplicate or out-of-order section id {id} at offset {offset}")]
    SectionOrder { id: u8, offset: usize },
    #[error("section size does not match its content at offset {0}")]
    SectionSizeMismatch(usize),
    #[error("integer encoding too long at offset {0}")]
    LebTooLong(usize),
    #[error("integer encoding overflows target width at offset {0}")]
    LebOverflow(usize),
    #[error("invalid value type {ty} at offset {offset}")]
    BadValType { ty: u8, offset: usize },
    #[error("invalid element type {ty} at offset {offset}")]
    BadElemType { ty: u8, offset: usize },
    #[error("invalid limits flags {flags} at offset {offset}")]
    BadLimitsFlags { flags: u8, offset: usize },
    #[error("invalid mutability flag {flag} at offset {offset}")]
    BadMutability { flag: u8, offset: usize },
    #[error("invalid import or export kind {kind} at offset {offset}")]
    BadExternKind { kind: u8, offset: usize },
    #[error("unknown opcode {byte} in set {set} at offset {offset}")]
    BadOpcode { set: u8, byte: u32, offset: usize },
    #[error("invalid block type at offset {0}")]
    BadBlockType(usize),
    #[error("unbalanced control structure at offset {0}")]
    UnbalancedControl(usize),
    #[error("expression is missing its terminating `end` at offset {0}")]
    MissingEnd(usize),
    #[error("invalid UTF-8 in name at offset {0}")]
    BadUtf8(usize),
    #[error("function and code section counts differ")]
    CodeCountMismatch,
    #[error("function body size does not match its content at offset {0}")]
    BodySizeMismatch(usize),
    #[error("too many locals declared at offset {0}")]
    TooManyLocals(usize),
    #[error("duplicate export `{0}`")]
    DuplicateExport(String),
    #[error("non-zero reserved byte at offset {0}")]
    BadReservedByte(usize),
}

/// A failure while type-checking a decoded module.
#[derive(Debug, onlyerror::Error)]
pub enum ValidationError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("operand stack underflow")]
    StackUnderflow,
    #[error("operand stack height does not match block arity")]
    StackHeightMismatch,
    #[error("`else` without a matching `if`")]
    ElseWithoutIf,
    #[error("unknown type index {0}")]
    UnknownType(u32),
    #[error("unknown function index {0}")]
    UnknownFunc(u32),
    #[error("unknown table index {0}")]
    UnknownTable(u32),
    #[error("unknown memory index {0}")]
    UnknownMemory(u32),
    #[error("unknown global index {0}")]
    UnknownGlobal(u32),
    #[error("unknown local index {0}")]
    UnknownLocal(u32),
    #[error("unknown label depth {0}")]
    UnknownLabel(u32),
    #[error("alignment 2^{align} larger than natural alignment of a {width}-byte access")]
    BadAlignment { align: u32, width: u32 },
    #[error("lane index {lane} out of range for {lanes} lanes")]
    BadLaneIndex { lane: u8, lanes: u8 },
    #[error("size minimum must not be greater than maximum")]
    BadLimits,
    #[error("memory size must be at most 65536 pages")]
    MemoryTooLarge,
    #[error("at most one memory is supported")]
    TooManyMemories,
    #[error("at most one table is supported")]
    TooManyTables,
    #[error("unsupported instruction in constant expression")]
    BadConstExpr,
    #[error("constant expression must produce exactly one value")]
    ConstExprArity,
    #[error("constant expression may only read imported immutable globals")]
    BadConstExprGlobal,
    #[error("global is immutable")]
    GlobalImmutable,
    #[error("start function must have no parameters and no results")]
    BadStartSignature,
}

/// A failure while resolving imports or instantiating a module.
#[derive(Debug, onlyerror::Error)]
pub enum LinkError {
    #[error("unknown module `{0}`")]
    UnknownModule(String),
    #[error("unknown import `{module}::{field}`")]
    UnknownImport { module: String, field: String },
    #[error("import `{module}::{field}` has the wrong kind")]
    ImportKindMismatch { module: String, field: String },
    #[error("import `{module}::{field}` has an incompatible type")]
    ImportTypeMismatch { module: String, field: String },
    #[error("module `{0}` is already defined")]
    AlreadyDefined(String),
    #[error("element segment does not fit in table")]
    TableCapacityExceeded,
    #[error("data segment does not fit in memory")]
    DataSegmentOutOfBounds,
    #[error("export `{0}` not found")]
    UnknownExport(String),
    #[error("export `{0}` is not the requested kind")]
    ExportKindMismatch(String),
    #[error("call arguments or results do not match the function signature")]
    CallTypeMismatch,
}
