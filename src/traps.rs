/// A runtime condition that aborts execution.
///
/// A trap unwinds every interpreter frame of the current call chain; the
/// embedder observes it as the error of the outermost [`Func::call`].
///
/// [`Func::call`]: crate::Func::call
#[derive(Debug, Clone, Copy, PartialEq, Eq, onlyerror::Error)]
pub enum Trap {
    /// Code that was supposed to have been unreachable was reached.
    #[error("unreachable code executed")]
    UnreachableCodeReached,
    /// An out-of-bounds memory access.
    #[error("out of bounds memory access")]
    MemoryOutOfBounds,
    /// Out-of-bounds access to a table.
    #[error("out of bounds table access")]
    TableOutOfBounds,
    /// Indirect call through an unset table slot.
    #[error("accessed uninitialized table element")]
    IndirectCallToNull,
    /// Signature mismatch on indirect call.
    #[error("indirect call signature mismatch")]
    BadSignature,
    /// An integer arithmetic operation caused an overflow.
    #[error("integer overflow")]
    IntegerOverflow,
    /// An integer division by zero.
    #[error("integer division by zero")]
    IntegerDivisionByZero,
    /// Failed float-to-int conversion.
    #[error("invalid conversion to integer")]
    BadConversionToInteger,
    /// The interpreter call stack was exhausted.
    #[error("call stack exhausted")]
    StackOverflow,
}
