use hoist_asm::{Cond, Mnemonic};

/// Failures while translating one instruction.
///
/// Unknown mnemonics never surface here: the driver absorbs them through
/// the opaque-asm fallback and translation continues. Everything else is
/// fatal for the offending instruction only; the caller decides whether to
/// skip it or abort the enclosing function.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    /// A mnemonic without modeled semantics reached translation. Recoverable:
    /// reported once, then lifted through the opaque-asm fallback.
    #[error("no semantics for `{0}`")]
    UnhandledInstruction(Mnemonic),
    /// An operand variant outside the supported set.
    #[error("unsupported operand: {0}")]
    UnsupportedOperand(&'static str),
    /// The decoded operand count violates the semantics family's contract.
    #[error("`{mnemonic}` decoded with {got} operands, expected {expected}")]
    MalformedOperandCount {
        /// The offending mnemonic.
        mnemonic: Mnemonic,
        /// Human-readable operand-count contract, e.g. `"3"` or `"2..=3"`.
        expected: &'static str,
        /// Operand count actually decoded.
        got: usize,
    },
    /// A non-gating condition reached the condition-expression builder.
    /// This is a programmer error in a semantics handler, not bad input.
    #[error("condition `{0}` has no flag expression")]
    InvalidCondition(Cond),
}

/// Shorthand result for translation paths.
pub type Result<T> = core::result::Result<T, TranslateError>;
