//! Minimal typed IR for lifted machine code.
//!
//! The translators append straight-line expression trees over module
//! globals (the register cells), memory accesses, and calls to a small set
//! of reserved extern functions. Control flow that *leaves* a lifted block
//! is represented by the four escape functions ([`Module::branch_fn`] and
//! friends); control flow *inside* one instruction's semantics (conditional
//! stores, guarded division) uses ordinary blocks with jump/branch
//! terminators.
//!
//! The IR is deliberately small: integer types only, no phi nodes (merged
//! values go through globals or selects), and pointers are plain integers —
//! a load/store carries its element type instead.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(unused_must_use)]

mod builder;
mod display;
#[cfg(any(test, feature = "test-helpers"))]
pub mod eval;
mod inst;
mod module;
mod ty;

pub use builder::Builder;
pub use inst::{BinOp, CastOp, CmpOp, Inst, Terminator};
pub use module::{
    Block, BlockId, ExternFn, ExternId, FuncId, Function, Global, GlobalId, Module, ValueId,
    ASM_FN_PREFIX, BRANCH_FN, CALL_FN, COND_BRANCH_FN, RETURN_FN,
};
pub use ty::Ty;
