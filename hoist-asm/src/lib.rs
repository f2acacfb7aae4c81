//! Decoded-instruction data model for the hoist lifter.
//!
//! A disassembler frontend produces [`Insn`] records; the translator crates
//! consume them read-only. Nothing in this crate touches an IR module — it is
//! the shared vocabulary between the decoder and the per-architecture
//! translators.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(unused_must_use)]

mod cond;
mod insn;
mod mnemonic;
mod operand;
mod reg;

pub use cond::Cond;
pub use insn::{Insn, InsnDetail};
pub use mnemonic::Mnemonic;
pub use operand::{Access, Extender, MemOperand, Operand, OperandKind, Shift, ShiftKind};
pub use reg::Reg;
