//! ARM64 decoded-instruction to typed-IR translator.
//!
//! One [`Translator`] owns the register environment of one IR module and
//! appends, per decoded instruction, a pure data-flow fragment describing
//! that instruction's effect on machine state. Control flow that leaves the
//! fragment is represented by calls to the module's reserved escape
//! functions; the translator never builds a control-flow graph itself.
//!
//! Translation of a single instruction is synchronous and runs to
//! completion. A translator (with its builder and module) must not be
//! shared across threads; distinct modules translate independently.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(unused_must_use)]

mod cond;
mod environ;
mod error;
mod operands;
mod semantics;
mod translator;

pub use environ::Environ;
pub use error::{Result, TranslateError};
pub use translator::Translator;
