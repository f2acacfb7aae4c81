//! Calling-convention descriptors for downstream decompiler passes.
//!
//! A [`CallConvRegistry`] maps an ABI tag to a factory producing a
//! [`CallingConvention`] bound to a concrete architecture through the
//! [`Binding`] trait. The registry is an ordinary object constructed at
//! startup and threaded through the pipeline; there is no process-wide
//! state. After construction descriptors are pure data: ordered register
//! lists plus stack policy, queried by the parameter/return recovery
//! passes.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(unused_must_use)]

mod aapcs64;
mod binding;
mod convention;
mod registry;
mod tag;

pub use aapcs64::aapcs64;
pub use binding::Binding;
pub use convention::{CallingConvention, CallingConventionBuilder, StackDirection};
pub use registry::CallConvRegistry;
pub use tag::CallConv;
