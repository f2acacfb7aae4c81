use std::collections::HashMap;

use crate::{Inst, Terminator, Ty};

macro_rules! id_type {
    ($(#[$doc:meta] $name:ident, $prefix:literal;)*) => {
        $(
            #[$doc]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
            pub struct $name(pub(crate) u32);

            impl $name {
                /// Index into the owning arena.
                pub const fn index(self) -> usize {
                    self.0 as usize
                }
            }

            impl core::fmt::Display for $name {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    write!(f, concat!($prefix, "{}"), self.0)
                }
            }
        )*
    };
}

id_type! {
    /// Identifies a module global.
    GlobalId, "@g";
    /// Identifies an extern (escape or opaque-asm) function.
    ExternId, "@f";
    /// Identifies a function under construction.
    FuncId, "@fn";
    /// Identifies a basic block within a function.
    BlockId, "bb";
    /// Identifies an instruction result within a function.
    ValueId, "%";
}

/// A module-level cell, used by the translators to model registers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Global {
    /// Symbolic name.
    pub name: String,
    /// Cell type.
    pub ty: Ty,
}

/// Declaration of a function external to the module: the four control-flow
/// escapes plus the opaque-asm fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternFn {
    /// Symbolic name.
    pub name: String,
    /// Parameter types.
    pub params: Vec<Ty>,
    /// Result type, if the function produces a value.
    pub ret: Option<Ty>,
}

/// A basic block: instruction list plus an optional terminator.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    /// Instructions in program order.
    pub insts: Vec<ValueId>,
    /// Terminator; `None` means the lifted fragment ends here.
    pub term: Option<Terminator>,
}

/// A function holding lifted code.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    /// Symbolic name.
    pub name: String,
    pub(crate) insts: Vec<Inst>,
    pub(crate) tys: Vec<Option<Ty>>,
    pub(crate) blocks: Vec<Block>,
}

impl Function {
    /// The entry block.
    pub const fn entry(&self) -> BlockId {
        BlockId(0)
    }

    /// The instruction behind a value.
    pub fn inst(&self, value: ValueId) -> &Inst {
        &self.insts[value.index()]
    }

    /// The result type of a value, `None` for pure effects.
    pub fn value_ty(&self, value: ValueId) -> Option<Ty> {
        self.tys[value.index()]
    }

    /// A block by id.
    pub fn block(&self, block: BlockId) -> &Block {
        &self.blocks[block.index()]
    }

    /// All blocks in creation order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (BlockId(i as u32), b))
    }

    /// Number of instructions in the arena.
    pub fn inst_count(&self) -> usize {
        self.insts.len()
    }
}

/// Name of the unconditional-branch escape: `branch(target)`.
pub const BRANCH_FN: &str = "__branch";
/// Name of the conditional-branch escape: `cond_branch(cond, target)`.
pub const COND_BRANCH_FN: &str = "__cond_branch";
/// Name of the call escape: `call(target)`.
pub const CALL_FN: &str = "__call";
/// Name of the return escape: `return(target)`.
pub const RETURN_FN: &str = "__return";
/// Prefix of opaque-asm fallback functions.
pub const ASM_FN_PREFIX: &str = "__asm_";

/// An IR module: globals, extern declarations, and lifted functions.
#[derive(Debug)]
pub struct Module {
    globals: Vec<Global>,
    externs: Vec<ExternFn>,
    functions: Vec<Function>,
    extern_by_name: HashMap<String, ExternId>,
    escapes: [ExternId; 4],
}

impl Default for Module {
    fn default() -> Self {
        Self::new()
    }
}

impl Module {
    /// An empty module with the four escape functions declared.
    pub fn new() -> Self {
        let mut module = Self {
            globals: Vec::new(),
            externs: Vec::new(),
            functions: Vec::new(),
            extern_by_name: HashMap::new(),
            escapes: [ExternId(0); 4],
        };
        let branch = module.declare_extern(BRANCH_FN, vec![Ty::I64], None);
        let cond_branch = module.declare_extern(COND_BRANCH_FN, vec![Ty::I1, Ty::I64], None);
        let call = module.declare_extern(CALL_FN, vec![Ty::I64], None);
        let ret = module.declare_extern(RETURN_FN, vec![Ty::I64], None);
        module.escapes = [branch, cond_branch, call, ret];
        module
    }

    /// Add a global cell. Names are not required to be unique, but the
    /// translators keep them so.
    pub fn add_global(&mut self, name: impl Into<String>, ty: Ty) -> GlobalId {
        let id = GlobalId(self.globals.len() as u32);
        self.globals.push(Global {
            name: name.into(),
            ty,
        });
        id
    }

    /// A global by id.
    pub fn global(&self, id: GlobalId) -> &Global {
        &self.globals[id.index()]
    }

    /// All globals in creation order.
    pub fn globals(&self) -> impl Iterator<Item = (GlobalId, &Global)> {
        self.globals
            .iter()
            .enumerate()
            .map(|(i, g)| (GlobalId(i as u32), g))
    }

    fn declare_extern(
        &mut self,
        name: impl Into<String>,
        params: Vec<Ty>,
        ret: Option<Ty>,
    ) -> ExternId {
        let name = name.into();
        let id = ExternId(self.externs.len() as u32);
        self.extern_by_name.insert(name.clone(), id);
        self.externs.push(ExternFn { name, params, ret });
        id
    }

    /// An extern declaration by id.
    pub fn extern_fn(&self, id: ExternId) -> &ExternFn {
        &self.externs[id.index()]
    }

    /// The unconditional-branch escape.
    pub fn branch_fn(&self) -> ExternId {
        self.escapes[0]
    }

    /// The conditional-branch escape.
    pub fn cond_branch_fn(&self) -> ExternId {
        self.escapes[1]
    }

    /// The call escape.
    pub fn call_fn(&self) -> ExternId {
        self.escapes[2]
    }

    /// The return escape.
    pub fn return_fn(&self) -> ExternId {
        self.escapes[3]
    }

    /// Get or declare the opaque-asm function for a mnemonic suffix.
    ///
    /// The first declaration fixes the signature; later requests with the
    /// same name reuse it.
    pub fn asm_fn(&mut self, suffix: &str, params: Vec<Ty>, ret: Option<Ty>) -> ExternId {
        let name = format!("{ASM_FN_PREFIX}{suffix}");
        match self.extern_by_name.get(&name) {
            Some(id) => *id,
            None => self.declare_extern(name, params, ret),
        }
    }

    /// Add an empty function with an entry block.
    pub fn add_function(&mut self, name: impl Into<String>) -> FuncId {
        let id = FuncId(self.functions.len() as u32);
        self.functions.push(Function {
            name: name.into(),
            insts: Vec::new(),
            tys: Vec::new(),
            blocks: vec![Block::default()],
        });
        id
    }

    /// A function by id.
    pub fn function(&self, id: FuncId) -> &Function {
        &self.functions[id.index()]
    }

    pub(crate) fn function_mut(&mut self, id: FuncId) -> &mut Function {
        &mut self.functions[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_are_declared_up_front() {
        let module = Module::new();
        assert_eq!(module.extern_fn(module.branch_fn()).name, BRANCH_FN);
        assert_eq!(
            module.extern_fn(module.cond_branch_fn()).params,
            vec![Ty::I1, Ty::I64]
        );
        assert_eq!(module.extern_fn(module.call_fn()).ret, None);
        assert_eq!(module.extern_fn(module.return_fn()).name, RETURN_FN);
    }

    #[test]
    fn asm_fns_are_deduplicated_by_name() {
        let mut module = Module::new();
        let a = module.asm_fn("clz", vec![Ty::I64], Some(Ty::I64));
        let b = module.asm_fn("clz", vec![], None);
        assert_eq!(a, b);
        assert_eq!(module.extern_fn(a).params, vec![Ty::I64]);
    }
}
