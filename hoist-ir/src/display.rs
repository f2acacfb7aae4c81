//! Textual dump of modules and functions, for logs and test failures.

use core::fmt;

use crate::{BinOp, CastOp, CmpOp, Function, Inst, Module, Terminator};

impl BinOp {
    fn spelling(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::UDiv => "udiv",
            BinOp::SDiv => "sdiv",
            BinOp::URem => "urem",
            BinOp::SRem => "srem",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Xor => "xor",
            BinOp::Shl => "shl",
            BinOp::LShr => "lshr",
            BinOp::AShr => "ashr",
        }
    }
}

impl CmpOp {
    fn spelling(self) -> &'static str {
        match self {
            CmpOp::Eq => "eq",
            CmpOp::Ne => "ne",
            CmpOp::Ult => "ult",
            CmpOp::Ule => "ule",
            CmpOp::Ugt => "ugt",
            CmpOp::Uge => "uge",
            CmpOp::Slt => "slt",
            CmpOp::Sle => "sle",
            CmpOp::Sgt => "sgt",
            CmpOp::Sge => "sge",
        }
    }
}

impl CastOp {
    fn spelling(self) -> &'static str {
        match self {
            CastOp::Zext => "zext",
            CastOp::Sext => "sext",
            CastOp::Trunc => "trunc",
        }
    }
}

/// Renders one function against its module.
pub(crate) struct FunctionPrinter<'a> {
    module: &'a Module,
    function: &'a Function,
}

impl fmt::Display for FunctionPrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fn {} {{", self.function.name)?;
        for (bb, block) in self.function.blocks() {
            writeln!(f, "{bb}:")?;
            for &v in &block.insts {
                write!(f, "  ")?;
                if self.function.value_ty(v).is_some() {
                    write!(f, "{v} = ")?;
                }
                match self.function.inst(v) {
                    Inst::Const { ty, bits } => write!(f, "const {ty} {bits:#x}")?,
                    Inst::ReadGlobal { global } => {
                        write!(f, "read {}", self.module.global(*global).name)?
                    }
                    Inst::WriteGlobal { global, value } => {
                        write!(f, "write {}, {value}", self.module.global(*global).name)?
                    }
                    Inst::Load { ty, addr } => write!(f, "load {ty}, {addr}")?,
                    Inst::Store { addr, value } => write!(f, "store {addr}, {value}")?,
                    Inst::Bin { op, lhs, rhs } => {
                        write!(f, "{} {lhs}, {rhs}", op.spelling())?
                    }
                    Inst::Cmp { op, lhs, rhs } => {
                        write!(f, "icmp {} {lhs}, {rhs}", op.spelling())?
                    }
                    Inst::Cast { op, to, value } => {
                        write!(f, "{} {value} to {to}", op.spelling())?
                    }
                    Inst::Select {
                        cond,
                        if_true,
                        if_false,
                    } => write!(f, "select {cond}, {if_true}, {if_false}")?,
                    Inst::Call { callee, args } => {
                        write!(f, "call {}(", self.module.extern_fn(*callee).name)?;
                        for (i, a) in args.iter().enumerate() {
                            if i > 0 {
                                write!(f, ", ")?;
                            }
                            write!(f, "{a}")?;
                        }
                        write!(f, ")")?;
                    }
                }
                writeln!(f)?;
            }
            match block.term {
                Some(Terminator::Jump(t)) => writeln!(f, "  jump {t}")?,
                Some(Terminator::Branch {
                    cond,
                    then_block,
                    else_block,
                }) => writeln!(f, "  br {cond}, {then_block}, {else_block}")?,
                None => {}
            }
        }
        writeln!(f, "}}")
    }
}

impl Module {
    /// Render a function for diagnostics.
    pub fn display_function(&self, func: crate::FuncId) -> impl fmt::Display + '_ {
        FunctionPrinter {
            module: self,
            function: self.function(func),
        }
    }
}
