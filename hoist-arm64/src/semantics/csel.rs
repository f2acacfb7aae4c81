//! Conditional select, conditional operate, and conditional compare.
//!
//! These families gate themselves on the condition code embedded in the
//! decoded record; the driver never wraps them. Value selection uses the
//! `select` expression; `CCMP`/`CCMN` install flags on both arms of a real
//! diamond because the not-taken arm materializes the NZCV immediate.

use hoist_asm::{Insn, Mnemonic};
use hoist_ir::{BinOp, Builder, Ty};

use super::{expect_operands, Arity};
use crate::cond::Flags;
use crate::{Result, Translator};

impl Translator {
    /// `CSEL`/`CSINC`/`CSINV`/`CSNEG` — pick `rn` when the condition holds,
    /// otherwise a transformed `rm`.
    pub(crate) fn lift_csel(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(3))?;
        let ty = self.dest_ty(&ops[0])?;
        let cond = self.cond_expr(b, insn.detail.cc)?;
        let n = self.load_operand(b, insn, &ops[1], ty)?;
        let m = self.load_operand(b, insn, &ops[2], ty)?;
        let other = match insn.mnemonic {
            Mnemonic::Csinc => {
                let one = b.const_int(ty, 1);
                b.bin(BinOp::Add, m, one)
            }
            Mnemonic::Csinv => b.not(m),
            Mnemonic::Csneg => b.neg(m),
            _ => m,
        };
        let result = b.select(cond, n, other);
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `CSET`/`CSETM` — 1 (all-ones for `CSETM`) when the condition holds,
    /// otherwise 0.
    pub(crate) fn lift_cset(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(1))?;
        let ty = self.dest_ty(&ops[0])?;
        let cond = self.cond_expr(b, insn.detail.cc)?;
        let set = if insn.mnemonic == Mnemonic::Csetm {
            b.const_int(ty, u128::MAX)
        } else {
            b.const_int(ty, 1)
        };
        let clear = b.const_int(ty, 0);
        let result = b.select(cond, set, clear);
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `CINC`/`CINV`/`CNEG` — transform `rn` when the condition holds,
    /// otherwise pass it through.
    pub(crate) fn lift_cond_unary(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(2))?;
        let ty = self.dest_ty(&ops[0])?;
        let cond = self.cond_expr(b, insn.detail.cc)?;
        let n = self.load_operand(b, insn, &ops[1], ty)?;
        let transformed = match insn.mnemonic {
            Mnemonic::Cinc => {
                let one = b.const_int(ty, 1);
                b.bin(BinOp::Add, n, one)
            }
            Mnemonic::Cinv => b.not(n),
            _ => b.neg(n),
        };
        let result = b.select(cond, transformed, n);
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `CCMP`/`CCMN` — compare and install flags when the condition holds;
    /// otherwise decompose the NZCV immediate (bit 3 → N down to bit 0 → V)
    /// into the flag cells.
    pub(crate) fn lift_ccmp_ccmn(
        &mut self,
        b: &mut Builder,
        insn: &Insn,
        subtract: bool,
    ) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(3))?;
        let ty = self.dest_ty(&ops[0])?;
        let a = self.load_operand(b, insn, &ops[0], ty)?;
        let rhs = self.load_operand(b, insn, &ops[1], ty)?;
        let nzcv = ops[2]
            .as_imm()
            .ok_or(crate::TranslateError::UnsupportedOperand("nzcv immediate"))?;
        let cond = self.cond_expr(b, insn.detail.cc)?;

        b.if_then_else(
            cond,
            |b| {
                let op = if subtract { BinOp::Sub } else { BinOp::Add };
                let result = b.bin(op, a, rhs);
                let flags = if subtract {
                    self.sub_flags(b, a, rhs, result)
                } else {
                    self.add_flags(b, a, rhs, None, result)
                };
                self.store_flags(b, flags);
                Ok(())
            },
            |b| {
                let bit = |b: &mut Builder, i: u32| b.const_int(Ty::I1, (nzcv as u128 >> i) & 1);
                let flags = Flags {
                    n: bit(b, 3),
                    z: bit(b, 2),
                    c: bit(b, 1),
                    v: bit(b, 0),
                };
                self.store_flags(b, flags);
                Ok(())
            },
        )
    }
}
