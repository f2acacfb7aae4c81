//! Control flow through the reserved escape calls.
//!
//! Branch, call, and return leave the lifted fragment through calls to the
//! module's escape functions. The escapes are opaque to data-flow passes;
//! the control-flow reconstruction pass recognizes them by name and
//! rebuilds the graph later.

use hoist_asm::{Insn, Reg};
use hoist_ir::{BinOp, Builder, CmpOp, Ty};

use super::{expect_operands, Arity};
use crate::{Result, Translator};

impl Translator {
    /// `B` and `B.cond`.
    pub(crate) fn lift_b(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(1))?;
        let target = self.load_operand(b, insn, &ops[0], Ty::I64)?;
        let cc = insn.detail.cc;
        if cc.is_conditional() {
            self.enter_conditional_body();
            let cond = self.cond_expr(b, cc)?;
            let callee = b.module().cond_branch_fn();
            b.call(callee, vec![cond, target]);
        } else {
            let callee = b.module().branch_fn();
            b.call(callee, vec![target]);
        }
        Ok(())
    }

    /// `BL` — the link register receives the return address before the
    /// call escape fires.
    pub(crate) fn lift_bl(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(1))?;
        let target = self.load_operand(b, insn, &ops[0], Ty::I64)?;
        self.write_link_register(b, insn)?;
        let callee = b.module().call_fn();
        b.call(callee, vec![target]);
        Ok(())
    }

    /// `BR` — branch through a register.
    pub(crate) fn lift_br(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(1))?;
        let target = self.load_operand(b, insn, &ops[0], Ty::I64)?;
        let callee = b.module().branch_fn();
        b.call(callee, vec![target]);
        Ok(())
    }

    /// `BLR` — call through a register, linking first.
    pub(crate) fn lift_blr(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(1))?;
        let target = self.load_operand(b, insn, &ops[0], Ty::I64)?;
        self.write_link_register(b, insn)?;
        let callee = b.module().call_fn();
        b.call(callee, vec![target]);
        Ok(())
    }

    /// `RET` — return through X30 unless a register is given.
    pub(crate) fn lift_ret(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Between(0, 1))?;
        let target = match ops.first() {
            Some(op) => self.load_operand(b, insn, op, Ty::I64)?,
            None => self.load_register(b, insn, Reg::LR)?,
        };
        let callee = b.module().return_fn();
        b.call(callee, vec![target]);
        Ok(())
    }

    /// `CBZ`/`CBNZ` — compare a register against zero and branch.
    pub(crate) fn lift_cbz(&mut self, b: &mut Builder, insn: &Insn, on_zero: bool) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(2))?;
        let ty = self.dest_ty(&ops[0])?;
        let value = self.load_operand(b, insn, &ops[0], ty)?;
        let zero = b.const_int(ty, 0);
        let op = if on_zero { CmpOp::Eq } else { CmpOp::Ne };
        let cond = b.cmp(op, value, zero);
        let target = self.load_operand(b, insn, &ops[1], Ty::I64)?;
        let callee = b.module().cond_branch_fn();
        b.call(callee, vec![cond, target]);
        Ok(())
    }

    /// `TBZ`/`TBNZ` — test one bit and branch.
    pub(crate) fn lift_tbz(&mut self, b: &mut Builder, insn: &Insn, on_zero: bool) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(3))?;
        let ty = self.dest_ty(&ops[0])?;
        let value = self.load_operand(b, insn, &ops[0], ty)?;
        let bit = ops[1]
            .as_imm()
            .ok_or(crate::TranslateError::UnsupportedOperand("bit index"))?;
        let mask = b.const_int(ty, 1u128 << (bit as u32 % ty.bits()));
        let selected = b.bin(BinOp::And, value, mask);
        let zero = b.const_int(ty, 0);
        let op = if on_zero { CmpOp::Eq } else { CmpOp::Ne };
        let cond = b.cmp(op, selected, zero);
        let target = self.load_operand(b, insn, &ops[2], Ty::I64)?;
        let callee = b.module().cond_branch_fn();
        b.call(callee, vec![cond, target]);
        Ok(())
    }

    fn write_link_register(&self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ret_addr = b.const_int(Ty::I64, u128::from(insn.end_address()));
        self.store_register(b, Reg::LR, ret_addr)
    }
}
