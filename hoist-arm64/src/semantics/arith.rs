//! Add/subtract family, with and without carry, and the compare aliases.

use hoist_asm::{Insn, Reg};
use hoist_ir::{BinOp, Builder, ValueId};

use super::{expect_operands, Arity};
use crate::{Result, Translator};

impl Translator {
    /// `ADD`/`ADDS`/`SUB`/`SUBS` — three operands, width from the
    /// destination; the right-hand side narrows to match so 32-bit forms
    /// work on the low half and zero-extend on store.
    pub(crate) fn lift_add_sub(
        &mut self,
        b: &mut Builder,
        insn: &Insn,
        subtract: bool,
    ) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(3))?;
        let ty = self.dest_ty(&ops[0])?;
        let a = self.load_operand(b, insn, &ops[1], ty)?;
        let rhs = self.load_operand(b, insn, &ops[2], ty)?;
        let op = if subtract { BinOp::Sub } else { BinOp::Add };
        let result = b.bin(op, a, rhs);
        if insn.detail.update_flags {
            let flags = if subtract {
                self.sub_flags(b, a, rhs, result)
            } else {
                self.add_flags(b, a, rhs, None, result)
            };
            self.store_flags(b, flags);
        }
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `CMP`/`CMN` — flags only, no destination.
    pub(crate) fn lift_cmp_cmn(
        &mut self,
        b: &mut Builder,
        insn: &Insn,
        subtract: bool,
    ) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(2))?;
        let ty = self.dest_ty(&ops[0])?;
        let a = self.load_operand(b, insn, &ops[0], ty)?;
        let rhs = self.load_operand(b, insn, &ops[1], ty)?;
        let op = if subtract { BinOp::Sub } else { BinOp::Add };
        let result = b.bin(op, a, rhs);
        let flags = if subtract {
            self.sub_flags(b, a, rhs, result)
        } else {
            self.add_flags(b, a, rhs, None, result)
        };
        self.store_flags(b, flags);
        Ok(())
    }

    /// `ADC`/`ADCS` — add with the carry flag as a third addend.
    pub(crate) fn lift_adc(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(3))?;
        let ty = self.dest_ty(&ops[0])?;
        let a = self.load_operand(b, insn, &ops[1], ty)?;
        let rhs = self.load_operand(b, insn, &ops[2], ty)?;
        let (result, carry) = self.add_with_carry(b, a, rhs, ty)?;
        if insn.detail.update_flags {
            let flags = self.add_flags(b, a, rhs, Some(carry), result);
            self.store_flags(b, flags);
        }
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `SBC`/`SBCS` — subtract with borrow, expressed as `a + !rhs + C`.
    pub(crate) fn lift_sbc(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(3))?;
        let ty = self.dest_ty(&ops[0])?;
        let a = self.load_operand(b, insn, &ops[1], ty)?;
        let rhs = self.load_operand(b, insn, &ops[2], ty)?;
        let inverted = b.not(rhs);
        let (result, carry) = self.add_with_carry(b, a, inverted, ty)?;
        if insn.detail.update_flags {
            let flags = self.add_flags(b, a, inverted, Some(carry), result);
            self.store_flags(b, flags);
        }
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `NEG`/`NEGS` — subtract from zero.
    pub(crate) fn lift_neg(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(2))?;
        let ty = self.dest_ty(&ops[0])?;
        let zero = b.const_int(ty, 0);
        let rhs = self.load_operand(b, insn, &ops[1], ty)?;
        let result = b.bin(BinOp::Sub, zero, rhs);
        if insn.detail.update_flags {
            let flags = self.sub_flags(b, zero, rhs, result);
            self.store_flags(b, flags);
        }
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `NGC`/`NGCS` — negate with borrow: `0 + !rhs + C`.
    pub(crate) fn lift_ngc(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(2))?;
        let ty = self.dest_ty(&ops[0])?;
        let zero = b.const_int(ty, 0);
        let rhs = self.load_operand(b, insn, &ops[1], ty)?;
        let inverted = b.not(rhs);
        let (result, carry) = self.add_with_carry(b, zero, inverted, ty)?;
        if insn.detail.update_flags {
            let flags = self.add_flags(b, zero, inverted, Some(carry), result);
            self.store_flags(b, flags);
        }
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `a + rhs + C` at `ty`, returning the sum and the widened carry used.
    fn add_with_carry(
        &mut self,
        b: &mut Builder,
        a: ValueId,
        rhs: ValueId,
        ty: hoist_ir::Ty,
    ) -> Result<(ValueId, ValueId)> {
        let carry = self.load_flag(b, Reg::C);
        let carry_wide = b.zext_or_trunc(ty, carry);
        let partial = b.bin(BinOp::Add, a, rhs);
        let result = b.bin(BinOp::Add, partial, carry_wide);
        Ok((result, carry))
    }
}
