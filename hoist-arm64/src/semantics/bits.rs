//! Logical operations, moves, shifts, and bit-field extraction.

use hoist_asm::{Insn, OperandKind};
use hoist_ir::{BinOp, Builder, Ty};

use super::{expect_operands, Arity};
use crate::{Result, Translator};

impl Translator {
    /// `AND`/`ANDS`/`ORR`/`ORN`/`EOR`/`EON` — `invert` complements the
    /// right-hand operand first (the `N` forms).
    pub(crate) fn lift_logical(
        &mut self,
        b: &mut Builder,
        insn: &Insn,
        op: BinOp,
        invert: bool,
    ) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(3))?;
        let ty = self.dest_ty(&ops[0])?;
        let a = self.load_operand(b, insn, &ops[1], ty)?;
        let mut rhs = self.load_operand(b, insn, &ops[2], ty)?;
        if invert {
            rhs = b.not(rhs);
        }
        let result = b.bin(op, a, rhs);
        if insn.detail.update_flags {
            let flags = self.logical_flags(b, result);
            self.store_flags(b, flags);
        }
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `TST` — `ANDS` without a destination.
    pub(crate) fn lift_tst(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(2))?;
        let ty = self.dest_ty(&ops[0])?;
        let a = self.load_operand(b, insn, &ops[0], ty)?;
        let rhs = self.load_operand(b, insn, &ops[1], ty)?;
        let result = b.bin(BinOp::And, a, rhs);
        let flags = self.logical_flags(b, result);
        self.store_flags(b, flags);
        Ok(())
    }

    /// `MOV`/`MOVZ`/`MVN` — `invert` complements the source (`MVN`). The
    /// destination's width governs the store, so 32-bit moves zero-extend
    /// into the parent.
    pub(crate) fn lift_mov(&mut self, b: &mut Builder, insn: &Insn, invert: bool) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(2))?;
        let ty = self.dest_ty(&ops[0])?;
        let mut value = self.load_operand(b, insn, &ops[1], ty)?;
        if invert {
            value = b.not(value);
        }
        self.store_operand(b, insn, &ops[0], value)
    }

    /// `LSL`/`LSR`/`ASR` — register amounts reduce modulo the width.
    pub(crate) fn lift_shift(&mut self, b: &mut Builder, insn: &Insn, op: BinOp) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(3))?;
        let ty = self.dest_ty(&ops[0])?;
        let value = self.load_operand(b, insn, &ops[1], ty)?;
        let amount = self.shift_amount(b, insn, ty, &ops[2])?;
        let result = b.bin(op, value, amount);
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `ROR` — `(x >> n) | (x << (w - n))` over the operand width.
    pub(crate) fn lift_ror(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(3))?;
        let ty = self.dest_ty(&ops[0])?;
        let value = self.load_operand(b, insn, &ops[1], ty)?;
        let amount = self.shift_amount(b, insn, ty, &ops[2])?;
        let width = b.const_int(ty, u128::from(ty.bits()));
        let inv = b.bin(BinOp::Sub, width, amount);
        let right = b.bin(BinOp::LShr, value, amount);
        let left = b.bin(BinOp::Shl, value, inv);
        let result = b.bin(BinOp::Or, right, left);
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `EXTR` — `(rm >> lsb) | (rn << (w - lsb))`; at `lsb == 0` the left
    /// term shifts by the full width and contributes nothing.
    pub(crate) fn lift_extr(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(4))?;
        let ty = self.dest_ty(&ops[0])?;
        let n = self.load_operand(b, insn, &ops[1], ty)?;
        let m = self.load_operand(b, insn, &ops[2], ty)?;
        let lsb = self.load_operand(b, insn, &ops[3], ty)?;
        let width = b.const_int(ty, u128::from(ty.bits()));
        let inv = b.bin(BinOp::Sub, width, lsb);
        let right = b.bin(BinOp::LShr, m, lsb);
        let left = b.bin(BinOp::Shl, n, inv);
        let result = b.bin(BinOp::Or, right, left);
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `SXTB`/`SXTH`/`SXTW`/`UXTB`/`UXTH` — truncate to the source width,
    /// then extend to the destination.
    pub(crate) fn lift_extend(
        &mut self,
        b: &mut Builder,
        insn: &Insn,
        src: Ty,
        signed: bool,
    ) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(2))?;
        let ty = self.dest_ty(&ops[0])?;
        let narrow = self.load_operand(b, insn, &ops[1], src)?;
        let result = if signed {
            b.sext_or_trunc(ty, narrow)
        } else {
            b.zext_or_trunc(ty, narrow)
        };
        self.store_operand(b, insn, &ops[0], result)
    }

    /// A shift amount operand: immediates pass through, register amounts
    /// reduce modulo the operand width as the variable-shift forms do.
    fn shift_amount(
        &mut self,
        b: &mut Builder,
        insn: &Insn,
        ty: Ty,
        op: &hoist_asm::Operand,
    ) -> Result<hoist_ir::ValueId> {
        let amount = self.load_operand(b, insn, op, ty)?;
        if matches!(op.kind, OperandKind::Reg(_)) {
            let mask = b.const_int(ty, u128::from(ty.bits() - 1));
            Ok(b.bin(BinOp::And, amount, mask))
        } else {
            Ok(amount)
        }
    }
}
