//! Multiply, multiply-accumulate, widening multiplies, and division.

use hoist_asm::{Insn, Mnemonic};
use hoist_ir::{BinOp, Builder, CmpOp, Ty, ValueId};

use super::{expect_operands, Arity};
use crate::{Result, Translator};

impl Translator {
    /// `MUL`/`MNEG`.
    pub(crate) fn lift_mul(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(3))?;
        let ty = self.dest_ty(&ops[0])?;
        let n = self.load_operand(b, insn, &ops[1], ty)?;
        let m = self.load_operand(b, insn, &ops[2], ty)?;
        let mut result = b.bin(BinOp::Mul, n, m);
        if insn.mnemonic == Mnemonic::Mneg {
            result = b.neg(result);
        }
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `MADD` (`rn * rm + ra`) and `MSUB` (`ra - rn * rm`).
    pub(crate) fn lift_madd_msub(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(4))?;
        let ty = self.dest_ty(&ops[0])?;
        let n = self.load_operand(b, insn, &ops[1], ty)?;
        let m = self.load_operand(b, insn, &ops[2], ty)?;
        let acc = self.load_operand(b, insn, &ops[3], ty)?;
        let product = b.bin(BinOp::Mul, n, m);
        let result = if insn.mnemonic == Mnemonic::Msub {
            b.bin(BinOp::Sub, acc, product)
        } else {
            b.bin(BinOp::Add, product, acc)
        };
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `UMULL`/`SMULL`/`UMNEGL`/`SMNEGL` — 32-bit sources extended to a
    /// 64-bit product.
    pub(crate) fn lift_mull(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(3))?;
        let signed = matches!(insn.mnemonic, Mnemonic::Smull | Mnemonic::Smnegl);
        let (n, m) = self.widened_sources(b, insn, &ops[1], &ops[2], signed)?;
        let mut result = b.bin(BinOp::Mul, n, m);
        if matches!(insn.mnemonic, Mnemonic::Umnegl | Mnemonic::Smnegl) {
            result = b.neg(result);
        }
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `UMADDL`/`SMADDL`/`UMSUBL`/`SMSUBL` — widening multiply-accumulate
    /// against a 64-bit accumulator.
    pub(crate) fn lift_maddl_msubl(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(4))?;
        let signed = matches!(insn.mnemonic, Mnemonic::Smaddl | Mnemonic::Smsubl);
        let (n, m) = self.widened_sources(b, insn, &ops[1], &ops[2], signed)?;
        let acc = self.load_operand(b, insn, &ops[3], Ty::I64)?;
        let product = b.bin(BinOp::Mul, n, m);
        let result = if matches!(insn.mnemonic, Mnemonic::Umsubl | Mnemonic::Smsubl) {
            b.bin(BinOp::Sub, acc, product)
        } else {
            b.bin(BinOp::Add, product, acc)
        };
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `UMULH`/`SMULH` — the high 64 bits of the 128-bit product.
    pub(crate) fn lift_mulh(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(3))?;
        let signed = insn.mnemonic == Mnemonic::Smulh;
        let n = self.load_operand(b, insn, &ops[1], Ty::I64)?;
        let m = self.load_operand(b, insn, &ops[2], Ty::I64)?;
        let (n, m) = if signed {
            (b.sext(Ty::I128, n), b.sext(Ty::I128, m))
        } else {
            (b.zext(Ty::I128, n), b.zext(Ty::I128, m))
        };
        let product = b.bin(BinOp::Mul, n, m);
        let sixty_four = b.const_int(Ty::I128, 64);
        let high = b.bin(BinOp::LShr, product, sixty_four);
        let result = b.trunc(Ty::I64, high);
        self.store_operand(b, insn, &ops[0], result)
    }

    /// `UDIV`/`SDIV` — a zero divisor yields zero through explicit control
    /// flow, so no division ever executes with a zero right-hand side.
    pub(crate) fn lift_div(&mut self, b: &mut Builder, insn: &Insn, signed: bool) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(3))?;
        let ty = self.dest_ty(&ops[0])?;
        let n = self.load_operand(b, insn, &ops[1], ty)?;
        let m = self.load_operand(b, insn, &ops[2], ty)?;
        let zero = b.const_int(ty, 0);
        let divisor_is_zero = b.cmp(CmpOp::Eq, m, zero);
        b.if_then_else(
            divisor_is_zero,
            |b| {
                let zero = b.const_int(ty, 0);
                self.store_operand(b, insn, &ops[0], zero)
            },
            |b| {
                let op = if signed { BinOp::SDiv } else { BinOp::UDiv };
                let quotient = b.bin(op, n, m);
                self.store_operand(b, insn, &ops[0], quotient)
            },
        )
    }

    fn widened_sources(
        &mut self,
        b: &mut Builder,
        insn: &Insn,
        lhs: &hoist_asm::Operand,
        rhs: &hoist_asm::Operand,
        signed: bool,
    ) -> Result<(ValueId, ValueId)> {
        let n = self.load_operand(b, insn, lhs, Ty::I32)?;
        let m = self.load_operand(b, insn, rhs, Ty::I32)?;
        Ok(if signed {
            (b.sext(Ty::I64, n), b.sext(Ty::I64, m))
        } else {
            (b.zext(Ty::I64, n), b.zext(Ty::I64, m))
        })
    }
}
