//! Loads, stores, register pairs, and address formation.
//!
//! All three addressing forms share one path: compute the effective
//! address, access, then let [`Translator::mem_writeback`] apply the
//! pre/post-indexed base update. A bare immediate in the address position
//! is a literal access at that absolute address.

use hoist_asm::{Insn, Mnemonic, OperandKind};
use hoist_ir::{BinOp, Builder, Ty, ValueId};

use super::{expect_operands, operand_reg, Arity};
use crate::{Result, TranslateError, Translator};

impl Translator {
    /// `STR`/`STRB`/`STRH` and the unscaled `STUR` forms. `elem` narrows
    /// the source below the register width when present.
    pub(crate) fn lift_store(
        &mut self,
        b: &mut Builder,
        insn: &Insn,
        elem: Option<Ty>,
    ) -> Result<()> {
        let ops = expect_operands(insn, Arity::Between(2, 3))?;
        let ty = match elem {
            Some(ty) => ty,
            None => self.dest_ty(&ops[0])?,
        };
        let value = self.load_operand(b, insn, &ops[0], ty)?;
        let addr = self.address_operand(b, insn, &ops[1])?;
        b.store(addr, value);
        self.mem_writeback(b, insn, 1, addr)
    }

    /// The load family. `elem` is the memory element width (`None` means
    /// the destination register width); `signed` selects sign extension
    /// into the destination.
    pub(crate) fn lift_load(
        &mut self,
        b: &mut Builder,
        insn: &Insn,
        elem: Option<Ty>,
        signed: bool,
    ) -> Result<()> {
        let ops = expect_operands(insn, Arity::Between(2, 3))?;
        let dst_ty = self.dest_ty(&ops[0])?;
        let ty = elem.unwrap_or(dst_ty);
        let addr = self.address_operand(b, insn, &ops[1])?;
        let loaded = b.load(ty, addr);
        let value = if signed {
            b.sext_or_trunc(dst_ty, loaded)
        } else {
            b.zext_or_trunc(dst_ty, loaded)
        };
        let reg = operand_reg(&ops[0])?;
        self.store_register(b, reg, value)?;
        if matches!(ops[1].kind, OperandKind::Mem(_)) {
            self.mem_writeback(b, insn, 1, addr)?;
        }
        Ok(())
    }

    /// `STP` — two registers at consecutive element-sized offsets.
    pub(crate) fn lift_stp(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Between(3, 4))?;
        let ty = self.dest_ty(&ops[0])?;
        let first = self.load_operand(b, insn, &ops[0], ty)?;
        let second = self.load_operand(b, insn, &ops[1], ty)?;
        let addr = self.address_operand(b, insn, &ops[2])?;
        let next = self.offset_address(b, addr, ty);
        b.store(addr, first);
        b.store(next, second);
        self.mem_writeback(b, insn, 2, addr)
    }

    /// `LDP`/`LDPSW` — a pair of loads at consecutive offsets; `LDPSW`
    /// sign-extends each 32-bit element to 64 bits.
    pub(crate) fn lift_ldp(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Between(3, 4))?;
        let dst_ty = self.dest_ty(&ops[0])?;
        let (ty, signed) = if insn.mnemonic == Mnemonic::Ldpsw {
            (Ty::I32, true)
        } else {
            (dst_ty, false)
        };
        let addr = self.address_operand(b, insn, &ops[2])?;
        let next = self.offset_address(b, addr, ty);

        for (op, at) in [(&ops[0], addr), (&ops[1], next)] {
            let loaded = b.load(ty, at);
            let value = if signed {
                b.sext_or_trunc(dst_ty, loaded)
            } else {
                loaded
            };
            let reg = operand_reg(op)?;
            self.store_register(b, reg, value)?;
        }
        self.mem_writeback(b, insn, 2, addr)
    }

    /// `ADR`/`ADRP`. The disassembler is trusted to fold the pc-relative
    /// computation into a bare immediate; a memory-shaped operand marks an
    /// unfolded encoding and is folded here from the instruction's own
    /// address.
    pub(crate) fn lift_adr(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let ops = expect_operands(insn, Arity::Exactly(2))?;
        let page = insn.mnemonic == Mnemonic::Adrp;
        let value = match ops[1].kind {
            OperandKind::Imm(folded) => b.const_int(Ty::I64, folded as u128),
            OperandKind::Mem(mem) if mem.base.is_none() && mem.index.is_none() => {
                let base = if page {
                    insn.address >> 12 << 12
                } else {
                    insn.address
                };
                let offset = if page { mem.disp << 12 } else { mem.disp };
                b.const_int(Ty::I64, base.wrapping_add(offset as u64) as u128)
            }
            _ => return Err(TranslateError::UnsupportedOperand("pc-relative target")),
        };
        self.store_operand(b, insn, &ops[0], value)
    }

    /// The address of a load/store operand: the effective address of a
    /// memory operand, or a literal absolute address.
    fn address_operand(
        &self,
        b: &mut Builder,
        insn: &Insn,
        op: &hoist_asm::Operand,
    ) -> Result<ValueId> {
        match op.kind {
            OperandKind::Mem(mem) => self.mem_address(b, insn, &mem, op),
            OperandKind::Imm(literal) => Ok(b.const_int(Ty::I64, literal as u128)),
            _ => Err(TranslateError::UnsupportedOperand("address operand")),
        }
    }

    fn offset_address(&self, b: &mut Builder, addr: ValueId, elem: Ty) -> ValueId {
        let size = b.const_int(Ty::I64, u128::from(elem.bytes()));
        b.bin(BinOp::Add, addr, size)
    }
}
