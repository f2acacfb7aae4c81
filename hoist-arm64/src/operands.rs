use hoist_asm::{Extender, Insn, MemOperand, Operand, OperandKind, Reg, Shift, ShiftKind};
use hoist_ir::{BinOp, Builder, CmpOp, Ty, ValueId};

use crate::{Environ, Result, TranslateError, Translator};

impl Translator {
    /// Evaluate an operand to a value of `ty`.
    ///
    /// Registers resolve through their parent cell, then the operand's
    /// extender and shifter apply in that order. Immediates materialize at
    /// `ty` before shifting. Memory operands compute their address and load
    /// an element of `ty`.
    pub(crate) fn load_operand(
        &self,
        b: &mut Builder,
        insn: &Insn,
        op: &Operand,
        ty: Ty,
    ) -> Result<ValueId> {
        match op.kind {
            OperandKind::Reg(reg) | OperandKind::Sys(reg) => {
                let raw = self.load_register(b, insn, reg)?;
                let extended = match op.ext {
                    Some(ext) => self.apply_extender(b, raw, ext, ty),
                    None => b.zext_or_trunc(ty, raw),
                };
                self.apply_shift(b, insn, extended, op.shift)
            }
            OperandKind::Imm(value) => {
                let imm = b.const_int(ty, value as u128);
                self.apply_shift(b, insn, imm, op.shift)
            }
            OperandKind::Mem(mem) => {
                let addr = self.mem_address(b, insn, &mem, op)?;
                Ok(b.load(ty, addr))
            }
            _ => Err(unsupported(op)),
        }
    }

    /// Evaluate a memory operand to its effective address instead of its
    /// pointee.
    pub(crate) fn load_operand_address(
        &self,
        b: &mut Builder,
        insn: &Insn,
        op: &Operand,
    ) -> Result<ValueId> {
        match op.kind {
            OperandKind::Mem(mem) => self.mem_address(b, insn, &mem, op),
            _ => Err(unsupported(op)),
        }
    }

    /// Read one register at its architectural width.
    ///
    /// The program counter reads as the address one instruction past the
    /// current one; the zero register reads as zero. Neither touches a
    /// global.
    pub(crate) fn load_register(
        &self,
        b: &mut Builder,
        insn: &Insn,
        reg: Reg,
    ) -> Result<ValueId> {
        if reg.bit_size() > 64 {
            return Err(TranslateError::UnsupportedOperand("vector register"));
        }
        if matches!(reg.parent(), Reg::Pc) {
            return Ok(b.const_int(Ty::I64, u128::from(insn.end_address())));
        }
        let reg_ty = Environ::register_type(reg);
        if reg.is_zero() {
            return Ok(b.const_int(reg_ty, 0));
        }
        let parent = b.read_global(self.env.get_parent(reg));
        Ok(b.zext_or_trunc(reg_ty, parent))
    }

    /// Write one register, resolving aliases onto the parent cell.
    ///
    /// The 32-bit views of 64-bit registers zero-extend into the parent;
    /// narrower views (none exist on this architecture, but the rule is
    /// uniform) read-modify-write their lane. Writes to the zero register
    /// and the program counter are discarded.
    pub(crate) fn store_register(
        &self,
        b: &mut Builder,
        reg: Reg,
        value: ValueId,
    ) -> Result<()> {
        if reg.bit_size() > 64 {
            return Err(TranslateError::UnsupportedOperand("vector register"));
        }
        if reg.is_zero() || matches!(reg.parent(), Reg::Pc) {
            return Ok(());
        }
        let parent = reg.parent();
        let parent_ty = Environ::register_type(parent);
        let reg_ty = Environ::register_type(reg);
        let narrowed = b.zext_or_trunc(reg_ty, value);
        let global = self.env.get_parent(reg);

        if reg == parent {
            b.write_global(global, narrowed);
        } else if parent_ty == Ty::I64 && reg_ty == Ty::I32 {
            let widened = b.zext(parent_ty, narrowed);
            b.write_global(global, widened);
        } else {
            let keep = b.const_int(parent_ty, !reg_ty.mask());
            let old = b.read_global(global);
            let masked = b.bin(BinOp::And, old, keep);
            let lane = b.zext_or_trunc(parent_ty, narrowed);
            let merged = b.bin(BinOp::Or, masked, lane);
            b.write_global(global, merged);
        }
        Ok(())
    }

    /// Store a value through an operand: into a register or to memory.
    pub(crate) fn store_operand(
        &self,
        b: &mut Builder,
        insn: &Insn,
        op: &Operand,
        value: ValueId,
    ) -> Result<()> {
        match op.kind {
            OperandKind::Reg(reg) | OperandKind::Sys(reg) => self.store_register(b, reg, value),
            OperandKind::Mem(mem) => {
                let addr = self.mem_address(b, insn, &mem, op)?;
                b.store(addr, value);
                Ok(())
            }
            _ => Err(unsupported(op)),
        }
    }

    /// Effective address of a memory operand: `base`, plus displacement,
    /// plus the extended and shifted index, in that order. All arithmetic
    /// happens at the default 64-bit width.
    pub(crate) fn mem_address(
        &self,
        b: &mut Builder,
        insn: &Insn,
        mem: &MemOperand,
        op: &Operand,
    ) -> Result<ValueId> {
        let mut addr: Option<ValueId> = None;

        if let Some(base) = mem.base {
            let base_v = self.load_register(b, insn, base)?;
            addr = Some(b.zext_or_trunc(Ty::I64, base_v));
        }
        if mem.disp != 0 {
            let disp = b.const_int(Ty::I64, mem.disp as u128);
            addr = Some(match addr {
                Some(a) => b.bin(BinOp::Add, a, disp),
                None => disp,
            });
        }
        if let Some(index) = mem.index {
            let raw = self.load_register(b, insn, index)?;
            let extended = match op.ext {
                Some(ext) => self.apply_extender(b, raw, ext, Ty::I64),
                None => b.zext_or_trunc(Ty::I64, raw),
            };
            let shifted = self.apply_shift(b, insn, extended, op.shift)?;
            addr = Some(match addr {
                Some(a) => b.bin(BinOp::Add, a, shifted),
                None => shifted,
            });
        }

        Ok(match addr {
            Some(a) => a,
            None => b.const_int(Ty::I64, 0),
        })
    }

    /// Apply the post-access base update of pre/post-indexed addressing.
    ///
    /// A bare immediate operand following the memory operand marks the
    /// post-indexed form, which always writes back `base + imm`. Otherwise
    /// the decoded writeback bit marks the pre-indexed form, which writes
    /// back the already-computed effective address.
    pub(crate) fn mem_writeback(
        &self,
        b: &mut Builder,
        insn: &Insn,
        mem_index: usize,
        addr: ValueId,
    ) -> Result<()> {
        let operands = &insn.detail.operands;
        let mem = match operands[mem_index].kind {
            OperandKind::Mem(mem) => mem,
            _ => return Err(unsupported(&operands[mem_index])),
        };
        let Some(base) = mem.base else {
            return Ok(());
        };

        if let Some(post) = operands.get(mem_index + 1).and_then(Operand::as_imm) {
            let offset = b.const_int(Ty::I64, post as u128);
            let updated = b.bin(BinOp::Add, addr, offset);
            self.store_register(b, base, updated)
        } else if insn.detail.writeback {
            self.store_register(b, base, addr)
        } else {
            Ok(())
        }
    }

    /// Narrow to the extender's source width, then extend to `ty`.
    pub(crate) fn apply_extender(
        &self,
        b: &mut Builder,
        value: ValueId,
        ext: Extender,
        ty: Ty,
    ) -> ValueId {
        let src_ty = Ty::of_bits(ext.source_bits()).unwrap_or(Ty::I64);
        let narrowed = b.zext_or_trunc(src_ty, value);
        if ext.is_signed() {
            b.sext_or_trunc(ty, narrowed)
        } else {
            b.zext_or_trunc(ty, narrowed)
        }
    }

    /// Apply an operand shifter.
    ///
    /// Shift amounts are immediates; ROR is the usual two-shift rotate
    /// (shift amounts at or above the width yield zero, so the degenerate
    /// rotate by 0 folds away). The carry update of the flag-setting shift
    /// variant applies only when the instruction requests flags.
    pub(crate) fn apply_shift(
        &self,
        b: &mut Builder,
        insn: &Insn,
        value: ValueId,
        shift: Option<Shift>,
    ) -> Result<ValueId> {
        let Some(shift) = shift else {
            return Ok(value);
        };
        if shift.amount == 0 {
            return Ok(value);
        }
        let ty = match b.value_ty(value) {
            Some(ty) => ty,
            None => Ty::I64,
        };
        let width = ty.bits();
        let amount = b.const_int(ty, u128::from(shift.amount));

        let shifted = match shift.kind {
            ShiftKind::Lsl => b.bin(BinOp::Shl, value, amount),
            ShiftKind::Lsr => b.bin(BinOp::LShr, value, amount),
            ShiftKind::Asr => b.bin(BinOp::AShr, value, amount),
            ShiftKind::Ror => {
                let right = b.bin(BinOp::LShr, value, amount);
                let inv = b.const_int(ty, u128::from(width - shift.amount.min(width)));
                let left = b.bin(BinOp::Shl, value, inv);
                b.bin(BinOp::Or, right, left)
            }
            ShiftKind::Msl => {
                // TODO: pin down the ones-shifted-in semantics against the
                // architecture manual before modeling this form.
                return Err(TranslateError::UnsupportedOperand("msl shifter"));
            }
        };

        if insn.detail.update_flags {
            let carry_bit = match shift.kind {
                ShiftKind::Lsl => width.saturating_sub(shift.amount),
                _ => shift.amount - 1,
            };
            if carry_bit < width {
                let pos = b.const_int(ty, u128::from(carry_bit));
                let moved = b.bin(BinOp::LShr, value, pos);
                let one = b.const_int(ty, 1);
                let bit = b.bin(BinOp::And, moved, one);
                let zero = b.const_int(ty, 0);
                let carry = b.cmp(CmpOp::Ne, bit, zero);
                b.write_global(self.env.get_parent(Reg::C), carry);
            }
        }

        Ok(shifted)
    }
}

fn unsupported(op: &Operand) -> TranslateError {
    TranslateError::UnsupportedOperand(match op.kind {
        OperandKind::Reg(_) | OperandKind::Sys(_) | OperandKind::Mem(_) => "operand position",
        OperandKind::Imm(_) | OperandKind::CImm(_) => "immediate in a store position",
        OperandKind::Fp(_) => "floating-point immediate",
        OperandKind::Prefetch(_) => "prefetch hint",
        OperandKind::Barrier(_) => "barrier operation",
        OperandKind::Pstate(_) => "pstate field",
        OperandKind::RegMrs(_) => "mrs system register",
        OperandKind::RegMsr(_) => "msr system register",
    })
}
