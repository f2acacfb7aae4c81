use std::collections::HashSet;

use hoist_asm::{Insn, Mnemonic, OperandKind, Reg};
use hoist_ir::{Builder, GlobalId, Module, Ty, ValueId};

use crate::{Environ, Result, TranslateError};

/// The ARM64 translation driver.
///
/// Owns the register environment of one module and dispatches decoded
/// instructions to their semantics. The decoded record is borrowed for the
/// duration of [`Translator::translate`] and never retained.
#[derive(Debug)]
pub struct Translator {
    pub(crate) env: Environ,
    reported: HashSet<Mnemonic>,
    in_cond_body: bool,
}

impl Translator {
    /// Build a translator and its register environment over `module`.
    pub fn new(module: &mut Module) -> Self {
        Self {
            env: Environ::new(module),
            reported: HashSet::new(),
            in_cond_body: false,
        }
    }

    /// The register environment.
    pub fn environ(&self) -> &Environ {
        &self.env
    }

    /// The backing global of a parent register, `None` for aliases.
    pub fn get_register(&self, reg: Reg) -> Option<GlobalId> {
        self.env.get(reg)
    }

    /// Raw-id parent lookup, returning the input when out of table range.
    pub fn get_parent_register(&self, raw: u16) -> u16 {
        Environ::parent_of(raw)
    }

    /// Raw-id register width in bits.
    pub fn get_register_bit_size(&self, raw: u16) -> u32 {
        Environ::bit_size_of(raw)
    }

    /// Whether the last translated instruction emitted its body inside a
    /// condition gate (a conditional branch or a conditional fallback).
    /// Downstream passes use this observation; it resets on every call.
    pub fn in_conditional_body(&self) -> bool {
        self.in_cond_body
    }

    pub(crate) fn enter_conditional_body(&mut self) {
        self.in_cond_body = true;
    }

    /// Append the IR for one decoded instruction at the builder's insertion
    /// point.
    ///
    /// Unknown mnemonics are reported once and lifted through the opaque-asm
    /// fallback; operand-shape violations surface as typed errors that are
    /// fatal for this instruction only.
    #[tracing::instrument(name = "translate", level = "trace", skip(self, b), fields(mnemonic = %insn.mnemonic, address = insn.address))]
    pub fn translate(&mut self, insn: &Insn, b: &mut Builder) -> Result<()> {
        self.in_cond_body = false;

        use Mnemonic::*;
        match insn.mnemonic {
            Add | Adds => self.lift_add_sub(b, insn, false),
            Sub | Subs => self.lift_add_sub(b, insn, true),
            Adc | Adcs => self.lift_adc(b, insn),
            Sbc | Sbcs => self.lift_sbc(b, insn),
            Cmn => self.lift_cmp_cmn(b, insn, false),
            Cmp => self.lift_cmp_cmn(b, insn, true),
            Neg | Negs => self.lift_neg(b, insn),
            Ngc | Ngcs => self.lift_ngc(b, insn),

            And | Ands => self.lift_logical(b, insn, hoist_ir::BinOp::And, false),
            Orr => self.lift_logical(b, insn, hoist_ir::BinOp::Or, false),
            Orn => self.lift_logical(b, insn, hoist_ir::BinOp::Or, true),
            Eor => self.lift_logical(b, insn, hoist_ir::BinOp::Xor, false),
            Eon => self.lift_logical(b, insn, hoist_ir::BinOp::Xor, true),
            Tst => self.lift_tst(b, insn),

            Mov | Movz => self.lift_mov(b, insn, false),
            Mvn => self.lift_mov(b, insn, true),

            Lsl => self.lift_shift(b, insn, hoist_ir::BinOp::Shl),
            Lsr => self.lift_shift(b, insn, hoist_ir::BinOp::LShr),
            Asr => self.lift_shift(b, insn, hoist_ir::BinOp::AShr),
            Ror => self.lift_ror(b, insn),
            Extr => self.lift_extr(b, insn),
            Sxtb => self.lift_extend(b, insn, Ty::I8, true),
            Sxth => self.lift_extend(b, insn, Ty::I16, true),
            Sxtw => self.lift_extend(b, insn, Ty::I32, true),
            Uxtb => self.lift_extend(b, insn, Ty::I8, false),
            Uxth => self.lift_extend(b, insn, Ty::I16, false),

            Mul | Mneg => self.lift_mul(b, insn),
            Madd | Msub => self.lift_madd_msub(b, insn),
            Umull | Smull | Umnegl | Smnegl => self.lift_mull(b, insn),
            Umaddl | Smaddl | Umsubl | Smsubl => self.lift_maddl_msubl(b, insn),
            Umulh | Smulh => self.lift_mulh(b, insn),
            Udiv => self.lift_div(b, insn, false),
            Sdiv => self.lift_div(b, insn, true),

            Str | Stur => self.lift_store(b, insn, None),
            Strb | Sturb => self.lift_store(b, insn, Some(Ty::I8)),
            Strh | Sturh => self.lift_store(b, insn, Some(Ty::I16)),
            Stp => self.lift_stp(b, insn),
            Ldr | Ldur => self.lift_load(b, insn, None, false),
            Ldrb | Ldurb => self.lift_load(b, insn, Some(Ty::I8), false),
            Ldrh | Ldurh => self.lift_load(b, insn, Some(Ty::I16), false),
            Ldrsb | Ldursb => self.lift_load(b, insn, Some(Ty::I8), true),
            Ldrsh | Ldursh => self.lift_load(b, insn, Some(Ty::I16), true),
            Ldrsw | Ldursw => self.lift_load(b, insn, Some(Ty::I32), true),
            Ldp | Ldpsw => self.lift_ldp(b, insn),

            Adr | Adrp => self.lift_adr(b, insn),

            Csel | Csinc | Csinv | Csneg => self.lift_csel(b, insn),
            Cset | Csetm => self.lift_cset(b, insn),
            Cinc | Cinv | Cneg => self.lift_cond_unary(b, insn),
            Ccmp => self.lift_ccmp_ccmn(b, insn, true),
            Ccmn => self.lift_ccmp_ccmn(b, insn, false),

            B => self.lift_b(b, insn),
            Bl => self.lift_bl(b, insn),
            Br => self.lift_br(b, insn),
            Blr => self.lift_blr(b, insn),
            Ret => self.lift_ret(b, insn),
            Cbz => self.lift_cbz(b, insn, true),
            Cbnz => self.lift_cbz(b, insn, false),
            Tbz => self.lift_tbz(b, insn, true),
            Tbnz => self.lift_tbz(b, insn, false),

            Nop => Ok(()),

            Movk | Movn | Clz | Rbit | Rev | Rev16 | Rev32 | Svc | Brk | Hint | Mrs | Msr
            | Fmov | Fadd => self.lift_fallback(b, insn),
        }
    }

    /// Lift an instruction without modeled semantics as a call to an opaque
    /// per-mnemonic function.
    ///
    /// Downstream passes treat the call as a side effect that uses its
    /// argument registers and defines the stored destination, which keeps
    /// data flow intact without per-opcode knowledge.
    fn lift_fallback(&mut self, b: &mut Builder, insn: &Insn) -> Result<()> {
        if self.reported.insert(insn.mnemonic) {
            let unhandled = TranslateError::UnhandledInstruction(insn.mnemonic);
            tracing::warn!(mnemonic = %insn.mnemonic, "{unhandled}; emitting opaque-asm call");
        }

        let cc = insn.detail.cc;
        if cc.is_conditional() {
            self.enter_conditional_body();
            let cond = self.cond_expr(b, cc)?;
            b.if_then(cond, |b| self.emit_asm_call(b, insn))
        } else {
            self.emit_asm_call(b, insn)
        }
    }

    fn emit_asm_call(&self, b: &mut Builder, insn: &Insn) -> Result<()> {
        let operands = &insn.detail.operands;

        // The first write-access register operand receives the call result.
        let dest = operands.first().filter(|op| {
            op.access.contains(hoist_asm::Access::WRITE)
                && matches!(op.kind, OperandKind::Reg(_))
        });

        let mut args: Vec<ValueId> = Vec::with_capacity(operands.len());
        for op in operands.iter().skip(usize::from(dest.is_some())) {
            let value = match op.kind {
                OperandKind::Reg(reg) | OperandKind::Sys(reg) => {
                    self.load_operand(b, insn, op, Environ::register_type(reg))?
                }
                OperandKind::Imm(_) => self.load_operand(b, insn, op, Ty::I64)?,
                OperandKind::Mem(_) => self.load_operand_address(b, insn, op)?,
                OperandKind::Fp(_) => {
                    return Err(TranslateError::UnsupportedOperand(
                        "floating-point immediate",
                    ))
                }
                OperandKind::Prefetch(_) => {
                    return Err(TranslateError::UnsupportedOperand("prefetch hint"))
                }
                OperandKind::Barrier(_) => {
                    return Err(TranslateError::UnsupportedOperand("barrier operation"))
                }
                OperandKind::CImm(_) => {
                    return Err(TranslateError::UnsupportedOperand("c-immediate"))
                }
                OperandKind::Pstate(_) => {
                    return Err(TranslateError::UnsupportedOperand("pstate field"))
                }
                OperandKind::RegMrs(_) => {
                    return Err(TranslateError::UnsupportedOperand("mrs system register"))
                }
                OperandKind::RegMsr(_) => {
                    return Err(TranslateError::UnsupportedOperand("msr system register"))
                }
            };
            args.push(value);
        }

        let ret = dest
            .and_then(|op| op.as_reg())
            .map(Environ::register_type);
        let arg_tys = args
            .iter()
            .map(|&a| b.value_ty(a).unwrap_or(Ty::I64))
            .collect();
        let callee = b
            .module()
            .asm_fn(&insn.mnemonic.to_string(), arg_tys, ret);
        let result = b.call(callee, args);

        if let Some(dest) = dest {
            self.store_operand(b, insn, dest, result)?;
        }
        Ok(())
    }
}
