use hoist_asm::{Cond, Reg};
use hoist_ir::{BinOp, Builder, CmpOp, Ty, ValueId};

use crate::{Result, TranslateError, Translator};

/// The four flag values produced by a flag-setting operation, each an `i1`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Flags {
    pub n: ValueId,
    pub z: ValueId,
    pub c: ValueId,
    pub v: ValueId,
}

impl Translator {
    pub(crate) fn load_flag(&self, b: &mut Builder, flag: Reg) -> ValueId {
        debug_assert!(flag.is_flag());
        b.read_global(self.env.get_parent(flag))
    }

    pub(crate) fn store_flags(&self, b: &mut Builder, flags: Flags) {
        b.write_global(self.env.get_parent(Reg::N), flags.n);
        b.write_global(self.env.get_parent(Reg::Z), flags.z);
        b.write_global(self.env.get_parent(Reg::C), flags.c);
        b.write_global(self.env.get_parent(Reg::V), flags.v);
    }

    /// The boolean expression of a gating condition over the flag cells.
    ///
    /// `Al`/`Nv`/`Invalid` never reach this: handlers treat them as
    /// unconditional before asking for an expression.
    pub(crate) fn cond_expr(&self, b: &mut Builder, cc: Cond) -> Result<ValueId> {
        let expr = match cc {
            Cond::Eq => self.load_flag(b, Reg::Z),
            Cond::Ne => {
                let z = self.load_flag(b, Reg::Z);
                b.not(z)
            }
            Cond::Hs => self.load_flag(b, Reg::C),
            Cond::Lo => {
                let c = self.load_flag(b, Reg::C);
                b.not(c)
            }
            Cond::Mi => self.load_flag(b, Reg::N),
            Cond::Pl => {
                let n = self.load_flag(b, Reg::N);
                b.not(n)
            }
            Cond::Vs => self.load_flag(b, Reg::V),
            Cond::Vc => {
                let v = self.load_flag(b, Reg::V);
                b.not(v)
            }
            Cond::Hi => {
                let c = self.load_flag(b, Reg::C);
                let z = self.load_flag(b, Reg::Z);
                let nz = b.not(z);
                b.bin(BinOp::And, c, nz)
            }
            Cond::Ls => {
                let c = self.load_flag(b, Reg::C);
                let z = self.load_flag(b, Reg::Z);
                let nc = b.not(c);
                b.bin(BinOp::Or, nc, z)
            }
            Cond::Ge => {
                let n = self.load_flag(b, Reg::N);
                let v = self.load_flag(b, Reg::V);
                let ne = b.bin(BinOp::Xor, n, v);
                b.not(ne)
            }
            Cond::Lt => {
                let n = self.load_flag(b, Reg::N);
                let v = self.load_flag(b, Reg::V);
                b.bin(BinOp::Xor, n, v)
            }
            Cond::Gt => {
                let z = self.load_flag(b, Reg::Z);
                let n = self.load_flag(b, Reg::N);
                let v = self.load_flag(b, Reg::V);
                let lt = b.bin(BinOp::Xor, n, v);
                let le = b.bin(BinOp::Or, z, lt);
                b.not(le)
            }
            Cond::Le => {
                let z = self.load_flag(b, Reg::Z);
                let n = self.load_flag(b, Reg::N);
                let v = self.load_flag(b, Reg::V);
                let lt = b.bin(BinOp::Xor, n, v);
                b.bin(BinOp::Or, z, lt)
            }
            Cond::Invalid | Cond::Al | Cond::Nv => {
                return Err(TranslateError::InvalidCondition(cc))
            }
        };
        Ok(expr)
    }

    /// N and Z of a result: sign bit, and equality with zero.
    pub(crate) fn nz_flags(&self, b: &mut Builder, result: ValueId) -> (ValueId, ValueId) {
        let ty = b.value_ty(result).unwrap_or(Ty::I64);
        let zero = b.const_int(ty, 0);
        let n = b.cmp(CmpOp::Slt, result, zero);
        let z = b.cmp(CmpOp::Eq, result, zero);
        (n, z)
    }

    /// Flags of `result = a + rhs (+ carry_in)` at the operands' width.
    ///
    /// With a carry-in the unsigned overflow is three-way: the partial sum
    /// `a + rhs` may wrap, and adding the carry may wrap again.
    pub(crate) fn add_flags(
        &self,
        b: &mut Builder,
        a: ValueId,
        rhs: ValueId,
        carry_in: Option<ValueId>,
        result: ValueId,
    ) -> Flags {
        let (n, z) = self.nz_flags(b, result);
        let c = match carry_in {
            None => b.cmp(CmpOp::Ult, result, a),
            Some(_) => {
                let partial = b.bin(BinOp::Add, a, rhs);
                let c1 = b.cmp(CmpOp::Ult, partial, a);
                let c2 = b.cmp(CmpOp::Ult, result, partial);
                b.bin(BinOp::Or, c1, c2)
            }
        };
        // Signed overflow: operands agree in sign, result disagrees.
        let ty = b.value_ty(result).unwrap_or(Ty::I64);
        let zero = b.const_int(ty, 0);
        let xa = b.bin(BinOp::Xor, a, result);
        let xb = b.bin(BinOp::Xor, rhs, result);
        let both = b.bin(BinOp::And, xa, xb);
        let v = b.cmp(CmpOp::Slt, both, zero);
        Flags { n, z, c, v }
    }

    /// Flags of `result = a - rhs`. C is the *absence* of unsigned borrow.
    pub(crate) fn sub_flags(
        &self,
        b: &mut Builder,
        a: ValueId,
        rhs: ValueId,
        result: ValueId,
    ) -> Flags {
        let (n, z) = self.nz_flags(b, result);
        let c = b.cmp(CmpOp::Uge, a, rhs);
        // Signed overflow: operands disagree in sign and the result's sign
        // left the minuend's.
        let ty = b.value_ty(result).unwrap_or(Ty::I64);
        let zero = b.const_int(ty, 0);
        let xab = b.bin(BinOp::Xor, a, rhs);
        let xar = b.bin(BinOp::Xor, a, result);
        let both = b.bin(BinOp::And, xab, xar);
        let v = b.cmp(CmpOp::Slt, both, zero);
        Flags { n, z, c, v }
    }

    /// Flags of a logical operation: N/Z from the result, C and V cleared.
    pub(crate) fn logical_flags(&self, b: &mut Builder, result: ValueId) -> Flags {
        let (n, z) = self.nz_flags(b, result);
        let c = b.const_int(Ty::I1, 0);
        let v = b.const_int(Ty::I1, 0);
        Flags { n, z, c, v }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Translator;
    use hoist_ir::eval::{self, Machine};
    use hoist_ir::Module;
    use strum::IntoEnumIterator;

    fn reference(cc: Cond, n: bool, z: bool, c: bool, v: bool) -> bool {
        match cc {
            Cond::Eq => z,
            Cond::Ne => !z,
            Cond::Hs => c,
            Cond::Lo => !c,
            Cond::Mi => n,
            Cond::Pl => !n,
            Cond::Vs => v,
            Cond::Vc => !v,
            Cond::Hi => c && !z,
            Cond::Ls => !c || z,
            Cond::Ge => n == v,
            Cond::Lt => n != v,
            Cond::Gt => !z && n == v,
            Cond::Le => z || n != v,
            Cond::Invalid | Cond::Al | Cond::Nv => unreachable!(),
        }
    }

    #[test]
    fn every_condition_matches_the_reference_over_all_flag_states() {
        for cc in Cond::iter().filter(|cc| cc.is_conditional()) {
            for bits in 0u8..16 {
                let (n, z, c, v) = (bits & 8 != 0, bits & 4 != 0, bits & 2 != 0, bits & 1 != 0);

                let mut module = Module::new();
                let tr = Translator::new(&mut module);
                let func = module.add_function("cond");
                let mut b = Builder::new(&mut module, func);
                let expr = tr.cond_expr(&mut b, cc).unwrap();
                let probe = b.module().add_global("probe", Ty::I1);
                b.write_global(probe, expr);

                let mut machine = Machine::default();
                for (flag, set) in [(Reg::N, n), (Reg::Z, z), (Reg::C, c), (Reg::V, v)] {
                    machine.set_global(tr.env.get_parent(flag), u128::from(set));
                }
                let effects = eval::run(&module, func, &mut machine).unwrap();
                assert_eq!(
                    effects.reg_stores.get(&probe),
                    Some(&u128::from(reference(cc, n, z, c, v))),
                    "{cc} with n={n} z={z} c={c} v={v}"
                );
            }
        }
    }

    #[test]
    fn non_gating_conditions_are_programmer_errors() {
        let mut module = Module::new();
        let tr = Translator::new(&mut module);
        let func = module.add_function("cond");
        let mut b = Builder::new(&mut module, func);
        for cc in [Cond::Invalid, Cond::Al, Cond::Nv] {
            assert_eq!(
                tr.cond_expr(&mut b, cc),
                Err(TranslateError::InvalidCondition(cc))
            );
        }
    }
}
