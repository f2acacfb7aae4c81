//! Shared harness: lift one decoded instruction, run the emitted fragment
//! through the reference evaluator, and assert on the recorded effects.

#![allow(dead_code)] // not every test binary uses every assertion

use std::collections::{BTreeMap, BTreeSet};

use hoist_arm64::{Result, Translator};
use hoist_asm::{Insn, Reg};
use hoist_ir::eval::{self, Effects, Machine};
use hoist_ir::{Builder, GlobalId, Module, Ty};

pub struct Harness {
    pub module: Module,
    pub translator: Translator,
    pub machine: Machine,
}

impl Harness {
    pub fn new() -> Self {
        let mut module = Module::new();
        let translator = Translator::new(&mut module);
        Self {
            module,
            translator,
            machine: Machine::default(),
        }
    }

    pub fn global(&self, reg: Reg) -> GlobalId {
        self.translator
            .get_register(reg.parent())
            .expect("parent register has a global")
    }

    /// Seed a register. Sub-register writes merge into the live parent
    /// value the way the hardware views do.
    pub fn set_reg(&mut self, reg: Reg, value: u64) {
        let global = self.global(reg);
        let merged = if reg.bit_size() == 32 {
            (self.machine.global(global) & !0xffff_ffffu128) | u128::from(value as u32)
        } else {
            u128::from(value)
        };
        self.machine.set_global(global, merged);
    }

    pub fn set_flag(&mut self, flag: Reg, value: bool) {
        assert!(flag.is_flag());
        let global = self.global(flag);
        self.machine.set_global(global, u128::from(value));
    }

    pub fn set_mem(&mut self, addr: u64, ty: Ty, value: u128) {
        self.machine.set_mem(addr, ty, value);
    }

    /// Translate and evaluate, panicking on any translation or evaluation
    /// failure.
    pub fn lift(&mut self, insn: &Insn) -> Effects {
        self.try_lift(insn).expect("translation succeeds")
    }

    /// Translate and evaluate, surfacing translation errors.
    pub fn try_lift(&mut self, insn: &Insn) -> Result<Effects> {
        self.try_lift_seq(core::slice::from_ref(insn))
    }

    /// Translate a straight-line run of instructions into one fragment,
    /// then evaluate it.
    pub fn lift_seq(&mut self, insns: &[Insn]) -> Effects {
        self.try_lift_seq(insns).expect("translation succeeds")
    }

    fn try_lift_seq(&mut self, insns: &[Insn]) -> Result<Effects> {
        let address = insns.first().map_or(0, |insn| insn.address);
        let func = self.module.add_function(format!("frag_{address:x}"));
        let mut b = Builder::new(&mut self.module, func);
        for insn in insns {
            self.translator.translate(insn, &mut b)?;
        }
        let effects = eval::run(&self.module, func, &mut self.machine)
            .unwrap_or_else(|e| panic!("evaluation failed: {e}\n{}", self.module.display_function(func)));
        Ok(effects)
    }

    /// Exactly these registers were read.
    pub fn assert_loaded(&self, effects: &Effects, regs: &[Reg]) {
        let expected: BTreeSet<GlobalId> = regs.iter().map(|&r| self.global(r)).collect();
        assert_eq!(effects.reg_loads, expected, "loaded register set");
    }

    /// Exactly these registers were written, with these final parent-width
    /// values.
    pub fn assert_stored(&self, effects: &Effects, regs: &[(Reg, u128)]) {
        let expected: BTreeMap<GlobalId, u128> =
            regs.iter().map(|&(r, v)| (self.global(r), v)).collect();
        assert_eq!(effects.reg_stores, expected, "stored register set");
    }

    pub fn assert_flags(&self, effects: &Effects, n: bool, z: bool, c: bool, v: bool) {
        for (flag, expected) in [(Reg::N, n), (Reg::Z, z), (Reg::C, c), (Reg::V, v)] {
            assert_eq!(
                effects.reg_stores.get(&self.global(flag)),
                Some(&u128::from(expected)),
                "{flag}"
            );
        }
    }

    /// Exactly these escape/asm calls were made, in order.
    pub fn assert_calls(&self, effects: &Effects, calls: &[(&str, &[u128])]) {
        let got: Vec<(String, Vec<u128>)> = effects
            .calls
            .iter()
            .map(|c| (c.callee.clone(), c.args.clone()))
            .collect();
        let expected: Vec<(String, Vec<u128>)> = calls
            .iter()
            .map(|(name, args)| ((*name).to_string(), args.to_vec()))
            .collect();
        assert_eq!(got, expected, "escape calls");
    }

    pub fn assert_no_calls(&self, effects: &Effects) {
        assert!(effects.calls.is_empty(), "unexpected calls: {:?}", effects.calls);
    }

    /// Exactly these memory stores, in order.
    pub fn assert_mem_stored(&self, effects: &Effects, stores: &[(u64, u128, Ty)]) {
        assert_eq!(effects.mem_stores, stores, "memory stores");
    }

    pub fn assert_mem_loaded(&self, effects: &Effects, addrs: &[u64]) {
        assert_eq!(effects.mem_loads, addrs, "memory loads");
    }
}

/// The current value of a register in the machine, at parent width.
impl Harness {
    pub fn reg(&self, reg: Reg) -> u128 {
        self.machine.global(self.global(reg))
    }
}
