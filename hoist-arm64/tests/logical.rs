//! Logical operations, tests, and moves.

mod common;

use common::Harness;
use hoist_asm::{Insn, Mnemonic, Operand, Reg, ShiftKind};
use test_case::test_case;

fn rrr(mnemonic: Mnemonic, d: Reg, n: Reg, m: Reg) -> Insn {
    Insn::new(
        0x1000,
        mnemonic,
        vec![
            Operand::reg(d).written(),
            Operand::reg(n),
            Operand::reg(m),
        ],
    )
}

#[test]
fn and_registers() {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, 0xff00ff);
    h.set_reg(Reg::X2, 0x0ff0f0);
    let fx = h.lift(&rrr(Mnemonic::And, Reg::X0, Reg::X1, Reg::X2));
    h.assert_stored(&fx, &[(Reg::X0, 0x0f00f0)]);
}

#[test]
fn and_with_immediate() {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, 0x1234);
    let insn = Insn::new(
        0x1000,
        Mnemonic::And,
        vec![
            Operand::reg(Reg::X0).written(),
            Operand::reg(Reg::X1),
            Operand::imm(0xff),
        ],
    );
    let fx = h.lift(&insn);
    h.assert_stored(&fx, &[(Reg::X0, 0x34)]);
}

#[test]
fn ands_zero_result_clears_c_and_v() {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, 0xf0);
    h.set_reg(Reg::X2, 0x0f);
    h.set_flag(Reg::C, true);
    h.set_flag(Reg::V, true);
    let fx = h.lift(&rrr(Mnemonic::Ands, Reg::X0, Reg::X1, Reg::X2).with_flags());
    assert_eq!(fx.reg_stores.get(&h.global(Reg::X0)), Some(&0));
    h.assert_flags(&fx, false, true, false, false);
}

#[test]
fn ands32_negative_result() {
    let mut h = Harness::new();
    h.set_reg(Reg::W1, 0x8000_0001);
    h.set_reg(Reg::W2, 0x8000_0000);
    let fx = h.lift(&rrr(Mnemonic::Ands, Reg::W0, Reg::W1, Reg::W2).with_flags());
    assert_eq!(fx.reg_stores.get(&h.global(Reg::X0)), Some(&0x8000_0000));
    h.assert_flags(&fx, true, false, false, false);
}

#[test_case(Mnemonic::Orr, 0xff00, 0x00ff, 0xffff; "orr")]
#[test_case(Mnemonic::Orn, 0xff00, !0x00ffu64, 0xffff; "orn inverts first")]
#[test_case(Mnemonic::Eor, 0xffff, 0x00ff, 0xff00; "eor")]
#[test_case(Mnemonic::Eon, 0xffff, !0x00ffu64, 0xff00; "eon inverts first")]
fn or_xor_and_their_inverted_forms(mnemonic: Mnemonic, a: u64, b: u64, expected: u128) {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, a);
    h.set_reg(Reg::X2, b);
    let fx = h.lift(&rrr(mnemonic, Reg::X0, Reg::X1, Reg::X2));
    h.assert_stored(&fx, &[(Reg::X0, expected)]);
}

#[test]
fn eor32_zero_extends() {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, 0xdead_beef_ffff_0000);
    h.set_reg(Reg::X2, 0xdead_beef_0000_ffff);
    let fx = h.lift(&rrr(Mnemonic::Eor, Reg::W0, Reg::W1, Reg::W2));
    h.assert_stored(&fx, &[(Reg::X0, 0xffff_ffff)]);
}

#[test]
fn tst_writes_flags_only() {
    let mut h = Harness::new();
    h.set_reg(Reg::X0, 0x0f);
    h.set_reg(Reg::X1, 0xf0);
    let insn = Insn::new(
        0x1000,
        Mnemonic::Tst,
        vec![Operand::reg(Reg::X0), Operand::reg(Reg::X1)],
    )
    .with_flags();
    let fx = h.lift(&insn);
    h.assert_loaded(&fx, &[Reg::X0, Reg::X1]);
    h.assert_stored(
        &fx,
        &[(Reg::N, 0), (Reg::Z, 1), (Reg::C, 0), (Reg::V, 0)],
    );
}

#[test]
fn tst_negative() {
    let mut h = Harness::new();
    h.set_reg(Reg::X0, u64::MAX);
    h.set_reg(Reg::X1, u64::MAX);
    let insn = Insn::new(
        0x1000,
        Mnemonic::Tst,
        vec![Operand::reg(Reg::X0), Operand::reg(Reg::X1)],
    )
    .with_flags();
    let fx = h.lift(&insn);
    h.assert_stored(
        &fx,
        &[(Reg::N, 1), (Reg::Z, 0), (Reg::C, 0), (Reg::V, 0)],
    );
}

#[test]
fn mov_register() {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, 0xcafe_babe_cafe_babe);
    let insn = Insn::new(
        0x1000,
        Mnemonic::Mov,
        vec![Operand::reg(Reg::X0).written(), Operand::reg(Reg::X1)],
    );
    let fx = h.lift(&insn);
    h.assert_loaded(&fx, &[Reg::X1]);
    h.assert_stored(&fx, &[(Reg::X0, 0xcafe_babe_cafe_babe)]);
}

#[test]
fn mov32_truncates_and_zero_extends() {
    let mut h = Harness::new();
    h.set_reg(Reg::X0, u64::MAX);
    h.set_reg(Reg::X1, 0xcafe_babe_1234_5678);
    let insn = Insn::new(
        0x1000,
        Mnemonic::Mov,
        vec![Operand::reg(Reg::W0).written(), Operand::reg(Reg::W1)],
    );
    let fx = h.lift(&insn);
    h.assert_stored(&fx, &[(Reg::X0, 0x1234_5678)]);
}

#[test]
fn movz_shifted_immediate() {
    let mut h = Harness::new();
    let insn = Insn::new(
        0x1000,
        Mnemonic::Movz,
        vec![
            Operand::reg(Reg::X0).written(),
            Operand::imm(0xabcd).shifted(ShiftKind::Lsl, 16),
        ],
    );
    let fx = h.lift(&insn);
    h.assert_stored(&fx, &[(Reg::X0, 0xabcd_0000)]);
}

#[test]
fn mvn_complements() {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, 0x0000_ffff_0000_ffff);
    let insn = Insn::new(
        0x1000,
        Mnemonic::Mvn,
        vec![Operand::reg(Reg::X0).written(), Operand::reg(Reg::X1)],
    );
    let fx = h.lift(&insn);
    h.assert_stored(&fx, &[(Reg::X0, 0xffff_0000_ffff_0000)]);
}

#[test]
fn mvn32_complements_the_low_half_only() {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, 0xffff_ffff_0000_ffff);
    let insn = Insn::new(
        0x1000,
        Mnemonic::Mvn,
        vec![Operand::reg(Reg::W0).written(), Operand::reg(Reg::W1)],
    );
    let fx = h.lift(&insn);
    h.assert_stored(&fx, &[(Reg::X0, 0xffff_0000)]);
}

#[test]
fn nop_emits_nothing() {
    let mut h = Harness::new();
    let fx = h.lift(&Insn::new(0x1000, Mnemonic::Nop, vec![]));
    h.assert_loaded(&fx, &[]);
    h.assert_stored(&fx, &[]);
    h.assert_no_calls(&fx);
    assert!(fx.mem_loads.is_empty() && fx.mem_stores.is_empty());
}
