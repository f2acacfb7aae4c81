//! Shifts, rotates, bit-field extraction, and the extension mnemonics.

mod common;

use common::Harness;
use hoist_asm::{Insn, Mnemonic, Operand, Reg};

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

fn rri(mnemonic: Mnemonic, d: Reg, n: Reg, imm: i64) -> Insn {
    Insn::new(
        0x1000,
        mnemonic,
        vec![
            Operand::reg(d).written(),
            Operand::reg(n),
            Operand::imm(imm),
        ],
    )
}

#[test]
fn lsl_by_register_and_immediate() {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, 1);
    h.set_reg(Reg::X2, 8);
    let fx = h.lift(&rrr(Mnemonic::Lsl, Reg::X0, Reg::X1, Reg::X2));
    h.assert_stored(&fx, &[(Reg::X0, 0x100)]);

    let mut h = Harness::new();
    h.set_reg(Reg::X1, 1);
    let fx = h.lift(&rri(Mnemonic::Lsl, Reg::X0, Reg::X1, 63));
    h.assert_stored(&fx, &[(Reg::X0, 0x8000_0000_0000_0000)]);
}

#[test]
fn variable_shift_amounts_reduce_modulo_width() {
    let mut h = Harness::new();
    h.set_reg(Reg::W1, 1);
    h.set_reg(Reg::W2, 33);
    let fx = h.lift(&rrr(Mnemonic::Lsl, Reg::W0, Reg::W1, Reg::W2));
    h.assert_stored(&fx, &[(Reg::X0, 2)]);
}

#[test]
fn lsr_logical_right() {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, 0x8000_0000_0000_0000);
    let fx = h.lift(&rri(Mnemonic::Lsr, Reg::X0, Reg::X1, 63));
    h.assert_stored(&fx, &[(Reg::X0, 1)]);
}

#[test]
fn asr_replicates_the_sign() {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, 0x8000_0000_0000_0000);
    let fx = h.lift(&rri(Mnemonic::Asr, Reg::X0, Reg::X1, 60));
    h.assert_stored(&fx, &[(Reg::X0, 0xffff_ffff_ffff_fff8)]);
}

#[test]
fn asr32_operates_on_the_low_half() {
    let mut h = Harness::new();
    h.set_reg(Reg::W1, 0x8000_0000);
    let fx = h.lift(&rri(Mnemonic::Asr, Reg::W0, Reg::W1, 31));
    h.assert_stored(&fx, &[(Reg::X0, 0xffff_ffff)]);
}

#[test]
fn ror_rotates_by_register() {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, 1);
    h.set_reg(Reg::X2, 63);
    let fx = h.lift(&rrr(Mnemonic::Ror, Reg::X0, Reg::X1, Reg::X2));
    h.assert_stored(&fx, &[(Reg::X0, 2)]);
}

#[test]
fn ror_by_immediate() {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, 0xffff_ffff_0000_0000);
    let fx = h.lift(&rri(Mnemonic::Ror, Reg::X0, Reg::X1, 32));
    h.assert_stored(&fx, &[(Reg::X0, 0x0000_0000_ffff_ffff)]);
}

#[test]
fn ror32_rotates_the_low_word() {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, 0xffff_ffff_0000_1234);
    h.set_reg(Reg::X2, 16);
    let fx = h.lift(&rrr(Mnemonic::Ror, Reg::W0, Reg::W1, Reg::W2));
    h.assert_stored(&fx, &[(Reg::X0, 0x0000_0000_1234_0000)]);
}

#[test]
fn extr_concatenated_extract() {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, 0x1234_5678_9abc_def0);
    h.set_reg(Reg::X2, 0xfedc_ba98_7654_3210);
    let insn = Insn::new(
        0x1000,
        Mnemonic::Extr,
        vec![
            Operand::reg(Reg::X0).written(),
            Operand::reg(Reg::X1),
            Operand::reg(Reg::X2),
            Operand::imm(8),
        ],
    );
    let fx = h.lift(&insn);
    // low 8 bits of rn enter from the top: (rm >> 8) | (rn << 56)
    h.assert_stored(&fx, &[(Reg::X0, 0xf0fe_dcba_9876_5432)]);
}

#[test]
fn extr_with_zero_lsb_is_the_second_source() {
    let mut h = Harness::new();
    h.set_reg(Reg::X1, 0x1111_1111_1111_1111);
    h.set_reg(Reg::X2, 0x2222_2222_2222_2222);
    let insn = Insn::new(
        0x1000,
        Mnemonic::Extr,
        vec![
            Operand::reg(Reg::X0).written(),
            Operand::reg(Reg::X1),
            Operand::reg(Reg::X2),
            Operand::imm(0),
        ],
    );
    let fx = h.lift(&insn);
    h.assert_stored(&fx, &[(Reg::X0, 0x2222_2222_2222_2222)]);
}

#[test]
fn extr32() {
    let mut h = Harness::new();
    h.set_reg(Reg::W1, 0xaabb_ccdd);
    h.set_reg(Reg::W2, 0x1122_3344);
    let insn = Insn::new(
        0x1000,
        Mnemonic::Extr,
        vec![
            Operand::reg(Reg::W0).written(),
            Operand::reg(Reg::W1),
            Operand::reg(Reg::W2),
            Operand::imm(16),
        ],
    );
    let fx = h.lift(&insn);
    h.assert_stored(&fx, &[(Reg::X0, 0xccdd_1122)]);
}

#[test]
fn sxtb_sign_extends_a_byte() {
    let mut h = Harness::new();
    h.set_reg(Reg::W1, 0x80);
    let insn = Insn::new(
        0x1000,
        Mnemonic::Sxtb,
        vec![Operand::reg(Reg::X0).written(), Operand::reg(Reg::W1)],
    );
    let fx = h.lift(&insn);
    h.assert_stored(&fx, &[(Reg::X0, 0xffff_ffff_ffff_ff80)]);
}

#[test]
fn sxtb32_extends_within_the_word() {
    let mut h = Harness::new();
    h.set_reg(Reg::W1, 0x80);
    let insn = Insn::new(
        0x1000,
        Mnemonic::Sxtb,
        vec![Operand::reg(Reg::W0).written(), Operand::reg(Reg::W1)],
    );
    let fx = h.lift(&insn);
    h.assert_stored(&fx, &[(Reg::X0, 0xffff_ff80)]);
}

#[test]
fn sxth_and_sxtw() {
    let mut h = Harness::new();
    h.set_reg(Reg::W1, 0x8123);
    let insn = Insn::new(
        0x1000,
        Mnemonic::Sxth,
        vec![Operand::reg(Reg::X0).written(), Operand::reg(Reg::W1)],
    );
    let fx = h.lift(&insn);
    h.assert_stored(&fx, &[(Reg::X0, 0xffff_ffff_ffff_8123)]);

    let mut h = Harness::new();
    h.set_reg(Reg::W1, 0x8000_0000);
    let insn = Insn::new(
        0x1000,
        Mnemonic::Sxtw,
        vec![Operand::reg(Reg::X0).written(), Operand::reg(Reg::W1)],
    );
    let fx = h.lift(&insn);
    h.assert_stored(&fx, &[(Reg::X0, 0xffff_ffff_8000_0000)]);
}

#[test]
fn uxtb_and_uxth_clear_the_high_bits() {
    let mut h = Harness::new();
    h.set_reg(Reg::W1, 0xcafe_babe);
    let insn = Insn::new(
        0x1000,
        Mnemonic::Uxtb,
        vec![Operand::reg(Reg::W0).written(), Operand::reg(Reg::W1)],
    );
    let fx = h.lift(&insn);
    h.assert_stored(&fx, &[(Reg::X0, 0xbe)]);

    let mut h = Harness::new();
    h.set_reg(Reg::W1, 0xcafe_babe);
    let insn = Insn::new(
        0x1000,
        Mnemonic::Uxth,
        vec![Operand::reg(Reg::W0).written(), Operand::reg(Reg::W1)],
    );
    let fx = h.lift(&insn);
    h.assert_stored(&fx, &[(Reg::X0, 0xbabe)]);
}
