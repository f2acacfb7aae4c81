use crate::{Cond, Mnemonic, Operand};

/// Architecture-specific detail of a decoded instruction.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsnDetail {
    /// Ordered operand list (0 to 4 entries).
    pub operands: Vec<Operand>,
    /// Condition code, `Cond::Invalid` when the encoding has none.
    pub cc: Cond,
    /// Whether the instruction updates the N/Z/C/V flags.
    pub update_flags: bool,
    /// Whether a pre-indexed addressing form writes its base register back.
    pub writeback: bool,
}

/// One decoded machine instruction.
///
/// Produced by a disassembler frontend and borrowed by the translator for
/// the duration of a single translation call; the translator never mutates
/// it and keeps no reference past the call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insn {
    /// Address the instruction was decoded at.
    pub address: u64,
    /// Encoded size in bytes.
    pub size: u32,
    /// Mnemonic identifier.
    pub mnemonic: Mnemonic,
    /// Operand list and modifier bits.
    pub detail: InsnDetail,
}

impl Insn {
    /// A fixed-width (4-byte) instruction at `address` with the given
    /// operands and no condition/flag/writeback modifiers.
    pub fn new(address: u64, mnemonic: Mnemonic, operands: Vec<Operand>) -> Self {
        Self {
            address,
            size: 4,
            mnemonic,
            detail: InsnDetail {
                operands,
                ..InsnDetail::default()
            },
        }
    }

    /// Set the condition code.
    pub fn with_cc(mut self, cc: Cond) -> Self {
        self.detail.cc = cc;
        self
    }

    /// Set the update-flags bit.
    pub fn with_flags(mut self) -> Self {
        self.detail.update_flags = true;
        self
    }

    /// Set the writeback bit.
    pub fn with_writeback(mut self) -> Self {
        self.detail.writeback = true;
        self
    }

    /// The address of the next sequential instruction.
    ///
    /// This is also the value reads of the program counter observe during
    /// translation of this instruction.
    pub fn end_address(&self) -> u64 {
        self.address.wrapping_add(u64::from(self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reg;

    #[test]
    fn end_address_is_past_the_encoding() {
        let insn = Insn::new(0x1107c, Mnemonic::Nop, vec![]);
        assert_eq!(insn.size, 4);
        assert_eq!(insn.end_address(), 0x11080);
    }

    #[test]
    fn modifier_builders() {
        let insn = Insn::new(
            0x1000,
            Mnemonic::Adds,
            vec![
                Operand::reg(Reg::X0).written(),
                Operand::reg(Reg::X1),
                Operand::reg(Reg::X2),
            ],
        )
        .with_cc(Cond::Eq)
        .with_flags();
        assert_eq!(insn.detail.cc, Cond::Eq);
        assert!(insn.detail.update_flags);
        assert!(!insn.detail.writeback);
        assert_eq!(insn.detail.operands.len(), 3);
    }
}
