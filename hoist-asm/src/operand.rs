use crate::Reg;

bitflags::bitflags! {
    /// How an instruction touches an operand.
    ///
    /// Decoders publish this so downstream passes can tell definitions from
    /// uses without re-deriving per-opcode knowledge.
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Access: u8 {
        /// The operand is read.
        const READ = 0b01;
        /// The operand is written.
        const WRITE = 0b10;
    }
}

impl Default for Access {
    fn default() -> Self {
        Access::READ
    }
}

/// Register extension applied to an operand before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum Extender {
    /// Unsigned extend from byte.
    Uxtb,
    /// Unsigned extend from halfword.
    Uxth,
    /// Unsigned extend from word.
    Uxtw,
    /// Unsigned extend from doubleword.
    Uxtx,
    /// Signed extend from byte.
    Sxtb,
    /// Signed extend from halfword.
    Sxth,
    /// Signed extend from word.
    Sxtw,
    /// Signed extend from doubleword.
    Sxtx,
}

impl Extender {
    /// The width in bits the source is narrowed to before extension.
    pub const fn source_bits(self) -> u32 {
        match self {
            Extender::Uxtb | Extender::Sxtb => 8,
            Extender::Uxth | Extender::Sxth => 16,
            Extender::Uxtw | Extender::Sxtw => 32,
            Extender::Uxtx | Extender::Sxtx => 64,
        }
    }

    /// Whether the extension replicates the sign bit.
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Extender::Sxtb | Extender::Sxth | Extender::Sxtw | Extender::Sxtx
        )
    }
}

/// Shift operation applied to an operand after extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum ShiftKind {
    /// Logical shift left.
    Lsl,
    /// Logical shift right.
    Lsr,
    /// Arithmetic shift right.
    Asr,
    /// Rotate right.
    Ror,
    /// Masked shift left (ones shifted in from the right).
    Msl,
}

/// An operand-level shift with its immediate amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shift {
    /// The shift operation.
    pub kind: ShiftKind,
    /// Amount in bits.
    pub amount: u32,
}

impl Shift {
    /// Construct a shift.
    pub const fn new(kind: ShiftKind, amount: u32) -> Self {
        Self { kind, amount }
    }
}

/// Memory addressing expression: `[base, index{, extend {#shift}} , #disp]`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemOperand {
    /// Base register, if any.
    pub base: Option<Reg>,
    /// Index register, if any. The operand's extender and shift apply to it.
    pub index: Option<Reg>,
    /// Signed displacement.
    pub disp: i64,
}

/// The payload of a decoded operand.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperandKind {
    /// A general or system-adjacent register.
    Reg(Reg),
    /// A signed immediate.
    Imm(i64),
    /// A memory reference.
    Mem(MemOperand),
    /// A system register accessed like a general register.
    Sys(Reg),
    /// A floating-point immediate. Not supported by the translator.
    Fp(f64),
    /// A prefetch hint. Not supported by the translator.
    Prefetch(u8),
    /// A barrier operation. Not supported by the translator.
    Barrier(u8),
    /// A C-immediate. Not supported by the translator.
    CImm(i64),
    /// A PSTATE field. Not supported by the translator.
    Pstate(u8),
    /// An MRS source system register. Not supported by the translator.
    RegMrs(u32),
    /// An MSR destination system register. Not supported by the translator.
    RegMsr(u32),
}

/// One decoded operand: payload plus the contextual modifiers the encoder
/// folded onto it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operand {
    /// The operand payload.
    pub kind: OperandKind,
    /// Extension applied before the shift.
    pub ext: Option<Extender>,
    /// Shift applied after the extension.
    pub shift: Option<Shift>,
    /// Read/write access summary.
    pub access: Access,
}

impl Operand {
    /// A register operand with default (read) access.
    pub fn reg(reg: Reg) -> Self {
        OperandKind::Reg(reg).into()
    }

    /// An immediate operand.
    pub fn imm(value: i64) -> Self {
        OperandKind::Imm(value).into()
    }

    /// A base-plus-displacement memory operand.
    pub fn mem(base: Reg, disp: i64) -> Self {
        OperandKind::Mem(MemOperand {
            base: Some(base),
            index: None,
            disp,
        })
        .into()
    }

    /// A base-plus-index memory operand.
    pub fn mem_indexed(base: Reg, index: Reg) -> Self {
        OperandKind::Mem(MemOperand {
            base: Some(base),
            index: Some(index),
            disp: 0,
        })
        .into()
    }

    /// Attach an extender.
    pub fn extended(mut self, ext: Extender) -> Self {
        self.ext = Some(ext);
        self
    }

    /// Attach a shift.
    pub fn shifted(mut self, kind: ShiftKind, amount: u32) -> Self {
        self.shift = Some(Shift::new(kind, amount));
        self
    }

    /// Mark the operand write-only.
    pub fn written(mut self) -> Self {
        self.access = Access::WRITE;
        self
    }

    /// Mark the operand read-write.
    pub fn read_write(mut self) -> Self {
        self.access = Access::READ | Access::WRITE;
        self
    }

    /// The register payload, if this is a plain register operand.
    pub fn as_reg(&self) -> Option<Reg> {
        match self.kind {
            OperandKind::Reg(r) => Some(r),
            _ => None,
        }
    }

    /// The immediate payload, if this is an immediate operand.
    pub fn as_imm(&self) -> Option<i64> {
        match self.kind {
            OperandKind::Imm(v) => Some(v),
            _ => None,
        }
    }
}

impl From<OperandKind> for Operand {
    fn from(kind: OperandKind) -> Self {
        Self {
            kind,
            ext: None,
            shift: None,
            access: Access::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Extender::Uxtb, 8, false)]
    #[case(Extender::Uxth, 16, false)]
    #[case(Extender::Uxtw, 32, false)]
    #[case(Extender::Uxtx, 64, false)]
    #[case(Extender::Sxtb, 8, true)]
    #[case(Extender::Sxth, 16, true)]
    #[case(Extender::Sxtw, 32, true)]
    #[case(Extender::Sxtx, 64, true)]
    fn extender_shape(#[case] ext: Extender, #[case] bits: u32, #[case] signed: bool) {
        assert_eq!(ext.source_bits(), bits);
        assert_eq!(ext.is_signed(), signed);
    }

    #[test]
    fn operand_builders_compose() {
        let op = Operand::reg(Reg::W1)
            .extended(Extender::Uxtb)
            .shifted(ShiftKind::Lsl, 2);
        assert_eq!(op.as_reg(), Some(Reg::W1));
        assert_eq!(op.ext.unwrap().source_bits(), 8);
        assert!(!op.ext.unwrap().is_signed());
        assert_eq!(op.shift, Some(Shift::new(ShiftKind::Lsl, 2)));
        assert_eq!(op.access, Access::READ);
    }

    #[test]
    fn access_marks() {
        assert_eq!(Operand::reg(Reg::X0).written().access, Access::WRITE);
        let rw = Operand::reg(Reg::X0).read_write().access;
        assert!(rw.contains(Access::READ) && rw.contains(Access::WRITE));
    }
}
