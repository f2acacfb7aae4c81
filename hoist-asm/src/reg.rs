macro_rules! registers {
    ($($variant:ident = $name:literal, $bits:literal, $parent:ident;)*) => {
        /// Architectural register identifiers, including sub-register aliases
        /// and the pseudo-registers used by the lifter (program counter, flag
        /// bits, zero register).
        ///
        /// Every identifier maps to a *parent*: the widest register that
        /// physically stores it. Identifiers whose parent is themselves are
        /// full registers backed by storage; the rest are narrower views of
        /// their parent.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(strum::Display, strum::EnumIter, strum::FromRepr)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[strum(serialize_all = "lowercase")]
        #[repr(u16)]
        pub enum Reg {
            $(
                #[doc = $name]
                $variant,
            )*
        }

        impl Reg {
            /// Number of register identifiers in the table.
            pub const COUNT: usize = [$(Self::$variant),*].len();

            /// Architectural name of the register.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Width of the register in bits.
            pub const fn bit_size(self) -> u32 {
                match self {
                    $(Self::$variant => $bits,)*
                }
            }

            /// The widest register that physically stores this identifier.
            ///
            /// Parents map to themselves; aliasing is single-level, so
            /// `r.parent().parent() == r.parent()` for every `r`.
            pub const fn parent(self) -> Reg {
                match self {
                    $(Self::$variant => Self::$parent,)*
                }
            }
        }
    };
}

registers! {
    X0 = "x0", 64, X0;
    X1 = "x1", 64, X1;
    X2 = "x2", 64, X2;
    X3 = "x3", 64, X3;
    X4 = "x4", 64, X4;
    X5 = "x5", 64, X5;
    X6 = "x6", 64, X6;
    X7 = "x7", 64, X7;
    X8 = "x8", 64, X8;
    X9 = "x9", 64, X9;
    X10 = "x10", 64, X10;
    X11 = "x11", 64, X11;
    X12 = "x12", 64, X12;
    X13 = "x13", 64, X13;
    X14 = "x14", 64, X14;
    X15 = "x15", 64, X15;
    X16 = "x16", 64, X16;
    X17 = "x17", 64, X17;
    X18 = "x18", 64, X18;
    X19 = "x19", 64, X19;
    X20 = "x20", 64, X20;
    X21 = "x21", 64, X21;
    X22 = "x22", 64, X22;
    X23 = "x23", 64, X23;
    X24 = "x24", 64, X24;
    X25 = "x25", 64, X25;
    X26 = "x26", 64, X26;
    X27 = "x27", 64, X27;
    X28 = "x28", 64, X28;
    X29 = "x29", 64, X29;
    X30 = "x30", 64, X30;
    W0 = "w0", 32, X0;
    W1 = "w1", 32, X1;
    W2 = "w2", 32, X2;
    W3 = "w3", 32, X3;
    W4 = "w4", 32, X4;
    W5 = "w5", 32, X5;
    W6 = "w6", 32, X6;
    W7 = "w7", 32, X7;
    W8 = "w8", 32, X8;
    W9 = "w9", 32, X9;
    W10 = "w10", 32, X10;
    W11 = "w11", 32, X11;
    W12 = "w12", 32, X12;
    W13 = "w13", 32, X13;
    W14 = "w14", 32, X14;
    W15 = "w15", 32, X15;
    W16 = "w16", 32, X16;
    W17 = "w17", 32, X17;
    W18 = "w18", 32, X18;
    W19 = "w19", 32, X19;
    W20 = "w20", 32, X20;
    W21 = "w21", 32, X21;
    W22 = "w22", 32, X22;
    W23 = "w23", 32, X23;
    W24 = "w24", 32, X24;
    W25 = "w25", 32, X25;
    W26 = "w26", 32, X26;
    W27 = "w27", 32, X27;
    W28 = "w28", 32, X28;
    W29 = "w29", 32, X29;
    W30 = "w30", 32, X30;
    Sp = "sp", 64, Sp;
    Wsp = "wsp", 32, Sp;
    Xzr = "xzr", 64, Xzr;
    Wzr = "wzr", 32, Xzr;
    Pc = "pc", 64, Pc;
    N = "cpsr_n", 1, N;
    Z = "cpsr_z", 1, Z;
    C = "cpsr_c", 1, C;
    V = "cpsr_v", 1, V;
    V0 = "v0", 128, V0;
    V1 = "v1", 128, V1;
    V2 = "v2", 128, V2;
    V3 = "v3", 128, V3;
    V4 = "v4", 128, V4;
    V5 = "v5", 128, V5;
    V6 = "v6", 128, V6;
    V7 = "v7", 128, V7;
}

impl Reg {
    /// The link register alias.
    pub const LR: Reg = Reg::X30;

    /// Whether this identifier is a parent (has backing storage of its own).
    pub const fn is_parent(self) -> bool {
        self as u16 == self.parent() as u16
    }

    /// Whether this identifier names the zero register or one of its views.
    pub const fn is_zero(self) -> bool {
        matches!(self.parent(), Reg::Xzr)
    }

    /// Whether this identifier names one of the four flag bits.
    pub const fn is_flag(self) -> bool {
        matches!(self, Reg::N | Reg::Z | Reg::C | Reg::V)
    }
}
