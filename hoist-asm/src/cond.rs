/// Condition code carried by a decoded instruction.
///
/// The first fourteen variants select a boolean expression over the N/Z/C/V
/// flag bits; `Al` and `Nv` both execute unconditionally. `Invalid` marks an
/// instruction that carries no condition field at all.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Cond {
    /// No condition field present.
    #[default]
    Invalid,
    /// Equal (`Z`).
    Eq,
    /// Not equal (`!Z`).
    Ne,
    /// Unsigned higher or same (`C`).
    Hs,
    /// Unsigned lower (`!C`).
    Lo,
    /// Minus, negative (`N`).
    Mi,
    /// Plus, positive or zero (`!N`).
    Pl,
    /// Overflow (`V`).
    Vs,
    /// No overflow (`!V`).
    Vc,
    /// Unsigned higher (`C && !Z`).
    Hi,
    /// Unsigned lower or same (`!C || Z`).
    Ls,
    /// Signed greater than or equal (`N == V`).
    Ge,
    /// Signed less than (`N != V`).
    Lt,
    /// Signed greater than (`!Z && N == V`).
    Gt,
    /// Signed less than or equal (`Z || N != V`).
    Le,
    /// Always.
    Al,
    /// Always (the architecture reserves the encoding, but it executes).
    Nv,
}

impl Cond {
    /// Whether the condition actually gates execution.
    ///
    /// `Al`, `Nv` and `Invalid` execute unconditionally and must never reach
    /// the condition-expression builder.
    pub const fn is_conditional(self) -> bool {
        !matches!(self, Cond::Invalid | Cond::Al | Cond::Nv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn only_real_conditions_gate() {
        let gating = Cond::iter().filter(|c| c.is_conditional()).count();
        assert_eq!(gating, 14);
        assert!(!Cond::Al.is_conditional());
        assert!(!Cond::Nv.is_conditional());
        assert!(!Cond::Invalid.is_conditional());
    }
}
