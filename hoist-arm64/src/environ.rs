use hoist_asm::Reg;
use hoist_ir::{GlobalId, Module, Ty};
use strum::IntoEnumIterator as _;

/// The register environment of one IR module.
///
/// Owns the mapping from architectural registers to the module globals that
/// model them. Exactly one global exists per *parent* register; sub-register
/// aliases have no storage of their own and are resolved through
/// [`Reg::parent`] by the operand evaluator. The table is populated once at
/// construction and read-only afterwards, so shared references are safe to
/// hand out across passes.
#[derive(Debug)]
pub struct Environ {
    globals: Vec<Option<GlobalId>>,
}

impl Environ {
    /// Build the environment, creating one global per parent register.
    pub fn new(module: &mut Module) -> Self {
        let mut env = Self {
            globals: vec![None; Reg::COUNT],
        };
        for reg in Reg::iter().filter(|r| r.is_parent()) {
            env.create_register(module, reg);
        }
        env
    }

    /// Create the backing global for one parent register.
    ///
    /// [`Environ::new`] calls this once per parent; calling it for an alias
    /// or a second time for the same parent is a bug in the caller.
    pub fn create_register(&mut self, module: &mut Module, reg: Reg) -> GlobalId {
        debug_assert!(reg.is_parent(), "{reg} is an alias");
        debug_assert!(self.globals[reg as u16 as usize].is_none(), "{reg} created twice");
        let global = module.add_global(reg.name(), Self::register_type(reg));
        self.globals[reg as u16 as usize] = Some(global);
        global
    }

    /// The backing global of a parent register, `None` for aliases.
    pub fn get(&self, reg: Reg) -> Option<GlobalId> {
        self.globals[reg as u16 as usize]
    }

    /// The backing global of a register's parent.
    pub fn get_parent(&self, reg: Reg) -> GlobalId {
        self.get(reg.parent())
            .expect("every parent has a global after construction")
    }

    /// The integer IR type of a register's architectural width.
    pub fn register_type(reg: Reg) -> Ty {
        Ty::of_bits(reg.bit_size()).expect("register widths are IR widths")
    }

    /// Raw-id variant of [`Reg::parent`], returning the input unchanged when
    /// it is outside the register table.
    pub fn parent_of(raw: u16) -> u16 {
        match Reg::from_repr(raw) {
            Some(reg) => reg.parent() as u16,
            None => raw,
        }
    }

    /// Raw-id register width in bits, 0 when outside the register table.
    pub fn bit_size_of(raw: u16) -> u32 {
        Reg::from_repr(raw).map_or(0, Reg::bit_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_global_per_parent_and_none_for_aliases() {
        let mut module = Module::new();
        let env = Environ::new(&mut module);
        for reg in Reg::iter() {
            if reg.is_parent() {
                let global = env.get(reg).unwrap();
                assert_eq!(module.global(global).name, reg.name());
                assert_eq!(module.global(global).ty, Environ::register_type(reg));
            } else {
                assert!(env.get(reg).is_none(), "{reg}");
                assert!(env.get(reg.parent()).is_some(), "{reg}");
            }
        }
    }

    #[test]
    fn parent_lookup_is_bounds_checked() {
        assert_eq!(Environ::parent_of(Reg::W7 as u16), Reg::X7 as u16);
        assert_eq!(Environ::parent_of(Reg::X7 as u16), Reg::X7 as u16);
        assert_eq!(Environ::parent_of(0xffff), 0xffff);
        assert_eq!(Environ::bit_size_of(Reg::Wsp as u16), 32);
        assert_eq!(Environ::bit_size_of(0xffff), 0);
    }

    #[test]
    fn flag_cells_are_one_bit() {
        let mut module = Module::new();
        let env = Environ::new(&mut module);
        for flag in [Reg::N, Reg::Z, Reg::C, Reg::V] {
            let global = env.get(flag).unwrap();
            assert_eq!(module.global(global).ty, Ty::I1);
        }
    }
}
