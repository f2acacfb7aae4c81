use crate::{
    BinOp, BlockId, CastOp, CmpOp, ExternId, FuncId, GlobalId, Inst, Module, Terminator, Ty,
    ValueId,
};

/// Appends instructions to a function at an insertion point.
///
/// The builder owns no IR; it borrows the module and tracks which block new
/// instructions land in. Type discipline is a construction invariant and is
/// enforced with debug assertions, not runtime errors: a mistyped emission
/// is a bug in the emitting translator, never a property of the input
/// program.
#[derive(Debug)]
pub struct Builder<'m> {
    module: &'m mut Module,
    func: FuncId,
    block: BlockId,
}

impl<'m> Builder<'m> {
    /// A builder positioned at the entry block of `func`.
    pub fn new(module: &'m mut Module, func: FuncId) -> Self {
        let block = module.function(func).entry();
        Self {
            module,
            func,
            block,
        }
    }

    /// The module being built into.
    pub fn module(&mut self) -> &mut Module {
        self.module
    }

    /// The function being appended to.
    pub fn func(&self) -> FuncId {
        self.func
    }

    /// The current insertion block.
    pub fn current_block(&self) -> BlockId {
        self.block
    }

    /// Move the insertion point to the end of `block`.
    pub fn set_block(&mut self, block: BlockId) {
        self.block = block;
    }

    /// Append a fresh, empty block.
    pub fn new_block(&mut self) -> BlockId {
        let function = self.module.function_mut(self.func);
        let id = BlockId(function.blocks.len() as u32);
        function.blocks.push(crate::Block::default());
        id
    }

    fn push(&mut self, inst: Inst, ty: Option<Ty>) -> ValueId {
        let function = self.module.function_mut(self.func);
        let value = ValueId(function.insts.len() as u32);
        function.insts.push(inst);
        function.tys.push(ty);
        let block = &mut function.blocks[self.block.index()];
        debug_assert!(block.term.is_none(), "emission into a terminated block");
        block.insts.push(value);
        value
    }

    /// The result type of `value`; pure effects have none.
    pub fn value_ty(&self, value: ValueId) -> Option<Ty> {
        self.module.function(self.func).value_ty(value)
    }

    fn expect_ty(&self, value: ValueId) -> Ty {
        self.value_ty(value).expect("operand produces a value")
    }

    /// An integer constant, masked to `ty`.
    pub fn const_int(&mut self, ty: Ty, bits: u128) -> ValueId {
        self.push(
            Inst::Const {
                ty,
                bits: bits & ty.mask(),
            },
            Some(ty),
        )
    }

    /// Read a module global.
    pub fn read_global(&mut self, global: GlobalId) -> ValueId {
        let ty = self.module.global(global).ty;
        self.push(Inst::ReadGlobal { global }, Some(ty))
    }

    /// Overwrite a module global.
    pub fn write_global(&mut self, global: GlobalId, value: ValueId) -> ValueId {
        debug_assert_eq!(self.module.global(global).ty, self.expect_ty(value));
        self.push(Inst::WriteGlobal { global, value }, None)
    }

    /// Load `ty` from memory.
    pub fn load(&mut self, ty: Ty, addr: ValueId) -> ValueId {
        debug_assert_eq!(self.expect_ty(addr), Ty::I64);
        self.push(Inst::Load { ty, addr }, Some(ty))
    }

    /// Store to memory.
    pub fn store(&mut self, addr: ValueId, value: ValueId) -> ValueId {
        debug_assert_eq!(self.expect_ty(addr), Ty::I64);
        self.push(Inst::Store { addr, value }, None)
    }

    /// A two-operand integer operation.
    pub fn bin(&mut self, op: BinOp, lhs: ValueId, rhs: ValueId) -> ValueId {
        let ty = self.expect_ty(lhs);
        debug_assert_eq!(ty, self.expect_ty(rhs));
        self.push(Inst::Bin { op, lhs, rhs }, Some(ty))
    }

    /// A comparison producing an `i1`.
    pub fn cmp(&mut self, op: CmpOp, lhs: ValueId, rhs: ValueId) -> ValueId {
        debug_assert_eq!(self.expect_ty(lhs), self.expect_ty(rhs));
        self.push(Inst::Cmp { op, lhs, rhs }, Some(Ty::I1))
    }

    /// A width change.
    pub fn cast(&mut self, op: CastOp, to: Ty, value: ValueId) -> ValueId {
        let from = self.expect_ty(value);
        debug_assert!(match op {
            CastOp::Zext | CastOp::Sext => from < to,
            CastOp::Trunc => from > to,
        });
        self.push(Inst::Cast { op, to, value }, Some(to))
    }

    /// Zero-extend.
    pub fn zext(&mut self, to: Ty, value: ValueId) -> ValueId {
        self.cast(CastOp::Zext, to, value)
    }

    /// Sign-extend.
    pub fn sext(&mut self, to: Ty, value: ValueId) -> ValueId {
        self.cast(CastOp::Sext, to, value)
    }

    /// Truncate.
    pub fn trunc(&mut self, to: Ty, value: ValueId) -> ValueId {
        self.cast(CastOp::Trunc, to, value)
    }

    /// Bring `value` to `to` by zero-extension or truncation; a no-op when
    /// the widths already agree.
    pub fn zext_or_trunc(&mut self, to: Ty, value: ValueId) -> ValueId {
        match self.expect_ty(value).cmp(&to) {
            core::cmp::Ordering::Less => self.zext(to, value),
            core::cmp::Ordering::Equal => value,
            core::cmp::Ordering::Greater => self.trunc(to, value),
        }
    }

    /// Bring `value` to `to` by sign-extension or truncation.
    pub fn sext_or_trunc(&mut self, to: Ty, value: ValueId) -> ValueId {
        match self.expect_ty(value).cmp(&to) {
            core::cmp::Ordering::Less => self.sext(to, value),
            core::cmp::Ordering::Equal => value,
            core::cmp::Ordering::Greater => self.trunc(to, value),
        }
    }

    /// Bitwise complement (works on `i1` as boolean negation).
    pub fn not(&mut self, value: ValueId) -> ValueId {
        let ty = self.expect_ty(value);
        let ones = self.const_int(ty, u128::MAX);
        self.bin(BinOp::Xor, value, ones)
    }

    /// Two's-complement negation.
    pub fn neg(&mut self, value: ValueId) -> ValueId {
        let ty = self.expect_ty(value);
        let zero = self.const_int(ty, 0);
        self.bin(BinOp::Sub, zero, value)
    }

    /// `cond ? if_true : if_false`.
    pub fn select(&mut self, cond: ValueId, if_true: ValueId, if_false: ValueId) -> ValueId {
        debug_assert_eq!(self.expect_ty(cond), Ty::I1);
        let ty = self.expect_ty(if_true);
        debug_assert_eq!(ty, self.expect_ty(if_false));
        self.push(
            Inst::Select {
                cond,
                if_true,
                if_false,
            },
            Some(ty),
        )
    }

    /// Call an extern function.
    pub fn call(&mut self, callee: ExternId, args: Vec<ValueId>) -> ValueId {
        let ret = self.module.extern_fn(callee).ret;
        self.push(Inst::Call { callee, args }, ret)
    }

    fn terminate(&mut self, term: Terminator) {
        let function = self.module.function_mut(self.func);
        let block = &mut function.blocks[self.block.index()];
        debug_assert!(block.term.is_none(), "block terminated twice");
        block.term = Some(term);
    }

    /// End the current block with an unconditional jump.
    pub fn jump(&mut self, target: BlockId) {
        self.terminate(Terminator::Jump(target));
    }

    /// End the current block with a two-way branch.
    pub fn branch(&mut self, cond: ValueId, then_block: BlockId, else_block: BlockId) {
        debug_assert_eq!(self.expect_ty(cond), Ty::I1);
        self.terminate(Terminator::Branch {
            cond,
            then_block,
            else_block,
        });
    }

    /// Emit `body` guarded by `cond` and leave the insertion point at the
    /// merge block.
    pub fn if_then<E>(
        &mut self,
        cond: ValueId,
        body: impl FnOnce(&mut Self) -> Result<(), E>,
    ) -> Result<(), E> {
        let then_block = self.new_block();
        let merge = self.new_block();
        self.branch(cond, then_block, merge);
        self.set_block(then_block);
        body(self)?;
        self.jump(merge);
        self.set_block(merge);
        Ok(())
    }

    /// Emit a two-armed diamond and leave the insertion point at the merge
    /// block. Merged values flow through globals or memory, not phis.
    pub fn if_then_else<E>(
        &mut self,
        cond: ValueId,
        then_body: impl FnOnce(&mut Self) -> Result<(), E>,
        else_body: impl FnOnce(&mut Self) -> Result<(), E>,
    ) -> Result<(), E> {
        let then_block = self.new_block();
        let else_block = self.new_block();
        let merge = self.new_block();
        self.branch(cond, then_block, else_block);
        self.set_block(then_block);
        then_body(self)?;
        self.jump(merge);
        self.set_block(else_block);
        else_body(self)?;
        self.jump(merge);
        self.set_block(merge);
        Ok(())
    }
}
