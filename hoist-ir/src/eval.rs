//! Reference evaluator for lifted fragments.
//!
//! Executes one function over a small machine state and records every
//! observable effect: which globals were read, which globals and memory
//! bytes were written, and which extern calls were made with which
//! arguments. Translator test suites assert directly on those effect sets.
//!
//! The evaluator is a test instrument, not an interpreter for production
//! use; it is only compiled with the `test-helpers` feature.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::{BinOp, CastOp, CmpOp, FuncId, GlobalId, Inst, Module, Terminator, Ty, ValueId};

/// Evaluation failures. All of them indicate malformed IR or a genuinely
/// trapping operation reaching execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// An unguarded division executed with a zero divisor.
    #[error("division by zero reached execution")]
    DivideByZero,
    /// The step budget was exhausted (runaway block cycle).
    #[error("step limit exceeded")]
    StepLimit,
    /// An instruction referenced a value that produced no result.
    #[error("use of a result-less value {0}")]
    MissingValue(ValueId),
}

/// One recorded extern call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    /// Callee name.
    pub callee: String,
    /// Evaluated arguments, canonical (masked) bit patterns.
    pub args: Vec<u128>,
}

/// Machine state the fragment runs against.
#[derive(Debug, Default, Clone)]
pub struct Machine {
    /// Global cells; absent entries read as zero.
    pub globals: HashMap<GlobalId, u128>,
    /// Byte-addressed little-endian memory; absent bytes read as zero.
    pub memory: HashMap<u64, u8>,
}

impl Machine {
    /// Set a global cell.
    pub fn set_global(&mut self, global: GlobalId, bits: u128) {
        self.globals.insert(global, bits);
    }

    /// Current value of a global cell.
    pub fn global(&self, global: GlobalId) -> u128 {
        self.globals.get(&global).copied().unwrap_or(0)
    }

    /// Write a little-endian value of `ty` at `addr`.
    pub fn set_mem(&mut self, addr: u64, ty: Ty, bits: u128) {
        for i in 0..ty.bytes() as u64 {
            self.memory
                .insert(addr.wrapping_add(i), (bits >> (8 * i)) as u8);
        }
    }

    /// Read a little-endian value of `ty` at `addr`.
    pub fn mem(&self, addr: u64, ty: Ty) -> u128 {
        let mut bits = 0u128;
        for i in 0..ty.bytes() as u64 {
            let byte = self.memory.get(&addr.wrapping_add(i)).copied().unwrap_or(0);
            bits |= u128::from(byte) << (8 * i);
        }
        bits & ty.mask()
    }
}

/// Observable effects of one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Effects {
    /// Globals read, in id order.
    pub reg_loads: BTreeSet<GlobalId>,
    /// Globals written, with the last value written.
    pub reg_stores: BTreeMap<GlobalId, u128>,
    /// Memory load base addresses, in execution order.
    pub mem_loads: Vec<u64>,
    /// Memory stores: base address, value, access type, in execution order.
    pub mem_stores: Vec<(u64, u128, Ty)>,
    /// Extern calls, in execution order.
    pub calls: Vec<CallRecord>,
}

const STEP_LIMIT: usize = 10_000;

fn to_signed(ty: Ty, bits: u128) -> i128 {
    if bits & ty.sign_bit() != 0 {
        (bits | !ty.mask()) as i128
    } else {
        bits as i128
    }
}

fn shift_amount(ty: Ty, bits: u128) -> Option<u32> {
    let amt = bits & ty.mask();
    (amt < u128::from(ty.bits())).then_some(amt as u32)
}

fn eval_bin(op: BinOp, ty: Ty, a: u128, b: u128) -> Result<u128, EvalError> {
    let mask = ty.mask();
    let out = match op {
        BinOp::Add => a.wrapping_add(b),
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mul => a.wrapping_mul(b),
        BinOp::UDiv => {
            if b == 0 {
                return Err(EvalError::DivideByZero);
            }
            a / b
        }
        BinOp::SDiv => {
            if b == 0 {
                return Err(EvalError::DivideByZero);
            }
            to_signed(ty, a).wrapping_div(to_signed(ty, b)) as u128
        }
        BinOp::URem => {
            if b == 0 {
                return Err(EvalError::DivideByZero);
            }
            a % b
        }
        BinOp::SRem => {
            if b == 0 {
                return Err(EvalError::DivideByZero);
            }
            to_signed(ty, a).wrapping_rem(to_signed(ty, b)) as u128
        }
        BinOp::And => a & b,
        BinOp::Or => a | b,
        BinOp::Xor => a ^ b,
        BinOp::Shl => match shift_amount(ty, b) {
            Some(n) => a << n,
            None => 0,
        },
        BinOp::LShr => match shift_amount(ty, b) {
            Some(n) => (a & mask) >> n,
            None => 0,
        },
        BinOp::AShr => match shift_amount(ty, b) {
            Some(n) => (to_signed(ty, a) >> n) as u128,
            None => {
                if a & ty.sign_bit() != 0 {
                    mask
                } else {
                    0
                }
            }
        },
    };
    Ok(out & mask)
}

fn eval_cmp(op: CmpOp, ty: Ty, a: u128, b: u128) -> bool {
    let (sa, sb) = (to_signed(ty, a), to_signed(ty, b));
    match op {
        CmpOp::Eq => a == b,
        CmpOp::Ne => a != b,
        CmpOp::Ult => a < b,
        CmpOp::Ule => a <= b,
        CmpOp::Ugt => a > b,
        CmpOp::Uge => a >= b,
        CmpOp::Slt => sa < sb,
        CmpOp::Sle => sa <= sb,
        CmpOp::Sgt => sa > sb,
        CmpOp::Sge => sa >= sb,
    }
}

/// Run `func` against `machine`, mutating it and returning the recorded
/// effects.
pub fn run(module: &Module, func: FuncId, machine: &mut Machine) -> Result<Effects, EvalError> {
    let function = module.function(func);
    let mut values: Vec<Option<u128>> = vec![None; function.inst_count()];
    let mut effects = Effects::default();
    let mut block = function.entry();
    let mut steps = 0usize;

    let value_of = |values: &[Option<u128>], v: ValueId| -> Result<u128, EvalError> {
        values[v.index()].ok_or(EvalError::MissingValue(v))
    };

    loop {
        for &v in &function.block(block).insts {
            steps += 1;
            if steps > STEP_LIMIT {
                return Err(EvalError::StepLimit);
            }
            let result = match function.inst(v) {
                Inst::Const { bits, .. } => Some(*bits),
                Inst::ReadGlobal { global } => {
                    effects.reg_loads.insert(*global);
                    Some(machine.global(*global))
                }
                Inst::WriteGlobal { global, value } => {
                    let bits = value_of(&values, *value)?;
                    machine.set_global(*global, bits);
                    effects.reg_stores.insert(*global, bits);
                    None
                }
                Inst::Load { ty, addr } => {
                    let addr = value_of(&values, *addr)? as u64;
                    effects.mem_loads.push(addr);
                    Some(machine.mem(addr, *ty))
                }
                Inst::Store { addr, value } => {
                    let addr = value_of(&values, *addr)? as u64;
                    let bits = value_of(&values, *value)?;
                    let ty = function
                        .value_ty(*value)
                        .ok_or(EvalError::MissingValue(*value))?;
                    machine.set_mem(addr, ty, bits);
                    effects.mem_stores.push((addr, bits, ty));
                    None
                }
                Inst::Bin { op, lhs, rhs } => {
                    let ty = function
                        .value_ty(*lhs)
                        .ok_or(EvalError::MissingValue(*lhs))?;
                    let a = value_of(&values, *lhs)?;
                    let b = value_of(&values, *rhs)?;
                    Some(eval_bin(*op, ty, a, b)?)
                }
                Inst::Cmp { op, lhs, rhs } => {
                    let ty = function
                        .value_ty(*lhs)
                        .ok_or(EvalError::MissingValue(*lhs))?;
                    let a = value_of(&values, *lhs)?;
                    let b = value_of(&values, *rhs)?;
                    Some(u128::from(eval_cmp(*op, ty, a, b)))
                }
                Inst::Cast { op, to, value } => {
                    let from = function
                        .value_ty(*value)
                        .ok_or(EvalError::MissingValue(*value))?;
                    let bits = value_of(&values, *value)?;
                    let out = match op {
                        CastOp::Zext | CastOp::Trunc => bits & to.mask(),
                        CastOp::Sext => (to_signed(from, bits) as u128) & to.mask(),
                    };
                    Some(out)
                }
                Inst::Select {
                    cond,
                    if_true,
                    if_false,
                } => {
                    let c = value_of(&values, *cond)?;
                    Some(if c != 0 {
                        value_of(&values, *if_true)?
                    } else {
                        value_of(&values, *if_false)?
                    })
                }
                Inst::Call { callee, args } => {
                    let decl = module.extern_fn(*callee);
                    let mut evaluated = Vec::with_capacity(args.len());
                    for &a in args {
                        evaluated.push(value_of(&values, a)?);
                    }
                    effects.calls.push(CallRecord {
                        callee: decl.name.clone(),
                        args: evaluated,
                    });
                    decl.ret.map(|_| 0)
                }
            };
            values[v.index()] = result;
        }

        match function.block(block).term {
            Some(Terminator::Jump(next)) => block = next,
            Some(Terminator::Branch {
                cond,
                then_block,
                else_block,
            }) => {
                block = if value_of(&values, cond)? != 0 {
                    then_block
                } else {
                    else_block
                };
            }
            None => return Ok(effects),
        }
    }
}
