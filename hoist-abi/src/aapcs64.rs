use hoist_asm::Reg;

use crate::{Binding, CallingConvention, StackDirection};

/// The AArch64 procedure-call standard, over the lifter's register
/// numbering.
///
/// Integer arguments go through X0–X7 and floating-point/vector arguments
/// through V0–V7; the S/D views are lanes of the same V registers, so the
/// overlay flag is set and the three non-integer lists coincide. Integer
/// results come back in X0/X1, vector results in V0–V3. Composites small
/// enough for registers stay there, larger ones go by reference, so the
/// composites-on-stack policy is off.
pub fn aapcs64<B: Binding>(binding: &B) -> CallingConvention {
    let ids = |regs: &[Reg]| regs.iter().map(|&r| r as u16).collect::<Vec<_>>();
    let vector = ids(&[
        Reg::V0,
        Reg::V1,
        Reg::V2,
        Reg::V3,
        Reg::V4,
        Reg::V5,
        Reg::V6,
        Reg::V7,
    ]);
    let vector_ret = ids(&[Reg::V0, Reg::V1, Reg::V2, Reg::V3]);

    CallingConvention::builder()
        .param_regs(ids(&[
            Reg::X0,
            Reg::X1,
            Reg::X2,
            Reg::X3,
            Reg::X4,
            Reg::X5,
            Reg::X6,
            Reg::X7,
        ]))
        .param_fp_regs(vector.clone())
        .param_double_regs(vector.clone())
        .param_vector_regs(vector)
        .return_regs(ids(&[Reg::X0, Reg::X1]))
        .return_fp_regs(vector_ret.clone())
        .return_double_regs(vector_ret.clone())
        .return_vector_regs(vector_ret)
        .regs_overlay(true)
        .regs_per_param(2)
        .stack_direction(StackDirection::RightToLeft)
        .passes_composites_on_stack(false)
        .max_bytes_per_stack_param(binding.word_size())
        .build()
}
