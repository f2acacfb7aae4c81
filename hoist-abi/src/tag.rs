/// The closed set of ABI tags the pipeline can name.
///
/// Only tags with a registered factory produce descriptors; see
/// [`crate::CallConvRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
#[allow(missing_docs)] // the names are the ABI names
pub enum CallConv {
    Cdecl,
    Ellipsis,
    Stdcall,
    Thiscall,
    Pascal,
    Fastcall,
    PascalFastcall,
    Watcom,
    SystemvX64,
    MicrosoftX64,
    Arm,
    Arm64,
    Powerpc,
    Powerpc64,
    Mips,
    MipsPsp,
    Mips64,
    Pic32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn the_tag_set_is_closed_and_named() {
        assert_eq!(CallConv::iter().count(), 18);
        assert_eq!(CallConv::Arm64.to_string(), "arm64");
        assert_eq!(CallConv::SystemvX64.to_string(), "systemv_x64");
        assert_eq!(CallConv::PascalFastcall.to_string(), "pascal_fastcall");
    }
}
