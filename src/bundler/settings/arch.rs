//! CPU architecture types and utilities.

/// CPU architecture of the Windows binaries being packaged.
///
/// Detected from the target triple. Selects the MSYS2 runtime flavour whose
/// DLLs are shipped and the WiX `Platform` of the package.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Arch {
    /// x86_64 / AMD64 (64-bit)
    X86_64,
    /// x86 / i686 (32-bit)
    X86,
    /// AArch64 / ARM64 (64-bit)
    AArch64,
}

impl Arch {
    /// Detect the architecture from a target triple or bare arch name.
    ///
    /// Unknown triples fall back to `X86_64`.
    pub fn from_target(target: &str) -> Self {
        if target.starts_with("x86_64") {
            Arch::X86_64
        } else if target.starts_with('i') || target == "x86" {
            Arch::X86
        } else if target.starts_with("aarch64") {
            Arch::AArch64
        } else {
            Arch::X86_64
        }
    }

    /// MSYS2 environment directory that holds this architecture's runtime.
    pub fn runtime_marker(self) -> &'static str {
        match self {
            Arch::X86 => "mingw32",
            Arch::X86_64 => "mingw64",
            Arch::AArch64 => "clangarm64",
        }
    }

    /// Value for the WiX `Package/@Platform` attribute.
    pub fn wix_platform(self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X86_64 => "x64",
            Arch::AArch64 => "arm64",
        }
    }
}
