//! CPU architecture classification for release asset names.
//!
//! Asset names on a forge carry architecture hints as loose tokens
//! (`app-x86_64.AppImage`, `tool_arm64.deb`, `viewer-armeabi-v7a.apk`).
//! Detection is a total function: every name maps to exactly one
//! `Option<Architecture>`, where `None` means "no architecture signal" and is
//! treated as universally compatible.

use serde::{Deserialize, Serialize};

/// CPU architecture of an asset or of the running system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Architecture {
    /// 64-bit x86 (x86_64, amd64, x64).
    X86_64,
    /// 64-bit ARM (aarch64, arm64, armv8).
    Aarch64,
    /// 32-bit x86 (i386, i686).
    X86,
    /// 32-bit ARM (armv7, armeabi).
    Arm,
    /// Could not be determined.
    Unknown,
}

impl Architecture {
    /// Display label for an architecture, matching common asset naming.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
            Self::X86 => "i386",
            Self::Arm => "arm",
            Self::Unknown => "unknown",
        }
    }

    /// Classify a raw ABI string as reported by the host OS
    /// (e.g. `std::env::consts::ARCH`, an Android ABI list entry).
    #[must_use]
    pub fn from_abi(abi: &str) -> Self {
        let abi = abi.to_ascii_lowercase();
        if abi.contains("arm64") || abi.contains("aarch64") {
            Self::Aarch64
        } else if abi.contains("armeabi") || abi.contains("armv7") || abi == "arm" {
            Self::Arm
        } else if abi.contains("x86_64") || abi.contains("amd64") {
            Self::X86_64
        } else if abi.contains("x86") || abi.contains("i686") || abi.contains("i386") {
            Self::X86
        } else {
            Self::Unknown
        }
    }
}

/// Architecture token groups, in fixed priority order.
///
/// The first group is the "universal" group: a hit there means the asset is
/// explicitly architecture-agnostic. Bare `arm` sits in the lowest-priority
/// group so it can never pre-empt an `arm64`/`armv7` hit; token boundaries
/// (see [`contains_token`]) keep it from matching inside `arm64`.
const UNIVERSAL_TOKENS: &[&str] = &["universal", "noarch", "all-arch", "fat"];
const X86_64_TOKENS: &[&str] = &["x86-64", "amd64", "x64"];
const AARCH64_TOKENS: &[&str] = &[
    "aarch64", "arm64", "arm64-v8a", "armv8a", "armv8", "arm-v8", "v8a",
];
const X86_TOKENS: &[&str] = &["i386", "i686", "x86"];
const ARM_TOKENS: &[&str] = &[
    "armeabi-v7a", "armeabi", "armv7a", "armv7", "arm-v7", "v7a", "arm",
];

/// True if `haystack` contains `token` delimited by non-alphanumeric
/// boundaries (or the start/end of the string).
///
/// Note the token itself may contain `-`; only the characters immediately
/// around the match are boundary-checked, so `arm` does not match inside
/// `arm64` but does match in `app-arm.apk`.
fn contains_token(haystack: &str, token: &str) -> bool {
    let bytes = haystack.as_bytes();
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(token) {
        let begin = start + pos;
        let end = begin + token.len();
        let left_ok = begin == 0 || !bytes[begin - 1].is_ascii_alphanumeric();
        let right_ok = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if left_ok && right_ok {
            return true;
        }
        start = begin + 1;
    }
    false
}

fn contains_any_token(haystack: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|t| contains_token(haystack, t))
}

/// Detect the architecture an asset name is built for.
///
/// The name is lowercased and `_` normalized to `-` before matching, so
/// `app_ARM64.apk` and `app-arm64.apk` classify identically. Returns `None`
/// for universal assets and for names carrying no architecture signal at all;
/// both cases mean "no architecture restriction".
#[must_use]
pub fn detect_architecture(asset_name: &str) -> Option<Architecture> {
    let name = asset_name.to_ascii_lowercase().replace('_', "-");
    if contains_any_token(&name, UNIVERSAL_TOKENS) {
        return None;
    }
    if contains_any_token(&name, X86_64_TOKENS) {
        return Some(Architecture::X86_64);
    }
    if contains_any_token(&name, AARCH64_TOKENS) {
        return Some(Architecture::Aarch64);
    }
    if contains_any_token(&name, X86_TOKENS) {
        return Some(Architecture::X86);
    }
    if contains_any_token(&name, ARM_TOKENS) {
        return Some(Architecture::Arm);
    }
    None
}

/// Whether an asset can run on a system of the given architecture.
///
/// Compatibility is deliberately asymmetric: 64-bit systems accept their
/// 32-bit counterparts (`X86_64` accepts `X86`, `Aarch64` accepts `Arm`),
/// 32-bit systems accept only their exact architecture, and an `Unknown`
/// system accepts everything. Assets with no detected architecture are
/// always compatible.
#[must_use]
pub fn is_compatible(asset_name: &str, system_arch: Architecture) -> bool {
    let Some(asset_arch) = detect_architecture(asset_name) else {
        return true;
    };
    match system_arch {
        Architecture::X86_64 => {
            asset_arch == Architecture::X86_64 || asset_arch == Architecture::X86
        }
        Architecture::Aarch64 => {
            asset_arch == Architecture::Aarch64 || asset_arch == Architecture::Arm
        }
        Architecture::X86 => asset_arch == Architecture::X86,
        Architecture::Arm => asset_arch == Architecture::Arm,
        Architecture::Unknown => true,
    }
}

/// Strict equality between the detected asset architecture and the system
/// architecture. Used for ranking and display, not filtering; an undetected
/// architecture is never an exact match.
#[must_use]
pub fn is_exact_match(asset_name: &str, system_arch: Architecture) -> bool {
    detect_architecture(asset_name) == Some(system_arch)
}

/// Display label for the architecture detected in an asset name, if any.
#[must_use]
pub fn architecture_label(asset_name: &str) -> Option<&'static str> {
    match detect_architecture(asset_name)? {
        Architecture::Unknown => None,
        arch => Some(arch.label()),
    }
}
