//! Primary asset selection.
//!
//! Given a release's asset list and the system architecture, pick the one
//! asset the UI should offer to install. This is a ranking heuristic, not a
//! guarantee of correctness: when nothing compatible is found the full list
//! is reconsidered, on the theory that offering an install that might be
//! wrong beats offering nothing.

use crate::arch::{Architecture, is_compatible, is_exact_match};
use crate::domain::ReleaseAsset;

/// Score boost for an exact architecture match.
///
/// Tunable: it must stay large enough to dominate any realistic asset size
/// in the size tie-break below. The assumption that no legitimate asset
/// exceeds this many bytes is deliberate and documented rather than
/// enforced.
pub const ARCH_BOOST: u64 = 10_000;

/// Choose the primary installable asset for the given system architecture.
///
/// Empty input yields `None`. Candidates are filtered to
/// architecture-compatible assets; if that filter empties the list, the full
/// unfiltered list is ranked instead. Rank is `ARCH_BOOST` (exact
/// architecture match only) plus the asset size in bytes, larger size being
/// a proxy for the more complete build. Deterministic for a fixed input,
/// so repeated calls on the same list return the same asset.
#[must_use]
pub fn choose_primary_asset(
    assets: &[ReleaseAsset],
    system_arch: Architecture,
) -> Option<&ReleaseAsset> {
    if assets.is_empty() {
        return None;
    }

    let compatible: Vec<&ReleaseAsset> = assets
        .iter()
        .filter(|asset| is_compatible(&asset.name, system_arch))
        .collect();

    let candidates: Vec<&ReleaseAsset> = if compatible.is_empty() {
        assets.iter().collect()
    } else {
        compatible
    };

    candidates.into_iter().max_by_key(|asset| {
        let boost = if is_exact_match(&asset.name, system_arch) {
            ARCH_BOOST
        } else {
            0
        };
        boost + asset.size_bytes
    })
}

/// Whether an asset is installable: its extension must be in the platform's
/// accepted set (supplied by the dispatcher) and its name must be
/// architecture-compatible with the system.
#[must_use]
pub fn is_asset_installable(
    asset_name: &str,
    system_arch: Architecture,
    supported_extensions: &[&str],
) -> bool {
    let name = asset_name.to_ascii_lowercase();
    let accepted = supported_extensions
        .iter()
        .any(|ext| name.ends_with(&format!(".{ext}")));
    accepted && is_compatible(&name, system_arch)
}
