//! Capability probe and kernel selection.

use crate::types::Kernel;

#[cfg(all(target_arch = "x86_64", feature = "std"))]
use std::sync::OnceLock;

/// An execution strategy of the hash engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Hardware AES round instructions (AES-NI).
    AesNi,
    /// Table-driven software rounds.
    Soft,
}

impl Backend {
    /// Human-readable strategy name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AesNi => "aes-ni",
            Self::Soft => "soft",
        }
    }
}

/// Whether the hardware AES path can run on this machine.
///
/// Probed once and cached; with `std` disabled the answer comes from
/// compile-time target features instead.
#[must_use]
pub fn hardware_path_available() -> bool {
    #[cfg(all(target_arch = "x86_64", feature = "std"))]
    {
        static PROBE: OnceLock<bool> = OnceLock::new();
        *PROBE.get_or_init(|| {
            std::arch::is_x86_feature_detected!("aes")
                && std::arch::is_x86_feature_detected!("sse2")
        })
    }
    #[cfg(all(target_arch = "x86_64", not(feature = "std")))]
    {
        cfg!(all(target_feature = "aes", target_feature = "sse2"))
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

/// The strategy a plain `compute` call will use on this machine.
pub(crate) fn active_backend() -> Backend {
    if hardware_path_available() {
        Backend::AesNi
    } else {
        Backend::Soft
    }
}

static SOFT_KERNEL: Kernel = Kernel {
    name: Backend::Soft.name(),
    fill: super::soft::fill,
    fold: super::soft::fold,
    mix: super::soft::mix,
};

#[cfg(target_arch = "x86_64")]
static AESNI_KERNEL: Kernel = Kernel {
    name: Backend::AesNi.name(),
    fill: super::aesni::fill,
    fold: super::aesni::fold,
    mix: super::aesni::mix,
};

/// Resolve a backend request to a kernel. A hardware request silently falls
/// back to the software kernel when the probe fails; installing the
/// hardware kernel without the probe would be unsound.
pub(crate) fn select(backend: Backend) -> &'static Kernel {
    #[cfg(target_arch = "x86_64")]
    if backend == Backend::AesNi && hardware_path_available() {
        return &AESNI_KERNEL;
    }
    let _ = backend;
    &SOFT_KERNEL
}
