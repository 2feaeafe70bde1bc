//! Execution-strategy dispatch: capability probe, kernel selection and the
//! batch helper.

#[cfg(target_arch = "x86_64")]
mod aesni;
#[cfg(feature = "multithread")]
mod batch;
mod dispatcher;
mod soft;

#[cfg(feature = "multithread")]
pub use batch::compute_batch;
pub use dispatcher::{hardware_path_available, Backend};
pub(crate) use dispatcher::{active_backend, select};
