//! Common plumbing for chandra models: where model files come from, how they
//! are fetched and which device they run on.

use candle_core::Device;

mod cache;
pub use cache::*;
mod progress;
pub use progress::*;
mod source;
pub use source::*;

/// The device every chandra model is placed on.
///
/// Accelerators are never used, even if candle was built with support for one.
pub fn cpu_device() -> Device {
    if candle_core::utils::cuda_is_available() || candle_core::utils::metal_is_available() {
        tracing::debug!("An accelerator is available but models always run on the CPU");
    }
    Device::Cpu
}

#[test]
fn device_is_always_cpu() {
    assert!(cpu_device().is_cpu());
}
