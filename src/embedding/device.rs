use candle_core::Device;
use tracing::warn;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::info;

use super::error::EmbeddingError;

/// Picks the compute device for encoder inference.
///
/// GPU backends are tried only when their cargo feature is enabled; anything
/// else lands on the CPU, which is plenty for single-query encoding.
pub fn select_device() -> Result<Device, EmbeddingError> {
    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            info!("Encoder running on Metal");
            return Ok(device);
        }
        Err(e) => warn!(error = %e, "Metal device unavailable"),
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            info!("Encoder running on CUDA");
            return Ok(device);
        }
        Err(e) => warn!(error = %e, "CUDA device unavailable"),
    }

    if cfg!(any(feature = "metal", feature = "cuda")) {
        warn!("No GPU device available, encoder falling back to CPU");
    }
    Ok(Device::Cpu)
}
