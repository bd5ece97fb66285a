//! Carrier-versus-stego comparison.
//!
//! Measures how far an embed moved the channel values, so the minimal
//! perturbation property can be checked on real images.

use crate::error::{Result, StegoError};
use crate::grid::PixelGrid;

/// Mean squared error below which a stego grid counts as imperceptible.
pub const DEFAULT_MSE_THRESHOLD: f64 = 10.0;

/// Differences between an original grid and its stego counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct Perturbation {
    /// Channel values that differ at all.
    pub changed_channels: usize,
    /// Largest absolute difference of any channel value.
    pub max_delta: u8,
    /// Mean squared error over every channel value.
    pub mse: f64,
}

impl Perturbation {
    /// Whether the mean squared error is below `threshold`.
    pub fn is_imperceptible(&self, threshold: f64) -> bool {
        self.mse < threshold
    }

    /// Peak signal-to-noise ratio in dB, `None` for identical grids.
    pub fn psnr(&self) -> Option<f64> {
        if self.mse == 0.0 {
            return None;
        }
        Some(10.0 * (255.0f64 * 255.0 / self.mse).log10())
    }
}

/// Compares two grids of the same shape.
pub fn compare(original: &PixelGrid, stego: &PixelGrid) -> Result<Perturbation> {
    if !original.same_shape(stego) {
        return Err(StegoError::InvalidGrid(format!(
            "shape mismatch: {}x{}x{} vs {}x{}x{}",
            original.width(),
            original.height(),
            original.channels(),
            stego.width(),
            stego.height(),
            stego.channels()
        )));
    }

    let mut changed_channels = 0;
    let mut max_delta = 0u8;
    let mut sum_sq = 0u64;
    for (a, b) in original.as_raw().iter().zip(stego.as_raw()) {
        let delta = a.abs_diff(*b);
        if delta != 0 {
            changed_channels += 1;
            max_delta = max_delta.max(delta);
            sum_sq += u64::from(delta) * u64::from(delta);
        }
    }

    let count = original.as_raw().len();
    let mse = if count == 0 {
        0.0
    } else {
        sum_sq as f64 / count as f64
    };

    Ok(Perturbation {
        changed_channels,
        max_delta,
        mse,
    })
}
