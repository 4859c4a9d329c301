use snap_core::Error;

/// Normalized 1D Gaussian kernel.
///
/// Conventions:
/// - `radius = ceil(3*sigma)`, minimum 1.
/// - `taps.len() == 2 * radius + 1` and `sum(taps) ~= 1`.
#[derive(Debug, Clone)]
pub struct GaussianKernel1D {
    pub sigma: f32,
    pub radius: usize,
    pub taps: Vec<f32>,
}

impl GaussianKernel1D {
    pub fn new(sigma: f32) -> Result<Self, Error> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(Error::InvalidConfig("sigma must be finite and > 0"));
        }

        let radius = ((3.0 * sigma).ceil() as usize).max(1);
        let sigma2 = sigma * sigma;
        let mut taps: Vec<f32> = (0..=2 * radius)
            .map(|i| {
                let x = i as f32 - radius as f32;
                (-(x * x) / (2.0 * sigma2)).exp()
            })
            .collect();

        let sum: f32 = taps.iter().sum();
        for t in &mut taps {
            *t /= sum;
        }

        Ok(Self {
            sigma,
            radius,
            taps,
        })
    }

    /// Kernel whose half-width is approximately `filter_radius` pixels.
    pub fn from_filter_radius(filter_radius: f32) -> Result<Self, Error> {
        if !filter_radius.is_finite() || filter_radius <= 0.0 {
            return Err(Error::InvalidConfig("filter_radius must be finite and > 0"));
        }
        Self::new(filter_radius / 3.0)
    }
}
