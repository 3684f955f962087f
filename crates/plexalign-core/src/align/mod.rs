pub mod estimator;
mod fft;
pub mod phase_correlation;
pub mod shift;
pub mod upsampled;

pub use estimator::{alignment_error, downsample_factor, estimate_translation};
pub use fft::{fft2d_forward, ifft2d_inverse};
pub use shift::shift_frame;
