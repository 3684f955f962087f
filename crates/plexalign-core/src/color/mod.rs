pub mod luminance;

pub use luminance::luminance;
