//! Configuration, types, and shared structures for chromascii.
//!
//! This crate contains the shared pixel and grid types, the character ramp,
//! HSV color math, and configuration logic used across the workspace.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod metrics;
pub mod traits;

pub use charset::{CharacterRamp, RampOrder};
pub use config::ArtConfig;
pub use error::CoreError;
pub use frame::{ArtCell, ArtGrid, Raster, Rgb};
pub use metrics::FontMetrics;
