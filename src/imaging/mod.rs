//! Image processing.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader` (format sniffed from content) |
//! | **Resize** | Lanczos3 via `image::DynamicImage::resize_exact` |
//! | **Encode → WebP** | `webp::Encoder` (lossy) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::fit_within_width;
pub use operations::{GeneratedVariant, create_variant, get_dimensions};
pub use params::{Quality, ResizeParams};
pub use rust_backend::RustBackend;
