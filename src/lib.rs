//! # zenbmpfx
//!
//! Uncompressed BMP decoder and encoder for 8-bit grayscale and 24-bit RGB
//! images, plus in-place filters.
//!
//! ## Supported Files
//!
//! - **8-bit**: single channel with a 256-entry color table, carried through
//!   unchanged (pixel values are not looked up in it)
//! - **24-bit**: RGB, stored B, G, R on disk
//! - Bottom-up (positive height) and top-down (negative height) row order
//!
//! ## Filters
//!
//! - Point: negative, brightness, threshold (8-bit), grayscale (24-bit)
//! - Convolution with any odd square [`Kernel`], plus five fixed 3×3 presets
//! - Histogram equalization (on the luma channel for 24-bit)
//!
//! ## Non-Goals
//!
//! - Compressed BMP (RLE, bitfields), 1/4/16/32-bit depths
//! - OS/2 and V4/V5 header semantics (larger headers are read as V3)
//! - Color management
//!
//! ## Usage
//!
//! ```no_run
//! use zenbmpfx::{Image, KernelPreset};
//!
//! let data: &[u8] = &[]; // your BMP bytes
//! let mut image = zenbmpfx::decode(data)?;
//! println!("{image}");
//!
//! image.apply_preset(KernelPreset::Sharpen);
//! image.equalize();
//! if let Image::Gray(gray) = &mut image {
//!     gray.threshold(128);
//! }
//!
//! let bytes = zenbmpfx::encode(&image)?;
//! # Ok::<(), zenbmpfx::BmpError>(())
//! ```

#![forbid(unsafe_code)]

mod bmp;
mod buffer;
mod decode;
mod encode;
mod error;
mod header;
mod image;
mod limits;
mod pixel;

#[cfg(feature = "std")]
mod io;

pub mod filters;

// Re-exports
pub use buffer::PixelBuffer;
pub use decode::{DecodeRequest, decode, decode_gray, decode_rgb};
pub use encode::{encode, encode_with_stop};
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::BmpError;
pub use filters::{Kernel, KernelPreset};
pub use header::{ColorTable, FileHeader, InfoHeader, RowOrder};
pub use image::{Image, Image8, Image24};
pub use limits::Limits;
pub use pixel::{BitDepth, Pixel};
pub use rgb::RGB8;

#[cfg(feature = "std")]
pub use io::{load, save};
