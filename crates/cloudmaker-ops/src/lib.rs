//! Cloudmaker Ops
//!
//! The built-in image operations. Every operation except `copyImage` shells
//! out to ImageMagick: the input object is downloaded to a scratch file,
//! converted, and the result uploaded to the operation's output bucket.
//!
//! | Name | Effect |
//! |------|--------|
//! | `blur` | Gaussian blur, optionally limited to a region |
//! | `crop` | Crop to a region's bounding box or centered square |
//! | `convertRasterFormat` | Re-encode as `.gif`, `.png` or `.jpg` |
//! | `annotate` | Outline a region as a polygon or circle |
//! | `copyImage` | Store-side copy, no image tool involved |

pub mod annotate;
pub mod blur;
pub mod convert;
pub mod copy;
pub mod crop;
pub mod helpers;
mod magick;
pub mod params;
mod registry;
mod transform;

pub use magick::MagickConfig;
pub use registry::default_registry;
pub use transform::{ImageTransform, MagickOperation};
