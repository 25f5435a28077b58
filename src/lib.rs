//! # asset-prep
//!
//! A pre-build step for content-driven sites. Run it before the site build
//! and it leaves three things in the public directory:
//!
//! - responsive WebP variants of every image, one per size profile;
//! - `images.json`, the list of every source image;
//! - `info.json`, the site metadata from `content/info.yml`.
//!
//! # Architecture: Three Stages
//!
//! ```text
//! 1. Scan     public/            →  images.json           (walk + allow-list)
//! 2. Resize   scanned images     →  public/resized/...    (parallel WebP encode)
//! 3. Info     content/info.yml   →  public/info.json      (YAML → JSON)
//! ```
//!
//! The stages are plain functions over explicit paths and a
//! [`config::PipelineConfig`]; [`pipeline::run`] chains them and returns a
//! report. Image work goes through the [`imaging::ImageBackend`] trait so the
//! orchestration is tested with a recording mock instead of real encodes.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the asset root and builds the image manifest |
//! | [`resize`] | Stage 2: plans and encodes the size-profile variants |
//! | [`info`] | Stage 3: resolves the content root and converts `info.yml` |
//! | [`pipeline`] | Chains the stages for the `build` command |
//! | [`config`] | `asset-prep.toml` loading, merging, and validation |
//! | [`imaging`] | Image backend trait, dimension math, `image` + `webp` backend |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`types`] | Types shared between stages (`SizeProfile`, `SourceImage`) |
//!
//! # Design Decisions
//!
//! ## Existence Is the Cache
//!
//! A variant is generated only when its output file is missing. There is no
//! hash or timestamp comparison, so replacing a source image keeps serving
//! the old variants until `resized/` (or the specific files) is deleted. In
//! exchange, a rebuild with nothing new does no image work at all and a
//! failed variant is retried on the next run for free.
//!
//! ## Variant Names Keep the Source Extension
//!
//! `photo.png` becomes `resized/small/photo.png.webp`. The front end derives
//! the variant URL from the manifest entry by string concatenation, and
//! `photo.png` and `photo.jpg` can coexist without colliding.
//!
//! ## Never Enlarge
//!
//! A profile width is a ceiling. Images narrower than the profile are
//! re-encoded at their own size, so every variant exists even for small
//! sources and the front end never has to check.

pub mod config;
pub mod imaging;
pub mod info;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod resize;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
