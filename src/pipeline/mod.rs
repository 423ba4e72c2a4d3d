//! Pipeline stages for game-card extraction.
//!
//! Each submodule implements one transformation step and can be tested on
//! its own.
//!
//! ## Data Flow
//!
//! ```text
//! unpack ──▶ extract ──▶ clean ──▶ emit
//!   │        (markers)   (rules)   (games.js)
//!   └──────▶ thumbnail
//!            (crop, resize, JPEG)
//! ```
//!
//! 1. [`unpack`]: reset the working directory and extract the archive
//! 2. [`extract`]: iterate image markers and the text segments after each
//! 3. [`clean`]: per-field text cleanup rules
//! 4. [`emit`]: write the prefixed JSON data file atomically
//! 5. [`thumbnail`]: render every source image onto a fixed white canvas

pub mod clean;
pub mod emit;
pub mod extract;
pub mod thumbnail;
pub mod unpack;
