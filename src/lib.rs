//! Quantized multi-channel palette sorting.
//!
//! A palette is an ordered list of named colors. The sorter reorders it
//! by a channel derived from each color (or its position), with optional
//! quantization so near-equal keys tie and keep their original order,
//! and four selection modes: the whole palette, explicit slice rows, a
//! span bounded by marker colors, or partition runs sorted within.
//!
//! Palettes live behind the [`store::PaletteStore`] trait; the crate
//! ships an in-memory store fed from GIMP `.gpl` files for the CLI.

pub mod channel;
pub mod cli;
pub mod color;
pub mod error;
pub mod gpl;
pub mod preview;
pub mod registry;
pub mod slice;
pub mod sorter;
pub mod store;
