//! A multi-threaded binary and library for normalised 2D Hirshfeld surface
//! fingerprints and their difference maps, for quantifying how alike the
//! surfaces of two crystal polymorphs are.
//!
//! ### Supported Platforms
//! - Linux
//! - Os X
//! - Windows
//!
//! ## Installing the binary
//! ### From Source
//! The following will create the ./target/release/hfp executable.
//! ```sh
//! $ cargo build --verbose --release
//! ```
//! From here you can either move or link the binary to folder in your path.
//! ```sh
//! $ mv ./target/release/hfp ~/bin
//! ```
//!
//! ## Usage
//! The program reads Hirshfeld surfaces exported by [CrystalExplorer] as .cxs
//! files. Each triangle of the surface puts its area into the bin of its mean
//! (d_i, d_e), rounded to 0.01, and the bins are normalised to percent of the
//! surface. The result is written, one bin per row, to <stem>.dat.
//! ```sh
//! $ hfp fingerprint form_a.cxs form_b.cxs form_c.cxs
//! ```
//! Every pair of fingerprints on the same grid can then be subtracted, which
//! writes diff_<reference>_<probe>.dat with the earlier name as reference.
//! ```sh
//! $ hfp diff form_a.dat form_b.dat form_c.dat
//! ```
//! The difference number, the sum of the absolute differences of a map, is
//! a single measure of how different two surfaces are.
//! ```sh
//! $ hfp number diff_*.dat
//! ```
//! All three steps can be run at once with `hfp run *.cxs`. For a detailed
//! list of usage options run
//! ```sh
//! $ hfp --help
//! ```
//! ## License
//! GPL-2.0-or-later
//!
//! [CrystalExplorer]: <https://crystalexplorer.net/>

/// The formulas for the area of a triangle in space.
pub mod area;
/// For parsing command-line arguments.
pub mod arguments;
/// Runs fingerprinting, differencing and numbering over many files, reporting
/// failures and carrying on.
pub mod batch;
/// Contains [DifferenceMap](difference::DifferenceMap), the round robin over
/// a set of fingerprints and the difference number.
pub mod difference;
/// Provides custom errors types.
pub mod errors;
/// Contains [Binner](fingerprint::Binner) for accumulating triangle areas and
/// the normalised [Fingerprint](fingerprint::Fingerprint) it produces.
pub mod fingerprint;
/// Contains [Grid](grid::Grid) for moving between quantized (d_i, d_e) keys
/// and dense indices, and the [GridRange](grid::GridRange) presets.
pub mod grid;
/// Handles the File I/O for the mesh files and the .dat files.
pub mod io;
/// Contains [SurfaceMesh](mesh::SurfaceMesh) and its transient
/// [Triangle](mesh::Triangle)s.
pub mod mesh;
/// A worker pool that keeps input order and can be cancelled.
pub mod pool;
/// Provides a [Bar](progress::Bar) for reporting the progress of a batch.
pub mod progress;
/// Misc functions mainly for vector manipulation and two decimal keys.
pub mod utils;
