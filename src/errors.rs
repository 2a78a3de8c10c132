use std::io;
use thiserror::Error;

/// An error in reading a Hirshfeld surface mesh file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file could not be read.
    #[error("Unable to read mesh file: {0}")]
    Io(#[from] io::Error),
    /// A section was opened but never closed.
    /// MissingEnd(section, line of the begin marker)
    #[error("Section \"{0}\" opened on line {1} has no matching \"end {0}\".")]
    MissingEnd(String, usize),
    /// A required section does not appear in the file.
    #[error("The mesh file has no \"{0}\" section.")]
    MissingSection(String),
    /// A begin marker without a readable count.
    /// BadHeader(line, text)
    #[error("Unreadable section header on line {0}: \"{1}\"")]
    BadHeader(usize, String),
    /// A line of a section that cannot be read as its section's data.
    /// BadValue(section, line, text)
    #[error("Unreadable entry in section \"{0}\" on line {1}: \"{2}\"")]
    BadValue(String, usize, String),
    /// The number of entries collected differs from the header's count.
    /// CountMismatch(section, declared, collected)
    #[error("Section \"{0}\" declares {1} entries but holds {2}.")]
    CountMismatch(String, usize, usize),
    /// A per-vertex array is not the same length as the vertex list.
    /// LengthMismatch(section, length, vertices)
    #[error("Section \"{0}\" holds {1} values for {2} vertices.")]
    LengthMismatch(String, usize, usize),
    /// A triangle references a vertex that does not exist.
    /// IndexOutOfRange(triangle, index, vertices)
    #[error("Triangle {0} references vertex {1} but only {2} vertices exist.")]
    IndexOutOfRange(usize, usize, usize),
}

/// An error for the integral surface area of a mesh being zero, no
/// fingerprint can be normalised from it.
#[derive(Debug, Error)]
#[error(
    "Integral surface area is zero ({triangles} triangles, {degenerate} degenerate, {out_of_range} outside the grid)."
)]
pub struct EmptySurfaceError {
    /// Number of triangles offered to the binner.
    pub triangles: usize,
    /// Number of those rejected as degenerate.
    pub degenerate: usize,
    /// Number of those falling outside the grid.
    pub out_of_range: usize,
}

/// An error in reading a fingerprint or difference map .dat file.
#[derive(Debug, Error)]
pub enum DatError {
    /// The file could not be read.
    #[error("Unable to read map file: {0}")]
    Io(#[from] io::Error),
    /// A row that isn't three numbers.
    /// BadRow(line, text)
    #[error("Unreadable row on line {0}: \"{1}\"")]
    BadRow(usize, String),
    /// The rows do not cover a dense grid in (d_i, d_e) order.
    /// NotAGrid(line)
    #[error("Rows do not form a sorted dense grid (first mismatch on line {0}).")]
    NotAGrid(usize),
    /// No rows at all.
    #[error("The map file holds no rows.")]
    Empty,
}

/// Errors that stop a single mesh from producing a fingerprint.
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    EmptySurface(#[from] EmptySurfaceError),
    #[error("Unable to write fingerprint: {0}")]
    Io(#[from] io::Error),
}
