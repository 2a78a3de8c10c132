/// Reads CrystalExplorer .cxs surface files into a [SurfaceMesh](crate::mesh::SurfaceMesh).
pub mod cxs;
/// Reads and writes the `d_i d_e value` .dat files of fingerprints and
/// difference maps.
pub mod dat;
/// Formats the reports printed to the terminal.
pub mod output;
/// A line reader that counts lines.
pub mod reader;
