use crate::errors::DatError;
use crate::grid::Grid;
use crate::io::reader::BufReader;
use crate::utils;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// The contents of a fingerprint or difference map .dat file.
#[derive(Clone, Debug, PartialEq)]
pub struct GridData {
    /// The grid spanned by the rows.
    pub grid: Grid,
    /// The third column, in grid index order.
    pub values: Vec<f64>,
}

/// Read a fingerprint or difference map from file.
pub fn read(path: impl AsRef<Path>) -> Result<GridData, DatError> {
    let reader = BufReader::open(path)?;
    from_reader(reader)
}

/// Parse a fingerprint or difference map from a string.
pub fn parse(text: &str) -> Result<GridData, DatError> {
    from_reader(BufReader::new(text.as_bytes()))
}

fn from_reader<R: Read>(mut reader: BufReader<R>) -> Result<GridData, DatError> {
    let mut rows: Vec<(usize, (i32, i32), f64)> = vec![];
    let mut buffer = String::new();
    while let Some(line) = reader.read_line(&mut buffer) {
        let (text, _) = line?;
        let text = text.trim();
        // blank lines only separate blocks
        if text.is_empty() {
            continue;
        }
        let n = reader.line_number();
        let row = text.split_whitespace()
                      .map(|x| x.parse::<f64>().ok())
                      .collect::<Option<Vec<f64>>>()
                      .filter(|r| r.len() == 3)
                      .ok_or_else(|| DatError::BadRow(n, text.to_string()))?;
        rows.push((n, (utils::quantize(row[0]), utils::quantize(row[1])), row[2]));
    }
    let (first, last) = match (rows.first(), rows.last()) {
        (Some(f), Some(l)) => (f.1, l.1),
        _ => return Err(DatError::Empty),
    };
    let grid = Grid::new([first.0, last.0], [first.1, last.1]);
    for (i, (n, key, _)) in rows.iter().enumerate() {
        if i >= grid.len() || grid.key(i) != *key {
            return Err(DatError::NotAGrid(*n));
        }
    }
    if rows.len() != grid.len() {
        return Err(DatError::NotAGrid(rows[rows.len() - 1].0));
    }
    Ok(GridData { grid,
                  values: rows.into_iter().map(|(_, _, v)| v).collect() })
}

/// Writes `d_i d_e value` rows in grid order, with a blank line closing each
/// block of constant d_i.
pub fn write_to(mut out: impl Write, grid: &Grid, values: &[f64]) -> io::Result<()> {
    for (i, value) in values.iter().enumerate() {
        let (d_i, d_e) = grid.key(i);
        writeln!(out,
                 "{} {} {:.8}",
                 utils::hundredths(d_i),
                 utils::hundredths(d_e),
                 value)?;
        if d_e == grid.d_e[1] {
            writeln!(out)?;
        }
    }
    out.flush()
}

/// Write a map to file.
pub fn write(path: impl AsRef<Path>, grid: &Grid, values: &[f64]) -> io::Result<()> {
    let file = File::create(path)?;
    write_to(BufWriter::new(file), grid, values)
}

/// Format a map as a String.
pub fn format(grid: &Grid, values: &[f64]) -> String {
    let mut out = Vec::new();
    // writing to a Vec cannot fail
    let _ = write_to(&mut out, grid, values);
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dat_format_blocks() {
        let grid = Grid::new([40, 41], [40, 42]);
        let text = format(&grid, &[0.0, 1.0, 2.0, 3.0, 4.0, 95.5]);
        assert_eq!(text,
                   "0.40 0.40 0.00000000\n\
                    0.40 0.41 1.00000000\n\
                    0.40 0.42 2.00000000\n\
                    \n\
                    0.41 0.40 3.00000000\n\
                    0.41 0.41 4.00000000\n\
                    0.41 0.42 95.50000000\n\
                    \n");
    }

    #[test]
    fn dat_parse_formatted() {
        let grid = Grid::new([40, 41], [40, 42]);
        let values = vec![0.0, 1.0, 2.0, 3.0, 4.0, 95.5];
        let data = parse(&format(&grid, &values)).unwrap();
        assert_eq!(data.grid, grid);
        assert_eq!(data.values, values);
    }

    #[test]
    fn dat_parse_without_blank_lines() {
        let data = parse("1.00 2.00 0.5\n1.00 2.01 -0.5\n").unwrap();
        assert_eq!(data.grid, Grid::new([100, 100], [200, 201]));
        assert_eq!(data.values, vec![0.5, -0.5]);
    }

    #[test]
    fn dat_parse_bad_row() {
        assert!(matches!(parse("0.40 0.40 0.0\n0.40 0.41\n"), Err(DatError::BadRow(2, _))))
    }

    #[test]
    fn dat_parse_not_a_grid() {
        assert!(matches!(parse("0.40 0.40 0.0\n0.40 0.42 0.0\n0.40 0.41 0.0\n"),
                         Err(DatError::NotAGrid(_))))
    }

    #[test]
    fn dat_parse_empty() {
        assert!(matches!(parse("\n\n"), Err(DatError::Empty)))
    }
}
