use crate::errors::ParseError;
use crate::io::reader::BufReader;
use crate::mesh::SurfaceMesh;
use regex::Regex;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// The sections of a CrystalExplorer surface file that make up the mesh.
const SECTIONS: [&str; 4] = ["vertices", "indices", "d_i", "d_e"];

/// Matches "begin <section> <count>" and "end <section>" markers.
fn markers() -> &'static (Regex, Regex) {
    static MARKERS: OnceLock<(Regex, Regex)> = OnceLock::new();
    MARKERS.get_or_init(|| {
               (Regex::new(r"^begin\s+(\S+)(?:\s+(\S+))?").expect("begin marker pattern"),
                Regex::new(r"^end\s+(\S+)").expect("end marker pattern"))
           })
}

/// The raw lines collected between a begin and end marker.
struct Section {
    name: String,
    declared: usize,
    begin_line: usize,
    lines: Vec<(usize, String)>,
}

impl Section {
    /// Drops the line restating the count, if there is one, and checks the
    /// number of entries left against the header.
    fn entries(mut self) -> Result<Vec<(usize, String)>, ParseError> {
        // a lone count line is only ambiguous when the lengths already agree
        if self.lines.len() != self.declared
           && self.lines.first().map(|(_, t)| t.parse::<usize>().ok())
              == Some(Some(self.declared))
        {
            self.lines.remove(0);
        }
        if self.lines.len() != self.declared {
            return Err(ParseError::CountMismatch(self.name,
                                                 self.declared,
                                                 self.lines.len()));
        }
        Ok(self.lines)
    }
}

/// Read a Hirshfeld surface mesh from a CrystalExplorer .cxs file.
pub fn read(path: impl AsRef<Path>) -> Result<SurfaceMesh, ParseError> {
    let reader = BufReader::open(path)?;
    from_reader(reader)
}

/// Parse a Hirshfeld surface mesh from the contents of a .cxs file.
pub fn parse(text: &str) -> Result<SurfaceMesh, ParseError> {
    from_reader(BufReader::new(text.as_bytes()))
}

fn from_reader<R: Read>(mut reader: BufReader<R>) -> Result<SurfaceMesh, ParseError> {
    let (begin, end) = markers();
    let mut sections: [Option<Section>; 4] = [None, None, None, None];
    let mut open: Option<(usize, Section)> = None;
    let mut buffer = String::new();
    while let Some(line) = reader.read_line(&mut buffer) {
        let (text, _) = line?;
        let text = text.trim();
        let line_number = reader.line_number();
        if let Some((slot, mut section)) = open.take() {
            if let Some(cap) = end.captures(text) {
                if cap[1] != section.name {
                    return Err(ParseError::MissingEnd(section.name,
                                                      section.begin_line));
                }
                sections[slot] = Some(section);
            } else if begin.is_match(text) {
                return Err(ParseError::MissingEnd(section.name,
                                                  section.begin_line));
            } else {
                if !text.is_empty() {
                    section.lines.push((line_number, text.to_string()));
                }
                open = Some((slot, section));
            }
            continue;
        }
        let cap = match begin.captures(text) {
            Some(cap) => cap,
            None => continue,
        };
        // sections other than the mesh's, and repeats, are skipped
        let slot = match SECTIONS.iter().position(|s| *s == &cap[1]) {
            Some(slot) if sections[slot].is_none() => slot,
            _ => continue,
        };
        let declared = cap.get(2)
                          .and_then(|c| c.as_str().parse::<usize>().ok())
                          .ok_or_else(|| ParseError::BadHeader(line_number, text.to_string()))?;
        open = Some((slot,
                     Section { name: cap[1].to_string(),
                               declared,
                               begin_line: line_number,
                               lines: Vec::with_capacity(declared) }));
    }
    if let Some((_, section)) = open {
        return Err(ParseError::MissingEnd(section.name, section.begin_line));
    }
    let [vertices, indices, d_i, d_e] = sections;
    let vertices = parse_vertices(entries(vertices, "vertices")?)?;
    let indices = parse_indices(entries(indices, "indices")?)?;
    let d_i = parse_scalars("d_i", entries(d_i, "d_i")?)?;
    let d_e = parse_scalars("d_e", entries(d_e, "d_e")?)?;
    SurfaceMesh::new(vertices, indices, d_i, d_e)
}

fn entries(section: Option<Section>,
           name: &str)
           -> Result<Vec<(usize, String)>, ParseError> {
    section.ok_or_else(|| ParseError::MissingSection(name.to_string()))?
           .entries()
}

/// Reads the first `N` whitespace separated values of a line.
fn columns<T: FromStr, const N: usize>(text: &str) -> Option<[T; N]> {
    let values = text.split_whitespace()
                     .take(N)
                     .map(|s| s.parse::<T>().ok())
                     .collect::<Option<Vec<T>>>()?;
    values.try_into().ok()
}

/// Reads the first `N` values of a line as floats, refusing nan and inf.
fn finite<const N: usize>(text: &str) -> Option<[f64; N]> {
    columns::<f64, N>(text).filter(|v| v.iter().all(|x| x.is_finite()))
}

fn parse_vertices(lines: Vec<(usize, String)>) -> Result<Vec<[f64; 3]>, ParseError> {
    lines.into_iter()
         .map(|(n, text)| {
             finite::<3>(&text).ok_or(ParseError::BadValue(String::from("vertices"),
                                                           n,
                                                           text))
         })
         .collect()
}

fn parse_indices(lines: Vec<(usize, String)>) -> Result<Vec<[usize; 3]>, ParseError> {
    lines.into_iter()
         .map(|(n, text)| {
             columns::<usize, 3>(&text).ok_or(ParseError::BadValue(String::from("indices"),
                                                                   n,
                                                                   text))
         })
         .collect()
}

fn parse_scalars(section: &str,
                 lines: Vec<(usize, String)>)
                 -> Result<Vec<f64>, ParseError> {
    lines.into_iter()
         .map(|(n, text)| {
             finite::<1>(&text).map(|[v]| v)
                               .ok_or(ParseError::BadValue(section.to_string(),
                                                           n,
                                                           text))
         })
         .collect()
}
