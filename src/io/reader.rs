use std::fs::File;
use std::io::{self, prelude::*};
use std::path::Path;

/// Reads a file line by line into a reusable buffer, counting lines.
pub struct BufReader<R = File> {
    reader: io::BufReader<R>,
    line_number: usize,
}

impl BufReader<File> {
    /// Opens the file from the path into a reader
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> BufReader<R> {
    /// Wraps any reader.
    pub fn new(inner: R) -> Self {
        Self { reader: io::BufReader::new(inner),
               line_number: 0 }
    }

    /// The 1-based number of the line last read.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads a line from the buffer reader to mutable string
    pub fn read_line<'buf>(&mut self,
                           buffer: &'buf mut String)
                           -> Option<io::Result<(&'buf mut String, usize)>>
    {
        buffer.clear();
        let line = self.reader
                       .read_line(buffer)
                       .map(|u| if u == 0 { None } else { Some((buffer, u)) })
                       .transpose();
        if let Some(Ok(_)) = line {
            self.line_number += 1;
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_counts_lines() {
        let mut reader = BufReader::new("one\ntwo\n\nfour".as_bytes());
        let mut buffer = String::new();
        let mut lines = vec![];
        while let Some(line) = reader.read_line(&mut buffer) {
            let (text, _) = line.unwrap();
            lines.push(text.trim_end().to_string());
        }
        assert_eq!(lines, vec!["one", "two", "", "four"]);
        assert_eq!(reader.line_number(), 4);
    }
}
