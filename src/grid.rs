use std::fmt;
use std::str::FromStr;

/// The map ranges offered for fingerprints, all with a step of 0.01.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridRange {
    /// d_i, d_e in 0.40..=2.60.
    Standard,
    /// d_i, d_e in 0.80..=3.00.
    Translated,
    /// d_i, d_e in 0.40..=3.00.
    Extended,
}

impl GridRange {
    /// The inclusive bounds of both axes in hundredths.
    pub fn bounds(&self) -> [i32; 2] {
        match self {
            Self::Standard => [40, 260],
            Self::Translated => [80, 300],
            Self::Extended => [40, 300],
        }
    }

    /// The square grid covering this range.
    pub fn grid(&self) -> Grid {
        let bounds = self.bounds();
        Grid::new(bounds, bounds)
    }
}

impl Default for GridRange {
    fn default() -> Self {
        Self::Extended
    }
}

impl fmt::Display for GridRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Standard => "standard",
            Self::Translated => "translated",
            Self::Extended => "extended",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for GridRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "translated" => Ok(Self::Translated),
            "extended" => Ok(Self::Extended),
            _ => Err(format!("Unknown grid range \"{}\".", s)),
        }
    }
}

/// A dense (d_i, d_e) grid with a step of 0.01, coordinates held as integer
/// hundredths. Bins are laid out with d_i as the slow axis so that the dense
/// index order is the ascending (d_i, d_e) order of the .dat files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    /// Inclusive [min, max] of d_i in hundredths.
    pub d_i: [i32; 2],
    /// Inclusive [min, max] of d_e in hundredths.
    pub d_e: [i32; 2],
}

impl Grid {
    /// Initialises a grid from the inclusive bounds of each axis.
    pub fn new(d_i: [i32; 2], d_e: [i32; 2]) -> Self {
        Self { d_i, d_e }
    }

    /// Number of d_i columns.
    pub fn d_i_len(&self) -> usize {
        (self.d_i[1] - self.d_i[0] + 1).max(0) as usize
    }

    /// Number of d_e rows.
    pub fn d_e_len(&self) -> usize {
        (self.d_e[1] - self.d_e[0] + 1).max(0) as usize
    }

    /// Total number of bins.
    pub fn len(&self) -> usize {
        self.d_i_len() * self.d_e_len()
    }

    /// Whether the grid has no bins.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The dense index of a quantized (d_i, d_e) key, None if off the grid.
    pub fn index(&self, key: (i32, i32)) -> Option<usize> {
        let (d_i, d_e) = key;
        if d_i < self.d_i[0]
           || d_i > self.d_i[1]
           || d_e < self.d_e[0]
           || d_e > self.d_e[1]
        {
            return None;
        }
        let i = (d_i - self.d_i[0]) as usize;
        let e = (d_e - self.d_e[0]) as usize;
        Some(i * self.d_e_len() + e)
    }

    /// The quantized (d_i, d_e) key of a dense index.
    pub fn key(&self, index: usize) -> (i32, i32) {
        let d_e_len = self.d_e_len();
        (self.d_i[0] + (index / d_e_len) as i32,
         self.d_e[0] + (index % d_e_len) as i32)
    }

    /// Iterates over every key in dense index order.
    pub fn keys(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.len()).map(move |i| self.key(i))
    }
}
