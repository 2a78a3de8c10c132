use crate::area::AreaMethod;
use crate::errors::EmptySurfaceError;
use crate::grid::Grid;
use crate::io::dat::GridData;
use crate::mesh::{SurfaceMesh, Triangle};
use crate::utils;
use rustc_hash::FxHashMap;

/// Accounting of how the triangles of a mesh were binned.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BinStats {
    /// Triangles offered to the binner.
    pub triangles: usize,
    /// Triangles rejected by the area method.
    pub degenerate: usize,
    /// Triangles whose mean (d_i, d_e) falls off the grid.
    pub out_of_range: usize,
    /// Bins holding a non-zero area.
    pub populated: usize,
    /// The raw surface area of every binned triangle.
    pub integral_area: f64,
}

/// Accumulates triangle areas into quantized (d_i, d_e) bins.
///
/// Each triangle puts its whole area into the one bin holding its mean
/// (d_i, d_e) rounded to two decimals.
pub struct Binner {
    grid: Grid,
    method: AreaMethod,
    bins: FxHashMap<(i32, i32), f64>,
    triangles: usize,
    degenerate: usize,
    out_of_range: usize,
}

impl Binner {
    /// Creates an empty binner for the grid.
    pub fn new(grid: Grid, method: AreaMethod) -> Self {
        Self { grid,
               method,
               bins: FxHashMap::default(),
               triangles: 0,
               degenerate: 0,
               out_of_range: 0 }
    }

    /// Adds a triangle to its bin.
    pub fn add(&mut self, triangle: &Triangle) {
        self.triangles += 1;
        let area = match triangle.area(self.method) {
            Some(a) => a,
            None => {
                self.degenerate += 1;
                return;
            }
        };
        let key = (utils::quantize(triangle.d_i), utils::quantize(triangle.d_e));
        if self.grid.index(key).is_none() {
            self.out_of_range += 1;
            return;
        }
        *self.bins.entry(key).or_insert(0.0) += area;
    }

    /// Normalises the bins to a percentage of the integral area and spreads
    /// them over the full grid.
    pub fn finish(self, name: String) -> Result<Fingerprint, EmptySurfaceError> {
        let integral_area = self.bins.values().sum::<f64>();
        if integral_area <= 0.0 {
            return Err(EmptySurfaceError { triangles: self.triangles,
                                           degenerate: self.degenerate,
                                           out_of_range: self.out_of_range });
        }
        let mut values = vec![0f64; self.grid.len()];
        let mut populated = 0;
        for (key, area) in self.bins.iter() {
            // every key was checked against the grid in add
            if let Some(i) = self.grid.index(*key) {
                values[i] += area / integral_area * 100.0;
                if *area > 0.0 {
                    populated += 1;
                }
            }
        }
        let stats = BinStats { triangles: self.triangles,
                               degenerate: self.degenerate,
                               out_of_range: self.out_of_range,
                               populated,
                               integral_area };
        Ok(Fingerprint { name,
                         grid: self.grid,
                         values,
                         stats: Some(stats) })
    }
}

/// Bins a stream of triangles into a fingerprint.
pub fn bin(name: String,
           triangles: impl IntoIterator<Item = Triangle>,
           method: AreaMethod,
           grid: Grid)
           -> Result<Fingerprint, EmptySurfaceError> {
    let mut binner = Binner::new(grid, method);
    triangles.into_iter().for_each(|t| binner.add(&t));
    binner.finish(name)
}

/// A normalised 2D histogram of surface area over (d_i, d_e) that sums to
/// 100 across the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Fingerprint {
    /// Identifier of the source, the stem of the mesh or .dat file.
    pub name: String,
    /// The grid the values are laid out on.
    pub grid: Grid,
    /// Percentage of the surface area in each bin, in grid index order.
    pub values: Vec<f64>,
    /// Binning accounting, None when read back from a .dat file.
    pub stats: Option<BinStats>,
}

impl Fingerprint {
    /// Computes the fingerprint of a mesh.
    pub fn from_mesh(name: String,
                     mesh: &SurfaceMesh,
                     method: AreaMethod,
                     grid: Grid)
                     -> Result<Self, EmptySurfaceError> {
        bin(name, mesh.triangles(), method, grid)
    }

    /// Rebuilds a fingerprint from a persisted map.
    pub fn from_dat(name: String, data: GridData) -> Self {
        Self { name,
               grid: data.grid,
               values: data.values,
               stats: None }
    }

    /// Number of entries, populated or not.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the fingerprint has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The smallest d_i of the grid in hundredths.
    pub fn min_d_i(&self) -> i32 {
        self.grid.d_i[0]
    }

    /// The value of a bin, None if the key is off the grid.
    pub fn value(&self, key: (i32, i32)) -> Option<f64> {
        self.grid.index(key).map(|i| self.values[i])
    }

    /// The raw surface area, if known.
    pub fn integral_area(&self) -> Option<f64> {
        self.stats.map(|s| s.integral_area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridRange;
    use crate::utils::mean3;

    fn triangle(d_i: f64, d_e: f64, scale: f64) -> Triangle {
        Triangle { points: [[0., 0., 0.], [scale, 0., 0.], [0., scale, 0.]],
                   d_i,
                   d_e }
    }

    #[test]
    fn binner_single_triangle() {
        let fp = bin(String::from("one"),
                     vec![triangle(1.0, 1.0, 1.0)],
                     AreaMethod::Heron,
                     GridRange::Extended.grid()).unwrap();
        assert_eq!(fp.len(), 68121);
        assert_eq!(fp.value((100, 100)), Some(100.0));
        let stats = fp.stats.unwrap();
        assert!((stats.integral_area - 0.5).abs() < 1E-12);
        assert_eq!(stats.populated, 1);
        assert_eq!(fp.values.iter().filter(|v| **v != 0.0).count(), 1);
    }

    #[test]
    fn binner_shared_bin_sums() {
        let fp = bin(String::from("shared"),
                     vec![triangle(1.001, 2.0, 1.0),
                          triangle(0.999, 2.0, 1.0),
                          triangle(1.5, 2.0, 2.0)],
                     AreaMethod::Kahan,
                     GridRange::Extended.grid()).unwrap();
        // 0.5 + 0.5 in (1.00, 2.00) and 2.0 in (1.50, 2.00)
        assert!((fp.value((100, 200)).unwrap() - 100.0 / 3.0).abs() < 1E-9);
        assert!((fp.value((150, 200)).unwrap() - 200.0 / 3.0).abs() < 1E-9);
        assert_eq!(fp.stats.unwrap().populated, 2);
    }

    #[test]
    fn binner_follows_decimal_rounding() {
        // mean d_i of 1.825 is stored just below the tie
        let fp = bin(String::from("tie"),
                     vec![triangle(mean3([2.1184, 2.6218, 0.7348]), 1.0, 1.0)],
                     AreaMethod::Kahan,
                     GridRange::Extended.grid()).unwrap();
        assert_eq!(fp.value((182, 100)), Some(100.0));
        assert_eq!(fp.value((183, 100)), Some(0.0));
    }

    #[test]
    fn binner_degenerate_excluded() {
        let flat = Triangle { points: [[0., 0., 0.], [1., 0., 0.], [2., 0., 0.]],
                              d_i: 1.2,
                              d_e: 1.2 };
        let fp = bin(String::from("flat"),
                     vec![flat, triangle(1.0, 1.0, 1.0)],
                     AreaMethod::Trigonometric,
                     GridRange::Extended.grid()).unwrap();
        assert_eq!(fp.value((120, 120)), Some(0.0));
        assert_eq!(fp.value((100, 100)), Some(100.0));
        assert_eq!(fp.stats.unwrap().degenerate, 1);
    }

    #[test]
    fn binner_out_of_range_excluded() {
        let fp = bin(String::from("far"),
                     vec![triangle(3.2, 1.0, 1.0), triangle(1.0, 1.0, 1.0)],
                     AreaMethod::Kahan,
                     GridRange::Extended.grid()).unwrap();
        assert_eq!(fp.value((100, 100)), Some(100.0));
        assert_eq!(fp.stats.unwrap().out_of_range, 1);
    }

    #[test]
    fn binner_empty_surface() {
        let err = bin(String::from("none"),
                      Vec::new(),
                      AreaMethod::Kahan,
                      GridRange::Extended.grid()).unwrap_err();
        assert_eq!(err.triangles, 0)
    }

    #[test]
    fn binner_all_degenerate_is_empty() {
        let flat = Triangle { points: [[0., 0., 0.], [1., 0., 0.], [2., 0., 0.]],
                              d_i: 1.2,
                              d_e: 1.2 };
        let err = bin(String::from("flat"),
                      vec![flat],
                      AreaMethod::Kahan,
                      GridRange::Extended.grid()).unwrap_err();
        assert_eq!(err.triangles, 1);
        assert_eq!(err.degenerate, 0);
    }

    #[test]
    fn fingerprint_sums_to_hundred() {
        let triangles = (0..500).map(|i| {
                                    let x = i as f64;
                                    triangle(0.4 + (x * 0.37) % 2.6,
                                             0.4 + (x * 0.91) % 2.6,
                                             1.0 + (x % 7.0))
                                });
        let fp = bin(String::from("many"),
                     triangles,
                     AreaMethod::Kahan,
                     GridRange::Extended.grid()).unwrap();
        assert_eq!(fp.len(), 68121);
        assert!((fp.values.iter().sum::<f64>() - 100.0).abs() < 1E-6);
    }
}
