use crate::fingerprint::Fingerprint;
use crate::grid::Grid;
use tracing::warn;

/// The bin-wise difference, reference minus probe, of two fingerprints.
#[derive(Clone, Debug, PartialEq)]
pub struct DifferenceMap {
    /// Name of the reference fingerprint.
    pub reference: String,
    /// Name of the probe fingerprint.
    pub probe: String,
    /// The grid of the reference.
    pub grid: Grid,
    /// reference - probe for every bin, in grid index order.
    pub values: Vec<f64>,
}

impl DifferenceMap {
    /// The file name the map is stored under, diff_<reference>_<probe>.dat.
    pub fn file_name(&self) -> String {
        format!("diff_{}_{}.dat", self.reference, self.probe)
    }

    /// The sum of the absolute bin differences.
    pub fn difference_number(&self) -> f64 {
        difference_number(&self.values)
    }
}

/// Whether two fingerprints can be compared bin by bin: the same number of
/// entries starting from the same d_i.
pub fn compare_compatible(a: &Fingerprint, b: &Fingerprint) -> bool {
    a.len() == b.len() && a.min_d_i() == b.min_d_i()
}

/// Subtracts the probe from the reference, None if they aren't compatible.
pub fn diff(reference: &Fingerprint, probe: &Fingerprint) -> Option<DifferenceMap> {
    if !compare_compatible(reference, probe) {
        return None;
    }
    let values = reference.values
                          .iter()
                          .zip(&probe.values)
                          .map(|(r, p)| r - p)
                          .collect();
    Some(DifferenceMap { reference: reference.name.clone(),
                         probe: probe.name.clone(),
                         grid: reference.grid,
                         values })
}

/// The pairs of a round robin tournament over names.
///
/// Names are visited in ascending order; the earliest remaining name is the
/// reference against every later one, then leaves the tournament. Returned
/// as (reference, probe) indices into `names`.
pub fn tournament<S: AsRef<str>>(names: &[S]) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..names.len()).collect();
    order.sort_by(|a, b| names[*a].as_ref().cmp(names[*b].as_ref()));
    let mut pairs = Vec::with_capacity(names.len() * names.len().saturating_sub(1) / 2);
    for (i, reference) in order.iter().enumerate() {
        for probe in order.iter().skip(i + 1) {
            pairs.push((*reference, *probe));
        }
    }
    pairs
}

/// Diffs every unordered pair of fingerprints once, skipping incompatible
/// pairs.
pub fn round_robin(fingerprints: &[Fingerprint]) -> Vec<DifferenceMap> {
    let names = fingerprints.iter().map(|f| f.name.as_str()).collect::<Vec<&str>>();
    tournament(&names).into_iter()
                      .filter_map(|(r, p)| {
                          let map = diff(&fingerprints[r], &fingerprints[p]);
                          if map.is_none() {
                              warn!("Skipping incompatible fingerprints {} and {}.",
                                    fingerprints[r].name,
                                    fingerprints[p].name);
                          }
                          map
                      })
                      .collect()
}

/// The difference number: the sum of the absolute values of a map.
pub fn difference_number(values: &[f64]) -> f64 {
    values.iter().map(|v| v.abs()).sum()
}
