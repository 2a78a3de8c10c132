use crate::area::AreaMethod;
use crate::difference::{self, DifferenceMap};
use crate::errors::FingerprintError;
use crate::fingerprint::Fingerprint;
use crate::grid::{Grid, GridRange};
use crate::io::{self, output};
use crate::pool::{self, Cancel, Outcome};
use crate::progress::Bar;
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How a batch is run.
#[derive(Clone, Debug)]
pub struct Settings {
    /// The triangle area formula.
    pub method: AreaMethod,
    /// The histogram range fingerprints are binned onto.
    pub grid: Grid,
    /// Directory the .dat files are written to.
    pub output: PathBuf,
    /// Number of workers, already resolved from 0.
    pub threads: usize,
    /// Cancel every queued unit after the first failure.
    pub fail_fast: bool,
    /// Draw progress bars to stderr.
    pub progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { method: AreaMethod::default(),
               grid: GridRange::default().grid(),
               output: PathBuf::from("."),
               threads: 1,
               fail_fast: false,
               progress: false }
    }
}

/// What a batch achieved: the results of the units that succeeded, in input
/// order, and the names of the units that did not.
#[derive(Debug)]
pub struct Batch<R> {
    pub done: Vec<R>,
    /// (file, reason) for every failed unit.
    pub failures: Vec<(String, String)>,
    /// Units that never ran because the batch was cancelled.
    pub cancelled: Vec<String>,
}

impl<R> Batch<R> {
    fn new() -> Self {
        Self { done: vec![],
               failures: vec![],
               cancelled: vec![] }
    }

    /// Whether every unit ran and succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.cancelled.is_empty()
    }
}

/// A fingerprint written to disk along with its report.
#[derive(Debug)]
pub struct FingerprintFile {
    pub fingerprint: Fingerprint,
    /// Where the .dat was written.
    pub path: PathBuf,
    /// The per-mesh report for the terminal.
    pub report: String,
}

/// A difference map written to disk, the map itself is dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct DifferenceFile {
    /// The file name, diff_<reference>_<probe>.dat.
    pub name: String,
    pub path: PathBuf,
    pub difference_number: f64,
}

/// The stem of a path, used as the identifier of its fingerprint.
pub fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Splits off every path whose stem was already taken by an earlier path,
/// as a (file, reason) failure, since both would claim the same identifier
/// and the same output file.
fn unique_stems(paths: &[PathBuf]) -> (Vec<PathBuf>, Vec<(String, String)>) {
    let mut seen = FxHashMap::<String, &PathBuf>::default();
    let mut unique = Vec::with_capacity(paths.len());
    let mut duplicates = vec![];
    for path in paths {
        let name = stem(path);
        match seen.get(&name) {
            Some(first) => {
                let reason = format!("Identifier {} is already taken by {}.",
                                     name,
                                     first.display());
                warn!("Skipping {}: {}", path.display(), reason);
                duplicates.push((path.display().to_string(), reason));
            }
            None => {
                seen.insert(name, path);
                unique.push(path.clone());
            }
        }
    }
    (unique, duplicates)
}

/// Runs the units over the paths with unique stems and adds the duplicates
/// to the failures. Under fail fast a duplicate cancels the whole batch.
fn run_unique<R, F>(paths: &[PathBuf],
                    settings: &Settings,
                    prefix: &str,
                    f: F)
                    -> Result<Batch<R>>
    where R: Send,
          F: Fn(&PathBuf) -> Result<R> + Sync
{
    let (unique, duplicates) = unique_stems(paths);
    let mut batch = if settings.fail_fast && !duplicates.is_empty() {
        let mut batch = Batch::new();
        batch.cancelled = unique.iter().map(|p| p.display().to_string()).collect();
        batch
    } else {
        run_units(&unique, settings, prefix, |p| p.display().to_string(), f)?
    };
    batch.failures.extend(duplicates);
    Ok(batch)
}

/// Runs `f` over the items in the pool, logging each failure and cancelling
/// the rest of the batch on the first one when asked to.
fn run_units<T, R, N, F>(items: &[T],
                         settings: &Settings,
                         prefix: &str,
                         name: N,
                         f: F)
                         -> Result<Batch<R>>
    where T: Sync,
          R: Send,
          N: Fn(&T) -> String,
          F: Fn(&T) -> Result<R> + Sync
{
    let cancel = Cancel::new();
    let pbar = if settings.progress {
        Bar::visible(items.len() as u64, String::from(prefix))
    } else {
        Bar::new(items.len() as u64, String::from(prefix))
    };
    let outcomes = pool::run(items, settings.threads, &cancel, &pbar, |item| {
                       let result = f(item);
                       if let Err(e) = &result {
                           warn!("{:#}", e);
                           if settings.fail_fast {
                               cancel.cancel();
                           }
                       }
                       result
                   })?;
    drop(pbar);
    let mut batch = Batch::new();
    for (item, outcome) in items.iter().zip(outcomes) {
        match outcome {
            Outcome::Done(Ok(r)) => batch.done.push(r),
            Outcome::Done(Err(e)) => batch.failures.push((name(item), format!("{:#}", e))),
            Outcome::Cancelled => batch.cancelled.push(name(item)),
        }
    }
    if !batch.cancelled.is_empty() {
        warn!("{} units cancelled after a failure.", batch.cancelled.len());
    }
    Ok(batch)
}

/// Reads a mesh, bins it and writes <stem>.dat into the output directory.
pub fn fingerprint_file(path: &Path,
                        settings: &Settings)
                        -> Result<FingerprintFile, FingerprintError> {
    let name = stem(path);
    let mesh = io::cxs::read(path)?;
    debug!("{}: {} vertices, {} triangles",
           name,
           mesh.vertices.len(),
           mesh.indices.len());
    let fingerprint =
        Fingerprint::from_mesh(name.clone(), &mesh, settings.method, settings.grid)?;
    let stats = fingerprint.stats.unwrap_or_default();
    let report = output::mesh_report(&file_name(path), &mesh, &stats);
    let out = settings.output.join(format!("{}.dat", name));
    io::dat::write(&out, &fingerprint.grid, &fingerprint.values)?;
    info!("Wrote {}", out.display());
    Ok(FingerprintFile { fingerprint,
                         path: out,
                         report })
}

/// Fingerprints every mesh.
///
/// Meshes sharing a stem would write the same <stem>.dat, so only the first
/// of them runs and the rest fail.
pub fn fingerprint_files(paths: &[PathBuf],
                         settings: &Settings)
                         -> Result<Batch<FingerprintFile>> {
    run_unique(paths, settings, "Fingerprints: ", |p| {
        fingerprint_file(p, settings).with_context(|| {
                                         format!("Failed to fingerprint {}", p.display())
                                     })
    })
}

/// Whether a path names a difference map written by [write_difference].
pub fn is_difference_map(path: &Path) -> bool {
    stem(path).starts_with("diff_")
}

/// Reads persisted fingerprints back, named after their file stems.
///
/// Difference maps are skipped with a warning, so a glob over an output
/// directory only picks up the fingerprints. Repeated stems fail as in
/// [fingerprint_files].
pub fn read_fingerprints(paths: &[PathBuf], settings: &Settings) -> Result<Batch<Fingerprint>> {
    let paths = paths.iter()
                     .filter(|p| {
                         let map = is_difference_map(p);
                         if map {
                             warn!("Skipping difference map {}.", p.display());
                         }
                         !map
                     })
                     .cloned()
                     .collect::<Vec<PathBuf>>();
    run_unique(&paths, settings, "Reading: ", |p| {
        let data = io::dat::read(p).with_context(|| {
                                       format!("Failed to read fingerprint {}", p.display())
                                   })?;
        Ok(Fingerprint::from_dat(stem(p), data))
    })
}

/// Writes a difference map into the output directory.
pub fn write_difference(map: &DifferenceMap, settings: &Settings) -> Result<DifferenceFile> {
    let name = map.file_name();
    let path = settings.output.join(&name);
    io::dat::write(&path, &map.grid, &map.values)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(DifferenceFile { name,
                        path,
                        difference_number: map.difference_number() })
}

/// Diffs every pair of fingerprints once, as a round robin over their names,
/// and writes each map.
///
/// Incompatible pairs are skipped with a warning and are not failures.
pub fn difference_maps(fingerprints: &[Fingerprint],
                       settings: &Settings)
                       -> Result<Batch<DifferenceFile>> {
    let names = fingerprints.iter().map(|f| f.name.as_str()).collect::<Vec<&str>>();
    let pairs = difference::tournament(&names);
    let batch = run_units(&pairs,
                          settings,
                          "Difference maps: ",
                          |(r, p)| format!("diff_{}_{}.dat", names[*r], names[*p]),
                          |(r, p)| {
                              let (reference, probe) = (&fingerprints[*r], &fingerprints[*p]);
                              match difference::diff(reference, probe) {
                                  Some(map) => write_difference(&map, settings).map(Some),
                                  None => {
                                      warn!("Skipping incompatible fingerprints {} and {}.",
                                            reference.name,
                                            probe.name);
                                      Ok(None)
                                  }
                              }
                          })?;
    Ok(Batch { done: batch.done.into_iter().flatten().collect(),
               failures: batch.failures,
               cancelled: batch.cancelled })
}

/// Sums |value| over each persisted difference map.
pub fn difference_numbers(paths: &[PathBuf], settings: &Settings) -> Result<Batch<(String, f64)>> {
    run_units(paths,
              settings,
              "Difference numbers: ",
              |p| p.display().to_string(),
              |p| {
                  let data = io::dat::read(p).with_context(|| {
                                                 format!("Failed to read difference map {}",
                                                         p.display())
                                             })?;
                  Ok((file_name(p), difference::difference_number(&data.values)))
              })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_stem() {
        assert_eq!(stem(Path::new("dir/form_a.cxs")), "form_a");
        assert_eq!(stem(Path::new("form_b")), "form_b");
        assert_eq!(file_name(Path::new("dir/diff_a_b.dat")), "diff_a_b.dat");
    }

    #[test]
    fn batch_unique_stems() {
        let paths = vec![PathBuf::from("a/form.cxs"),
                         PathBuf::from("b/form.cxs"),
                         PathBuf::from("a/other.cxs"),
                         PathBuf::from("c/form.dat")];
        let (unique, duplicates) = unique_stems(&paths);
        assert_eq!(unique, vec![PathBuf::from("a/form.cxs"), PathBuf::from("a/other.cxs")]);
        assert_eq!(duplicates.len(), 2);
        assert_eq!(duplicates[0].0, Path::new("b/form.cxs").display().to_string());
        assert!(duplicates[0].1.contains("form"));
        assert!(duplicates[1].1.contains(&Path::new("a/form.cxs").display().to_string()));
    }

    #[test]
    fn batch_is_difference_map() {
        assert!(is_difference_map(Path::new("out/diff_a_b.dat")));
        assert!(!is_difference_map(Path::new("out/form_a.dat")));
        assert!(!is_difference_map(Path::new("out/different.dat")));
    }

    #[test]
    fn batch_duplicate_stem_fail_fast_cancels() {
        let settings = Settings { fail_fast: true,
                                  ..Settings::default() };
        let paths = vec![PathBuf::from("a/form.cxs"), PathBuf::from("b/form.cxs")];
        let batch = fingerprint_files(&paths, &settings).unwrap();
        assert!(batch.done.is_empty());
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.cancelled, vec![Path::new("a/form.cxs").display().to_string()]);
    }

    #[test]
    fn batch_missing_files_fail() {
        let settings = Settings::default();
        let paths = vec![PathBuf::from("tests/cxs/does_not_exist.cxs")];
        let batch = fingerprint_files(&paths, &settings).unwrap();
        assert!(batch.done.is_empty());
        assert_eq!(batch.failures.len(), 1);
        assert!(batch.failures[0].1.contains("does_not_exist.cxs"));
        assert!(!batch.is_success());
    }

    #[test]
    fn batch_fail_fast_cancels() {
        let settings = Settings { fail_fast: true,
                                  ..Settings::default() };
        let paths = vec![PathBuf::from("missing_a.dat"),
                         PathBuf::from("missing_b.dat"),
                         PathBuf::from("missing_c.dat")];
        let batch = difference_numbers(&paths, &settings).unwrap();
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.cancelled, vec!["missing_b.dat", "missing_c.dat"]);
    }
}
