use anyhow::{bail, Context, Result};
use hirshfeld::arguments::{Args, ClapApp, Task};
use hirshfeld::batch::{self, Batch, DifferenceFile, Settings};
use hirshfeld::fingerprint::Fingerprint;
use hirshfeld::io::output;
use std::fs;
use std::path::PathBuf;

/// Moves the failed and cancelled units of a batch into `failures` and
/// returns the results of the rest.
fn absorb<R>(batch: Batch<R>, failures: &mut Vec<(String, String)>) -> Vec<R> {
    failures.extend(batch.failures);
    failures.extend(batch.cancelled
                         .into_iter()
                         .map(|name| (name, String::from("Cancelled."))));
    batch.done
}

fn fingerprints(files: &[PathBuf],
                settings: &Settings,
                failures: &mut Vec<(String, String)>)
                -> Result<Vec<Fingerprint>> {
    let batch = batch::fingerprint_files(files, settings)?;
    Ok(absorb(batch, failures).into_iter()
                               .map(|f| {
                                   println!("{}", f.report);
                                   f.fingerprint
                               })
                               .collect())
}

fn differences(fingerprints: &[Fingerprint],
               settings: &Settings,
               failures: &mut Vec<(String, String)>)
               -> Result<Vec<(String, f64)>> {
    let batch = batch::difference_maps(fingerprints, settings)?;
    Ok(absorb(batch, failures).into_iter()
                               .map(|DifferenceFile { name,
                                                      difference_number,
                                                      .. }| {
                                   println!("{}", output::number_line(&name, difference_number));
                                   (name, difference_number)
                               })
                               .collect())
}

fn output_directory(settings: &Settings) -> Result<()> {
    fs::create_dir_all(&settings.output).with_context(|| {
                                           format!("Unable to create output directory {}",
                                                   settings.output.display())
                                       })
}

fn main() -> Result<()> {
    // argument parsing
    let app = ClapApp::get();
    let args = Args::new(app.get_matches());
    tracing_subscriber::fmt().with_max_level(args.verbosity.level())
                             .with_writer(std::io::stderr)
                             .init();
    // print splash
    println!("Hirshfeld Surface Fingerprints ({})",
             env!("CARGO_PKG_VERSION"));
    println!("Running on {} threads.", args.threads);
    let settings = args.settings();
    let mut failures = vec![];
    let numbers = match &args.task {
        Task::Fingerprint(files) => {
            output_directory(&settings)?;
            fingerprints(files, &settings, &mut failures)?;
            vec![]
        }
        Task::Diff(files) => {
            output_directory(&settings)?;
            let batch = batch::read_fingerprints(files, &settings)?;
            let fingerprints = absorb(batch, &mut failures);
            differences(&fingerprints, &settings, &mut failures)?
        }
        Task::Number(files) => {
            let batch = batch::difference_numbers(files, &settings)?;
            let numbers = absorb(batch, &mut failures);
            numbers.iter()
                   .for_each(|(name, number)| println!("{}", output::number_line(name, *number)));
            numbers
        }
        Task::Run(files) => {
            output_directory(&settings)?;
            let fingerprints = fingerprints(files, &settings, &mut failures)?;
            if failures.is_empty() || !settings.fail_fast {
                differences(&fingerprints, &settings, &mut failures)?
            } else {
                vec![]
            }
        }
    };
    print!("{}", output::summary(&numbers, &failures));
    if !failures.is_empty() {
        bail!("{} of the units of work did not complete.", failures.len());
    }
    Ok(())
}
