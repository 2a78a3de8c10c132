use crate::area::AreaMethod;
use crate::batch::Settings;
use crate::grid::GridRange;
use clap::{crate_authors, value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing::Level;

/// What the program has been asked to do and on which files.
#[derive(Clone, Debug, PartialEq)]
pub enum Task {
    /// Write a fingerprint for each mesh.
    Fingerprint(Vec<PathBuf>),
    /// Write a difference map for each pair of fingerprints.
    Diff(Vec<PathBuf>),
    /// Report the difference number of each difference map.
    Number(Vec<PathBuf>),
    /// Fingerprint the meshes, diff every pair and report the numbers.
    Run(Vec<PathBuf>),
}

/// How much diagnostic logging reaches stderr.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verbosity {
    Warn,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    /// The most detailed level that is logged.
    pub fn level(&self) -> Level {
        match self {
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Create a container for dealing with clap and being able to test arg parsing
pub struct ClapApp;

impl ClapApp {
    /// Create and return the clap::Command
    pub fn get() -> Command {
        Command::new("Hirshfeld Surface Fingerprints")
            .author(crate_authors!())
            .version(env!("CARGO_PKG_VERSION"))
            .about("Normalised 2D Hirshfeld surface fingerprints and their difference maps.")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(Arg::new("threads")
                .short('J')
                .long("threads")
                .global(true)
                .value_parser(value_parser!(usize))
                .default_value("0")
                .help("Number of threads to distribute the work over.")
                .long_help(
"The number of threads to be used by the program. A default value of 0 is used
to allow the program to best decide how to use the available hardware. Each mesh
and each pair of fingerprints is a single unit of work."))
            .arg(Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Log more to stderr, repeat for more detail."))
            .arg(Arg::new("fail fast")
                .long("fail-fast")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Stop starting new files after the first failure.")
                .long_help(
"By default a file that cannot be processed is reported and the remaining files
are still processed. With this flag any file not yet started when the first
failure occurs is skipped."))
            .subcommand(Command::new("fingerprint")
                .about("Write a normalised 2D fingerprint <stem>.dat for each mesh.")
                .arg(files("mesh", "CrystalExplorer .cxs surface files."))
                .arg(method())
                .arg(grid())
                .arg(output()))
            .subcommand(Command::new("diff")
                .about("Write diff_<reference>_<probe>.dat for each pair of fingerprints.")
                .long_about("Write diff_<reference>_<probe>.dat for each pair of fingerprints. \
                             Inputs named diff_*.dat are earlier difference maps and are \
                             skipped with a warning, so the output directory can be globbed.")
                .arg(files("fingerprint", "Fingerprint .dat files, diff_*.dat is skipped."))
                .arg(output()))
            .subcommand(Command::new("number")
                .about("Report the difference number of each difference map.")
                .arg(files("difference map", "Difference map .dat files.")))
            .subcommand(Command::new("run")
                .about("Fingerprint, diff and number a set of meshes in one go.")
                .arg(files("mesh", "CrystalExplorer .cxs surface files."))
                .arg(method())
                .arg(grid())
                .arg(output()))
    }
}

fn files(name: &'static str, help: &'static str) -> Arg {
    Arg::new("files")
        .value_name(name)
        .required(true)
        .num_args(1..)
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

fn method() -> Arg {
    Arg::new("method")
        .short('m')
        .long("method")
        .value_parser(["kahan", "heron", "trigonometric"])
        .default_value("kahan")
        .help("Formula for the area of each triangle.")
        .long_help(
"Kahan's formula is stable for needle shaped triangles and keeps every triangle
that exists. Heron's formula and the trigonometric formula skip triangles with a
side shorter than 1E-4, the latter also skips nearly collinear triangles.")
}

fn grid() -> Arg {
    Arg::new("grid")
        .short('g')
        .long("grid")
        .value_parser(["standard", "translated", "extended"])
        .default_value("extended")
        .help("The (d_i, d_e) range of the fingerprint.")
        .long_help(
"Standard covers 0.40 to 2.60, translated 0.80 to 3.00 and extended 0.40 to 3.00
on both axes, in steps of 0.01. Only fingerprints on the same grid can be diffed.")
}

fn output() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_parser(value_parser!(PathBuf))
        .default_value(".")
        .help("Directory to write the .dat files to.")
}

/// Holds the arguments passed to the program from the command-line
pub struct Args {
    pub task: Task,
    pub method: AreaMethod,
    pub grid: GridRange,
    pub output: PathBuf,
    pub threads: usize,
    pub fail_fast: bool,
    pub verbosity: Verbosity,
}

impl Args {
    /// Initialises the structure from the command-line arguments.
    pub fn new(arguments: ArgMatches) -> Self {
        let (name, sub) = match arguments.subcommand() {
            Some((name, sub)) => (name, sub.clone()),
            None => ("", arguments.clone()),
        };
        let files = sub.get_many::<PathBuf>("files")
                       .map(|f| f.cloned().collect())
                       .unwrap_or_default();
        let task = match name {
            "diff" => Task::Diff(files),
            "number" => Task::Number(files),
            "run" => Task::Run(files),
            _ => Task::Fingerprint(files),
        };
        // the choices are restricted by clap so these always parse
        let method = sub.try_get_one::<String>("method")
                        .ok()
                        .flatten()
                        .and_then(|m| m.parse::<AreaMethod>().ok())
                        .unwrap_or_default();
        let grid = sub.try_get_one::<String>("grid")
                      .ok()
                      .flatten()
                      .and_then(|g| g.parse::<GridRange>().ok())
                      .unwrap_or_default();
        let output = sub.try_get_one::<PathBuf>("output")
                        .ok()
                        .flatten()
                        .cloned()
                        .unwrap_or_else(|| PathBuf::from("."));
        let threads = match sub.get_one::<usize>("threads").copied() {
            Some(0) | None => num_cpus::get(),
            Some(x) => x,
        };
        let verbosity = match sub.get_count("verbose") {
            0 => Verbosity::Warn,
            1 => Verbosity::Info,
            2 => Verbosity::Debug,
            _ => Verbosity::Trace,
        };
        let fail_fast = sub.get_flag("fail fast");
        Self { task,
               method,
               grid,
               output,
               threads,
               fail_fast,
               verbosity }
    }

    /// The batch settings these arguments describe.
    pub fn settings(&self) -> Settings {
        Settings { method: self.method,
                   grid: self.grid.grid(),
                   output: self.output.clone(),
                   threads: self.threads,
                   fail_fast: self.fail_fast,
                   progress: true }
    }
}
