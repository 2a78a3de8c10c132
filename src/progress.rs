use atomic_counter::{AtomicCounter, RelaxedCounter};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Milliseconds between redraws of the bar.
const REFRESH_RATE: u64 = 100;

/// Progress of one batch stage, counted in finished units.
///
/// A unit is one mesh, one pair of fingerprints or one difference map. The
/// pool workers call [tick](Bar::tick) once per unit whether it succeeded or
/// failed, cancelled units are never ticked. Ticking only bumps a relaxed
/// counter, a background thread copies it onto the indicatif bar every
/// [REFRESH_RATE] milliseconds until the Bar is dropped.
///
/// Library callers get a hidden bar from [new](Bar::new) so nothing is drawn
/// while tests and embedding code still see [position](Bar::position). The
/// binary uses [visible](Bar::visible) when progress is enabled.
pub struct Bar {
    counter: Arc<RelaxedCounter>,
    /// The indicatif bar, shared with the redraw thread.
    pub pbar: Arc<ProgressBar>,
}

impl Bar {
    /// Creates a hidden Bar for a stage of `units` units, labelled with
    /// `stage`, e.g. "Fingerprints: ".
    pub fn new(units: u64, stage: String) -> Self {
        let pbar = Arc::new(ProgressBar::hidden());
        pbar.set_length(units);
        pbar.set_prefix(stage);
        pbar.set_style(ProgressStyle::default_bar()
            .template("{prefix}[{bar:40}] {pos}/{len} units [{elapsed_precise}]")
            .progress_chars("=>-"));
        let counter = Arc::new(RelaxedCounter::new(0));
        let (redraw, finished) = (pbar.clone(), counter.clone());
        // stops once the Bar, the only other owner of the counter, is gone
        thread::spawn(move || {
            while Arc::strong_count(&finished) > 1 && !redraw.is_finished() {
                redraw.set_position(finished.get() as u64);
                thread::sleep(Duration::from_millis(REFRESH_RATE));
            }
        });
        Self { counter, pbar }
    }

    /// Starts drawing the Bar to stderr.
    pub fn display(&self) {
        self.pbar.set_draw_target(ProgressDrawTarget::stderr())
    }

    /// Creates a Bar drawn to stderr, for the binary.
    pub fn visible(units: u64, stage: String) -> Self {
        let bar = Self::new(units, stage);
        bar.display();
        bar
    }

    /// Marks one unit as finished, safe to call from any worker.
    pub fn tick(&self) {
        self.counter.inc();
    }

    /// The number of units ticked so far, exact even when hidden.
    pub fn position(&self) -> usize {
        self.counter.get()
    }
}

impl Drop for Bar {
    /// Clears the bar from the terminal at the end of the stage.
    fn drop(&mut self) {
        if !self.pbar.is_finished() {
            self.pbar.set_position(self.counter.get() as u64);
            self.pbar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_new() {
        let bar = Bar::new(10, String::new());
        assert_eq!(bar.position(), 0);
    }

    #[test]
    fn progress_tick() {
        let bar = Bar::new(10, String::from("Meshes: "));
        bar.tick();
        bar.tick();
        assert_eq!(bar.position(), 2)
    }

    #[test]
    fn progress_ticks_from_workers() {
        let bar = Bar::new(64, String::from("Fingerprints: "));
        crossbeam_utils::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|_| (0..16).for_each(|_| bar.tick()));
            }
        }).unwrap();
        assert_eq!(bar.position(), 64);
    }
}
