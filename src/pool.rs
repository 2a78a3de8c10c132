use crate::progress::Bar;
use anyhow::{anyhow, Result};
use atomic_counter::{AtomicCounter, RelaxedCounter};
use crossbeam_utils::thread;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared flag asking workers not to start any more units of work.
#[derive(Clone, Debug, Default)]
pub struct Cancel(Arc<AtomicBool>);

impl Cancel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops every unit that has not started yet. Running units finish.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The result of one unit of work.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<R> {
    Done(R),
    /// The unit was still queued when the pool was cancelled.
    Cancelled,
}

impl<R> Outcome<R> {
    /// The result, None if the unit never ran.
    pub fn done(self) -> Option<R> {
        match self {
            Self::Done(r) => Some(r),
            Self::Cancelled => None,
        }
    }
}

/// Applies `f` to every item over `threads` workers and returns the outcomes
/// in the order of `items`.
///
/// Workers pull the next unclaimed index from a shared counter so long and
/// short units balance out. With one thread everything runs on the caller.
pub fn run<T, R, F>(items: &[T],
                    threads: usize,
                    cancel: &Cancel,
                    progress_bar: &Bar,
                    f: F)
                    -> Result<Vec<Outcome<R>>>
    where T: Sync,
          R: Send,
          F: Fn(&T) -> R + Sync
{
    let work = |item: &T| {
        if cancel.is_cancelled() {
            return Outcome::Cancelled;
        }
        let result = f(item);
        progress_bar.tick();
        Outcome::Done(result)
    };
    match threads.cmp(&1) {
        std::cmp::Ordering::Greater => {
            let next = RelaxedCounter::new(0);
            let (next, work) = (&next, &work);
            let mut outcomes: Vec<Option<Outcome<R>>> =
                (0..items.len()).map(|_| None).collect();
            thread::scope(|s| {
                let workers = threads.min(items.len());
                let spawned_threads = (0..workers).map(|_| {
                    s.spawn(move |_| {
                        let mut done = vec![];
                        loop {
                            let i = next.inc();
                            if i >= items.len() {
                                break done;
                            }
                            done.push((i, work(&items[i])));
                        }
                    })
                })
                .collect::<Vec<_>>();
                for thread in spawned_threads {
                    let done = thread.join()
                                     .map_err(|_| anyhow!("Worker thread panicked."))?;
                    for (i, outcome) in done {
                        outcomes[i] = Some(outcome);
                    }
                }
                Ok::<(), anyhow::Error>(())
            }).map_err(|_| anyhow!("Failed to join the worker pool."))??;
            // every index is claimed by exactly one worker
            Ok(outcomes.into_iter()
                       .map(|o| o.unwrap_or(Outcome::Cancelled))
                       .collect())
        }
        _ => Ok(items.iter().map(work).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_keeps_order() {
        let items = (0..100).collect::<Vec<usize>>();
        let bar = Bar::new(items.len() as u64, String::new());
        let out = run(&items, 4, &Cancel::new(), &bar, |i| i * 2).unwrap();
        let out = out.into_iter().filter_map(Outcome::done).collect::<Vec<usize>>();
        assert_eq!(out, (0..100).map(|i| i * 2).collect::<Vec<usize>>());
        assert_eq!(bar.position(), 100);
    }

    #[test]
    fn pool_inline() {
        let items = vec!["a", "bb", "ccc"];
        let bar = Bar::new(3, String::new());
        let out = run(&items, 1, &Cancel::new(), &bar, |s| s.len()).unwrap();
        assert_eq!(out,
                   vec![Outcome::Done(1), Outcome::Done(2), Outcome::Done(3)]);
    }

    #[test]
    fn pool_more_threads_than_items() {
        let items = vec![1, 2];
        let bar = Bar::new(2, String::new());
        let out = run(&items, 16, &Cancel::new(), &bar, |i| i + 1).unwrap();
        assert_eq!(out, vec![Outcome::Done(2), Outcome::Done(3)]);
    }

    #[test]
    fn pool_cancel_inline() {
        let items = (0..10).collect::<Vec<usize>>();
        let bar = Bar::new(10, String::new());
        let cancel = Cancel::new();
        let out = run(&items, 1, &cancel, &bar, |i| {
                      if *i == 3 {
                          cancel.cancel();
                      }
                      *i
                  }).unwrap();
        assert_eq!(out[3], Outcome::Done(3));
        assert!(out[4..].iter().all(|o| *o == Outcome::Cancelled));
        assert_eq!(bar.position(), 4);
    }

    #[test]
    fn pool_cancel_before_start() {
        let items = (0..50).collect::<Vec<usize>>();
        let bar = Bar::new(50, String::new());
        let cancel = Cancel::new();
        cancel.cancel();
        let out = run(&items, 4, &cancel, &bar, |i| *i).unwrap();
        assert_eq!(out.len(), 50);
        assert!(out.iter().all(|o| *o == Outcome::Cancelled));
    }

    #[test]
    fn pool_empty() {
        let items: Vec<usize> = vec![];
        let bar = Bar::new(0, String::new());
        let out = run(&items, 4, &Cancel::new(), &bar, |i| *i).unwrap();
        assert!(out.is_empty());
    }
}
