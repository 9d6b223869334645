//! Progress reporting for long sampling runs.
//!
//! Workers push ticks into a channel; a tracker thread counts them and logs
//! every tenth of the way to the expected total.

use crossbeam_channel::{Receiver, Sender, unbounded};
use std::thread::{self, JoinHandle};
use tracing::info;

const STEPS: usize = 10;

/// Cloneable handle that rayon workers use to report a finished trial.
#[derive(Clone, Debug)]
pub struct Ticker {
    sender: Sender<()>,
}

impl Ticker {
    pub fn tick(&self) {
        // The tracker only goes away in `finish`, after all workers are done.
        let _ = self.sender.send(());
    }
}

pub struct Progress {
    sender: Sender<()>,
    tracker: JoinHandle<usize>,
}

impl Progress {
    pub fn start(label: &'static str, total: usize) -> Self {
        let (sender, receiver) = unbounded();
        let tracker = thread::spawn(move || track(label, total, receiver));
        Progress { sender, tracker }
    }

    pub fn ticker(&self) -> Ticker {
        Ticker {
            sender: self.sender.clone(),
        }
    }

    /// Closes the channel and returns how many ticks were seen.
    ///
    /// Every `Ticker` handed out must be dropped first or this blocks.
    pub fn finish(self) -> usize {
        drop(self.sender);
        self.tracker.join().unwrap_or(0)
    }
}

fn track(label: &'static str, total: usize, receiver: Receiver<()>) -> usize {
    let step = (total / STEPS).max(1);
    let mut done = 0;
    for () in receiver {
        done += 1;
        if done % step == 0 || done == total {
            info!(target: "progress", "{label}: {done}/{total}");
        }
    }
    done
}
