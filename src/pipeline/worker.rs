//! Background worker.
//!
//! The pipeline runs to completion on its own thread. Progress events flow
//! back over a channel; the output is only available through
//! [`ComputationHandle::join`], so a caller never sees a partial result.

use std::any::Any;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use tracing::debug;

use super::{compute_with_progress, PipelineOutput, Progress};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::topology::BoundaryProvider;

/// Handle to a pipeline running in the background.
pub struct ComputationHandle {
    progress: Receiver<Progress>,
    worker: JoinHandle<Result<PipelineOutput>>,
}

impl ComputationHandle {
    /// Progress events received so far, without blocking.
    pub fn poll(&self) -> Vec<Progress> {
        let mut events = Vec::new();
        loop {
            match self.progress.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Blocking iterator over progress events; ends when the worker exits.
    pub fn progress(&self) -> impl Iterator<Item = Progress> + '_ {
        self.progress.iter()
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Wait for the worker and take its output.
    pub fn join(self) -> Result<PipelineOutput> {
        self.worker.join().map_err(|panic| Error::Worker(panic_message(panic)))?
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Run the pipeline on a background thread.
pub fn spawn<P>(provider: P, config: PipelineConfig) -> ComputationHandle
where
    P: BoundaryProvider + Send + 'static,
{
    let (sender, progress) = mpsc::channel();
    let worker = thread::spawn(move || {
        debug!(dim = config.homology_dimension, "worker started");
        compute_with_progress(&provider, &config, |event| {
            // The receiver may already be gone; the result still goes to join
            let _ = sender.send(event);
        })
    });
    ComputationHandle { progress, worker }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{compute, Stage};
    use crate::topology::fixtures::two_loops;
    use crate::topology::{BoundaryData, Grades};

    #[test]
    fn test_background_matches_foreground() {
        let config = PipelineConfig::with_dimension(1);
        let handle = spawn(two_loops(), config.clone());
        let events: Vec<Progress> = handle.progress().collect();
        let output = handle.join().unwrap();

        assert_eq!(output, compute(&two_loops(), &config).unwrap());
        assert_eq!(events.first(), Some(&Progress::Started(Stage::Betti)));
        assert_eq!(events.len(), 8);
    }

    struct Panicking(Grades);

    impl BoundaryProvider for Panicking {
        fn grades(&self) -> &Grades {
            &self.0
        }

        fn boundary(&self, _dim: usize) -> Result<BoundaryData> {
            panic!("provider exploded")
        }
    }

    #[test]
    fn test_panic_becomes_worker_error() {
        let handle = spawn(Panicking(Grades::integers(1, 1)), PipelineConfig::default());
        let err = handle.join().unwrap_err();
        assert_eq!(err, Error::Worker("provider exploded".to_string()));
    }
}
