//! Background load task
//!
//! Runs the glTF loader on a worker thread and hands the result back
//! through a channel. The UI thread polls once per frame; the
//! completion therefore lands at an arbitrary later tick without ever
//! blocking the render loop.

use super::{GltfLoader, LoadError, LoadedScene};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// In-flight asset load
pub struct LoadTask {
    rx: Receiver<Result<LoadedScene, LoadError>>,
    done: bool,
}

impl LoadTask {
    /// Start loading `path` on a background thread
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            tracing::info!(path = %path.display(), "loading asset");
            let result = GltfLoader::new().load(&path);
            // The receiver may be gone if the scene was disposed
            // mid-load; the result is simply dropped then.
            let _ = tx.send(result);
        });
        Self { rx, done: false }
    }

    /// Non-blocking poll for the completion
    ///
    /// Returns the result exactly once; `None` before completion and
    /// on every call after the result has been taken.
    pub fn poll(&mut self) -> Option<Result<LoadedScene, LoadError>> {
        if self.done {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.done = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.done = true;
                Some(Err(LoadError::InvalidData(
                    "loader thread exited without a result".into(),
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn poll_until_done(task: &mut LoadTask) -> Result<LoadedScene, LoadError> {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(result) = task.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "load task never completed");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn completion_is_delivered_exactly_once() {
        let mut task = LoadTask::spawn(PathBuf::from("/nonexistent/chair.gltf"));
        let result = poll_until_done(&mut task);
        assert!(matches!(result, Err(LoadError::NotFound(_))));
        assert!(task.poll().is_none());
        assert!(task.poll().is_none());
    }
}
