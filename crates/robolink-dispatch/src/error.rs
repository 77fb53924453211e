use tokio::task::JoinError;

/// Errors that can occur while running the dispatch loops.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A loop was started while a previous instance is still running.
    #[error("{0} loop is already running")]
    AlreadyRunning(&'static str),

    /// A loop was started while a previous instance has been asked to stop
    /// but has not exited yet.
    #[error("{0} loop is still stopping, shut it down before restarting")]
    Stopping(&'static str),

    /// The task running a loop panicked or was aborted.
    #[error("{name} loop ended abnormally: {source}")]
    LoopFailed {
        name: &'static str,
        #[source]
        source: JoinError,
    },
}
