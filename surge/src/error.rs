use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The strategy has been shut down and accepts no further work units.
    #[error("strategy is shut down and no longer accepts work units")]
    StrategyClosed,

    /// The strategy could not create an execution context.
    #[error("unable to create {what}")]
    ResourceExhausted {
        what: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn exhausted(what: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Error::ResourceExhausted { what, source }
    }
}
