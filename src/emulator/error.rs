use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A program could not be placed in memory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read program {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("program is {size} bytes, but at most {max} bytes fit in memory")]
    TooLarge { size: usize, max: usize },
}

/// A condition that stops the machine until it is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("stack overflow at {address:#05x}: call nested more than {depth} levels deep")]
    StackOverflow { address: u16, depth: usize },

    #[error("stack underflow at {address:#05x}: return with an empty call stack")]
    StackUnderflow { address: u16 },
}

/// A cycle could not be executed.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("no program has been loaded")]
    NotLoaded,

    #[error(transparent)]
    Fault(#[from] Fault),

    #[error("machine is halted after an earlier fault: {0}")]
    Halted(Fault),
}
