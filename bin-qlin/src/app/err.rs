use derive_more::Display;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum Kind { 
    #[display("matrix")]
    Matrix,
    #[display("vector")]
    Vector,
    #[display("name")]
    Any,
}

/// Errors raised by the shell itself. Engine errors are passed on as they are.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum Error { 
    #[display("{kind} '{name}' not found.")]
    NotFound { kind: Kind, name: String },

    #[display("'{_0}' exists.")]
    Exists(String),

    #[display("invalid name: '{_0}'.")]
    InvalidName(String),

    #[display("invalid size: '{_0}'.")]
    InvalidSize(String),

    #[display("expected {} entries for a {rows}x{cols} matrix, got {found}.", rows * cols)]
    EntryCount { rows: usize, cols: usize, found: usize },

    #[display("usage: {_0}")]
    Usage(String),

    #[display("unknown command: '{_0}'. type `help` for usage.")]
    UnknownCommand(String),

    #[display("`{_0}` has no result to save.")]
    NotSavable(String),

    #[display("panic: {_0}")]
    Panic(String),
}

impl std::error::Error for Error {}

macro_rules! err {
    ($e:expr) => {{
        #[allow(unused_imports)]
        use crate::app::err::{Error::*, Kind};
        Err( $e.into() )
    }}
}

macro_rules! ensure {
    ($cond:expr, $e:expr) => {{
        if !$cond { 
            return err!($e);
        }
    }}
}

pub(crate) use {err, ensure};
