// SPDX-License-Identifier: MIT
//
// Error type shared by every backend.
//
// Three failure classes exist and only one of them shows up here:
//
// - unmapped input (unknown key or button codes) is logged and dropped by
//   the pump, never returned;
// - unsupported operations (dialogs, clipboard) come back as
//   `Error::NotSupported` so callers can tell "can't" from "failed";
// - event queue exhaustion aborts the process inside the queue.
//
// Everything else is plain I/O or a misuse of the surface lifecycle.

use std::io;

use thiserror::Error;

/// Backend error.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation on the terminal or native surface failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backend has no implementation of this operation.
    #[error("{0} is not supported by this backend")]
    NotSupported(&'static str),

    /// An operation needed a surface, but `create_surface` was never called.
    #[error("no surface has been created")]
    NoSurface,

    /// Requested surface dimensions are unusable.
    #[error("invalid surface size {width}x{height}")]
    SurfaceSize {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// The native toolkit thread could not be started.
    #[error("failed to spawn toolkit thread: {0}")]
    ThreadSpawn(#[source] io::Error),
}

/// Result alias for backend operations.
pub type Result<T> = std::result::Result<T, Error>;
