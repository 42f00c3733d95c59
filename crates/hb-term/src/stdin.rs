// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Non-blocking stdin reads.
//
// The poll step runs inside the frame loop, so it must never wait for
// input. Each call checks stdin with a zero-timeout `poll()` and reads
// only when bytes are already there; an idle terminal costs one syscall
// per frame.

use std::io;

/// A byte source the poll step can drain without blocking.
pub trait InputSource {
    /// Read whatever is available into `buf`. `Ok(0)` means nothing pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Bytes from a slice, consumed front to back. Handy for feeding canned
/// input through the same path as a terminal.
impl InputSource for &[u8] {
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.len().min(buf.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        Ok(n)
    }
}

/// The process's stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdin;

#[cfg(unix)]
impl InputSource for Stdin {
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd: libc::STDIN_FILENO,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, 0)
        };
        if ready < 0 {
            return interrupted_or(io::Error::last_os_error());
        }
        if ready == 0 {
            return Ok(0);
        }

        let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            return interrupted_or(io::Error::last_os_error());
        }

        #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
        Ok(n as usize)
    }
}

/// A signal landing mid-syscall is not an error: nothing was read.
#[cfg(unix)]
fn interrupted_or(err: io::Error) -> io::Result<usize> {
    match err.kind() {
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(0),
        _ => Err(err),
    }
}

#[cfg(not(unix))]
impl InputSource for Stdin {
    fn read_available(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_source_reads_in_chunks() {
        let mut src: &[u8] = b"abcdef";
        let mut buf = [0u8; 4];

        assert_eq!(src.read_available(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"abcd");
        assert_eq!(src.read_available(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ef");
        assert_eq!(src.read_available(&mut buf).unwrap(), 0);
    }

    #[test]
    fn stdin_with_empty_buffer_reads_nothing() {
        assert_eq!(Stdin.read_available(&mut []).unwrap(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn interrupted_read_is_empty() {
        let err = io::Error::from(io::ErrorKind::Interrupted);
        assert_eq!(interrupted_or(err).unwrap(), 0);
        let err = io::Error::from(io::ErrorKind::BrokenPipe);
        assert!(interrupted_or(err).is_err());
    }
}
