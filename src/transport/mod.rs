//! Transport module - the line-oriented stream a connection talks over.
//!
//! The connection never opens or closes a channel itself; it is handed
//! something implementing [`LineStream`]:
//! - [`IoStream`] adapts any `Read`/`Write` pair (sockets, child process pipes)
//! - [`MemoryStream`] is an in-memory double with explicit read/write queues

mod io;
mod memory;

pub use io::{ConnectOptions, IoStream, TcpLineStream};
pub use memory::MemoryStream;

/// A blocking, bidirectional, line-oriented byte channel.
pub trait LineStream {
    /// Read the next line, including its `\n` terminator.
    ///
    /// Returns the unterminated remainder if the channel ends mid-line,
    /// and `Ok(None)` once the channel is exhausted.
    fn read_line(&mut self) -> std::io::Result<Option<String>>;

    /// Write all bytes and flush them to the remote.
    fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()>;
}

impl<S: LineStream + ?Sized> LineStream for &mut S {
    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        (**self).read_line()
    }

    fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        (**self).write_all(bytes)
    }
}
