//! `Read`/`Write` adapter and TCP connector.
//!
//! # Example
//!
//! ```ignore
//! use dnode_sync_client::transport::{ConnectOptions, IoStream};
//! use std::time::Duration;
//!
//! let options = ConnectOptions::default().read_timeout(Duration::from_secs(5));
//! let stream = IoStream::connect_tcp("127.0.0.1:5004", &options)?;
//! ```

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use super::LineStream;

/// Alias for the TCP flavour of [`IoStream`], as returned by [`IoStream::connect_tcp`].
pub type TcpLineStream = IoStream<std::net::TcpStream, std::net::TcpStream>;

/// Socket options for [`IoStream::connect_tcp`].
///
/// All timeouts default to `None` (block forever). A read or write that
/// times out surfaces as an I/O error from the call that hit it.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Timeout for establishing the TCP connection, per resolved address.
    pub connect_timeout: Option<Duration>,
    /// Timeout for a single blocking read.
    pub read_timeout: Option<Duration>,
    /// Timeout for a single blocking write.
    pub write_timeout: Option<Duration>,
    /// Disable Nagle's algorithm (default: true, requests are small lines).
    pub nodelay: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
            nodelay: true,
        }
    }
}

impl ConnectOptions {
    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the write timeout.
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    /// Enable or disable `TCP_NODELAY`.
    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }
}

/// Line stream over a reader and a writer.
///
/// The reader is buffered internally; the writer is flushed after every
/// [`LineStream::write_all`], since the remote waits for complete lines.
#[derive(Debug)]
pub struct IoStream<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl<R: Read, W: Write> IoStream<R, W> {
    /// Wrap a reader/writer pair, e.g. a child's stdout and stdin.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Unwrap into the reader and writer.
    ///
    /// Any input already buffered but not yet returned as a line is lost.
    pub fn into_parts(self) -> (R, W) {
        (self.reader.into_inner(), self.writer)
    }
}

impl IoStream<std::net::TcpStream, std::net::TcpStream> {
    /// Open a TCP connection to `addr` and wrap both halves.
    ///
    /// With a connect timeout, each resolved address is tried in turn and
    /// the last error is returned if none succeeds.
    pub fn connect_tcp<A: ToSocketAddrs>(addr: A, options: &ConnectOptions) -> std::io::Result<Self> {
        let socket = match options.connect_timeout {
            Some(timeout) => connect_with_timeout(addr, timeout)?,
            None => std::net::TcpStream::connect(addr)?,
        };

        socket.set_read_timeout(options.read_timeout)?;
        socket.set_write_timeout(options.write_timeout)?;
        socket.set_nodelay(options.nodelay)?;

        let writer = socket.try_clone()?;
        Ok(Self::new(socket, writer))
    }

    /// Address of the remote end.
    pub fn peer_addr(&self) -> std::io::Result<SocketAddr> {
        self.writer.peer_addr()
    }
}

fn connect_with_timeout<A: ToSocketAddrs>(
    addr: A,
    timeout: Duration,
) -> std::io::Result<std::net::TcpStream> {
    let mut last_err = None;
    for addr in addr.to_socket_addrs()? {
        match std::net::TcpStream::connect_timeout(&addr, timeout) {
            Ok(socket) => return Ok(socket),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "could not resolve to any address",
        )
    }))
}

impl<R: Read, W: Write> LineStream for IoStream<R, W> {
    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_lines_with_terminator() {
        let input = Cursor::new(b"first\nsecond\n".to_vec());
        let mut stream = IoStream::new(input, Vec::new());

        assert_eq!(stream.read_line().unwrap().as_deref(), Some("first\n"));
        assert_eq!(stream.read_line().unwrap().as_deref(), Some("second\n"));
        assert_eq!(stream.read_line().unwrap(), None);
    }

    #[test]
    fn test_unterminated_tail_is_returned() {
        let input = Cursor::new(b"tail".to_vec());
        let mut stream = IoStream::new(input, Vec::new());

        assert_eq!(stream.read_line().unwrap().as_deref(), Some("tail"));
        assert_eq!(stream.read_line().unwrap(), None);
    }

    #[test]
    fn test_empty_reader_is_eof() {
        let mut stream = IoStream::new(Cursor::new(Vec::new()), Vec::new());
        assert_eq!(stream.read_line().unwrap(), None);
    }

    #[test]
    fn test_writes_reach_writer() {
        let mut stream = IoStream::new(Cursor::new(Vec::new()), Vec::new());
        stream.write_all(b"{\"method\":\"methods\"}\n").unwrap();
        stream.write_all(b"next\n").unwrap();

        let (_, written) = stream.into_parts();
        assert_eq!(written, b"{\"method\":\"methods\"}\nnext\n");
    }

    #[test]
    fn test_connect_options_builder() {
        let options = ConnectOptions::default()
            .connect_timeout(Duration::from_millis(100))
            .read_timeout(Duration::from_secs(1))
            .nodelay(false);

        assert_eq!(options.connect_timeout, Some(Duration::from_millis(100)));
        assert_eq!(options.read_timeout, Some(Duration::from_secs(1)));
        assert_eq!(options.write_timeout, None);
        assert!(!options.nodelay);
    }

    #[test]
    fn test_connect_refused_is_io_error() {
        // Bind then drop to get a port nobody listens on.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let options = ConnectOptions::default().connect_timeout(Duration::from_secs(1));
        let result = IoStream::connect_tcp(("127.0.0.1", port), &options);
        assert!(result.is_err());
    }
}
