//! Loopback bridge exporting rendered frames to an external process.
//!
//! # Protocol
//!
//! The external client connects to `127.0.0.1:<port>` (see [`FrameStreamer::port`]). Exactly one
//! connection is accepted, and kept for the life of the streamer. Every capture request then
//! writes one contiguous buffer of `width * height` pixels, rows top to bottom, pixels left to
//! right, each pixel being three `i32` little-endian values: red, green, blue (`0..=255`).
//!
//! Streaming is best effort: bind and accept failures are logged and leave streaming disabled.

use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{bail, ensure, Context};
use tracing::{debug, error, info, instrument, warn};

use crate::frame::Frame;

/// Bytes used by one color channel on the wire
pub const CHANNEL_SIZE: usize = std::mem::size_of::<i32>();

/// Size in bytes of one encoded frame
pub const fn frame_byte_len(width: usize, height: usize) -> usize {
    width * height * 3 * CHANNEL_SIZE
}

#[derive(Debug)]
pub struct FrameStreamer {
    width: usize,
    height: usize,
    port: Option<u16>,
    /// Published once by the acceptor thread
    pending: Option<Receiver<TcpStream>>,
    connection: Option<TcpStream>,
    buffer: Vec<u8>,
}

impl FrameStreamer {
    /// How long a capture waits for the client to be accepted
    const ACCEPT_TIMEOUT: Duration = Duration::from_secs(1);

    /// Bind a listener on an OS-assigned loopback port and accept one client in the background.
    #[instrument]
    pub fn bind(width: usize, height: usize) -> FrameStreamer {
        let mut streamer = FrameStreamer {
            width,
            height,
            port: None,
            pending: None,
            connection: None,
            buffer: Vec::with_capacity(frame_byte_len(width, height)),
        };

        let listener = match TcpListener::bind("127.0.0.1:0") {
            Ok(listener) => listener,
            Err(e) => {
                error!("could not bind frame listener: {e}");
                return streamer;
            }
        };
        let port = match listener.local_addr() {
            Ok(addr) => addr.port(),
            Err(e) => {
                error!("could not read frame listener address: {e}");
                return streamer;
            }
        };

        let (tx, rx) = mpsc::sync_channel(1);
        let acceptor = thread::Builder::new()
            .name("frame-acceptor".to_string())
            .spawn(move || match listener.accept() {
                Ok((stream, addr)) => {
                    info!(%addr, "frame client connected");
                    // receiver gone => streamer dropped, nobody to publish to
                    let _ = tx.send(stream);
                }
                Err(e) => error!("could not accept frame client: {e}"),
            });

        if let Err(e) = acceptor {
            error!("could not spawn frame acceptor: {e}");
            return streamer;
        }

        debug!(port, "frame listener ready");
        streamer.port = Some(port);
        streamer.pending = Some(rx);
        streamer
    }

    /// Port the external client must connect to, `None` if binding failed.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Size in bytes of one encoded frame
    pub fn frame_size(&self) -> usize {
        frame_byte_len(self.width, self.height)
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Encode `frame` and write it to the client. Blocks until the whole buffer is written.
    ///
    /// # Error
    /// Returned when `frame` has the wrong size, when no client connected, or when the write fails.
    #[instrument(skip_all)]
    pub fn send(&mut self, frame: &Frame) -> anyhow::Result<()> {
        self.encode(frame)?;
        let buffer = &self.buffer;
        let stream = Self::connection(&mut self.connection, &mut self.pending)?;
        stream
            .write_all(buffer)
            .context("could not write frame to client")?;
        stream.flush().context("could not flush frame")?;
        Ok(())
    }

    /// Last encoded frame
    pub fn encoded(&self) -> &[u8] {
        &self.buffer
    }

    pub(crate) fn encode(&mut self, frame: &Frame) -> anyhow::Result<()> {
        ensure!(
            frame.width() == self.width && frame.height() == self.height,
            "frame is {}x{}, expected {}x{}",
            frame.width(),
            frame.height(),
            self.width,
            self.height
        );
        self.buffer.clear();
        for pixel in frame.pixels() {
            for channel in [pixel.r, pixel.g, pixel.b] {
                self.buffer
                    .extend_from_slice(&i32::from(channel).to_le_bytes());
            }
        }
        Ok(())
    }

    /// Take the accepted connection from the acceptor the first time it is needed.
    fn connection<'a>(
        connection: &'a mut Option<TcpStream>,
        pending: &mut Option<Receiver<TcpStream>>,
    ) -> anyhow::Result<&'a mut TcpStream> {
        if connection.is_none() {
            let Some(rx) = pending.as_ref() else {
                bail!("frame streaming is unavailable");
            };
            match rx.recv_timeout(Self::ACCEPT_TIMEOUT) {
                Ok(stream) => {
                    *pending = None;
                    *connection = Some(stream);
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!("frame requested before any client connected");
                    bail!("no frame client connected");
                }
                Err(RecvTimeoutError::Disconnected) => {
                    *pending = None;
                    bail!("frame acceptor stopped without a client");
                }
            }
        }
        connection.as_mut().context("frame streaming is unavailable")
    }
}
