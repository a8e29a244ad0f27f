//! Serial link I/O.
//!
//! Opens the controller UART in raw mode at 115200 baud and runs one
//! reader and one writer thread. The threads touch only their queue
//! half: the reader produces onto the rx queue the engine drains, the
//! writer consumes the tx queue the dispatcher fills. That keeps the
//! control loop free of blocking I/O.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{error, info, warn};
use nix::sys::termios::{self, BaudRate, SetArg, SpecialCharacterIndices};

use jig_protocol::{ByteConsumer, ByteProducer};

/// Read/write chunk size for the link threads
const IO_CHUNK: usize = 64;

/// Writer idle back-off while the tx queue is empty
const WRITER_IDLE: Duration = Duration::from_millis(1);

/// An open, raw-mode serial link to the test controller
pub struct SerialPort {
    file: File,
}

impl SerialPort {
    /// Open `path` and switch it to raw 115200 8N1
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;

        let mut tio = termios::tcgetattr(&file).map_err(io::Error::from)?;
        termios::cfmakeraw(&mut tio);
        termios::cfsetspeed(&mut tio, BaudRate::B115200).map_err(io::Error::from)?;
        // Block until at least one byte arrives, no inter-byte timer
        tio.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
        tio.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
        termios::tcsetattr(&file, SetArg::TCSANOW, &tio).map_err(io::Error::from)?;

        info!("serial link open: {} @ 115200", path.display());
        Ok(Self { file })
    }

    /// Start the reader thread, producing raw link bytes onto `rx`
    pub fn spawn_reader(&self, mut rx: ByteProducer<'static>) -> io::Result<JoinHandle<()>> {
        let mut file = self.file.try_clone()?;
        thread::Builder::new()
            .name("jig-link-rx".into())
            .spawn(move || {
                let mut buf = [0u8; IO_CHUNK];
                loop {
                    match file.read(&mut buf) {
                        Ok(0) => {
                            warn!("serial link closed by peer");
                            break;
                        }
                        Ok(n) => {
                            for &byte in &buf[..n] {
                                if rx.enqueue(byte).is_err() {
                                    warn!("rx queue full, byte dropped");
                                }
                            }
                        }
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            error!("serial read failed: {e}");
                            break;
                        }
                    }
                }
            })
    }

    /// Start the writer thread, draining `tx` onto the link
    pub fn spawn_writer(&self, mut tx: ByteConsumer<'static>) -> io::Result<JoinHandle<()>> {
        let mut file = self.file.try_clone()?;
        thread::Builder::new()
            .name("jig-link-tx".into())
            .spawn(move || {
                let mut buf = [0u8; IO_CHUNK];
                loop {
                    let mut len = 0;
                    while len < buf.len() {
                        match tx.dequeue() {
                            Some(byte) => {
                                buf[len] = byte;
                                len += 1;
                            }
                            None => break,
                        }
                    }
                    if len == 0 {
                        thread::sleep(WRITER_IDLE);
                        continue;
                    }
                    if let Err(e) = file.write_all(&buf[..len]) {
                        error!("serial write failed: {e}");
                        break;
                    }
                }
            })
    }
}
