//! Named-FIFO transport (Unix).
//!
//! # Opening rules
//!
//! - The coordinator creates its inbound FIFO if missing and opens it
//!   read+write.  Holding a write end itself means the read side never sees
//!   EOF when the last agent closes, so agents may come and go freely.
//! - Each agent creates its own reply FIFO before registering.  A write end
//!   can only be opened once a reader has the FIFO open, so the coordinator
//!   opens reply FIFOs non-blocking and polls until the agent starts
//!   listening.  [`FifoConnector::connect_while`] stops polling when told to,
//!   so an agent that dies before listening cannot stall the coordinator.
//!
//! # Inbound pump
//!
//! `std::fs::File` reads cannot be interrupted from another thread.  The
//! inbound FIFO is therefore drained by a small pump thread that decodes
//! records and forwards them into a crossbeam channel, which the request
//! processor can `select!` on together with the shutdown signal.  The pump
//! owns nothing but the file.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, unbounded};
use nix::errno::Errno;
use nix::fcntl::{FcntlArg, OFlag, fcntl};
use nix::sys::stat::Mode;
use nix::unistd::mkfifo;
use parking_lot::Mutex;
use tracing::{debug, error, warn};

use crate::codec::{read_message, write_message};
use crate::{Connector, Message, MessageSource, ReplySink, WireError, WireResult};

/// Poll interval bounds while waiting for a reader.
const POLL_MIN: Duration = Duration::from_millis(5);
const POLL_MAX: Duration = Duration::from_millis(100);

/// Create a FIFO at `path` unless something already exists there.
pub fn ensure_fifo(path: &Path) -> WireResult<()> {
    match mkfifo(path, Mode::from_bits_truncate(0o666)) {
        Ok(()) | Err(Errno::EEXIST) => Ok(()),
        Err(source) => Err(WireError::Fifo { path: path.to_path_buf(), source }),
    }
}

/// Open the coordinator's inbound FIFO and start the pump thread.
///
/// The returned receiver reports end-of-stream only if the FIFO itself
/// fails; a read error is logged and ends the pump.
pub fn open_inbound(path: &Path) -> WireResult<Receiver<Message>> {
    ensure_fifo(path)?;
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let (tx, rx) = unbounded();
    let label = path.display().to_string();

    thread::Builder::new()
        .name("pk-fifo-inbound".into())
        .spawn(move || {
            loop {
                match read_message(&mut file) {
                    Ok(Some(msg)) => {
                        if tx.send(msg).is_err() {
                            debug!(channel = %label, "inbound receiver dropped; pump exiting");
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) if e.is_decode() => {
                        warn!(channel = %label, error = %e, "discarding malformed record");
                    }
                    Err(e) => {
                        error!(channel = %label, error = %e, "inbound FIFO read failed");
                        break;
                    }
                }
            }
        })?;

    Ok(rx)
}

// ── FifoSink ──────────────────────────────────────────────────────────────────

/// Write end of a FIFO.  Writes are serialised so each record goes out in
/// one piece.
#[derive(Debug)]
pub struct FifoSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FifoSink {
    /// Open `path` for writing.  Waits until a reader opens it.
    pub fn open(path: &Path) -> WireResult<Self> {
        Self::open_while(path, || true)
    }

    /// Open `path` for writing, polling until a reader has it open.
    ///
    /// Returns [`WireError::NoReader`] once `keep_trying` returns `false`
    /// with still nobody reading.  The sink itself writes in blocking mode.
    pub fn open_while(path: &Path, keep_trying: impl Fn() -> bool) -> WireResult<Self> {
        let mut poll = POLL_MIN;
        let file = loop {
            match OpenOptions::new()
                .write(true)
                .custom_flags(OFlag::O_NONBLOCK.bits())
                .open(path)
            {
                Ok(file) => break file,
                Err(e) if e.raw_os_error() == Some(Errno::ENXIO as i32) => {
                    if !keep_trying() {
                        return Err(WireError::NoReader(path.display().to_string()));
                    }
                    thread::sleep(poll);
                    poll = (poll * 2).min(POLL_MAX);
                }
                Err(e) => return Err(e.into()),
            }
        };
        set_blocking(&file)?;
        Ok(Self { path: path.to_path_buf(), file: Mutex::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReplySink for FifoSink {
    fn send(&self, msg: &Message) -> WireResult<()> {
        let mut file = self.file.lock();
        write_message(&mut *file, msg)
    }
}

/// Opens reply FIFOs by path.
#[derive(Clone, Copy, Debug, Default)]
pub struct FifoConnector;

impl Connector for FifoConnector {
    type Sink = FifoSink;

    fn connect(&self, reply_channel: &str) -> WireResult<FifoSink> {
        FifoSink::open(Path::new(reply_channel))
    }

    fn connect_while<F>(&self, reply_channel: &str, keep_trying: F) -> WireResult<FifoSink>
    where
        F: Fn() -> bool,
    {
        FifoSink::open_while(Path::new(reply_channel), keep_trying)
    }
}

fn set_blocking(file: &File) -> WireResult<()> {
    let fd = file.as_raw_fd();
    let flags = fcntl(fd, FcntlArg::F_GETFL).map_err(io::Error::from)?;
    let flags = OFlag::from_bits_truncate(flags) - OFlag::O_NONBLOCK;
    fcntl(fd, FcntlArg::F_SETFL(flags)).map_err(io::Error::from)?;
    Ok(())
}

// ── FifoSource ────────────────────────────────────────────────────────────────

/// Read end of an agent's reply FIFO.
#[derive(Debug)]
pub struct FifoSource {
    file: File,
}

impl FifoSource {
    /// Open `path` for reading.  Blocks until a writer opens it.
    pub fn open(path: &Path) -> WireResult<Self> {
        let file = OpenOptions::new().read(true).open(path)?;
        Ok(Self { file })
    }
}

impl MessageSource for FifoSource {
    fn recv(&mut self) -> WireResult<Option<Message>> {
        read_message(&mut self.file)
    }
}
