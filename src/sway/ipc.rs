//! [`WindowManager`] implementation backed by sway IPC.
//!
//! Talks to sway directly through its Unix socket (`$SWAYSOCK`, or
//! `$I3SOCK` under i3), without spawning `swaymsg` or pulling in a client
//! crate.  Only read-only queries and event subscriptions are issued.
//!
//! # Wire format
//!
//! Every message in both directions is framed as
//!
//! ```text
//! "i3-ipc" | payload length (u32) | message type (u32) | JSON payload
//! ```
//!
//! with the integers in native byte order.  Event messages carry the high
//! bit set in their type.

use crate::traits::{OutputInfo, WindowManager, WorkspaceInfo};
use crate::tree::{NativeRect, Node};
use log::debug;
use serde::Deserialize;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

/// Every frame starts with these bytes.
pub const MAGIC: &[u8; 6] = b"i3-ipc";
/// Magic plus two `u32`s.
pub const HEADER_LEN: usize = MAGIC.len() + 8;
/// Set in the type of every event message.
pub const EVENT_BIT: u32 = 0x8000_0000;

/// Requests swaytree sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    GetWorkspaces,
    Subscribe,
    GetOutputs,
    GetTree,
}

impl MessageType {
    pub fn code(self) -> u32 {
        match self {
            MessageType::GetWorkspaces => 1,
            MessageType::Subscribe => 2,
            MessageType::GetOutputs => 3,
            MessageType::GetTree => 4,
        }
    }
}

/// Event types, with the [`EVENT_BIT`] stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Workspace,
    Output,
    Mode,
    Window,
    BarconfigUpdate,
    Binding,
    Shutdown,
    Tick,
    Other(u32),
}

impl From<u32> for EventKind {
    fn from(code: u32) -> Self {
        match code & !EVENT_BIT {
            0 => EventKind::Workspace,
            1 => EventKind::Output,
            2 => EventKind::Mode,
            3 => EventKind::Window,
            4 => EventKind::BarconfigUpdate,
            5 => EventKind::Binding,
            6 => EventKind::Shutdown,
            7 => EventKind::Tick,
            other => EventKind::Other(other),
        }
    }
}

/// Errors that can occur when talking to sway.
#[derive(Debug, thiserror::Error)]
pub enum SwayIpcError {
    #[error("neither SWAYSOCK nor I3SOCK is set")]
    NoSocket,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad magic in message header")]
    BadMagic,
    #[error("unexpected reply type {got} (expected {expected})")]
    UnexpectedReply { expected: u32, got: u32 },
    #[error("subscription rejected: {0}")]
    SubscribeRejected(String),
}

impl SwayIpcError {
    /// Whether the peer closed the connection.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, SwayIpcError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

//  Framing

/// Frame `payload` as a message of type `code`.
pub fn encode_message(code: u32, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&(payload.len() as u32).to_ne_bytes());
    buf.extend_from_slice(&code.to_ne_bytes());
    buf.extend_from_slice(payload);
    buf
}

pub fn write_message<W: Write>(w: &mut W, code: u32, payload: &[u8]) -> Result<(), SwayIpcError> {
    w.write_all(&encode_message(code, payload))?;
    w.flush()?;
    Ok(())
}

/// Read one framed message, returning its type and payload.
pub fn read_message<R: Read>(r: &mut R) -> Result<(u32, Vec<u8>), SwayIpcError> {
    let mut header = [0u8; HEADER_LEN];
    r.read_exact(&mut header)?;
    if &header[..MAGIC.len()] != MAGIC {
        return Err(SwayIpcError::BadMagic);
    }
    let mut word = [0u8; 4];
    word.copy_from_slice(&header[6..10]);
    let len = u32::from_ne_bytes(word) as usize;
    word.copy_from_slice(&header[10..14]);
    let code = u32::from_ne_bytes(word);

    let mut payload = vec![0u8; len];
    r.read_exact(&mut payload)?;
    Ok((code, payload))
}

/// Resolve the sway IPC socket path from the environment.
pub fn socket_path() -> Result<PathBuf, SwayIpcError> {
    std::env::var_os("SWAYSOCK")
        .or_else(|| std::env::var_os("I3SOCK"))
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .ok_or(SwayIpcError::NoSocket)
}

//  Minimal serde structs for the JSON we care about

/// Subset of a `GET_WORKSPACES` entry.
#[derive(Deserialize)]
struct WorkspaceJson {
    name: String,
    #[serde(default)]
    focused: bool,
    #[serde(default)]
    output: String,
}

/// Subset of a `GET_OUTPUTS` entry.
#[derive(Deserialize)]
struct OutputJson {
    name: String,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    focused: bool,
    #[serde(default)]
    rect: NativeRect,
}

#[derive(Deserialize)]
struct SubscribeReply {
    success: bool,
}

/// Sway-backed window manager.
///
/// No connection is held; each query opens a short-lived connection to
/// the socket.
#[derive(Debug, Clone)]
pub struct SwayIpc {
    socket: PathBuf,
}

impl SwayIpc {
    /// Connect to the socket named by `$SWAYSOCK` / `$I3SOCK`.
    pub fn from_env() -> Result<Self, SwayIpcError> {
        Ok(Self::with_socket(socket_path()?))
    }

    pub fn with_socket(socket: impl AsRef<Path>) -> Self {
        Self {
            socket: socket.as_ref().to_path_buf(),
        }
    }

    pub fn socket(&self) -> &Path {
        &self.socket
    }

    /// Send one request and return the raw JSON reply.
    fn request(&self, kind: MessageType, payload: &[u8]) -> Result<Vec<u8>, SwayIpcError> {
        let mut stream = UnixStream::connect(&self.socket)?;
        write_message(&mut stream, kind.code(), payload)?;
        let (code, reply) = read_message(&mut stream)?;
        if code != kind.code() {
            return Err(SwayIpcError::UnexpectedReply {
                expected: kind.code(),
                got: code,
            });
        }
        Ok(reply)
    }

    /// Open a dedicated connection subscribed to `events` (e.g.
    /// `"window"`, `"workspace"`).
    pub fn subscribe(&self, events: &[&str]) -> Result<EventStream, SwayIpcError> {
        let mut stream = UnixStream::connect(&self.socket)?;
        let payload = serde_json::to_vec(events)?;
        write_message(&mut stream, MessageType::Subscribe.code(), &payload)?;

        let (code, reply) = read_message(&mut stream)?;
        if code != MessageType::Subscribe.code() {
            return Err(SwayIpcError::UnexpectedReply {
                expected: MessageType::Subscribe.code(),
                got: code,
            });
        }
        let ack: SubscribeReply = serde_json::from_slice(&reply)?;
        if !ack.success {
            return Err(SwayIpcError::SubscribeRejected(
                String::from_utf8_lossy(&reply).into_owned(),
            ));
        }
        debug!("subscribed to {:?}", events);
        Ok(EventStream { stream })
    }
}

impl WindowManager for SwayIpc {
    type Error = SwayIpcError;

    fn tree(&self) -> Result<Node, Self::Error> {
        let json = self.request(MessageType::GetTree, b"")?;
        Ok(serde_json::from_slice(&json)?)
    }

    fn workspaces(&self) -> Result<Vec<WorkspaceInfo>, Self::Error> {
        let json = self.request(MessageType::GetWorkspaces, b"")?;
        let workspaces: Vec<WorkspaceJson> = serde_json::from_slice(&json)?;
        Ok(workspaces
            .into_iter()
            .map(|w| WorkspaceInfo {
                name: w.name,
                focused: w.focused,
                output: w.output,
            })
            .collect())
    }

    fn outputs(&self) -> Result<Vec<OutputInfo>, Self::Error> {
        let json = self.request(MessageType::GetOutputs, b"")?;
        let outputs: Vec<OutputJson> = serde_json::from_slice(&json)?;
        Ok(outputs
            .into_iter()
            .map(|o| OutputInfo {
                name: o.name,
                active: o.active,
                focused: o.focused,
                rect: o.rect,
            })
            .collect())
    }
}

/// An event delivered on a subscribed connection.
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub payload: Vec<u8>,
}

/// A connection that only carries events.
pub struct EventStream {
    stream: UnixStream,
}

impl EventStream {
    /// Block until the next event arrives.
    ///
    /// Non-event replies on the connection are skipped.
    pub fn next_event(&mut self) -> Result<Event, SwayIpcError> {
        loop {
            let (code, payload) = read_message(&mut self.stream)?;
            if code & EVENT_BIT != 0 {
                return Ok(Event {
                    kind: EventKind::from(code),
                    payload,
                });
            }
        }
    }
}

//  Tests
