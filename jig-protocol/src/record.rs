//! Fixed-size wire record encoding and decoding.
//!
//! Record format:
//! - HEAD (1 byte): `@` start-of-record sentinel
//! - CMD (1 byte): command-class tag, see [`ControllerCmd`] / [`ResponseKind`]
//! - DATA (32 bytes): comma-separated ASCII text, zero-padded
//! - TAIL (1 byte): `#` end-of-record sentinel

/// Payload capacity of one record, in bytes
pub const DATA_SIZE: usize = 32;

/// Total record size on the wire (HEAD + CMD + DATA + TAIL)
///
/// All queue and ring sizing derives from this constant.
pub const RECORD_SIZE: usize = DATA_SIZE + 3;

/// Start-of-record sentinel byte
pub const RECORD_HEAD: u8 = b'@';

/// End-of-record sentinel byte
pub const RECORD_TAIL: u8 = b'#';

/// Errors that can occur when decoding a raw record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    /// HEAD or TAIL sentinel byte does not match
    BadSentinel,
}

/// Command tags sent by the controller to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerCmd {
    /// Execute the command carried in DATA
    Command,
    /// Controller finished booting
    Ready,
}

impl ControllerCmd {
    /// Parse a tag from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'C' => Some(ControllerCmd::Command),
            b'R' => Some(ControllerCmd::Ready),
            _ => None,
        }
    }

    /// Convert to the wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            ControllerCmd::Command => b'C',
            ControllerCmd::Ready => b'R',
        }
    }
}

/// Response tags sent by the client back to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Action performed successfully
    Okay,
    /// Message received, action still pending
    Ack,
    /// Client finished booting
    Ready,
    /// Action failed
    Error,
    /// Client cannot take the action right now
    Busy,
}

impl ResponseKind {
    /// Parse a tag from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'O' => Some(ResponseKind::Okay),
            b'A' => Some(ResponseKind::Ack),
            b'R' => Some(ResponseKind::Ready),
            b'E' => Some(ResponseKind::Error),
            b'B' => Some(ResponseKind::Busy),
            _ => None,
        }
    }

    /// Convert to the wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            ResponseKind::Okay => b'O',
            ResponseKind::Ack => b'A',
            ResponseKind::Ready => b'R',
            ResponseKind::Error => b'E',
            ResponseKind::Busy => b'B',
        }
    }
}

/// One record as exchanged over the link, without the sentinels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireRecord {
    /// Command-class tag byte
    pub cmd: u8,
    /// Zero-padded payload text
    pub data: [u8; DATA_SIZE],
}

impl WireRecord {
    /// Build a record with the `{command_id:03},{text}` payload convention
    ///
    /// `text` is truncated deterministically to the remaining payload
    /// capacity; the rest of DATA stays zero-padded.
    pub fn new(cmd: u8, command_id: u8, text: &str) -> Self {
        let mut data = [0u8; DATA_SIZE];
        data[0] = b'0' + command_id / 100;
        data[1] = b'0' + (command_id / 10) % 10;
        data[2] = b'0' + command_id % 10;
        data[3] = b',';

        let text = text.as_bytes();
        let len = text.len().min(DATA_SIZE - 4);
        data[4..4 + len].copy_from_slice(&text[..len]);

        Self { cmd, data }
    }

    /// Build a client response record
    pub fn response(kind: ResponseKind, command_id: u8, text: &str) -> Self {
        Self::new(kind.to_byte(), command_id, text)
    }

    /// Build a controller command record (used by tests and simulation)
    pub fn command(command_id: u8, text: &str) -> Self {
        Self::new(ControllerCmd::Command.to_byte(), command_id, text)
    }

    /// Build the boot announcement record
    pub fn ready() -> Self {
        Self::new(ResponseKind::Ready.to_byte(), 0, "")
    }

    /// Serialize into the full on-wire layout, sentinels included
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut raw = [0u8; RECORD_SIZE];
        raw[0] = RECORD_HEAD;
        raw[1] = self.cmd;
        raw[2..2 + DATA_SIZE].copy_from_slice(&self.data);
        raw[RECORD_SIZE - 1] = RECORD_TAIL;
        raw
    }

    /// Deserialize from the full on-wire layout
    pub fn decode(raw: &[u8; RECORD_SIZE]) -> Result<Self, RecordError> {
        if raw[0] != RECORD_HEAD || raw[RECORD_SIZE - 1] != RECORD_TAIL {
            return Err(RecordError::BadSentinel);
        }
        let mut data = [0u8; DATA_SIZE];
        data.copy_from_slice(&raw[2..2 + DATA_SIZE]);
        Ok(Self { cmd: raw[1], data })
    }
}
