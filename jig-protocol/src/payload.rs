//! Payload text grammar.
//!
//! DATA carries `{command_id},{command_class}[,{arg}]*` as ASCII text.
//! `command_id` correlates request and response; `command_class` selects
//! the handler. Parsing is deliberately permissive: a malformed numeric
//! id coerces to 0 and an unknown class yields no request at all, which
//! the dispatcher treats as unroutable traffic.

use log::debug;

/// Closed set of command classes routed by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandClass {
    Gpio,
    Usb,
    Uart,
}

impl CommandClass {
    const ALL: [CommandClass; 3] = [CommandClass::Gpio, CommandClass::Usb, CommandClass::Uart];

    /// Payload tag for this class
    pub fn tag(&self) -> &'static str {
        match self {
            CommandClass::Gpio => "GPIO",
            CommandClass::Usb => "USB",
            CommandClass::Uart => "UART",
        }
    }

    /// Match a payload token against the closed tag set
    ///
    /// Case-sensitive prefix match, like the reference client.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| token.starts_with(c.tag()))
    }
}

/// One parsed inbound command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    /// Correlation id, echoed back in the response
    pub command_id: u8,
    /// Handler selector
    pub class: CommandClass,
    /// Remaining comma-separated arguments, possibly empty
    pub args: &'a str,
}

/// View the zero-padded payload region as text
///
/// Returns `None` when the bytes before the padding are not valid UTF-8;
/// such payloads are unroutable noise.
pub fn payload_text(data: &[u8]) -> Option<&str> {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    core::str::from_utf8(&data[..end]).ok()
}

/// Best-effort decimal parse of the command id field
///
/// A malformed field coerces to 0 rather than rejecting the message.
pub fn parse_command_id(token: &str) -> u8 {
    let token = token.trim();
    token.parse().unwrap_or_else(|_| {
        debug!("malformed command id {:?}, coerced to 0", token);
        0
    })
}

/// Parse payload text into a routable request
///
/// Returns `None` when the class token is missing or outside the closed
/// tag set.
pub fn parse_request(text: &str) -> Option<Request<'_>> {
    let mut fields = text.splitn(3, ',');
    let command_id = parse_command_id(fields.next()?);
    let class = CommandClass::from_token(fields.next()?.trim())?;
    let args = fields.next().unwrap_or("");

    Some(Request {
        command_id,
        class,
        args,
    })
}
