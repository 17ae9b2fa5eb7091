#![forbid(unsafe_code)]

//! Framing for the fail2ban control socket.
//!
//! A frame is a pickled object followed by [`END_COMMAND`]. Clients send a
//! list of str tokens; the daemon answers with a `(code, value)` pair where
//! code 0 means success. [`CLOSE_COMMAND`] framed the same way asks the daemon
//! to drop the connection.

use crate::{
	error::{Error, Result},
	reply::Reply,
};
use serde_pickle::{DeOptions, SerOptions, Value};

pub const END_COMMAND: &[u8] = b"<F2B_END_COMMAND>";
pub const CLOSE_COMMAND: &[u8] = b"<F2B_CLOSE_COMMAND>";

pub fn encode_command<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<u8>> {
	let list = Value::List(tokens.iter().map(|t| Value::String(t.as_ref().to_owned())).collect());
	let mut out = serde_pickle::value_to_vec(&list, SerOptions::new())?;
	out.extend_from_slice(END_COMMAND);
	Ok(out)
}

pub fn close_frame() -> Vec<u8> { [CLOSE_COMMAND, END_COMMAND].concat() }

/// Offset of the terminator in `buf`, if a full frame has arrived.
pub fn frame_end(buf: &[u8]) -> Option<usize> { memchr::memmem::find(buf, END_COMMAND) }

/// Decode a daemon answer (terminator already stripped).
pub fn decode_reply(frame: &[u8]) -> Result<Reply> {
	let value = serde_pickle::value_from_slice(frame, DeOptions::new().replace_unresolved_globals())?;
	let envelope = Reply::try_from(value)?;
	let items = envelope.as_list("reply envelope")?;
	let [code, payload] = items else {
		return Err(Error::protocol(format!("reply envelope has {} element(s), expected 2", items.len())));
	};
	match code.as_int("reply code")? {
		0 => Ok(payload.clone()),
		code => Err(Error::Daemon { code, message: daemon_message(payload) }),
	}
}

fn daemon_message(payload: &Reply) -> String {
	match payload {
		Reply::Str(s) => s.clone(),
		Reply::None => "no detail (exception object not representable)".into(),
		other => other.to_string(),
	}
}

/// Decode a client command frame; the daemon side of [`encode_command`].
pub fn decode_command(frame: &[u8]) -> Result<Vec<String>> {
	let value = serde_pickle::value_from_slice(frame, DeOptions::new())?;
	Reply::try_from(value)?.string_list("command")
}

/// Encode a daemon answer; the daemon side of [`decode_reply`].
pub fn encode_reply(code: i64, payload: &Reply) -> Result<Vec<u8>> {
	let envelope = Value::Tuple(vec![Value::I64(code), Value::try_from(payload)?]);
	let mut out = serde_pickle::value_to_vec(&envelope, SerOptions::new())?;
	out.extend_from_slice(END_COMMAND);
	Ok(out)
}
