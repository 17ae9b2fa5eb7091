#![forbid(unsafe_code)]

//! Decoded daemon values.
//!
//! The daemon answers with arbitrary Python objects. `Reply` keeps the kinds
//! the control protocol actually produces and every accessor checks the kind
//! before handing out data, so a malformed answer becomes an [`Error::Shape`]
//! instead of a panic further up.

use crate::error::{Error, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
	None,
	Bool(bool),
	Int(i64),
	Float(f64),
	Str(String),
	Bytes(Vec<u8>),
	List(Vec<Reply>),
	Tuple(Vec<Reply>),
	Dict(Vec<(Reply, Reply)>),
}

/// A `(label, value)` pair as used by status answers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Labeled<'a> {
	pub label: &'a str,
	pub value: &'a Reply,
}

impl Reply {
	pub fn str(s: impl Into<String>) -> Self { Self::Str(s.into()) }

	pub fn pair(label: impl Into<String>, value: impl Into<Reply>) -> Self {
		Self::Tuple(vec![Self::Str(label.into()), value.into()])
	}

	pub fn list<I, T>(items: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<Reply>,
	{
		Self::List(items.into_iter().map(Into::into).collect())
	}

	pub fn kind(&self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::Str(_) => "str",
			Self::Bytes(_) => "bytes",
			Self::List(_) => "list",
			Self::Tuple(_) => "tuple",
			Self::Dict(_) => "dict",
		}
	}

	pub fn is_none(&self) -> bool { matches!(self, Self::None) }

	pub fn as_int(&self, context: &str) -> Result<i64> {
		match self {
			Self::Int(n) => Ok(*n),
			other => Err(Error::shape(context, "int", other.kind())),
		}
	}

	/// UTF-8 bytes are accepted as text; Python 2 era daemons send those.
	pub fn as_str(&self, context: &str) -> Result<&str> {
		match self {
			Self::Str(s) => Ok(s),
			Self::Bytes(b) => std::str::from_utf8(b).map_err(|_| Error::shape(context, "str", "non-utf8 bytes")),
			other => Err(Error::shape(context, "str", other.kind())),
		}
	}

	pub fn as_list(&self, context: &str) -> Result<&[Reply]> {
		match self {
			Self::List(items) | Self::Tuple(items) => Ok(items),
			other => Err(Error::shape(context, "list", other.kind())),
		}
	}

	/// Sequence holding at least `min` elements.
	pub fn expect_arity(&self, min: usize, context: &str) -> Result<&[Reply]> {
		let items = self.as_list(context)?;
		if items.len() < min {
			return Err(Error::shape(context, "longer sequence", format!("{} of {} element(s), need {min}", self.kind(), items.len())));
		}
		Ok(items)
	}

	pub fn as_labeled(&self, context: &str) -> Result<Labeled<'_>> {
		let items = self.as_list(context)?;
		if items.len() != 2 {
			return Err(Error::shape(context, "labeled pair", format!("{} of {} element(s)", self.kind(), items.len())));
		}
		Ok(Labeled { label: items[0].as_str(context)?, value: &items[1] })
	}

	pub fn string_list(&self, context: &str) -> Result<Vec<String>> {
		self.as_list(context)?
			.iter()
			.map(|item| item.as_str(context).map(str::to_owned))
			.collect()
	}

	/// Text form of a scalar answer; integers and strings render identically.
	pub fn scalar_text(&self, context: &str) -> Result<String> {
		match self {
			Self::Int(n) => Ok(n.to_string()),
			Self::Str(_) | Self::Bytes(_) => self.as_str(context).map(str::to_owned),
			Self::Bool(b) => Ok(if *b { "True" } else { "False" }.to_string()),
			Self::Float(f) => Ok(f.to_string()),
			other => Err(Error::shape(context, "scalar", other.kind())),
		}
	}
}

impl From<i64> for Reply {
	fn from(n: i64) -> Self { Self::Int(n) }
}

impl From<bool> for Reply {
	fn from(b: bool) -> Self { Self::Bool(b) }
}

impl From<&str> for Reply {
	fn from(s: &str) -> Self { Self::Str(s.to_string()) }
}

impl From<String> for Reply {
	fn from(s: String) -> Self { Self::Str(s) }
}

impl From<Vec<Reply>> for Reply {
	fn from(items: Vec<Reply>) -> Self { Self::List(items) }
}

impl TryFrom<serde_pickle::Value> for Reply {
	type Error = Error;

	fn try_from(value: serde_pickle::Value) -> Result<Self> {
		use serde_pickle::Value as P;
		Ok(match value {
			P::None => Self::None,
			P::Bool(b) => Self::Bool(b),
			P::I64(n) => Self::Int(n),
			P::Int(big) => return Err(Error::shape("integer", "64-bit int", big.to_string())),
			P::F64(f) => Self::Float(f),
			P::Bytes(b) => Self::Bytes(b),
			P::String(s) => Self::Str(s),
			P::List(items) => Self::List(convert_all(items)?),
			P::Tuple(items) => Self::Tuple(convert_all(items)?),
			P::Set(items) | P::FrozenSet(items) => {
				Self::List(convert_all(items.into_iter().map(|h| h.into_value()))?)
			}
			P::Dict(map) => Self::Dict(
				map.into_iter()
					.map(|(k, v)| -> Result<(Reply, Reply)> { Ok((Self::try_from(k.into_value())?, Self::try_from(v)?)) })
					.collect::<Result<_>>()?,
			),
		})
	}
}

fn convert_all(items: impl IntoIterator<Item = serde_pickle::Value>) -> Result<Vec<Reply>> {
	items.into_iter().map(Reply::try_from).collect()
}

impl TryFrom<&Reply> for serde_pickle::Value {
	type Error = Error;

	fn try_from(reply: &Reply) -> Result<Self> {
		use serde_pickle::Value as P;
		Ok(match reply {
			Reply::None => P::None,
			Reply::Bool(b) => P::Bool(*b),
			Reply::Int(n) => P::I64(*n),
			Reply::Float(f) => P::F64(*f),
			Reply::Str(s) => P::String(s.clone()),
			Reply::Bytes(b) => P::Bytes(b.clone()),
			Reply::List(items) => P::List(items.iter().map(P::try_from).collect::<Result<_>>()?),
			Reply::Tuple(items) => P::Tuple(items.iter().map(P::try_from).collect::<Result<_>>()?),
			Reply::Dict(entries) => P::Dict(
				entries
					.iter()
					.map(|(k, v)| -> Result<(serde_pickle::HashableValue, P)> { Ok((P::try_from(k)?.into_hashable()?, P::try_from(v)?)) })
					.collect::<Result<_>>()?,
			),
		})
	}
}

/// Python-like rendering, used for daemon error payloads and CLI output.
impl fmt::Display for Reply {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::None => f.write_str("None"),
			Self::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
			Self::Int(n) => write!(f, "{n}"),
			Self::Float(x) => write!(f, "{x}"),
			Self::Str(s) => write!(f, "{s:?}"),
			Self::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
			Self::List(items) => write_seq(f, "[", items, "]"),
			Self::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0]),
			Self::Tuple(items) => write_seq(f, "(", items, ")"),
			Self::Dict(entries) => {
				f.write_str("{")?;
				for (i, (k, v)) in entries.iter().enumerate() {
					if i > 0 { f.write_str(", ")?; }
					write!(f, "{k}: {v}")?;
				}
				f.write_str("}")
			}
		}
	}
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Reply], close: &str) -> fmt::Result {
	f.write_str(open)?;
	for (i, item) in items.iter().enumerate() {
		if i > 0 { f.write_str(", ")?; }
		write!(f, "{item}")?;
	}
	f.write_str(close)
}
