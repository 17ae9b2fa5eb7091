#![forbid(unsafe_code)]

//! Typed views of `status` answers.
//!
//! The daemon sends status as nested `(label, value)` pairs in a fixed order.
//! All positional knowledge about those answers lives here.

use f2b_core::{Labeled, Reply, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JailStatus {
    pub filter: FilterStatus,
    pub actions: ActionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterStatus {
    pub currently_failed: i64,
    pub total_failed: i64,
    /// Monitored log files, or journal matches on systemd backends.
    pub file_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionStatus {
    pub currently_banned: i64,
    pub total_banned: i64,
    pub banned_ips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerStatus {
    pub jail_count: i64,
    pub jails: Vec<String>,
}

impl JailStatus {
    pub fn from_reply(reply: &Reply) -> Result<Self> {
        let sections = reply.expect_arity(2, "jail status")?;
        let filter = sections[0].as_labeled("jail status")?;
        let actions = sections[1].as_labeled("jail status")?;

        let (currently_failed, total_failed, files) = counted_section(filter)?;
        let (currently_banned, total_banned, ips) = counted_section(actions)?;
        Ok(Self {
            filter: FilterStatus { currently_failed, total_failed, file_list: optional_list(files)? },
            actions: ActionStatus { currently_banned, total_banned, banned_ips: optional_list(ips)? },
        })
    }
}

impl ServerStatus {
    pub fn from_reply(reply: &Reply) -> Result<Self> {
        let fields = reply.expect_arity(2, "server status")?;
        let count = fields[0].as_labeled("server status")?;
        let list = fields[1].as_labeled("server status")?;
        let jail_count = count.value.as_int(count.label)?;
        let jails = list
            .value
            .as_str(list.label)?
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect();
        Ok(Self { jail_count, jails })
    }
}

/// `[(current, n), (total, n), (list label, list)]`; returns both counts and the raw list.
fn counted_section<'a>(section: Labeled<'a>) -> Result<(i64, i64, Labeled<'a>)> {
    let fields = section.value.expect_arity(3, section.label)?;
    let current = fields[0].as_labeled(section.label)?;
    let total = fields[1].as_labeled(section.label)?;
    let list = fields[2].as_labeled(section.label)?;
    Ok((current.value.as_int(current.label)?, total.value.as_int(total.label)?, list))
}

/// A `None` list means "nothing tracked", anything else must be a list of strings.
fn optional_list(field: Labeled<'_>) -> Result<Vec<String>> {
    if field.value.is_none() {
        return Ok(Vec::new());
    }
    field.value.string_list(field.label)
}
