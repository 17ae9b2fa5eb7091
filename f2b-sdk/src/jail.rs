#![forbid(unsafe_code)]

//! Per-jail operations.

use crate::{client::Fail2banClient, status::JailStatus, transport::Transport};
use f2b_core::{Error, Reply, Result};

impl<T: Transport> Fail2banClient<T> {
    pub async fn jail_status(&self, jail: &str) -> Result<JailStatus> {
        JailStatus::from_reply(&self.command(&["status", jail]).await?)
    }

    pub async fn jail_fail_regex(&self, jail: &str) -> Result<Vec<String>> {
        self.command(&["get", jail, "failregex"]).await?.string_list("failregex")
    }

    /// Returns the jail's failregex list after the addition.
    pub async fn jail_add_fail_regex(&self, jail: &str, regex: &str) -> Result<Vec<String>> {
        self.command(&["set", jail, "addfailregex", regex]).await?.string_list("addfailregex")
    }

    /// Removes `regex` by its current position. Fails with
    /// [`Error::RegexNotFound`] without touching the jail when it is absent.
    pub async fn jail_delete_fail_regex(&self, jail: &str, regex: &str) -> Result<Vec<String>> {
        let current = self.jail_fail_regex(jail).await?;
        let index = current
            .iter()
            .position(|r| r == regex)
            .ok_or_else(|| Error::RegexNotFound { jail: jail.to_string(), regex: regex.to_string() })?;
        self.command(&["set", jail, "delfailregex", &index.to_string()])
            .await?
            .string_list("delfailregex")
    }

    pub async fn jail_ban_ip(&self, jail: &str, ip: &str) -> Result<String> {
        self.command(&["set", jail, "banip", ip]).await?.scalar_text("banip")
    }

    pub async fn jail_unban_ip(&self, jail: &str, ip: &str) -> Result<String> {
        self.command(&["set", jail, "unbanip", ip]).await?.scalar_text("unbanip")
    }

    pub async fn jail_find_time(&self, jail: &str) -> Result<i64> {
        self.command(&["get", jail, "findtime"]).await?.as_int("findtime")
    }

    pub async fn jail_set_find_time(&self, jail: &str, seconds: i64) -> Result<i64> {
        self.command(&["set", jail, "findtime", &seconds.to_string()]).await?.as_int("findtime")
    }

    pub async fn jail_max_retry(&self, jail: &str) -> Result<i64> {
        self.command(&["get", jail, "maxretry"]).await?.as_int("maxretry")
    }

    pub async fn jail_set_max_retry(&self, jail: &str, max_retry: i64) -> Result<i64> {
        self.command(&["set", jail, "maxretry", &max_retry.to_string()]).await?.as_int("maxretry")
    }

    pub async fn jail_ban_time(&self, jail: &str) -> Result<i64> {
        self.command(&["get", jail, "bantime"]).await?.as_int("bantime")
    }

    pub async fn jail_set_ban_time(&self, jail: &str, seconds: i64) -> Result<i64> {
        self.command(&["set", jail, "bantime", &seconds.to_string()]).await?.as_int("bantime")
    }

    pub async fn jail_use_dns(&self, jail: &str) -> Result<String> {
        self.command(&["get", jail, "usedns"]).await?.scalar_text("usedns")
    }

    pub async fn jail_set_use_dns(&self, jail: &str, mode: &str) -> Result<String> {
        self.command(&["set", jail, "usedns", mode]).await?.scalar_text("usedns")
    }

    pub async fn jail_actions(&self, jail: &str) -> Result<Vec<String>> {
        self.command(&["get", jail, "actions"]).await?.string_list("actions")
    }

    /// An unset property comes back as `None` and renders as `"None"`.
    pub async fn jail_action_property(&self, jail: &str, action: &str, property: &str) -> Result<String> {
        match self.command(&["get", jail, "action", action, property]).await? {
            Reply::None => Ok("None".to_string()),
            other => other.scalar_text(property),
        }
    }
}
