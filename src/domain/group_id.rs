//! Group identifier normalization.
//!
//! Accepts usernames (`@name`, `name`), links (`t.me/name`, `https://telegram.me/name/42`)
//! and numeric ids (`-1001234567890`).

use crate::domain::DomainError;
use std::fmt;

const LINK_HOSTS: &[&str] = &["t.me/", "telegram.me/", "telegram.dog/"];
const MIN_USERNAME_LEN: usize = 5;
const MAX_USERNAME_LEN: usize = 32;

/// A validated group identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupId {
    /// Public username, stored without the leading `@`.
    Username(String),
    /// Bot-API style dialog id (e.g. `-100...` for supergroups).
    Numeric(i64),
}

impl GroupId {
    /// Parse and normalize user input into a group identifier.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidGroupId(
                "Group ID must be a non-empty string".into(),
            ));
        }

        if is_numeric_id(trimmed) {
            return trimmed.parse::<i64>().map(GroupId::Numeric).map_err(|_| {
                DomainError::InvalidGroupId(format!("Invalid numeric group ID: \"{}\"", trimmed))
            });
        }

        let name = match extract_username(trimmed) {
            Some(name) => name,
            None => bare_name(trimmed).to_string(),
        };
        let name = name.as_str();

        if name.is_empty() || !name.chars().all(is_username_char) {
            return Err(DomainError::InvalidGroupId(format!(
                "Invalid group username format: \"{}\". \
                 Username can only contain letters, numbers, and underscores.",
                name
            )));
        }

        let len = name.chars().count();
        if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
            return Err(DomainError::InvalidGroupId(format!(
                "Invalid username length: {}. Telegram usernames must be {}-{} characters long.",
                len, MIN_USERNAME_LEN, MAX_USERNAME_LEN
            )));
        }

        Ok(GroupId::Username(name.to_string()))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupId::Username(name) => write!(f, "@{}", name),
            GroupId::Numeric(id) => write!(f, "{}", id),
        }
    }
}

/// Pull the username out of a `t.me` / `telegram.me` / `telegram.dog` link anywhere in `url`.
pub fn extract_username(url: &str) -> Option<String> {
    let lower = url.to_ascii_lowercase();
    for host in LINK_HOSTS {
        if let Some(pos) = lower.find(host) {
            let name: String = url[pos + host.len()..]
                .chars()
                .take_while(|c| is_username_char(*c))
                .collect();
            if !name.is_empty() {
                return Some(name);
            }
        }
    }
    None
}

/// Input without a recognizable link: strip scheme, host and `@`, keep the first path segment.
fn bare_name(input: &str) -> &str {
    let mut rest = input;
    for scheme in ["https://", "http://"] {
        if let Some(r) = strip_prefix_ci(rest, scheme) {
            rest = r;
            break;
        }
    }
    for host in LINK_HOSTS {
        if let Some(r) = strip_prefix_ci(rest, host) {
            rest = r;
            break;
        }
    }
    let rest = rest.strip_prefix('@').unwrap_or(rest);
    rest.split('/')
        .next()
        .unwrap_or_default()
        .split('?')
        .next()
        .unwrap_or_default()
        .trim()
}

fn is_numeric_id(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// ASCII case-insensitive `strip_prefix`.
fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}
