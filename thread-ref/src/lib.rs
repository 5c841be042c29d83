use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, num::ParseIntError};
use thiserror::Error as ThisError;
use urlencoding::{decode, encode};

mod color;
pub use color::Hsl;

#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RefError {
    #[error("Does not match as {ref_type}: {input}")]
    BadFormat {
        ref_type: &'static str,
        input: String,
    },
    #[error("Failed to parse number: {0}")]
    ParseInt(#[from] ParseIntError),
}

// Rendered attributes arrive either as JSON numbers or as attribute strings.
#[doc(hidden)]
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// Sequence-local post number, unique within one thread view. Zero is
/// reserved as the "no reply target" sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "RawId")]
pub struct LocalId(u64);

impl LocalId {
    pub fn new(value: u64) -> Result<Self, RefError> {
        if value == 0 {
            Err(RefError::BadFormat {
                ref_type: "LocalId",
                input: value.to_string(),
            })
        } else {
            Ok(Self(value))
        }
    }

    pub fn from_string(string: String) -> Result<Self, RefError> {
        let trimmed = string.trim();
        if !Self::is_match(trimmed) {
            return Err(RefError::BadFormat {
                ref_type: "LocalId",
                input: string,
            });
        }
        Self::new(trimmed.parse()?)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn single_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex = Regex::new("^[0-9]+$").unwrap();
        }
        &RE
    }

    pub fn is_match(string: &str) -> bool {
        Self::single_regex().is_match(string)
    }

    pub fn to_anchor(&self) -> String {
        format!("#{}", self.0)
    }

    pub fn to_page_url(&self, thread_id: &ThreadId) -> String {
        format!("{}{}", thread_id.to_page_url(), self.to_anchor())
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for LocalId {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LocalId::from_string(value)
    }
}

impl TryFrom<RawId> for LocalId {
    type Error = RefError;

    fn try_from(value: RawId) -> Result<Self, Self::Error> {
        match value {
            RawId::Number(n) => LocalId::new(n),
            RawId::Text(s) => LocalId::from_string(s),
        }
    }
}

/// Cross-thread post number, used by moderation only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "RawId")]
pub struct GlobalId(u64);

impl GlobalId {
    pub fn from_string(string: String) -> Result<Self, RefError> {
        let trimmed = string.trim();
        if !LocalId::is_match(trimmed) {
            return Err(RefError::BadFormat {
                ref_type: "GlobalId",
                input: string,
            });
        }
        Ok(Self(trimmed.parse()?))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<RawId> for GlobalId {
    type Error = RefError;

    fn try_from(value: RawId) -> Result<Self, Self::Error> {
        GlobalId::from_string(value.into_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String")]
pub struct ThreadId(String);

impl ThreadId {
    pub fn from_string(string: String) -> Result<Self, RefError> {
        if !Self::is_match(string.as_str()) {
            Err(RefError::BadFormat {
                ref_type: "Thread",
                input: string,
            })
        } else {
            Ok(Self(string))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn single_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex = Regex::new("^[A-Za-z0-9_-]+$").unwrap();
        }
        &RE
    }

    pub fn is_match(string: &str) -> bool {
        Self::single_regex().is_match(string)
    }

    pub fn to_page_url(&self) -> String {
        format!("/t/{}", encode(self.0.as_str()))
    }

    /// Key scoping a user's identity to one load of this thread.
    pub fn identity_scope(&self, view_marker: u64) -> String {
        format!("thread_{}_{}", self.0, view_marker)
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for ThreadId {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ThreadId::from_string(value)
    }
}

/// Per-view author marker. Posts sharing a key were written by the same
/// author within this view.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "RawId")]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn from_string(string: String) -> Result<Self, RefError> {
        if !Self::is_match(string.as_str()) {
            Err(RefError::BadFormat {
                ref_type: "Identity",
                input: string,
            })
        } else {
            Ok(Self(string))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(string: &str) -> bool {
        lazy_static! {
            static ref RE: Regex = Regex::new(r"^\S+$").unwrap();
        }
        RE.is_match(string)
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl TryFrom<RawId> for IdentityKey {
    type Error = RefError;

    fn try_from(value: RawId) -> Result<Self, Self::Error> {
        IdentityKey::from_string(value.into_string())
    }
}

/// The post a reply points at. `0`, `"none"`, the empty string and `null`
/// all mean the post is root-level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(try_from = "Option<RawId>", into = "Option<u64>")]
pub enum ReplyTarget {
    #[default]
    Root,
    Post(LocalId),
}

impl ReplyTarget {
    pub fn from_string(string: String) -> Result<Self, RefError> {
        match string.trim() {
            "" | "0" | "none" => Ok(ReplyTarget::Root),
            _ => Ok(ReplyTarget::Post(LocalId::from_string(string)?)),
        }
    }

    pub fn local_id(&self) -> Option<LocalId> {
        match self {
            ReplyTarget::Root => None,
            ReplyTarget::Post(id) => Some(*id),
        }
    }
}

impl From<Option<LocalId>> for ReplyTarget {
    fn from(value: Option<LocalId>) -> Self {
        value.map_or(ReplyTarget::Root, ReplyTarget::Post)
    }
}

impl TryFrom<Option<RawId>> for ReplyTarget {
    type Error = RefError;

    fn try_from(value: Option<RawId>) -> Result<Self, Self::Error> {
        match value {
            None => Ok(ReplyTarget::Root),
            Some(raw) => ReplyTarget::from_string(raw.into_string()),
        }
    }
}

impl From<ReplyTarget> for Option<u64> {
    fn from(value: ReplyTarget) -> Option<u64> {
        value.local_id().map(|id| id.value())
    }
}

/// Reads the `pivot` parameter of a page query string, e.g. `?pivot=12`.
pub fn pivot_from_query(query: &str) -> Option<LocalId> {
    lazy_static! {
        static ref PAIR_RE: Regex = Regex::new("([^&=?]+)=([^&]*)").unwrap();
    }

    PAIR_RE.captures_iter(query).find_map(|caps| {
        let key = decode(&caps[1]).ok()?;
        if key != "pivot" {
            return None;
        }
        let value = decode(&caps[2]).ok()?;
        LocalId::from_string(value.into_owned()).ok()
    })
}
