// Attribute sets the templating collaborator renders for every post row,
// plus the events exchanged with the live transport.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};
use thread_ref::{GlobalId, Hsl, IdentityKey, LocalId, ReplyTarget, ThreadId};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum MsgError {
    #[error("Failed to parse JSON, cause: {0}")]
    Json(#[from] serde_json::Error),
}

#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PostAttrs {
    #[serde(alias = "post_lid")]
    pub local_id: LocalId,
    #[serde(alias = "post_gid")]
    pub global_id: GlobalId,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    #[serde(alias = "target")]
    pub reply_target: ReplyTarget,
    #[serde(alias = "user")]
    pub identity: IdentityKey,
    pub color: Hsl,
    /// Glyph identifying the author in this thread.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub marker: Option<String>,
    /// Rendered comment markup. Opaque to the engine.
    #[serde(default)]
    pub comment: String,
    /// Placeholder row standing in for omitted posts.
    #[serde(default)]
    pub omission: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    #[default]
    Thread,
    Query,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ThreadAttrs {
    pub thread_id: ThreadId,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    #[serde(alias = "random_mark")]
    pub view_marker: u64,
    #[serde(default)]
    pub page_type: PageType,
    #[serde(default)]
    pub posts: Vec<PostAttrs>,
}

impl ThreadAttrs {
    pub fn from_json(json: &str) -> Result<Self, MsgError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A freshly rendered post pushed over the live connection, keyed by the
/// local id the host will look it up under.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PostFragment {
    pub id: LocalId,
    pub post: PostAttrs,
}

/// Events broadcast to collaborators outside the engine.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", content = "detail")]
pub enum Announcement {
    #[serde(rename = "insertedPost")]
    InsertedPost { id: LocalId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_attrs_from_rendered_strings() {
        let json = r#"{
            "post_lid": "4",
            "post_gid": "1093",
            "target": "2",
            "user": "9f2c",
            "color": { "hue": 200, "saturation": 100, "lightness": 30 },
            "marker": "丼"
        }"#;
        let attrs: PostAttrs = serde_json::from_str(json).unwrap();
        assert_eq!(attrs.local_id.value(), 4);
        assert_eq!(attrs.global_id.value(), 1093);
        assert_eq!(
            attrs.reply_target,
            ReplyTarget::Post(LocalId::new(2).unwrap())
        );
        assert_eq!(attrs.identity.as_str(), "9f2c");
        assert_eq!(attrs.color.hue, 200);
        assert_eq!(attrs.marker.as_deref(), Some("丼"));
        assert!(!attrs.omission);
    }

    #[test]
    fn test_bad_reply_target_is_root() {
        let json = r#"{
            "local_id": 5,
            "global_id": 6,
            "reply_target": "not-a-number",
            "identity": "a",
            "color": { "hue": 0, "saturation": 0, "lightness": 0 }
        }"#;
        let attrs: PostAttrs = serde_json::from_str(json).unwrap();
        assert_eq!(attrs.reply_target, ReplyTarget::Root);
    }

    #[test]
    fn test_missing_and_sentinel_reply_target() {
        for target in ["", r#", "reply_target": 0"#, r#", "reply_target": "none""#] {
            let json = format!(
                r#"{{"local_id": 1, "global_id": 1, "identity": "a",
                    "color": {{ "hue": 0, "saturation": 0, "lightness": 0 }}{}}}"#,
                target
            );
            let attrs: PostAttrs = serde_json::from_str(&json).unwrap();
            assert_eq!(attrs.reply_target, ReplyTarget::Root);
        }
    }

    #[test]
    fn test_thread_attrs_defaults() {
        let attrs = ThreadAttrs::from_json(r#"{ "thread_id": "abc" }"#).unwrap();
        assert_eq!(attrs.thread_id.as_str(), "abc");
        assert!(!attrs.locked);
        assert_eq!(attrs.page_type, PageType::Thread);
        assert!(attrs.posts.is_empty());
    }

    #[test]
    fn test_announcement_shape() {
        let event = Announcement::InsertedPost {
            id: LocalId::new(12).unwrap(),
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"type":"insertedPost","detail":{"id":12}}"#
        );
    }
}
