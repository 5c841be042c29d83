use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thread_msg::{Announcement, PostFragment};
use thread_ref::{IdentityKey, LocalId};

use crate::live::FooterPosition;
use crate::notifier::Notifier;
use crate::{Badge, ThreadView};

/// One interaction or live event, as delivered by the host.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    HoverHeader { post: LocalId },
    LeaveHeader { post: LocalId },
    ClickHeader { post: LocalId },
    HoverPostNo { post: LocalId },
    ClickQuote { post: LocalId },
    HoverReplyTarget { post: LocalId },
    ClickReplyTarget { post: LocalId },
    HoverReplyLink { post: LocalId, reply: LocalId },
    ClickReplyLink { post: LocalId, reply: LocalId },
    LeaveLink,
    HoverNotifier { post: LocalId, notifier: Notifier },
    LeaveNotifier { post: LocalId },
    ToggleFold { post: LocalId },
    PostInserted {
        fragment: PostFragment,
        /// Absent when the host did not measure the page; the view then
        /// stays where it is.
        #[serde(default)]
        footer: Option<FooterPosition>,
    },
    SetIdentity { identity: Option<IdentityKey> },
}

impl Command {
    pub fn from_json(json: &str) -> Result<Self, crate::Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// The row a command acts on, when it names one that must already exist.
    fn post(&self) -> Option<LocalId> {
        match *self {
            Command::HoverHeader { post }
            | Command::LeaveHeader { post }
            | Command::ClickHeader { post }
            | Command::HoverPostNo { post }
            | Command::ClickQuote { post }
            | Command::HoverReplyTarget { post }
            | Command::ClickReplyTarget { post }
            | Command::HoverReplyLink { post, .. }
            | Command::ClickReplyLink { post, .. }
            | Command::HoverNotifier { post, .. }
            | Command::LeaveNotifier { post }
            | Command::ToggleFold { post } => Some(post),
            Command::LeaveLink | Command::PostInserted { .. } | Command::SetIdentity { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollTarget {
    Post(LocalId),
    Composer,
}

/// Work the host has to carry out after a command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    ScrollTo { target: ScrollTarget },
    /// Fill the reply-to field with `reply_to` and focus the comment box.
    Compose { reply_to: LocalId },
    Announce { event: Announcement },
    Badge { badge: Option<Badge> },
}

impl ThreadView {
    /// Runs one command to completion. Commands naming posts outside the
    /// view and failed live merges are logged and dropped.
    pub fn dispatch(&mut self, command: Command) -> Vec<Effect> {
        if let Some(post) = command.post() {
            if !self.thread.contains(post) {
                debug!("{:?} names unknown post {}, ignoring", command, post);
                return Vec::new();
            }
        }

        match command {
            Command::HoverHeader { post } => self.hover_header(post),
            Command::LeaveHeader { post } => self.leave_header(post),
            Command::ClickHeader { post } => self.click_header(post),
            Command::HoverPostNo { post } => self.hover_post_no(post),
            Command::ClickQuote { post } => self.click_quote(post),
            Command::HoverReplyTarget { post } => self.hover_reply_target(post),
            Command::ClickReplyTarget { post } => self.click_reply_target(post),
            Command::HoverReplyLink { post, reply } => self.hover_reply_link(post, reply),
            Command::ClickReplyLink { post, reply } => self.click_reply_link(post, reply),
            Command::LeaveLink => self.leave_link(),
            Command::HoverNotifier { post, notifier } => self.hover_notifier(post, notifier),
            Command::LeaveNotifier { post } => self.leave_notifier(post),
            Command::ToggleFold { post } => self.toggle_fold(post),
            Command::PostInserted { fragment, footer } => {
                let id = fragment.id;
                let viewport = footer.map(|footer| self.viewport_at(footer)).unwrap_or_default();
                match self.insert_post(fragment, viewport) {
                    Ok(effects) => effects,
                    Err(err) => {
                        warn!("Dropped live post {}: {}", id, err);
                        Vec::new()
                    }
                }
            }
            Command::SetIdentity { identity } => self.set_identity(identity),
        }
    }
}
