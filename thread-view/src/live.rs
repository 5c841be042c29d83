use log::{debug, trace};
use serde::Deserialize;
use thread_graph::Post;
use thread_msg::{Announcement, PostFragment};
use thread_ref::ReplyTarget;

use crate::command::{Effect, ScrollTarget};
use crate::{Error, ThreadView};

/// Scroll position the host measured just before handing over a fragment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Viewport {
    #[serde(default)]
    pub at_bottom: bool,
}

/// Bounding box of the page footer, relative to the window.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct FooterRect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

/// Footer box and window size, measured by the host just before a fragment
/// is handed over.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct FooterPosition {
    pub rect: FooterRect,
    pub window_width: f64,
    pub window_height: f64,
}

impl Viewport {
    /// The view counts as scrolled to the bottom while the footer is inside
    /// the window, give or take `margin` past its far edges.
    pub fn from_footer(footer: FooterRect, width: f64, height: f64, margin: f64) -> Self {
        Viewport {
            at_bottom: footer.top >= 0.0
                && footer.left >= 0.0
                && footer.bottom <= height + margin
                && footer.right <= width + margin,
        }
    }
}

impl ThreadView {
    /// Whether `footer` counts as scrolled to the bottom under the configured
    /// stay-down margin.
    pub fn viewport_at(&self, footer: FooterPosition) -> Viewport {
        Viewport::from_footer(
            footer.rect,
            footer.window_width,
            footer.window_height,
            self.config.stay_down_margin,
        )
    }

    /// Merges a post pushed over the live connection. Every step completes
    /// before the next starts; the returned effects are in step order.
    pub fn insert_post(&mut self, fragment: PostFragment, viewport: Viewport) -> Result<Vec<Effect>, Error> {
        let PostFragment { id, post } = fragment;
        if post.local_id != id {
            return Err(Error::AnchorMismatch {
                fragment: id,
                rendered: post.local_id,
            });
        }

        let mut post = Post::from(post);
        if let Some(target) = post.reply_target.local_id() {
            if target == id || !self.thread.contains(target) {
                debug!("post {} replies to missing post {}, treating as root", id, target);
                post.reply_target = ReplyTarget::Root;
            }
        }

        trace!("append post {}", id);
        self.thread.push(post)?;
        self.rows.entry(id).or_default();

        match self.thread.bind_reply(id) {
            Some(target) => trace!("post {} links back from {}", target, id),
            None => trace!("post {} has no reply target", id),
        }

        trace!("decorate post {}", id);
        self.decorate(id);

        let mut effects = vec![Effect::Announce {
            event: Announcement::InsertedPost { id },
        }];

        trace!("refresh identity badge");
        effects.push(Effect::Badge { badge: self.badge() });

        let hidden = self.fold.hides_inserted(&self.thread, &self.rows, id);
        let folded = self.fold.pivot().is_some();
        if let Some(row) = self.rows.get_mut(&id) {
            row.hidden = hidden;
            row.fold.kept = folded && !hidden;
        }
        if hidden {
            trace!("post {} falls outside the fold, hiding", id);
        }

        if viewport.at_bottom {
            effects.push(Effect::ScrollTo {
                target: ScrollTarget::Composer,
            });
        }
        Ok(effects)
    }
}
