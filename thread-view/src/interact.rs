use log::debug;
use std::collections::HashMap;
use thread_ref::{Hsl, IdentityKey, LocalId};

use crate::command::{Effect, ScrollTarget};
use crate::highlight::{RowSignals, Signal, Slot, SlotMask};
use crate::notifier::Notifier;
use crate::ThreadView;

impl ThreadView {
    /// Paints the author header of one row with the pale author color.
    pub fn hover_header(&mut self, id: LocalId) -> Vec<Effect> {
        let pale = match self.author_color(id) {
            Some(pale) if self.is_bound(id) => pale,
            _ => return Vec::new(),
        };
        let signals = RowSignals {
            header: Signal::Color(pale),
            post_no: Signal::Accent,
            reply_target: Signal::Accent,
            body: Signal::Rest,
        };
        self.paint(id, &signals);
        Vec::new()
    }

    pub fn leave_header(&mut self, id: LocalId) -> Vec<Effect> {
        self.paint(id, &RowSignals::rest());
        Vec::new()
    }

    /// Selects or deselects every post by the author of `id`. The clicked
    /// row decides the direction for the whole set.
    pub fn click_header(&mut self, id: LocalId) -> Vec<Effect> {
        let (identity, pale) = match (self.thread.get(id), self.author_color(id)) {
            (Some(post), Some(pale)) if self.is_bound(id) => (post.identity.clone(), pale),
            _ => return Vec::new(),
        };
        let select = !self
            .rows
            .get(&id)
            .map_or(false, |row| row.highlight.is_author_selected());
        let palette = &self.config.palette;

        for post in self.thread.posts_by_identity(&identity) {
            let row = match self.rows.get_mut(&post) {
                Some(row) if row.bound => row,
                _ => continue,
            };
            if select {
                row.highlight.set_ephemeral(
                    &RowSignals {
                        header: Signal::Color(pale),
                        post_no: Signal::Accent,
                        reply_target: Signal::Accent,
                        body: Signal::Color(pale),
                    },
                    palette,
                );
                row.highlight.set_sticky(SlotMask::HEADER_AND_BODY, true);
            } else {
                row.highlight.set_sticky(SlotMask::HEADER_AND_BODY, false);
                row.highlight.clear_ephemeral(palette);
            }
            row.highlight.set_author_selected(select);
        }
        Vec::new()
    }

    /// Highlights the post number of `id` and the bodies of its replies.
    /// Does nothing until some link has asked for the color of `id`.
    pub fn hover_post_no(&mut self, id: LocalId) -> Vec<Effect> {
        let color = match self.rows.get(&id).and_then(|row| row.color) {
            Some(color) if self.is_bound(id) => color,
            _ => return Vec::new(),
        };
        let mut signals = HashMap::new();
        signals.insert(
            id,
            RowSignals {
                post_no: Signal::Accent,
                ..RowSignals::plain()
            },
        );
        for reply in self.replies_of(id) {
            signals.insert(
                reply,
                RowSignals {
                    reply_target: Signal::Accent,
                    body: Signal::Reference(color),
                    ..RowSignals::plain()
                },
            );
        }
        self.paint_all(&signals);
        Vec::new()
    }

    /// Highlights the post `id` replies to and every other reply to it.
    pub fn hover_reply_target(&mut self, id: LocalId) -> Vec<Effect> {
        let target = match self.linked_target(id) {
            Some(target) => target,
            None => return Vec::new(),
        };
        let color = match self.rows.get(&target).and_then(|row| row.color) {
            Some(color) => color,
            None => return Vec::new(),
        };
        let mut signals = HashMap::new();
        for reply in self.replies_of(target) {
            signals.insert(
                reply,
                RowSignals {
                    reply_target: Signal::Accent,
                    ..RowSignals::plain()
                },
            );
        }
        signals.insert(
            target,
            RowSignals {
                post_no: Signal::Accent,
                body: Signal::Reference(color),
                ..RowSignals::plain()
            },
        );
        self.paint_all(&signals);
        Vec::new()
    }

    /// Highlights a back-reference in `post` pointing at `reply`.
    pub fn hover_reply_link(&mut self, post: LocalId, reply: LocalId) -> Vec<Effect> {
        let color = match self.linked_reply(post, reply) {
            Some(color) => color,
            None => return Vec::new(),
        };
        let mut signals = HashMap::new();
        signals.insert(
            post,
            RowSignals {
                post_no: Signal::Accent,
                ..RowSignals::plain()
            },
        );
        signals.insert(
            reply,
            RowSignals {
                reply_target: Signal::Accent,
                body: Signal::Reference(color),
                ..RowSignals::plain()
            },
        );
        self.paint_all(&signals);
        Vec::new()
    }

    /// Mouse-out of any link: every row drops its hover paint.
    pub fn leave_link(&mut self) -> Vec<Effect> {
        let palette = &self.config.palette;
        for row in self.rows.values_mut() {
            row.highlight.clear_ephemeral(palette);
        }
        Vec::new()
    }

    pub fn click_reply_target(&mut self, id: LocalId) -> Vec<Effect> {
        let target = match self.linked_target(id) {
            Some(target) => target,
            None => return Vec::new(),
        };
        self.force_restore_all();
        self.hover_reply_target(id);
        self.stick(target, SlotMask::POST_NO_AND_BODY);
        vec![Effect::ScrollTo {
            target: ScrollTarget::Post(target),
        }]
    }

    pub fn click_reply_link(&mut self, post: LocalId, reply: LocalId) -> Vec<Effect> {
        if self.linked_reply(post, reply).is_none() {
            return Vec::new();
        }
        self.force_restore_all();
        self.hover_reply_link(post, reply);
        self.stick(reply, SlotMask::POST_NO_AND_BODY);
        vec![Effect::ScrollTo {
            target: ScrollTarget::Post(reply),
        }]
    }

    /// Marks `id` as the post being replied to and hands the composer over
    /// to the host.
    pub fn click_quote(&mut self, id: LocalId) -> Vec<Effect> {
        if !self.is_bound(id) {
            return Vec::new();
        }
        self.force_restore_all();
        let body = match self.rows.get(&id).and_then(|row| row.color) {
            Some(color) => Signal::Reference(color),
            None => Signal::Color(self.config.palette.quote),
        };
        self.paint(
            id,
            &RowSignals {
                post_no: Signal::Accent,
                body,
                ..RowSignals::rest()
            },
        );
        self.stick(id, SlotMask::POST_NO_AND_BODY);

        if self.thread.locked() {
            debug!("thread {} is locked, no composer for post {}", self.thread.id(), id);
            return Vec::new();
        }
        vec![
            Effect::Compose { reply_to: id },
            Effect::ScrollTo {
                target: ScrollTarget::Composer,
            },
        ]
    }

    pub fn hover_notifier(&mut self, id: LocalId, notifier: Notifier) -> Vec<Effect> {
        match self.rows.get_mut(&id) {
            Some(row) if row.bound => row.highlight.set_notifier(Some(notifier)),
            _ => debug!("no bound row {} for {} notifier", id, notifier.label()),
        }
        Vec::new()
    }

    pub fn leave_notifier(&mut self, id: LocalId) -> Vec<Effect> {
        if let Some(row) = self.rows.get_mut(&id) {
            row.highlight.set_notifier(None);
        }
        Vec::new()
    }

    pub fn set_identity(&mut self, identity: Option<IdentityKey>) -> Vec<Effect> {
        self.identity = identity;
        vec![Effect::Badge {
            badge: self.badge(),
        }]
    }

    /// Target of `id`, if `id` is bound and its reply-target link carries a
    /// color.
    fn linked_target(&self, id: LocalId) -> Option<LocalId> {
        let row = self.rows.get(&id).filter(|row| row.bound)?;
        row.highlight.slot(Slot::ReplyTarget).accent()?;
        self.thread.target_of(id)
    }

    /// Color of `post`, if it carries a back-reference to `reply`.
    fn linked_reply(&self, post: LocalId, reply: LocalId) -> Option<Hsl> {
        if !self.thread.get(post)?.back_refs().contains(&reply) {
            debug!("post {} has no link back from {}", post, reply);
            return None;
        }
        self.rows.get(&post).and_then(|row| row.color)
    }

    fn replies_of(&self, id: LocalId) -> Vec<LocalId> {
        self.thread
            .get(id)
            .map(|post| post.back_refs().to_vec())
            .unwrap_or_default()
    }

    fn paint(&mut self, id: LocalId, signals: &RowSignals) {
        let palette = &self.config.palette;
        if let Some(row) = self.rows.get_mut(&id).filter(|row| row.bound) {
            row.highlight.set_ephemeral(signals, palette);
        }
    }

    /// Paints every bound row, plain unless `signals` names it.
    fn paint_all(&mut self, signals: &HashMap<LocalId, RowSignals>) {
        let palette = &self.config.palette;
        for (id, row) in self.rows.iter_mut().filter(|(_, row)| row.bound) {
            let row_signals = signals.get(id).copied().unwrap_or_else(RowSignals::plain);
            row.highlight.set_ephemeral(&row_signals, palette);
        }
    }

    fn force_restore_all(&mut self) {
        let palette = &self.config.palette;
        for row in self.rows.values_mut() {
            row.highlight.force_restore(palette);
            row.highlight.set_author_selected(false);
        }
    }

    fn stick(&mut self, id: LocalId, mask: SlotMask) {
        if let Some(row) = self.rows.get_mut(&id).filter(|row| row.bound) {
            row.highlight.set_sticky(mask, true);
        }
    }
}
