//! Collapsing a thread onto the conversation around one post.

use log::{debug, trace};
use std::collections::HashSet;
use thread_graph::Thread;
use thread_ref::LocalId;

use crate::command::{Effect, ScrollTarget};
use crate::row::Rows;

pub const INACTIVE_GLYPH: &str = "◇";
pub const PIVOT_GLYPH: &str = "◆";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FoldState {
    #[default]
    Unfolded,
    Folded {
        pivot: LocalId,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FoldMark {
    pub kept: bool,
    pub pivot: bool,
}

impl FoldMark {
    pub fn glyph(&self) -> &'static str {
        if self.pivot {
            PIVOT_GLYPH
        } else {
            INACTIVE_GLYPH
        }
    }
}

/// Sole owner of the fold pivot.
#[derive(Clone, Debug, Default)]
pub struct FoldController {
    state: FoldState,
}

impl FoldController {
    pub fn state(&self) -> FoldState {
        self.state
    }

    pub fn pivot(&self) -> Option<LocalId> {
        match self.state {
            FoldState::Unfolded => None,
            FoldState::Folded { pivot } => Some(pivot),
        }
    }

    /// Activating the control on the pivot unfolds; on any other post it
    /// refolds around that post.
    pub(crate) fn toggle(&mut self, thread: &Thread, rows: &mut Rows, id: LocalId) -> Vec<Effect> {
        let was_pivot = self.pivot() == Some(id);
        self.unfold(rows);
        if was_pivot {
            Vec::new()
        } else {
            self.fold(thread, rows, id)
        }
    }

    pub(crate) fn fold(&mut self, thread: &Thread, rows: &mut Rows, pivot: LocalId) -> Vec<Effect> {
        if !thread.contains(pivot) {
            debug!("fold requested on missing post {}, ignoring", pivot);
            return Vec::new();
        }
        if self.state != FoldState::Unfolded {
            self.unfold(rows);
        }

        let mut kept: HashSet<LocalId> = thread.descendants(pivot);
        kept.extend(thread.ancestor_chain(pivot));
        kept.insert(pivot);
        trace!("fold on post {}, keeping {} of {}", pivot, kept.len(), thread.len());

        for (id, row) in rows.iter_mut() {
            row.fold = FoldMark {
                kept: kept.contains(id),
                pivot: *id == pivot,
            };
            row.hidden = !row.fold.kept;
        }
        self.state = FoldState::Folded { pivot };

        vec![Effect::ScrollTo {
            target: ScrollTarget::Post(pivot),
        }]
    }

    pub(crate) fn unfold(&mut self, rows: &mut Rows) {
        trace!("unfold all posts");
        for row in rows.values_mut() {
            row.hidden = false;
            row.fold = FoldMark::default();
        }
        self.state = FoldState::Unfolded;
    }

    /// Whether a post that just arrived must be hidden under the current
    /// fold. It stays visible only if it replies to a post the fold keeps.
    pub(crate) fn hides_inserted(&self, thread: &Thread, rows: &Rows, id: LocalId) -> bool {
        if self.state == FoldState::Unfolded {
            return false;
        }
        match thread.target_of(id).and_then(|target| rows.get(&target)) {
            Some(target) => target.hidden || !target.fold.kept,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;
    use thread_graph::Post;
    use thread_msg::PostAttrs;
    use thread_ref::{GlobalId, Hsl, IdentityKey, ReplyTarget, ThreadId};

    fn lid(id: u64) -> LocalId {
        LocalId::new(id).unwrap()
    }

    fn setup(posts: &[(u64, u64)]) -> (Thread, Rows) {
        let mut thread = Thread::new(ThreadId::from_string("f".into()).unwrap(), false, 0);
        let mut rows = Rows::new();
        for &(id, target) in posts {
            let attrs = PostAttrs {
                local_id: lid(id),
                global_id: GlobalId::from_string(id.to_string()).unwrap(),
                reply_target: ReplyTarget::from_string(target.to_string()).unwrap(),
                identity: IdentityKey::from_string("x".into()).unwrap(),
                color: Hsl::new(0, 0, 0),
                marker: None,
                comment: String::new(),
                omission: false,
            };
            thread.push(Post::from(attrs)).unwrap();
            rows.insert(lid(id), Row::default());
        }
        (thread, rows)
    }

    fn visible(rows: &Rows) -> Vec<u64> {
        let mut ids: Vec<u64> = rows
            .iter()
            .filter(|(_, row)| !row.hidden)
            .map(|(id, _)| id.value())
            .collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_fold_keeps_ancestors_and_descendants() {
        let (thread, mut rows) = setup(&[(1, 0), (2, 1), (3, 2), (4, 0), (5, 4)]);
        let mut fold = FoldController::default();
        let effects = fold.toggle(&thread, &mut rows, lid(2));
        assert_eq!(visible(&rows), vec![1, 2, 3]);
        assert_eq!(fold.pivot(), Some(lid(2)));
        assert_eq!(rows[&lid(2)].fold.glyph(), PIVOT_GLYPH);
        assert_eq!(rows[&lid(1)].fold.glyph(), INACTIVE_GLYPH);
        assert_eq!(
            effects,
            vec![Effect::ScrollTo {
                target: ScrollTarget::Post(lid(2))
            }]
        );
    }

    #[test]
    fn test_toggle_on_pivot_unfolds() {
        let (thread, mut rows) = setup(&[(1, 0), (2, 1), (3, 0)]);
        let before: Vec<(u64, bool, FoldMark)> = {
            let mut all: Vec<_> = rows.iter().map(|(id, r)| (id.value(), r.hidden, r.fold)).collect();
            all.sort_by_key(|entry| entry.0);
            all
        };
        let mut fold = FoldController::default();
        fold.toggle(&thread, &mut rows, lid(2));
        fold.toggle(&thread, &mut rows, lid(2));
        let mut after: Vec<_> = rows.iter().map(|(id, r)| (id.value(), r.hidden, r.fold)).collect();
        after.sort_by_key(|entry| entry.0);
        assert_eq!(before, after);
        assert_eq!(fold.state(), FoldState::Unfolded);
    }

    #[test]
    fn test_refold_matches_direct_fold() {
        let (thread, mut rows) = setup(&[(1, 0), (2, 1), (3, 0), (4, 3), (5, 4)]);
        let mut fold = FoldController::default();
        fold.toggle(&thread, &mut rows, lid(2));
        fold.toggle(&thread, &mut rows, lid(4));
        let refolded = visible(&rows);

        let (thread, mut direct_rows) = setup(&[(1, 0), (2, 1), (3, 0), (4, 3), (5, 4)]);
        let mut direct = FoldController::default();
        direct.toggle(&thread, &mut direct_rows, lid(4));
        assert_eq!(refolded, visible(&direct_rows));
        assert_eq!(refolded, vec![3, 4, 5]);
        assert!(!rows[&lid(2)].fold.pivot);
    }

    #[test]
    fn test_fold_on_missing_post_is_ignored() {
        let (thread, mut rows) = setup(&[(1, 0)]);
        let mut fold = FoldController::default();
        assert!(fold.fold(&thread, &mut rows, lid(9)).is_empty());
        assert_eq!(fold.state(), FoldState::Unfolded);
    }
}
