//! Interaction engine for a rendered discussion thread.
//!
//! A [`ThreadView`] owns the reply graph of one page together with the view
//! state of every row: highlight paints, fold marks, assigned link colors.
//! Hosts drive it with [`Command`]s and carry out the [`Effect`]s it returns.

use log::{debug, trace};
use serde::Serialize;
use thiserror::Error as ThisError;
use thread_graph::{GraphError, Post, Thread};
use thread_msg::{MsgError, PageType, ThreadAttrs};
use thread_ref::{Hsl, IdentityKey, LocalId};

mod color;
mod command;
mod config;
mod fold;
mod highlight;
mod interact;
mod live;
mod notifier;
mod row;

pub use color::ColorGenerator;
pub use command::{Command, Effect, ScrollTarget};
pub use config::{HslMask, Palette, ViewConfig};
pub use fold::{FoldMark, FoldState, INACTIVE_GLYPH, PIVOT_GLYPH};
pub use highlight::{Ink, Paint, RowHighlight, RowSignals, Signal, Slot, SlotMask, SlotState};
pub use live::{FooterPosition, FooterRect, Viewport};
pub use notifier::Notifier;
pub use row::Row;

use fold::FoldController;
use row::Rows;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Fragment keyed {fragment} renders post {rendered}")]
    AnchorMismatch {
        fragment: LocalId,
        rendered: LocalId,
    },
    #[error("Failed to update reply graph: {0}")]
    Graph(#[from] GraphError),
    #[error("Failed to read thread: {0}")]
    Msg(#[from] MsgError),
    #[error("Failed to parse JSON, cause: {0}")]
    Json(#[from] serde_json::Error),
}

/// The current user's author glyph, as shown next to the composer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub marker: Option<String>,
    pub color: Hsl,
}

pub struct ThreadView {
    config: ViewConfig,
    thread: Thread,
    rows: Rows,
    colors: ColorGenerator,
    fold: FoldController,
    page_type: PageType,
    identity: Option<IdentityKey>,
}

impl ThreadView {
    pub fn new(attrs: ThreadAttrs, config: ViewConfig) -> Result<Self, Error> {
        let page_type = attrs.page_type;
        let thread = Thread::from_attrs(attrs)?;
        let rows = thread.ids().map(|id| (id, Row::default())).collect();
        let mut view = ThreadView {
            colors: ColorGenerator::new(&config.palette),
            config,
            thread,
            rows,
            fold: FoldController::default(),
            page_type,
            identity: None,
        };
        let ids: Vec<LocalId> = view.thread.ids().collect();
        for id in ids {
            view.decorate(id);
        }
        Ok(view)
    }

    pub fn from_json(json: &str, config: ViewConfig) -> Result<Self, Error> {
        ThreadView::new(ThreadAttrs::from_json(json)?, config)
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    pub fn page_type(&self) -> PageType {
        self.page_type
    }

    pub fn row(&self, id: LocalId) -> Option<&Row> {
        self.rows.get(&id)
    }

    /// Posts paired with their view state, in arrival order.
    pub fn rows(&self) -> impl Iterator<Item = (&Post, &Row)> {
        self.thread
            .posts()
            .filter_map(move |post| self.rows.get(&post.local_id).map(|row| (post, row)))
    }

    pub fn fold_state(&self) -> FoldState {
        self.fold.state()
    }

    pub fn identity(&self) -> Option<&IdentityKey> {
        self.identity.as_ref()
    }

    /// Glyph and seed color of the first post in the view written under the
    /// current identity.
    pub fn badge(&self) -> Option<Badge> {
        let identity = self.identity.as_ref()?;
        self.thread
            .posts()
            .find(|post| &post.identity == identity)
            .map(|post| Badge {
                marker: post.marker.clone(),
                color: post.color_seed,
            })
    }

    /// Color links to `id` are painted with. Assigned from the generator on
    /// first request and never changed afterwards. Posts outside the view
    /// get none.
    pub fn color_of(&mut self, id: LocalId) -> Option<Hsl> {
        if !self.thread.contains(id) {
            debug!("color requested for missing post {}, ignoring", id);
            return None;
        }
        let row = self.rows.entry(id).or_default();
        if let Some(color) = row.color {
            trace!("color of post {} already assigned", id);
            return Some(color);
        }
        let color = self.colors.next().unwrap_or(self.config.palette.start);
        row.color = Some(color);
        row.highlight.slot_mut(Slot::PostNo).colorize(color);
        Some(color)
    }

    /// Pale variant of the author color of `id`, shared by every post of
    /// that author.
    pub fn author_color(&self, id: LocalId) -> Option<Hsl> {
        let post = self.thread.get(id)?;
        Some(self.config.palette.pale(post.color_seed))
    }

    /// Folds on the post named by a `pivot` query parameter.
    pub fn fold_from_query(&mut self, query: &str) -> Vec<Effect> {
        match thread_ref::pivot_from_query(query) {
            Some(pivot) => self.fold_on(pivot),
            None => Vec::new(),
        }
    }

    pub fn fold_on(&mut self, pivot: LocalId) -> Vec<Effect> {
        if self.page_type != PageType::Thread {
            debug!("fold on post {} outside a thread page, ignoring", pivot);
            return Vec::new();
        }
        self.fold.fold(&self.thread, &mut self.rows, pivot)
    }

    pub fn toggle_fold(&mut self, id: LocalId) -> Vec<Effect> {
        if self.page_type != PageType::Thread {
            debug!("fold control on post {} outside a thread page, ignoring", id);
            return Vec::new();
        }
        self.fold.toggle(&self.thread, &mut self.rows, id)
    }

    /// Attaches bindings and link colors to a row. Runs once per row;
    /// omission placeholders are left bare.
    fn decorate(&mut self, id: LocalId) {
        let omission = match self.thread.get(id) {
            Some(post) => post.omission,
            None => return,
        };
        let row = self.rows.entry(id).or_default();
        if row.bound || omission {
            return;
        }
        row.bound = true;

        if let Some(color) = self.thread.target_of(id).and_then(|target| self.color_of(target)) {
            if let Some(row) = self.rows.get_mut(&id) {
                row.highlight.slot_mut(Slot::ReplyTarget).colorize(color);
            }
        }
    }

    fn is_bound(&self, id: LocalId) -> bool {
        self.rows.get(&id).map_or(false, |row| row.bound)
    }
}
