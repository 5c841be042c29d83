use std::collections::HashMap;
use thread_ref::{Hsl, LocalId};

use crate::fold::FoldMark;
use crate::highlight::RowHighlight;

pub(crate) type Rows = HashMap<LocalId, Row>;

/// View state of one post, kept apart from the post itself.
#[derive(Clone, Debug, Default)]
pub struct Row {
    pub(crate) highlight: RowHighlight,
    pub(crate) fold: FoldMark,
    pub(crate) hidden: bool,
    pub(crate) color: Option<Hsl>,
    pub(crate) bound: bool,
}

impl Row {
    pub fn highlight(&self) -> &RowHighlight {
        &self.highlight
    }

    pub fn fold_mark(&self) -> FoldMark {
        self.fold
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The color other posts' links use for this post, once one of them has
    /// asked for it.
    pub fn assigned_color(&self) -> Option<Hsl> {
        self.color
    }

    /// Whether interaction bindings are attached. Omission rows never get
    /// any.
    pub fn is_bound(&self) -> bool {
        self.bound
    }
}
