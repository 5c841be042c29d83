//! Per-row highlight state.
//!
//! Every row has four slots, each holding up to three paints: the default
//! captured when the row was decorated, an ephemeral paint driven by hover,
//! and a sticky paint set by clicks. The visible paint is the highest one
//! present, sticky over ephemeral over default.

use serde::Serialize;
use thread_ref::Hsl;

use crate::config::Palette;
use crate::notifier::Notifier;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Header,
    PostNo,
    ReplyTarget,
    Body,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Header, Slot::PostNo, Slot::ReplyTarget, Slot::Body];

    fn index(self) -> usize {
        match self {
            Slot::Header => 0,
            Slot::PostNo => 1,
            Slot::ReplyTarget => 2,
            Slot::Body => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ink {
    #[default]
    Inherit,
    Black,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Paint {
    pub background: Option<Hsl>,
    pub ink: Ink,
}

impl Paint {
    pub fn plain() -> Self {
        Paint::default()
    }

    pub fn filled(color: Hsl) -> Self {
        Paint {
            background: Some(color),
            ink: Ink::Black,
        }
    }
}

/// What a highlight request asks one slot to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// Drop the ephemeral paint.
    Rest,
    /// Show no color at all.
    Plain,
    /// Show the slot's own link color, if it has one.
    Accent,
    Color(Hsl),
    /// Show a darkened variant of a referenced post's color.
    Reference(Hsl),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowSignals {
    pub header: Signal,
    pub post_no: Signal,
    pub reply_target: Signal,
    pub body: Signal,
}

impl RowSignals {
    pub fn rest() -> Self {
        RowSignals::all(Signal::Rest)
    }

    pub fn plain() -> Self {
        RowSignals::all(Signal::Plain)
    }

    fn all(signal: Signal) -> Self {
        RowSignals {
            header: signal,
            post_no: signal,
            reply_target: signal,
            body: signal,
        }
    }

    fn get(&self, slot: Slot) -> Signal {
        match slot {
            Slot::Header => self.header,
            Slot::PostNo => self.post_no,
            Slot::ReplyTarget => self.reply_target,
            Slot::Body => self.body,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlotMask {
    pub header: bool,
    pub post_no: bool,
    pub reply_target: bool,
    pub body: bool,
}

impl SlotMask {
    pub const POST_NO_AND_BODY: SlotMask = SlotMask {
        header: false,
        post_no: true,
        reply_target: false,
        body: true,
    };

    pub const HEADER_AND_BODY: SlotMask = SlotMask {
        header: true,
        post_no: false,
        reply_target: false,
        body: true,
    };

    pub const ALL: SlotMask = SlotMask {
        header: true,
        post_no: true,
        reply_target: true,
        body: true,
    };

    fn contains(&self, slot: Slot) -> bool {
        match slot {
            Slot::Header => self.header,
            Slot::PostNo => self.post_no,
            Slot::ReplyTarget => self.reply_target,
            Slot::Body => self.body,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotState {
    default: Paint,
    accent: Option<Hsl>,
    ephemeral: Option<Paint>,
    sticky: Option<Paint>,
}

impl SlotState {
    pub fn visible(&self) -> Paint {
        self.sticky.or(self.ephemeral).unwrap_or(self.default)
    }

    pub fn default_paint(&self) -> Paint {
        self.default
    }

    pub fn accent(&self) -> Option<Hsl> {
        self.accent
    }

    pub fn ephemeral(&self) -> Option<Paint> {
        self.ephemeral
    }

    pub fn is_sticky(&self) -> bool {
        self.sticky.is_some()
    }

    /// Gives the slot its own link color, which also becomes its resting
    /// paint.
    pub(crate) fn colorize(&mut self, color: Hsl) {
        self.accent = Some(color);
        self.default = Paint::filled(color);
    }

    /// Returns false, changing nothing, while the slot is sticky.
    fn set_ephemeral(&mut self, signal: Signal, palette: &Palette) -> bool {
        if self.is_sticky() {
            return false;
        }
        self.ephemeral = match signal {
            Signal::Rest => None,
            Signal::Plain => Some(Paint::plain()),
            Signal::Accent => Some(self.accent.map_or_else(Paint::plain, Paint::filled)),
            Signal::Color(color) => Some(Paint::filled(color)),
            Signal::Reference(color) => Some(Paint::filled(palette.dark(color))),
        };
        true
    }

    /// Turning sticky on freezes whatever the slot currently shows.
    fn set_sticky(&mut self, on: bool) {
        if !on {
            self.sticky = None;
        } else if self.sticky.is_none() {
            self.sticky = Some(self.visible());
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowHighlight {
    slots: [SlotState; 4],
    author_selected: bool,
    notifier: Option<Notifier>,
}

impl RowHighlight {
    pub fn slot(&self, slot: Slot) -> &SlotState {
        &self.slots[slot.index()]
    }

    pub(crate) fn slot_mut(&mut self, slot: Slot) -> &mut SlotState {
        &mut self.slots[slot.index()]
    }

    pub fn visible(&self, slot: Slot) -> Paint {
        self.slot(slot).visible()
    }

    pub fn set_ephemeral(&mut self, signals: &RowSignals, palette: &Palette) {
        for slot in Slot::ALL {
            self.slot_mut(slot).set_ephemeral(signals.get(slot), palette);
        }
    }

    pub fn clear_ephemeral(&mut self, palette: &Palette) {
        self.set_ephemeral(&RowSignals::rest(), palette);
    }

    pub fn set_sticky(&mut self, mask: SlotMask, on: bool) {
        for slot in Slot::ALL {
            if mask.contains(slot) {
                self.slot_mut(slot).set_sticky(on);
            }
        }
    }

    /// Drops every sticky and ephemeral paint on the row.
    pub fn force_restore(&mut self, palette: &Palette) {
        self.set_sticky(SlotMask::ALL, false);
        self.clear_ephemeral(palette);
    }

    pub fn is_author_selected(&self) -> bool {
        self.author_selected
    }

    pub(crate) fn set_author_selected(&mut self, selected: bool) {
        self.author_selected = selected;
    }

    pub fn notifier(&self) -> Option<Notifier> {
        self.notifier
    }

    pub(crate) fn set_notifier(&mut self, notifier: Option<Notifier>) {
        self.notifier = notifier;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Hsl {
        Hsl::new(0, 80, 70)
    }

    fn blue() -> Hsl {
        Hsl::new(220, 80, 70)
    }

    #[test]
    fn test_ephemeral_over_default() {
        let palette = Palette::default();
        let mut row = RowHighlight::default();
        row.set_ephemeral(
            &RowSignals {
                body: Signal::Color(red()),
                ..RowSignals::rest()
            },
            &palette,
        );
        assert_eq!(row.visible(Slot::Body), Paint::filled(red()));
        row.clear_ephemeral(&palette);
        assert_eq!(row.visible(Slot::Body), Paint::plain());
    }

    #[test]
    fn test_sticky_ignores_ephemeral() {
        let palette = Palette::default();
        let mut row = RowHighlight::default();
        let paint_red = RowSignals {
            body: Signal::Color(red()),
            ..RowSignals::rest()
        };
        row.set_ephemeral(&paint_red, &palette);
        row.set_sticky(SlotMask::POST_NO_AND_BODY, true);

        row.set_ephemeral(
            &RowSignals {
                body: Signal::Color(blue()),
                ..RowSignals::plain()
            },
            &palette,
        );
        assert_eq!(row.visible(Slot::Body), Paint::filled(red()));
        row.clear_ephemeral(&palette);
        assert_eq!(row.visible(Slot::Body), Paint::filled(red()));

        // unsticking falls back to the last ephemeral that was applied
        row.set_sticky(SlotMask::POST_NO_AND_BODY, false);
        assert_eq!(row.visible(Slot::Body), Paint::filled(red()));
        row.clear_ephemeral(&palette);
        assert_eq!(row.visible(Slot::Body), Paint::plain());
    }

    #[test]
    fn test_unsticking_without_ephemeral_reverts_to_default() {
        let palette = Palette::default();
        let mut row = RowHighlight::default();
        row.slot_mut(Slot::PostNo).colorize(blue());
        row.set_ephemeral(
            &RowSignals {
                post_no: Signal::Color(red()),
                ..RowSignals::rest()
            },
            &palette,
        );
        row.set_sticky(SlotMask::ALL, true);
        row.force_restore(&palette);
        assert_eq!(row.visible(Slot::PostNo), Paint::filled(blue()));
        assert!(!row.slot(Slot::PostNo).is_sticky());
    }

    #[test]
    fn test_accent_and_reference() {
        let palette = Palette::default();
        let mut row = RowHighlight::default();
        row.slot_mut(Slot::ReplyTarget).colorize(blue());
        row.set_ephemeral(
            &RowSignals {
                reply_target: Signal::Accent,
                body: Signal::Reference(blue()),
                ..RowSignals::plain()
            },
            &palette,
        );
        assert_eq!(row.visible(Slot::ReplyTarget), Paint::filled(blue()));
        assert_eq!(row.visible(Slot::Body), Paint::filled(palette.dark(blue())));
        // a slot without a link color shows nothing for an accent request
        row.set_ephemeral(
            &RowSignals {
                header: Signal::Accent,
                ..RowSignals::rest()
            },
            &palette,
        );
        assert_eq!(row.visible(Slot::Header), Paint::plain());
    }

    #[test]
    fn test_notifier_leaves_slots_alone() {
        let palette = Palette::default();
        let mut row = RowHighlight::default();
        row.set_ephemeral(
            &RowSignals {
                body: Signal::Color(red()),
                ..RowSignals::rest()
            },
            &palette,
        );
        row.set_notifier(Some(Notifier::Report));
        row.set_notifier(None);
        assert_eq!(row.visible(Slot::Body), Paint::filled(red()));
    }
}
