//! Tracked ranges (markers).
//!
//! A tracked range is a char-offset interval that follows the text through edits. Cursors
//! keep one per selection so they can be recovered after edits they did not make, and the
//! edit builder uses them to carry selections through its own edits.

use std::collections::BTreeMap;

/// How the edges of a tracked range react to text inserted exactly at them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedRangeStickiness {
    /// Typing at either edge grows the range.
    AlwaysGrowsWhenTypingAtEdges,
    /// Typing at either edge leaves the range outside the new text.
    NeverGrowsWhenTypingAtEdges,
    /// Typing at the start edge grows the range; typing at the end does not.
    GrowsOnlyWhenTypingBefore,
    /// Typing at the end edge grows the range; typing at the start does not.
    GrowsOnlyWhenTypingAfter,
}

impl TrackedRangeStickiness {
    fn start_sticks_to_previous(self) -> bool {
        matches!(
            self,
            Self::AlwaysGrowsWhenTypingAtEdges | Self::GrowsOnlyWhenTypingBefore
        )
    }

    fn end_sticks_to_previous(self) -> bool {
        matches!(
            self,
            Self::NeverGrowsWhenTypingAtEdges | Self::GrowsOnlyWhenTypingBefore
        )
    }
}

/// Handle to a tracked range owned by a [`crate::TextModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackedRangeId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TrackedRange {
    start: usize,
    end: usize,
    stickiness: TrackedRangeStickiness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerMove {
    Defined,
    ForceMove,
    ForceStay,
}

/// Does a marker at `marker` keep its offset relative to an edit boundary at `check`?
fn stays_before(marker: usize, sticks_to_previous: bool, check: usize, mode: MarkerMove) -> bool {
    if marker < check {
        return true;
    }
    if marker > check {
        return false;
    }
    match mode {
        MarkerMove::ForceMove => false,
        MarkerMove::ForceStay => true,
        MarkerMove::Defined => sticks_to_previous,
    }
}

impl TrackedRange {
    /// Follow the replacement of `[start, end)` by `inserted` chars.
    fn accept_edit(&mut self, start: usize, end: usize, inserted: usize, force_move: bool) {
        let start_prev = self.stickiness.start_sticks_to_previous();
        let end_prev = self.stickiness.end_sticks_to_previous();
        let deleted = end - start;
        let common = deleted.min(inserted);

        let (mut new_start, mut new_end) = (self.start, self.end);
        let (mut start_done, mut end_done) = (false, false);

        let mode = if force_move {
            MarkerMove::ForceMove
        } else if deleted > 0 {
            MarkerMove::ForceStay
        } else {
            MarkerMove::Defined
        };
        start_done |= stays_before(self.start, start_prev, start, mode);
        end_done |= stays_before(self.end, end_prev, start, mode);

        if common > 0 && !force_move {
            let mode = if deleted > inserted {
                MarkerMove::ForceStay
            } else {
                MarkerMove::Defined
            };
            start_done = start_done || stays_before(self.start, start_prev, start + common, mode);
            end_done = end_done || stays_before(self.end, end_prev, start + common, mode);
        }

        let mode = if force_move {
            MarkerMove::ForceMove
        } else {
            MarkerMove::Defined
        };
        if !start_done && stays_before(self.start, start_prev, end, mode) {
            new_start = start + inserted;
            start_done = true;
        }
        if !end_done && stays_before(self.end, end_prev, end, mode) {
            new_end = start + inserted;
            end_done = true;
        }

        if !start_done {
            new_start = (self.start + inserted).saturating_sub(deleted);
        }
        if !end_done {
            new_end = (self.end + inserted).saturating_sub(deleted);
        }
        self.start = new_start;
        self.end = new_end.max(new_start);
    }
}

/// The set of live tracked ranges of a model.
#[derive(Debug, Clone, Default)]
pub(crate) struct TrackedRanges {
    next_id: u64,
    ranges: BTreeMap<TrackedRangeId, TrackedRange>,
}

impl TrackedRanges {
    pub(crate) fn add(
        &mut self,
        start: usize,
        end: usize,
        stickiness: TrackedRangeStickiness,
    ) -> TrackedRangeId {
        self.next_id += 1;
        let id = TrackedRangeId(self.next_id);
        self.ranges.insert(
            id,
            TrackedRange {
                start,
                end: end.max(start),
                stickiness,
            },
        );
        id
    }

    pub(crate) fn set(&mut self, id: TrackedRangeId, start: usize, end: usize) -> bool {
        match self.ranges.get_mut(&id) {
            Some(range) => {
                range.start = start;
                range.end = end.max(start);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, id: TrackedRangeId) -> bool {
        self.ranges.remove(&id).is_some()
    }

    pub(crate) fn get(&self, id: TrackedRangeId) -> Option<(usize, usize)> {
        self.ranges.get(&id).map(|r| (r.start, r.end))
    }

    pub(crate) fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Follow one edit. Batches must be fed from the last edit to the first.
    pub(crate) fn accept_edit(&mut self, start: usize, end: usize, inserted: usize, force_move: bool) {
        for range in self.ranges.values_mut() {
            range.accept_edit(start, end, inserted, force_move);
        }
    }

    /// Clamp every range to a document of `len` chars.
    pub(crate) fn clamp_to(&mut self, len: usize) {
        for range in self.ranges.values_mut() {
            range.start = range.start.min(len);
            range.end = range.end.min(len);
        }
    }
}
