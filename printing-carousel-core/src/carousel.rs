//! Circular navigation over a card's printings.
//!
//! The carousel is a plain view-model: one [`OverlayEntry`] per printing with
//! its visibility and image loading hint. Front ends render it however they
//! like and feed navigation back through [`Carousel::navigate`], which returns
//! the [`FaceSwap`] the proxy sheet should apply.

use itertools::Itertools;
use log::debug;
use crate::error::CarouselError;
use crate::model::{PrintingRecord, PrintingSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Index before `index` in a circular sequence of `len` items
pub fn left(index: usize, len: usize) -> usize {
    (index + len - 1) % len
}

/// Index after `index` in a circular sequence of `len` items
pub fn right(index: usize, len: usize) -> usize {
    (index + 1) % len
}

pub fn step(index: usize, len: usize, direction: Direction) -> usize {
    match direction {
        Direction::Left => left(index, len),
        Direction::Right => right(index, len),
    }
}

/// Hint for when an entry's images should be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLoading {
    Eager,
    Lazy,
}

impl ImageLoading {
    /// Value for an HTML `loading` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageLoading::Eager => "eager",
            ImageLoading::Lazy => "lazy",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayEntry {
    pub printing: PrintingRecord,
    pub visible: bool,
    pub loading: ImageLoading,
}

impl OverlayEntry {
    pub fn faces(&self) -> &[String] {
        &self.printing.faces
    }

    /// "{rank}/{total}"
    pub fn rank_label(&self, total: usize) -> String {
        format!("{}/{}", self.printing.rank, total)
    }

    /// "{set} - {collector number}"
    pub fn printing_label(&self) -> String {
        format!("{} - {}", self.printing.set, self.printing.collector_number)
    }

    pub fn status_text(&self, total: usize) -> String {
        format!("{}\n{}", self.rank_label(total), self.printing_label())
    }
}

/// Sheet images showing `old_faces` should show `new_faces` instead
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceSwap {
    pub old_faces: Vec<String>,
    pub new_faces: Vec<String>,
}

impl FaceSwap {
    pub fn is_identity(&self) -> bool {
        self.old_faces == self.new_faces
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    entries: Vec<OverlayEntry>,
    focus: usize,
}

impl Carousel {
    /// Build one entry per printing, in lookup order. Only the current printing
    /// starts visible; it and its two neighbors load eagerly.
    pub fn build(printing_set: PrintingSet) -> Result<Self, CarouselError> {
        if printing_set.is_empty() {
            return Err(CarouselError::EmptyPrintingSet);
        }

        let len = printing_set.len();
        let focus = printing_set.current_index();
        let eager = [left(focus, len), focus, right(focus, len)];

        let entries = printing_set
            .into_printings()
            .into_iter()
            .enumerate()
            .map(|(index, printing)| OverlayEntry {
                printing,
                visible: index == focus,
                loading: if eager.contains(&index) {
                    ImageLoading::Eager
                } else {
                    ImageLoading::Lazy
                },
            })
            .collect();

        debug!("Built carousel with {} printings, focus {}", len, focus);

        Ok(Carousel { entries, focus })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn entries(&self) -> &[OverlayEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&OverlayEntry> {
        self.entries.get(index)
    }

    pub fn visible_entry(&self) -> &OverlayEntry {
        &self.entries[self.focus]
    }

    pub fn neighbor(&self, direction: Direction) -> usize {
        step(self.focus, self.len(), direction)
    }

    pub fn eager_indices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .positions(|entry| entry.loading == ImageLoading::Eager)
            .collect()
    }

    /// Move focus one step. Hides the focused entry, shows its neighbor and
    /// promotes the entry beyond that neighbor to eager loading so the next
    /// step in the same direction is already warm.
    pub fn navigate(&mut self, direction: Direction) -> FaceSwap {
        let len = self.len();
        let from = self.focus;
        let to = step(from, len, direction);

        self.entries[from].visible = false;

        let swap = FaceSwap {
            old_faces: self.entries[from].printing.faces.clone(),
            new_faces: self.entries[to].printing.faces.clone(),
        };

        let ahead = step(to, len, direction);
        self.entries[ahead].loading = ImageLoading::Eager;

        self.entries[to].visible = true;
        self.focus = to;

        debug!(
            "Carousel moved {:?} from {} to {}, promoted {}",
            direction, from, to, ahead
        );

        swap
    }
}
