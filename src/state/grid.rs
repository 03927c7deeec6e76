/// Masonry columns and pagination
///
/// The grid is a fixed number of columns per viewport breakpoint. Cards
/// are appended to whichever column currently has the smallest
/// accumulated extent, a greedy balance that works without knowing card
/// heights up front: each card starts with a placeholder extent and is
/// corrected once its thumbnail reports real pixel dimensions.
///
/// Pagination reveals the filtered set in fixed-size slices, driven by
/// scroll proximity to the end of the grid.

use std::collections::HashMap;

/// Records revealed per page
pub const PAGE_SIZE: usize = 60;

/// How close (in layout units) the scroll position must get to the end of
/// the grid content before the next page is requested
pub const SENTINEL_MARGIN: f32 = 800.0;

/// Extent assumed for a card whose thumbnail has not reported dimensions
/// yet. Extents are in column-width units: a square image contributes 1.0.
pub const PLACEHOLDER_EXTENT: f32 = 1.0;

/// Extra extent every card carries for its caption strip
pub const CAPTION_EXTENT: f32 = 0.18;

/// Extent a card contributes to its column, in column-width units: the
/// image's aspect ratio (clamped so extreme panorama and strip scans
/// cannot wreck the balance) plus the caption strip.
pub fn card_extent(width: u32, height: u32) -> f32 {
    if width == 0 {
        return PLACEHOLDER_EXTENT + CAPTION_EXTENT;
    }
    (height as f32 / width as f32).clamp(0.25, 3.5) + CAPTION_EXTENT
}

/// Columns for a given viewport width: one narrow column on phones up to
/// five on wide desktop windows.
pub fn column_count_for_width(width: f32) -> usize {
    if width < 520.0 {
        1
    } else if width < 800.0 {
        2
    } else if width < 1100.0 {
        3
    } else if width < 1400.0 {
        4
    } else {
        5
    }
}

/// The column set. Cards are identified by their index into the loaded
/// record set; the grid never touches the records themselves.
#[derive(Debug, Clone)]
pub struct Masonry {
    /// Card ids per column, top to bottom
    columns: Vec<Vec<usize>>,
    /// Accumulated extent per column
    extents: Vec<f32>,
    /// Last known extent per card, kept so rebuilds and corrections
    /// re-use real measurements
    card_extents: HashMap<usize, f32>,
}

impl Masonry {
    pub fn new(column_count: usize) -> Self {
        Masonry {
            columns: vec![Vec::new(); column_count.max(1)],
            extents: vec![0.0; column_count.max(1)],
            card_extents: HashMap::new(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Vec<usize>] {
        &self.columns
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// The column with the smallest accumulated extent; ties resolve to
    /// the leftmost column.
    pub fn shortest_column(&self) -> usize {
        let mut shortest = 0;
        for (index, extent) in self.extents.iter().enumerate() {
            if *extent < self.extents[shortest] {
                shortest = index;
            }
        }
        shortest
    }

    /// Place a card in the currently shortest column.
    pub fn append(&mut self, card: usize, extent: f32) {
        let column = self.shortest_column();
        self.columns[column].push(card);
        self.extents[column] += extent;
        self.card_extents.insert(card, extent);
    }

    /// Correct a card's extent once its real dimensions are known. The
    /// owning column's total shifts by the difference; cards already
    /// placed stay where they are, exactly like a browser reflow.
    pub fn set_extent(&mut self, card: usize, extent: f32) {
        let Some(column) = self
            .columns
            .iter()
            .position(|cards| cards.contains(&card))
        else {
            return;
        };
        let previous = self.card_extents.insert(card, extent).unwrap_or(0.0);
        self.extents[column] += extent - previous;
    }

    /// Change the column count without losing what is on screen: cards are
    /// collected in their current visual order (columns left to right, top
    /// to bottom) and re-placed one by one through the same
    /// shortest-column rule, using their recorded extents.
    pub fn rebuild(&mut self, column_count: usize) {
        let cards = self.cards_in_order();
        let extents = std::mem::take(&mut self.card_extents);

        self.columns = vec![Vec::new(); column_count.max(1)];
        self.extents = vec![0.0; column_count.max(1)];

        for card in cards {
            let extent = extents.get(&card).copied().unwrap_or(PLACEHOLDER_EXTENT);
            self.append(card, extent);
        }
    }

    /// Drop every card, keeping the column count.
    pub fn clear(&mut self, column_count: usize) {
        self.columns = vec![Vec::new(); column_count.max(1)];
        self.extents = vec![0.0; column_count.max(1)];
        self.card_extents.clear();
    }

    /// Cards in visual collection order: each column left to right, its
    /// cards top to bottom.
    pub fn cards_in_order(&self) -> Vec<usize> {
        self.columns.iter().flatten().copied().collect()
    }
}

/// Page counter plus the list of currently revealed cards.
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    page: usize,
    visible: Vec<usize>,
}

impl Paginator {
    /// Pages revealed so far.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Revealed card ids, in reveal order.
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    /// Whether the filtered set still has unrevealed records.
    pub fn has_more(&self, filtered_len: usize) -> bool {
        self.visible.len() < filtered_len
    }

    /// Reveal the next page of the filtered set: slice it, place each card
    /// in the masonry, extend the visible list, bump the page counter.
    ///
    /// An empty slice is a complete no-op (counter untouched, nothing
    /// placed), which is how "no more data" is signalled.
    ///
    /// Returns the newly revealed card ids so the caller can start their
    /// thumbnail fetches.
    pub fn render_next_page(
        &mut self,
        filtered: &[usize],
        grid: &mut Masonry,
        extent_of: impl Fn(usize) -> f32,
    ) -> Vec<usize> {
        let start = self.page * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(filtered.len());
        if start >= end {
            return Vec::new();
        }

        let slice = &filtered[start..end];
        for &card in slice {
            grid.append(card, extent_of(card));
        }
        self.visible.extend_from_slice(slice);
        self.page += 1;

        slice.to_vec()
    }

    /// Forget everything revealed and rebuild empty columns for the
    /// current viewport. Invoked whenever the filter criteria change; the
    /// caller renders the first page right after.
    pub fn reset(&mut self, grid: &mut Masonry, column_count: usize) {
        self.page = 0;
        self.visible.clear();
        grid.clear(column_count);
    }
}
