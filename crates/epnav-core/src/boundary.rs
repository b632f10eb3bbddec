//! Boundary classification against the host's pagination state

use crate::address::Direction;

/// Identifier of one navigable unit (page or spread) in the host reader
pub type UnitId = usize;

/// Snapshot of the host reader's pagination.
///
/// `units` is every navigable unit in reading order, `in_view` the subset
/// currently visible. Both come from the host and are never mutated here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderPosition {
    pub units: Vec<UnitId>,
    pub in_view: Vec<UnitId>,
}

impl ReaderPosition {
    pub fn new(units: Vec<UnitId>, in_view: Vec<UnitId>) -> Self {
        Self { units, in_view }
    }

    /// Units `0..total` with the given ones in view
    pub fn paged(total: usize, in_view: impl IntoIterator<Item = UnitId>) -> Self {
        Self {
            units: (0..total).collect(),
            in_view: in_view.into_iter().collect(),
        }
    }

    pub fn first_unit(&self) -> Option<UnitId> {
        self.units.first().copied()
    }

    pub fn last_unit(&self) -> Option<UnitId> {
        self.units.last().copied()
    }

    pub fn is_in_view(&self, unit: UnitId) -> bool {
        self.in_view.contains(&unit)
    }
}

/// True when the first unit is in view. Missing or empty state is `false`.
pub fn is_at_first(position: Option<&ReaderPosition>) -> bool {
    position
        .and_then(|p| p.first_unit().map(|unit| p.is_in_view(unit)))
        .unwrap_or(false)
}

/// True when the last unit is in view. Missing or empty state is `false`.
pub fn is_at_last(position: Option<&ReaderPosition>) -> bool {
    position
        .and_then(|p| p.last_unit().map(|unit| p.is_in_view(unit)))
        .unwrap_or(false)
}

/// Both boundary checks for a single input event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundaryState {
    pub at_first: bool,
    pub at_last: bool,
}

impl BoundaryState {
    pub fn classify(position: Option<&ReaderPosition>) -> Self {
        Self {
            at_first: is_at_first(position),
            at_last: is_at_last(position),
        }
    }

    pub fn is_active(&self) -> bool {
        self.at_first || self.at_last
    }

    /// Whether a move in `direction` leaves the document from this position
    pub fn admits(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.at_last,
            Direction::Backward => self.at_first,
        }
    }

    /// Direction a wheel delta pushes past an active edge, if any.
    ///
    /// At the first unit only negative deltas count, at the last unit only
    /// positive ones.
    pub fn qualifying_direction(&self, delta: f64) -> Option<Direction> {
        if self.at_first && delta < 0.0 {
            Some(Direction::Backward)
        } else if self.at_last && delta > 0.0 {
            Some(Direction::Forward)
        } else {
            None
        }
    }
}
