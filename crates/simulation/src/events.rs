//! Outbound notifications for host collaborators.
//!
//! The core never depends on anyone reading these; they exist so a renderer
//! can invalidate its tile cache and a UI can open the budget screen or pan
//! to a disaster. Unread events are simply dropped.

use bevy::prelude::*;

/// A rectangle of tiles whose appearance may have changed.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilesChanged {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl TilesChanged {
    pub fn tile(x: i32, y: i32) -> Self {
        Self { x, y, w: 1, h: 1 }
    }

    /// The tile and its four cardinal neighbours, for connectivity edits
    /// that re-derive neighbouring tile variants.
    pub fn tile_and_neighbours(x: i32, y: i32) -> Self {
        Self {
            x: x - 1,
            y: y - 1,
            w: 3,
            h: 3,
        }
    }

    pub fn rect(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// The yearly settlement needs the player's attention: auto-budget is off,
/// the year's cash flow was non-positive, or funds ran out.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetReviewRequested {
    pub taxes_collected: i32,
    pub cash_flow: i32,
    pub funds: i32,
}

/// A random fire ignited; hosts typically focus the view here.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisasterStruck {
    pub x: i32,
    pub y: i32,
}
