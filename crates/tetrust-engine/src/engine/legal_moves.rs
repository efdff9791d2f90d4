use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Board, Piece, PieceRotation, RotationSystem};

/// Declarative placement request: final column, rotation and whether to hold first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub x: i32,
    pub rot: u8,
    pub use_hold: bool,
}

impl Placement {
    #[must_use]
    pub const fn new(x: i32, rot: u8, use_hold: bool) -> Self {
        Self { x, rot, use_hold }
    }
}

/// A placement proven reachable from the piece's current (or spawn) state,
/// together with the row the piece comes to rest on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LegalMove {
    pub x: i32,
    pub rot: u8,
    pub use_hold: bool,
    #[serde(rename = "harddrop_y")]
    pub landing_y: i32,
}

impl LegalMove {
    #[must_use]
    pub const fn placement(&self) -> Placement {
        Placement::new(self.x, self.rot, self.use_hold)
    }

    #[must_use]
    pub fn matches(&self, placement: &Placement) -> bool {
        self.placement() == *placement
    }
}

/// Starting state for one piece type in the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStart {
    pub piece: Piece,
    pub use_hold: bool,
}

/// Enumerates every placement reachable by stepwise rotation and translation.
///
/// For each start, each target rotation and each column that keeps the
/// piece's bounding box on the board, the piece is rotated clockwise one step
/// at a time (wall kicks allowed), then shifted one column at a time, and
/// finally dropped. A candidate is dropped as soon as one step fails, so a
/// free pocket under an overhang is never reported.
///
/// Results keep discovery order and contain no duplicates.
#[must_use]
pub fn search_legal_moves(
    board: &Board,
    rotation_system: &RotationSystem,
    starts: &[SearchStart],
) -> Vec<LegalMove> {
    let mut seen = HashSet::new();
    let mut moves = vec![];

    for start in starts {
        for rotation in PieceRotation::ALL {
            let (min_dx, _, max_dx, _) = start.piece.kind().bounding_box(rotation);
            let width = board_width();
            let first_x = i32::max(0, -min_dx);
            let last_x = i32::min(width - 1, width - 1 - max_dx);
            for x in first_x..=last_x {
                let Some(reached) = reach(board, rotation_system, start.piece, x, rotation) else {
                    continue;
                };
                let landed = drop_position(board, reached);
                let mv = LegalMove {
                    x,
                    rot: rotation.as_u8(),
                    use_hold: start.use_hold,
                    landing_y: landed.y(),
                };
                if seen.insert(mv) {
                    moves.push(mv);
                }
            }
        }
    }

    moves
}

/// Replays the stepwise path from `start` to `(target_x, target_rotation)`.
///
/// Returns the piece at the target before it is dropped, or `None` if the
/// start collides or any rotation or shift on the way is blocked.
#[must_use]
pub fn reach(
    board: &Board,
    rotation_system: &RotationSystem,
    start: Piece,
    target_x: i32,
    target_rotation: PieceRotation,
) -> Option<Piece> {
    if board.collides(&start) {
        return None;
    }

    let mut piece = start;
    for _ in 0..start.rotation().clockwise_steps_to(target_rotation) {
        piece = rotation_system.try_rotate(board, &piece, true)?;
    }

    let step = (target_x - piece.x()).signum();
    while piece.x() != target_x {
        let next = piece.moved(step, 0);
        if board.collides(&next) {
            return None;
        }
        piece = next;
    }

    Some(piece)
}

/// Moves the piece down until the next row would collide.
#[must_use]
pub fn drop_position(board: &Board, piece: Piece) -> Piece {
    let mut dropped = piece;
    while !board.collides(&dropped.down()) {
        dropped = dropped.down();
    }
    dropped
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn board_width() -> i32 {
    Board::WIDTH as i32
}
