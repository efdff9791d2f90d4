use super::{
    board::Board,
    piece::{Piece, PieceKind},
};

/// Kick offsets keyed by `(from_rotation, to_rotation)`.
type KickTable = [((u8, u8), [(i32, i32); 5]); 8];

/// Kicks shared by the J, L, S, T and Z pieces.
const JLSTZ_KICKS: KickTable = [
    ((0, 1), [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)]),
    ((1, 0), [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)]),
    ((1, 2), [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)]),
    ((2, 1), [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)]),
    ((2, 3), [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)]),
    ((3, 2), [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)]),
    ((3, 0), [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)]),
    ((0, 3), [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)]),
];

const I_KICKS: KickTable = [
    ((0, 1), [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)]),
    ((1, 0), [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)]),
    ((1, 2), [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)]),
    ((2, 1), [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)]),
    ((2, 3), [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)]),
    ((3, 2), [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)]),
    ((3, 0), [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)]),
    ((0, 3), [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)]),
];

/// Super Rotation System (SRS) wall-kick rules.
///
/// A rotation is first tried in place. When that collides and kicks are
/// enabled, each offset from the kick table for the `(from, to)` rotation pair
/// is applied to the rotated piece in order and the first non-colliding
/// result wins. The O-piece has no kick table.
///
/// # Example
///
/// ```
/// use tetrust_engine::{Board, Piece, PieceKind, RotationSystem};
///
/// let srs = RotationSystem::new(true);
/// let piece = Piece::spawn(PieceKind::T);
/// let rotated = srs.try_rotate(&Board::EMPTY, &piece, true).unwrap();
/// assert_eq!(rotated.rotation().as_u8(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationSystem {
    kicks_enabled: bool,
}

impl Default for RotationSystem {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RotationSystem {
    #[must_use]
    pub const fn new(kicks_enabled: bool) -> Self {
        Self { kicks_enabled }
    }

    #[must_use]
    pub const fn kicks_enabled(&self) -> bool {
        self.kicks_enabled
    }

    /// Attempts to rotate `piece` on `board`, applying wall kicks if needed.
    ///
    /// Returns `None` when every attempt collides.
    #[must_use]
    pub fn try_rotate(&self, board: &Board, piece: &Piece, clockwise: bool) -> Option<Piece> {
        let rotated = piece.rotated(clockwise);
        if !board.collides(&rotated) {
            return Some(rotated);
        }
        if !self.kicks_enabled {
            return None;
        }

        let key = (piece.rotation().as_u8(), rotated.rotation().as_u8());
        kick_offsets(piece.kind(), key)?
            .iter()
            .map(|&(dx, dy)| rotated.moved(dx, dy))
            .find(|kicked| !board.collides(kicked))
    }
}

fn kick_offsets(kind: PieceKind, key: (u8, u8)) -> Option<&'static [(i32, i32); 5]> {
    let table = match kind {
        PieceKind::O => return None,
        PieceKind::I => &I_KICKS,
        PieceKind::T | PieceKind::S | PieceKind::Z | PieceKind::J | PieceKind::L => &JLSTZ_KICKS,
    };
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, offsets)| offsets)
}
