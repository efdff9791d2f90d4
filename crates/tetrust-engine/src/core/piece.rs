use std::{fmt, str::FromStr};

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{InvalidRotationError, ParsePieceKindError};

/// A Tetris piece (tetromino) with position, rotation, and type.
///
/// Pieces are immutable values: movement and rotation return new `Piece`
/// instances and never touch a board.
///
/// # Coordinate System
///
/// - `(x, y)` is the origin of the piece's 4×4 offset box
/// - `y = 0` is the top row of the board, `y` grows downward
/// - Absolute cells are `(x + dx, y + dy)` for the 4 catalog offsets of the
///   current rotation
/// - Coordinates are signed: a piece may sit partly left of column 0 while
///   its occupied cells are still on the board
///
/// # Example
///
/// ```
/// use tetrust_engine::{Piece, PieceKind};
///
/// let piece = Piece::spawn(PieceKind::T);
/// let moved = piece.right();
/// let rotated = moved.rotated_right();
/// assert_eq!(rotated.x(), piece.x() + 1);
/// assert_eq!(rotated.rotation().as_u8(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "type")]
    kind: PieceKind,
    x: i32,
    y: i32,
    #[serde(rename = "rot")]
    rotation: PieceRotation,
}

impl Piece {
    #[must_use]
    pub const fn new(kind: PieceKind, x: i32, y: i32, rotation: PieceRotation) -> Self {
        Self {
            kind,
            x,
            y,
            rotation,
        }
    }

    /// Creates a piece at the catalog spawn position of `kind`, rotation 0.
    #[must_use]
    pub const fn spawn(kind: PieceKind) -> Self {
        let (x, y) = kind.spawn_position();
        Self::new(kind, x, y, PieceRotation::SPAWN)
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    /// Returns the absolute board coordinates of the piece's 4 cells.
    #[must_use]
    pub fn cells(&self) -> [(i32, i32); 4] {
        self.kind
            .offsets(self.rotation)
            .map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Returns `(min_dx, min_dy, max_dx, max_dy)` relative to the piece origin.
    #[must_use]
    pub fn bounding_box(&self) -> (i32, i32, i32, i32) {
        self.kind.bounding_box(self.rotation)
    }

    #[must_use]
    pub const fn moved(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.kind, self.x + dx, self.y + dy, self.rotation)
    }

    #[must_use]
    pub const fn left(&self) -> Self {
        self.moved(-1, 0)
    }

    #[must_use]
    pub const fn right(&self) -> Self {
        self.moved(1, 0)
    }

    #[must_use]
    pub const fn down(&self) -> Self {
        self.moved(0, 1)
    }

    /// Rotates in place without any collision test or wall kick.
    #[must_use]
    pub const fn rotated(&self, clockwise: bool) -> Self {
        let rotation = if clockwise {
            self.rotation.rotated_right()
        } else {
            self.rotation.rotated_left()
        };
        Self::new(self.kind, self.x, self.y, rotation)
    }

    #[must_use]
    pub const fn rotated_right(&self) -> Self {
        self.rotated(true)
    }

    #[must_use]
    pub const fn rotated_left(&self) -> Self {
        self.rotated(false)
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const SPAWN: Self = Self(0);
    pub const ALL: [Self; 4] = [Self(0), Self(1), Self(2), Self(3)];

    #[must_use]
    pub const fn new(rotation: u8) -> Option<Self> {
        if rotation < 4 {
            Some(Self(rotation))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rotated_right(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn rotated_left(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    /// Number of clockwise steps needed to go from `self` to `target`.
    #[must_use]
    pub const fn clockwise_steps_to(self, target: Self) -> u8 {
        (target.0 + 4 - self.0) % 4
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for PieceRotation {
    type Error = InvalidRotationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidRotationError(value))
    }
}

impl From<PieceRotation> for u8 {
    fn from(rotation: PieceRotation) -> Self {
        rotation.0
    }
}

/// Enum representing the type of piece.
///
/// The discriminant is the id written into board cells when the piece locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 1,
    /// O-piece.
    O = 2,
    /// T-piece.
    T = 3,
    /// S-piece.
    S = 4,
    /// Z-piece.
    Z = 5,
    /// J-piece.
    J = 6,
    /// L-piece.
    L = 7,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece types in catalog order.
    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::T,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
    ];

    const fn index(self) -> usize {
        self as usize - 1
    }

    /// Returns the id written into board cells when this piece locks (1..=7).
    #[must_use]
    pub const fn lock_id(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_lock_id(id: u8) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[id as usize - 1]),
            _ => None,
        }
    }

    /// Returns the spawn origin `(x, y)` of this piece type.
    #[must_use]
    pub const fn spawn_position(self) -> (i32, i32) {
        match self {
            PieceKind::O => (4, 1),
            PieceKind::I
            | PieceKind::T
            | PieceKind::S
            | PieceKind::Z
            | PieceKind::J
            | PieceKind::L => (3, 1),
        }
    }

    /// Returns the catalog cell offsets for the given rotation.
    #[must_use]
    pub const fn offsets(self, rotation: PieceRotation) -> [(i32, i32); 4] {
        PIECE_OFFSETS[self.index()][rotation.as_usize()]
    }

    /// Returns `(min_dx, min_dy, max_dx, max_dy)` of the offsets for the given rotation.
    #[must_use]
    pub fn bounding_box(self, rotation: PieceRotation) -> (i32, i32, i32, i32) {
        let offsets = self.offsets(rotation);
        offsets.iter().fold(
            (i32::MAX, i32::MAX, i32::MIN, i32::MIN),
            |(min_x, min_y, max_x, max_y), &(dx, dy)| {
                (min_x.min(dx), min_y.min(dy), max_x.max(dx), max_y.max(dy))
            },
        )
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrust_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrust_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for PieceKind {
    type Err = ParsePieceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Self::from_char(c).ok_or_else(|| ParsePieceKindError(s.to_owned()))
            }
            _ => Err(ParsePieceKindError(s.to_owned())),
        }
    }
}

impl Serialize for PieceKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: single letter (e.g., "T")
        let mut buf = [0; 4];
        serializer.serialize_str(self.as_char().encode_utf8(&mut buf))
    }
}

impl<'de> Deserialize<'de> for PieceKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

const PIECE_OFFSETS: [[[(i32, i32); 4]; 4]; PieceKind::LEN] = [
    // I-piece
    [
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
        [(0, 2), (1, 2), (2, 2), (3, 2)],
        [(1, 0), (1, 1), (1, 2), (1, 3)],
    ],
    // O-piece
    [
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
    ],
    // T-piece
    [
        [(1, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (1, 2)],
        [(1, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // S-piece
    [
        [(1, 0), (2, 0), (0, 1), (1, 1)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
        [(1, 1), (2, 1), (0, 2), (1, 2)],
        [(0, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // Z-piece
    [
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(2, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (1, 2), (2, 2)],
        [(1, 0), (0, 1), (1, 1), (0, 2)],
    ],
    // J-piece
    [
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (0, 2), (1, 2)],
    ],
    // L-piece
    [
        [(2, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 1), (0, 2)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    fn rot(r: u8) -> PieceRotation {
        PieceRotation::new(r).unwrap()
    }

    #[test]
    fn test_every_rotation_has_four_distinct_cells() {
        for kind in PieceKind::ALL {
            for rotation in PieceRotation::ALL {
                let mut offsets = kind.offsets(rotation).to_vec();
                offsets.sort_unstable();
                offsets.dedup();
                assert_eq!(offsets.len(), 4, "{kind} rot {}", rotation.as_u8());
            }
        }
    }

    #[test]
    fn test_spawn_positions() {
        assert_eq!(PieceKind::I.spawn_position(), (3, 1));
        assert_eq!(PieceKind::O.spawn_position(), (4, 1));
        for kind in [PieceKind::T, PieceKind::S, PieceKind::Z, PieceKind::J, PieceKind::L] {
            assert_eq!(kind.spawn_position(), (3, 1), "{kind}");
        }

        let piece = Piece::spawn(PieceKind::O);
        assert_eq!((piece.x(), piece.y()), (4, 1));
        assert_eq!(piece.rotation(), PieceRotation::SPAWN);
    }

    #[test]
    fn test_cells_are_offsets_from_origin() {
        let piece = Piece::new(PieceKind::I, 2, 5, rot(1));
        assert_eq!(piece.cells(), [(4, 5), (4, 6), (4, 7), (4, 8)]);

        let piece = Piece::new(PieceKind::T, 0, 0, rot(0));
        assert_eq!(piece.cells(), [(1, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn test_moves_and_rotations_return_new_values() {
        let piece = Piece::spawn(PieceKind::S);
        let moved = piece.left().down();
        assert_eq!((moved.x(), moved.y()), (2, 2));
        assert_eq!(piece.x(), 3, "original must be untouched");

        let rotated = piece.rotated_left();
        assert_eq!(rotated.rotation().as_u8(), 3);
        assert_eq!((rotated.x(), rotated.y()), (piece.x(), piece.y()));
        assert_eq!(rotated.rotated_right(), piece);
    }

    #[test]
    fn test_clockwise_steps() {
        assert_eq!(rot(0).clockwise_steps_to(rot(0)), 0);
        assert_eq!(rot(0).clockwise_steps_to(rot(3)), 3);
        assert_eq!(rot(3).clockwise_steps_to(rot(0)), 1);
        assert_eq!(rot(2).clockwise_steps_to(rot(1)), 3);
    }

    #[test]
    fn test_bounding_box() {
        assert_eq!(PieceKind::I.bounding_box(rot(0)), (0, 1, 3, 1));
        assert_eq!(PieceKind::I.bounding_box(rot(1)), (2, 0, 2, 3));
        assert_eq!(PieceKind::O.bounding_box(rot(2)), (1, 0, 2, 1));
        assert_eq!(PieceKind::Z.bounding_box(rot(3)), (0, 0, 1, 2));
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
            assert_eq!(kind.to_string().parse::<PieceKind>().unwrap(), kind);
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('t'), None);
        assert!("X".parse::<PieceKind>().is_err());
        assert!("TT".parse::<PieceKind>().is_err());
        assert!("".parse::<PieceKind>().is_err());
    }

    #[test]
    fn test_lock_ids() {
        let ids: Vec<u8> = PieceKind::ALL.iter().map(|k| k.lock_id()).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(PieceKind::from_lock_id(3), Some(PieceKind::T));
        assert_eq!(PieceKind::from_lock_id(0), None);
        assert_eq!(PieceKind::from_lock_id(8), None);
    }

    #[test]
    fn test_random_kinds_cover_catalog() {
        use rand::SeedableRng as _;

        let mut rng = rand_pcg::Pcg32::seed_from_u64(3);
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..500 {
            let kind: PieceKind = rng.random();
            seen[usize::from(kind.lock_id() - 1)] = true;
        }
        assert!(seen.iter().all(|s| *s), "{seen:?}");
    }

    #[test]
    fn test_piece_serialization() {
        let piece = Piece::new(PieceKind::S, 4, 18, rot(1));

        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, r#"{"type":"S","x":4,"y":18,"rot":1}"#);

        let deserialized: Piece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }

    #[test]
    fn test_piece_deserialization_error_cases() {
        assert!(serde_json::from_str::<Piece>(r#"{"type":"X","x":0,"y":0,"rot":0}"#).is_err());
        assert!(serde_json::from_str::<Piece>(r#"{"type":"S","x":0,"y":0,"rot":4}"#).is_err());
        assert!(serde_json::from_str::<Piece>(r#"{"type":"SZ","x":0,"y":0,"rot":0}"#).is_err());
    }
}
