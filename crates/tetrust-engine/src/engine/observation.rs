use serde::{Serialize, Serializer};

use crate::{Board, FeatureVector, LegalMove, Piece, PieceKind};

/// Read-only snapshot of the engine after a call.
///
/// The observation owns its board; mutating it (or a clone of it) never
/// affects the engine. Serializing it produces the stable wire format:
///
/// ```text
/// schema_version, tick,
/// board{w, h, cells, row_heights, holes_per_col},
/// current{type, x, y, rot}, next_queue, hold{type, used},
/// features{agg_height, bumpiness, well_max, holes, row_trans, col_trans},
/// episode{score, lines_total, top_out, seed},
/// legal_moves[{x, rot, use_hold, harddrop_y}],
/// config{srs, hold, gravity}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub schema_version: &'static str,
    pub tick: u64,
    #[serde(serialize_with = "serialize_board")]
    pub board: Board,
    pub current: Piece,
    pub next_queue: Vec<PieceKind>,
    pub hold: HoldState,
    pub features: FeatureVector,
    pub episode: EpisodeInfo,
    pub legal_moves: Vec<LegalMove>,
    pub config: RuleFlags,
}

impl Observation {
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_piece(&self) -> Piece {
        self.current
    }

    #[must_use]
    pub fn hold_type(&self) -> Option<PieceKind> {
        self.hold.kind
    }

    #[must_use]
    pub fn is_topped_out(&self) -> bool {
        self.episode.top_out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HoldState {
    #[serde(rename = "type")]
    pub kind: Option<PieceKind>,
    pub used: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EpisodeInfo {
    pub score: u32,
    pub lines_total: usize,
    pub top_out: bool,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleFlags {
    pub srs: bool,
    pub hold: bool,
    pub gravity: GravityMode,
}

/// Only discrete per-step gravity is modeled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GravityMode {
    #[default]
    Step,
}

fn serialize_board<S>(board: &Board, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    #[derive(Serialize)]
    struct BoardWire {
        w: usize,
        h: usize,
        cells: Vec<u8>,
        row_heights: [usize; Board::WIDTH],
        holes_per_col: [usize; Board::WIDTH],
    }

    BoardWire {
        w: Board::WIDTH,
        h: Board::HEIGHT,
        cells: board.cells(),
        row_heights: board.column_heights(),
        holes_per_col: board.holes_per_column(),
    }
    .serialize(serializer)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::PieceRotation;

    fn sample() -> Observation {
        let board = Board::from_ascii("#.........");
        Observation {
            schema_version: "s1.0.0",
            tick: 7,
            features: FeatureVector::from_board(&board),
            board,
            current: Piece::new(PieceKind::T, 3, 1, PieceRotation::SPAWN),
            next_queue: vec![PieceKind::I, PieceKind::O, PieceKind::Z],
            hold: HoldState {
                kind: None,
                used: false,
            },
            episode: EpisodeInfo {
                score: 40,
                lines_total: 1,
                top_out: false,
                seed: 42,
            },
            legal_moves: vec![LegalMove {
                x: 0,
                rot: 0,
                use_hold: false,
                landing_y: 17,
            }],
            config: RuleFlags {
                srs: true,
                hold: true,
                gravity: GravityMode::Step,
            },
        }
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["schema_version"], "s1.0.0");
        assert_eq!(json["tick"], 7);
        assert_eq!(json["board"]["w"], 10);
        assert_eq!(json["board"]["h"], 20);
        assert_eq!(json["board"]["cells"].as_array().unwrap().len(), 200);
        assert_eq!(json["board"]["cells"][190], 1);
        assert_eq!(json["board"]["row_heights"], json!([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]));
        assert_eq!(json["board"]["holes_per_col"], json!([0, 0, 0, 0, 0, 0, 0, 0, 0, 0]));
        assert_eq!(json["current"], json!({"type": "T", "x": 3, "y": 1, "rot": 0}));
        assert_eq!(json["next_queue"], json!(["I", "O", "Z"]));
        assert_eq!(json["hold"], json!({"type": null, "used": false}));
        assert_eq!(json["features"]["agg_height"], 1);
        assert_eq!(
            json["episode"],
            json!({"score": 40, "lines_total": 1, "top_out": false, "seed": 42})
        );
        assert_eq!(
            json["legal_moves"],
            json!([{"x": 0, "rot": 0, "use_hold": false, "harddrop_y": 17}])
        );
        assert_eq!(json["config"], json!({"srs": true, "hold": true, "gravity": "step"}));
    }

    #[test]
    fn test_held_type_serializes_as_letter() {
        let mut observation = sample();
        observation.hold = HoldState {
            kind: Some(PieceKind::L),
            used: true,
        };
        assert_eq!(observation.hold_type(), Some(PieceKind::L));

        let json = serde_json::to_value(&observation).unwrap();
        assert_eq!(json["hold"], json!({"type": "L", "used": true}));
    }

    #[test]
    fn test_board_copy_is_independent() {
        let observation = sample();
        let mut board = observation.board().clone();
        board.lock_piece(&observation.current_piece());
        assert_ne!(&board, observation.board());
    }
}
