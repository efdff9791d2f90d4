use arrayvec::ArrayVec;
use rand::Rng as _;
use tracing::{debug, trace};

use crate::{
    Board, EngineConfig, EpisodeInfo, Event, FeatureVector, FrameAction, GRAVITY_TICKS,
    GameStats, GravityMode, HoldError, HoldState, LegalMove, LockDelayTimer, Observation, Piece,
    PieceKind, PieceRotation, Placement, PlacementError, RotationSystem, RuleFlags,
    SCHEMA_VERSION, SevenBagRandomizer, StepInfo, StepResult,
    engine::legal_moves::{self, SearchStart},
};

/// Reward returned for a placement that is rejected.
pub const INVALID_PLACEMENT_REWARD: f64 = -100.0;
/// Reward per cleared line for a successful placement.
pub const LINE_CLEAR_REWARD: f64 = 100.0;
/// Added to the placement reward when the next piece cannot spawn.
pub const TOP_OUT_PENALTY: f64 = -500.0;

/// Piece, hold slot and randomizer state captured before a placement replay.
#[derive(Debug, Clone)]
struct TurnSnapshot {
    current: Piece,
    held: Option<PieceKind>,
    hold_used: bool,
    lock_delay: LockDelayTimer,
    randomizer: SevenBagRandomizer,
}

/// Outcome of locking the active piece.
#[derive(Debug, Clone, Copy)]
struct LockOutcome {
    lines: usize,
    topped_out: bool,
}

/// Deterministic single-player Tetris simulation.
///
/// Two driving styles share one state:
///
/// - [`Self::step`] applies one [`FrameAction`] per tick, then gravity and
///   lock delay
/// - [`Self::step_placement`] jumps straight to a [`Placement`] taken from the
///   legal-move set and hard-drops it
///
/// Every call returns a [`StepResult`] with a fresh [`Observation`]. Errors are
/// reported in [`StepInfo::error`]; a rejected call leaves the engine exactly
/// as it was.
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: EngineConfig,
    rotation_system: RotationSystem,
    board: Board,
    randomizer: SevenBagRandomizer,
    current: Piece,
    held: Option<PieceKind>,
    hold_used: bool,
    lock_delay: LockDelayTimer,
    gravity_counter: u32,
    tick: u64,
    stats: GameStats,
    done: bool,
    last_features: FeatureVector,
}

impl GameEngine {
    /// Creates an engine and starts a game with a random seed.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let mut randomizer = SevenBagRandomizer::from_entropy();
        let current = Piece::spawn(randomizer.next_piece());
        Self {
            config,
            rotation_system: RotationSystem::new(config.srs_enabled),
            board: Board::EMPTY,
            randomizer,
            current,
            held: None,
            hold_used: false,
            lock_delay: LockDelayTimer::new(config.lock_delay_ticks),
            gravity_counter: 0,
            tick: 0,
            stats: GameStats::new(),
            done: false,
            last_features: FeatureVector::from_board(&Board::EMPTY),
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_piece(&self) -> Piece {
        self.current
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.randomizer.seed()
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Starts a new game. Without a seed one is drawn from the thread RNG.
    pub fn reset(&mut self, seed: Option<u64>) -> Observation {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        debug!(seed, "reset engine");

        self.randomizer.reset(seed);
        self.board = Board::EMPTY;
        self.held = None;
        self.hold_used = false;
        self.lock_delay = LockDelayTimer::new(self.config.lock_delay_ticks);
        self.gravity_counter = 0;
        self.tick = 0;
        self.stats = GameStats::new();
        self.done = false;
        self.current = Piece::spawn(self.randomizer.next_piece());
        self.last_features = FeatureVector::from_board(&self.board);

        self.observation()
    }

    /// Builds a snapshot of the current state, including the legal-move set.
    #[must_use]
    pub fn observation(&self) -> Observation {
        Observation {
            schema_version: SCHEMA_VERSION,
            tick: self.tick,
            board: self.board.clone(),
            current: self.current,
            next_queue: self.randomizer.peek(self.config.next_queue_size),
            hold: HoldState {
                kind: self.held,
                used: self.hold_used,
            },
            features: FeatureVector::from_board(&self.board),
            episode: EpisodeInfo {
                score: self.stats.score(),
                lines_total: self.stats.total_cleared_lines(),
                top_out: self.done,
                seed: self.randomizer.seed(),
            },
            legal_moves: self.legal_moves(),
            config: RuleFlags {
                srs: self.config.srs_enabled,
                hold: self.config.hold_enabled,
                gravity: GravityMode::Step,
            },
        }
    }

    /// Placements reachable from the current state.
    ///
    /// The held type is searched from its spawn state when hold is enabled,
    /// unused this turn and holding a different type than the active piece.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<LegalMove> {
        let mut starts = ArrayVec::<SearchStart, 2>::new();
        starts.push(SearchStart {
            piece: self.current,
            use_hold: false,
        });
        if let Some(held) = self.held.filter(|held| {
            self.config.hold_enabled && !self.hold_used && *held != self.current.kind()
        }) {
            starts.push(SearchStart {
                piece: Piece::spawn(held),
                use_hold: true,
            });
        }
        legal_moves::search_legal_moves(&self.board, &self.rotation_system, &starts)
    }

    /// Advances the game by one tick with a primitive action.
    ///
    /// Order: the action's immediate effect, then gravity and lock delay
    /// (both skipped for [`FrameAction::Hard`]). Reward is always 0.
    pub fn step(&mut self, action: FrameAction) -> StepResult {
        if self.done {
            return self.game_over_result();
        }

        let mut events = vec![];
        let mut lines_cleared = 0;

        match action {
            FrameAction::Left => {
                self.try_move(-1, 0);
            }
            FrameAction::Right => {
                self.try_move(1, 0);
            }
            FrameAction::Cw => {
                self.try_rotate(true);
            }
            FrameAction::Ccw => {
                self.try_rotate(false);
            }
            FrameAction::Soft => {
                self.try_move(0, 1);
            }
            FrameAction::Hard => {
                let outcome = self.hard_drop();
                lines_cleared = outcome.lines;
                events.push(Event::HardDrop);
                push_spawn_events(&mut events, outcome, false);
            }
            FrameAction::Hold => {
                if self.hold().is_ok() {
                    events.push(Event::Hold);
                    if self.board.collides(&self.current) {
                        self.end_game();
                        events.push(Event::TopOut);
                    }
                }
            }
            FrameAction::Noop => {}
        }

        if action != FrameAction::Hard && !self.done {
            self.apply_gravity();
            if let Some(outcome) = self.update_lock_delay() {
                lines_cleared = outcome.lines;
                events.push(Event::Lock);
                push_spawn_events(&mut events, outcome, true);
            }
        }

        self.tick += 1;
        self.finish(0.0, lines_cleared, events, None)
    }

    /// Places the active (or held) piece at a legal target and hard-drops it.
    ///
    /// The request is matched against [`Self::legal_moves`] on
    /// `(x, rot, use_hold)`. A request outside that set, or one whose replay
    /// fails, is rejected with reward −100 and no state change. An empty
    /// legal set ends the game with [`PlacementError::ToppedOut`].
    ///
    /// On success the reward is `100 × lines`, plus −500 if the next piece
    /// cannot spawn.
    pub fn step_placement(&mut self, placement: Placement) -> StepResult {
        if self.done {
            return self.game_over_result();
        }

        let legal = self.legal_moves();
        if legal.is_empty() {
            debug!(tick = self.tick, "no legal moves left");
            self.end_game();
            return self.finish(
                TOP_OUT_PENALTY,
                0,
                vec![Event::TopOut],
                Some(PlacementError::ToppedOut),
            );
        }

        let invalid = PlacementError::InvalidAction {
            x: placement.x,
            rot: placement.rot,
            use_hold: placement.use_hold,
        };
        if !legal.iter().any(|mv| mv.matches(&placement)) {
            debug!(?placement, "placement is not legal");
            return self.rejected(invalid);
        }

        let snapshot = self.snapshot();
        let mut events = vec![];

        if placement.use_hold {
            let held = self.hold().and_then(|()| {
                if self.board.collides(&self.current) {
                    Err(HoldError::PieceCollision)
                } else {
                    Ok(())
                }
            });
            if let Err(e) = held {
                debug!(error = %e, "hold failed during placement");
                self.restore(snapshot);
                return self.rejected(PlacementError::Hold(e));
            }
            events.push(Event::Hold);
        }

        let target = PieceRotation::new(placement.rot).and_then(|rotation| {
            legal_moves::reach(
                &self.board,
                &self.rotation_system,
                self.current,
                placement.x,
                rotation,
            )
        });
        let Some(target) = target else {
            debug!(?placement, "placement replay blocked");
            self.restore(snapshot);
            return self.rejected(invalid);
        };
        trace!(from = ?self.current, to = ?target, "replay placement");
        self.current = target;

        let outcome = self.hard_drop();
        events.push(Event::HardDrop);
        events.push(Event::Lock);
        push_spawn_events(&mut events, outcome, false);

        let mut reward = LINE_CLEAR_REWARD * u32::try_from(outcome.lines).map_or(0.0, f64::from);
        if outcome.topped_out {
            reward += TOP_OUT_PENALTY;
        }

        self.tick += 1;
        self.finish(reward, outcome.lines, events, None)
    }

    fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let moved = self.current.moved(dx, dy);
        if self.board.collides(&moved) {
            return false;
        }
        self.current = moved;
        true
    }

    fn try_rotate(&mut self, clockwise: bool) -> bool {
        match self
            .rotation_system
            .try_rotate(&self.board, &self.current, clockwise)
        {
            Some(rotated) => {
                self.current = rotated;
                true
            }
            None => false,
        }
    }

    fn hold(&mut self) -> Result<(), HoldError> {
        if !self.config.hold_enabled {
            return Err(HoldError::Disabled);
        }
        if self.hold_used {
            return Err(HoldError::AlreadyUsed);
        }

        let next = match self.held.replace(self.current.kind()) {
            Some(held) => held,
            None => self.randomizer.next_piece(),
        };
        self.current = Piece::spawn(next);
        self.hold_used = true;
        self.lock_delay.reset();
        Ok(())
    }

    fn apply_gravity(&mut self) {
        self.gravity_counter += 1;
        if self.gravity_counter >= GRAVITY_TICKS {
            self.gravity_counter = 0;
            self.try_move(0, 1);
        }
    }

    /// Returns the lock outcome when the delay expired on this tick.
    fn update_lock_delay(&mut self) -> Option<LockOutcome> {
        if !LockDelayTimer::is_on_ground(&self.board, &self.current) {
            self.lock_delay.reset();
            return None;
        }
        if !self.lock_delay.is_active() {
            self.lock_delay.start();
        }
        if !self.lock_delay.tick() {
            return None;
        }
        Some(self.lock_and_spawn())
    }

    fn hard_drop(&mut self) -> LockOutcome {
        self.current = legal_moves::drop_position(&self.board, self.current);
        self.lock_and_spawn()
    }

    fn lock_and_spawn(&mut self) -> LockOutcome {
        self.board.lock_piece(&self.current);
        self.lock_delay.reset();
        let lines = self.board.clear_lines();
        self.stats.complete_piece_drop(lines);

        self.current = Piece::spawn(self.randomizer.next_piece());
        self.hold_used = false;

        let topped_out = self.board.collides(&self.current);
        if topped_out {
            self.end_game();
        }
        LockOutcome { lines, topped_out }
    }

    fn end_game(&mut self) {
        debug!(
            tick = self.tick,
            score = self.stats.score(),
            lines = self.stats.total_cleared_lines(),
            "game over"
        );
        self.done = true;
    }

    fn snapshot(&self) -> TurnSnapshot {
        TurnSnapshot {
            current: self.current,
            held: self.held,
            hold_used: self.hold_used,
            lock_delay: self.lock_delay,
            randomizer: self.randomizer.clone(),
        }
    }

    fn restore(&mut self, snapshot: TurnSnapshot) {
        self.current = snapshot.current;
        self.held = snapshot.held;
        self.hold_used = snapshot.hold_used;
        self.lock_delay = snapshot.lock_delay;
        self.randomizer = snapshot.randomizer;
    }

    fn rejected(&mut self, error: PlacementError) -> StepResult {
        self.finish(INVALID_PLACEMENT_REWARD, 0, vec![], Some(error))
    }

    fn game_over_result(&mut self) -> StepResult {
        self.finish(0.0, 0, vec![], Some(PlacementError::GameOver))
    }

    fn finish(
        &mut self,
        reward: f64,
        lines_cleared: usize,
        events: Vec<Event>,
        error: Option<PlacementError>,
    ) -> StepResult {
        let features = FeatureVector::from_board(&self.board);
        let feature_delta = features.delta(&self.last_features);
        self.last_features = features;

        StepResult {
            observation: self.observation(),
            reward,
            done: self.done,
            info: StepInfo {
                lines_cleared,
                feature_delta,
                events,
                error,
            },
        }
    }
}

/// Appends `clear`, `spawn` and `top_out` for a lock outcome.
///
/// `always_spawn` keeps the `spawn` event even when the new piece collides.
fn push_spawn_events(events: &mut Vec<Event>, outcome: LockOutcome, always_spawn: bool) {
    if outcome.lines > 0 {
        events.push(Event::Clear);
    }
    if always_spawn || !outcome.topped_out {
        events.push(Event::Spawn);
    }
    if outcome.topped_out {
        events.push(Event::TopOut);
    }
}
