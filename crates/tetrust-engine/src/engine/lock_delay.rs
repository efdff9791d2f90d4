use crate::{Board, Piece};

/// Grace period a grounded piece gets before it is forced to lock.
///
/// States: airborne (`active == false`), grounded and counting, and locked
/// once [`Self::tick`] reports the threshold was reached. The owner resets the
/// timer on spawn and whenever the piece leaves the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockDelayTimer {
    delay_ticks: u32,
    active: bool,
    ticks_on_ground: u32,
}

impl Default for LockDelayTimer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY_TICKS)
    }
}

impl LockDelayTimer {
    /// 30 ticks, half a second at 60 Hz.
    pub const DEFAULT_DELAY_TICKS: u32 = 30;

    #[must_use]
    pub const fn new(delay_ticks: u32) -> Self {
        Self {
            delay_ticks,
            active: false,
            ticks_on_ground: 0,
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub const fn ticks_on_ground(&self) -> u32 {
        self.ticks_on_ground
    }

    #[must_use]
    pub const fn delay_ticks(&self) -> u32 {
        self.delay_ticks
    }

    /// Starts counting from zero.
    pub const fn start(&mut self) {
        self.active = true;
        self.ticks_on_ground = 0;
    }

    /// Advances one tick and returns `true` when the piece must lock.
    pub const fn tick(&mut self) -> bool {
        self.ticks_on_ground += 1;
        self.ticks_on_ground >= self.delay_ticks
    }

    /// Returns to the airborne state.
    pub const fn reset(&mut self) {
        self.active = false;
        self.ticks_on_ground = 0;
    }

    /// A piece is grounded when moving it one row down would collide.
    #[must_use]
    pub fn is_on_ground(board: &Board, piece: &Piece) -> bool {
        board.collides(&piece.down())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    #[test]
    fn test_locks_after_threshold() {
        let mut timer = LockDelayTimer::new(3);
        assert!(!timer.is_active());

        timer.start();
        assert!(timer.is_active());
        assert!(!timer.tick());
        assert!(!timer.tick());
        assert!(timer.tick());
        assert_eq!(timer.ticks_on_ground(), 3);
    }

    #[test]
    fn test_reset_returns_to_airborne() {
        let mut timer = LockDelayTimer::default();
        timer.start();
        timer.tick();
        timer.reset();
        assert!(!timer.is_active());
        assert_eq!(timer.ticks_on_ground(), 0);
        assert_eq!(timer.delay_ticks(), 30);
    }

    #[test]
    fn test_start_restarts_count() {
        let mut timer = LockDelayTimer::new(5);
        timer.start();
        timer.tick();
        timer.tick();
        timer.start();
        assert_eq!(timer.ticks_on_ground(), 0);
    }

    #[test]
    fn test_is_on_ground() {
        let board = Board::from_ascii("##........");
        let spawn = Piece::spawn(PieceKind::O);
        assert!(!LockDelayTimer::is_on_ground(&board, &spawn));

        // O cells sit at rows y and y + 1
        let floor = spawn.moved(0, 17);
        assert!(LockDelayTimer::is_on_ground(&board, &floor));

        // resting on the stack in columns 0..=1
        let on_stack = Piece::new(PieceKind::O, -1, 17, spawn.rotation());
        assert!(LockDelayTimer::is_on_ground(&board, &on_stack));
        assert!(!LockDelayTimer::is_on_ground(&board, &on_stack.moved(0, -1)));
    }
}
