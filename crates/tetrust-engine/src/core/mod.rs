pub use self::{board::*, piece::*, rotation::*};

pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod rotation;
