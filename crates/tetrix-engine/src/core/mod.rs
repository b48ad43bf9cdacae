pub use self::{block::*, grid::*, shape::*};

pub(crate) mod block;
pub(crate) mod grid;
pub(crate) mod shape;
