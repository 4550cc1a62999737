pub mod grid;
pub mod ops;
pub mod primitives;

pub use grid::{Pattern, GRID_SIZE};
pub use ops::{BinaryOp, Operator, UnaryOp};
pub use primitives::{Primitive, PrimitiveKind};
