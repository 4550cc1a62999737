pub mod controller;
pub mod events;
pub mod operand;
pub mod resolver;
pub mod state;

pub use controller::{PendingView, WorkspaceController};
pub use events::{WorkflowAction, WorkspaceEvent};
pub use operand::{OperandKind, OperandSource};
pub use state::{OperandSlot, PendingState, PendingStatus};
