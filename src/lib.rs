//! An AVL tree that turns every insertion and removal into an ordered sequence of
//! snapshots, so the rebalancing can be watched one rotation at a time.

// the tree and what it emits
pub mod tree;
pub mod step;

// showing the steps
pub mod sequencer;
pub mod layout;
pub mod session;

// plumbing
pub mod config;
pub mod error;
pub mod key;
pub mod logging;

pub use error::{ConfigError, InvariantViolation, KeyError, SessionError, TreeError};
pub use sequencer::{Frame, Renderer, Sequencer};
pub use session::Session;
pub use step::{Shape, ShapeNode, Step, StepKind, StepSink};
pub use tree::{AvlTree, NodeId};
