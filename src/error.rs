/// Recoverable failures of a single tree operation.
///
/// Both are raised before any structural change happens, so the tree is left exactly
/// as it was and no step is emitted for the failing call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError<K> {
    #[error("{0} is already in the tree")]
    DuplicateKey(K),

    #[error("{0} is not in the tree")]
    KeyNotFound(K),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError<K> {
    #[error(transparent)]
    Tree(#[from] TreeError<K>),

    #[error("no saved state")]
    NoSavedState,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("no key given")]
    Empty,

    #[error("{0:?} is not a letter")]
    NotALetter(char),

    #[error("expected a single letter, got {0:?}")]
    TooLong(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A broken structural invariant, reported by
/// [`AvlTree::check_invariants`](crate::AvlTree::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("keys out of order at in-order position {position}")]
    Unordered { position: usize },

    #[error("balance factor {factor} at depth {depth}")]
    Unbalanced { depth: usize, factor: isize },

    #[error("child at depth {depth} does not point back to its parent")]
    BrokenParentLink { depth: usize },

    #[error("root has a parent")]
    RootHasParent,

    #[error("tree reports {reported} nodes but {reachable} are reachable")]
    LengthMismatch { reported: usize, reachable: usize },
}
