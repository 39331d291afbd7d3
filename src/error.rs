use std::fmt;

/// Invariant violations raised by the decision core
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentError {
    /// `PriorityQueue::remove` was called with nothing in the heap
    EmptyHeap,
    /// An action name not present in the agent's action map
    UnknownAction(String),
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyHeap => write!(f, "no nodes in heap"),
            Self::UnknownAction(name) => write!(f, "unknown action '{}'", name),
        }
    }
}

impl std::error::Error for AgentError {}
