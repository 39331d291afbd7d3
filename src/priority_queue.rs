// Max-priority binary heap used as the planner's frontier
//
// Tie handling is part of the contract: sift-up stops on equal priorities,
// sift-down keeps swapping on equal priorities and prefers the right child
// when both children tie. Changing either changes which of several
// equal-priority search nodes is expanded first.

use crate::error::AgentError;

/// A value together with the priority it was inserted under
#[derive(Debug, Clone, PartialEq)]
pub struct HeapEntry<T, P> {
    pub value: T,
    pub priority: P,
}

/// Max-heap over (value, priority) pairs
#[derive(Debug, Clone)]
pub struct PriorityQueue<T, P> {
    heap: Vec<HeapEntry<T, P>>,
}

impl<T, P: PartialOrd> PriorityQueue<T, P> {
    pub fn new() -> Self {
        PriorityQueue { heap: Vec::new() }
    }

    /// Number of entries currently held
    pub fn heap_size(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Appends the entry and sifts it up past strictly lower-priority parents
    pub fn insert(&mut self, value: T, priority: P) {
        self.heap.push(HeapEntry { value, priority });

        let mut current = self.heap.len() - 1;
        while current > 0 {
            let parent = (current - 1) / 2;
            if self.heap[current].priority > self.heap[parent].priority {
                self.heap.swap(current, parent);
                current = parent;
            } else {
                break;
            }
        }
    }

    /// Removes and returns the highest-priority entry
    pub fn remove(&mut self) -> Result<HeapEntry<T, P>, AgentError> {
        match self.heap.len() {
            0 => Err(AgentError::EmptyHeap),
            1 | 2 => Ok(self.heap.swap_remove(0)),
            _ => {
                let removed = self.heap.swap_remove(0);
                self.sift_down();
                Ok(removed)
            }
        }
    }

    fn sift_down(&mut self) {
        let len = self.heap.len();
        let mut current = 0;

        loop {
            let left = 2 * current + 1;
            let right = left + 1;
            let max_child =
                if right < len && self.heap[right].priority >= self.heap[left].priority {
                    right
                } else {
                    left
                };

            if max_child < len && self.heap[max_child].priority >= self.heap[current].priority {
                self.heap.swap(current, max_child);
                current = max_child;
            } else {
                break;
            }
        }
    }
}

impl<T, P: PartialOrd> Default for PriorityQueue<T, P> {
    fn default() -> Self {
        Self::new()
    }
}
