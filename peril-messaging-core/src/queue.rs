// peril-messaging-core/src/queue.rs

/// The two queue shapes the game uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueType {
    /// Shared and replay-safe: survives broker restarts, never auto-deleted.
    Durable,
    /// Per-client and ephemeral: exclusive to one connection, deleted with it.
    Transient,
}

impl QueueType {
    pub const fn durable(self) -> bool {
        matches!(self, Self::Durable)
    }

    pub const fn auto_delete(self) -> bool {
        matches!(self, Self::Transient)
    }

    pub const fn exclusive(self) -> bool {
        matches!(self, Self::Transient)
    }
}
