//! Database layer (Firestore, with an in-memory stand-in).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

/// Collection names as constants.
pub mod collections {
    /// Identity records (keyed by uid)
    pub const ACCOUNTS: &str = "accounts";
    /// Per-user tip progress (keyed by uid)
    pub const USER_TIPS: &str = "user_tips";
    /// Static tip texts (keyed by day number)
    pub const TIPS: &str = "tips";
}
