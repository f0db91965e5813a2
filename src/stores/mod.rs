//! SQLite-backed stores, one per table. Each holds a pool handle and is
//! cheap to clone into handlers.

mod conversations;
mod leads;
mod listings;
mod visits;

pub use conversations::ConversationStore;
pub use leads::LeadStore;
pub use listings::{ListingFilter, ListingStore};
pub use visits::VisitStore;
