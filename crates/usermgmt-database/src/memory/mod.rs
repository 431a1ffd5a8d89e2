//! In-memory store implementations.
//!
//! Back the service and integration tests. Rows are kept
//! in insertion order so lookups are stable.

pub mod profile;
pub mod profile_link;
pub mod user;

pub use profile::{MemoryEmployerProfileStore, MemoryIndividualProfileStore};
pub use profile_link::MemoryProfileLinkStore;
pub use user::MemoryIdentityLookup;

use usermgmt_core::types::{PageRequest, PageResponse};

/// Slice an already-filtered result set into one page.
pub(crate) fn paginate<T>(rows: Vec<T>, page: &PageRequest) -> PageResponse<T> {
    let total = rows.len() as u64;
    let items = rows
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .collect();
    PageResponse::new(items, page, total)
}
