//! Forage Select Prelude: convenient imports for common usage.

pub use crate::config::{BlockSelConfig, CacheSelConfig};

pub use crate::matrix::{
    BlockSelKey, BlockSelMatrix, CacheSelKey, CacheSelMatrix, PickupPolicy, SelValue, UsageKind,
};

pub use crate::utility::{
    best_by_utility, BlockUtility, CacheSiteUtility, Candidate, ExistingCacheUtility,
    NewCacheUtility,
};

pub use crate::selectors::cache_site::SiteChoice;
pub use crate::selectors::new_cache::Exclusion;
pub use crate::selectors::{
    BlockSelector, CacheSiteSelector, ExistingCacheSelector, NewCacheSelector, Selection,
};
