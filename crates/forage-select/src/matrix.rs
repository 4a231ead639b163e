//! Selection matrices: closed-key configuration stores with runtime
//! exception lists.
//!
//! Values are a small sum type. Callers know which variant a key holds and
//! narrow with the `as_*` accessors; a mismatch is their wiring bug, not
//! the matrix's.

use crate::config::{BlockSelConfig, CacheSelConfig};
use forage_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// When a robot may pick up from an existing cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PickupPolicy {
    /// Any known cache may be used.
    #[default]
    None,
    /// Only caches at least this many timesteps old.
    Time(Tick),
    /// Only caches holding at least this many blocks.
    CacheSize(usize),
}

impl PickupPolicy {
    pub fn allows(&self, cache: &Cache, now: Tick) -> bool {
        match *self {
            PickupPolicy::None => true,
            PickupPolicy::Time(min_age) => cache.age(now) >= min_age,
            PickupPolicy::CacheSize(min_blocks) => cache.n_blocks() >= min_blocks,
        }
    }
}

/// Which operation an exception applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageKind {
    Pickup,
    Drop,
}

/// A selection matrix value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelValue {
    Distance(f64),
    Vector(Vec2),
    Range(IntRange),
    IdList(Vec<u64>),
    Policy(PickupPolicy),
    Flag(bool),
}

impl SelValue {
    pub fn as_distance(&self) -> Option<f64> {
        match self {
            SelValue::Distance(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<Vec2> {
        match self {
            SelValue::Vector(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<IntRange> {
        match self {
            SelValue::Range(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_id_list(&self) -> Option<&[u64]> {
        match self {
            SelValue::IdList(ids) => Some(ids),
            _ => None,
        }
    }

    pub fn as_policy(&self) -> Option<PickupPolicy> {
        match self {
            SelValue::Policy(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            SelValue::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

/// Keys of the cache selection matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CacheSelKey {
    NestLoc,
    CacheProxDist,
    ClusterProxDist,
    NestProxDist,
    SiteXRange,
    SiteYRange,
    PickupExceptions,
    DropExceptions,
    StrictConstraints,
    PickupPolicy,
}

impl fmt::Display for CacheSelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl UsageKind {
    fn exception_key(self) -> CacheSelKey {
        match self {
            UsageKind::Pickup => CacheSelKey::PickupExceptions,
            UsageKind::Drop => CacheSelKey::DropExceptions,
        }
    }
}

fn push_unique(list: &mut Vec<u64>, id: u64) -> bool {
    if list.contains(&id) {
        false
    } else {
        list.push(id);
        true
    }
}

/// Configuration consulted when ranking existing caches, new caches and
/// cache sites.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSelMatrix {
    values: BTreeMap<CacheSelKey, SelValue>,
}

impl CacheSelMatrix {
    /// Build from validated configuration. Exception lists start empty.
    pub fn new(config: &CacheSelConfig) -> Result<Self> {
        config.validate()?;
        let values = BTreeMap::from([
            (CacheSelKey::NestLoc, SelValue::Vector(config.nest)),
            (CacheSelKey::CacheProxDist, SelValue::Distance(config.cache_prox_dist)),
            (CacheSelKey::ClusterProxDist, SelValue::Distance(config.cluster_prox_dist)),
            (CacheSelKey::NestProxDist, SelValue::Distance(config.nest_prox_dist)),
            (CacheSelKey::SiteXRange, SelValue::Range(config.site_xrange)),
            (CacheSelKey::SiteYRange, SelValue::Range(config.site_yrange)),
            (CacheSelKey::PickupExceptions, SelValue::IdList(Vec::new())),
            (CacheSelKey::DropExceptions, SelValue::IdList(Vec::new())),
            (CacheSelKey::StrictConstraints, SelValue::Flag(config.strict_constraints)),
            (CacheSelKey::PickupPolicy, SelValue::Policy(config.pickup_policy)),
        ]);
        Ok(Self { values })
    }

    /// A matrix holding only the given entries, for callers that wire up a
    /// partial configuration.
    pub fn from_entries(entries: impl IntoIterator<Item = (CacheSelKey, SelValue)>) -> Self {
        Self {
            values: entries.into_iter().collect(),
        }
    }

    pub fn lookup(&self, key: CacheSelKey) -> Result<&SelValue> {
        self.values
            .get(&key)
            .ok_or_else(|| ForageError::key_not_found(key))
    }

    /// Look up a key and narrow it, treating a variant mismatch as a miss.
    pub fn lookup_as<T>(&self, key: CacheSelKey, narrow: impl FnOnce(&SelValue) -> Option<T>) -> Result<T> {
        narrow(self.lookup(key)?).ok_or_else(|| ForageError::key_not_found(key))
    }

    pub fn nest_loc(&self) -> Result<Vec2> {
        self.lookup_as(CacheSelKey::NestLoc, SelValue::as_vector)
    }

    pub fn distance(&self, key: CacheSelKey) -> Result<f64> {
        self.lookup_as(key, SelValue::as_distance)
    }

    /// Disqualify `object_id` for `usage` until the next `clear_exceptions`.
    /// Adding the same pair twice is a no-op.
    pub fn add_exception(&mut self, object_id: u64, usage: UsageKind) {
        let entry = self
            .values
            .entry(usage.exception_key())
            .or_insert_with(|| SelValue::IdList(Vec::new()));
        if let SelValue::IdList(ids) = entry {
            if push_unique(ids, object_id) {
                debug!("Added {:?} exception for object {}", usage, object_id);
            }
        }
    }

    /// Empty both exception lists.
    pub fn clear_exceptions(&mut self) {
        for key in [CacheSelKey::PickupExceptions, CacheSelKey::DropExceptions] {
            if let Some(SelValue::IdList(ids)) = self.values.get_mut(&key) {
                ids.clear();
            }
        }
    }

    pub fn is_excepted(&self, object_id: u64, usage: UsageKind) -> bool {
        self.values
            .get(&usage.exception_key())
            .and_then(SelValue::as_id_list)
            .is_some_and(|ids| ids.contains(&object_id))
    }
}

/// Keys of the block selection matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockSelKey {
    NestLoc,
    CubePriority,
    RampPriority,
    BlockExceptions,
}

impl fmt::Display for BlockSelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Configuration consulted when ranking free blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSelMatrix {
    values: BTreeMap<BlockSelKey, SelValue>,
}

impl BlockSelMatrix {
    pub fn new(config: &BlockSelConfig) -> Result<Self> {
        config.validate()?;
        let values = BTreeMap::from([
            (BlockSelKey::NestLoc, SelValue::Vector(config.nest)),
            (BlockSelKey::CubePriority, SelValue::Distance(config.cube_priority)),
            (BlockSelKey::RampPriority, SelValue::Distance(config.ramp_priority)),
            (BlockSelKey::BlockExceptions, SelValue::IdList(Vec::new())),
        ]);
        Ok(Self { values })
    }

    pub fn lookup(&self, key: BlockSelKey) -> Result<&SelValue> {
        self.values
            .get(&key)
            .ok_or_else(|| ForageError::key_not_found(key))
    }

    pub fn nest_loc(&self) -> Result<Vec2> {
        self.lookup(BlockSelKey::NestLoc)?
            .as_vector()
            .ok_or_else(|| ForageError::key_not_found(BlockSelKey::NestLoc))
    }

    /// Selection weight for a block of the given kind.
    pub fn priority(&self, kind: BlockKind) -> Result<f64> {
        let key = match kind {
            BlockKind::Cube => BlockSelKey::CubePriority,
            BlockKind::Ramp => BlockSelKey::RampPriority,
        };
        self.lookup(key)?
            .as_distance()
            .ok_or_else(|| ForageError::key_not_found(key))
    }

    pub fn add_exception(&mut self, block: BlockId) {
        if let Some(SelValue::IdList(ids)) = self.values.get_mut(&BlockSelKey::BlockExceptions) {
            push_unique(ids, block.0);
        }
    }

    pub fn clear_exceptions(&mut self) {
        if let Some(SelValue::IdList(ids)) = self.values.get_mut(&BlockSelKey::BlockExceptions) {
            ids.clear();
        }
    }

    pub fn is_excepted(&self, block: BlockId) -> bool {
        self.values
            .get(&BlockSelKey::BlockExceptions)
            .and_then(SelValue::as_id_list)
            .is_some_and(|ids| ids.contains(&block.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> CacheSelMatrix {
        CacheSelMatrix::new(&CacheSelConfig::default()).unwrap()
    }

    #[test]
    fn lookup_returns_typed_values() {
        let m = matrix();
        assert_eq!(m.nest_loc().unwrap(), CacheSelConfig::default().nest);
        assert!(m.lookup(CacheSelKey::StrictConstraints).unwrap().as_flag().is_some());
        assert!(m.lookup(CacheSelKey::NestLoc).unwrap().as_distance().is_none());
    }

    #[test]
    fn missing_key_is_reported() {
        let m = CacheSelMatrix::from_entries([(CacheSelKey::NestLoc, SelValue::Vector(Vec2::default()))]);
        assert_eq!(
            m.lookup(CacheSelKey::CacheProxDist),
            Err(ForageError::KeyNotFound("CacheProxDist".into()))
        );
    }

    #[test]
    fn exceptions_are_idempotent_per_kind() {
        let mut m = matrix();
        m.add_exception(3, UsageKind::Pickup);
        m.add_exception(3, UsageKind::Pickup);
        m.add_exception(3, UsageKind::Drop);
        assert_eq!(
            m.lookup(CacheSelKey::PickupExceptions).unwrap().as_id_list(),
            Some(&[3u64][..])
        );
        assert!(m.is_excepted(3, UsageKind::Drop));
        assert!(!m.is_excepted(4, UsageKind::Pickup));
    }

    #[test]
    fn clear_empties_both_lists() {
        let mut m = matrix();
        m.add_exception(1, UsageKind::Pickup);
        m.add_exception(2, UsageKind::Drop);
        m.clear_exceptions();
        assert!(!m.is_excepted(1, UsageKind::Pickup));
        assert!(!m.is_excepted(2, UsageKind::Drop));
    }

    #[test]
    fn pickup_policy_checks() {
        let cache = Cache::new(
            CacheId(1),
            DiscreteCoord::new(0, 0),
            1,
            1.0,
            vec![BlockId(1), BlockId(2)],
            10,
        );
        assert!(PickupPolicy::None.allows(&cache, 0));
        assert!(PickupPolicy::Time(5).allows(&cache, 15));
        assert!(!PickupPolicy::Time(5).allows(&cache, 14));
        assert!(PickupPolicy::CacheSize(2).allows(&cache, 0));
        assert!(!PickupPolicy::CacheSize(3).allows(&cache, 0));
    }

    #[test]
    fn block_matrix_priorities_and_exceptions() {
        let mut m = BlockSelMatrix::new(&BlockSelConfig::default()).unwrap();
        assert!(m.priority(BlockKind::Ramp).unwrap() > 0.0);
        m.add_exception(BlockId(9));
        assert!(m.is_excepted(BlockId(9)));
        m.clear_exceptions();
        assert!(!m.is_excepted(BlockId(9)));
    }
}
