//! Forage Arena Prelude: convenient imports for common usage.

pub use crate::config::{
    ArenaConfig, DistributionConfig, DistributionStrategy, PowerLawConfig,
};

pub use crate::cluster::{cluster_extent, BlockCluster, ClusterDistributor, ClusterPlacement};

pub use crate::distributor::BlockDistributor;

pub use crate::dispatch::{make_blocks, ArenaDistributor};

pub use crate::powerlaw::PowerLawSampler;

pub use crate::powerlaw_distributor::{PowerLawDistributor, MAX_PLACEMENT_ATTEMPTS};

pub use crate::random::RandomDistributor;
