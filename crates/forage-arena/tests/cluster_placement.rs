//! Placement invariants for the power-law cluster distributor.
//!
//! Run with: cargo test -p forage-arena -- proptest

use forage_arena::prelude::*;
use forage_core::prelude::*;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn mapped(
    xdsize: usize,
    ydsize: usize,
    min_power: u32,
    max_power: u32,
    n_clusters: usize,
    seed: u64,
) -> (ArenaGrid, Result<PowerLawDistributor<ChaCha8Rng>>) {
    let grid = ArenaGrid::new(xdsize, ydsize, 1.0).unwrap();
    let mut dist = PowerLawDistributor::configure(
        min_power,
        max_power,
        n_clusters,
        1.0,
        ChaCha8Rng::seed_from_u64(seed),
    )
    .unwrap();
    let result = dist.map_clusters(&grid).map(|_| dist);
    (grid, result)
}

fn assert_invariants(grid: &ArenaGrid, clusters: &[BlockCluster], min_power: u32, max_power: u32) {
    let bounds = grid.bounds();
    for (i, a) in clusters.iter().enumerate() {
        assert!(bounds.contains_rect(&a.rect), "cluster {} escapes the grid", i);
        assert!(a.capacity.is_power_of_two());
        let k = a.capacity.trailing_zeros();
        assert!((min_power..=max_power).contains(&k), "capacity {}", a.capacity);
        assert!(a.rect.extent.area() >= a.capacity as usize);
        for b in &clusters[i + 1..] {
            assert!(
                !a.rect.overlaps_inclusive(&b.rect),
                "clusters {} and {} overlap",
                a.id,
                b.id
            );
        }
    }
}

#[test]
fn fifty_by_fifty_three_clusters() {
    let (grid, result) = mapped(50, 50, 2, 4, 3, 2024);
    let dist = result.expect("placement succeeds on an open 50x50 arena");
    let clusters = dist.block_clusters();
    assert_eq!(clusters.len(), 3);
    for c in clusters {
        assert!([4, 8, 16].contains(&c.capacity));
    }
    assert_invariants(&grid, clusters, 2, 4);
}

#[test]
fn same_seed_same_layout() {
    let (_, a) = mapped(50, 50, 2, 4, 3, 77);
    let (_, b) = mapped(50, 50, 2, 4, 3, 77);
    assert_eq!(a.unwrap().block_clusters(), b.unwrap().block_clusters());
}

#[test]
fn full_distribution_respects_cluster_bounds() {
    let (mut grid, result) = mapped(60, 60, 1, 3, 5, 8);
    let mut dist = result.unwrap();
    let capacity = dist.capacity() as usize;
    let mut blocks: Vec<Block> = (0..capacity as u64).map(Block::cube).collect();
    dist.distribute_blocks(&mut grid, &mut blocks, &[]).unwrap();

    assert_eq!(grid.occupied_count(), capacity);
    for b in &blocks {
        let cell = b.dloc.unwrap();
        let owners: Vec<_> = dist
            .block_clusters()
            .iter()
            .filter(|c| c.contains_block(b.id))
            .collect();
        assert_eq!(owners.len(), 1);
        assert!(owners[0].contains_cell(&cell));
    }
}

#[test]
fn arena_distributor_places_all_blocks_after_fallback() {
    let mut grid = ArenaGrid::new(8, 8, 1.0).unwrap();
    let config = DistributionConfig {
        n_blocks: 12,
        powerlaw: PowerLawConfig {
            min_power: 5,
            max_power: 5,
            n_clusters: 3,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut dist = ArenaDistributor::build(&config, &grid, ChaCha8Rng::seed_from_u64(3)).unwrap();
    assert!(!dist.is_clustered());
    let mut blocks = make_blocks(&config);
    dist.distribute_blocks(&mut grid, &mut blocks, &[]).unwrap();
    assert_eq!(grid.occupied_count(), 12);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn proptest_successful_placements_hold_invariants(
        size in 20usize..80,
        min_power in 0u32..3,
        span in 0u32..3,
        n_clusters in 1usize..6,
        seed in any::<u64>(),
    ) {
        let max_power = min_power + span;
        let (grid, result) = mapped(size, size, min_power, max_power, n_clusters, seed);
        match result {
            Ok(dist) => {
                prop_assert_eq!(dist.block_clusters().len(), n_clusters);
                assert_invariants(&grid, dist.block_clusters(), min_power, max_power);
            }
            Err(e) => prop_assert!(matches!(e, ForageError::Placement { .. }), "unexpected error: {:?}", e),
        }
    }
}
