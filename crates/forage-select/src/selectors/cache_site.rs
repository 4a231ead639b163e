//! Choosing an empty location for a future cache.

use super::{block_within, cache_within, is_degenerate};
use crate::matrix::{CacheSelKey, CacheSelMatrix, SelValue};
use crate::utility::{best_by_utility, Candidate};
use forage_core::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A sampled cache site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteChoice {
    pub location: Vec2,
    pub utility: f64,
    /// False when the site breaks a proximity constraint and was only kept
    /// because constraints are not strict.
    pub feasible: bool,
}

/// Samples candidate sites and keeps the one closest to the robot–nest
/// corridor that respects every proximity constraint.
#[derive(Debug, Clone, Copy)]
pub struct CacheSiteSelector<'a> {
    matrix: &'a CacheSelMatrix,
    n_samples: usize,
}

impl<'a> CacheSiteSelector<'a> {
    pub fn new(matrix: &'a CacheSelMatrix, n_samples: usize) -> Self {
        Self {
            matrix,
            n_samples: n_samples.max(1),
        }
    }

    /// Whether `site` keeps clear of known caches, known blocks and the nest.
    pub fn is_feasible(&self, store: &DpoStore, site: Vec2) -> Result<bool> {
        let cache_prox = self.matrix.distance(CacheSelKey::CacheProxDist)?;
        let cluster_prox = self.matrix.distance(CacheSelKey::ClusterProxDist)?;
        let nest_prox = self.matrix.distance(CacheSelKey::NestProxDist)?;
        let nest = self.matrix.nest_loc()?;
        Ok(cache_within(store, site, cache_prox).is_none()
            && block_within(store, site, cluster_prox, None).is_none()
            && site.distance_to(&nest) > nest_prox)
    }

    pub fn select<R: Rng + ?Sized>(
        &self,
        store: &DpoStore,
        robot: Vec2,
        rng: &mut R,
    ) -> Result<Option<SiteChoice>> {
        let nest = self.matrix.nest_loc()?;
        let xrange = self.matrix.lookup_as(CacheSelKey::SiteXRange, SelValue::as_range)?;
        let yrange = self.matrix.lookup_as(CacheSelKey::SiteYRange, SelValue::as_range)?;
        let strict = self
            .matrix
            .lookup_as(CacheSelKey::StrictConstraints, SelValue::as_flag)?;

        let mut feasible = Vec::new();
        let mut infeasible = Vec::new();
        for i in 0..self.n_samples {
            let site = Vec2::new(
                rng.gen_range(xrange.lb as f64..=xrange.ub as f64),
                rng.gen_range(yrange.lb as f64..=yrange.ub as f64),
            );
            if is_degenerate(site, robot, nest) {
                continue;
            }
            let u = Candidate::Site { location: site }.utility(robot, nest);
            if self.is_feasible(store, site)? {
                feasible.push((i, site, u));
            } else {
                infeasible.push((i, site, u));
            }
        }

        let pick = |pool: &[(usize, Vec2, f64)], ok: bool| {
            best_by_utility(pool.iter().map(|&(i, _, u)| (i, u))).and_then(|(i, _)| {
                pool.iter().find(|(j, _, _)| *j == i).map(|&(_, location, utility)| SiteChoice {
                    location,
                    utility,
                    feasible: ok,
                })
            })
        };

        let choice = match pick(&feasible[..], true) {
            Some(c) => Some(c),
            None if !strict => {
                let c = pick(&infeasible[..], false);
                if let Some(c) = &c {
                    warn!("No feasible cache site in {} samples; using {}", self.n_samples, c.location);
                }
                c
            }
            None => None,
        };
        if let Some(c) = &choice {
            debug!("Selected cache site {} (utility {:.6})", c.location, c.utility);
        } else {
            debug!("No cache site satisfies the proximity constraints");
        }
        Ok(choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheSelConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn matrix(strict: bool, xrange: IntRange, yrange: IntRange) -> CacheSelMatrix {
        CacheSelMatrix::new(&CacheSelConfig {
            nest: Vec2::new(2.0, 25.0),
            cache_prox_dist: 4.0,
            cluster_prox_dist: 2.0,
            nest_prox_dist: 6.0,
            site_xrange: xrange,
            site_yrange: yrange,
            strict_constraints: strict,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn chosen_site_is_feasible() {
        let m = matrix(true, IntRange::new(1, 49), IntRange::new(1, 49));
        let mut store = DpoStore::default();
        store.observe_cache(
            Cache::new(CacheId(1), DiscreteCoord::new(20, 25), 3, 1.0, vec![], 0),
            0,
        );
        let sel = CacheSiteSelector::new(&m, 64);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let site = sel
            .select(&store, Vec2::new(40.0, 25.0), &mut rng)
            .unwrap()
            .expect("open arena has room for a site");
        assert!(site.feasible);
        assert!(sel.is_feasible(&store, site.location).unwrap());
        assert!(site.location.distance_to(&Vec2::new(20.0, 25.0)) > 4.0);
    }

    #[test]
    fn same_seed_same_site() {
        let m = matrix(true, IntRange::new(1, 49), IntRange::new(1, 49));
        let store = DpoStore::default();
        let sel = CacheSiteSelector::new(&m, 32);
        let robot = Vec2::new(30.0, 10.0);
        let a = sel.select(&store, robot, &mut ChaCha8Rng::seed_from_u64(4)).unwrap();
        let b = sel.select(&store, robot, &mut ChaCha8Rng::seed_from_u64(4)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn strict_constraints_reject_crowded_ranges() {
        // every sample lands within nest_prox of the nest
        let m = matrix(true, IntRange::new(1, 4), IntRange::new(23, 27));
        let sel = CacheSiteSelector::new(&m, 16);
        let got = sel
            .select(&DpoStore::default(), Vec2::new(30.0, 25.0), &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn relaxed_constraints_fall_back_to_best_infeasible() {
        let m = matrix(false, IntRange::new(1, 4), IntRange::new(23, 27));
        let sel = CacheSiteSelector::new(&m, 16);
        let got = sel
            .select(&DpoStore::default(), Vec2::new(30.0, 25.0), &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap()
            .unwrap();
        assert!(!got.feasible);
        assert!(got.utility > 0.0);
    }
}
