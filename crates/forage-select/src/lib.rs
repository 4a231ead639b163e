//! # Forage Select
//!
//! How a robot decides where to go next.
//!
//! A [`CacheSelMatrix`](matrix::CacheSelMatrix) or
//! [`BlockSelMatrix`](matrix::BlockSelMatrix) holds the parameters of a
//! decision, plus exception lists that temporarily disqualify objects the
//! robot just failed to use. The [`utility`] scorers turn one candidate into
//! a positive number, and the [`selectors`] rank every candidate the robot
//! knows about.
//!
//! ```rust
//! use forage_core::prelude::*;
//! use forage_select::prelude::*;
//!
//! let matrix = CacheSelMatrix::new(&CacheSelConfig {
//!     nest: Vec2::new(0.0, 0.0),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let mut store = DpoStore::default();
//! store.observe_cache(
//!     Cache::new(CacheId(1), DiscreteCoord::new(5, 5), 3, 1.0, vec![BlockId(1), BlockId(2), BlockId(3)], 0),
//!     0,
//! );
//!
//! let best = ExistingCacheSelector::new(&matrix)
//!     .select(&store, Vec2::new(10.0, 10.0), 0, UsageKind::Pickup)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(best.id, CacheId(1));
//! ```

pub mod config;
pub mod matrix;
pub mod utility;
pub mod selectors;
pub mod prelude;
