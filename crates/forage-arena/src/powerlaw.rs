//! Binned power-law distribution over cluster capacities.
//!
//! A continuous value is drawn from p(x) ∝ x^(-exponent) on
//! `[2^min_power, 2^(max_power + 1))` by inverse-CDF sampling, then rounded
//! down to a power of two. Every sample is therefore `2^k` with
//! `k ∈ [min_power, max_power]`, and small clusters are more common than
//! large ones.

use crate::config::{PowerLawConfig, MAX_POWER_LIMIT};
use forage_core::error::{ForageError, Result};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawSampler {
    min_power: u32,
    max_power: u32,
    exponent: f64,
}

impl PowerLawSampler {
    pub fn new(min_power: u32, max_power: u32, exponent: f64) -> Result<Self> {
        if min_power > max_power {
            return Err(ForageError::invalid_config(
                "min_power",
                min_power.to_string(),
                format!("greater than max_power ({})", max_power),
            ));
        }
        if max_power > MAX_POWER_LIMIT {
            return Err(ForageError::out_of_range(
                "max_power",
                0.0,
                MAX_POWER_LIMIT as f64,
                max_power as f64,
            ));
        }
        if !(exponent > 0.0) || !exponent.is_finite() {
            return Err(ForageError::invalid_config(
                "exponent",
                exponent.to_string(),
                "must be positive and finite",
            ));
        }
        Ok(Self {
            min_power,
            max_power,
            exponent,
        })
    }

    pub fn from_config(config: &PowerLawConfig) -> Result<Self> {
        Self::new(config.min_power, config.max_power, config.exponent)
    }

    pub fn min_power(&self) -> u32 {
        self.min_power
    }

    pub fn max_power(&self) -> u32 {
        self.max_power
    }

    /// Smallest and largest capacity this sampler can return.
    pub fn capacity_bounds(&self) -> (u32, u32) {
        (1u32 << self.min_power, 1u32 << self.max_power)
    }

    /// Whether `capacity` is one of the binned values.
    pub fn is_valid_capacity(&self, capacity: u32) -> bool {
        capacity.is_power_of_two()
            && (self.min_power..=self.max_power).contains(&capacity.trailing_zeros())
    }

    /// Draw one continuous value in `[2^min_power, 2^(max_power + 1))`.
    fn sample_continuous<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let lo = 2f64.powi(self.min_power as i32);
        let hi = 2f64.powi(self.max_power as i32 + 1);
        let u: f64 = rng.gen();
        if (self.exponent - 1.0).abs() < f64::EPSILON {
            lo * (hi / lo).powf(u)
        } else {
            let a = 1.0 - self.exponent;
            (lo.powf(a) + u * (hi.powf(a) - lo.powf(a))).powf(1.0 / a)
        }
    }

    /// Draw one capacity, rounded down to the nearest power of two.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let x = self.sample_continuous(rng);
        let k = (x.log2().floor() as i64).clamp(self.min_power as i64, self.max_power as i64);
        1u32 << k
    }

    pub fn sample_n<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<u32> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}
