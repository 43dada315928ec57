//! Cox–Ingersoll–Ross short-rate simulation and mean-crossing signals.
//!
//! Euler scheme with full truncation:
//! r[i] = max(0, r[i-1] + beta*(alpha - r[i-1])*dt + sigma*sqrt(max(0, r[i-1]))*sqrt(dt)*Z)
//! with Z ~ N(0, 1) drawn from the caller's generator.

use crate::domain::Signal;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on `floor(horizon / dt)`. Longer paths are rejected before any
/// allocation.
pub const MAX_CIR_STEPS: usize = 10_000_000;

#[derive(Debug, Error, PartialEq)]
pub enum CirError {
    #[error("CIR parameter '{name}' must be finite (got {value})")]
    NotFinite { name: &'static str, value: f64 },
    #[error("CIR time step dt must be positive (got {0})")]
    NonPositiveStep(f64),
    #[error("CIR horizon must be non-negative (got {0})")]
    NegativeHorizon(f64),
    #[error("CIR volatility sigma must be non-negative (got {0})")]
    NegativeSigma(f64),
    #[error("CIR initial rate r0 must be non-negative (got {0})")]
    NegativeInitialRate(f64),
    #[error("CIR horizon / dt gives {steps} steps (max {max})", max = MAX_CIR_STEPS)]
    TooManySteps { steps: f64 },
}

/// CIR model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CirParams {
    /// Long-run mean level.
    pub alpha: f64,
    /// Speed of mean reversion.
    pub beta: f64,
    pub sigma: f64,
    pub r0: f64,
    /// Horizon in years (`T`).
    pub horizon: f64,
    pub dt: f64,
}

impl CirParams {
    pub fn validate(&self) -> Result<(), CirError> {
        for (name, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("sigma", self.sigma),
            ("r0", self.r0),
            ("horizon", self.horizon),
            ("dt", self.dt),
        ] {
            if !value.is_finite() {
                return Err(CirError::NotFinite { name, value });
            }
        }
        if self.dt <= 0.0 {
            return Err(CirError::NonPositiveStep(self.dt));
        }
        if self.horizon < 0.0 {
            return Err(CirError::NegativeHorizon(self.horizon));
        }
        if self.sigma < 0.0 {
            return Err(CirError::NegativeSigma(self.sigma));
        }
        if self.r0 < 0.0 {
            return Err(CirError::NegativeInitialRate(self.r0));
        }
        let steps = (self.horizon / self.dt).floor();
        if !steps.is_finite() || steps > MAX_CIR_STEPS as f64 {
            return Err(CirError::TooManySteps { steps });
        }
        Ok(())
    }

    /// Number of simulation steps: floor(horizon / dt). Only meaningful after
    /// `validate` has passed.
    pub fn steps(&self) -> usize {
        (self.horizon / self.dt).floor() as usize
    }
}

impl Default for CirParams {
    fn default() -> Self {
        Self {
            alpha: 0.03,
            beta: 0.5,
            sigma: 0.02,
            r0: 0.01,
            horizon: 1.0,
            dt: 1.0 / 252.0,
        }
    }
}

/// Simulated rate path and its aligned signals (`steps + 1` points each).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CirPath {
    pub rates: Vec<f64>,
    pub signals: Vec<Signal>,
}

/// Simulate a CIR path with the given random source.
pub fn simulate_cir<R: Rng + ?Sized>(params: &CirParams, rng: &mut R) -> Result<CirPath, CirError> {
    params.validate()?;

    let steps = params.steps();
    let sqrt_dt = params.dt.sqrt();
    let mut rates = Vec::with_capacity(steps + 1);
    rates.push(params.r0);

    for i in 1..=steps {
        let prev = rates[i - 1];
        let z: f64 = rng.sample(StandardNormal);
        let drift = params.beta * (params.alpha - prev) * params.dt;
        let diffusion = params.sigma * prev.max(0.0).sqrt() * sqrt_dt * z;
        rates.push((prev + drift + diffusion).max(0.0));
    }

    let signals = crossing_signals(&rates, params.alpha);
    Ok(CirPath { rates, signals })
}

/// Buy on an upward crossing of `mean`, sell on a downward one.
pub fn crossing_signals(rates: &[f64], mean: f64) -> Vec<Signal> {
    let mut signals = vec![Signal::Hold; rates.len()];
    for i in 1..rates.len() {
        let (prev, curr) = (rates[i - 1], rates[i]);
        if prev <= mean && curr > mean {
            signals[i] = Signal::Buy;
        } else if prev >= mean && curr < mean {
            signals[i] = Signal::Sell;
        }
    }
    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn path_length_and_start() {
        let params = CirParams::default();
        let mut rng = StdRng::seed_from_u64(7);
        let path = simulate_cir(&params, &mut rng).unwrap();
        assert_eq!(path.rates.len(), 253);
        assert_eq!(path.signals.len(), 253);
        assert_eq!(path.rates[0], 0.01);
        assert_eq!(path.signals[0], Signal::Hold);
        assert!(path.rates.iter().all(|&r| r >= 0.0));
    }

    #[test]
    fn same_seed_same_path() {
        let params = CirParams::default();
        let a = simulate_cir(&params, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = simulate_cir(&params, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_volatility_is_deterministic_reversion() {
        let params = CirParams {
            sigma: 0.0,
            ..CirParams::default()
        };
        let path = simulate_cir(&params, &mut StdRng::seed_from_u64(1)).unwrap();
        // Pure drift from below never reaches the mean, so no signals fire.
        for w in path.rates.windows(2) {
            assert!(w[1] > w[0] && w[1] < params.alpha);
        }
        assert!(path.signals.iter().all(|s| *s == Signal::Hold));
    }

    #[test]
    fn crossings_classified() {
        let signals = crossing_signals(&[0.01, 0.03, 0.04, 0.03, 0.02, 0.05], 0.03);
        assert_eq!(
            signals,
            vec![
                Signal::Hold,
                Signal::Hold, // reaches the mean but does not cross it
                Signal::Buy,  // 0.03 <= mean < 0.04
                Signal::Hold,
                Signal::Sell, // 0.03 >= mean > 0.02
                Signal::Buy,
            ]
        );
    }

    #[test]
    fn horizon_shorter_than_step_gives_single_point() {
        let params = CirParams {
            horizon: 0.001,
            ..CirParams::default()
        };
        let path = simulate_cir(&params, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(path.rates, vec![0.01]);
    }

    #[test]
    fn oversized_step_count_rejected() {
        let huge = CirParams {
            horizon: 1e300,
            dt: 1e-300,
            ..CirParams::default()
        };
        assert!(matches!(huge.validate(), Err(CirError::TooManySteps { .. })));
        assert!(matches!(
            simulate_cir(&huge, &mut StdRng::seed_from_u64(0)),
            Err(CirError::TooManySteps { .. })
        ));

        let at_cap = CirParams {
            horizon: MAX_CIR_STEPS as f64,
            dt: 1.0,
            ..CirParams::default()
        };
        assert_eq!(at_cap.validate(), Ok(()));
        let over_cap = CirParams {
            horizon: MAX_CIR_STEPS as f64 + 1.0,
            ..at_cap
        };
        assert!(matches!(over_cap.validate(), Err(CirError::TooManySteps { .. })));
    }

    #[test]
    fn invalid_parameters_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let bad_dt = CirParams {
            dt: 0.0,
            ..CirParams::default()
        };
        assert_eq!(
            simulate_cir(&bad_dt, &mut rng),
            Err(CirError::NonPositiveStep(0.0))
        );
        let bad_alpha = CirParams {
            alpha: f64::NAN,
            ..CirParams::default()
        };
        assert!(matches!(
            bad_alpha.validate(),
            Err(CirError::NotFinite { name: "alpha", .. })
        ));
        let bad_r0 = CirParams {
            r0: -0.01,
            ..CirParams::default()
        };
        assert_eq!(bad_r0.validate(), Err(CirError::NegativeInitialRate(-0.01)));
    }
}
