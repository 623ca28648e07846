use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::error::AppError;

/// Discrete market mode biasing the drift direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Regime {
    Upward,
    Downward,
    Flat,
}

/// Switch targets per regime. Indexed by `Regime::index`, so picking a new
/// regime is a table lookup instead of enumerate-and-filter.
const OTHER_REGIMES: [[Regime; 2]; 3] = [
    [Regime::Downward, Regime::Flat],
    [Regime::Upward, Regime::Flat],
    [Regime::Upward, Regime::Downward],
];

impl Regime {
    fn index(self) -> usize {
        match self {
            Regime::Upward => 0,
            Regime::Downward => 1,
            Regime::Flat => 2,
        }
    }

    /// Drift sign: +1 / -1 / 0.
    pub fn drift_direction(self) -> f64 {
        match self {
            Regime::Upward => 1.0,
            Regime::Downward => -1.0,
            Regime::Flat => 0.0,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Regime::Upward => "UP",
            Regime::Downward => "DOWN",
            Regime::Flat => "FLAT",
        }
    }
}

/// Parameters of the regime-switching walk. All magnitude parameters are
/// fractional multipliers applied to the current price, so the process is
/// scale-invariant with respect to `base_price`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub initial_regime: Regime,
    pub base_price: f64,
    pub volatility: f64,
    pub min_ticks_in_regime: u32,
    pub base_change_probability: f64,
    pub max_change_probability: f64,
    pub trend_strength: f64,
    pub jump_volatility: f64,
    pub jump_probability: f64,
    pub trend_acceleration: f64,
    pub max_trend_accumulation: f64,
    pub base_trend_factor: f64,
    pub momentum_factor: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            initial_regime: Regime::Upward,
            base_price: 100.0,
            volatility: 0.02,
            min_ticks_in_regime: 50,
            base_change_probability: 0.01,
            max_change_probability: 0.05,
            trend_strength: 2.0,
            jump_volatility: 0.1,
            jump_probability: 0.05,
            trend_acceleration: 0.001,
            max_trend_accumulation: 0.5,
            base_trend_factor: 0.004,
            momentum_factor: 0.002,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.base_price.is_finite() || self.base_price <= 0.0 {
            return Err(AppError::InvalidArgument(format!(
                "base_price must be positive, got {}",
                self.base_price
            )));
        }
        for (name, value) in [
            ("volatility", self.volatility),
            ("trend_strength", self.trend_strength),
            ("jump_volatility", self.jump_volatility),
            ("trend_acceleration", self.trend_acceleration),
            ("max_trend_accumulation", self.max_trend_accumulation),
            ("base_trend_factor", self.base_trend_factor),
            ("momentum_factor", self.momentum_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::InvalidArgument(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("base_change_probability", self.base_change_probability),
            ("max_change_probability", self.max_change_probability),
            ("jump_probability", self.jump_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AppError::InvalidArgument(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.max_change_probability < self.base_change_probability {
            return Err(AppError::InvalidArgument(
                "max_change_probability must be >= base_change_probability".to_string(),
            ));
        }
        Ok(())
    }
}

/// Price floor applied after every step.
const MIN_PRICE: f64 = 0.01;
/// Consecutive same-direction steps before momentum kicks in.
const MOMENTUM_THRESHOLD: i32 = 10;
/// Extra ticks past the dwell minimum over which the regime-change
/// probability saturates at its maximum.
const CHANGE_PROBABILITY_HORIZON: f64 = 100.0;

/// Stateful regime-switching random walk. Each `next_price` call advances
/// the process by one tick; the only failure mode is a rejected config at
/// construction.
#[derive(Debug)]
pub struct MarketPriceGenerator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
    current_price: f64,
    regime: Regime,
    ticks_in_regime: u32,
    consecutive_direction: i32,
    trend_accumulator: f64,
}

impl MarketPriceGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, AppError> {
        Self::from_rng(config, ChaCha8Rng::from_entropy())
    }

    /// Deterministic variant for tests and replayable demos.
    pub fn with_seed(config: GeneratorConfig, seed: u64) -> Result<Self, AppError> {
        Self::from_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(config: GeneratorConfig, rng: ChaCha8Rng) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self {
            current_price: config.base_price,
            regime: config.initial_regime,
            rng,
            config,
            ticks_in_regime: 0,
            consecutive_direction: 0,
            trend_accumulator: 0.0,
        })
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn ticks_in_regime(&self) -> u32 {
        self.ticks_in_regime
    }

    pub fn trend_accumulation(&self) -> f64 {
        self.trend_accumulator
    }

    pub fn consecutive_direction(&self) -> i32 {
        self.consecutive_direction
    }

    /// Advance the walk one tick and return the new price.
    ///
    /// The delta is the sum of a dwell-scaled drift term, the slow-building
    /// trend accumulator, damped uniform noise, an occasional regime-biased
    /// jump, and a momentum term for long one-directional runs. The result
    /// is floor-clamped so the price never reaches zero.
    pub fn next_price(&mut self) -> f64 {
        self.update_trend_accumulator();

        let total_change = self.base_trend_component()
            + self.accumulated_trend_component()
            + self.noise_component()
            + self.jump_component()
            + self.momentum_component();

        let new_price = (self.current_price * (1.0 + total_change)).max(MIN_PRICE);

        self.update_consecutive_direction(new_price);
        self.current_price = new_price;
        self.ticks_in_regime += 1;
        self.maybe_switch_regime();

        self.current_price
    }

    /// Restore the process to its configured starting point: base price,
    /// initial regime, all counters and accumulators cleared.
    pub fn reset(&mut self) {
        self.current_price = self.config.base_price;
        self.regime = self.config.initial_regime;
        self.ticks_in_regime = 0;
        self.consecutive_direction = 0;
        self.trend_accumulator = 0.0;
    }

    /// Override the regime directly, clearing dwell and momentum state.
    pub fn force_regime(&mut self, regime: Regime) {
        self.regime = regime;
        self.ticks_in_regime = 0;
        self.consecutive_direction = 0;
        self.trend_accumulator = 0.0;
    }

    fn update_trend_accumulator(&mut self) {
        if self.regime == Regime::Flat {
            // Flat regime bleeds accumulated trend off quickly.
            self.trend_accumulator *= 0.8;
            return;
        }
        let acceleration =
            self.config.trend_acceleration * (1.0 + self.ticks_in_regime as f64 / 200.0);
        self.trend_accumulator += acceleration * self.regime.drift_direction();
        self.trend_accumulator = self.trend_accumulator.clamp(
            -self.config.max_trend_accumulation,
            self.config.max_trend_accumulation,
        );
    }

    fn base_trend_component(&self) -> f64 {
        self.config.base_trend_factor
            * self.regime.drift_direction()
            * (1.0 + self.ticks_in_regime as f64 / 100.0)
    }

    fn accumulated_trend_component(&self) -> f64 {
        let time_factor = (self.ticks_in_regime as f64 / 50.0).min(3.0);
        self.trend_accumulator * time_factor * self.config.trend_strength
    }

    fn noise_component(&mut self) -> f64 {
        self.rng.gen_range(-1.0..1.0) * self.config.volatility * 0.3
    }

    fn jump_component(&mut self) -> f64 {
        if self.rng.gen::<f64>() >= self.config.jump_probability {
            return 0.0;
        }
        let upward_bias = match self.regime {
            Regime::Upward => 0.8,
            Regime::Downward => 0.2,
            Regime::Flat => 0.5,
        };
        let magnitude = self.rng.gen::<f64>() * self.config.jump_volatility;
        if self.rng.gen::<f64>() < upward_bias {
            magnitude
        } else {
            -magnitude
        }
    }

    fn momentum_component(&self) -> f64 {
        if self.consecutive_direction.abs() <= MOMENTUM_THRESHOLD {
            return 0.0;
        }
        let power = (self.config.momentum_factor * self.consecutive_direction.abs() as f64)
            .min(0.1);
        power * self.consecutive_direction.signum() as f64
    }

    fn update_consecutive_direction(&mut self, new_price: f64) {
        if new_price > self.current_price {
            self.consecutive_direction = self.consecutive_direction.max(0) + 1;
        } else if new_price < self.current_price {
            self.consecutive_direction = self.consecutive_direction.min(0) - 1;
        } else {
            self.consecutive_direction = 0;
        }
    }

    fn maybe_switch_regime(&mut self) {
        if self.ticks_in_regime < self.config.min_ticks_in_regime {
            return;
        }

        let extra_ticks = (self.ticks_in_regime - self.config.min_ticks_in_regime) as f64;
        let progress = (extra_ticks / CHANGE_PROBABILITY_HORIZON).min(1.0);
        let probability = self.config.base_change_probability
            + (self.config.max_change_probability - self.config.base_change_probability)
                * progress;

        if self.rng.gen::<f64>() < probability {
            let others = OTHER_REGIMES[self.regime.index()];
            self.regime = others[self.rng.gen_range(0..others.len())];
            self.ticks_in_regime = 0;
            self.consecutive_direction = 0;
            self.trend_accumulator = 0.0;
        }
    }
}
