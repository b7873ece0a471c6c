// ============================================================================
// N-Price Pricing Policy
// Mean of recent transaction prices, clamped to the pair
// ============================================================================

use std::collections::VecDeque;

use crate::domain::{MarketQuote, Order};
use crate::engine::KPricing;
use crate::errors::{ConfigError, NullPricingError};
use crate::interfaces::PricingPolicy;
use crate::numeric::{clamp, Price};
use rust_decimal::Decimal;

/// Prices each pair at the mean of the last `window` transaction prices,
/// clamped into `[ask, bid]` so that neither side trades beyond its limit.
///
/// Until `window` transactions have been recorded, pairs are priced with
/// k-interpolation. The history is updated by the auctioneer after a
/// clearing pass, so every pair of one pass sees the same mean.
#[derive(Debug, Clone)]
pub struct NPricing {
    window: usize,
    fallback: KPricing,
    history: VecDeque<Price>,
}

impl NPricing {
    pub fn new(window: usize, k: Decimal) -> Result<Self, ConfigError> {
        if window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(Self {
            window,
            fallback: KPricing::new(k)?,
            history: VecDeque::with_capacity(window),
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Mean of the recorded window, once it is full. Accumulated as a
    /// running mean, so it never leaves the range of the recorded prices.
    pub fn mean(&self) -> Option<Price> {
        if self.history.len() < self.window {
            return None;
        }
        let mean = self
            .history
            .iter()
            .zip(1u64..)
            .fold(Decimal::ZERO, |mean, (price, n)| {
                mean + (*price - mean) / Decimal::from(n)
            });
        Some(mean)
    }

    /// Recorded prices, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Price> {
        self.history.iter()
    }
}

impl PricingPolicy for NPricing {
    fn price(
        &self,
        bid: &Order,
        ask: &Order,
        quote: &MarketQuote,
    ) -> Result<Price, NullPricingError> {
        match self.mean() {
            Some(mean) => Ok(clamp(mean, ask.price(), bid.price())),
            None => self.fallback.price(bid, ask, quote),
        }
    }

    fn record_transaction(&mut self, price: Price) {
        self.history.push_back(price);
        if self.history.len() > self.window {
            self.history.pop_front();
        }
    }

    fn reset(&mut self) {
        self.history.clear();
    }

    fn name(&self) -> &str {
        "n-pricing"
    }
}
