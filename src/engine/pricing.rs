// ============================================================================
// Pricing Policies
// K-interpolation family and the null placeholder
// ============================================================================

use crate::domain::config::check_k;
use crate::domain::{MarketQuote, Order};
use crate::errors::{ConfigError, NullPricingError};
use crate::interfaces::PricingPolicy;
use crate::numeric::{interpolate, Price};
use rust_decimal::Decimal;

/// Discriminatory k-pricing
///
/// Each pair trades at `k * bid + (1 - k) * ask`. `k = 1` gives the buyer's
/// price, `k = 0` the seller's.
///
/// # Example
/// ```text
/// bid 100, ask 80, k = 0.5  =>  90
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KPricing {
    k: Decimal,
}

impl KPricing {
    pub fn new(k: Decimal) -> Result<Self, ConfigError> {
        check_k(k)?;
        Ok(Self { k })
    }

    pub fn k(&self) -> Decimal {
        self.k
    }
}

impl Default for KPricing {
    fn default() -> Self {
        Self {
            k: Decimal::new(5, 1),
        }
    }
}

impl PricingPolicy for KPricing {
    fn price(
        &self,
        bid: &Order,
        ask: &Order,
        _quote: &MarketQuote,
    ) -> Result<Price, NullPricingError> {
        Ok(interpolate(self.k, bid.price(), ask.price()))
    }

    fn name(&self) -> &str {
        "k-pricing"
    }
}

/// Uniform k-pricing
///
/// Interpolates the market quote captured at the start of the clearing
/// pass, so every pair of one pass trades at the same price. The quote lies
/// inside every matched pair's prices, which keeps the trade individually
/// rational. Falls back to the pair's own prices if a quote side is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformPricing {
    k: Decimal,
}

impl UniformPricing {
    pub fn new(k: Decimal) -> Result<Self, ConfigError> {
        check_k(k)?;
        Ok(Self { k })
    }

    pub fn k(&self) -> Decimal {
        self.k
    }
}

impl PricingPolicy for UniformPricing {
    fn price(
        &self,
        bid: &Order,
        ask: &Order,
        quote: &MarketQuote,
    ) -> Result<Price, NullPricingError> {
        let price = match (quote.bid, quote.ask) {
            (Some(bid_quote), Some(ask_quote)) => interpolate(self.k, bid_quote, ask_quote),
            _ => interpolate(self.k, bid.price(), ask.price()),
        };
        Ok(price)
    }

    fn name(&self) -> &str {
        "uniform-pricing"
    }
}

/// Arrival-priority pricing
///
/// Weights the earlier order's price by `k`: `k * earlier + (1 - k) * later`.
/// With `k = 1` the resting order sets the price, as on a continuous
/// exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalPricing {
    k: Decimal,
}

impl ArrivalPricing {
    pub fn new(k: Decimal) -> Result<Self, ConfigError> {
        check_k(k)?;
        Ok(Self { k })
    }

    pub fn k(&self) -> Decimal {
        self.k
    }
}

impl PricingPolicy for ArrivalPricing {
    fn price(
        &self,
        bid: &Order,
        ask: &Order,
        _quote: &MarketQuote,
    ) -> Result<Price, NullPricingError> {
        let (earlier, later) = if bid.arrived_before(ask) {
            (bid, ask)
        } else {
            (ask, bid)
        };
        Ok(interpolate(self.k, earlier.price(), later.price()))
    }

    fn name(&self) -> &str {
        "arrival-pricing"
    }
}

/// Placeholder for mechanisms whose clearing policy prices trades itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NullPricing;

impl PricingPolicy for NullPricing {
    fn price(
        &self,
        _bid: &Order,
        _ask: &Order,
        _quote: &MarketQuote,
    ) -> Result<Price, NullPricingError> {
        Err(NullPricingError)
    }

    fn name(&self) -> &str {
        "null-pricing"
    }
}
