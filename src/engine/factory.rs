// ============================================================================
// Auctioneer Factory
// Creates auctioneers from validated configuration
// ============================================================================

use crate::domain::config::{
    AcceptanceType, AuctionConfig, BookPersistence, ClearingMode, ClearingType, PricingType,
};
use crate::domain::Pairing;
use crate::engine::{
    AlwaysAccept, ArrivalPricing, Auctioneer, KPricing, McAfeeClearing, NPricing,
    NoQueueClearing, NullPricing, PriceBand, QuoteBeating, StandardClearing, UniformPricing,
};
use crate::errors::ConfigError;
use crate::interfaces::{
    AcceptancePolicy, AuctionObserver, ClearingPolicy, NoOpObserver, NoOpSettlementHandler,
    PricingPolicy, SettlementHandler,
};
use crate::numeric::Price;
use rust_decimal::Decimal;
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates an auctioneer from configuration
///
/// # Arguments
/// * `config` - Auction configuration
/// * `settlement_handler` - Receives every settlement
/// * `observer` - Receives auction events
///
/// # Returns
/// * `Result<Auctioneer, ConfigError>` - Configured auctioneer or error
///
/// # Example
/// ```
/// use double_auction::prelude::*;
/// use rust_decimal::Decimal;
/// use std::sync::Arc;
///
/// let config = AuctionConfig::continuous_double_auction("WIDGETS", Decimal::new(5, 1));
/// let auction = create_from_config(
///     config,
///     Box::new(NoOpSettlementHandler),
///     Arc::new(NoOpObserver),
/// )
/// .unwrap();
/// assert_eq!(auction.market(), "WIDGETS");
/// ```
pub fn create_from_config(
    config: AuctionConfig,
    settlement_handler: Box<dyn SettlementHandler>,
    observer: Arc<dyn AuctionObserver>,
) -> Result<Auctioneer, ConfigError> {
    // Validate configuration first
    config.validate()?;

    let pricing = create_pricing_policy(&config.pricing)?;
    let clearing = create_clearing_policy(&config.clearing);

    let mut auctioneer = Auctioneer::new(config.market.clone(), config.mode, pricing, clearing)
        .with_settlement_handler(settlement_handler)
        .with_observer(observer)
        .with_book_persistence(config.book_persistence);

    for acceptance in &config.acceptance {
        auctioneer = auctioneer.with_acceptance_policy(create_acceptance_policy(acceptance)?);
    }

    tracing::info!(
        market = %config.market,
        mode = ?config.mode,
        pricing = auctioneer.pricing().name(),
        clearing = auctioneer.clearing().name(),
        "auctioneer created"
    );
    Ok(auctioneer)
}

/// Creates the pricing policy selected by configuration
fn create_pricing_policy(pricing: &PricingType) -> Result<Box<dyn PricingPolicy>, ConfigError> {
    match *pricing {
        PricingType::K { k } => Ok(Box::new(KPricing::new(k)?)),
        PricingType::Uniform { k } => Ok(Box::new(UniformPricing::new(k)?)),
        PricingType::ArrivalPriority { k } => Ok(Box::new(ArrivalPricing::new(k)?)),
        PricingType::NPrice { window, k } => Ok(Box::new(NPricing::new(window, k)?)),
        PricingType::Null => Ok(Box::new(NullPricing)),
    }
}

fn create_acceptance_policy(
    acceptance: &AcceptanceType,
) -> Result<Box<dyn AcceptancePolicy>, ConfigError> {
    match *acceptance {
        AcceptanceType::AlwaysAccept => Ok(Box::new(AlwaysAccept)),
        AcceptanceType::QuoteBeating => Ok(Box::new(QuoteBeating)),
        AcceptanceType::PriceBand { floor, ceiling } => {
            Ok(Box::new(PriceBand::new(floor, ceiling)?))
        }
    }
}

fn create_clearing_policy(clearing: &ClearingType) -> Box<dyn ClearingPolicy> {
    match *clearing {
        ClearingType::Standard { pairing } => Box::new(StandardClearing::new(pairing)),
        ClearingType::NoQueue { pairing } => Box::new(NoQueueClearing::new(pairing)),
        ClearingType::McAfee => Box::new(McAfeeClearing::new()),
    }
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating auctioneers with fluent API
///
/// Starts from a periodic market with k = 0.5 pricing and standard
/// clearing.
///
/// # Example
/// ```
/// use double_auction::prelude::*;
/// use rust_decimal::Decimal;
///
/// let auction = AuctioneerBuilder::new("WIDGETS")
///     .continuous()
///     .k_pricing(Decimal::new(5, 1))
///     .quote_beating()
///     .build()
///     .unwrap();
///
/// assert_eq!(auction.mode(), ClearingMode::Continuous);
/// ```
pub struct AuctioneerBuilder {
    config: AuctionConfig,
    settlement_handler: Option<Box<dyn SettlementHandler>>,
    observer: Option<Arc<dyn AuctionObserver>>,
}

impl AuctioneerBuilder {
    /// Create a new builder for the specified market
    pub fn new(market: impl Into<String>) -> Self {
        Self::from_config(AuctionConfig::new(
            market,
            ClearingMode::Periodic,
            PricingType::K {
                k: Decimal::new(5, 1),
            },
            ClearingType::Standard {
                pairing: Pairing::MarginalFirst,
            },
        ))
    }

    /// Start from an existing configuration
    pub fn from_config(config: AuctionConfig) -> Self {
        Self {
            config,
            settlement_handler: None,
            observer: None,
        }
    }

    // ========================================================================
    // Clearing Mode
    // ========================================================================

    pub fn continuous(mut self) -> Self {
        self.config.mode = ClearingMode::Continuous;
        self
    }

    pub fn periodic(mut self) -> Self {
        self.config.mode = ClearingMode::Periodic;
        self
    }

    pub fn book_persistence(mut self, persistence: BookPersistence) -> Self {
        self.config.book_persistence = persistence;
        self
    }

    // ========================================================================
    // Pricing Configuration
    // ========================================================================

    pub fn k_pricing(mut self, k: Decimal) -> Self {
        self.config.pricing = PricingType::K { k };
        self
    }

    pub fn uniform_pricing(mut self, k: Decimal) -> Self {
        self.config.pricing = PricingType::Uniform { k };
        self
    }

    pub fn arrival_pricing(mut self, k: Decimal) -> Self {
        self.config.pricing = PricingType::ArrivalPriority { k };
        self
    }

    pub fn n_pricing(mut self, window: usize, k: Decimal) -> Self {
        self.config.pricing = PricingType::NPrice { window, k };
        self
    }

    pub fn null_pricing(mut self) -> Self {
        self.config.pricing = PricingType::Null;
        self
    }

    // ========================================================================
    // Acceptance Configuration
    // ========================================================================

    /// Add the NYSE quote-beating rule
    pub fn quote_beating(mut self) -> Self {
        self.config.acceptance.push(AcceptanceType::QuoteBeating);
        self
    }

    /// Add a price band filter
    pub fn price_band(mut self, floor: Price, ceiling: Price) -> Self {
        self.config
            .acceptance
            .push(AcceptanceType::PriceBand { floor, ceiling });
        self
    }

    // ========================================================================
    // Clearing Configuration
    // ========================================================================

    pub fn standard_clearing(mut self, pairing: Pairing) -> Self {
        self.config.clearing = ClearingType::Standard { pairing };
        self
    }

    pub fn no_queue_clearing(mut self, pairing: Pairing) -> Self {
        self.config.clearing = ClearingType::NoQueue { pairing };
        self
    }

    /// McAfee clearing; also selects null pricing and periodic mode
    pub fn mcafee_clearing(mut self) -> Self {
        self.config.clearing = ClearingType::McAfee;
        self.config.pricing = PricingType::Null;
        self.config.mode = ClearingMode::Periodic;
        self
    }

    // ========================================================================
    // Collaborators
    // ========================================================================

    pub fn settlement_handler(mut self, handler: Box<dyn SettlementHandler>) -> Self {
        self.settlement_handler = Some(handler);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn AuctionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    // ========================================================================
    // Preset Configurations
    // ========================================================================

    pub fn continuous_double_auction(market: impl Into<String>, k: Decimal) -> Self {
        Self::from_config(AuctionConfig::continuous_double_auction(market, k))
    }

    pub fn clearing_house(market: impl Into<String>, k: Decimal) -> Self {
        Self::from_config(AuctionConfig::clearing_house(market, k))
    }

    pub fn mcafee_call_market(market: impl Into<String>) -> Self {
        Self::from_config(AuctionConfig::mcafee_call_market(market))
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the auctioneer
    pub fn build(self) -> Result<Auctioneer, ConfigError> {
        let settlement_handler = self
            .settlement_handler
            .unwrap_or_else(|| Box::new(NoOpSettlementHandler));
        let observer = self.observer.unwrap_or_else(|| Arc::new(NoOpObserver));
        create_from_config(self.config, settlement_handler, observer)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &AuctionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Order, TraderId};
    use crate::errors::{RejectionReason, SubmitError};

    fn build(config: AuctionConfig) -> Result<Auctioneer, ConfigError> {
        create_from_config(config, Box::new(NoOpSettlementHandler), Arc::new(NoOpObserver))
    }

    #[test]
    fn test_create_continuous_double_auction() {
        let config = AuctionConfig::continuous_double_auction("WIDGETS", Decimal::new(5, 1));
        let mut auction = build(config).unwrap();

        assert_eq!(auction.market(), "WIDGETS");
        assert_eq!(auction.pricing().name(), "k-pricing");
        assert_eq!(auction.clearing().name(), "standard");

        auction
            .submit(Order::bid(Decimal::from(100), 1, TraderId::new(1)))
            .unwrap();
        auction
            .submit(Order::ask(Decimal::from(80), 1, TraderId::new(2)))
            .unwrap();
        assert!(auction.book().is_empty());
    }

    #[test]
    fn test_create_clearing_house() {
        let auction = build(AuctionConfig::clearing_house("GOODS", Decimal::ONE)).unwrap();

        assert_eq!(auction.mode(), ClearingMode::Periodic);
        assert_eq!(auction.pricing().name(), "uniform-pricing");
        assert_eq!(auction.book_persistence(), BookPersistence::Day);
    }

    #[test]
    fn test_create_mcafee_market() {
        let auction = build(AuctionConfig::mcafee_call_market("CALL")).unwrap();

        assert_eq!(auction.pricing().name(), "null-pricing");
        assert_eq!(auction.clearing().name(), "mcafee");
    }

    #[test]
    fn test_invalid_config_fails_before_orders_flow() {
        let config = AuctionConfig::continuous_double_auction("WIDGETS", Decimal::TEN);
        assert!(matches!(build(config), Err(ConfigError::InvalidK(_))));

        let config = AuctionConfig::new(
            "WIDGETS",
            ClearingMode::Periodic,
            PricingType::Null,
            ClearingType::NoQueue {
                pairing: Pairing::BestFirst,
            },
        );
        assert!(matches!(
            build(config),
            Err(ConfigError::PricingRequired { .. })
        ));
    }

    #[test]
    fn test_builder_pattern() {
        let mut auction = AuctioneerBuilder::new("WIDGETS")
            .n_pricing(3, Decimal::new(5, 1))
            .price_band(Decimal::from(10), Decimal::from(100))
            .no_queue_clearing(Pairing::BestFirst)
            .build()
            .unwrap();

        assert_eq!(auction.pricing().name(), "n-pricing");
        assert_eq!(auction.clearing().name(), "no-queue");

        let result = auction.submit(Order::bid(Decimal::from(150), 1, TraderId::new(1)));
        assert!(matches!(
            result,
            Err(SubmitError::Rejected(RejectionReason::OutsidePriceBand { .. }))
        ));
    }

    #[test]
    fn test_builder_mcafee_overrides_pricing_and_mode() {
        let builder = AuctioneerBuilder::new("CALL")
            .continuous()
            .k_pricing(Decimal::ONE)
            .mcafee_clearing();

        assert_eq!(builder.get_config().pricing, PricingType::Null);
        assert_eq!(builder.get_config().mode, ClearingMode::Periodic);
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_preset_builders() {
        let cda = AuctioneerBuilder::continuous_double_auction("A", Decimal::new(5, 1))
            .build()
            .unwrap();
        assert_eq!(cda.mode(), ClearingMode::Continuous);

        let house = AuctioneerBuilder::clearing_house("B", Decimal::ONE)
            .arrival_pricing(Decimal::ONE)
            .build()
            .unwrap();
        assert_eq!(house.pricing().name(), "arrival-pricing");

        let call = AuctioneerBuilder::mcafee_call_market("C")
            .book_persistence(BookPersistence::Day)
            .build()
            .unwrap();
        assert_eq!(call.book_persistence(), BookPersistence::Day);
    }
}
