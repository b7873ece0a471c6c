// ============================================================================
// Auction Configuration
// Typed description of an auction mechanism, validated before use
// ============================================================================

use rust_decimal::Decimal;

use crate::errors::ConfigError;
use crate::numeric::{is_unit_interval, Price};

use super::Pairing;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Clearing Mode
// ============================================================================

/// When matched pairs are cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClearingMode {
    /// Clear immediately after every admitted order (continuous double auction)
    Continuous,
    /// Orders accumulate until the scheduler calls `clear` (call market)
    Periodic,
}

impl ClearingMode {
    pub fn is_continuous(&self) -> bool {
        matches!(self, ClearingMode::Continuous)
    }
}

/// How long unmatched orders survive in the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BookPersistence {
    /// Until the session closes
    #[default]
    Session,
    /// Book is reset when a new day opens
    Day,
    /// Book is reset when a new round or day opens
    Round,
}

// ============================================================================
// Policy Types
// ============================================================================

/// Transaction pricing rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PricingType {
    /// `k * bid + (1 - k) * ask` for each pair
    K { k: Decimal },

    /// K-interpolation of the quote, one price per clearing
    Uniform { k: Decimal },

    /// `k * earlier + (1 - k) * later`, by order arrival
    ArrivalPriority { k: Decimal },

    /// Mean of the last `window` transaction prices, with K pricing until
    /// the history fills
    NPrice { window: usize, k: Decimal },

    /// No pricing; only valid when the clearing policy prices trades itself
    Null,
}

/// Admission rule applied before an order enters the book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AcceptanceType {
    AlwaysAccept,

    /// New bids must reach the bid quote, new asks the ask quote
    QuoteBeating,

    /// Prices must lie inside `[floor, ceiling]`
    PriceBand { floor: Price, ceiling: Price },
}

/// Clearing mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClearingType {
    /// Execute every matched pair, keep unmatched orders
    Standard { pairing: Pairing },

    /// Execute every matched pair, then empty the book
    NoQueue { pairing: Pairing },

    /// McAfee's dominant-strategy mechanism; prices trades itself
    McAfee,
}

impl ClearingType {
    pub fn name(&self) -> &'static str {
        match self {
            ClearingType::Standard { .. } => "standard",
            ClearingType::NoQueue { .. } => "no-queue",
            ClearingType::McAfee => "mcafee",
        }
    }

    /// Whether the mechanism computes its own prices
    pub fn prices_itself(&self) -> bool {
        matches!(self, ClearingType::McAfee)
    }
}

// ============================================================================
// Complete Auction Configuration
// ============================================================================

/// Everything needed to assemble an [`Auctioneer`](crate::engine::Auctioneer)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AuctionConfig {
    /// Market name (e.g. "WIDGETS", "ENERGY-DA")
    pub market: String,

    pub mode: ClearingMode,

    pub pricing: PricingType,

    /// Acceptance policies; all must pass. Empty means accept everything.
    pub acceptance: Vec<AcceptanceType>,

    pub clearing: ClearingType,

    pub book_persistence: BookPersistence,
}

impl AuctionConfig {
    /// Create a new configuration with required parameters
    pub fn new(
        market: impl Into<String>,
        mode: ClearingMode,
        pricing: PricingType,
        clearing: ClearingType,
    ) -> Self {
        Self {
            market: market.into(),
            mode,
            pricing,
            acceptance: Vec::new(),
            clearing,
            book_persistence: BookPersistence::default(),
        }
    }

    /// Builder method: add an acceptance policy
    pub fn with_acceptance(mut self, acceptance: AcceptanceType) -> Self {
        self.acceptance.push(acceptance);
        self
    }

    /// Builder method: set book persistence
    pub fn with_book_persistence(mut self, persistence: BookPersistence) -> Self {
        self.book_persistence = persistence;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.market.trim().is_empty() {
            return Err(ConfigError::EmptyMarket);
        }

        match self.pricing {
            PricingType::K { k }
            | PricingType::Uniform { k }
            | PricingType::ArrivalPriority { k } => check_k(k)?,
            PricingType::NPrice { window, k } => {
                if window == 0 {
                    return Err(ConfigError::ZeroWindow);
                }
                check_k(k)?;
            }
            PricingType::Null => {
                if !self.clearing.prices_itself() {
                    return Err(ConfigError::PricingRequired {
                        clearing: self.clearing.name(),
                    });
                }
            }
        }

        for acceptance in &self.acceptance {
            if let AcceptanceType::PriceBand { floor, ceiling } = *acceptance {
                check_band(floor, ceiling)?;
            }
        }

        // McAfee needs the whole round's order flow before it can price
        if self.clearing == ClearingType::McAfee && self.mode.is_continuous() {
            return Err(ConfigError::PeriodicModeRequired {
                clearing: self.clearing.name(),
            });
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration document
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AuctionConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn check_k(k: Decimal) -> Result<(), ConfigError> {
    if is_unit_interval(k) {
        Ok(())
    } else {
        Err(ConfigError::InvalidK(k))
    }
}

pub(crate) fn check_band(floor: Price, ceiling: Price) -> Result<(), ConfigError> {
    if floor <= Decimal::ZERO || floor > ceiling {
        return Err(ConfigError::InvalidPriceBand { floor, ceiling });
    }
    Ok(())
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl AuctionConfig {
    /// Continuous double auction
    /// - Clears after every order
    /// - K pricing, NYSE quote-beating rule
    pub fn continuous_double_auction(market: impl Into<String>, k: Decimal) -> Self {
        Self::new(
            market,
            ClearingMode::Continuous,
            PricingType::K { k },
            ClearingType::Standard {
                pairing: Pairing::MarginalFirst,
            },
        )
        .with_acceptance(AcceptanceType::QuoteBeating)
    }

    /// Clearing house
    /// - Periodic clearing at one uniform price per round
    /// - Unmatched orders carry over until the day ends
    pub fn clearing_house(market: impl Into<String>, k: Decimal) -> Self {
        Self::new(
            market,
            ClearingMode::Periodic,
            PricingType::Uniform { k },
            ClearingType::Standard {
                pairing: Pairing::MarginalFirst,
            },
        )
        .with_book_persistence(BookPersistence::Day)
    }

    /// Sealed-bid call market cleared with McAfee's mechanism
    /// - Fresh book every round
    pub fn mcafee_call_market(market: impl Into<String>) -> Self {
        Self::new(
            market,
            ClearingMode::Periodic,
            PricingType::Null,
            ClearingType::McAfee,
        )
        .with_book_persistence(BookPersistence::Round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = AuctionConfig::new(
            "WIDGETS",
            ClearingMode::Periodic,
            PricingType::K {
                k: Decimal::new(5, 1),
            },
            ClearingType::Standard {
                pairing: Pairing::BestFirst,
            },
        );

        assert_eq!(config.market, "WIDGETS");
        assert!(config.acceptance.is_empty());
        assert_eq!(config.book_persistence, BookPersistence::Session);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_configs() {
        let cda = AuctionConfig::continuous_double_auction("A", Decimal::new(5, 1));
        assert!(cda.mode.is_continuous());
        assert_eq!(cda.acceptance, vec![AcceptanceType::QuoteBeating]);
        assert!(cda.validate().is_ok());

        let house = AuctionConfig::clearing_house("B", Decimal::ONE);
        assert_eq!(house.book_persistence, BookPersistence::Day);
        assert!(house.validate().is_ok());

        let mcafee = AuctionConfig::mcafee_call_market("C");
        assert_eq!(mcafee.pricing, PricingType::Null);
        assert!(mcafee.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = AuctionConfig::clearing_house(" ", Decimal::ONE);
        assert_eq!(config.validate(), Err(ConfigError::EmptyMarket));

        config.market = "GOODS".to_string();
        config.pricing = PricingType::K { k: Decimal::TWO };
        assert_eq!(config.validate(), Err(ConfigError::InvalidK(Decimal::TWO)));

        config.pricing = PricingType::NPrice {
            window: 0,
            k: Decimal::ONE,
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroWindow));

        config.pricing = PricingType::Null;
        assert_eq!(
            config.validate(),
            Err(ConfigError::PricingRequired {
                clearing: "standard"
            })
        );
    }

    #[test]
    fn test_price_band_validation() {
        let config = AuctionConfig::clearing_house("GOODS", Decimal::ONE).with_acceptance(
            AcceptanceType::PriceBand {
                floor: Decimal::from(10),
                ceiling: Decimal::from(5),
            },
        );

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPriceBand { .. })
        ));
    }

    #[test]
    fn test_mcafee_requires_periodic_mode() {
        let mut config = AuctionConfig::mcafee_call_market("GOODS");
        config.mode = ClearingMode::Continuous;

        assert_eq!(
            config.validate(),
            Err(ConfigError::PeriodicModeRequired { clearing: "mcafee" })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let json = r#"{
            "market": "GOODS",
            "mode": "Periodic",
            "pricing": { "Uniform": { "k": "0.5" } },
            "acceptance": ["QuoteBeating"],
            "clearing": { "Standard": { "pairing": "BestFirst" } },
            "book_persistence": "Day"
        }"#;

        let config = AuctionConfig::from_json(json).unwrap();
        assert_eq!(
            config.pricing,
            PricingType::Uniform {
                k: Decimal::new(5, 1)
            }
        );
        assert_eq!(
            config.clearing,
            ClearingType::Standard {
                pairing: Pairing::BestFirst
            }
        );

        assert!(matches!(
            AuctionConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));

        let invalid = json.replace("\"0.5\"", "\"1.5\"");
        assert!(matches!(
            AuctionConfig::from_json(&invalid),
            Err(ConfigError::InvalidK(_))
        ));
    }
}
