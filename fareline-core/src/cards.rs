use rand::Rng;
use serde::{Deserialize, Serialize};

/// Cosmetic payment-card data shown on the purchase screen.
///
/// Pure random formatting with no persistence of its own; callers pin it
/// through the TTL cache so it stays stable across a day instead of
/// changing on every render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardProfile {
    pub balance: String,
    pub card_last4: String,
    pub iban_last4: String,
}

impl CardProfile {
    pub fn generate() -> Self {
        Self {
            balance: random_balance(),
            card_last4: random_card_last4(),
            iban_last4: random_iban_last4(),
        }
    }
}

/// A display balance between 0.01 and 5000, two decimal places.
pub fn random_balance() -> String {
    format!("{:.2}", rand::thread_rng().gen_range(0.01..5000.0))
}

/// The visible last four digits of a card number.
pub fn random_card_last4() -> String {
    rand::thread_rng().gen_range(1000u32..=9999).to_string()
}

/// The visible last four digits of an IBAN.
pub fn random_iban_last4() -> String {
    rand::thread_rng().gen_range(1000u32..=9999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_format() {
        for _ in 0..50 {
            let balance = random_balance();
            let value: f64 = balance.parse().unwrap();

            assert!(value >= 0.01 && value < 5000.0);
            let (_, decimals) = balance.split_once('.').unwrap();
            assert_eq!(decimals.len(), 2);
        }
    }

    #[test]
    fn test_last4_are_four_digits() {
        for _ in 0..50 {
            let last4 = random_card_last4();
            assert_eq!(last4.len(), 4);
            assert!(last4.parse::<u32>().unwrap() >= 1000);
        }
    }

    #[test]
    fn test_profile_round_trips_through_json() {
        let profile = CardProfile::generate();
        let json = serde_json::to_value(&profile).unwrap();
        let restored: CardProfile = serde_json::from_value(json).unwrap();
        assert_eq!(restored, profile);
    }
}
