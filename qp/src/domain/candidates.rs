//! Lodging and dining candidates
//!
//! Supplied per area by external lookup collaborators, consumed read-only.

use serde::{Deserialize, Serialize};

/// A lodging option for one area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelCandidate {
    pub id: String,
    pub name: String,
    pub area_id: String,
    pub nightly_rate: u32,
    pub rating: f64,
    #[serde(default)]
    pub pet_friendly: bool,
    #[serde(default)]
    pub accessible: bool,
}

/// A dining option for one area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantCandidate {
    pub id: String,
    pub name: String,
    pub area_id: String,

    /// 1 (street food) .. 4 (fine dining)
    pub price_tier: u8,

    pub rating: f64,

    /// Aggregate social-evidence score (upvotes across mentions)
    #[serde(default)]
    pub social_score: u32,

    /// Free-form tags ("casual", "seafood", "vegan-friendly")
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RestaurantCandidate {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Lunch filter: lower price tier or explicitly casual
    pub fn suits_lunch(&self) -> bool {
        self.price_tier <= 2 || self.has_tag("casual")
    }

    /// Dinner filter: well-rated or socially corroborated
    pub fn suits_dinner(&self) -> bool {
        self.rating >= 4.0 || self.social_score > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant(price_tier: u8, rating: f64, social_score: u32, tags: &[&str]) -> RestaurantCandidate {
        RestaurantCandidate {
            id: "r1".to_string(),
            name: "Test".to_string(),
            area_id: "a1".to_string(),
            price_tier,
            rating,
            social_score,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_suits_lunch() {
        assert!(restaurant(1, 3.0, 0, &[]).suits_lunch());
        assert!(restaurant(4, 3.0, 0, &["Casual"]).suits_lunch());
        assert!(!restaurant(3, 5.0, 0, &[]).suits_lunch());
    }

    #[test]
    fn test_suits_dinner() {
        assert!(restaurant(2, 4.2, 0, &[]).suits_dinner());
        assert!(restaurant(2, 3.1, 15, &[]).suits_dinner());
        assert!(!restaurant(2, 3.9, 0, &[]).suits_dinner());
    }
}
