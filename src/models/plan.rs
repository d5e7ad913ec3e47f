//! Pricing plans.

use serde::Serialize;

/// A one-time credit pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    /// One-time price in whole US dollars
    pub price_usd: u32,
    /// Credits granted on purchase
    pub credits: u32,
    pub features: &'static [&'static str],
    pub popular: bool,
}

/// The plan catalog, in display order.
pub static PLANS: [Plan; 3] = [
    Plan {
        id: "basic",
        name: "Basic",
        price_usd: 10,
        credits: 100,
        features: &[
            "100 AI Generations",
            "High Quality Images",
            "Download & Share",
        ],
        popular: false,
    },
    Plan {
        id: "advanced",
        name: "Advanced",
        price_usd: 50,
        credits: 500,
        features: &[
            "500 AI Generations",
            "High Quality Images",
            "Download & Share",
            "Priority Support",
        ],
        popular: true,
    },
    Plan {
        id: "business",
        name: "Business",
        price_usd: 250,
        credits: 2500,
        features: &[
            "2500 AI Generations",
            "High Quality Images",
            "Download & Share",
            "Priority Support",
            "API Access",
        ],
        popular: false,
    },
];

impl Plan {
    /// Look up a plan by id.
    pub fn find(id: &str) -> Option<&'static Plan> {
        PLANS.iter().find(|p| p.id == id)
    }
}
