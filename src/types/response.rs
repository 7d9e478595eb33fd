//! Records returned by the `findAll` facades.
//!
//! HasOffers returns a wide, network-configurable set of fields per model. Only the stable
//! core is modelled; request untyped [`serde_json::Value`] records when more is needed.

use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none};

use crate::serde_helpers::{BoolFromAny, StringFromAny};
use crate::types::Decimal;

/// An offer (campaign) affiliates can promote.
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[non_exhaustive]
pub struct Offer {
    #[serde_as(as = "StringFromAny")]
    #[builder(into)]
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde_as(as = "Option<StringFromAny>")]
    pub advertiser_id: Option<String>,
    /// `active`, `paused`, `pending`, `expired` or `deleted`
    pub status: Option<String>,
    pub offer_url: Option<String>,
    pub preview_url: Option<String>,
    pub currency: Option<String>,
    pub default_payout: Option<Decimal>,
    pub max_payout: Option<Decimal>,
    pub payout_type: Option<String>,
    #[serde_as(as = "Option<BoolFromAny>")]
    pub require_approval: Option<bool>,
    #[serde_as(as = "Option<BoolFromAny>")]
    pub is_private: Option<bool>,
    /// `YYYY-MM-DD HH:MM:SS` in the network's timezone
    pub expiration_date: Option<String>,
}

/// A publisher account.
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[non_exhaustive]
pub struct Affiliate {
    #[serde_as(as = "StringFromAny")]
    #[builder(into)]
    pub id: String,
    pub company: Option<String>,
    /// `active`, `pending`, `blocked`, `deleted` or `rejected`
    pub status: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    #[serde_as(as = "Option<StringFromAny>")]
    pub account_manager_id: Option<String>,
    pub date_added: Option<String>,
}

/// An advertiser account owning offers.
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[non_exhaustive]
pub struct Advertiser {
    #[serde_as(as = "StringFromAny")]
    #[builder(into)]
    pub id: String,
    pub company: Option<String>,
    pub status: Option<String>,
    pub country: Option<String>,
    #[serde_as(as = "Option<StringFromAny>")]
    pub account_manager_id: Option<String>,
    pub date_added: Option<String>,
}

/// A tracked conversion.
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[non_exhaustive]
pub struct Conversion {
    #[serde_as(as = "StringFromAny")]
    #[builder(into)]
    pub id: String,
    #[serde_as(as = "Option<StringFromAny>")]
    pub offer_id: Option<String>,
    #[serde_as(as = "Option<StringFromAny>")]
    pub affiliate_id: Option<String>,
    #[serde_as(as = "Option<StringFromAny>")]
    pub advertiser_id: Option<String>,
    /// `approved`, `pending` or `rejected`
    pub status: Option<String>,
    pub payout: Option<Decimal>,
    pub revenue: Option<Decimal>,
    pub currency: Option<String>,
    pub ip: Option<String>,
    pub datetime: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::dec;

    #[test]
    fn offer_deserializes_string_typed_fields() {
        let offer: Offer = serde_json::from_value(json!({
            "id": "150",
            "name": "Summer Sale",
            "advertiser_id": "12",
            "status": "active",
            "currency": null,
            "default_payout": "1.50000",
            "max_payout": 2,
            "require_approval": "1",
            "is_private": "0"
        }))
        .expect("offer");

        let expected = Offer::builder()
            .id("150")
            .name("Summer Sale".to_owned())
            .advertiser_id("12".to_owned())
            .status("active".to_owned())
            .default_payout(dec!(1.5))
            .max_payout(dec!(2))
            .require_approval(true)
            .is_private(false)
            .build();

        assert_eq!(offer, expected);
    }

    #[test]
    fn conversion_accepts_numeric_ids() {
        let conversion: Conversion = serde_json::from_value(json!({
            "id": 9001,
            "offer_id": 150,
            "affiliate_id": "3",
            "status": "approved",
            "payout": "0.75",
            "revenue": "1.25"
        }))
        .expect("conversion");

        assert_eq!(conversion.id, "9001");
        assert_eq!(conversion.offer_id.as_deref(), Some("150"));
        assert_eq!(conversion.revenue, Some(dec!(1.25)));
    }
}
