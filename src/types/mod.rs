//! Typed requests and records for the HasOffers API, plus re-exports from external crates
//! used in them.
//!
//! Records can also be fetched untyped as [`serde_json::Value`].

pub mod request;
pub mod response;

/// Arbitrary precision decimal type for payouts and revenues.
pub use rust_decimal::Decimal;
/// Macro for creating [`Decimal`] literals at compile time.
///
/// # Example
/// ```
/// use hasoffers_client_sdk::types::dec;
/// let payout = dec!(1.50);
/// ```
pub use rust_decimal_macros::dec;
/// JSON value type used for untyped records and free-form filters.
pub use serde_json::Value;

pub use self::request::{FindAllRequest, SortDirection, StatsRequest};
pub use self::response::{Advertiser, Affiliate, Conversion, Offer};
