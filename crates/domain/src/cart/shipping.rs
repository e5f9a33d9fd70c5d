//! Shipping address, quotes and delivery offers.

use common::{Money, SellerId, de};
use serde::{Deserialize, Serialize};

use super::value_objects::LineItem;

/// The buyer's delivery details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(default, deserialize_with = "de::text")]
    pub street: String,

    /// Exterior number.
    #[serde(default, deserialize_with = "de::text")]
    pub num_ext: String,

    /// Interior number (apartment, suite). Optional.
    #[serde(default, deserialize_with = "de::text")]
    pub num_int: String,

    #[serde(default, deserialize_with = "de::integer")]
    pub town_id: u64,

    #[serde(rename = "cityName", default, deserialize_with = "de::text")]
    pub city_name: String,

    #[serde(default, deserialize_with = "de::integer")]
    pub state_id: u64,

    #[serde(rename = "stateName", default, deserialize_with = "de::text")]
    pub state_name: String,

    #[serde(default, deserialize_with = "de::text")]
    pub neighborhood: String,

    #[serde(default, deserialize_with = "de::text")]
    pub zipcode: String,

    #[serde(default, deserialize_with = "de::text")]
    pub phone: String,

    #[serde(default, deserialize_with = "de::text")]
    pub email: String,

    #[serde(default, deserialize_with = "de::text")]
    pub name: String,

    #[serde(default, deserialize_with = "de::text")]
    pub lastname: String,
}

impl ShippingAddress {
    /// Returns the wire names of required fields that are empty or zero.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let text_fields = [
            ("street", &self.street),
            ("zipcode", &self.zipcode),
            ("neighborhood", &self.neighborhood),
            ("num_ext", &self.num_ext),
            ("phone", &self.phone),
            ("email", &self.email),
            ("name", &self.name),
            ("lastname", &self.lastname),
        ];
        let id_fields = [("town_id", self.town_id), ("state_id", self.state_id)];

        let mut missing: Vec<&'static str> = text_fields
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| field)
            .collect();
        missing.extend(
            id_fields
                .into_iter()
                .filter(|(_, value)| *value == 0)
                .map(|(field, _)| field),
        );
        missing
    }

    /// Returns true if every required field is present.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Physical description of the package being quoted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    #[serde(default, deserialize_with = "de::decimal")]
    pub length: f64,
    #[serde(default, deserialize_with = "de::decimal")]
    pub width: f64,
    #[serde(default, deserialize_with = "de::decimal")]
    pub height: f64,
    #[serde(default, deserialize_with = "de::decimal")]
    pub weight: f64,
    #[serde(default)]
    pub declared_value: Money,
}

/// A single courier offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingMethod {
    #[serde(default, deserialize_with = "de::text")]
    pub courier_id: String,
    #[serde(default, deserialize_with = "de::text")]
    pub courier_name: String,
    #[serde(default, deserialize_with = "de::text")]
    pub courier_alias: String,
    #[serde(default, deserialize_with = "de::text")]
    pub service_type: String,
    #[serde(default, deserialize_with = "de::text")]
    pub service_name: String,

    /// Promised delivery time as reported by the courier.
    #[serde(default, deserialize_with = "de::text")]
    pub delivery_time: String,

    /// Price of the offer.
    #[serde(default)]
    pub amount: Money,

    #[serde(default, deserialize_with = "de::text")]
    pub currency: String,

    /// Package size bucket used by the courier.
    #[serde(default, deserialize_with = "de::text")]
    pub package_size: String,

    #[serde(default, deserialize_with = "de::flag")]
    pub insurable: bool,
    #[serde(default)]
    pub min_insurance: Money,
    #[serde(default)]
    pub max_insurance: Money,
}

impl ShippingMethod {
    /// Creates an offer from a courier and its price.
    pub fn new(courier_name: impl Into<String>, amount: Money) -> Self {
        Self {
            courier_name: courier_name.into(),
            amount,
            ..Self::default()
        }
    }
}

/// The result of one rate request for a seller's products.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingQuote {
    /// The seller the quote was requested for.
    #[serde(default)]
    pub users_id: SellerId,

    /// Courier affiliate code used for the request.
    #[serde(default, deserialize_with = "de::text")]
    pub affiliate_code: String,

    #[serde(default)]
    pub parcel: Parcel,

    /// Products covered by the quote.
    #[serde(default, deserialize_with = "de::list")]
    pub products: Vec<LineItem>,

    /// Delivery offers.
    #[serde(default, deserialize_with = "de::list")]
    pub rates: Vec<ShippingMethod>,
}

impl ShippingQuote {
    /// Creates a quote for a seller with the given offers.
    pub fn new(users_id: impl Into<SellerId>, rates: Vec<ShippingMethod>) -> Self {
        Self {
            users_id: users_id.into(),
            rates,
            ..Self::default()
        }
    }

    /// Orders the offers by ascending price. Ties keep their original order.
    pub fn sort_rates(&mut self) {
        self.rates.sort_by_key(|method| method.amount);
    }

    /// The cheapest offer, assuming [`sort_rates`](Self::sort_rates) was called.
    pub fn cheapest(&self) -> Option<&ShippingMethod> {
        self.rates.first()
    }
}
