use serde::{Deserialize, Deserializer, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates the identifier from its numeric value.
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the numeric value.
            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        // Accepts numbers and numeric strings alike; anything else becomes 0.
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                crate::de::integer(deserializer).map(Self)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a product in the catalogue.
    ProductId
);

numeric_id!(
    /// Identifier of the user selling a product. Seller groups are keyed by it.
    SellerId
);

numeric_id!(
    /// Identifier of a seller's shop record.
    ShopId
);
