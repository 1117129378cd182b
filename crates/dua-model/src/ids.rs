#![deny(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use crate::ModelError;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                value
                    .trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| ModelError::InvalidId {
                        kind: $label,
                        value: value.to_string(),
                    })
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`Category`](crate::Category) (`cat_id` in storage).
    CategoryId,
    "category"
);
entity_id!(
    /// Identifier of a [`Subcategory`](crate::Subcategory) (`subcat_id` in storage).
    SubcategoryId,
    "subcategory"
);
entity_id!(
    /// Identifier of a [`Dua`](crate::Dua) (`dua_id` in storage).
    DuaId,
    "dua"
);
