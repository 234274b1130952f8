use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// Separator between the kind prefix and the id in a document key.
pub const KEY_SEPARATOR: &str = "::";

macro_rules! define_id {
    ($name:ident, $prefix:literal, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Document kind, also the key prefix.
            pub const KIND: &'static str = $prefix;

            /// Returns `None` for zero.
            #[must_use]
            pub const fn new(raw: u32) -> Option<Self> {
                match NonZeroU32::new(raw) {
                    Some(id) => Some(Self(id)),
                    None => None,
                }
            }

            #[must_use]
            pub const fn get(self) -> u32 {
                self.0.get()
            }

            /// The key this entity is stored under, e.g. `band::42`.
            #[must_use]
            pub fn document_key(self) -> String {
                format!("{}{}{}", Self::KIND, KEY_SEPARATOR, self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<NonZeroU32>().map(Self)
            }
        }
    };
}

define_id!(BandId, "band", "Identifier of a band document.");
define_id!(VenueId, "venue", "Identifier of a venue document.");

/// Key of the concert played by `band` at `venue`.
///
/// A band plays a venue at most once; loading the same pair twice
/// replaces the earlier concert.
#[must_use]
pub fn concert_key(band: BandId, venue: VenueId) -> String {
    format!("concert{KEY_SEPARATOR}{band}{KEY_SEPARATOR}{venue}")
}
