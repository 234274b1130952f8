pub mod band;
pub mod concert;
pub mod ids;
pub mod point;
pub mod venue;

pub use band::{Band, BandIdSet};
pub use concert::{Concert, ConcertRecord};
pub use ids::{concert_key, BandId, VenueId};
pub use point::Point;
pub use venue::Venue;

/// Value of the `kind` field carried by every stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Band,
    Venue,
    Concert,
}

impl DocumentKind {
    pub const ALL: [Self; 3] = [Self::Band, Self::Venue, Self::Concert];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Band => BandId::KIND,
            Self::Venue => VenueId::KIND,
            Self::Concert => "concert",
        }
    }
}
