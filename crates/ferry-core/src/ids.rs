//! Strongly typed, zero-cost identifier wrappers.
//!
//! Vehicle ids are numbered from 1 in population order so log output reads
//! `Car1`, `Minibus13`, …  The registry inside the ferry state is a dense
//! `Vec`, indexed through [`VehicleId::slot`].

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// The raw number.
            #[inline(always)]
            pub fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// One-based vehicle number.  `VehicleId(0)` is never issued.
    pub struct VehicleId(u32);
}

typed_id! {
    /// Zero-based departure counter.  Trip `n` is the `n`-th departure.
    pub struct TripId(u32);
}

impl VehicleId {
    /// The vehicle with registry slot `slot`.
    #[inline(always)]
    pub fn from_slot(slot: usize) -> Self {
        VehicleId(slot as u32 + 1)
    }

    /// Zero-based position in the vehicle registry.
    ///
    /// # Panics
    /// Panics in debug mode for the never-issued `VehicleId(0)`.
    #[inline(always)]
    pub fn slot(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl TripId {
    #[inline(always)]
    pub fn next(self) -> TripId {
        TripId(self.0 + 1)
    }
}
