//! The two transfer points and the crossing direction between them.

use std::fmt;

/// One of the two fixed ports the ferry alternates between.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Port {
    Origin,
    Destination,
}

impl Port {
    pub const BOTH: [Port; 2] = [Port::Origin, Port::Destination];

    /// The port across the water.
    #[inline]
    pub fn opposite(self) -> Port {
        match self {
            Port::Origin => Port::Destination,
            Port::Destination => Port::Origin,
        }
    }

    /// `0` for Origin, `1` for Destination; the index into per-port arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Port::Origin => 0,
            Port::Destination => 1,
        }
    }

    /// Single-letter tag used in compact tables.
    pub fn tag(self) -> char {
        match self {
            Port::Origin => 'O',
            Port::Destination => 'D',
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Origin => f.write_str("Origin"),
            Port::Destination => f.write_str("Destination"),
        }
    }
}

/// Direction of one crossing, named by the port the ferry leaves from.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Direction {
    pub from: Port,
}

impl Direction {
    #[inline]
    pub fn leaving(from: Port) -> Self {
        Self { from }
    }

    #[inline]
    pub fn to(self) -> Port {
        self.from.opposite()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to())
    }
}
