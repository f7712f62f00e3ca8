//! Opaque ID newtypes for placement entities.
//!
//! [`CellId`] and [`NetId`] are thin `u32` wrappers identifying cells and
//! nets across a placement. They are `Copy`, `Hash`, and serialize as bare
//! integers, which is also the representation the JSON output format uses.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32`.
            pub fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Returns the raw `u32`.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a cell in a placement.
    CellId
);

define_id!(
    /// Opaque, copyable ID for a net in a placement.
    NetId
);
