//! Closed sets of routing operations and travel profiles.
//!
//! Both enumerations resolve loosely-typed input through
//! [`ServiceEnum::resolve`]. A canonical member is returned as-is; text is
//! matched against member names first (`"CAR"`) and member values second
//! (`"car"`). Matching is case-sensitive and never fuzzy.

use std::fmt;
use std::str::FromStr;

use crate::error::InvalidEnumValue;

/// Input accepted by [`ServiceEnum::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumInput<'a, T> {
    /// An already-canonical member.
    Member(T),
    /// A symbolic name or an underlying value.
    Text(&'a str),
}

/// A closed enumeration whose members carry a symbolic name and a wire value.
pub trait ServiceEnum: Copy + Eq + fmt::Debug + 'static {
    /// Enumeration name used in error messages.
    const KIND: &'static str;
    /// Every member, in declaration order.
    const MEMBERS: &'static [Self];

    /// Symbolic name, e.g. `"CAR"`.
    fn name(self) -> &'static str;

    /// Value used on the wire, e.g. `"car"`.
    fn value(self) -> &'static str;

    /// Resolve `input` into a canonical member.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidEnumValue`] when `input` matches neither a member
    /// name nor a member value.
    fn resolve<'a>(input: impl Into<EnumInput<'a, Self>>) -> Result<Self, InvalidEnumValue> {
        resolve(input.into())
    }
}

/// Resolve `input` against the members of `T`.
///
/// # Examples
///
/// ```
/// use routr_core::{EnumInput, Profile, resolve};
///
/// assert_eq!(resolve(EnumInput::Text("FOOT")), Ok(Profile::Foot));
/// assert_eq!(resolve(EnumInput::Text("foot")), Ok(Profile::Foot));
/// assert!(resolve::<Profile>(EnumInput::Text("Foot")).is_err());
/// ```
///
/// # Errors
///
/// Returns [`InvalidEnumValue`] carrying the input and `T::KIND` when no
/// member matches.
pub fn resolve<T: ServiceEnum>(input: EnumInput<'_, T>) -> Result<T, InvalidEnumValue> {
    let text = match input {
        EnumInput::Member(member) => return Ok(member),
        EnumInput::Text(text) => text,
    };
    T::MEMBERS
        .iter()
        .find(|member| member.name() == text)
        .or_else(|| T::MEMBERS.iter().find(|member| member.value() == text))
        .copied()
        .ok_or_else(|| InvalidEnumValue {
            kind: T::KIND,
            value: text.to_owned(),
        })
}

macro_rules! service_enum {
    (
        $(#[$meta:meta])*
        $ty:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($name:literal, $value:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $ty {
            $( $(#[$vmeta])* $variant, )+
        }

        impl ServiceEnum for $ty {
            const KIND: &'static str = stringify!($ty);
            const MEMBERS: &'static [Self] = &[$(Self::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            fn value(self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }
        }

        impl From<$ty> for EnumInput<'_, $ty> {
            fn from(member: $ty) -> Self {
                Self::Member(member)
            }
        }

        impl<'a> From<&'a str> for EnumInput<'a, $ty> {
            fn from(text: &'a str) -> Self {
                Self::Text(text)
            }
        }

        impl<'a> From<&'a String> for EnumInput<'a, $ty> {
            fn from(text: &'a String) -> Self {
                Self::Text(text.as_str())
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.value())
            }
        }

        impl FromStr for $ty {
            type Err = InvalidEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as ServiceEnum>::resolve(s)
            }
        }
    };
}

service_enum! {
    /// Travel mode used for routing calculations.
    Profile {
        /// Cycling.
        Bike => ("BIKE", "bike"),
        /// Driving.
        Car => ("CAR", "car"),
        /// Walking.
        Foot => ("FOOT", "foot"),
    }
}

service_enum! {
    /// Routing service operation requested from the backend.
    Service {
        /// Fastest route between coordinates.
        Route => ("ROUTE", "route"),
        /// Map matching of a trace.
        Match => ("MATCH", "match"),
        /// Nearest street segment.
        Nearest => ("NEAREST", "nearest"),
        /// Duration/distance table.
        Table => ("TABLE", "table"),
        /// Travelling-salesman trip.
        Trip => ("TRIP", "trip"),
        /// Vector tiles.
        Tile => ("TILE", "tile"),
    }
}
