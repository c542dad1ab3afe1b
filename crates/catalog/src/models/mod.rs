/// Declares a fieldless parameter enum with a fixed canonical name per
/// variant, plus matching `as_str`, `Display` and case-insensitive `FromStr`.
/// Exactly one variant must carry `#[default]`.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }
        impl $name {
            /// Returns the canonical name used in text forms.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }
        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
        impl ::std::str::FromStr for $name {
            type Err = $crate::error::Error;
            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($text) {
                        return Ok(Self::$variant);
                    }
                )+
                exn::bail!($crate::error::ErrorKind::ParseError { field: stringify!($name), value: s.to_string() })
            }
        }
    };
}

mod carrier;
mod filter;
mod location;
mod params;
mod station;

pub use self::carrier::{CableCarrier, Carrier, SatelliteCarrier, Technology, TerrestrialCarrier};
pub use self::filter::{GroupFilter, SourceModifier};
pub use self::location::{Group, Location, Origin, SatelliteDish, ScanLocation};
pub use self::params::{
    Bandwidth, CableModulation, DiseqcPosition, InnerFec, Polarization, RollOff, SatelliteModulation, SpectrumInversion,
};
pub use self::station::{SourceId, SourceKind, Station};

use crate::error::{ErrorKind, Result};
use exn::ResultExt;

/// Returns one trimmed, comma separated field of a canonical text form.
fn part<'a>(parts: &[&'a str], index: usize) -> &'a str {
    parts.get(index).map_or("", |p| p.trim())
}

/// Parses one numeric field of a canonical text form.
fn number(parts: &[&str], index: usize, name: &'static str) -> Result<u32> {
    let raw = part(parts, index);
    raw.parse::<u32>().or_raise(|| ErrorKind::ParseError { field: name, value: raw.to_string() })
}
