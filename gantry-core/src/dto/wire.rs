//! Wire-level helpers shared by the DTOs
//!
//! The server uses `null` for absent scalars and lists, while desired
//! documents simply omit them. Both shapes are normalised here on input so
//! that the rest of the crate only ever sees "absent".

use serde::{Deserialize, Deserializer};

/// Deserialize a field that may be `null`, falling back to `T::default()`.
///
/// Use together with `#[serde(default)]` so that omission and `null` decode
/// to the same value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Declares a closed string enum with a lenient decoder.
///
/// Unknown wire values decode to the declared default instead of failing,
/// so a newer server cannot abort reconciliation by adding a new tag.
/// `parse` stays strict for callers that need to tell the two apart.
macro_rules! lenient_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident (default = $default:ident) {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Wire representation of this value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            /// Strict parse; `None` for unrecognised values
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Lenient parse; unrecognised values become the default
            pub fn from_str_lenient(value: &str) -> Self {
                Self::parse(value).unwrap_or_else(|| {
                    tracing::warn!(
                        "Unknown {} value '{}', defaulting to '{}'",
                        stringify!($name),
                        value,
                        Self::$default.as_str()
                    );
                    Self::$default
                })
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from_str_lenient(value)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let value = Option::<String>::deserialize(deserializer)?;
                Ok(value
                    .map(|v| Self::from_str_lenient(&v))
                    .unwrap_or_default())
            }
        }
    };
}

pub(crate) use lenient_enum;
