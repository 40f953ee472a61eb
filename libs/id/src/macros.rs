//! Macros for defining typed ID types.

/// Macro to define a typed numeric ID for a provider resource kind.
///
/// This generates a newtype wrapper around `u64` with:
/// - A `KIND` constant used in error messages and logs
/// - `new()` to wrap a raw provider value
/// - `parse()` to parse from a decimal string
/// - `Display` and `FromStr` implementations
/// - `Serialize` and `Deserialize` as a JSON number
/// - `Ord`, `Hash`, and other standard traits
///
/// # Example
///
/// ```ignore
/// define_id!(DropletId, "droplet");
///
/// let id = DropletId::new(3164444);
/// let parsed: DropletId = "3164444".parse()?;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $kind:literal) => {
        /// A typed ID for this resource type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            /// The resource kind this ID identifies.
            pub const KIND: &'static str = $kind;

            /// Wraps a raw provider-assigned value.
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying value.
            #[must_use]
            pub const fn value(&self) -> u64 {
                self.0
            }

            /// Parses an ID from a decimal string.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                if s.is_empty() {
                    return Err($crate::IdError::Empty);
                }

                s.parse::<u64>()
                    .map(Self)
                    .map_err(|_| $crate::IdError::InvalidNumber {
                        kind: Self::KIND,
                        value: s.to_string(),
                    })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_u64(self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = u64::deserialize(deserializer)?;
                Ok(Self(value))
            }
        }
    };
}
