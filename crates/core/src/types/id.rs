//! Newtype identifiers for type-safe catalog references.
//!
//! Use the `define_slug!` macro to create string-backed identifier wrappers
//! that prevent accidentally mixing IDs from different record types.

/// Macro to define a type-safe string identifier.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<&str>` and `From<String>` implementations
///
/// # Example
///
/// ```rust
/// # use acumen_core::define_slug;
/// define_slug!(WatchId);
/// define_slug!(StrapId);
///
/// let watch = WatchId::new("axion01");
/// let strap = StrapId::new("axion01");
/// assert_eq!(watch.as_str(), strap.as_str());
///
/// // These are different types, so this won't compile:
/// // let _: WatchId = strap;
/// ```
#[macro_export]
macro_rules! define_slug {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_slug!(ProductId);
define_slug!(CollectionId);
define_slug!(PostSlug);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_display_matches_inner_value() {
        let id = ProductId::new("axion01");
        assert_eq!(id.to_string(), "axion01");
        assert_eq!(id.as_str(), "axion01");
    }

    #[test]
    fn test_slug_serializes_transparently() {
        let id = CollectionId::from("heritage");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"heritage\"");
    }
}
