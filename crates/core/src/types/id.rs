//! Integer identifiers assigned by the shop data service.

/// Declare an `i32` identifier newtype.
///
/// The generated type serializes as a bare number, orders and hashes like
/// the number, and parses from strings (surrounding whitespace ignored), so
/// it can be used directly as an axum `Path` segment or a clap argument.
///
/// ```rust
/// # use partner_shops_core::define_id;
/// define_id!(CategoryId);
///
/// let id: CategoryId = " 12 ".parse().unwrap();
/// assert_eq!(id.as_i32(), 12);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i32>().map(Self)
            }
        }

        impl ::core::convert::From<i32> for $name {
            fn from(raw: i32) -> Self {
                Self(raw)
            }
        }

        impl ::core::convert::From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.as_i32()
            }
        }
    };
}

define_id!(ShopId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_id_serde_is_transparent() {
        let id: ShopId = serde_json::from_str("7").unwrap();
        assert_eq!(id, ShopId::new(7));
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }

    #[test]
    fn test_shop_id_from_str() {
        assert_eq!(" 42 ".parse::<ShopId>().unwrap(), ShopId::new(42));
        assert!("abc".parse::<ShopId>().is_err());
    }

    #[test]
    fn test_shop_id_display() {
        assert_eq!(ShopId::new(7).to_string(), "7");
        assert_eq!(format!("{:>3}", ShopId::new(7)), "  7");
        assert_eq!(i32::from(ShopId::new(-3)), -3);
    }
}
