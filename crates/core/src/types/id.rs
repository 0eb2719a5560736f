//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around an integer (`i32` unless another type is
/// given) with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`,
///   `Default`
/// - Conversion methods: `new()`, `get()`
/// - `From` conversions in both directions, `Display` and `FromStr`
///
/// # Example
///
/// ```rust
/// # use heritage_mall_core::define_id;
/// define_id!(ShopId);
/// define_id!(CouponId, i64);
///
/// let shop_id = ShopId::new(1);
/// let coupon_id = CouponId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ShopId = coupon_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        $crate::define_id!($name, i32);
    };
    ($name:ident, $inner:ty) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Default,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            /// Create a new ID from its underlying value.
            #[must_use]
            pub const fn new(id: $inner) -> Self {
                Self(id)
            }

            /// Get the underlying value.
            #[must_use]
            pub const fn get(&self) -> $inner {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<$inner>().map(Self)
            }
        }

        impl From<$inner> for $name {
            fn from(id: $inner) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $inner {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Catalog entities (heritage items and cultural products share one id space).
define_id!(ItemId, i64);

// Container-assigned address ids start at 1.
define_id!(AddressId);

define_id!(OrderId, i64);

impl AddressId {
    /// The id after this one, used when assigning ids to new addresses.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}
