//! String serialization for [`Address`], [`Network`] and [`Wildcard`].

use core::fmt;
use core::marker::PhantomData;
use core::str::FromStr;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::{Address, Network, Wildcard};

struct FromStrVisitor<T> {
    expecting: &'static str,
    marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for FromStrVisitor<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.expecting)
    }

    fn visit_str<E>(self, s: &str) -> Result<T, E>
    where
        E: de::Error,
    {
        s.parse().map_err(de::Error::custom)
    }
}

macro_rules! impl_serde_str {
    ($ty:ty, $expecting:expr) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<$ty, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_str(FromStrVisitor {
                    expecting: $expecting,
                    marker: PhantomData,
                })
            }
        }
    };
}

impl_serde_str!(Address, "an IP address");
impl_serde_str!(Network, "an IP address with an optional mask");
impl_serde_str!(Wildcard, "an IP address with an optional wildcard mask");
