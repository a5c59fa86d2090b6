use serde::de::value::{MapDeserializer, SeqDeserializer};
use serde::de::{
  self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, Unexpected, VariantAccess,
  Visitor,
};
use serde::forward_to_deserialize_any;

use super::error::{Error, Result};
use crate::{Value, parse};

/// Parse `s` and deserialize the resulting literal
pub fn from_str<T>(s: &str) -> Result<T>
where
  T: DeserializeOwned,
{
  from_value(parse(s)?)
}

pub fn from_value<T>(value: Value) -> Result<T>
where
  T: DeserializeOwned,
{
  T::deserialize(ValueDeserializer::new(value))
}

/// Hands out the contents of an already parsed [Value]
pub struct ValueDeserializer {
  value: Value,
}

impl ValueDeserializer {
  pub fn new(value: Value) -> Self {
    ValueDeserializer { value }
  }
}

impl<'de> IntoDeserializer<'de, Error> for Value {
  type Deserializer = ValueDeserializer;

  fn into_deserializer(self) -> ValueDeserializer {
    ValueDeserializer::new(self)
  }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
  match value {
    Value::Integer(val) => Unexpected::Signed(*val),
    Value::Real(val) => Unexpected::Float(*val),
    Value::Str(val) => Unexpected::Str(val),
    Value::Bool(val) => Unexpected::Bool(*val),
    Value::None => Unexpected::Unit,
    Value::List(_) | Value::Tuple(_) => Unexpected::Seq,
    Value::Dict(_) => Unexpected::Map,
  }
}

fn visit_seq<'de, V>(items: Vec<Value>, visitor: V) -> Result<V::Value>
where
  V: Visitor<'de>,
{
  let mut seq = SeqDeserializer::<_, Error>::new(items.into_iter());
  let res = visitor.visit_seq(&mut seq)?;
  seq.end()?;
  Ok(res)
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
  type Error = Error;

  fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
  where
    V: Visitor<'de>,
  {
    match self.value {
      Value::Integer(val) => visitor.visit_i64(val),
      Value::Real(val) => visitor.visit_f64(val),
      Value::Str(val) => visitor.visit_string(val),
      Value::Bool(val) => visitor.visit_bool(val),
      Value::None => visitor.visit_unit(),
      Value::List(items) | Value::Tuple(items) => visit_seq(items, visitor),
      Value::Dict(dict) => {
        let mut map = MapDeserializer::<_, Error>::new(dict.into_iter());
        let res = visitor.visit_map(&mut map)?;
        map.end()?;
        Ok(res)
      }
    }
  }

  fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
  where
    V: Visitor<'de>,
  {
    match self.value {
      Value::None => visitor.visit_none(),
      _ => visitor.visit_some(self),
    }
  }

  fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
  where
    V: Visitor<'de>,
  {
    visitor.visit_newtype_struct(self)
  }

  /// Unit variants are plain strings, the rest are one-entry dicts keyed by
  /// the variant name
  fn deserialize_enum<V>(
    self,
    _name: &'static str,
    _variants: &'static [&'static str],
    visitor: V,
  ) -> Result<V::Value>
  where
    V: Visitor<'de>,
  {
    match self.value {
      Value::Str(variant) => {
        visitor.visit_enum(<String as IntoDeserializer<'de, Error>>::into_deserializer(variant))
      }
      Value::Dict(dict) if dict.len() == 1 => {
        let Some((variant, value)) = dict.into_iter().next() else {
          return Err(de::Error::invalid_length(0, &"a dict with a single entry"));
        };
        visitor.visit_enum(EnumDeserializer { variant, value })
      }
      other => Err(de::Error::invalid_type(unexpected(&other), &"a string or single-entry dict")),
    }
  }

  forward_to_deserialize_any! {
    bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
    bytes byte_buf unit unit_struct seq tuple
    tuple_struct map struct identifier ignored_any
  }
}

struct EnumDeserializer {
  variant: Value,
  value: Value,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
  type Error = Error;
  type Variant = VariantDeserializer;

  fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
  where
    V: DeserializeSeed<'de>,
  {
    let variant = seed.deserialize(ValueDeserializer::new(self.variant))?;
    Ok((variant, VariantDeserializer { value: self.value }))
  }
}

struct VariantDeserializer {
  value: Value,
}

impl<'de> VariantAccess<'de> for VariantDeserializer {
  type Error = Error;

  fn unit_variant(self) -> Result<()> {
    match self.value {
      Value::None => Ok(()),
      other => Err(de::Error::invalid_type(unexpected(&other), &"None")),
    }
  }

  fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
  where
    T: DeserializeSeed<'de>,
  {
    seed.deserialize(ValueDeserializer::new(self.value))
  }

  fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
  where
    V: Visitor<'de>,
  {
    de::Deserializer::deserialize_seq(ValueDeserializer::new(self.value), visitor)
  }

  fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
  where
    V: Visitor<'de>,
  {
    de::Deserializer::deserialize_map(ValueDeserializer::new(self.value), visitor)
  }
}
