use serde::{Serialize, ser};

use super::error::{Error, Result};
use crate::Value;
use crate::print::{quote_str, write_real, write_str};

pub struct Serializer {
  output: String,
  /// Lengths of the tuples currently open, innermost last. A one-element
  /// tuple needs a trailing comma.
  tuple_lens: Vec<usize>,
}

pub fn to_string<T>(value: &T) -> Result<String>
where
  T: ?Sized + Serialize,
{
  let mut serializer = Serializer { output: String::new(), tuple_lens: Vec::new() };
  value.serialize(&mut serializer)?;
  Ok(serializer.output)
}

impl Serializer {
  /// Write a separator before an item unless it's the first in its aggregate
  fn item_sep(&mut self) {
    if !self.output.ends_with(['[', '(', '{']) {
      self.output += ", ";
    }
  }

  fn open_tuple(&mut self, len: usize) {
    self.output.push('(');
    self.tuple_lens.push(len);
  }

  fn close_tuple(&mut self) {
    if self.tuple_lens.pop() == Some(1) {
      self.output.push(',');
    }
    self.output.push(')');
  }

  /// Enum variants with data are written as a one-entry dict keyed by the
  /// variant name
  fn open_variant(&mut self, variant: &str) {
    self.output.push('{');
    write_str(variant, &mut self.output);
    self.output += ": ";
  }
}

impl<'a> ser::Serializer for &'a mut Serializer {
  type Ok = ();

  type Error = Error;

  type SerializeSeq = Self;

  type SerializeTuple = Self;

  type SerializeTupleStruct = Self;

  type SerializeTupleVariant = Self;

  type SerializeMap = Self;

  type SerializeStruct = Self;

  type SerializeStructVariant = Self;

  fn serialize_bool(self, v: bool) -> Result<()> {
    self.output += if v { "True" } else { "False" };
    Ok(())
  }

  fn serialize_i8(self, v: i8) -> Result<()> {
    self.serialize_i64(i64::from(v))
  }

  fn serialize_i16(self, v: i16) -> Result<()> {
    self.serialize_i64(i64::from(v))
  }

  fn serialize_i32(self, v: i32) -> Result<()> {
    self.serialize_i64(i64::from(v))
  }

  fn serialize_i64(self, v: i64) -> Result<()> {
    self.output += &v.to_string();
    Ok(())
  }

  fn serialize_u8(self, v: u8) -> Result<()> {
    self.serialize_i64(i64::from(v))
  }

  fn serialize_u16(self, v: u16) -> Result<()> {
    self.serialize_i64(i64::from(v))
  }

  fn serialize_u32(self, v: u32) -> Result<()> {
    self.serialize_i64(i64::from(v))
  }

  fn serialize_u64(self, v: u64) -> Result<()> {
    // Anything wider than i64 wouldn't parse back
    let v = i64::try_from(v).map_err(|_| Error::Message(format!("integer {v} is out of range")))?;
    self.serialize_i64(v)
  }

  fn serialize_f32(self, v: f32) -> Result<()> {
    self.serialize_f64(f64::from(v))
  }

  fn serialize_f64(self, v: f64) -> Result<()> {
    write_real(v, &mut self.output);
    Ok(())
  }

  fn serialize_char(self, v: char) -> Result<()> {
    self.serialize_str(&v.to_string())
  }

  fn serialize_str(self, v: &str) -> Result<()> {
    let quoted = quote_str(v)
      .ok_or_else(|| Error::Message(format!("string {v:?} can't be written as a literal")))?;
    self.output += &quoted;
    Ok(())
  }

  fn serialize_bytes(self, v: &[u8]) -> Result<()> {
    use ser::SerializeSeq;
    let mut s = self.serialize_seq(Some(v.len()))?;
    for b in v {
      s.serialize_element(b)?;
    }
    s.end()
  }

  fn serialize_none(self) -> Result<()> {
    self.serialize_unit()
  }

  fn serialize_some<T>(self, value: &T) -> Result<()>
  where
    T: ?Sized + Serialize,
  {
    value.serialize(self)
  }

  fn serialize_unit(self) -> Result<()> {
    self.output += "None";
    Ok(())
  }

  fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
    self.serialize_unit()
  }

  fn serialize_unit_variant(
    self,
    _name: &'static str,
    _variant_index: u32,
    variant: &'static str,
  ) -> Result<()> {
    self.serialize_str(variant)
  }

  fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
  where
    T: ?Sized + Serialize,
  {
    value.serialize(self)
  }

  fn serialize_newtype_variant<T>(
    self,
    _name: &'static str,
    _variant_index: u32,
    variant: &'static str,
    value: &T,
  ) -> Result<()>
  where
    T: ?Sized + Serialize,
  {
    self.open_variant(variant);
    value.serialize(&mut *self)?;
    self.output.push('}');
    Ok(())
  }

  fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
    self.output.push('[');
    Ok(self)
  }

  fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
    self.open_tuple(len);
    Ok(self)
  }

  fn serialize_tuple_struct(
    self,
    _name: &'static str,
    len: usize,
  ) -> Result<Self::SerializeTupleStruct> {
    self.serialize_tuple(len)
  }

  fn serialize_tuple_variant(
    self,
    _name: &'static str,
    _variant_index: u32,
    variant: &'static str,
    len: usize,
  ) -> Result<Self::SerializeTupleVariant> {
    self.open_variant(variant);
    self.open_tuple(len);
    Ok(self)
  }

  fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
    self.output.push('{');
    Ok(self)
  }

  fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
    self.serialize_map(Some(len))
  }

  fn serialize_struct_variant(
    self,
    _name: &'static str,
    _variant_index: u32,
    variant: &'static str,
    _len: usize,
  ) -> Result<Self::SerializeStructVariant> {
    self.open_variant(variant);
    self.output.push('{');
    Ok(self)
  }
}

impl<'a> ser::SerializeSeq for &'a mut Serializer {
  type Ok = ();

  type Error = Error;

  fn serialize_element<T>(&mut self, value: &T) -> Result<()>
  where
    T: ?Sized + Serialize,
  {
    self.item_sep();
    value.serialize(&mut **self)
  }

  fn end(self) -> Result<()> {
    self.output.push(']');
    Ok(())
  }
}

impl<'a> ser::SerializeTuple for &'a mut Serializer {
  type Ok = ();

  type Error = Error;

  fn serialize_element<T>(&mut self, value: &T) -> Result<()>
  where
    T: ?Sized + Serialize,
  {
    self.item_sep();
    value.serialize(&mut **self)
  }

  fn end(self) -> Result<()> {
    self.close_tuple();
    Ok(())
  }
}

impl<'a> ser::SerializeTupleStruct for &'a mut Serializer {
  type Ok = ();
  type Error = Error;

  fn serialize_field<T>(&mut self, value: &T) -> Result<()>
  where
    T: ?Sized + Serialize,
  {
    ser::SerializeTuple::serialize_element(self, value)
  }

  fn end(self) -> Result<()> {
    ser::SerializeTuple::end(self)
  }
}

impl<'a> ser::SerializeTupleVariant for &'a mut Serializer {
  type Ok = ();
  type Error = Error;

  fn serialize_field<T>(&mut self, value: &T) -> Result<()>
  where
    T: ?Sized + Serialize,
  {
    ser::SerializeTuple::serialize_element(self, value)
  }

  fn end(self) -> Result<()> {
    self.close_tuple();
    self.output.push('}');
    Ok(())
  }
}

impl<'a> ser::SerializeMap for &'a mut Serializer {
  type Ok = ();
  type Error = Error;

  fn serialize_key<T>(&mut self, key: &T) -> Result<()>
  where
    T: ?Sized + Serialize,
  {
    self.item_sep();
    key.serialize(&mut **self)?;
    self.output += ": ";
    Ok(())
  }

  fn serialize_value<T>(&mut self, value: &T) -> Result<()>
  where
    T: ?Sized + Serialize,
  {
    value.serialize(&mut **self)
  }

  fn end(self) -> Result<()> {
    self.output.push('}');
    Ok(())
  }
}

impl<'a> ser::SerializeStruct for &'a mut Serializer {
  type Ok = ();
  type Error = Error;

  fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
  where
    T: ?Sized + Serialize,
  {
    ser::SerializeMap::serialize_entry(self, key, value)
  }

  fn end(self) -> Result<()> {
    ser::SerializeMap::end(self)
  }
}

impl<'a> ser::SerializeStructVariant for &'a mut Serializer {
  type Ok = ();
  type Error = Error;

  fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
  where
    T: ?Sized + Serialize,
  {
    ser::SerializeMap::serialize_entry(self, key, value)
  }

  fn end(self) -> Result<()> {
    self.output += "}}";
    Ok(())
  }
}

impl Serialize for Value {
  fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
  where
    S: ser::Serializer,
  {
    use ser::{SerializeMap, SerializeTuple};
    match self {
      Value::Integer(val) => serializer.serialize_i64(*val),
      Value::Real(val) => serializer.serialize_f64(*val),
      Value::Str(val) => serializer.serialize_str(val),
      Value::Bool(val) => serializer.serialize_bool(*val),
      Value::None => serializer.serialize_unit(),
      Value::List(items) => items.serialize(serializer),
      Value::Tuple(items) => {
        let mut tuple = serializer.serialize_tuple(items.len())?;
        for item in items {
          tuple.serialize_element(item)?;
        }
        tuple.end()
      }
      Value::Dict(dict) => {
        let mut map = serializer.serialize_map(Some(dict.len()))?;
        for (key, val) in dict.iter() {
          map.serialize_entry(key, val)?;
        }
        map.end()
      }
    }
  }
}
