use crate::Value;

/// An insertion-ordered mapping that accepts any [Value] as a key.
///
/// Keys are compared with `==`, so lookups are linear. Aggregates are valid
/// keys, unlike in most hash-based maps.
#[derive(Clone, Debug, Default)]
pub struct Dict {
  entries: Vec<(Value, Value)>,
}

impl Dict {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert an entry. If an equal key is already present, its value is
  /// replaced in place and the old value returned.
  pub fn insert(&mut self, key: Value, val: Value) -> Option<Value> {
    match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
      Some((_, slot)) => Some(std::mem::replace(slot, val)),
      None => {
        self.entries.push((key, val));
        None
      }
    }
  }

  pub fn get(&self, key: &Value) -> Option<&Value> {
    self.entries.iter().find(|(existing, _)| existing == key).map(|(_, val)| val)
  }

  pub fn contains_key(&self, key: &Value) -> bool {
    self.get(key).is_some()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
    self.entries.iter().map(|(key, val)| (key, val))
  }

  pub fn keys(&self) -> impl Iterator<Item = &Value> {
    self.entries.iter().map(|(key, _)| key)
  }

  pub fn values(&self) -> impl Iterator<Item = &Value> {
    self.entries.iter().map(|(_, val)| val)
  }
}

/// Order doesn't matter, only the set of entries
impl PartialEq for Dict {
  fn eq(&self, other: &Self) -> bool {
    self.len() == other.len() && self.iter().all(|(key, val)| other.get(key) == Some(val))
  }
}

impl FromIterator<(Value, Value)> for Dict {
  fn from_iter<T: IntoIterator<Item = (Value, Value)>>(iter: T) -> Self {
    let mut dict = Dict::new();
    for (key, val) in iter {
      dict.insert(key, val);
    }
    dict
  }
}

impl IntoIterator for Dict {
  type Item = (Value, Value);
  type IntoIter = std::vec::IntoIter<(Value, Value)>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.into_iter()
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_insert_overwrites_in_place() {
    let mut dict = Dict::new();
    assert_eq!(dict.insert(Value::Integer(0), Value::from("a")), None);
    assert_eq!(dict.insert(Value::Integer(1), Value::from("b")), None);
    assert_eq!(dict.insert(Value::Integer(0), Value::from("c")), Some(Value::from("a")));

    assert_eq!(dict.len(), 2);
    let keys: Vec<_> = dict.keys().cloned().collect();
    assert_eq!(keys, vec![Value::Integer(0), Value::Integer(1)]);
    assert_eq!(dict.get(&Value::Integer(0)), Some(&Value::from("c")));
  }

  #[test]
  fn test_aggregate_keys() {
    let key = Value::Tuple(vec![Value::Integer(1), Value::List(vec![])]);
    let dict: Dict = [(key.clone(), Value::Bool(true))].into_iter().collect();
    assert!(dict.contains_key(&key));
    assert!(!dict.contains_key(&Value::List(vec![Value::Integer(1), Value::List(vec![])])));
  }

  #[test]
  fn test_numeric_keys_stay_distinct() {
    let dict: Dict = [(Value::Integer(1), Value::None), (Value::Real(1.0), Value::None)]
      .into_iter()
      .collect();
    assert_eq!(dict.len(), 2);
  }

  #[test]
  fn test_eq_ignores_order() {
    let a: Dict = [(Value::from("x"), Value::Integer(1)), (Value::from("y"), Value::Integer(2))]
      .into_iter()
      .collect();
    let b: Dict = [(Value::from("y"), Value::Integer(2)), (Value::from("x"), Value::Integer(1))]
      .into_iter()
      .collect();
    assert_eq!(a, b);
    assert_ne!(a, Dict::new());
  }
}
