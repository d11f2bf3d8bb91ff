//! Decoded values and the records that hold them.

/// A value produced by decoding one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Fixed-width text, one char per byte.
    Text(String),
    /// Unsigned integer read from 1 to 4 bytes.
    U32(u32),
    /// Unsigned integer read from 5 to 8 bytes. Exact over the full 64-bit range.
    U64(u64),
    /// Big-endian IEEE-754 double.
    Double(f64),
    /// Produced by a conditional field whose condition did not hold.
    Absent,
    /// Elements of a repeated field, in buffer order.
    List(Vec<Record>),
}

impl Value {
    /// Numeric value of an unsigned integer field.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U32(v) => Some(u64::from(*v)),
            Value::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Record]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }
}

/// Field values of one decoded record, kept in schema order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends a field. Replaces the value if `key` is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// Result of executing a schema: the decoded record and the offset just
/// past the last consumed byte.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub data: Record,
    pub offset: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_insertion_order() {
        let mut record = Record::new();
        record.insert("z", Value::U32(1));
        record.insert("a", Value::U32(2));
        record.insert("m", Value::Absent);

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_record_insert_replaces() {
        let mut record = Record::new();
        record.insert("count", Value::U32(1));
        record.insert("count", Value::U32(2));

        assert_eq!(record.len(), 1);
        assert_eq!(record.get("count"), Some(&Value::U32(2)));
    }

    #[test]
    fn test_as_u64() {
        assert_eq!(Value::U32(7).as_u64(), Some(7));
        assert_eq!(Value::U64(u64::MAX).as_u64(), Some(u64::MAX));
        assert_eq!(Value::Double(7.0).as_u64(), None);
        assert_eq!(Value::Absent.as_u64(), None);
    }
}
