use crate::VENDOR_PREFIX;
use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt::Formatter;
use std::marker::PhantomData;

/// Fields of an object that are not part of its fixed shape.
///
/// Usually these are `x-` vendor extensions, but every unknown key is kept so a
/// decode/encode round trip is lossless. Flatten it into a record with
/// `#[serde(flatten)]`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Extensions(BTreeMap<String, Value>);

impl Extensions {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Only the `x-` prefixed entries.
    pub fn vendor(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter().filter(|(key, _)| is_vendor_key(key))
    }

    /// Entries that are neither `x-` extensions nor known fields.
    pub fn unknown(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter().filter(|(key, _)| !is_vendor_key(key))
    }
}

impl<K, V> FromIterator<(K, V)> for Extensions
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Extensions {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

pub fn is_vendor_key(key: &str) -> bool {
    key.starts_with(VENDOR_PREFIX)
}

/// Map key that also accepts integers.
///
/// YAML decodes an unquoted `200:` as a number. Once serde has buffered such a
/// map (as it does for any record with a flattened field) a plain `String` key
/// no longer accepts it.
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MapKeyVisitor;

        impl<'de> Visitor<'de> for MapKeyVisitor {
            type Value = MapKey;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                formatter.write_str("a string or integer map key")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(MapKey(v.to_owned()))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(MapKey(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(MapKey(v.to_string()))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(MapKey(v.to_string()))
            }
        }

        deserializer.deserialize_any(MapKeyVisitor)
    }
}

/// A [`Value`] read from any self-describing format.
///
/// Map keys are read as [`MapKey`], so integer keys buffered from YAML come
/// back as strings instead of failing.
pub(crate) struct BufferedValue(pub(crate) Value);

impl<'de> Deserialize<'de> for BufferedValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BufferedVisitor;

        impl<'de> Visitor<'de> for BufferedVisitor {
            type Value = BufferedValue;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                formatter.write_str("any value")
            }

            fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(BufferedValue(Value::Bool(v)))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(BufferedValue(Value::Number(v.into())))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(BufferedValue(Value::Number(v.into())))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(BufferedValue(Number::from_f64(v).map_or(Value::Null, Value::Number)))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(BufferedValue(Value::String(v.to_owned())))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(BufferedValue(Value::String(v)))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(BufferedValue(Value::Null))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(BufferedValue(Value::Null))
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                BufferedValue::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(BufferedValue(item)) = access.next_element()? {
                    items.push(item);
                }
                Ok(BufferedValue(Value::Array(items)))
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut object = Map::new();
                while let Some(MapKey(key)) = access.next_key::<MapKey>()? {
                    let BufferedValue(value) = access.next_value()?;
                    object.insert(key, value);
                }
                Ok(BufferedValue(Value::Object(object)))
            }
        }

        deserializer.deserialize_any(BufferedVisitor)
    }
}

/// For `Option<Value>` fields: a present `null` is `Some(Value::Null)`, not `None`.
///
/// Pair it with `#[serde(default)]` so an absent field stays `None`.
pub(crate) fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    BufferedValue::deserialize(deserializer).map(|BufferedValue(value)| Some(value))
}

/// Writes typed entries followed by extensions as one flat object.
pub(crate) fn serialize_keyed<S, T>(
    entries: &BTreeMap<String, T>,
    extensions: &Extensions,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    let mut map = serializer.serialize_map(Some(entries.len() + extensions.len()))?;
    for (key, value) in entries {
        map.serialize_entry(key, value)?;
    }
    for (key, value) in extensions {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

/// Reads a flat object, sending `x-` keys to the extensions and every other key to `T`.
pub(crate) fn deserialize_keyed<'de, D, T>(
    deserializer: D,
) -> Result<(BTreeMap<String, T>, Extensions), D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct KeyedVisitor<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for KeyedVisitor<T>
    where
        T: Deserialize<'de>,
    {
        type Value = (BTreeMap<String, T>, Extensions);

        fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
            formatter.write_str("a map of entries and x- extensions")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = BTreeMap::new();
            let mut extensions = Extensions::new();
            while let Some(MapKey(key)) = access.next_key::<MapKey>()? {
                if is_vendor_key(&key) {
                    let value: Value = access.next_value()?;
                    extensions.insert(key, value);
                } else {
                    let value: T = access.next_value()?;
                    entries.insert(key, value);
                }
            }
            Ok((entries, extensions))
        }
    }

    deserializer.deserialize_map(KeyedVisitor(PhantomData))
}
