use std::collections::BTreeMap;

/// Declares a field enum whose variants map one-to-one onto persisted keys.
///
/// Generates `ALL`, `key()`, `parse()` and `Display`.
macro_rules! keyed_fields {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $key:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn key(&self) -> &'static str {
                match self {
                    $(Self::$variant => $key),+
                }
            }

            pub fn parse(key: &str) -> Option<Self> {
                match key.trim() {
                    $($key => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(
                &self,
                f: &mut std::fmt::Formatter<'_>,
            ) -> std::fmt::Result {
                f.write_str(self.key())
            }
        }
    };
}

pub(crate) use keyed_fields;

/// Values entered for a set of typed fields. Absent fields read as the
/// value type's default.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldMap<F: Ord, V> {
    values: BTreeMap<F, V>,
}

impl<F: Ord, V> Default for FieldMap<F, V> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl<F: Ord + Copy, V: Copy + Default> FieldMap<F, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        field: F,
        value: V,
    ) -> Self {
        self.values.insert(field, value);
        self
    }

    pub fn set(
        &mut self,
        field: F,
        value: V,
    ) {
        self.values.insert(field, value);
    }

    pub fn get(
        &self,
        field: F,
    ) -> V {
        self.values.get(&field).copied().unwrap_or_default()
    }

    pub fn contains(
        &self,
        field: F,
    ) -> bool {
        self.values.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, V)> + '_ {
        self.values.iter().map(|(f, v)| (*f, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<F: Ord, V> FromIterator<(F, V)> for FieldMap<F, V> {
    fn from_iter<I: IntoIterator<Item = (F, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
