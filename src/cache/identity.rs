//! Identifier Resolution Module
//!
//! Discovers the identifier of a cacheable value, either from an explicit
//! override or from the field naming convention.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::cache::TypeTag;

// == Identifier ==
/// Scalar identifier used for primary addressing.
///
/// Stored as its string form, which is what ends up in the physical key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// Builds an identifier from a scalar JSON value.
    ///
    /// Returns None for null, arrays and objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            Value::Bool(b) => Some(Self(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&String> for Identifier {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

macro_rules! identifier_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Identifier {
                fn from(value: $ty) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

identifier_from_integer!(i32, i64, u32, u64, usize);

// == Cacheable ==
/// Capability implemented by every type stored through the facade.
///
/// Both methods have defaults: the type tag is the lowercased type name and
/// the identifier follows the field naming convention of
/// [`resolve_identifier`]. Override `identifier` when the convention picks
/// the wrong field or when the type has no serde field map.
pub trait Cacheable: Serialize + DeserializeOwned + Send + Sync {
    /// Namespace for this type's entries.
    ///
    /// The default drops generic arguments, so every instantiation of a
    /// generic type shares one namespace. Override it on such types to keep
    /// them apart.
    fn type_tag() -> TypeTag {
        TypeTag::of::<Self>()
    }

    fn identifier(&self) -> Option<Identifier> {
        resolve_identifier(self)
    }
}

// == Resolution ==
/// Resolves an identifier from the serialized fields of `value`.
///
/// Field order is declaration order (serde_json is built with
/// `preserve_order`). Values that do not serialize to a JSON object have no
/// identifier.
pub fn resolve_identifier<T: Serialize + ?Sized>(value: &T) -> Option<Identifier> {
    let value = serde_json::to_value(value).ok()?;
    let fields = value.as_object()?;
    resolve_from_fields(fields.iter().map(|(name, v)| (name.as_str(), v)))
}

/// Applies the naming convention to an ordered field list.
///
/// A field named exactly `id` (any case) wins. Otherwise the first field
/// whose name contains `id` is used. The chosen field must hold a scalar.
pub fn resolve_from_fields<'a, I>(fields: I) -> Option<Identifier>
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    let mut fallback = None;

    for (name, value) in fields {
        let lowered = name.to_lowercase();
        if lowered == "id" {
            return Identifier::from_value(value);
        }
        if fallback.is_none() && lowered.contains("id") {
            fallback = Some(value);
        }
    }

    fallback.and_then(Identifier::from_value)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Serialize, Deserialize)]
    struct Invoice {
        #[serde(rename = "fkId")]
        fk_id: u32,
        #[serde(rename = "Id")]
        id: u32,
    }

    #[derive(Serialize, Deserialize)]
    struct Order {
        number: u32,
        #[serde(rename = "customerId")]
        customer_id: String,
        #[serde(rename = "paymentId")]
        payment_id: String,
    }

    #[derive(Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    #[test]
    fn test_exact_id_beats_substring_match() {
        let invoice = Invoice { fk_id: 9, id: 3 };
        assert_eq!(resolve_identifier(&invoice), Some(Identifier::from(3u32)));
    }

    #[test]
    fn test_first_substring_match_in_declaration_order() {
        let order = Order {
            number: 1,
            customer_id: "c-1".to_string(),
            payment_id: "p-1".to_string(),
        };
        assert_eq!(resolve_identifier(&order), Some(Identifier::from("c-1")));
    }

    #[test]
    fn test_no_id_field() {
        let note = Note {
            text: "hello".to_string(),
        };
        assert_eq!(resolve_identifier(&note), None);
    }

    #[test]
    fn test_non_scalar_id_is_unresolved() {
        let value = json!({ "id": null, "name": "x" });
        assert_eq!(resolve_identifier(&value), None);

        let value = json!({ "id": [1, 2] });
        assert_eq!(resolve_identifier(&value), None);
    }

    #[test]
    fn test_non_object_values_have_no_identifier() {
        assert_eq!(resolve_identifier(&42), None);
        assert_eq!(resolve_identifier("id"), None);
    }

    #[test]
    fn test_identifier_string_forms() {
        assert_eq!(Identifier::from_value(&json!(7)).unwrap().as_str(), "7");
        assert_eq!(Identifier::from_value(&json!("abc")).unwrap().as_str(), "abc");
        assert_eq!(Identifier::from_value(&json!(true)).unwrap().as_str(), "true");
        assert_eq!(Identifier::from(7i64), Identifier::from("7"));
    }

    #[test]
    fn test_case_insensitive_exact_match() {
        let value = json!({ "ownerId": 1, "ID": 2 });
        assert_eq!(resolve_identifier(&value), Some(Identifier::from(2u32)));
    }

    #[derive(Serialize, Deserialize)]
    struct Page<T> {
        id: u32,
        items: Vec<T>,
    }

    impl Cacheable for Page<Order> {}

    impl Cacheable for Page<Note> {
        fn type_tag() -> TypeTag {
            TypeTag::new("page_of_notes")
        }
    }

    #[test]
    fn test_generic_type_tag_override() {
        assert_eq!(<Page<Order> as Cacheable>::type_tag().as_str(), "page");
        assert_eq!(<Page<Note> as Cacheable>::type_tag().as_str(), "page_of_notes");
    }
}
