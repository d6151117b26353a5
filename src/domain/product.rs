//! The `Product` record and its flat-map serialization contract.

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// Fields every serialized product carries, in wire order.
pub const PRODUCT_FIELDS: [&str; 7] = [
    "id",
    "name",
    "category",
    "price",
    "description",
    "color",
    "count",
];

/// Fields a caller must supply. Checked in this order, so the first missing
/// one is the one reported.
pub const REQUIRED_FIELDS: [&str; 6] = ["name", "category", "price", "description", "color", "count"];

/// Caller-supplied product data is malformed or incomplete.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid product: body of request contained bad or no data")]
    BadShape,
    #[error("Invalid product: missing {0}")]
    Missing(&'static str),
    #[error("Invalid product: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    /// The field the error is about, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::BadShape => None,
            ValidationError::Missing(field) => Some(*field),
            ValidationError::Invalid { field, .. } => Some(*field),
        }
    }

    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// A catalog entry. `id == 0` means the product has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub color: String,
    /// Units on hand.
    pub count: u32,
}

impl Product {
    /// Builds an unsaved product.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        description: impl Into<String>,
        color: impl Into<String>,
        count: u32,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            category: category.into(),
            price,
            description: description.into(),
            color: color.into(),
            count,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    pub fn is_available(&self) -> bool {
        self.count > 0
    }

    /// Checks the invariants a product must hold before it is stored.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("category", &self.category),
            ("description", &self.description),
            ("color", &self.color),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::invalid(field, "must not be empty"));
            }
        }
        if !self.price.is_finite() {
            return Err(ValidationError::invalid("price", "must be a finite number"));
        }
        Ok(())
    }

    /// Flattens the product into exactly the seven [`PRODUCT_FIELDS`].
    pub fn serialize(&self) -> Map<String, JsonValue> {
        let mut map = Map::new();
        map.insert("id".to_string(), JsonValue::from(self.id));
        map.insert("name".to_string(), JsonValue::from(self.name.as_str()));
        map.insert("category".to_string(), JsonValue::from(self.category.as_str()));
        map.insert("price".to_string(), JsonValue::from(self.price));
        map.insert(
            "description".to_string(),
            JsonValue::from(self.description.as_str()),
        );
        map.insert("color".to_string(), JsonValue::from(self.color.as_str()));
        map.insert("count".to_string(), JsonValue::from(self.count));
        map
    }

    /// Builds a product from a flat map.
    ///
    /// `id` is optional (absent or `null` means unsaved). Numeric strings are
    /// accepted for `price`, `count` and `id`; scalars are accepted for the
    /// text fields and stringified.
    pub fn deserialize(data: &JsonValue) -> Result<Self, ValidationError> {
        let map = data.as_object().ok_or(ValidationError::BadShape)?;

        if let Some(missing) = REQUIRED_FIELDS
            .iter()
            .find(|field| map.get(**field).map_or(true, JsonValue::is_null))
        {
            return Err(ValidationError::Missing(*missing));
        }

        let id = match map.get("id") {
            None | Some(JsonValue::Null) => 0,
            Some(v) => coerce_u64("id", v)?,
        };
        let count = coerce_u64("count", &map["count"])?;
        let count = u32::try_from(count)
            .map_err(|_| ValidationError::invalid("count", format!("out of range: {}", count)))?;

        let product = Self {
            id,
            name: coerce_text("name", &map["name"])?,
            category: coerce_text("category", &map["category"])?,
            price: coerce_f64("price", &map["price"])?,
            description: coerce_text("description", &map["description"])?,
            color: coerce_text("color", &map["color"])?,
            count,
        };
        product.validate()?;
        Ok(product)
    }
}

fn coerce_text(field: &'static str, v: &JsonValue) -> Result<String, ValidationError> {
    match v {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        _ => Err(ValidationError::invalid(field, "expected text")),
    }
}

fn coerce_f64(field: &'static str, v: &JsonValue) -> Result<f64, ValidationError> {
    let parsed = match v {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|p| p.is_finite())
        .ok_or_else(|| ValidationError::invalid(field, "expected a number"))
}

fn coerce_u64(field: &'static str, v: &JsonValue) -> Result<u64, ValidationError> {
    let parsed = match v {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::invalid(field, "expected a non-negative integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn laptop() -> Product {
        Product::new("Asus2500", "Laptop", 234.0, "Working Condition", "Black", 23)
    }

    #[test]
    fn serialize_emits_exactly_the_product_fields() {
        let map = laptop().serialize();
        let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
        keys.sort_unstable();
        let mut expected = PRODUCT_FIELDS.to_vec();
        expected.sort_unstable();
        assert_eq!(keys, expected);
        assert_eq!(map["id"], json!(0));
        assert_eq!(map["count"], json!(23));
    }

    #[test]
    fn deserialize_round_trips() {
        let mut p = laptop();
        p.id = 7;
        p.price = 19.99;
        let back = Product::deserialize(&JsonValue::Object(p.serialize())).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn deserialize_names_first_missing_field() {
        let err = Product::deserialize(&json!({"id": 0, "category": "Laptop"})).unwrap_err();
        assert_eq!(err, ValidationError::Missing("name"));
        assert_eq!(err.to_string(), "Invalid product: missing name");

        let err = Product::deserialize(&json!({
            "name": "Hp", "category": "Microwave", "price": 960,
            "description": "Brand New", "color": "Blue"
        }))
        .unwrap_err();
        assert_eq!(err.field(), Some("count"));
    }

    #[test]
    fn deserialize_rejects_non_map_input() {
        assert_eq!(
            Product::deserialize(&json!("not-a-map")).unwrap_err(),
            ValidationError::BadShape
        );
        assert_eq!(
            Product::deserialize(&JsonValue::Null).unwrap_err(),
            ValidationError::BadShape
        );
        assert_eq!(
            Product::deserialize(&json!([1, 2])).unwrap_err(),
            ValidationError::BadShape
        );
    }

    #[test]
    fn deserialize_coerces_numeric_strings() {
        let p = Product::deserialize(&json!({
            "name": "GE4509", "category": "Microwave", "price": "45",
            "description": "Open Box", "color": "Black", "count": "12"
        }))
        .unwrap();
        assert_eq!(p.id, 0);
        assert_eq!(p.price, 45.0);
        assert_eq!(p.count, 12);
    }

    #[test]
    fn deserialize_rejects_bad_values() {
        let base = json!({
            "name": "Hp", "category": "Microwave", "price": 960,
            "description": "Brand New", "color": "Blue", "count": 0
        });

        let mut negative = base.clone();
        negative["count"] = json!(-1);
        assert_eq!(Product::deserialize(&negative).unwrap_err().field(), Some("count"));

        let mut priceless = base.clone();
        priceless["price"] = json!("cheap");
        assert_eq!(Product::deserialize(&priceless).unwrap_err().field(), Some("price"));

        let mut blank = base.clone();
        blank["color"] = json!("  ");
        assert_eq!(Product::deserialize(&blank).unwrap_err().field(), Some("color"));

        let mut nulled = base;
        nulled["name"] = JsonValue::Null;
        assert_eq!(
            Product::deserialize(&nulled).unwrap_err(),
            ValidationError::Missing("name")
        );
    }
}
