use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, Entity, Money, ProductId, ValueObject};

/// Customer rating summary attached to a product.
///
/// `rate` is constrained to `0.0..=5.0`; deserialization rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RatingWire")]
pub struct Rating {
    rate: f64,
    count: u32,
}

impl ValueObject for Rating {}

#[derive(Deserialize)]
struct RatingWire {
    rate: f64,
    count: u32,
}

impl TryFrom<RatingWire> for Rating {
    type Error = DomainError;

    fn try_from(wire: RatingWire) -> Result<Self, Self::Error> {
        Rating::new(wire.rate, wire.count)
    }
}

impl Rating {
    pub const MAX_RATE: f64 = 5.0;

    pub fn new(rate: f64, count: u32) -> Result<Self, DomainError> {
        if !(0.0..=Self::MAX_RATE).contains(&rate) {
            return Err(DomainError::validation(format!(
                "rating must be between 0 and {}: {rate}",
                Self::MAX_RATE
            )));
        }
        Ok(Self { rate, count })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// A catalog product, exactly as published by the catalog endpoint.
///
/// Products are never mutated after deserialization; the stores share them as
/// `Arc<Product>`. Identity is the `id` alone (see [`Entity`]), so two values
/// with the same id are the same product even if other fields differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Wire format is a decimal number; negative prices are rejected.
    #[serde(with = "decimal_price")]
    pub price: Money,
    pub description: String,
    pub category: String,
    #[serde(rename = "image")]
    pub image_url: String,
    pub rating: Rating,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

impl Product {
    pub fn unit_price(&self) -> Money {
        self.price
    }

    /// Case-insensitive match of an already lower-cased needle against the
    /// title or the description.
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}

mod decimal_price {
    use serde::{Deserialize, Deserializer, Serializer};
    use storefront_core::Money;

    pub fn serialize<S: Serializer>(price: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(price.to_decimal())
    }

    /// Reads the number's literal text so sub-cent prices are rejected
    /// instead of being rounded through `f64`.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let amount = serde_json::Number::deserialize(deserializer)?;
        Money::parse_decimal(&amount.to_string()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire_product() -> serde_json::Value {
        json!({
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 109.95,
            "description": "Fits 15 inch laptops",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        })
    }

    #[test]
    fn deserializes_catalog_wire_shape() {
        let product: Product = serde_json::from_value(wire_product()).unwrap();

        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.title, "Fjallraven Backpack");
        assert_eq!(product.price.cents(), 10995);
        assert_eq!(product.category, "men's clothing");
        assert!(product.image_url.ends_with(".jpg"));
        assert_eq!(product.rating.rate(), 3.9);
        assert_eq!(product.rating.count(), 120);
    }

    #[test]
    fn integer_prices_are_accepted() {
        let mut value = wire_product();
        value["price"] = json!(10);

        let product: Product = serde_json::from_value(value).unwrap();
        assert_eq!(product.price.cents(), 1000);
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut value = wire_product();
        value["price"] = json!(-1.5);

        let err = serde_json::from_value::<Product>(value).unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn sub_cent_prices_are_rejected() {
        for price in [json!(0.004), json!(0.125), json!(1.005)] {
            let mut value = wire_product();
            value["price"] = price.clone();

            let err = serde_json::from_value::<Product>(value).unwrap_err();
            assert!(err.to_string().contains("sub-cent"), "{price}: {err}");
        }
    }

    #[test]
    fn sub_cent_price_in_raw_body_is_rejected() {
        let body = r#"{"id": 1, "title": "t", "price": 1.005, "description": "", "category": "c",
            "image": "i", "rating": {"rate": 1.0, "count": 1}}"#;

        assert!(serde_json::from_str::<Product>(body).is_err());

        let exact = body.replace("1.005", "1.050");
        let product: Product = serde_json::from_str(&exact).unwrap();
        assert_eq!(product.price.cents(), 105);
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let mut value = wire_product();
        value["rating"]["rate"] = json!(5.5);

        assert!(serde_json::from_value::<Product>(value).is_err());
    }

    #[test]
    fn missing_field_is_rejected() {
        let mut value = wire_product();
        value.as_object_mut().unwrap().remove("category");

        let err = serde_json::from_value::<Product>(value).unwrap_err();
        assert!(err.to_string().contains("category"));
    }

    #[test]
    fn serializes_back_to_wire_field_names() {
        let product: Product = serde_json::from_value(wire_product()).unwrap();
        let value = serde_json::to_value(&product).unwrap();

        assert_eq!(value["image"], wire_product()["image"]);
        assert_eq!(value["price"], json!(109.95));
    }

    #[test]
    fn text_match_covers_title_and_description() {
        let product: Product = serde_json::from_value(wire_product()).unwrap();

        assert!(product.matches_text("backpack"));
        assert!(product.matches_text("laptop"));
        assert!(!product.matches_text("jacket"));
    }

    #[test]
    fn identity_is_the_id() {
        let a: Product = serde_json::from_value(wire_product()).unwrap();
        let mut b = a.clone();
        b.title = "Renamed".to_string();

        assert_ne!(a, b);
        assert_eq!(Entity::id(&a), Entity::id(&b));
    }
}
