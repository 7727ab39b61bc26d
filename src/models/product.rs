//! Product model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category_id: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, with = "super::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub category_id: i64,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category_id: Option<i64>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl Product {
    pub fn from_request(id: i64, created_at: DateTime<Utc>, request: CreateProductRequest) -> Self {
        Self {
            id,
            name: request.name,
            category_id: request.category_id,
            price: request.price,
            quantity: request.quantity,
            description: request.description,
            image: request.image,
            created_at: Some(created_at),
        }
    }

    /// Overwrite every field present in the update, keep the rest
    pub fn apply(&mut self, update: UpdateProductRequest) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(image) = update.image {
            self.image = image;
        }
    }

    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_partial_remote_record() {
        let product: Product = serde_json::from_str(
            r#"{"id":1,"name":"Widget","categoryId":1,"price":1000,"quantity":5}"#,
        ).unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, 1000.0);
        assert!(product.description.is_empty());
        assert!(product.created_at.is_none());
    }

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let mut product = Product::from_request(7, Utc::now(), CreateProductRequest {
            name: "Kitob".to_string(),
            category_id: 4,
            price: 45000.0,
            quantity: 3,
            description: "Qattiq muqova".to_string(),
            image: String::new(),
        });

        product.apply(UpdateProductRequest {
            price: Some(50000.0),
            ..Default::default()
        });

        assert_eq!(product.price, 50000.0);
        assert_eq!(product.name, "Kitob");
        assert_eq!(product.quantity, 3);
        assert_eq!(product.description, "Qattiq muqova");
    }
}
