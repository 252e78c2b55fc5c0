use mongodb::bson::{self, Bson, Document};
use serde::{Deserialize, Serialize};

use crate::{
    database::id_to_string,
    error::{AppError, Result},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub sku: String,
    pub color: Option<String>,
    pub storage: Option<String>,
    pub price: f64,
    pub mrp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiPlan {
    pub tenure_months: u32,
    pub monthly_payment: f64,
    pub interest_rate: f64,
    pub cashback: Option<String>,
    pub partner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: String,
    pub variants: Vec<Variant>,
    pub emi_plans: Vec<EmiPlan>,
}

impl Product {
    pub fn validate(&self) -> Result<()> {
        let slug_ok = !self.slug.is_empty()
            && self
                .slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !slug_ok {
            return Err(AppError::BadRequest(format!(
                "Invalid product slug: {:?}",
                self.slug
            )));
        }

        if let Some(plan) = self.emi_plans.iter().find(|p| p.tenure_months == 0) {
            return Err(AppError::BadRequest(format!(
                "EMI plan for {} has a zero tenure (monthly payment {})",
                self.slug, plan.monthly_payment
            )));
        }

        Ok(())
    }

    /// Storage shape of a product, before the store adds `_id` and timestamps.
    pub fn to_document(&self) -> Result<Document> {
        Ok(bson::to_document(self)?)
    }
}

/// A product as read back from the store.
///
/// Serializes flat: `_id`, the product fields, then the timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredProduct {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub product: Product,
    pub created_at: String,
    pub updated_at: String,
}

impl StoredProduct {
    pub fn from_document(mut document: Document) -> Result<Self> {
        let id = document
            .remove("_id")
            .map(|id| id_to_string(&id))
            .ok_or_else(|| {
                AppError::SerializationError("product document has no _id".to_string())
            })?;
        let created_at = take_string(&mut document, "created_at")?;
        let updated_at = take_string(&mut document, "updated_at")?;
        let product = bson::from_document(document)?;

        Ok(Self {
            id,
            product,
            created_at,
            updated_at,
        })
    }
}

fn take_string(document: &mut Document, key: &str) -> Result<String> {
    match document.remove(key) {
        Some(Bson::String(value)) => Ok(value),
        Some(other) => Err(AppError::SerializationError(format!(
            "{} should be a string, found {:?}",
            key,
            other.element_type()
        ))),
        None => Err(AppError::SerializationError(format!(
            "product document has no {}",
            key
        ))),
    }
}
