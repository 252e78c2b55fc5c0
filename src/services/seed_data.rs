use crate::models::{EmiPlan, Product, Variant};

fn variant(name: &str, sku: &str, color: &str, storage: &str, mrp: f64, price: f64) -> Variant {
    Variant {
        name: name.to_string(),
        sku: sku.to_string(),
        color: Some(color.to_string()),
        storage: Some(storage.to_string()),
        price,
        mrp,
    }
}

fn plan(
    tenure_months: u32,
    monthly_payment: f64,
    interest_rate: f64,
    cashback: Option<&str>,
    partner: &str,
) -> EmiPlan {
    EmiPlan {
        tenure_months,
        monthly_payment,
        interest_rate,
        cashback: cashback.map(str::to_string),
        partner: Some(partner.to_string()),
    }
}

/// The demo catalog, in insertion order.
pub fn demo_products() -> Vec<Product> {
    vec![
        Product {
            slug: "iphone-17-pro".to_string(),
            name: "iPhone 17 Pro".to_string(),
            description: Some("The ultimate iPhone experience.".to_string()),
            image_url: "https://images.unsplash.com/photo-1661961112951-f2bfd1f253ce?q=80&w=1200&auto=format&fit=crop".to_string(),
            variants: vec![
                variant("128GB", "IP17P-128-SIL", "Silver", "128GB", 139999.0, 129999.0),
                variant("256GB", "IP17P-256-BLK", "Black", "256GB", 149999.0, 139999.0),
            ],
            emi_plans: vec![
                plan(3, 44999.67, 0.0, Some("₹1000 via MF partner"), "BlueFund"),
                plan(6, 23666.50, 10.5, None, "BlueFund"),
                plan(9, 16222.11, 12.5, None, "GreenInvest"),
            ],
        },
        Product {
            slug: "samsung-s24-ultra".to_string(),
            name: "Samsung S24 Ultra".to_string(),
            description: Some("Epic camera and performance.".to_string()),
            image_url: "https://images.unsplash.com/photo-1610945415295-d9bbf067e59c?q=80&w=1200&auto=format&fit=crop".to_string(),
            variants: vec![
                variant("256GB", "SS24U-256-GRY", "Gray", "256GB", 129999.0, 119999.0),
                variant("512GB", "SS24U-512-PUR", "Purple", "512GB", 149999.0, 134999.0),
            ],
            emi_plans: vec![
                plan(3, 39999.67, 0.0, Some("₹1500 via MF partner"), "BlueFund"),
                plan(6, 20666.50, 9.5, None, "AlphaGrowth"),
            ],
        },
        Product {
            slug: "oneplus-12".to_string(),
            name: "OnePlus 12".to_string(),
            description: Some("Fast and smooth performance.".to_string()),
            image_url: "https://images.unsplash.com/photo-1511707171634-5f897ff02aa9?q=80&w=1200&auto=format&fit=crop".to_string(),
            variants: vec![
                variant("128GB", "OP12-128-GRN", "Green", "128GB", 69999.0, 64999.0),
                variant("256GB", "OP12-256-BLK", "Black", "256GB", 79999.0, 72999.0),
            ],
            emi_plans: vec![
                plan(3, 21666.33, 0.0, None, "AlphaGrowth"),
                plan(6, 11222.50, 8.0, Some("₹500"), "GreenInvest"),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn demo_catalog_is_valid_and_distinct() {
        let products = demo_products();
        assert_eq!(products.len(), 3);

        for product in &products {
            product.validate().unwrap();
            assert_eq!(product.variants.len(), 2);
            assert!((2..=3).contains(&product.emi_plans.len()));
        }

        let slugs: HashSet<&str> = products.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs.len(), 3);
    }
}
