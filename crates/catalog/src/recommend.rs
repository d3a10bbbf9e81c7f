//! Skin-type recommendations with brand variety

use std::collections::HashMap;

use tracing::debug;

use crate::product::Product;
use crate::skin_type::SkinType;

/// Upper bound on recommended products
pub const MAX_RECOMMENDATIONS: usize = 6;

/// Products whose skin type list mentions `skin_type`
pub fn filter_by_skin_type(products: &[Product], skin_type: SkinType) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.suits(skin_type.query_key()))
        .cloned()
        .collect()
}

/// Pick up to six products, round-robin across brands.
///
/// Short lists come back untouched. With a single brand the first six are
/// taken. Otherwise each brand contributes at most `ceil(6 / brands)` in
/// turn, and any remaining slots are filled in list order.
pub fn diversify_brands(products: &[Product]) -> Vec<Product> {
    if products.len() <= MAX_RECOMMENDATIONS {
        return products.to_vec();
    }

    let mut brands: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&Product>> = HashMap::new();
    for product in products {
        let brand = product.brand_key();
        groups
            .entry(brand)
            .or_insert_with(|| {
                brands.push(brand);
                Vec::new()
            })
            .push(product);
    }

    debug!("Diversifying {} products over {} brands", products.len(), brands.len());

    if brands.len() == 1 {
        return products[..MAX_RECOMMENDATIONS].to_vec();
    }

    let max_per_brand = MAX_RECOMMENDATIONS.div_ceil(brands.len());
    let mut picked: Vec<&Product> = Vec::with_capacity(MAX_RECOMMENDATIONS);
    let mut taken: HashMap<&str, usize> = HashMap::new();
    let mut turn = 0;

    while picked.len() < MAX_RECOMMENDATIONS && turn <= brands.len() * 10 {
        let brand = brands[turn % brands.len()];
        let count = taken.get(brand).copied().unwrap_or(0);

        if count < max_per_brand {
            if let Some(candidate) = groups.get(brand).and_then(|g| g.get(count)).copied() {
                if !picked.iter().any(|p| p.id == candidate.id) {
                    picked.push(candidate);
                }
                // a duplicate id still counts as taken
                taken.insert(brand, count + 1);
            }
        }

        turn += 1;
    }

    for product in products {
        if picked.len() >= MAX_RECOMMENDATIONS {
            break;
        }
        if !picked.iter().any(|p| p.id == product.id) {
            picked.push(product);
        }
    }

    picked.into_iter().cloned().collect()
}

/// Filter by skin type then diversify; never more than six
pub fn recommend(products: &[Product], skin_type: SkinType) -> Vec<Product> {
    let matching = filter_by_skin_type(products, skin_type);
    let mut picked = diversify_brands(&matching);
    picked.truncate(MAX_RECOMMENDATIONS);
    debug!(
        "Recommending {} of {} {} products",
        picked.len(),
        matching.len(),
        skin_type
    );
    picked
}
