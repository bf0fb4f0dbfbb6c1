//! Product category inference
//!
//! The store keeps no category attribute; reporting derives one from the
//! product name with a keyword heuristic. This is a presentation-layer
//! derivation only and must never be written back into the data model.

/// Keyword table, first match wins (checked against the lowercased name)
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Cookware", &["pot", "pan", "wok", "kettle", "casserole"]),
    (
        "Tableware",
        &["plate", "bowl", "cup", "glass", "mug", "dish", "tray"],
    ),
    (
        "Utensils",
        &["spoon", "fork", "knife", "ladle", "spatula", "whisk", "tongs"],
    ),
    (
        "Appliances",
        &["mixer", "blender", "grinder", "toaster", "cooker", "fryer"],
    ),
    (
        "Storage",
        &["jar", "container", "box", "canister", "bottle", "bucket"],
    ),
];

/// Fallback bucket for names no keyword matches
pub const UNCATEGORIZED: &str = "Other";

/// Infer a display category from a product name
pub fn infer_category(product_name: &str) -> &'static str {
    let name = product_name.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| name.contains(k)) {
            return category;
        }
    }
    UNCATEGORIZED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_match() {
        assert_eq!(infer_category("Copper Pot 5L"), "Cookware");
        assert_eq!(infer_category("Dinner Plate Set"), "Tableware");
        assert_eq!(infer_category("Steel Ladle"), "Utensils");
        assert_eq!(infer_category("Hand Mixer 400W"), "Appliances");
        assert_eq!(infer_category("Spice Jar"), "Storage");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(infer_category("COPPER PAN"), "Cookware");
    }

    #[test]
    fn test_unknown_falls_back() {
        assert_eq!(infer_category("Gift Voucher"), UNCATEGORIZED);
    }
}
