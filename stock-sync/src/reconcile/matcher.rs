//! Variant matching across the two catalogs
//!
//! Source and target variants share no internal ids; the only join key is the
//! external code (`slug` on the source side, `taager_code` on the target side).

use shared::{RecordId, SourceProduct, SourceVariant, TargetProduct, TargetVariant};
use std::collections::{HashMap, HashSet};

/// A source variant linked to the target variant carrying the same code
#[derive(Debug, Clone, Copy)]
pub struct MatchedPair<'a> {
    pub source: &'a SourceVariant,
    /// Owning target product
    pub product_id: &'a RecordId,
    pub variant_id: &'a RecordId,
    pub target: &'a TargetVariant,
}

/// Code -> first variant with that code in each target product, in catalog order
struct CodeIndex<'a> {
    by_code: HashMap<&'a str, Vec<(&'a RecordId, &'a TargetVariant)>>,
}

impl<'a> CodeIndex<'a> {
    fn build(target: &'a [TargetProduct]) -> Self {
        let mut by_code: HashMap<&'a str, Vec<(&'a RecordId, &'a TargetVariant)>> =
            HashMap::new();

        for product in target {
            let Some(product_id) = product.id.as_ref() else {
                continue;
            };
            let mut seen: HashSet<&str> = HashSet::new();
            for variant in &product.variants {
                if let Some(code) = variant.taager_code.as_deref()
                    && seen.insert(code)
                {
                    by_code.entry(code).or_default().push((product_id, variant));
                }
            }
        }

        Self { by_code }
    }

    fn lookup(&self, code: &str) -> &[(&'a RecordId, &'a TargetVariant)] {
        self.by_code.get(code).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Link source variants to target variants by external code.
///
/// For every source variant with a slug, each target product contributes its
/// first variant carrying that code. A target variant is claimed once: when
/// several source variants share a slug, the first in source order wins.
/// Variants without a code, without a counterpart, or without a target id
/// are skipped.
pub fn match_variants<'a>(
    source: &'a [SourceProduct],
    target: &'a [TargetProduct],
) -> Vec<MatchedPair<'a>> {
    let index = CodeIndex::build(target);
    let mut claimed: HashSet<(&RecordId, &RecordId)> = HashSet::new();
    let mut pairs = Vec::new();

    for source_variant in source.iter().flat_map(|p| &p.variants) {
        let Some(code) = source_variant.slug.as_deref() else {
            continue;
        };

        for &(product_id, target_variant) in index.lookup(code) {
            let Some(variant_id) = target_variant.id.as_ref() else {
                tracing::debug!(product_id = %product_id, code, "Matched target variant has no id");
                continue;
            };
            if !claimed.insert((product_id, variant_id)) {
                tracing::debug!(
                    product_id = %product_id,
                    variant_id = %variant_id,
                    code,
                    "Target variant already matched by an earlier source variant"
                );
                continue;
            }
            pairs.push(MatchedPair {
                source: source_variant,
                product_id,
                variant_id,
                target: target_variant,
            });
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(products: serde_json::Value) -> Vec<SourceProduct> {
        serde_json::from_value(products).unwrap()
    }

    fn target(products: serde_json::Value) -> Vec<TargetProduct> {
        serde_json::from_value(products).unwrap()
    }

    #[test]
    fn test_matches_by_code() {
        let src = source(json!([
            {"variants": [{"slug": "ABC", "quantity": 7}, {"slug": "NOPE", "quantity": 1}]}
        ]));
        let tgt = target(json!([
            {"id": 42, "variants": [{"id": 8, "taager_code": "XYZ"}, {"id": 9, "taager_code": "ABC"}]}
        ]));

        let pairs = match_variants(&src, &tgt);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].product_id, &RecordId::from(42));
        assert_eq!(pairs[0].variant_id, &RecordId::from(9));
        assert_eq!(pairs[0].source.slug.as_deref(), Some("ABC"));
    }

    #[test]
    fn test_skips_variants_without_slug() {
        let src = source(json!([{"variants": [{"quantity": 7}, {"slug": "", "quantity": 1}]}]));
        let tgt = target(json!([{"id": 1, "variants": [{"id": 2, "taager_code": ""}]}]));
        assert!(match_variants(&src, &tgt).is_empty());
    }

    #[test]
    fn test_first_source_match_wins_for_duplicate_slugs() {
        let src = source(json!([
            {"variants": [{"slug": "DUP", "quantity": 1}]},
            {"variants": [{"slug": "DUP", "quantity": 2}]}
        ]));
        let tgt = target(json!([{"id": 5, "variants": [{"id": 50, "taager_code": "DUP"}]}]));

        let pairs = match_variants(&src, &tgt);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].source.quantity, Some(json!(1)));
    }

    #[test]
    fn test_numeric_codes_match() {
        let src = source(json!([{"variants": [{"slug": 1001, "quantity": 4}]}]));
        let tgt = target(json!([{"id": 7, "variants": [{"id": 70, "taager_code": "1001"}]}]));

        let pairs = match_variants(&src, &tgt);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].variant_id, &RecordId::from(70));
    }

    #[test]
    fn test_code_in_several_target_products() {
        let src = source(json!([{"variants": [{"slug": "SHARED", "quantity": 3}]}]));
        let tgt = target(json!([
            {"id": 1, "variants": [{"id": 10, "taager_code": "SHARED"}, {"id": 11, "taager_code": "SHARED"}]},
            {"id": 2, "variants": [{"id": 20, "taager_code": "SHARED"}]}
        ]));

        let pairs = match_variants(&src, &tgt);
        let ids: Vec<_> = pairs.iter().map(|p| p.variant_id.to_string()).collect();
        assert_eq!(ids, vec!["10", "20"]);
    }

    #[test]
    fn test_product_order_does_not_change_matches() {
        let src_a = source(json!([
            {"variants": [{"slug": "A", "quantity": 1}]},
            {"variants": [{"slug": "B", "quantity": 2}]}
        ]));
        let src_b = source(json!([
            {"variants": [{"slug": "B", "quantity": 2}]},
            {"variants": [{"slug": "A", "quantity": 1}]}
        ]));
        let tgt = target(json!([
            {"id": 1, "variants": [{"id": 10, "taager_code": "B"}]},
            {"id": 2, "variants": [{"id": 20, "taager_code": "A"}]}
        ]));

        let mut a: Vec<_> = match_variants(&src_a, &tgt)
            .iter()
            .map(|p| (p.variant_id.clone(), p.source.slug.clone()))
            .collect();
        let mut b: Vec<_> = match_variants(&src_b, &tgt)
            .iter()
            .map(|p| (p.variant_id.clone(), p.source.slug.clone()))
            .collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_target_without_ids_is_skipped() {
        let src = source(json!([{"variants": [{"slug": "A", "quantity": 1}]}]));
        let tgt = target(json!([
            {"variants": [{"id": 10, "taager_code": "A"}]},
            {"id": 2, "variants": [{"taager_code": "A"}, {"id": 21, "taager_code": "A"}]}
        ]));
        assert!(match_variants(&src, &tgt).is_empty());
    }
}
