// src/hs_code.rs
//! HS code resolver: maps a free-text product name to a harmonized-system code.
//!
//! Resolution never fails. Unknown products fall back to the chili code
//! (`0904.21`); `classify` reports which step matched so callers can tell a
//! real match apart from the fallback.

use serde::Serialize;

/// Generic spice code used when only a spice-like keyword matches.
pub const GENERIC_SPICE_CODE: &str = "0910.99";

/// Last-resort code for products nothing else matches (chili).
pub const DEFAULT_CODE: &str = "0904.21";

const SPICE_KEYWORDS: [&str; 4] = ["spice", "masala", "powder", "seasoning"];

/// Product → HS code table. Order matters for partial matching.
pub const HS_CODE_TABLE: &[(&str, &str)] = &[
    ("tea", "0902.30"),
    ("black tea", "0902.30"),
    ("green tea", "0902.10"),
    ("electronics", "8517.12"),
    ("smartphones", "8517.12"),
    ("transformers", "8504.31"),
    ("textiles", "5208.11"),
    ("cotton", "5208.11"),
    ("rice", "1006.30"),
    ("wheat", "1001.99"),
    ("spices", "0910.99"),
    ("chili", "0904.21"),
    ("chilli", "0904.21"),
    ("red chili", "0904.21"),
    ("green chili", "0904.21"),
    ("chili powder", "0904.22"),
    ("dried chili", "0904.21"),
    ("pepper", "0904.11"),
    ("turmeric", "0910.30"),
    ("cardamom", "0908.31"),
    ("coriander", "0909.21"),
    ("cumin", "0909.31"),
    ("leather", "4107.11"),
    ("jewelry", "7113.11"),
    ("pharmaceuticals", "3004.90"),
    ("machinery", "8479.89"),
    ("chemicals", "3824.99"),
];

/// Which resolution step produced the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Partial,
    Category,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsMatch {
    pub code: &'static str,
    pub kind: MatchKind,
}

impl HsMatch {
    /// True when the code came from the catch-all default rather than the product name.
    pub fn is_fallback(&self) -> bool {
        self.kind == MatchKind::Default
    }
}

/// Resolve a product name and report how it matched.
pub fn classify(product: &str) -> HsMatch {
    let lower = product.to_lowercase();

    if let Some((_, code)) = HS_CODE_TABLE.iter().find(|(k, _)| *k == lower) {
        return HsMatch {
            code: *code,
            kind: MatchKind::Exact,
        };
    }

    if let Some((_, code)) = HS_CODE_TABLE
        .iter()
        .find(|(k, _)| lower.contains(k) || k.contains(lower.as_str()))
    {
        return HsMatch {
            code: *code,
            kind: MatchKind::Partial,
        };
    }

    if SPICE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return HsMatch {
            code: GENERIC_SPICE_CODE,
            kind: MatchKind::Category,
        };
    }

    HsMatch {
        code: DEFAULT_CODE,
        kind: MatchKind::Default,
    }
}

/// Resolve a product name to an HS code. Always returns a code.
pub fn resolve(product: &str) -> &'static str {
    classify(product).code
}
