// Built-in makes/models dictionary used for form suggestions when nothing better
// is available. Free-text input is never rejected against it.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

static FALLBACK_MODELS: Lazy<BTreeMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    BTreeMap::from([
        ("Toyota", vec!["Corolla (2008-2025)", "Yaris (2008-2025)", "CHR (2016-2025)"]),
        ("Mazda", vec!["Mazda3 (2003-2025)", "Mazda6 (2003-2021)", "CX-5 (2012-2025)"]),
        ("Volkswagen", vec!["Golf (2004-2025)", "Polo (2005-2025)", "Passat (2005-2025)"]),
        ("Hyundai", vec!["i10 (2007-2025)", "i20 (2008-2025)", "i30 (2007-2025)"]),
        ("Kia", vec!["Picanto (2004-2025)", "Rio (1999-2025)", "Sportage (1993-2025)"]),
    ])
});

// Sorted make names
pub fn makes() -> Vec<&'static str> {
    FALLBACK_MODELS.keys().copied().collect()
}

// Models for a make (case-insensitive); empty for unknown makes
pub fn models_for(make: &str) -> Vec<&'static str> {
    FALLBACK_MODELS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(make.trim()))
        .map(|(_, models)| models.clone())
        .unwrap_or_default()
}
