use crate::results::Extraction;
use regex::Regex;
use std::sync::LazyLock;

static GRAMMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+\.?\d*\s?(ml|g|kg|l)").expect("grammage pattern should be valid")
});

/// Fields computed from already extracted values
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFields {
    pub grammage: Extraction<String>,
    pub discount_percent: f64,
}

impl DerivedFields {
    pub fn compute(
        title: &Extraction<String>,
        selling_price: &Extraction<String>,
        reference_price: &Extraction<String>,
    ) -> Self {
        Self {
            grammage: grammage(title),
            discount_percent: discount_percent(selling_price, reference_price),
        }
    }
}

/// Percentage saved against the reference price, rounded to two places.
///
/// Any missing or malformed input yields `0.0`.
pub fn discount_percent(
    selling_price: &Extraction<String>,
    reference_price: &Extraction<String>,
) -> f64 {
    let (Extraction::Found(selling), Extraction::Found(reference)) =
        (selling_price, reference_price)
    else {
        return 0.0;
    };

    match (parse_amount(selling), parse_amount(reference)) {
        (Some(selling), Some(reference)) if reference != 0.0 => {
            round2(100.0 * (reference - selling) / reference)
        }
        _ => {
            ::log::trace!(
                "No discount for selling price {:?} against {:?}",
                selling,
                reference
            );
            0.0
        }
    }
}

/// First `<number>[space]<unit>` run in the title, as written
pub fn grammage(title: &Extraction<String>) -> Extraction<String> {
    match title {
        Extraction::Found(title) => GRAMMAGE
            .find(title)
            .map(|m| m.as_str().to_string())
            .into(),
        Extraction::Missing => Extraction::Missing,
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Two decimal places, ties to even
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
