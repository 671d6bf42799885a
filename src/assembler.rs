use crate::derived::DerivedFields;
use crate::fields::ExtractedFields;
use crate::results::{ProductRecord, RunContext, sentinel};

/// Merges extracted and derived values with run context into a record.
///
/// Never touches the listing node; every missing value becomes its sentinel.
pub fn assemble(
    fields: ExtractedFields,
    derived: DerivedFields,
    context: &RunContext,
) -> ProductRecord {
    let ExtractedFields {
        title,
        link,
        selling_price,
        reference_price,
        deal_tag,
        recent_purchase_volume,
        rating,
        review_count,
        sponsored,
    } = fields;

    ProductRecord {
        title: title.or_sentinel(sentinel::TITLE),
        grammage: derived.grammage.or_sentinel(sentinel::GRAMMAGE),
        selling_price: selling_price.or_sentinel(sentinel::PRICE),
        reference_price: reference_price.or_sentinel(sentinel::PRICE),
        discount_percent: derived.discount_percent,
        deal_tag: deal_tag.or_sentinel(sentinel::DEAL),
        recent_purchase_volume: recent_purchase_volume.or_sentinel(sentinel::PURCHASE_VOLUME),
        rating: rating.or_sentinel(sentinel::RATING),
        review_count: review_count.or_sentinel(sentinel::REVIEWS),
        link: link.or_sentinel(sentinel::LINK),
        is_sponsored: sponsored.is_found(),
        captured_at: context.captured_at,
        search_term: context.search_term.clone(),
        geo_context: context.geo_context.clone(),
        category: context.category.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Extraction;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn context() -> RunContext {
        RunContext::new(
            "cookies",
            "560005",
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        )
    }

    fn nothing() -> ExtractedFields {
        ExtractedFields {
            title: Extraction::Missing,
            link: Extraction::Missing,
            selling_price: Extraction::Missing,
            reference_price: Extraction::Missing,
            deal_tag: Extraction::Missing,
            recent_purchase_volume: Extraction::Missing,
            rating: Extraction::Missing,
            review_count: Extraction::Missing,
            sponsored: Extraction::Missing,
        }
    }

    #[test]
    fn test_missing_fields_become_sentinels() {
        let fields = nothing();
        let derived = DerivedFields::compute(
            &fields.title,
            &fields.selling_price,
            &fields.reference_price,
        );
        let record = assemble(fields, derived, &context());

        assert_eq!(
            record,
            ProductRecord {
                title: "No Title".to_string(),
                grammage: "No Grammage".to_string(),
                selling_price: "No Price".to_string(),
                reference_price: "No Price".to_string(),
                discount_percent: 0.0,
                deal_tag: "No Deal".to_string(),
                recent_purchase_volume: "No data".to_string(),
                rating: "No Rating".to_string(),
                review_count: "No Reviews".to_string(),
                link: "No Link".to_string(),
                is_sponsored: false,
                captured_at: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
                search_term: "cookies".to_string(),
                geo_context: "560005".to_string(),
                category: "cookies".to_string(),
            }
        );
    }

    #[test]
    fn test_context_and_sponsorship_are_stamped() {
        let mut fields = nothing();
        fields.sponsored = Extraction::Found("Sponsored".to_string());
        fields.title = Extraction::Found("Atta 5kg".to_string());
        let derived = DerivedFields::compute(
            &fields.title,
            &fields.selling_price,
            &fields.reference_price,
        );
        let record = assemble(fields, derived, &context().with_category("staples"));

        assert!(record.is_sponsored);
        assert_eq!(record.grammage, "5kg");
        assert_eq!(record.category, "staples");
        assert_eq!(record.search_term, "cookies");
    }
}
