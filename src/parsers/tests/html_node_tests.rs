use crate::parsers::html::{HtmlNode, listing_nodes};
use crate::parsers::tests::fixtures::{BARE_CARD, FULL_CARD, WHOLE_PRICE_CARD, search_page};
use crate::parsers::{CssSelector, ListingNode, Locator};
use crate::pipeline::DEFAULT_ITEM_SELECTOR;
use scraper::Html;

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> CssSelector {
        CssSelector::parse(DEFAULT_ITEM_SELECTOR).unwrap()
    }

    fn first_node(doc: &Html) -> HtmlNode<'_> {
        listing_nodes(doc, &items())[0]
    }

    #[test]
    fn test_listing_nodes_in_document_order() {
        let doc = Html::parse_document(&search_page(&[FULL_CARD, WHOLE_PRICE_CARD, BARE_CARD]));
        let nodes = listing_nodes(&doc, &items());
        assert_eq!(nodes.len(), 3);

        let titles = nodes
            .iter()
            .map(|node| node.read_text(&Locator::css("h2 span")))
            .collect::<Vec<_>>();
        assert_eq!(
            titles,
            vec![
                Some("Brand X Cookies 200g Pack".to_string()),
                Some("Oat Cookies 75 g".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_page_without_results_has_no_nodes() {
        let doc = Html::parse_document(&search_page(&[]));
        assert!(listing_nodes(&doc, &items()).is_empty());
    }

    #[test]
    fn test_read_text_collapses_whitespace() {
        let doc = Html::parse_document(&search_page(&[WHOLE_PRICE_CARD]));
        let node = first_node(&doc);
        assert_eq!(
            node.read_text(&Locator::css("span.a-price-whole")),
            Some("1,089.".to_string())
        );
    }

    #[test]
    fn test_read_attr() {
        let doc = Html::parse_document(&search_page(&[FULL_CARD]));
        let node = first_node(&doc);
        assert_eq!(
            node.read_attr(&Locator::css("a.a-link-normal.s-no-outline"), "href"),
            Some("/Brand-Cookies/dp/B0001".to_string())
        );
        assert_eq!(
            node.read_attr(&Locator::css("a.a-link-normal.s-no-outline"), "title"),
            None
        );
    }

    #[test]
    fn test_css_containing_is_case_insensitive() {
        let doc = Html::parse_document(&search_page(&[FULL_CARD]));
        let node = first_node(&doc);
        assert_eq!(
            node.read_text(&Locator::css_containing("span", "deal")),
            Some("Limited time DEAL".to_string())
        );
        assert_eq!(
            node.read_text(&Locator::css_containing("span", "SPONSORED")),
            Some("Sponsored".to_string())
        );
        assert_eq!(node.read_text(&Locator::css_containing("span", "prime")), None);
    }

    #[test]
    fn test_css_containing_matches_own_text_only() {
        let html = search_page(&[r#"
            <div data-component-type="s-search-result">
              <span class="outer"><span class="inner">Deal of the Day</span></span>
            </div>"#]);
        let doc = Html::parse_document(&html);
        let node = first_node(&doc);
        assert_eq!(
            node.read_text(&Locator::css_containing("span", "deal")),
            Some("Deal of the Day".to_string())
        );
        assert_eq!(
            node.read_attr(&Locator::css_containing("span", "deal"), "class"),
            Some("inner".to_string())
        );
    }

    #[test]
    fn test_empty_element_is_a_miss() {
        let html = search_page(&[r#"
            <div data-component-type="s-search-result"><h2><span>   </span></h2></div>"#]);
        let doc = Html::parse_document(&html);
        assert_eq!(first_node(&doc).read_text(&Locator::css("h2 span")), None);
    }

    #[test]
    fn test_line_locators_do_not_apply() {
        let doc = Html::parse_document(&search_page(&[FULL_CARD]));
        let node = first_node(&doc);
        assert_eq!(node.read_text(&Locator::FirstLine), None);
        assert_eq!(node.read_text(&Locator::line_containing("₹")), None);
    }
}
