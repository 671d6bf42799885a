//! Listing markup shared by the parser, pipeline and crawler tests.

pub const SEARCH_URL: &str = "https://www.amazon.in/s?k=cookies&page=1";

/// Offscreen price layout with a struck-through MRP and every badge present
pub const FULL_CARD: &str = r#"
<div data-component-type="s-search-result" data-asin="B0001">
  <h2><a class="a-link-normal s-no-outline" href="/Brand-Cookies/dp/B0001"><span>Brand X Cookies 200g Pack</span></a></h2>
  <span class="a-price"><span class="a-offscreen">₹1,234.56</span></span>
  <span class="a-price a-text-price" data-a-strike="true"><span class="a-offscreen">₹1,500.00</span></span>
  <span class="a-icon-alt">4.2 out of 5 stars</span>
  <a aria-label="1,024 ratings" href="/Brand-Cookies/dp/B0001#reviews"><span>1,024</span></a>
  <span class="a-color-secondary">500+ bought in past month</span>
  <span class="a-badge-text">Limited time DEAL</span>
  <span class="puis-label">Sponsored</span>
</div>
"#;

/// Whole-number price layout, no MRP, no badges
pub const WHOLE_PRICE_CARD: &str = r#"
<div data-component-type="s-search-result" data-asin="B0002">
  <h2><a class="a-link-normal s-no-outline" href="https://www.amazon.in/dp/B0002"><span>Oat Cookies 75 g</span></a></h2>
  <span class="a-price">
    <span aria-hidden="true"><span class="a-price-symbol">₹</span><span class="a-price-whole">1,089<span class="a-price-decimal">.</span></span></span>
  </span>
</div>
"#;

/// A card with neither a title nor any price element
pub const BARE_CARD: &str = r#"
<div data-component-type="s-search-result" data-asin="B0003">
  <div class="s-image"><img src="/img.jpg"></div>
</div>
"#;

/// Wraps cards into a search-results page
pub fn search_page(cards: &[&str]) -> String {
    format!(
        "<html><head><title>Results</title></head><body><div class=\"s-main-slot\">{}</div></body></html>",
        cards.concat()
    )
}

/// Text of one price-bearing view on the app's results screen
pub const APP_BLOB: &str = "Aashirvaad Atta 5kg\n4.3 out of 5 stars\n₹289\nM.R.P: ₹350\nSponsored";
