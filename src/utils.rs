use chrono::NaiveDate;
use url::Url;

/// Search-results URL for a term and 1-based page number
pub fn search_url(base_url: &Url, term: &str, page: u32) -> Url {
    let mut url = base_url.clone();
    url.set_path("/s");
    url.query_pairs_mut()
        .clear()
        .append_pair("k", term)
        .append_pair("page", &page.to_string());
    url
}

/// File stem shared by every export of one harvest day
pub fn export_stem(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}", prefix, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let base = Url::parse("https://www.amazon.in/").unwrap();
        let url = search_url(&base, "right shift", 2);
        assert_eq!(url.as_str(), "https://www.amazon.in/s?k=right+shift&page=2");
    }

    #[test]
    fn test_export_stem() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 8).unwrap();
        assert_eq!(export_stem("amazon_scrape", date), "amazon_scrape_2026-10-08");
    }
}
