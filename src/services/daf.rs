use crate::config::DafSettings;
use crate::models::{FilterQuery, Price, ShoeRecord};
use crate::services::scrape::{fan_out, ScrapeError};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};

/// Category ids listed under the boots section
const BOOT_CATEGORIES: [&str; 5] = ["148", "199", "314", "256", "259"];
const BOOT_LIST_PATH: &str = "product/list/303";
const ALL_LIST_PATH: &str = "product/list/all";

static TOTAL_PAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<input[^>]+type=['"]hidden['"][^>]+name=['"]totalpage['"][^>]+value=['"](\d+)['"][^>]*>"#)
        .expect("totalpage pattern")
});
static ITEM_LIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"gtag\('event', 'view_item_list', \{[\s\S]+?\}\);").expect("view_item_list pattern")
});
static ITEMS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""items": \[([^\]]+)\]"#).expect("items pattern"));
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<source[^>]+srcset="([^"]+)"[^>]+id="pic(\d+_\d+)w""#).expect("image pattern")
});
static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a[^>]*alt="[^"]*"[^>]*href="([^"]+)""#).expect("anchor pattern"));
static PRODUCT_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/product/show/(\d+)/(\d+)/").expect("product href pattern"));
static SIZE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div[^>]+class=['"][^'"]*mini-box\s+sizeSel[^'"]*['"][^>]+btn=['"]ok['"][^>]*>.*?</div>"#)
        .expect("size block pattern")
});
static SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<span>([^<]+)</span>").expect("span pattern"));
static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div[^>]+class=['"][^'"]*mini-box\s+color\s+colorSel[^'"]*['"][^>]+title=['"]([^'"]+)['"][^>]*>"#)
        .expect("color pattern")
});

#[derive(Debug, Deserialize)]
struct ListItem {
    id: serde_json::Value,
    #[serde(default)]
    name: String,
    #[serde(default)]
    price: serde_json::Value,
}

/// D+AF catalog scraper
///
/// The shop filters server side with the same keys as `/filter`, so the
/// query is forwarded as-is and the listing and product pages are parsed.
#[derive(Clone)]
pub struct DafClient {
    client: Client,
    settings: Arc<DafSettings>,
    max_concurrency: usize,
}

impl DafClient {
    pub fn new(client: Client, settings: DafSettings, max_concurrency: usize) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
            max_concurrency,
        }
    }

    pub async fn search(&self, query: &FilterQuery) -> Result<Vec<ShoeRecord>, ScrapeError> {
        tracing::info!(
            "D+AF filter - orderby: {}, size: {}, color: {}, heel: {}, category: {}",
            query.orderby,
            query.search_size,
            query.search_color,
            query.search_heel,
            query.search_cat
        );

        let filter = query.filter_string();
        let is_boot = is_boot_category(&query.search_cat);

        let first = self.fetch_page(&list_url(&self.settings.root_url, is_boot, 1, &filter)).await?;
        let total_pages = parse_total_pages(&first)?;
        tracing::info!("D+AF total pages: {}", total_pages);

        let mut shoes = parse_listing(&first, &self.settings.root_url);
        for page in 2..=total_pages {
            let html = self.fetch_page(&list_url(&self.settings.root_url, is_boot, page, &filter)).await?;
            shoes.extend(parse_listing(&html, &self.settings.root_url));
        }
        tracing::info!("D+AF listed {} items", shoes.len());

        self.fill_sizes_and_colors(&mut shoes).await;
        Ok(shoes)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        tracing::debug!("D+AF GET {}", url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ScrapeError::ApiError(format!("{} returned {}", url, response.status())));
        }
        Ok(response.text().await?)
    }

    async fn fill_sizes_and_colors(&self, shoes: &mut [ShoeRecord]) {
        let urls: Vec<String> = shoes.iter().map(|s| s.url.clone()).collect();

        let this = self.clone();
        let pages = fan_out(urls, self.max_concurrency, move |url| {
            let this = this.clone();
            async move {
                if url.is_empty() {
                    return Err(ScrapeError::InvalidResponse("product has no URL".to_string()));
                }
                this.fetch_page(&url).await
            }
        })
        .await;

        for (index, page) in pages {
            let shoe = &mut shoes[index];
            match page {
                Ok(html) => {
                    let sizes = parse_sizes(&html);
                    if sizes.is_empty() {
                        tracing::info!("D+AF no sizes for {}, likely sold out", shoe.name);
                    }
                    shoe.size = Some(sizes);
                    shoe.color = Some(parse_colors(&html));
                }
                Err(e) => tracing::warn!("D+AF product page for {} skipped: {}", shoe.name, e),
            }
        }
    }
}

fn is_boot_category(category: &str) -> bool {
    BOOT_CATEGORIES.contains(&category)
}

fn list_url(root: &str, is_boot: bool, page: u32, filter: &str) -> String {
    let path = if is_boot { BOOT_LIST_PATH } else { ALL_LIST_PATH };
    format!("{}/{}/{}?{}", root.trim_end_matches('/'), path, page, filter)
}

fn join_url(root: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}/{}", root.trim_end_matches('/'), href.trim_start_matches('/'))
    }
}

fn parse_total_pages(html: &str) -> Result<u32, ScrapeError> {
    let caps = TOTAL_PAGE_RE
        .captures(html)
        .ok_or_else(|| ScrapeError::InvalidResponse("D+AF totalpage not found".to_string()))?;
    caps[1]
        .parse()
        .map_err(|_| ScrapeError::InvalidResponse(format!("D+AF totalpage {:?}", &caps[1])))
}

/// Items of one listing page with URL and image attached by item id
fn parse_listing(html: &str, root: &str) -> Vec<ShoeRecord> {
    let Some(block) = ITEM_LIST_RE.find(html) else {
        tracing::warn!("D+AF view_item_list not found");
        return vec![];
    };
    let Some(items) = ITEMS_RE.captures(block.as_str()) else {
        tracing::warn!("D+AF items not found");
        return vec![];
    };

    let items: Vec<ListItem> = match serde_json::from_str(&format!("[{}]", &items[1])) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("D+AF items unreadable: {}", e);
            return vec![];
        }
    };

    let mut shoes: Vec<ShoeRecord> = items
        .into_iter()
        .map(|item| ShoeRecord {
            list_id: Some(value_text(&item.id)),
            name: item.name,
            price: Price::Text(value_text(&item.price)),
            image: String::new(),
            url: String::new(),
            size: None,
            color: None,
        })
        .collect();

    for caps in ANCHOR_RE.captures_iter(html) {
        let href = &caps[1];
        let Some(ids) = PRODUCT_HREF_RE.captures(href) else {
            continue;
        };
        let list_id = format!("{}_{}", &ids[1], &ids[2]);
        for shoe in shoes.iter_mut().filter(|s| s.list_id.as_deref() == Some(list_id.as_str())) {
            shoe.url = join_url(root, href);
        }
    }

    for caps in IMAGE_RE.captures_iter(html) {
        for shoe in shoes.iter_mut().filter(|s| s.list_id.as_deref() == Some(&caps[2])) {
            shoe.image = caps[1].to_string();
        }
    }

    shoes
}

fn parse_sizes(html: &str) -> Vec<String> {
    SIZE_BLOCK_RE
        .find_iter(html)
        .filter_map(|block| SPAN_RE.captures(block.as_str()).map(|c| c[1].to_string()))
        .collect()
}

fn parse_colors(html: &str) -> Vec<String> {
    COLOR_RE.captures_iter(html).map(|c| c[1].to_string()).collect()
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<html><body>
<input type="hidden" name="totalpage" value="3">
<script>
gtag('event', 'view_item_list', {
  "item_list_name": "all",
  "items": [{"id": "1001_2", "name": "Pointed flats", "price": 1980}, {"id": "1002_1", "name": "Chelsea boots", "price": "2680"}]
});
</script>
<a class="pic" alt="Pointed flats" href="/product/show/1001/2/">flats</a>
<a class="pic" alt="Chelsea boots" href="/product/show/1002/1/">boots</a>
<picture><source media="(min-width: 1px)" srcset="https://img.test/1001_2.jpg" id="pic1001_2w"></picture>
</body></html>"#;

    const PRODUCT: &str = r#"<div class='mini-box color colorSel' title='Black'></div>
<div class='mini-box color colorSel' title='Caramel'></div>
<div class='mini-box sizeSel' btn='ok'><span>22.5</span></div>
<div class='mini-box sizeSel' btn='no'><span>23</span></div>
<div class='mini-box sizeSel' btn='ok'><span>24</span></div>"#;

    #[test]
    fn test_boot_categories_use_boot_path() {
        assert_eq!(
            list_url("https://www.daf-shoes.com/", true, 2, "searchCat=148"),
            "https://www.daf-shoes.com/product/list/303/2?searchCat=148"
        );
        assert_eq!(
            list_url("https://www.daf-shoes.com/", is_boot_category("12"), 1, "searchCat=12"),
            "https://www.daf-shoes.com/product/list/all/1?searchCat=12"
        );
        assert!(is_boot_category("259"));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(parse_total_pages(LISTING).unwrap(), 3);
        assert!(parse_total_pages("<html></html>").is_err());
    }

    #[test]
    fn test_parse_listing_joins_by_item_id() {
        let shoes = parse_listing(LISTING, "https://www.daf-shoes.com/");
        assert_eq!(shoes.len(), 2);

        assert_eq!(shoes[0].name, "Pointed flats");
        assert_eq!(shoes[0].price.to_string(), "1980");
        assert_eq!(shoes[0].url, "https://www.daf-shoes.com/product/show/1001/2/");
        assert_eq!(shoes[0].image, "https://img.test/1001_2.jpg");

        assert_eq!(shoes[1].price.to_string(), "2680");
        assert_eq!(shoes[1].image, "");
    }

    #[test]
    fn test_parse_sizes_only_available() {
        assert_eq!(parse_sizes(PRODUCT), vec!["22.5", "24"]);
        assert_eq!(parse_colors(PRODUCT), vec!["Black", "Caramel"]);
    }
}
