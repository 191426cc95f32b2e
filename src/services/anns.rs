use crate::config::AnnsSettings;
use crate::models::{FilterQuery, Price, ShoeRecord};
use crate::services::scrape::{fan_out, ScrapeError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Tag group ids understood by the listing API
const COLOR_TAG_GROUP: &str = "G87";
const HEEL_TAG_GROUP: &str = "G88";

const LISTING_OPERATION: &str = "cms_shopCategory";
const LISTING_QUERY: &str = "query cms_shopCategory($shopId: Int!, $categoryId: Int!, $startIndex: Int!, $fetchCount: Int!, $orderBy: String, $isShowCurator: Boolean, $locationId: Int, $tagFilters: [ItemTagFilter], $tagShowMore: Boolean, $minPrice: Float, $maxPrice: Float, $payType: [String], $shippingType: [String], $includeSalePageGroup: Boolean) {\n  shopCategory(shopId: $shopId, categoryId: $categoryId) {\n    salePageList(startIndex: $startIndex, maxCount: $fetchCount, orderBy: $orderBy, isCuratorable: $isShowCurator, locationId: $locationId, tagFilters: $tagFilters, tagShowMore: $tagShowMore, minPrice: $minPrice, maxPrice: $maxPrice, payType: $payType, shippingType: $shippingType, includeSalePageGroup: $includeSalePageGroup) {\n      salePageList {\n        salePageId\n        title\n        picUrl\n        price\n        __typename\n      }\n      totalSize\n      shopCategoryId\n      shopCategoryName\n      __typename\n    }\n  }\n}";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListingRequest {
    shop_id: u32,
    lang: &'static str,
    operation_name: &'static str,
    query: &'static str,
    variables: ListingVariables,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListingVariables {
    shop_id: u32,
    category_id: i64,
    start_index: u32,
    fetch_count: u32,
    order_by: String,
    is_show_curator: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tag_filters: Vec<TagFilter>,
    tag_show_more: bool,
    min_price: Option<f64>,
    max_price: Option<f64>,
    pay_type: Vec<String>,
    shipping_type: Vec<String>,
    include_sale_page_group: bool,
    location_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct TagFilter {
    group_id: &'static str,
    key_id: String,
}

#[derive(Debug, Deserialize)]
struct ListingResponse {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingData {
    shop_category: ShopCategory,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShopCategory {
    sale_page_list: SalePageList,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SalePageList {
    #[serde(default)]
    sale_page_list: Vec<SalePage>,
    #[serde(default)]
    total_size: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SalePage {
    sale_page_id: i64,
    title: String,
    #[serde(default)]
    pic_url: String,
    price: serde_json::Number,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DetailEnvelope {
    #[serde(default)]
    return_code: String,
    data: Option<SalePageDetail>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SalePageDetail {
    #[serde(default)]
    title: String,
    #[serde(rename = "SaleProductSKUIdList", default)]
    sku_ids: Vec<i64>,
    #[serde(default)]
    major_list: Vec<Major>,
    #[serde(default)]
    sale_page_group: Option<SalePageGroup>,
}

#[derive(Debug, Deserialize)]
struct Major {
    #[serde(rename = "SKUList", default)]
    sku_list: Vec<SkuGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SkuGroup {
    #[serde(default)]
    display_property_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SalePageGroup {
    #[serde(default)]
    sale_page_items: Vec<SalePageItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SalePageItem {
    #[serde(default)]
    group_item_title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StockRequest {
    ids: String,
    is_show_sale_product_outer_id: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StockEntry {
    #[serde(default)]
    selling_qty: i64,
}

/// Sizes and colors read from a sale page detail
#[derive(Debug, Clone, PartialEq, Eq)]
struct DetailSpec {
    sizes: Vec<String>,
    colors: Vec<String>,
    sku_ids: Vec<i64>,
}

/// Ann's catalog scraper
///
/// Lists a category through the 91App GraphQL API, then visits every sale
/// page for its sizes, colors and stock.
#[derive(Clone)]
pub struct AnnsClient {
    client: Client,
    settings: Arc<AnnsSettings>,
    max_concurrency: usize,
}

impl AnnsClient {
    pub fn new(client: Client, settings: AnnsSettings, max_concurrency: usize) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
            max_concurrency,
        }
    }

    /// Shoes in the requested category that are in stock in `search_size`
    pub async fn search(&self, query: &FilterQuery) -> Result<Vec<ShoeRecord>, ScrapeError> {
        tracing::info!(
            "Ann's filter - orderby: {}, size: {}, color: {}, heel: {}, category: {}",
            query.orderby,
            query.search_size,
            query.search_color,
            query.search_heel,
            query.search_cat
        );

        let request = self.listing_request(query)?;
        let page_size = self.settings.page_size.max(1);

        let (mut shoes, total_size) = self.fetch_listing(request.clone(), 0).await?;
        tracing::info!("Ann's first page: {} of {} items", shoes.len(), total_size);

        let starts: Vec<u32> = (page_size..total_size).step_by(page_size as usize).collect();
        if !starts.is_empty() {
            let this = self.clone();
            let pages = fan_out(starts, self.max_concurrency, move |start| {
                let this = this.clone();
                let request = request.clone();
                async move { (start, this.fetch_listing(request, start).await) }
            })
            .await;

            for (_, (start, page)) in pages {
                match page {
                    Ok((more, _)) => shoes.extend(more),
                    Err(e) => tracing::warn!("Ann's listing page at {} failed: {}", start, e),
                }
            }
        }
        tracing::info!("Ann's listed {} items", shoes.len());

        self.fill_sizes_and_colors(&mut shoes).await;

        let filtered: Vec<ShoeRecord> = shoes
            .into_iter()
            .filter(|shoe| shoe.has_size(&query.search_size))
            .collect();
        tracing::info!("Ann's size filter kept {} items", filtered.len());

        Ok(filtered)
    }

    fn listing_request(&self, query: &FilterQuery) -> Result<ListingRequest, ScrapeError> {
        let category_id: i64 = query
            .search_cat
            .trim()
            .parse()
            .map_err(|_| ScrapeError::InvalidCategory(query.search_cat.clone()))?;

        Ok(ListingRequest {
            shop_id: self.settings.shop_id,
            lang: "zh-TW",
            operation_name: LISTING_OPERATION,
            query: LISTING_QUERY,
            variables: ListingVariables {
                shop_id: self.settings.shop_id,
                category_id,
                start_index: 0,
                fetch_count: self.settings.page_size,
                order_by: query.orderby.clone(),
                is_show_curator: true,
                tag_filters: tag_filters(query),
                tag_show_more: true,
                min_price: None,
                max_price: None,
                pay_type: vec![],
                shipping_type: vec![],
                include_sale_page_group: true,
                location_id: None,
            },
        })
    }

    async fn fetch_listing(
        &self,
        mut request: ListingRequest,
        start_index: u32,
    ) -> Result<(Vec<ShoeRecord>, u32), ScrapeError> {
        request.variables.start_index = start_index;
        tracing::debug!("Ann's listing request from {}", start_index);

        let response = self
            .client
            .post(&self.settings.graphql_url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScrapeError::ApiError(format!(
                "Listing request failed: {}",
                response.status()
            )));
        }

        let body = response.bytes().await?;
        parse_listing(&body, &self.settings.salepage_url)
    }

    async fn fill_sizes_and_colors(&self, shoes: &mut [ShoeRecord]) {
        let ids: Vec<String> = shoes
            .iter()
            .map(|s| s.list_id.clone().unwrap_or_default())
            .collect();
        tracing::info!("Ann's visiting {} sale pages", ids.len());

        let this = self.clone();
        let results = fan_out(ids, self.max_concurrency, move |id| {
            let this = this.clone();
            async move { this.fetch_sizes_and_colors(&id).await }
        })
        .await;

        for (index, result) in results {
            let shoe = &mut shoes[index];
            match result {
                Ok((sizes, colors)) => {
                    shoe.size = Some(sizes);
                    shoe.color = Some(colors);
                }
                Err(e) => tracing::warn!(
                    "Ann's sale page {} ({}, {}) skipped: {}",
                    shoe.list_id.as_deref().unwrap_or(""),
                    shoe.name,
                    shoe.url,
                    e
                ),
            }
        }
    }

    async fn fetch_sizes_and_colors(&self, sale_page_id: &str) -> Result<(Vec<String>, Vec<String>), ScrapeError> {
        let url = format!("{}{}", self.settings.detail_url, sale_page_id);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ScrapeError::ApiError(format!(
                "Sale page {} returned {}",
                sale_page_id,
                response.status()
            )));
        }

        let body = response.bytes().await?;
        let spec = parse_detail(&body)?;
        let sizes = self.in_stock(&spec.sku_ids, spec.sizes).await;
        Ok((sizes, spec.colors))
    }

    /// Sizes whose SKU still has selling quantity; empty when stock is unknown
    async fn in_stock(&self, sku_ids: &[i64], sizes: Vec<String>) -> Vec<String> {
        let request = StockRequest {
            ids: sku_ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(","),
            is_show_sale_product_outer_id: false,
        };

        let response = match self.client.post(&self.settings.stock_url).json(&request).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Ann's stock request failed: {}", e);
                return vec![];
            }
        };

        match response.json::<Vec<StockEntry>>().await {
            Ok(stock) => filter_in_stock(sizes, &stock),
            Err(e) => {
                tracing::warn!("Ann's stock response unreadable: {}", e);
                vec![]
            }
        }
    }
}

fn tag_filters(query: &FilterQuery) -> Vec<TagFilter> {
    let mut filters = Vec::new();
    if !query.search_color.is_empty() {
        filters.push(TagFilter {
            group_id: COLOR_TAG_GROUP,
            key_id: query.search_color.clone(),
        });
    }
    if !query.search_heel.is_empty() {
        filters.push(TagFilter {
            group_id: HEEL_TAG_GROUP,
            key_id: query.search_heel.clone(),
        });
    }
    filters
}

fn parse_listing(body: &[u8], salepage_url: &str) -> Result<(Vec<ShoeRecord>, u32), ScrapeError> {
    let listing: ListingResponse = serde_json::from_slice(body)
        .map_err(|e| ScrapeError::InvalidResponse(format!("Ann's listing: {}", e)))?;
    let list = listing.data.shop_category.sale_page_list;

    let shoes = list
        .sale_page_list
        .into_iter()
        .map(|page| {
            let id = page.sale_page_id.to_string();
            ShoeRecord {
                url: format!("{}{}", salepage_url, id),
                list_id: Some(id),
                name: page.title,
                image: page.pic_url,
                price: Price::Text(page.price.to_string()),
                size: None,
                color: None,
            }
        })
        .collect();

    Ok((shoes, list.total_size))
}

/// Single-color items carry the color in the first SKU group and sizes in
/// the second; multi-color items carry sizes first.
fn parse_detail(body: &[u8]) -> Result<DetailSpec, ScrapeError> {
    let envelope: DetailEnvelope = serde_json::from_slice(body)
        .map_err(|e| ScrapeError::InvalidResponse(format!("Ann's sale page: {}", e)))?;

    let detail = envelope.data.ok_or_else(|| {
        ScrapeError::ApiError(format!(
            "{} {}",
            envelope.return_code,
            envelope.message.unwrap_or_default()
        ))
    })?;

    let groups = detail
        .major_list
        .first()
        .map(|m| m.sku_list.as_slice())
        .unwrap_or(&[]);
    let first = groups
        .first()
        .ok_or_else(|| ScrapeError::InvalidResponse(format!("{} has no SKU groups", detail.title)))?;

    let mut sizes = split_sizes(&first.display_property_name);
    if sizes.len() == 1 || !contains_digit(&sizes) {
        match groups.get(1) {
            Some(second) => sizes = split_sizes(&second.display_property_name),
            None => return Err(ScrapeError::NotFootwear(detail.title)),
        }
    }

    let colors = detail
        .sale_page_group
        .map(|g| g.sale_page_items.into_iter().map(|i| i.group_item_title).collect())
        .unwrap_or_default();

    Ok(DetailSpec {
        sizes,
        colors,
        sku_ids: detail.sku_ids,
    })
}

fn split_sizes(names: &str) -> Vec<String> {
    names.split('/').map(|s| s.trim().to_string()).collect()
}

fn contains_digit(sizes: &[String]) -> bool {
    sizes.iter().any(|s| s.chars().any(|c| c.is_ascii_digit()))
}

/// Stock entries line up with sizes by position
fn filter_in_stock(sizes: Vec<String>, stock: &[StockEntry]) -> Vec<String> {
    sizes
        .into_iter()
        .zip(stock)
        .filter(|(_, entry)| entry.selling_qty > 0)
        .map(|(size, _)| size)
        .collect()
}
