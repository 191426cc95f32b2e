// Unit tests for the Shoe Scout client pipeline

use shoe_scout::core::{
    build_query, check, compute_rows, render, validate, FilterForm, MemoryTable, NoticeLevel, RecordingNotifier,
    RenderContext, ResultTable, TabController, ValidationError, CATEGORY_FIELD, PLACEHOLDER, SIZE_FIELD,
};
use shoe_scout::models::{Price, Retailer, ShoeRecord};

fn create_test_record(name: &str, sizes: Option<&[&str]>, colors: Option<&[&str]>) -> ShoeRecord {
    ShoeRecord {
        list_id: None,
        name: name.to_string(),
        price: Price::from(10),
        image: "i.png".to_string(),
        url: "u".to_string(),
        size: sizes.map(|s| s.iter().map(|v| v.to_string()).collect()),
        color: colors.map(|c| c.iter().map(|v| v.to_string()).collect()),
    }
}

fn create_test_context(size: &str) -> RenderContext {
    RenderContext {
        category_label: "Sneakers".to_string(),
        size_label: size.to_string(),
        retailer: Retailer::Daf,
    }
}

fn complete_form() -> FilterForm {
    FilterForm::new()
        .field("orderby", "")
        .select(SIZE_FIELD, "23", "23")
        .field("searchColor", "")
        .field("searchHeel", "")
        .select(CATEGORY_FIELD, "148", "Ankle boots")
}

#[test]
fn test_missing_size_blocks() {
    for category in ["", "148"] {
        let notifier = RecordingNotifier::new();
        let form = FilterForm::new().select(SIZE_FIELD, "", "").select(CATEGORY_FIELD, category, category);
        assert!(!validate(&form, &notifier));
        assert_eq!(notifier.notices().len(), 1);
        assert_eq!(notifier.notices()[0].level, NoticeLevel::Warning);
    }
}

#[test]
fn test_missing_category_blocks() {
    let notifier = RecordingNotifier::new();
    let form = FilterForm::new().select(SIZE_FIELD, "23", "23");
    assert!(!validate(&form, &notifier));
    assert_eq!(notifier.notices()[0].title, "Please select a category");
}

#[test]
fn test_complete_form_passes() {
    assert_eq!(check(&complete_form()), Ok(()));
    assert_eq!(
        check(&FilterForm::new().select(CATEGORY_FIELD, "148", "Boots")),
        Err(ValidationError::MissingSize)
    );
}

#[test]
fn test_query_contains_store_pair() {
    let form = FilterForm::new().field("size", "M").field("category", "sneaker");
    let query = build_query(&form, Retailer::Daf);
    let pairs: Vec<&str> = query.split('&').collect();
    assert_eq!(pairs, vec!["size=M", "category=sneaker", "store=daf"]);
}

#[test]
fn test_query_is_deterministic() {
    let form = complete_form();
    assert_eq!(build_query(&form, Retailer::Anns), build_query(&form, Retailer::Anns));
    assert_eq!(
        build_query(&form, Retailer::Anns),
        "orderby=&searchSize=23&searchColor=&searchHeel=&searchCat=148&store=anns"
    );
}

#[test]
fn test_selected_size_emphasized() {
    let records = vec![create_test_record("A", Some(&["S", "M"]), Some(&["red"]))];
    let rows = compute_rows(&records, &create_test_context("M"));

    assert_eq!(rows.len(), 1);
    let sizes = rows[0].sizes.as_ref().unwrap();
    assert_eq!(sizes.len(), 2);
    assert!(!sizes[0].emphasized);
    assert!(sizes[1].emphasized);
    assert_eq!(rows[0].sizes_html(), "S, <mark>M</mark>");
    assert_eq!(rows[0].colors, "red");
    assert_eq!(rows[0].price, "10");
}

#[test]
fn test_absent_fields_use_placeholder() {
    let records = vec![
        create_test_record("A", None, None),
        create_test_record("B", Some(&[]), Some(&[])),
    ];
    for row in compute_rows(&records, &create_test_context("M")) {
        assert_eq!(row.colors, PLACEHOLDER);
        assert_eq!(row.sizes_html(), PLACEHOLDER);
        assert!(row.to_html().contains(&format!("<td>{}</td>", PLACEHOLDER)));
    }
}

#[test]
fn test_row_carries_retailer_and_category() {
    let rows = compute_rows(&[create_test_record("A", None, None)], &create_test_context("M"));
    assert_eq!(rows[0].retailer, "D+AF");
    assert_eq!(rows[0].category, "Sneakers");
}

#[test]
fn test_render_preserves_order() {
    let records = vec![create_test_record("B", None, None), create_test_record("A", None, None)];
    let mut table = MemoryTable::new();
    render(&records, &create_test_context("M"), &mut table);

    let names: Vec<&str> = table.rows().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);
    assert_eq!(table.retailer_name(), Some("D+AF"));
}

#[test]
fn test_render_replaces_previous_rows() {
    let mut table = MemoryTable::new();
    table.append(compute_rows(&[create_test_record("Old", None, None)], &create_test_context("M")).remove(0));

    render(&[create_test_record("New", None, None)], &create_test_context("M"), &mut table);
    assert_eq!(table.rows().len(), 1);
    assert_eq!(table.rows()[0].name, "New");
}

#[test]
fn test_html_escapes_record_text() {
    let mut record = create_test_record("<b>Boot</b>", None, None);
    record.url = "https://shop.test/?a=1&b=2".to_string();
    let html = compute_rows(&[record], &create_test_context("M"))[0].to_html();

    assert!(html.contains("&lt;b&gt;Boot&lt;/b&gt;"));
    assert!(html.contains("href=\"https://shop.test/?a=1&amp;b=2\" target=\"_blank\""));
}

#[test]
fn test_tab_click_switches_pane() {
    let mut tabs = TabController::new(["anns", "daf"]);
    assert_eq!(tabs.active_pane(), Some("anns"));

    assert!(tabs.click("#daf"));
    assert_eq!(tabs.active_pane(), Some("daf"));
    assert_eq!(tabs.nav().iter().filter(|n| n.active).count(), 1);
    assert_eq!(tabs.panes().iter().filter(|p| p.visible).count(), 1);

    assert!(!tabs.click("#missing"));
    assert_eq!(tabs.active_pane(), Some("daf"));
}
