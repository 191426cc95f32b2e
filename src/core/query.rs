use crate::core::form::FilterForm;
use crate::models::Retailer;

/// Query key carrying the retailer identifier
pub const STORE_KEY: &str = "store";

/// Serialize every form field plus the retailer identifier
///
/// Pairs follow form order and `store` always comes last. Values are not
/// validated here.
pub fn build_query(form: &FilterForm, retailer: Retailer) -> String {
    form.fields()
        .iter()
        .filter(|f| f.name != STORE_KEY)
        .map(|f| (f.name.as_str(), f.value.as_str()))
        .chain(std::iter::once((STORE_KEY, retailer.id())))
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_appended_last() {
        let form = FilterForm::new().field("size", "M").field("category", "sneaker");
        assert_eq!(build_query(&form, Retailer::Daf), "size=M&category=sneaker&store=daf");
    }

    #[test]
    fn test_form_store_field_replaced() {
        let form = FilterForm::new().field("store", "daf").field("searchSize", "23");
        assert_eq!(build_query(&form, Retailer::Anns), "searchSize=23&store=anns");
    }

    #[test]
    fn test_values_percent_encoded() {
        let form = FilterForm::new().field("searchColor", "light pink&co");
        assert_eq!(
            build_query(&form, Retailer::Daf),
            "searchColor=light%20pink%26co&store=daf"
        );
    }
}
