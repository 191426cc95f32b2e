/// Field name of the category selector
pub const CATEGORY_FIELD: &str = "searchCat";
/// Field name of the size selector
pub const SIZE_FIELD: &str = "searchSize";

/// One named form control with its submitted value and the text shown for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
    pub label: String,
}

/// Current state of a retailer's filter form
///
/// Fields keep insertion order; setting an existing name replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    fields: Vec<FormField>,
}

impl FilterForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field whose label is its value (text inputs)
    pub fn field(self, name: &str, value: &str) -> Self {
        self.select(name, value, value)
    }

    /// Set a select field with a distinct display label
    pub fn select(mut self, name: &str, value: &str, label: &str) -> Self {
        self.set(name, value, label);
        self
    }

    pub fn set(&mut self, name: &str, value: &str, label: &str) {
        let field = FormField {
            name: name.to_string(),
            value: value.to_string(),
            label: label.to_string(),
        };
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn value(&self, name: &str) -> &str {
        self.get(name).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn label(&self, name: &str) -> &str {
        self.get(name).map(|f| f.label.as_str()).unwrap_or("")
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn category_label(&self) -> &str {
        self.label(CATEGORY_FIELD)
    }

    pub fn size_label(&self) -> &str {
        self.label(SIZE_FIELD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut form = FilterForm::new()
            .field("orderby", "Newest")
            .select(SIZE_FIELD, "23", "23");
        form.set("orderby", "PriceDesc", "Price (high to low)");

        assert_eq!(form.fields().len(), 2);
        assert_eq!(form.fields()[0].name, "orderby");
        assert_eq!(form.value("orderby"), "PriceDesc");
        assert_eq!(form.label("orderby"), "Price (high to low)");
    }

    #[test]
    fn test_missing_field_reads_empty() {
        let form = FilterForm::new();
        assert_eq!(form.value(CATEGORY_FIELD), "");
        assert_eq!(form.size_label(), "");
    }
}
