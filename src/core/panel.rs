use crate::core::form::FilterForm;
use crate::core::notify::Notifier;
use crate::core::query::build_query;
use crate::core::render::{RenderContext, ResultTable};
use crate::core::search::{SearchClient, SearchReport};
use crate::core::validator::validate;
use crate::models::Retailer;

/// A retailer's filter form bound to its retailer identifier
#[derive(Debug, Clone)]
pub struct RetailerPanel {
    pub retailer: Retailer,
    pub form: FilterForm,
}

impl RetailerPanel {
    pub fn new(retailer: Retailer, form: FilterForm) -> Self {
        Self { retailer, form }
    }

    /// Selections captured for rendering this submission
    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            category_label: self.form.category_label().to_string(),
            size_label: self.form.size_label().to_string(),
            retailer: self.retailer,
        }
    }

    pub fn query(&self) -> String {
        build_query(&self.form, self.retailer)
    }

    /// Validate, then search; `None` when validation blocked the submission
    pub async fn submit<T: ResultTable + ?Sized>(
        &self,
        client: &SearchClient,
        table: &mut T,
        notifier: &dyn Notifier,
    ) -> Option<SearchReport> {
        if !validate(&self.form, notifier) {
            return None;
        }

        let query = self.query();
        tracing::info!("Submitting {} search: {}", self.retailer, query);
        Some(client.search(&query, &self.render_context(), table, notifier).await)
    }
}
