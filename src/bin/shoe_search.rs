use clap::Parser;
use shoe_scout::config::Settings;
use shoe_scout::core::{
    ConsoleNotifier, FilterForm, MemoryTable, RetailerPanel, SearchClient, SearchOutcome, TabController,
    CATEGORY_FIELD, SIZE_FIELD,
};
use shoe_scout::models::Retailer;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shoe-search")]
#[command(about = "Search one retailer through the Shoe Scout /filter endpoint")]
#[command(after_help = "Environment:\n  SHOES__CLIENT__ENDPOINT   Search endpoint override\n  LOG_LEVEL                 Log verbosity")]
struct Cli {
    /// Retailer tab to search (anns, daf)
    #[arg(long, default_value = "anns")]
    store: Retailer,
    /// Search endpoint; defaults to client.endpoint from configuration
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long, default_value = "")]
    category: String,
    /// Category name shown in the results; defaults to the category value
    #[arg(long)]
    category_label: Option<String>,
    #[arg(long, default_value = "")]
    size: String,
    /// Size name highlighted in the results; defaults to the size value
    #[arg(long)]
    size_label: Option<String>,
    #[arg(long, default_value = "")]
    color: String,
    #[arg(long, default_value = "")]
    heel: String,
    #[arg(long, default_value = "")]
    orderby: String,
    /// Print the result table as HTML rows
    #[arg(long, default_value_t = false)]
    html: bool,
}

impl Cli {
    fn form(&self) -> FilterForm {
        FilterForm::new()
            .field("orderby", &self.orderby)
            .select(SIZE_FIELD, &self.size, self.size_label.as_deref().unwrap_or(&self.size))
            .field("searchColor", &self.color)
            .field("searchHeel", &self.heel)
            .select(CATEGORY_FIELD, &self.category, self.category_label.as_deref().unwrap_or(&self.category))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = match Settings::load() {
        Ok(settings) => settings.client,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(endpoint) = &cli.endpoint {
        settings.endpoint = endpoint.clone();
    }

    let client = match SearchClient::from_settings(&settings) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to build search client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut tabs = TabController::new(Retailer::ALL.iter().map(|r| r.id()));
    tabs.click(&format!("#{}", cli.store.id()));
    tracing::debug!("Active tab: {:?}", tabs.active_pane());

    let panel = RetailerPanel::new(cli.store, cli.form());
    let mut table = MemoryTable::new();
    let notifier = ConsoleNotifier;

    let Some(report) = panel.submit(&client, &mut table, &notifier).await else {
        return ExitCode::from(2);
    };

    match report.outcome {
        SearchOutcome::Failure(_) => ExitCode::FAILURE,
        SearchOutcome::Empty => ExitCode::SUCCESS,
        SearchOutcome::Results(_) => {
            if cli.html {
                println!("{}", table.to_html());
            } else {
                if let Some(name) = table.retailer_name() {
                    println!("{}", name);
                }
                println!("{}", table.to_text());
            }
            ExitCode::SUCCESS
        }
    }
}
