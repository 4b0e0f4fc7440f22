use std::path::PathBuf;

use anyhow::Context;
use shopfeed_core::{AppConfig, CanonicalProduct};
use shopfeed_import::{ImportClient, ImportOptions, ImportSummary, MatchBy};
use shopfeed_scraper::{ScrapeRequest, Scraper, ScraperConfig};

const PREVIEW_ROWS: usize = 10;
const PREVIEW_NAME_WIDTH: usize = 40;
const SHOWN_IMPORT_ERRORS: usize = 5;

#[derive(Debug, clap::Args)]
pub(crate) struct ScrapeArgs {
    /// Listing or search URL to scrape
    #[arg(long)]
    pub url: String,
    /// Template key or alias; resolved from the URL when omitted
    #[arg(long)]
    pub template: Option<String>,
    /// Search keyword for API-backed sources
    #[arg(long)]
    pub keyword: Option<String>,
    /// Maximum number of listing pages to fetch
    #[arg(long, default_value_t = 5)]
    pub max_pages: usize,
    /// Fetch through a headless browser even for static templates
    #[arg(long)]
    pub render: bool,
    /// Scrape and preview without importing
    #[arg(long)]
    pub dry_run: bool,
    /// Write the scraped records as JSON to this path
    #[arg(long)]
    pub output_json: Option<PathBuf>,
    /// Catalog service base URL (defaults to `API_BASE_URL`)
    #[arg(long)]
    pub api_url: Option<String>,
    /// Update products that already exist instead of skipping them
    #[arg(long)]
    pub update_existing: bool,
    /// Field used to detect existing products
    #[arg(long, value_enum, default_value_t = MatchField::Name)]
    pub match_by: MatchField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum MatchField {
    Name,
    Sku,
}

impl From<MatchField> for MatchBy {
    fn from(field: MatchField) -> Self {
        match field {
            MatchField::Name => MatchBy::Name,
            MatchField::Sku => MatchBy::Sku,
        }
    }
}

impl ScrapeArgs {
    fn to_request(&self) -> ScrapeRequest {
        ScrapeRequest {
            template: self.template.clone(),
            url: Some(self.url.clone()),
            keyword: self.keyword.clone(),
            max_pages: Some(self.max_pages),
            force_render: self.render,
        }
    }

    fn import_options(&self) -> ImportOptions {
        ImportOptions {
            skip_duplicates: !self.update_existing,
            match_by: self.match_by.into(),
        }
    }
}

pub(crate) async fn run_scrape(config: &AppConfig, args: &ScrapeArgs) -> anyhow::Result<()> {
    let scraper = Scraper::new(ScraperConfig::from_app_config(config));
    let outcome = match scraper.scrape(&args.to_request()).await {
        Ok(outcome) => outcome,
        Err(e) if e.is_configuration() => anyhow::bail!("invalid scrape request: {e}"),
        Err(e) => return Err(e).with_context(|| format!("scrape of {} failed", args.url)),
    };

    if outcome.products.is_empty() {
        tracing::warn!(
            url = %args.url,
            template = outcome.template,
            "no products found; check the URL or pick a template with --template"
        );
        return Ok(());
    }

    let strategy = outcome
        .strategy
        .map_or_else(|| "none".to_owned(), |s| s.to_string());
    tracing::info!(
        template = outcome.template,
        strategy = %strategy,
        pages = outcome.pages_fetched,
        products = outcome.products.len(),
        "scrape finished"
    );

    println!("{}", preview_table(&outcome.products));

    if let Some(path) = &args.output_json {
        let json = serde_json::to_string_pretty(&outcome.products)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "raw records written");
    }

    if args.dry_run {
        tracing::info!(products = outcome.products.len(), "dry run, nothing imported");
        return Ok(());
    }

    let base_url = args.api_url.as_deref().unwrap_or(&config.api_base_url);
    let client = ImportClient::new(base_url, config.import_timeout_secs)?
        .with_batch_size(config.import_batch_size);
    let summary = client
        .import(&outcome.products, &args.import_options())
        .await;

    println!("{}", summary_report(&summary));
    Ok(())
}

fn preview_table(products: &[CanonicalProduct]) -> String {
    let mut lines = vec![format!(
        "{:<4} {:<16} {:<width$} {:>12} {:>10} {}",
        "#",
        "SKU",
        "Name",
        "Price",
        "Discount",
        "Group",
        width = PREVIEW_NAME_WIDTH
    )];

    for (index, product) in products.iter().take(PREVIEW_ROWS).enumerate() {
        let discount = product
            .discount_amount
            .map_or_else(|| "-".to_owned(), |d| d.to_string());
        lines.push(format!(
            "{:<4} {:<16} {:<width$} {:>12} {:>10} {}",
            index + 1,
            truncate(product.external_id.as_deref().unwrap_or("-"), 16),
            truncate(&product.name, PREVIEW_NAME_WIDTH),
            product.unit_price.to_string(),
            discount,
            product.group_name.as_deref().unwrap_or("-"),
            width = PREVIEW_NAME_WIDTH
        ));
    }

    if products.len() > PREVIEW_ROWS {
        lines.push(format!("... and {} more", products.len() - PREVIEW_ROWS));
    }
    lines.join("\n")
}

fn summary_report(summary: &ImportSummary) -> String {
    let mut lines = vec![
        format!("imported: {}", summary.imported),
        format!("skipped:  {}", summary.skipped),
        format!("updated:  {}", summary.updated),
        format!("errors:   {}", summary.errors.len()),
    ];
    for error in summary.errors.iter().take(SHOWN_IMPORT_ERRORS) {
        lines.push(format!("  {error}"));
    }
    lines.join("\n")
}

/// Cuts `text` to at most `max` characters, marking the cut with `…`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use serde_json::json;
    use shopfeed_core::ProductDraft;

    fn product(i: usize, name: &str) -> CanonicalProduct {
        let scraped_at = Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap();
        CanonicalProduct::from_draft(
            ProductDraft {
                external_id: Some(format!("SKU-{i}")),
                name: name.to_owned(),
                unit_price: Decimal::new(29_900, 2),
                ..ProductDraft::default()
            },
            scraped_at,
        )
        .unwrap()
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("น้ำดื่ม", 10), "น้ำดื่ม");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
    }

    #[test]
    fn preview_limits_rows_and_counts_the_rest() {
        let products: Vec<_> = (1..=13).map(|i| product(i, "Item")).collect();
        let table = preview_table(&products);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 1 + PREVIEW_ROWS + 1);
        assert!(lines[1].contains("SKU-1"));
        assert!(lines[1].contains("299.00"));
        assert_eq!(lines.last().copied(), Some("... and 3 more"));
    }

    #[test]
    fn preview_of_short_list_has_no_overflow_line() {
        let table = preview_table(&[product(1, "Only")]);
        assert_eq!(table.lines().count(), 2);
        assert!(!table.contains("more"));
    }

    #[test]
    fn summary_shows_first_errors_only() {
        let summary = ImportSummary {
            imported: 4,
            skipped: 1,
            updated: 0,
            errors: (0..8).map(|i| json!({"batch": i, "error": "HTTP 500"})).collect(),
        };
        let report = summary_report(&summary);

        assert!(report.contains("imported: 4"));
        assert!(report.contains("errors:   8"));
        assert_eq!(report.lines().filter(|l| l.starts_with("  ")).count(), 5);
    }

    #[test]
    fn update_existing_disables_duplicate_skipping() {
        let args = ScrapeArgs {
            url: "https://shopee.co.th/search?keyword=tea".to_owned(),
            template: None,
            keyword: None,
            max_pages: 2,
            render: true,
            dry_run: false,
            output_json: None,
            api_url: None,
            update_existing: true,
            match_by: MatchField::Sku,
        };

        let options = args.import_options();
        assert!(!options.skip_duplicates);
        assert_eq!(options.match_by, MatchBy::Sku);

        let request = args.to_request();
        assert_eq!(request.max_pages, Some(2));
        assert!(request.force_render);
        assert_eq!(request.url.as_deref(), Some(args.url.as_str()));
    }
}
