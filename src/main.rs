//! Terminal front-end: loads one resource list and prints the requested page.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use dotenvy::dotenv;

use donor_console::domain::alert::Alert;
use donor_console::domain::auth::{CredentialProvider, StaticCredentials};
use donor_console::domain::blood_request::BloodRequest;
use donor_console::domain::resource::ResourceItem;
use donor_console::domain::user::User;
use donor_console::dto::list::ListPageData;
use donor_console::models::config::ConsoleConfig;
use donor_console::repository::http::ReqwestTransport;
use donor_console::repository::{HttpRepository, Transport};
use donor_console::services::alerts::{alert_list, live_alerts};
use donor_console::services::blood_requests::{RequestSummary, blood_request_list};
use donor_console::services::list::{LoadOutcome, ResourceListController};
use donor_console::services::users::{UserSummary, user_list};
use donor_console::sort::SortOrder;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Resource {
    Users,
    Requests,
    Alerts,
}

#[derive(Parser, Debug)]
#[command(name = "donor-console", about = "Browse donor platform records")]
struct Cli {
    #[arg(value_enum)]
    resource: Resource,

    /// Facet constraint as `facet=value`; repeatable.
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,

    #[arg(long, default_value_t = 1)]
    page: usize,

    #[arg(long)]
    per_page: Option<usize>,

    /// `id`, `createdAt` or `updatedAt`, optionally suffixed `:asc` or `:desc`.
    #[arg(long)]
    sort: Option<SortOrder>,

    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(facet, value)| (facet.trim().to_string(), value.trim().to_string()))
        .filter(|(facet, _)| !facet.is_empty())
        .ok_or_else(|| format!("expected facet=value, got `{raw}`"))
}

/// Tabular rendering of one record type.
trait TableRow: Sized {
    const HEADER: &'static [&'static str];

    fn cells(&self) -> Vec<String>;

    fn summary(items: &[Self], now: DateTime<Utc>) -> String;
}

fn date(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.format("%Y-%m-%d %H:%M").to_string())
}

impl TableRow for User {
    const HEADER: &'static [&'static str] = &["ID", "NAME", "EMAIL", "ROLE", "BLOOD", "STATUS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.role.to_string(),
            self.blood_type.map_or_else(|| "-".to_string(), |b| b.to_string()),
            self.status.to_string(),
        ]
    }

    fn summary(items: &[Self], _now: DateTime<Utc>) -> String {
        let s = UserSummary::from_users(items);
        format!(
            "{} users, {} active ({} admins, {} donors, {} hospitals)",
            s.total, s.active, s.admins, s.donors, s.hospitals
        )
    }
}

impl TableRow for BloodRequest {
    const HEADER: &'static [&'static str] = &[
        "ID", "PATIENT", "HOSPITAL", "BLOOD", "UNITS", "URGENCY", "STATUS", "REQUIRED BY",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.patient_name.clone(),
            self.hospital.clone(),
            self.blood_type.to_string(),
            self.units.to_string(),
            self.urgency.to_string(),
            self.status.to_string(),
            date(self.required_by),
        ]
    }

    fn summary(items: &[Self], now: DateTime<Utc>) -> String {
        let s = RequestSummary::from_requests(items, now);
        format!(
            "{} requests, {} open ({} units), {} urgent, {} expired",
            s.total, s.open, s.open_units, s.urgent, s.expired
        )
    }
}

impl TableRow for Alert {
    const HEADER: &'static [&'static str] =
        &["ID", "TITLE", "SEVERITY", "AUDIENCE", "ACTIVE", "EXPIRES"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.severity.to_string(),
            self.audience.clone().unwrap_or_else(|| "-".to_string()),
            (if self.active { "yes" } else { "no" }).to_string(),
            date(self.expires_at),
        ]
    }

    fn summary(items: &[Self], now: DateTime<Utc>) -> String {
        format!("{} alerts, {} live", items.len(), live_alerts(items, now).len())
    }
}

fn print_table<I: TableRow>(items: &[I]) {
    let rows: Vec<Vec<String>> = items.iter().map(I::cells).collect();
    let mut widths: Vec<usize> = I::HEADER.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<1$}", cell, *width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(I::HEADER.to_vec()));
    for row in &rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}

fn page_links(pages: &[Option<usize>], current: usize) -> String {
    pages
        .iter()
        .map(|page| match page {
            Some(n) if *n == current => format!("[{n}]"),
            Some(n) => n.to_string(),
            None => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render<I: TableRow>(view: &ListPageData<I>, summary: String) -> ExitCode {
    if let Some(error) = &view.error {
        eprintln!("{}", error.message);
        return ExitCode::FAILURE;
    }

    print_table(view.items());
    println!();
    match view.showing {
        Some(range) => println!("showing {}-{} of {}", range.from, range.to, range.total),
        None => println!("no matching records"),
    }
    if view.total_pages() > 1 {
        println!("pages: {}", page_links(&view.page.pages, view.page.page));
    }
    println!("{summary}");
    ExitCode::SUCCESS
}

async fn show<I, T, C>(list: ResourceListController<I, T, C>, cli: &Cli) -> ExitCode
where
    I: ResourceItem + TableRow,
    T: Transport,
    C: CredentialProvider,
{
    for (facet, value) in &cli.filters {
        if let Err(err) = list.set_filter(facet, value) {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    }
    if let Some(order) = cli.sort {
        list.set_sort(order);
    }

    if let LoadOutcome::Loaded(count) = list.load().await {
        log::debug!("{count} {} loaded", I::RESOURCE);
    }

    if cli.page != 1 && !list.set_page(cli.page) {
        log::warn!("Page {} does not exist, showing page 1", cli.page);
    }

    let summary = I::summary(&list.snapshot(), Utc::now());
    render(&list.visible_items(), summary)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));

    let cli = Cli::parse();

    let mut config = match ConsoleConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Error loading console config: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(per_page) = cli.per_page {
        config.items_per_page = per_page;
    }

    let transport = match ReqwestTransport::new(config.request_timeout()) {
        Ok(transport) => transport,
        Err(err) => {
            log::error!("{err}: {}", err.detail().unwrap_or("-"));
            return ExitCode::FAILURE;
        }
    };
    let repo = Arc::new(
        HttpRepository::new(transport, config.api_base_url.as_str())
            .with_fallback(config.fallback_policy()),
    );
    let credentials = Arc::new(StaticCredentials::new(config.credentials()));

    let result = match cli.resource {
        Resource::Users => match user_list(&config, repo, credentials) {
            Ok(list) => Ok(show(list, &cli).await),
            Err(err) => Err(err),
        },
        Resource::Requests => match blood_request_list(&config, repo, credentials) {
            Ok(list) => Ok(show(list, &cli).await),
            Err(err) => Err(err),
        },
        Resource::Alerts => match alert_list(&config, repo, credentials) {
            Ok(list) => Ok(show(list, &cli).await),
            Err(err) => Err(err),
        },
    };

    result.unwrap_or_else(|err| {
        log::error!("{err}");
        ExitCode::FAILURE
    })
}
