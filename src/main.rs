use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use askama::Template;
use chrono::{Datelike, Local, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use reliability_client::auth::{self, IdentityProvider, PastedToken, StaticToken};
use reliability_client::config::Settings;
use reliability_client::flows::{Flow, LOGIN_FAILED};
use reliability_client::models::{
    AnalysisRequest, DEFAULT_ANNUAL_MILEAGE, FuelType, HistoryQuery, LeadContact, LeadSubmission, LeadType,
    MileageRange, RoiRequest, Transmission,
};
use reliability_client::page::PageState;
use reliability_client::quota::QuotaView;
use reliability_client::render::{
    HealthTemplate, HistoryTemplate, QuotaTemplate, ReportTemplate, RoiTemplate, StatusTemplate,
};
use reliability_client::report::ReportView;
use reliability_client::{FileTokenStore, HttpClient, ReliabilityApi, TokenStore, catalog, history};

/// Terminal dashboard for the car reliability analyzer.
#[derive(Parser)]
#[command(name = "reliability", version, about = "Car reliability analysis from the terminal")]
struct Cli {
    /// Backend base URL (overrides APP_API_BASE_URL / config.toml)
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Where the session token is kept between runs
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the access token
    Login {
        /// Access token from the identity provider; read from stdin when omitted
        #[arg(long)]
        token: Option<String>,
    },
    /// Forget the stored token
    Logout,
    /// Session state and today's quota
    Status,
    /// Score a vehicle's reliability
    Analyze(AnalyzeArgs),
    /// List past analyses
    History {
        #[arg(long, default_value_t = 100)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Download the history as CSV
    Export {
        /// Target directory (defaults to the configured export_dir)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Ask for an insurance, financing or dealer quote
    Lead(LeadArgs),
    /// Estimate future value and cost of ownership
    Roi(RoiArgs),
    /// Suggested makes, or models of one make
    Makes {
        #[arg(long)]
        make: Option<String>,
    },
    /// Check that the backend is up
    Health,
}

#[derive(Args)]
struct AnalyzeArgs {
    #[arg(long)]
    make: String,
    #[arg(long)]
    model: String,
    #[arg(long)]
    sub_model: Option<String>,
    /// Defaults to the current year
    #[arg(long)]
    year: Option<i32>,
    /// petrol, diesel, hybrid, electric, other (or the Hebrew label)
    #[arg(long, default_value_t = FuelType::default())]
    fuel: FuelType,
    /// automatic or manual (or the Hebrew label)
    #[arg(long, default_value_t = Transmission::default())]
    transmission: Transmission,
    /// 0-50k, 50-100k, 100-150k, 150-200k, 200k+ (or the Hebrew label)
    #[arg(long, default_value_t = MileageRange::default())]
    mileage: MileageRange,
    #[arg(long)]
    advanced: bool,
}

#[derive(Args)]
struct LeadArgs {
    /// insurance, financing or dealer
    #[arg(long = "type", default_value = "insurance")]
    lead_type: LeadType,
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    note: Option<String>,
}

#[derive(Args)]
struct RoiArgs {
    #[arg(long)]
    make: String,
    #[arg(long)]
    model: String,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    purchase_price: i64,
    #[arg(long)]
    current_mileage: i64,
    #[arg(long, default_value_t = DEFAULT_ANNUAL_MILEAGE)]
    annual_mileage: i64,
}

// Prints a settled page: rendered value on stdout, user-facing error on stderr
fn finish<T>(page: &PageState<T>, render: impl FnOnce(&T) -> askama::Result<String>) -> Result<ExitCode> {
    match page {
        PageState::Settled(Ok(value)) => {
            let text = render(value).context("Failed to render output")?;
            print!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        PageState::Settled(Err(message)) => {
            eprintln!("Error: {}", message);
            Ok(ExitCode::FAILURE)
        }
        PageState::Idle | PageState::Loading => Ok(ExitCode::FAILURE),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "reliability_client=info,reliability=info".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::new().context("Failed to load configuration")?;
    if let Some(url) = cli.api_base_url {
        settings.api_base_url = url;
    }
    if let Some(path) = cli.session_file {
        settings.session_file = path.to_string_lossy().into_owned();
    }
    tracing::debug!("Using backend {}", settings.api_base_url);

    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&settings.session_file));
    let http = HttpClient::new(&settings.api_base_url, store.clone())
        .context("Failed to build HTTP client")?
        .on_session_expired(Arc::new(|| {
            eprintln!("Your session has ended. Run `reliability login` to sign in again.");
        }));
    let api = ReliabilityApi::new(http);
    let current_year = Local::now().year();

    match cli.command {
        Commands::Login { token } => {
            let outcome = match token {
                Some(token) => auth::login(store.as_ref(), &mut StaticToken(token)),
                None => {
                    if let Some(client_id) = &settings.google_client_id {
                        eprintln!("Sign in with Google (client {}) and paste the access token below.", client_id);
                    } else {
                        eprintln!("Paste the access token from your identity provider:");
                    }
                    io::stderr().flush().ok();
                    let mut provider = PastedToken::new(io::stdin().lock());
                    auth::login(store.as_ref(), &mut provider as &mut dyn IdentityProvider)
                }
            };
            match outcome {
                Ok(()) => {
                    println!("Signed in.");
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    tracing::warn!("Login failed: {}", e);
                    eprintln!("Error: {}", LOGIN_FAILED);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Logout => {
            auth::logout(store.as_ref()).context("Failed to clear session")?;
            println!("Signed out.");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Status => {
            let mut page = PageState::Idle;
            page.run(Flow::Quota, api.quota()).await;
            let status = StatusTemplate {
                signed_in: auth::is_signed_in(store.as_ref()),
                api_base_url: &settings.api_base_url,
            };
            print!("{}", status.render().context("Failed to render status")?);
            // A quota failure is shown inline; the dashboard itself still loads
            if let Some(quota) = page.value() {
                let view = QuotaView::from(quota);
                print!("{}", QuotaTemplate { view: &view }.render().context("Failed to render quota")?);
            } else if let Some(message) = page.error() {
                println!("Quota: {}", message);
            }
            Ok(if page.succeeded() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Analyze(args) => {
            let request = AnalysisRequest {
                make: args.make,
                model: args.model,
                sub_model: args.sub_model,
                year: args.year.unwrap_or(current_year),
                fuel_type: args.fuel,
                transmission: args.transmission,
                mileage_range: args.mileage,
                advanced_mode: args.advanced,
            }
            .normalized();

            eprintln!("Analyzing... please wait.");
            let mut page = PageState::Idle;
            page.run(Flow::Analyze, api.analyze(&request, current_year)).await;
            finish(&page, |result| {
                let view = ReportView::from_result(result);
                ReportTemplate { request: &request, view: &view }.render()
            })
        }
        Commands::History { limit, offset } => {
            let mut page = PageState::Idle;
            page.run(Flow::History, api.history(HistoryQuery { limit, offset })).await;
            finish(&page, |result| {
                let rows = history::rows(result);
                HistoryTemplate { rows: &rows, total: result.total }.render()
            })
        }
        Commands::Export { dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from(&settings.export_dir));
            let today = Utc::now().date_naive();
            let mut page = PageState::Idle;
            page.run(Flow::Export, history::export_to_dir(&api, &dir, today)).await;
            finish(&page, |path| Ok(format!("Saved {}\n", path.display())))
        }
        Commands::Lead(args) => {
            let lead = LeadSubmission {
                lead_type: args.lead_type,
                payload: LeadContact {
                    name: args.name,
                    phone: args.phone,
                    email: args.email,
                    note: args.note.filter(|n| !n.trim().is_empty()),
                },
            };
            let mut page = PageState::Idle;
            page.run(Flow::Leads, api.submit_lead(&lead)).await;
            finish(&page, |ack| {
                Ok(format!("{}\n", ack.message.as_deref().unwrap_or("Thank you! We'll contact you soon.")))
            })
        }
        Commands::Roi(args) => {
            let request = RoiRequest {
                make: args.make.trim().to_string(),
                model: args.model.trim().to_string(),
                year: args.year.unwrap_or(current_year),
                purchase_price: args.purchase_price,
                current_mileage: args.current_mileage,
                expected_annual_mileage: args.annual_mileage,
            };
            let mut page = PageState::Idle;
            page.run(Flow::Roi, api.roi(&request, current_year)).await;
            finish(&page, |result| RoiTemplate::new(result).render())
        }
        Commands::Makes { make } => {
            match make {
                Some(make) => {
                    let models = catalog::models_for(&make);
                    if models.is_empty() {
                        println!("No suggestions for '{}'; any model name is accepted.", make);
                    }
                    for model in models {
                        println!("{}", model);
                    }
                }
                None => {
                    for make in catalog::makes() {
                        println!("{}", make);
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Health => {
            let mut page = PageState::Idle;
            page.run(Flow::Health, api.health()).await;
            finish(&page, |health| HealthTemplate { health }.render())
        }
    }
}
