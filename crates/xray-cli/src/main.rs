use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use xray_client::{DuckDuckGoProvider, ProviderConfig, ReplayProvider};
use xray_core::{
    CandidateProfile, MODE_REGISTRY, ResultSet, SearchMode, SearchProvider, SearchService,
    build_query,
};

#[derive(Parser)]
#[command(name = "xray", version, about = "X-Ray search for candidate profiles and résumés")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available search modes
    Modes,

    /// Print the dork query for a profile without searching
    Query {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Build the query, run it, and print the accepted candidates
    Search {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Maximum number of candidates to return
        #[arg(short, long, default_value_t = 15)]
        limit: usize,

        /// Keep results that do not mention the location
        #[arg(long, default_value_t = false)]
        no_location_filter: bool,

        /// Classify hits from a saved JSON file instead of searching the web
        #[arg(long)]
        replay: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Request timeout in seconds (overrides XRAY_TIMEOUT_SECS)
        #[arg(long)]
        timeout: Option<u64>,

        /// DuckDuckGo region code, e.g. br-pt (overrides XRAY_REGION)
        #[arg(long)]
        region: Option<String>,
    },
}

#[derive(Args)]
struct ProfileArgs {
    /// Search mode id (see `xray modes`); unknown ids fall back to linkedin
    #[arg(short, long, default_value = "linkedin")]
    mode: String,

    /// Job title or role, e.g. "Full Stack Developer"
    #[arg(short, long)]
    role: String,

    /// City or region, e.g. "São Paulo"
    #[arg(short = 'L', long)]
    location: String,

    /// Seniority, e.g. "Senior"
    #[arg(long)]
    seniority: Option<String>,

    /// Comma-separated skills
    #[arg(long)]
    skills: Option<String>,

    /// Quote the role exactly
    #[arg(long, default_value_t = false)]
    exact: bool,

    /// Comma-separated terms to exclude
    #[arg(long)]
    exclude: Option<String>,

    /// Comma-separated target companies
    #[arg(long)]
    companies: Option<String>,

    /// Add availability phrases ("open to work", ...)
    #[arg(long, default_value_t = false)]
    open_to_work: bool,
}

impl ProfileArgs {
    fn into_profile(self) -> CandidateProfile {
        let mode = SearchMode::from_id_or_default(&self.mode);
        if mode.id() != self.mode.trim().to_lowercase() {
            tracing::warn!(requested = %self.mode, using = %mode, "Unknown mode, using default");
        }

        CandidateProfile {
            role: self.role,
            location: self.location,
            seniority: self.seniority,
            skills: self.skills,
            exact_match: self.exact,
            exclude_terms: self.exclude,
            target_companies: self.companies,
            use_title_operator: false,
            open_to_work: self.open_to_work,
            mode,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("xray=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Modes => cmd_modes(),
        Commands::Query { profile } => {
            println!("{}", build_query(&profile.into_profile()));
        }
        Commands::Search {
            profile,
            limit,
            no_location_filter,
            replay,
            format,
            timeout,
            region,
        } => {
            let profile = profile.into_profile();
            let expected_location = (!no_location_filter).then_some(profile.location.as_str());

            let results = match replay {
                Some(path) => {
                    let provider = ReplayProvider::from_file(&path).with_context(|| {
                        format!("Failed to load replay file: {}", path.display())
                    })?;
                    cmd_search(provider, &profile, limit, expected_location).await
                }
                None => {
                    let mut config = ProviderConfig::from_env()?;
                    if let Some(secs) = timeout {
                        config = config.with_timeout(Duration::from_secs(secs));
                    }
                    if let Some(region) = region {
                        config = config.with_region(region);
                    }
                    let provider = DuckDuckGoProvider::with_config(config)
                        .context("Failed to create HTTP client")?;
                    cmd_search(provider, &profile, limit, expected_location).await
                }
            };

            print_results(&results, format)?;
        }
    }

    Ok(())
}

fn cmd_modes() {
    for config in &MODE_REGISTRY {
        println!("{:<12} {}", config.mode.id(), config.display_name);
    }
}

async fn cmd_search<P: SearchProvider>(
    provider: P,
    profile: &CandidateProfile,
    limit: usize,
    expected_location: Option<&str>,
) -> ResultSet {
    let query = build_query(profile);
    let service = SearchService::new(provider);
    service
        .run(&query, profile.mode, limit, expected_location)
        .await
}

fn print_results(results: &ResultSet, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(results)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            for candidate in results {
                writer.serialize(candidate)?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            if results.is_empty() {
                println!("No candidates found. Try fewer skills, no exact match, or another mode.");
                return Ok(());
            }

            for (i, candidate) in results.iter().enumerate() {
                println!("{:>3}. {}", i + 1, candidate.display_name);
                println!("     {}", candidate.profile_url);
                if candidate.has_email() {
                    println!("     email: {}", candidate.email);
                }
            }

            let with_email = results.iter().filter(|c| c.has_email()).count();
            println!("\nTotal: {} candidates ({} with email)", results.len(), with_email);
        }
    }

    Ok(())
}
