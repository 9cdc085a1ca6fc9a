//! reelview - streaming catalog browser CLI.

/// Application configuration (TOML).
mod config;

use std::fmt::Debug;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, BACKEND_URL_ENV, resolve_config_path};
use reelview_api::catalog::{
    CatalogClient, ContentId, ContentItem, LocalCatalogApi, NewProfile, ProfileId,
    ProgressUpdate,
};
use reelview_api::mock::MockCatalog;
use reelview_core::{
    HomeView, MutationState, MyListManager, ProgressTracker, Resource, SearchUnit,
};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Use the built-in mock catalog instead of the API.
    #[arg(long, global = true)]
    offline: bool,

    /// API origin (overrides `REELVIEW_BACKEND_URL` and the config file).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse catalog content.
    Content(ContentCommand),
    /// Manage viewer profiles.
    Profiles(ProfilesCommand),
    /// Manage a profile's "my list".
    MyList(MyListCommand),
    /// Show a profile's in-progress items.
    ContinueWatching(ProfileArgs),
    /// Record viewing progress.
    Progress(ProgressCommand),
    /// Check that the API is up.
    Health,
    /// Load the home view headlessly and print every row.
    Home(HomeArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `content` subcommand.
#[derive(clap::Args)]
struct ContentCommand {
    /// Content subcommand to run.
    #[command(subcommand)]
    command: ContentSubcommands,
}

/// Available content subcommands.
#[derive(Subcommand)]
enum ContentSubcommands {
    /// Show the hero item.
    Featured,
    /// List the trending row.
    Trending,
    /// List the popular row.
    Popular,
    /// List a genre row.
    Genre(GenreArgs),
    /// Search titles and genres.
    Search(SearchArgs),
    /// Show a single item.
    Details(ContentIdArgs),
    /// List every category with its size.
    Categories,
}

/// Arguments for the `content genre` subcommand.
#[derive(clap::Args)]
struct GenreArgs {
    /// Genre name (e.g. "horror").
    #[arg(long, required = true)]
    name: String,
}

/// Arguments for the `content search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "witcher").
    #[arg(long, required = true)]
    query: String,
}

/// Arguments naming one content item.
#[derive(clap::Args)]
struct ContentIdArgs {
    /// Content ID.
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `profiles` subcommand.
#[derive(clap::Args)]
struct ProfilesCommand {
    /// Profiles subcommand to run.
    #[command(subcommand)]
    command: ProfilesSubcommands,
}

/// Available profile subcommands.
#[derive(Subcommand)]
enum ProfilesSubcommands {
    /// List profiles.
    List,
    /// Create a profile.
    Create(CreateProfileArgs),
}

/// Arguments for the `profiles create` subcommand.
#[derive(clap::Args)]
struct CreateProfileArgs {
    /// Display name.
    #[arg(long, required = true)]
    name: String,
    /// Avatar image URL.
    #[arg(long, default_value = "")]
    avatar: String,
    /// Mark as a kids profile.
    #[arg(long)]
    kids: bool,
}

/// Arguments naming a profile.
#[derive(clap::Args)]
struct ProfileArgs {
    /// Profile ID.
    #[arg(long, required = true)]
    profile: String,
}

/// Arguments naming a profile and a content item.
#[derive(clap::Args)]
struct ProfileContentArgs {
    /// Profile ID.
    #[arg(long, required = true)]
    profile: String,
    /// Content ID.
    #[arg(long, required = true)]
    content_id: String,
}

/// Arguments for the `my-list` subcommand.
#[derive(clap::Args)]
struct MyListCommand {
    /// My-list subcommand to run.
    #[command(subcommand)]
    command: MyListSubcommands,
}

/// Available my-list subcommands.
#[derive(Subcommand)]
enum MyListSubcommands {
    /// List the profile's items.
    Show(ProfileArgs),
    /// Add an item.
    Add(ProfileContentArgs),
    /// Remove an item.
    Remove(ProfileContentArgs),
}

/// Arguments for the `progress` subcommand.
#[derive(clap::Args)]
struct ProgressCommand {
    /// Progress subcommand to run.
    #[command(subcommand)]
    command: ProgressSubcommands,
}

/// Available progress subcommands.
#[derive(Subcommand)]
enum ProgressSubcommands {
    /// Create (or replace) a progress record.
    Create(CreateProgressArgs),
    /// Update fields of a progress record.
    Update(UpdateProgressArgs),
}

/// Arguments for the `progress create` subcommand.
#[derive(clap::Args)]
struct CreateProgressArgs {
    /// Profile ID.
    #[arg(long, required = true)]
    profile: String,
    /// Content ID.
    #[arg(long, required = true)]
    content_id: String,
    /// Watched percentage (0-100).
    #[arg(long, required = true)]
    progress: f64,
}

/// Arguments for the `progress update` subcommand.
#[derive(clap::Args)]
struct UpdateProgressArgs {
    /// Profile ID.
    #[arg(long, required = true)]
    profile: String,
    /// Content ID.
    #[arg(long, required = true)]
    content_id: String,
    /// Watched percentage (0-100).
    #[arg(long)]
    progress: Option<f64>,
    /// Episode label (e.g. "S2 E5").
    #[arg(long)]
    episode: Option<String>,
    /// Season number.
    #[arg(long)]
    season: Option<u32>,
    /// Episode number.
    #[arg(long)]
    episode_number: Option<u32>,
    /// Remaining time label (e.g. "20 min left").
    #[arg(long)]
    time_left: Option<String>,
}

/// Arguments for the `home` subcommand.
#[derive(clap::Args)]
struct HomeArgs {
    /// Profile name to select (default: first profile).
    #[arg(long)]
    profile: Option<String>,
    /// Run a search after loading.
    #[arg(long)]
    search: Option<String>,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: Shell,
}

/// Logs a content listing, one row per item.
fn log_items(items: &[ContentItem]) {
    tracing::info!("ID\tType\tYear\tTitle\t\t\tGenres");
    for item in items {
        tracing::info!(
            "{}\t{}\t{}\t{}\t\t{}",
            item.id,
            item.content_type.api_name(),
            if item.year.is_empty() { "-" } else { &item.year },
            item.title,
            item.genres.join(", "),
        );
    }
    tracing::info!("Total: {} items", items.len());
}

/// Logs in-progress items with their progress labels.
fn log_progress_items(items: &[ContentItem]) {
    tracing::info!("ID\tProgress\tEpisode\t\tTime left\tTitle");
    for item in items {
        tracing::info!(
            "{}\t{}\t\t{}\t\t{}\t{}",
            item.id,
            item.progress
                .map_or_else(|| String::from("-"), |p| format!("{p:.0}%")),
            item.episode_label.as_deref().unwrap_or("-"),
            item.time_left_label.as_deref().unwrap_or("-"),
            item.title,
        );
    }
    tracing::info!("Total: {} items", items.len());
}

/// Logs every field of one item.
fn log_details(item: &ContentItem) {
    tracing::info!("ID:       {}", item.id);
    tracing::info!("Title:    {}", item.title);
    tracing::info!("Type:     {}", item.content_type.api_name());
    tracing::info!("Year:     {}", item.year);
    tracing::info!("Rating:   {}", item.rating.as_deref().unwrap_or("-"));
    tracing::info!("Genres:   {}", item.genres.join(", "));
    if let Some(seasons) = &item.seasons {
        tracing::info!("Seasons:  {seasons}");
    }
    if let Some(trailer) = &item.trailer_url {
        tracing::info!("Trailer:  {trailer}");
    }
    if let Some(description) = &item.description {
        tracing::info!("Synopsis: {description}");
    }
}

/// Turns a mutation outcome into a command result.
fn mutation_result(succeeded: bool, state: &MutationState, action: &str) -> Result<()> {
    if succeeded {
        return Ok(());
    }
    match &state.error {
        Some(err) => bail!("failed to {action}: {err}"),
        None => bail!("failed to {action}"),
    }
}

/// Looks up a content item, failing if it does not exist.
async fn require_item<C: LocalCatalogApi>(api: &C, id: &ContentId) -> Result<ContentItem> {
    api.content_details(id)
        .await
        .with_context(|| format!("failed to fetch content {id}"))?
        .with_context(|| format!("content not found: {id}"))
}

/// Runs the `content` subcommands.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_content<C: LocalCatalogApi>(api: Rc<C>, command: ContentSubcommands) -> Result<()> {
    match command {
        ContentSubcommands::Featured => {
            let featured = api.featured().await.context("failed to fetch featured")?;
            match featured {
                Some(item) => log_details(&item),
                None => tracing::info!("No featured content."),
            }
        }
        ContentSubcommands::Trending => {
            log_items(&api.trending().await.context("failed to fetch trending")?);
        }
        ContentSubcommands::Popular => {
            log_items(&api.popular().await.context("failed to fetch popular")?);
        }
        ContentSubcommands::Genre(args) => {
            let items = api
                .by_genre(&args.name)
                .await
                .with_context(|| format!("failed to fetch genre {}", args.name))?;
            log_items(&items);
        }
        ContentSubcommands::Search(args) => {
            let unit = SearchUnit::new(api);
            unit.search(&args.query).await;
            let state = unit.state();
            if let Some(err) = state.error {
                bail!("search failed: {err}");
            }
            log_items(&state.results);
        }
        ContentSubcommands::Details(args) => {
            let item = require_item(api.as_ref(), &ContentId::new(args.id)).await?;
            log_details(&item);
        }
        ContentSubcommands::Categories => {
            let categories = api
                .all_categories()
                .await
                .context("failed to fetch categories")?;
            tracing::info!("Category\tItems");
            for (name, items) in &categories {
                tracing::info!("{}\t\t{}", name, items.len());
            }
            tracing::info!("Total: {} categories", categories.len());
        }
    }
    Ok(())
}

/// Runs the `profiles` subcommands.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_profiles<C: LocalCatalogApi>(api: &C, command: ProfilesSubcommands) -> Result<()> {
    match command {
        ProfilesSubcommands::List => {
            let profiles = api.profiles().await.context("failed to fetch profiles")?;
            tracing::info!("ID\tKids\tName");
            for profile in &profiles {
                tracing::info!(
                    "{}\t{}\t{}",
                    profile.id,
                    if profile.is_kids { "yes" } else { "no" },
                    profile.name
                );
            }
            tracing::info!("Total: {} profiles", profiles.len());
        }
        ProfilesSubcommands::Create(args) => {
            let request = NewProfile {
                name: args.name,
                avatar: args.avatar,
                is_kids: args.kids,
            };
            let created = api
                .create_profile(&request)
                .await
                .context("failed to create profile")?;
            tracing::info!("Created profile {} ({})", created.name, created.id);
        }
    }
    Ok(())
}

/// Runs the `my-list` subcommands through the list manager.
///
/// # Errors
///
/// Returns an error if the item does not exist or the API rejects the change.
#[instrument(skip_all)]
async fn run_my_list<C: LocalCatalogApi>(api: Rc<C>, command: MyListSubcommands) -> Result<()> {
    match command {
        MyListSubcommands::Show(args) => {
            let items = api
                .my_list(&ProfileId::new(args.profile))
                .await
                .context("failed to fetch my list")?;
            log_progress_items(&items);
        }
        MyListSubcommands::Add(args) => {
            let profile_id = ProfileId::new(args.profile);
            let item = require_item(api.as_ref(), &ContentId::new(args.content_id)).await?;
            let manager = MyListManager::new(api);
            let added = manager.add(&profile_id, &item).await;
            mutation_result(added, &manager.state(), "add to my list")?;
            tracing::info!("Added {} to my list", item.title);
        }
        MyListSubcommands::Remove(args) => {
            let profile_id = ProfileId::new(args.profile);
            let content_id = ContentId::new(args.content_id);
            let manager = MyListManager::new(api);
            let removed = manager.remove(&profile_id, &content_id).await;
            mutation_result(removed, &manager.state(), "remove from my list")?;
            tracing::info!("Removed {content_id} from my list");
        }
    }
    Ok(())
}

/// Runs the `continue-watching` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_continue_watching<C: LocalCatalogApi>(api: &C, args: ProfileArgs) -> Result<()> {
    let items = api
        .continue_watching(&ProfileId::new(args.profile))
        .await
        .context("failed to fetch continue watching")?;
    log_progress_items(&items);
    Ok(())
}

/// Runs the `progress` subcommands through the progress tracker.
///
/// # Errors
///
/// Returns an error if the item does not exist, the values are out of range
/// or the API rejects the change.
#[instrument(skip_all)]
async fn run_progress<C: LocalCatalogApi>(api: Rc<C>, command: ProgressSubcommands) -> Result<()> {
    match command {
        ProgressSubcommands::Create(args) => {
            let profile_id = ProfileId::new(args.profile);
            let item = require_item(api.as_ref(), &ContentId::new(args.content_id)).await?;
            let tracker = ProgressTracker::new(api);
            let created = tracker.create(&profile_id, &item, args.progress).await;
            mutation_result(created, &tracker.state(), "create progress")?;
            tracing::info!("Recorded {:.0}% for {}", args.progress, item.title);
        }
        ProgressSubcommands::Update(args) => {
            let profile_id = ProfileId::new(args.profile);
            let content_id = ContentId::new(args.content_id);
            let update = ProgressUpdate {
                progress: args.progress,
                current_episode: args.episode,
                season_number: args.season,
                episode_number: args.episode_number,
                time_left: args.time_left,
            };
            let tracker = ProgressTracker::new(api);
            let updated = tracker.update(&profile_id, &content_id, &update).await;
            mutation_result(updated, &tracker.state(), "update progress")?;
            tracing::info!("Updated progress for {content_id}");
        }
    }
    Ok(())
}

/// Runs the `health` subcommand.
///
/// # Errors
///
/// Returns an error if the API is unreachable or reports itself unhealthy.
#[instrument(skip_all)]
async fn run_health<C: LocalCatalogApi>(api: &C) -> Result<()> {
    let status = api.health().await.context("health check failed")?;
    if !status.is_healthy() {
        bail!("service reported status {}", status.status);
    }
    tracing::info!("Service is {}", status.status);
    Ok(())
}

/// Logs a row's titles, or why it is unavailable.
fn log_row<K>(label: &str, row: &Resource<K, Vec<ContentItem>>)
where
    K: Clone + PartialEq + Debug,
{
    let snapshot = row.snapshot();
    if let Some(err) = &snapshot.error {
        tracing::warn!("{label}: unavailable ({err})");
        return;
    }
    let items = snapshot.data.unwrap_or_default();
    let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
    tracing::info!("{label} ({}): {}", items.len(), titles.join(", "));
}

/// Runs the `home` subcommand: loads the home view, optionally switches
/// profile and searches, then logs every row.
///
/// # Errors
///
/// Returns an error if the requested profile does not exist.
#[instrument(skip_all)]
async fn run_home<C: LocalCatalogApi + 'static>(
    api: Rc<C>,
    args: HomeArgs,
    genres: &[String],
) -> Result<()> {
    let view = HomeView::new(api, genres.iter().cloned());
    view.load().await;

    if let Some(name) = &args.profile {
        let profile = view
            .profiles()
            .data()
            .unwrap_or_default()
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .with_context(|| format!("profile not found: {name}"))?;
        view.select_profile(profile).await;
    }

    let featured = view.featured().snapshot();
    match (featured.data.flatten(), featured.error) {
        (_, Some(err)) => tracing::warn!("Featured: unavailable ({err})"),
        (Some(item), None) => tracing::info!("Featured: {}", item.title),
        (None, None) => tracing::info!("Featured: none"),
    }
    log_row("Trending", view.trending());
    log_row("Popular", view.popular());
    for row in view.genre_rows() {
        log_row(&format!("Genre {}", row.key()), row);
    }

    match view.current_profile() {
        Some(profile) => {
            tracing::info!("Profile: {}", profile.name);
            log_row("My list", view.my_list());
            log_row("Continue watching", view.continue_watching());
        }
        None => tracing::warn!("No profile available"),
    }

    if let Some(query) = &args.search {
        view.search(query).await;
        let state = view.search_unit().state();
        match state.error {
            Some(err) => tracing::warn!("Search \"{query}\": failed ({err})"),
            None => {
                let titles: Vec<&str> = state.results.iter().map(|i| i.title.as_str()).collect();
                tracing::info!(
                    "Search \"{query}\" ({}): {}",
                    state.results.len(),
                    titles.join(", ")
                );
            }
        }
    }

    Ok(())
}

/// Writes shell completions to stdout.
fn write_completions(shell: Shell) {
    let mut command = Cli::command();
    let name = command.get_name().to_owned();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
}

/// Dispatches a catalog subcommand against `api`.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
async fn run<C: LocalCatalogApi + 'static>(
    api: Rc<C>,
    command: Commands,
    config: &AppConfig,
) -> Result<()> {
    match command {
        Commands::Content(cmd) => run_content(api, cmd.command).await,
        Commands::Profiles(cmd) => run_profiles(api.as_ref(), cmd.command).await,
        Commands::MyList(cmd) => run_my_list(api, cmd.command).await,
        Commands::ContinueWatching(args) => run_continue_watching(api.as_ref(), args).await,
        Commands::Progress(cmd) => run_progress(api, cmd.command).await,
        Commands::Health => run_health(api.as_ref()).await,
        Commands::Home(args) => run_home(api, args, &config.home.genres).await,
        Commands::Completions(args) => {
            write_completions(args.shell);
            Ok(())
        }
    }
}

/// Builds the HTTP client from config, `--base-url` and the environment.
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the client fails to build.
fn build_client(config: &AppConfig, base_url: Option<&str>) -> Result<CatalogClient> {
    let env_url = std::env::var(BACKEND_URL_ENV).ok();
    let origin = config.base_url(base_url, env_url.as_deref())?;
    tracing::debug!(origin = %origin, "using catalog API");
    CatalogClient::builder()
        .base_url(origin)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(config.timeout())
        .build()
        .context("failed to build API client")
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    if let Commands::Completions(args) = &cli.command {
        write_completions(args.shell);
        return Ok(());
    }

    let config_path = resolve_config_path(cli.dir.as_ref()).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    if cli.offline {
        tracing::debug!("using offline mock catalog");
        run(Rc::new(MockCatalog::seeded()), cli.command, &config).await
    } else {
        let client = build_client(&config, cli.base_url.as_deref())?;
        run(Rc::new(client), cli.command, &config).await
    }
}
