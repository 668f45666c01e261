use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use colored::*;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing_subscriber::EnvFilter;

use eventmates::api::{self, ApiClient, HttpTransport, Navigator};
use eventmates::cli::{Args, Command, EventFilterArgs, EventFormArgs};
use eventmates::config::Config;
use eventmates::gate::RouteGate;
use eventmates::models::{
    EventFilters, EventForm, ImageUpload, LoginForm, ProfileForm, RegisterForm, ReviewForm, Role,
    RoleRequestAction, Session,
};
use eventmates::session::{
    mount_or_reload, CredentialStore, FilesystemCredentialStore, SessionStore, SessionView,
    StoredCredentials,
};
use eventmates::ui;
use eventmates::views::{filter_events, nav_links, DashboardSummary};

type Client = Arc<ApiClient<HttpTransport>>;

/// Clears the saved credentials once a refresh has failed; the next command
/// starts signed out.
struct CliNavigator {
    credentials: Arc<FilesystemCredentialStore>,
    expired: AtomicBool,
}

impl Navigator for CliNavigator {
    fn redirect(&self, target: &str) {
        if self.expired.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.credentials.clear() {
            tracing::warn!(error = %e, "failed to clear stored credentials");
        }
        tracing::debug!(route = target, "redirecting to sign-in");
        eprintln!(
            "{}",
            "Your session has expired. Run `eventmates login` to sign in again.".yellow()
        );
    }
}

/// Composition root: one client and one session store per process.
struct App {
    config: Config,
    client: Client,
    navigator: Arc<CliNavigator>,
    credentials: Arc<FilesystemCredentialStore>,
    session: OnceCell<SessionStore<Client>>,
}

impl App {
    fn connect(config: Config) -> Result<Self> {
        let credentials = Arc::new(FilesystemCredentialStore::new());
        let navigator = Arc::new(CliNavigator {
            credentials: credentials.clone(),
            expired: AtomicBool::new(false),
        });

        let transport = HttpTransport::new(&config.api_base_url, config.request_timeout)
            .context("Failed to build HTTP client")?;
        if let Some(stored) = credentials.load(&config.api_base_url) {
            tracing::debug!(saved_at = %stored.saved_at, "restoring saved credentials");
            transport.restore_cookies(&stored.cookies);
        }

        let client = Arc::new(ApiClient::new(transport).with_navigator(navigator.clone()));

        Ok(Self {
            config,
            client,
            navigator,
            credentials,
            session: OnceCell::new(),
        })
    }

    /// The session store, mounted (and therefore loaded) on first use.
    async fn session(&self) -> &SessionStore<Client> {
        self.session
            .get_or_init(|| SessionStore::mount(self.client.clone()))
            .await
    }

    /// The session store after a fresh identity fetch, for commands that just
    /// changed who is signed in.
    async fn reload_session(&self) -> &SessionStore<Client> {
        mount_or_reload(&self.session, || self.client.clone()).await
    }

    async fn require_session(&self) -> Result<Session> {
        match self.session().await.view().await {
            SessionView::Authenticated(session) => Ok(session),
            SessionView::Anonymous => bail!("Not signed in. Run `eventmates login` first."),
            SessionView::Loading => bail!("Session is still loading, try again."),
        }
    }

    async fn require_role(&self, allowed: &[Role]) -> Result<Session> {
        let session = self.require_session().await?;
        if !allowed.contains(&session.role) {
            let names: Vec<&str> = allowed.iter().map(|r| r.as_str()).collect();
            bail!(
                "This command needs the {} role (you are {}).",
                names.join(" or "),
                session.role
            );
        }
        Ok(session)
    }

    fn persist_credentials(&self) {
        if self.navigator.expired.load(Ordering::SeqCst) {
            return;
        }

        let result = match self.client.transport().cookie_header() {
            Some(cookies) => self.credentials.save(&StoredCredentials {
                base_url: self.config.api_base_url.clone(),
                cookies,
                saved_at: chrono::Local::now(),
            }),
            None => self.credentials.clear(),
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist credentials");
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            process::exit(1);
        }
    };

    init_tracing(config.verbose);

    let Some(command) = args.command else {
        print_usage();
        process::exit(1);
    };

    if let Command::Gate { path, token } = &command {
        match check_gate(&config, path, token.as_deref()) {
            Ok(()) => return,
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red(), e);
                process::exit(1);
            }
        }
    }

    let app = match App::connect(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            process::exit(1);
        }
    };

    let result = run(&app, command).await;
    app.persist_credentials();

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red(), e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "eventmates=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_usage() {
    eprintln!("{}", "Usage: eventmates [OPTIONS] <COMMAND>".red());
    eprintln!("{}", "  login --email <EMAIL> --password <PASSWORD>".dimmed());
    eprintln!("{}", "  events [--search <Q>] [--type <TYPE>] [--location <L>]".dimmed());
    eprintln!("{}", "  dashboard | whoami | nav | logout".dimmed());
    eprintln!("{}", "Run `eventmates --help` for every command.".dimmed());
}

fn check_gate(config: &Config, path: &str, token: Option<&str>) -> Result<()> {
    let secret = config
        .access_secret
        .as_deref()
        .context("JWT_ACCESS_SECRET is not configured")?;
    let decision = RouteGate::new(secret).decide(token, path);
    ui::display_gate(path, &decision);
    Ok(())
}

fn parse_day(value: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value))?;
    let time = if end_of_day {
        day.and_hms_opt(23, 59, 59)
    } else {
        day.and_hms_opt(0, 0, 0)
    };
    time.map(|t| t.and_utc())
        .with_context(|| format!("Invalid date '{}'", value))
}

fn event_filters(args: EventFilterArgs) -> Result<EventFilters> {
    Ok(EventFilters {
        search: args.search,
        event_type: args.event_type,
        location: args.location,
        date_from: args.from.as_deref().map(|d| parse_day(d, false)).transpose()?,
        date_to: args.to.as_deref().map(|d| parse_day(d, true)).transpose()?,
    })
}

fn event_form(args: EventFormArgs) -> Result<EventForm> {
    if args.min_participants > args.max_participants {
        bail!(
            "--min ({}) cannot exceed --max ({})",
            args.min_participants,
            args.max_participants
        );
    }
    parse_day(&args.date, false)?;

    Ok(EventForm {
        name: args.name,
        event_type: args.event_type,
        date: args.date,
        time: args.time,
        location: args.location,
        min_participants: args.min_participants,
        max_participants: args.max_participants,
        description: args.description,
        joining_fee: args.joining_fee,
        image: args.image.map(|path| ImageUpload { path }),
    })
}

async fn run(app: &App, command: Command) -> Result<()> {
    let client = app.client.as_ref();

    match command {
        Command::Register {
            name,
            email,
            password,
            phone,
            location,
            image,
        } => {
            let form = RegisterForm {
                name,
                email,
                password,
                phone,
                location,
                image: image.map(|path| ImageUpload { path }),
            };
            api::auth::register(client, &form).await?;
            ui::display_success("Account created. Run `eventmates login` to sign in.");
        }
        Command::Login { email, password } => {
            api::auth::login(client, &LoginForm { email, password }).await?;
            let session = app.reload_session().await;
            ui::display_session(session.current_session().await.as_ref());
        }
        Command::Logout => {
            api::auth::logout(client).await?;
            app.reload_session().await;
            ui::display_success("Signed out.");
        }
        Command::Whoami => {
            let view = app.session().await.view().await;
            ui::display_session(view.session());
        }
        Command::Events(filter_args) => {
            let filters = event_filters(filter_args)?;
            let events = api::events::list(client).await?;
            ui::display_events(&filter_events(&events, &filters));
        }
        Command::Event { id } => {
            let event = api::events::get(client, &id).await?;
            ui::display_event(&event);
        }
        Command::CreateEvent(form_args) => {
            app.require_role(&[Role::Host]).await?;
            let event = api::events::create(client, &event_form(form_args)?).await?;
            ui::display_success(&format!("Created event {}", event.id));
        }
        Command::UpdateEvent { id, form } => {
            app.require_role(&[Role::Host]).await?;
            let event = api::events::update(client, &id, &event_form(form)?).await?;
            ui::display_success(&format!("Updated event {}", event.id));
        }
        Command::DeleteEvent { id } => {
            app.require_role(&[Role::Host, Role::Admin]).await?;
            api::events::delete(client, &id).await?;
            ui::display_success(&format!("Deleted event {}", id));
        }
        Command::Join { id } => {
            app.require_session().await?;
            api::events::join(client, &id).await?;
            ui::display_success("You're in! See you there.");
        }
        Command::Participants { id } => {
            let users = api::events::participants(client, &id).await?;
            ui::display_users(&users);
        }
        Command::Dashboard => {
            let session = app.require_session().await?;
            let events = api::events::list(client).await?;
            let summary = DashboardSummary::build(&session, &events, Utc::now());
            ui::display_dashboard(&session, &summary);
        }
        Command::Nav => {
            let view = app.session().await.view().await;
            ui::display_nav(&nav_links(view.session()));
        }
        Command::RequestHost => {
            app.require_role(&[Role::User]).await?;
            api::users::request_host(client).await?;
            ui::display_success("Host request submitted! An admin will review it.");
        }
        Command::Users => {
            app.require_role(&[Role::Admin]).await?;
            ui::display_users(&api::users::list(client).await?);
        }
        Command::User { id } => {
            ui::display_user(&api::users::get(client, &id).await?);
        }
        Command::DeleteUser { id } => {
            app.require_role(&[Role::Admin]).await?;
            api::users::delete(client, &id).await?;
            ui::display_success(&format!("Deleted user {}", id));
        }
        Command::UpdateProfile {
            id,
            name,
            phone,
            location,
            bio,
            interests,
            image,
        } => {
            app.require_session().await?;
            let form = ProfileForm {
                name,
                phone,
                location,
                bio,
                interests,
                image: image.map(|path| ImageUpload { path }),
            };
            let user = api::users::update_profile(client, &id, &form).await?;
            ui::display_user(&user);
        }
        Command::RoleRequests => {
            app.require_role(&[Role::Admin]).await?;
            ui::display_role_requests(&api::users::role_requests(client).await?);
        }
        Command::Approve { id } => {
            app.require_role(&[Role::Admin]).await?;
            api::users::update_role_request(client, &id, RoleRequestAction::Approve).await?;
            ui::display_success(&format!("Approved host request {}", id));
        }
        Command::Reject { id } => {
            app.require_role(&[Role::Admin]).await?;
            api::users::update_role_request(client, &id, RoleRequestAction::Reject).await?;
            ui::display_success(&format!("Rejected host request {}", id));
        }
        Command::Review {
            host,
            event,
            rating,
            comment,
        } => {
            app.require_session().await?;
            let form = ReviewForm { rating, comment };
            api::reviews::create(client, &host, &event, &form).await?;
            ui::display_success("Thanks for your review!");
        }
        Command::Reviews { event, host } => {
            let reviews = match (event, host) {
                (Some(event), _) => api::reviews::for_event(client, &event).await?,
                (None, Some(host)) => api::reviews::for_host(client, &host).await?,
                (None, None) => bail!("Pass --event or --host"),
            };
            ui::display_reviews(&reviews);
        }
        Command::Gate { path, token } => {
            check_gate(&app.config, &path, token.as_deref())?;
        }
    }

    Ok(())
}
