use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "eventmates")]
#[command(about = "Browse, host, join and review EventMates events", long_about = None)]
pub struct Args {
    #[arg(
        long = "api-url",
        global = true,
        help = "Backend base URL (e.g., http://localhost:5000/api/v1)"
    )]
    pub api_url: Option<String>,

    #[arg(short = 'v', long = "verbose", global = true, help = "Log requests and session activity")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long, help = "Profile image to upload")]
        image: Option<PathBuf>,
    },
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// List events, optionally filtered
    Events(EventFilterArgs),
    /// Show one event
    Event { id: String },
    /// Create an event (hosts only)
    CreateEvent(EventFormArgs),
    /// Update an event (hosts only)
    UpdateEvent {
        id: String,
        #[command(flatten)]
        form: EventFormArgs,
    },
    /// Delete an event (hosts and admins)
    DeleteEvent { id: String },
    /// Join an event
    Join { id: String },
    /// List participants of an event
    Participants { id: String },
    /// Summarize your events
    Dashboard,
    /// Show the menu for the current visitor
    Nav,
    /// Ask an admin to make you a host
    RequestHost,
    /// List all users (admins only)
    Users,
    /// Show one user
    User { id: String },
    /// Delete a user (admins only)
    DeleteUser { id: String },
    /// Update a profile
    UpdateProfile {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long = "interest")]
        interests: Vec<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// List pending host requests (admins only)
    RoleRequests,
    /// Approve a host request (admins only)
    Approve { id: String },
    /// Reject a host request (admins only)
    Reject { id: String },
    /// Review a host for an event
    Review {
        #[arg(long)]
        host: String,
        #[arg(long)]
        event: String,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        #[arg(long)]
        comment: Option<String>,
    },
    /// List reviews for an event or a host
    Reviews {
        #[arg(long, conflicts_with = "host", required_unless_present = "host")]
        event: Option<String>,
        #[arg(long)]
        host: Option<String>,
    },
    /// Check what the route gate decides for a path
    Gate {
        path: String,
        #[arg(long, help = "Access credential to check (defaults to none)")]
        token: Option<String>,
    },
}

#[derive(ClapArgs, Debug, Default)]
pub struct EventFilterArgs {
    #[arg(long, help = "Match name or description")]
    pub search: Option<String>,
    #[arg(long = "type", help = "Event type, or All")]
    pub event_type: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long, help = "Earliest date (YYYY-MM-DD)")]
    pub from: Option<String>,
    #[arg(long, help = "Latest date (YYYY-MM-DD)")]
    pub to: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct EventFormArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "type")]
    pub event_type: String,
    #[arg(long, help = "Event date (YYYY-MM-DD)")]
    pub date: String,
    #[arg(long, help = "Start time (e.g., 18:30)")]
    pub time: String,
    #[arg(long)]
    pub location: String,
    #[arg(long = "min", default_value_t = 1)]
    pub min_participants: u32,
    #[arg(long = "max")]
    pub max_participants: u32,
    #[arg(long)]
    pub description: String,
    #[arg(long = "fee", default_value_t = 0.0)]
    pub joining_fee: f64,
    #[arg(long, help = "Cover image to upload")]
    pub image: Option<PathBuf>,
}
