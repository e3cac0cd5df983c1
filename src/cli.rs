use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::api::{AuthAPI, DynAPI, TourAPI};
use crate::auth::{Registration, Session, SessionStore, GUIDE_ROLE};
use crate::config::Config;
use crate::draft::TourDraft;
use crate::editor::StopMutation;
use crate::entities::{Coordinates, Tour, TourInput, TourStop};
use crate::error::{unauthenticated_error, Error};
use crate::external::GraphQLClient;
use crate::script::EditScript;

const MAP_ZOOM: u8 = 13;

#[derive(Parser)]
#[command(name = "tourline")]
#[command(about = "Manage guide tours and their routes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a guide account and store its session.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Forget the stored session.
    Logout,
    /// List the logged-in guide's tours.
    Tours,
    /// Print a tour and its stops.
    Show { tour_id: String },
    /// Apply an edit script to an existing tour and save it.
    Edit {
        tour_id: String,
        script: PathBuf,
        /// Print the calls a save would issue without sending them.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Create a tour from an edit script.
    Create { script: PathBuf },
    /// Delete a tour.
    Delete { tour_id: String },
}

pub async fn run(cli: Cli, config: Config) -> Result<(), Error> {
    let store = SessionStore::new(config.session_file.clone(), config.session_ttl);
    let client = GraphQLClient::new(config.api_url.clone());

    match cli.command {
        Command::Login { email, password } => {
            let session = client.login(&email, &password).await?;
            store.save(&session)?;
            println!("logged in as {}", session.user.display_name());
        }
        Command::Register {
            username,
            email,
            full_name,
            password,
            confirm_password,
        } => {
            let registration =
                Registration::new(username, email, full_name, password, confirm_password);
            let session = client.register(&registration).await?;
            store.save(&session)?;
            println!("registered as {}", session.user.display_name());
        }
        Command::Logout => {
            store.clear()?;
            println!("logged out");
        }
        Command::Tours => {
            let (api, session) = authenticated(client, &store)?;
            for tour in api.find_tours_by_guide(&session.user.id).await? {
                println!("{}\t{}\t{} stops", tour.id, tour.title, tour.tour_steps.len());
            }
        }
        Command::Show { tour_id } => {
            let (api, _) = authenticated(client, &store)?;
            let tour = api.find_tour(&tour_id).await?;
            print!("{}", describe_tour(&tour, config.map_center));
        }
        Command::Edit {
            tour_id,
            script,
            dry_run,
        } => {
            let (api, session) = authenticated(client, &store)?;
            let script = EditScript::from_file(&script)?;
            let mut draft = TourDraft::from_tour(api.find_tour(&tour_id).await?)?;
            script.apply(&mut draft)?;

            if dry_run {
                print_plan(&draft);
                return Ok(());
            }

            let (_, summary) = draft.save(&*api, &session.user.id).await?;
            println!(
                "saved {}: {} created, {} updated, {} deleted",
                tour_id, summary.created, summary.updated, summary.deleted
            );
        }
        Command::Create { script } => {
            let (api, session) = authenticated(client, &store)?;
            let script = EditScript::from_file(&script)?;
            let mut draft = TourDraft::new(TourInput::default());
            script.apply(&mut draft)?;

            let (tour_id, summary) = draft.save(&*api, &session.user.id).await?;
            println!("created {} with {} stops", tour_id, summary.created);
        }
        Command::Delete { tour_id } => {
            let (api, _) = authenticated(client, &store)?;
            api.remove_tour(&tour_id).await?;
            println!("deleted {}", tour_id);
        }
    }

    Ok(())
}

/// Loads the stored session and checks it belongs to a guide.
fn authenticated(
    client: GraphQLClient,
    store: &SessionStore,
) -> Result<(DynAPI, Session), Error> {
    let session = store.load()?.ok_or_else(unauthenticated_error)?;
    session.require_role(GUIDE_ROLE)?;

    let api = Arc::new(client.with_session(session.clone())) as DynAPI;

    Ok((api, session))
}

fn map_link(center: Coordinates) -> String {
    format!(
        "https://www.openstreetmap.org/#map={}/{:.4}/{:.4}",
        MAP_ZOOM,
        center.latitude(),
        center.longitude()
    )
}

// The midpoint of the stops' bounds, or `fallback` for an empty route.
fn route_center(stops: &[TourStop], fallback: Coordinates) -> Coordinates {
    let Some(first) = stops.first() else {
        return fallback;
    };

    let (mut south, mut north) = (first.latitude, first.latitude);
    let (mut west, mut east) = (first.longitude, first.longitude);
    for stop in stops {
        south = south.min(stop.latitude);
        north = north.max(stop.latitude);
        west = west.min(stop.longitude);
        east = east.max(stop.longitude);
    }

    Coordinates::new((south + north) / 2.0, (west + east) / 2.0).unwrap_or(fallback)
}

fn describe_tour(tour: &Tour, map_center: Coordinates) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", tour.title, tour.id);
    if !tour.description.is_empty() {
        let _ = writeln!(out, "{}", tour.description);
    }

    let mut stops = tour.tour_steps.clone();
    stops.sort_by_key(|s| s.order);
    if stops.is_empty() {
        let _ = writeln!(out, "no stops yet");
    }
    for stop in &stops {
        let _ = writeln!(
            out,
            "{:>3}. {} [{:.6}, {:.6}] {}",
            stop.order, stop.title, stop.latitude, stop.longitude, stop.description
        );
    }

    let _ = writeln!(out, "map: {}", map_link(route_center(&stops, map_center)));

    out
}

fn print_plan(draft: &TourDraft) {
    let plan = draft.route.plan();
    if plan.is_empty() {
        println!("route unchanged");
    }

    for mutation in plan.iter() {
        match mutation {
            StopMutation::Delete(id) => println!("delete {}", id),
            StopMutation::Create { input, .. } => {
                println!("create #{} {}", input.order, input.title)
            }
            StopMutation::Update { id, input } => {
                println!("update {} #{} {}", id, input.order, input.title)
            }
        }
    }
}
