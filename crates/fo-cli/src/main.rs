//! FieldOps CLI
//!
//! Inspect the status workflow and push status changes to the backend.
//!
//! ```bash
//! fieldops transitions IN_PROGRESS --role ADMIN
//! fieldops validate CLOSED_PENDING --comment "Replaced filter"
//! fieldops change 42 ONSITE_VISIT_STARTED ONSITE_VISIT_REACHED --role SERVICE_PERSON \
//!     --lat 12.9716 --lng 77.5946
//! ```

use anyhow::{anyhow, bail, Context};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fo_client::HttpApiClient;
use fo_core::config::AppConfig;
use fo_core::error::FoError;
use fo_models::{ActorRole, LocationCapture, Status, Ticket};
use fo_services::{
    ChangeStatusService, CoordinatesOnly, FixedPosition, FollowUpOutcome, LocationService,
    ReverseGeocoder, StatusChangeForm, StatusTransitionEngine,
};

#[derive(Parser)]
#[command(name = "fieldops")]
#[command(version)]
#[command(about = "Ticket status workflow for field service operations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every status with its display metadata
    Statuses,

    /// Show the statuses reachable from STATUS
    Transitions {
        status: String,

        #[arg(long)]
        role: Option<ActorRole>,
    },

    /// Check a submission without sending it
    Validate {
        status: Status,

        #[arg(long)]
        comment: Option<String>,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Change a ticket's status through the backend
    Change {
        ticket_id: i64,

        current: Status,

        status: Status,

        #[arg(long)]
        role: ActorRole,

        #[arg(long)]
        comment: Option<String>,

        #[command(flatten)]
        location: LocationArgs,

        /// Skip the reverse geocoding lookup
        #[arg(long)]
        no_geocode: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct LocationArgs {
    #[arg(long, allow_negative_numbers = true, requires = "lng")]
    lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lng: Option<f64>,

    /// Accuracy radius in meters
    #[arg(long)]
    accuracy: Option<f64>,

    /// Known address; skips geocoding
    #[arg(long)]
    address: Option<String>,
}

impl LocationArgs {
    fn position(&self) -> Option<FixedPosition> {
        let (lat, lng) = (self.lat?, self.lng?);
        let position = FixedPosition::new(lat, lng);
        Some(match self.accuracy {
            Some(meters) => position.with_accuracy(meters),
            None => position,
        })
    }

    /// Capture without any lookup
    fn capture(&self) -> Option<LocationCapture> {
        let mut capture = LocationCapture::new(self.lat?, self.lng?, Utc::now());
        capture.address = self.address.clone();
        capture.accuracy = self.accuracy;
        Some(capture)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let loaded = AppConfig::from_env();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    init_tracing(&config);
    if let Err(e) = &loaded {
        warn!("Failed to load config from env: {}, using defaults", e);
    }

    let cli = Cli::parse();
    let output = run(cli.command, &config).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Logs go to stderr so stdout stays machine readable
fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);
    let fmt = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.logging.json {
        registry.with(fmt.json()).init();
    } else {
        registry.with(fmt).init();
    }
}

async fn run(command: Commands, config: &AppConfig) -> anyhow::Result<Value> {
    let engine = StatusTransitionEngine::from_config(config);

    match command {
        Commands::Statuses => {
            let options: Vec<_> = Status::ALL.into_iter().map(|s| engine.option_for(s)).collect();
            Ok(serde_json::to_value(options)?)
        }

        Commands::Transitions { status, role } => {
            let options = engine.available_transitions_for(&status, role)?;
            Ok(serde_json::to_value(options)?)
        }

        Commands::Validate {
            status,
            comment,
            location,
        } => {
            let capture = location.capture();
            match engine.validate_submission(status, comment.as_deref(), capture.as_ref()) {
                Ok(submission) => Ok(json!({
                    "valid": true,
                    "request": submission.to_request(),
                    "followUp": engine.plan_follow_up(status).map(|plan| plan.status),
                })),
                Err(e) => {
                    let errors: fo_core::error::ValidationErrors = e.clone().into();
                    Ok(json!({
                        "valid": false,
                        "code": FoError::from(e).error_code(),
                        "errors": errors.full_messages(),
                    }))
                }
            }
        }

        Commands::Change {
            ticket_id,
            current,
            status,
            role,
            comment,
            location,
            no_geocode,
        } => {
            let client = HttpApiClient::from_config(config)?;
            let service = ChangeStatusService::from_config(client.clone(), config);

            let mut form = StatusChangeForm::open(service.engine(), Ticket::new(ticket_id, current), Some(role));
            form.select(status)?;
            if let Some(comment) = comment {
                form.set_comment(comment);
            }

            if form.requires_location() {
                let capture = match (&location.address, no_geocode) {
                    (Some(_), _) => location.capture(),
                    (None, true) => capture_location(&location, CoordinatesOnly, config).await?,
                    (None, false) => capture_location(&location, client, config).await?,
                };
                let capture = capture.ok_or_else(|| anyhow!("{} requires --lat and --lng", status))?;
                form.set_location(capture);
            }

            if !form.can_submit() {
                bail!("{}", form.field_errors().full_messages().join("; "));
            }

            let outcome = service
                .submit(&mut form)
                .await
                .with_context(|| format!("Failed to change ticket {} to {}", ticket_id, status))?;
            info!(ticket_id, status = %outcome.final_status(), "Ticket updated");

            let follow_up = match &outcome.follow_up {
                FollowUpOutcome::NotPlanned => Value::Null,
                FollowUpOutcome::Completed(ack) => json!({ "status": ack.status, "applied": true }),
                FollowUpOutcome::Failed { status, error } => {
                    json!({ "status": status, "applied": false, "error": error.to_string() })
                }
            };
            Ok(json!({
                "ticketId": ticket_id,
                "status": outcome.final_status(),
                "primary": outcome.primary,
                "followUp": follow_up,
            }))
        }
    }
}

async fn capture_location<R: ReverseGeocoder>(
    location: &LocationArgs,
    geocoder: R,
    config: &AppConfig,
) -> anyhow::Result<Option<LocationCapture>> {
    let Some(position) = location.position() else {
        return Ok(None);
    };
    let service = LocationService::from_config(position, geocoder, config);
    Ok(Some(service.capture().await?))
}
