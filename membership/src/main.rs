//! `membership` command: drive the membership actions against a live service
//! and print the resulting views as JSON.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use membership::domain::{
    EmployeeId, FetchOutcome, MembershipStore, ProjectId, ProjectMemberId,
    ProjectMembershipService,
};
use membership::outbound::http::HttpMembershipGateway;
use membership::GatewaySettings;
use ortho_config::OrthoConfig;
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `membership` command arguments.
///
/// Connection settings come from `MEMBERSHIP_*` environment variables.
#[derive(Debug, Parser)]
#[command(
    name = "membership",
    about = "Inspect and change project membership on the remote service",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List projects visible to the caller.
    Projects,
    /// List the active members of a project.
    Members {
        /// Project to inspect.
        project_id: ProjectId,
    },
    /// Search employees who could join a project.
    Search {
        /// Project to search candidates for.
        project_id: ProjectId,
        /// Name filter; omit to list the whole candidate pool.
        #[arg(default_value = "")]
        query: String,
    },
    /// Add an employee to a project.
    Add {
        /// Project to join.
        project_id: ProjectId,
        /// Employee joining.
        employee_id: EmployeeId,
        /// One of PA, PL, PM.
        role: String,
    },
    /// Remove a member from a project.
    Remove {
        /// Project the member belongs to.
        project_id: ProjectId,
        /// Membership to remove.
        project_member_id: ProjectMemberId,
        /// Reason recorded in the membership history.
        reason: String,
    },
    /// Change a member's role.
    Modify {
        /// Project the member belongs to.
        project_id: ProjectId,
        /// Membership to change.
        project_member_id: ProjectMemberId,
        /// One of PA, PL, PM.
        role: String,
    },
}

fn main() -> io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = GatewaySettings::load_from_iter([OsString::from("membership")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let gateway = HttpMembershipGateway::from_settings(&settings)
        .map_err(|error| io::Error::other(format!("create gateway: {error}")))?;
    let service =
        ProjectMembershipService::new(Arc::new(gateway), Arc::new(MembershipStore::new()));
    let store = service.store();

    match args.command {
        Command::Projects => {
            ensure_loaded("projects", service.fetch_projects().await)?;
            print_json(&store.projects())
        }
        Command::Members { project_id } => {
            select(&service, project_id).await?;
            print_json(&store.active_members())
        }
        Command::Search { project_id, query } => {
            select(&service, project_id).await?;
            if !query.is_empty() {
                let outcome = service.fetch_available_members(query).await;
                ensure_loaded("candidate search", outcome)?;
            }
            print_json(&store.search_results())
        }
        Command::Add {
            project_id,
            employee_id,
            role,
        } => {
            select(&service, project_id).await?;
            let member = service
                .add_project_member(employee_id, &role)
                .await
                .map_err(io::Error::other)?;
            print_json(&member)
        }
        Command::Remove {
            project_id,
            project_member_id,
            reason,
        } => {
            select(&service, project_id).await?;
            service
                .remove_project_member(project_member_id, reason)
                .await
                .map_err(io::Error::other)?;
            print_json(&store.active_members())
        }
        Command::Modify {
            project_id,
            project_member_id,
            role,
        } => {
            select(&service, project_id).await?;
            service
                .modify_project_member(project_member_id, &role)
                .await
                .map_err(io::Error::other)?;
            print_json(&store.active_members())
        }
    }
}

async fn select(service: &ProjectMembershipService, project_id: ProjectId) -> io::Result<()> {
    let outcome = service.select_project(project_id).await;
    ensure_loaded("project members", outcome.project_members)?;
    ensure_loaded("candidate members", outcome.available_members)
}

fn ensure_loaded(what: &str, outcome: FetchOutcome) -> io::Result<()> {
    match outcome {
        FetchOutcome::Committed => Ok(()),
        other => Err(io::Error::other(format!(
            "could not load {what} ({other:?}); see the log for details"
        ))),
    }
}

fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    writeln!(stdout)
}
