//! GSB command-line client

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gsb_client::{GsbClient, NameCheck};
use gsb_core::config::ClientConfig;
use gsb_core::pagination::PageWindow;
use gsb_grid::build_columns;
use gsb_models::WorkflowRequest;

mod args;

use args::{build_query, parse_value, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let mut config = ClientConfig::load(cli.config.as_deref().and_then(|p| p.to_str()))
        .context("Failed to load configuration")?;
    if let Some(base_url) = cli.base_url.clone() {
        config.api.base_url = base_url;
    }
    if let Some(tenant) = cli.tenant.clone() {
        config.api.tenant_code = Some(tenant);
    }

    debug!(base_url = %config.api.base_url, "Connecting");
    let client = GsbClient::new(config).context("Failed to create client")?;

    run(&client, cli.command).await
}

async fn run(client: &GsbClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Token => {
            let session = client.auth().login().await?;
            println!("{}", session.token);
        }

        Command::EntityDef { name, columns } => {
            let service = client.entity_defs();
            let def = service.get(&name).await?;
            if columns {
                let columns = build_columns(&def, &service).await;
                print_json(&columns)?;
            } else {
                print_json(&def)?;
            }
        }

        Command::Query {
            ent_def_name,
            predicates,
            select,
            sort,
            filter,
            page,
            per_page,
        } => {
            let per_page = per_page.unwrap_or(client.config().query.default_page_size);
            let query = build_query(
                &ent_def_name,
                &predicates,
                &select,
                sort.as_deref(),
                filter.as_deref(),
                PageWindow::from_page(page, per_page),
            )?;

            let result = client.entities().query(&query).await?;
            info!(rows = result.len(), total = result.total(), "Query finished");
            print_json(&result)?;
        }

        Command::Get { ent_def_name, id } => {
            let entity = client.entities().get(&ent_def_name, &id).await?;
            print_json(&entity)?;
        }

        Command::Delete { ent_def_name, id } => {
            client.entities().delete(&ent_def_name, &id).await?;
            info!(ent_def_name = %ent_def_name, id = %id, "Deleted");
        }

        Command::Workflow {
            action,
            workflow_code,
            input,
            instance,
            function,
        } => {
            let mut request = WorkflowRequest::new(workflow_code);
            if let Some(input) = input {
                request = request.with_input(parse_value(&input));
            }
            if let Some(instance) = instance {
                request = request.for_instance(instance);
            }
            if let Some(function) = function {
                request = request.with_function(function);
            }

            let response = client.workflows().execute(action, &request).await?;
            print_json(&response)?;
        }

        Command::CheckName { name } => {
            let outcome = client.name_checker().check(&name).await?;
            let message = match outcome {
                NameCheck::Invalid(reason) => format!("'{}' is invalid: {}", name, reason),
                NameCheck::Available => format!("'{}' is available", name),
                NameCheck::Taken => format!("'{}' is already taken", name),
                NameCheck::Superseded => format!("check for '{}' was superseded", name),
            };
            println!("{}", message);
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let value: Value = serde_json::to_value(value)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Initialize tracing/logging
///
/// Logs go to stderr so command output stays pipeable.
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,gsb=info,gsb_client=info".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
