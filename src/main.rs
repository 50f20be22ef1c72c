use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cyberlearn_content::cli::{AdminAction, Cli, Command, parse_kind};
use cyberlearn_content::editor::{self, EditOutcome};
use cyberlearn_content::error::{ServiceError, ServiceResult};
use cyberlearn_content::mirror::{Mirror, default_data_dir};
use cyberlearn_content::progress::ProgressLedger;
use cyberlearn_content::remote::{OfflineCatalog, RemoteCatalog, create_remote_catalog};
use cyberlearn_content::render;
use cyberlearn_content::store::ContentStore;
use cyberlearn_content::types::{ContentItem, Role};
use cyberlearn_content::{ids, metadata};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli.globals.validate() {
        eprintln!("{} {e}", "error:".red());
        return ExitCode::from(2);
    }
    let role = match cli.globals.role() {
        Ok(role) => role,
        Err(e) => {
            eprintln!("{} {e}", "error:".red());
            return ExitCode::from(2);
        }
    };

    let data_dir = cli
        .globals
        .data_dir
        .clone()
        .unwrap_or_else(default_data_dir);
    let mirror = Mirror::at_dir(&data_dir);
    let remote: Arc<dyn RemoteCatalog> = match &cli.globals.remote_url {
        Some(url) => match create_remote_catalog(url, cli.globals.api_key.clone()) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                eprintln!("{} {e}", "error:".red());
                return ExitCode::from(2);
            }
        },
        None => Arc::new(OfflineCatalog),
    };

    let mut store = ContentStore::new(mirror, remote);
    store.load().await;

    match run(cli.command, &mut store, role, &data_dir).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red());
            ExitCode::FAILURE
        }
    }
}

async fn run(
    command: Command,
    store: &mut ContentStore,
    role: Role,
    data_dir: &std::path::Path,
) -> ServiceResult<()> {
    match command {
        Command::List { kind } => {
            let out = match kind {
                Some(kind) => {
                    let kind = parse_kind(&kind).map_err(ServiceError::Other)?;
                    let filtered: Vec<ContentItem> =
                        store.items_of_type(kind).cloned().collect();
                    render::render_catalog(&filtered, role)
                }
                None => render::render_catalog(store.items(), role),
            };
            print!("{out}");
        }
        Command::Show { kind, slug } => {
            let kind = parse_kind(&kind).map_err(ServiceError::Other)?;
            let ledger = ProgressLedger::open(data_dir);
            print!("{}", render::render_detail(store.find(kind, &slug), role, &ledger));
        }
        Command::Complete { lesson_id } => {
            let mut ledger = ProgressLedger::open(data_dir);
            // the ledger is item-agnostic; a known lesson just gets a nicer echo
            let known = store
                .items()
                .iter()
                .find_map(|i| i.find_lesson(&lesson_id).map(|l| l.title.clone()));
            ledger.mark_complete(&lesson_id);
            match known {
                Some(title) => println!("Marked '{title}' complete."),
                None => println!("Marked {lesson_id} complete."),
            }
        }
        Command::Progress { kind, slug } => {
            let kind = parse_kind(&kind).map_err(ServiceError::Other)?;
            let ledger = ProgressLedger::open(data_dir);
            print!("{}", render::render_progress(store.find(kind, &slug), role, &ledger));
        }
        Command::Sync => {
            print!("{}", render::render_sync_report(store));
        }
        Command::Admin { action } => {
            run_admin(action, store, role).await?;
        }
        Command::Version => {
            println!(
                "{} {} (seed catalog v{})",
                metadata::PKG_NAME,
                metadata::PKG_VERSION,
                cyberlearn_content::catalog::CATALOG_VERSION
            );
        }
    }
    Ok(())
}

async fn run_admin(action: AdminAction, store: &mut ContentStore, role: Role) -> ServiceResult<()> {
    // The store enforces this again; failing here keeps interactive flows
    // from starting at all for non-admins.
    if !role.is_admin() {
        return Err(ServiceError::Unauthorized(
            "admin commands require the admin role".to_string(),
        ));
    }

    match action {
        AdminAction::New { kind, fields } => {
            let kind = parse_kind(&kind).map_err(ServiceError::Other)?;
            let item = if let Some(title) = &fields.title {
                let mut item = ContentItem::new(ids::new_item_id(kind), kind, title.clone());
                fields
                    .apply(&mut item)
                    .map_err(ServiceError::Other)?;
                item
            } else {
                editor::create_item_interactive(kind)?
            };
            let item = store.upsert(role, item).await?;
            println!("Created {} ({})", item.title, item.id);
        }
        AdminAction::Edit { kind, slug } => {
            let kind = parse_kind(&kind).map_err(ServiceError::Other)?;
            let Some(original) = store.find(kind, &slug) else {
                return Err(ServiceError::NotFound(slug));
            };
            match editor::edit_item_interactive(original)? {
                EditOutcome::Commit(item) => {
                    let item = store.upsert(role, item).await?;
                    println!("Saved {}.", item.title);
                }
                EditOutcome::Discard => println!("Discarded changes."),
            }
        }
        AdminAction::Set { kind, slug, fields } => {
            let kind = parse_kind(&kind).map_err(ServiceError::Other)?;
            let Some(original) = store.find(kind, &slug) else {
                return Err(ServiceError::NotFound(slug));
            };
            let mut item = original.clone();
            fields
                .apply(&mut item)
                .map_err(ServiceError::Other)?;
            let item = store.upsert(role, item).await?;
            println!("Updated {}.", item.title);
        }
        AdminAction::Delete { kind, slug, yes } => {
            let kind = parse_kind(&kind).map_err(ServiceError::Other)?;
            let Some(item) = store.find(kind, &slug) else {
                return Err(ServiceError::NotFound(slug));
            };
            let (id, title) = (item.id.clone(), item.title.clone());
            if !yes {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete '{title}'?"))
                    .default(false)
                    .interact()
                    .map_err(|e| ServiceError::Other(e.to_string()))?;
                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }
            store.delete(role, &id).await?;
            println!("Deleted {title}.");
        }
    }

    // the remote phase is best effort; surface a sync warning inline
    if let Some(warning) = store.error() {
        eprintln!("{} {warning}", "warning:".yellow());
    }
    Ok(())
}
