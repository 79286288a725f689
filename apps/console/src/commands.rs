use std::io::{self, BufRead, Write};
use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use skmis_application::{
    AuditTrailQuery, DispatchOutcome, RecordListPage, SelectionScope,
};
use skmis_core::{AppError, AppResult, RecordId};
use skmis_domain::{ManagedRecord, RecordAction};
use skmis_infrastructure::{HttpGatewayConfig, HttpRecordGateway, TracingNotifier};
use tracing::{info, warn};

use crate::console_config::ConsoleConfig;
use crate::render;

/// Operator command parsed from the process arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Stats,
    Audit { page: u32 },
    Act { action: RecordAction, ids: Vec<RecordId> },
}

impl Command {
    pub fn parse(args: &[String]) -> AppResult<Self> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(Self::List);
        };

        match name.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(Self::List),
            "stats" => Ok(Self::Stats),
            "audit" => {
                let page = match rest.first() {
                    Some(value) => value.trim().parse::<u32>().map_err(|error| {
                        AppError::Validation(format!("invalid audit page '{value}': {error}"))
                    })?,
                    None => 1,
                };
                Ok(Self::Audit { page })
            }
            other => {
                let action = other.parse::<RecordAction>().map_err(|_| {
                    AppError::Validation(format!(
                        "unknown command '{name}'; expected list, stats, audit, archive, restore or delete"
                    ))
                })?;
                let ids = rest
                    .iter()
                    .map(|value| value.parse::<RecordId>())
                    .collect::<AppResult<Vec<_>>>()?;
                if ids.is_empty() {
                    return Err(AppError::Validation(format!(
                        "{} requires at least one record id",
                        action.as_str()
                    )));
                }
                Ok(Self::Act { action, ids })
            }
        }
    }
}

pub async fn run<R>(
    config: &ConsoleConfig,
    http_client: reqwest::Client,
    command: Command,
) -> AppResult<()>
where
    R: ManagedRecord + DeserializeOwned,
{
    let selection_scope = match command {
        Command::Act { .. } => SelectionScope::Filtered,
        _ => config.selection_scope,
    };
    let mut page = open_page::<R>(config, http_client, selection_scope)?;
    page.refresh().await?;

    match command {
        Command::List => {
            page.go_to_page(config.page);
            println!("{}", render::record_table(&page.visible_page(), Utc::now()));
        }
        Command::Stats => match page.statistics() {
            Some(statistics) => println!("{}", render::statistics(R::LABEL, statistics)),
            None => warn!(resource = R::RESOURCE, "statistics are unavailable"),
        },
        Command::Audit { page: audit_page } => {
            let query = AuditTrailQuery {
                page: audit_page,
                ..AuditTrailQuery::default()
            };
            let trail = page.load_audit_trail(&query).await?;
            println!("{}", render::audit_trail(&trail));
        }
        Command::Act { action, ids } => act(config, &mut page, action, &ids).await?,
    }

    Ok(())
}

fn open_page<R>(
    config: &ConsoleConfig,
    http_client: reqwest::Client,
    selection_scope: SelectionScope,
) -> AppResult<RecordListPage<R>>
where
    R: ManagedRecord + DeserializeOwned,
{
    let gateway = HttpRecordGateway::<R>::new(
        http_client,
        HttpGatewayConfig {
            bearer_token: config.api_token.clone(),
            ..HttpGatewayConfig::new(config.api_base_url.as_str())
        },
    )?;

    let mut page = RecordListPage::<R>::new(
        Arc::new(gateway),
        Arc::new(TracingNotifier::new()),
        config.current_user.clone(),
        config.list_page_config(selection_scope),
    )?;
    page.set_search_query(config.filters.search_query.clone());
    page.set_category_filter(config.filters.category.clone());
    page.set_status_filter(config.filters.status.clone());
    Ok(page)
}

async fn act<R: ManagedRecord>(
    config: &ConsoleConfig,
    page: &mut RecordListPage<R>,
    action: RecordAction,
    ids: &[RecordId],
) -> AppResult<()> {
    let dialog = match ids {
        [id] => page.request_action(action, *id)?.clone(),
        _ => {
            for id in ids {
                page.toggle_selection(*id)?;
            }
            page.request_bulk_action(action)?.clone()
        }
    };

    let skipped = ids.len().saturating_sub(dialog.target.len());
    if skipped > 0 {
        warn!(
            resource = R::RESOURCE,
            action = action.as_str(),
            skipped,
            "some selected records are not eligible and were left out"
        );
    }

    println!("{}\n{}", dialog.title, dialog.message);
    if !config.assume_yes && !prompt_confirmation(&dialog.confirm_text)? {
        page.cancel_confirmation();
        info!(resource = R::RESOURCE, action = action.as_str(), "action cancelled");
        return Ok(());
    }

    match page.confirm().await? {
        DispatchOutcome::Succeeded { count, .. } => {
            info!(
                resource = R::RESOURCE,
                action = action.as_str(),
                count,
                "action completed"
            );
            Ok(())
        }
        DispatchOutcome::Failed { message, .. } => Err(AppError::Internal(message)),
    }
}

fn prompt_confirmation(confirm_text: &str) -> AppResult<bool> {
    let mut stdout = io::stdout();
    write!(stdout, "{confirm_text}? [y/N] ")
        .and_then(|()| stdout.flush())
        .map_err(|error| AppError::Internal(format!("failed to write prompt: {error}")))?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|error| AppError::Internal(format!("failed to read confirmation: {error}")))?;

    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

#[cfg(test)]
mod tests {
    use skmis_core::{AppError, RecordId};
    use skmis_domain::RecordAction;

    use super::Command;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    #[test]
    fn no_arguments_lists() {
        assert!(matches!(Command::parse(&[]), Ok(Command::List)));
    }

    #[test]
    fn audit_page_defaults_to_first() {
        assert!(matches!(
            Command::parse(&args(&["audit"])),
            Ok(Command::Audit { page: 1 })
        ));
        assert!(matches!(
            Command::parse(&args(&["audit", "3"])),
            Ok(Command::Audit { page: 3 })
        ));
    }

    #[test]
    fn action_commands_collect_ids() {
        let command = Command::parse(&args(&["archive", "4", "9"]));
        assert_eq!(
            command.ok(),
            Some(Command::Act {
                action: RecordAction::Archive,
                ids: vec![RecordId::new(4), RecordId::new(9)],
            })
        );
    }

    #[test]
    fn action_without_ids_is_rejected() {
        assert!(matches!(
            Command::parse(&args(&["delete"])),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            Command::parse(&args(&["restore", "x"])),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            Command::parse(&args(&["publish", "1"])),
            Err(AppError::Validation(_))
        ));
    }
}
