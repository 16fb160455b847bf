//! Command-line parsing and dispatch.

use crate::app_state::AppState;
use chrono::Utc;
use eventify_catalog::{CatalogQuery, CategoryFilter, RegistrationForm, SortBy};
use eventify_common::{Context, EventifyError};
use serde::Serialize;
use tracing::debug;

pub const USAGE: &str = "\
usage: eventify-backend <command> [args]

commands:
  browse [--category <slug|all>] [--search <text>] [--sort <date|name>] [--page <n>]
  event <id>
  delete <id>
  favorites
  toggle-favorite <id>
  register <event-id> <name> <email> <phone>
  registrations [email]
  reset <store-key>
  config";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Browse { query: CatalogQuery, page: usize },
    Event(String),
    Delete(String),
    Favorites,
    ToggleFavorite(String),
    Register { event_id: String, form: RegistrationForm },
    Registrations(Option<String>),
    Reset(String),
    ShowConfig,
}

fn usage_error(message: impl Into<String>) -> EventifyError {
    EventifyError::ParseError(format!("{}\n\n{USAGE}", message.into()))
}

fn required(args: &mut impl Iterator<Item = String>, what: &str) -> Result<String, EventifyError> {
    args.next().ok_or_else(|| usage_error(format!("missing {what}")))
}

fn parse_browse(mut args: impl Iterator<Item = String>) -> Result<Command, EventifyError> {
    let mut query = CatalogQuery::default();
    let mut page = 1;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--category" => {
                let value = required(&mut args, "category")?;
                query.category = value
                    .parse::<CategoryFilter>()
                    .map_err(|e| usage_error(e.to_string()))?;
            }
            "--search" => query.search_term = required(&mut args, "search text")?,
            "--sort" => {
                let value = required(&mut args, "sort order")?;
                query.sort_by = value.parse::<SortBy>().map_err(usage_error)?;
            }
            "--page" => {
                let value = required(&mut args, "page number")?;
                page = value
                    .parse()
                    .map_err(|_| usage_error(format!("invalid page number: {value}")))?;
            }
            other => return Err(usage_error(format!("unknown option: {other}"))),
        }
    }

    Ok(Command::Browse { query, page })
}

/// Parse the arguments after the program name. No command means `browse`.
pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command, EventifyError> {
    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        return Ok(Command::Browse {
            query: CatalogQuery::default(),
            page: 1,
        });
    };

    let parsed = match command.as_str() {
        "browse" => parse_browse(args)?,
        "event" => Command::Event(required(&mut args, "event id")?),
        "delete" => Command::Delete(required(&mut args, "event id")?),
        "favorites" => Command::Favorites,
        "toggle-favorite" => Command::ToggleFavorite(required(&mut args, "event id")?),
        "register" => Command::Register {
            event_id: required(&mut args, "event id")?,
            form: RegistrationForm {
                name: required(&mut args, "name")?,
                email: required(&mut args, "email")?,
                phone: required(&mut args, "phone")?,
            },
        },
        "registrations" => Command::Registrations(args.next()),
        "reset" => Command::Reset(required(&mut args, "store key")?),
        "config" => Command::ShowConfig,
        other => return Err(usage_error(format!("unknown command: {other}"))),
    };
    debug!("Parsed command {:?}", parsed);
    Ok(parsed)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, EventifyError> {
    serde_json::to_string_pretty(value).context("rendering command output")
}

/// Run `command` and render its result as JSON.
pub fn run(state: &AppState, command: Command) -> Result<String, EventifyError> {
    let eventify = &state.eventify;
    match command {
        Command::Browse { query, page } => to_json(&eventify.browse(&query, page)?),
        Command::Event(id) => to_json(&eventify.event(&id)?),
        Command::Delete(id) => to_json(&serde_json::json!({
            "removed": eventify.delete_event(&id)?,
        })),
        Command::Favorites => to_json(&eventify.favorite_events()?),
        Command::ToggleFavorite(id) => to_json(&serde_json::json!({
            "id": id,
            "favorite": eventify.toggle_favorite(&id)?,
        })),
        Command::Register { event_id, form } => {
            to_json(&eventify.register(&event_id, &form, Utc::now())?)
        }
        Command::Registrations(Some(email)) => to_json(&eventify.registrations_for(&email)?),
        Command::Registrations(None) => to_json(&eventify.registrations()?),
        Command::Reset(key) => {
            eventify.reset_corrupted(&key)?;
            to_json(&serde_json::json!({ "reset": key }))
        }
        Command::ShowConfig => to_json(state.config.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventify_common::EventCategory;
    use eventify_config::{AppConfig, StorageBackend};

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    fn memory_state() -> AppState {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        AppState::new(config).unwrap()
    }

    #[test]
    fn test_no_arguments_browses_first_page() {
        assert_eq!(
            parse_args(Vec::new()).unwrap(),
            Command::Browse {
                query: CatalogQuery::default(),
                page: 1
            }
        );
    }

    #[test]
    fn test_browse_flags() {
        let command = parse_args(args("browse --category musica --sort name --page 2")).unwrap();
        assert_eq!(
            command,
            Command::Browse {
                query: CatalogQuery::new()
                    .category(CategoryFilter::Only(EventCategory::Music))
                    .sort_by(SortBy::Name),
                page: 2
            }
        );
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse_args(args("browse --page two")).is_err());
        assert!(parse_args(args("browse --category cinema")).is_err());
        assert!(parse_args(args("event")).is_err());
        assert!(parse_args(args("launch")).is_err());
    }

    #[test]
    fn test_run_browse_and_toggle() {
        let state = memory_state();

        let page = run(&state, parse_args(args("browse --page 2")).unwrap()).unwrap();
        let page: serde_json::Value = serde_json::from_str(&page).unwrap();
        assert_eq!(page["totalItems"], 8);
        assert_eq!(page["items"].as_array().unwrap().len(), 2);

        let toggled = run(&state, Command::ToggleFavorite("1".to_string())).unwrap();
        assert!(toggled.contains("\"favorite\": true"));
    }

    #[test]
    fn test_run_register() {
        let state = memory_state();
        let command = parse_args(args("register 2 Ana ana@example.com 11-99999-0000")).unwrap();
        let output = run(&state, command).unwrap();
        let outcome: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(outcome["duplicate"], false);
        assert_eq!(outcome["registration"]["eventId"], "2");
    }

    #[test]
    fn test_unrenderable_output_is_an_internal_error() {
        let value = std::collections::BTreeMap::from([((1, 2), "tuple keys")]);
        let err = to_json(&value).unwrap_err();

        assert!(matches!(err, EventifyError::InternalError(_)));
        assert!(err
            .to_string()
            .starts_with("Internal error: rendering command output: "));
    }
}
