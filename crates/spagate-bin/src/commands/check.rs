// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `check` command.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use spagate_config::GuardConfig;
use spagate_core::{KeyValueSessionStore, MemoryBackend, Outcome, SessionStore};
use spagate_web::{GuardContext, GuardOptions, Notifier, RoleGuard, TracingNavigator};

use crate::cli::{CheckArgs, Cli, OutputFormat};
use crate::error::{BinError, BinResult};

/// Collects notices so they can be printed with the decision.
#[derive(Default)]
struct CollectingNotifier {
    messages: Mutex<Vec<String>>,
}

impl Notifier for CollectingNotifier {
    fn error(&self, message: &str) {
        tracing::debug!(notice = %message, "Guard notice");
        self.messages.lock().push(message.to_string());
    }
}

/// Runs the page guard against a token held in a fresh in-memory session.
pub fn check(_cli: &Cli, config: &GuardConfig, args: CheckArgs) -> BinResult<()> {
    let now = parse_instant(args.at.as_deref())?;

    let store = Arc::new(KeyValueSessionStore::with_keys(
        MemoryBackend::new(),
        config.storage.keys(),
    ));
    if let Some(token) = &args.token {
        store
            .write_token(token)
            .map_err(|e| BinError::runtime(e.to_string()))?;
    }

    let notifier = Arc::new(CollectingNotifier::default());
    let ctx = GuardContext::from_config(
        config,
        store.clone(),
        Arc::new(TracingNavigator),
        notifier.clone(),
    );
    let guard = RoleGuard::new(args.roles.clone(), ctx, GuardOptions::default());
    let evaluation = guard.mount_at(now);
    let decision = guard.decision();
    let session_cleared = args.token.is_some() && store.read_token().is_none();
    let notices = notifier.messages.lock().clone();

    match args.format {
        OutputFormat::Text => {
            let permitted = if args.roles.is_empty() {
                "any signed-in role".to_string()
            } else {
                args.roles
                    .iter()
                    .map(|r| r.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            println!("Page admits: {}", permitted);
            println!("Evaluated at: {}", now.to_rfc3339());
            println!();
            println!(
                "  Role:       {}",
                decision.role.map(|r| r.as_str()).unwrap_or("-")
            );
            println!("  Authorized: {}", decision.is_authorized);
            match &evaluation.outcome {
                Outcome::Granted => println!("  Outcome:    granted"),
                Outcome::Redirect { to, reason, .. } => {
                    println!("  Outcome:    redirect to {}", to);
                    println!("  Reason:     {} ({})", reason.code(), reason);
                    println!("  Cleared:    {}", session_cleared);
                }
            }
            for notice in &notices {
                println!("  Notice:     {}", notice);
            }
        }
        OutputFormat::Json => {
            let reason = evaluation.outcome.reason();
            let output = serde_json::json!({
                "decision": decision,
                "redirect": evaluation.outcome.redirect_target(),
                "reason": reason.map(|r| r.code()),
                "kind": reason.map(|r| format!("{:?}", r.kind()).to_lowercase()),
                "session_cleared": session_cleared,
                "notices": notices,
                "evaluated_at": now.to_rfc3339(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn parse_instant(raw: Option<&str>) -> BinResult<DateTime<Utc>> {
    match raw {
        None => Ok(Utc::now()),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(|e| BinError::invalid_argument(format!("--at '{}': {}", raw, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instant() {
        let at = parse_instant(Some("2024-01-01T00:00:00Z")).unwrap();
        assert_eq!(at.timestamp(), 1_704_067_200);
        assert!(parse_instant(Some("yesterday")).is_err());
        assert!(parse_instant(None).is_ok());
    }
}
