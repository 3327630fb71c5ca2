//! Document commands: upload a reference file, clear the collection.
//!
//! Both return whether the backend accepted the request so the caller can
//! choose an exit code; configuration and I/O problems are errors.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use dialoguer::Confirm;

use laws_core::chat::status;
use laws_core::documents::service::normalize_category;
use laws_core::documents::{DocumentOutcome, DocumentReport};
use laws_infra::filesystem::read_upload;

use crate::cli::{print_alerts, print_status, spinner};
use crate::state::AppState;

/// Upload `path` under `category`.
///
/// A path that does not exist is reported like an empty file picker rather
/// than as an error.
///
/// # Examples
///
/// ```bash
/// laws upload tenancy-act.pdf --category tenancy
/// ```
pub async fn upload_document(
    state: &AppState,
    path: &Path,
    category: &str,
    json: bool,
) -> Result<bool> {
    let endpoints = state
        .config
        .upload_endpoints()
        .context("Set LAWS_UPLOAD_URL or upload_url in config.toml")?;

    let file = match read_upload(path).await {
        Ok(file) => Some(file),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let progress = (!json).then(|| spinner(status::UPLOADING));
    let report = state.documents().upload(&endpoints, category, file).await;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    print_report(&report, json, serde_json::json!({
        "file": path.display().to_string(),
        "category": normalize_category(category),
    }))?;
    Ok(report.succeeded())
}

/// Ask the backend to drop every uploaded document.
///
/// Prompts for confirmation unless `yes` is set or output is JSON.
pub async fn clear_collection(state: &AppState, yes: bool, json: bool) -> Result<bool> {
    let delete_url = state
        .config
        .delete_url()
        .context("Set LAWS_DELETE_URL or delete_url in config.toml")?;

    if !yes && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove {} uploaded documents from the collection?",
                style("all").red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(true);
        }
    }

    let progress = (!json).then(|| spinner("Clearing documents..."));
    let report = state.documents().clear_collection(&delete_url).await;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    print_report(&report, json, serde_json::json!({ "url": delete_url }))?;
    Ok(report.succeeded())
}

fn print_report(report: &DocumentReport, json: bool, mut extra: serde_json::Value) -> Result<()> {
    if json {
        let error = match &report.outcome {
            DocumentOutcome::Failed(e) => Some(e.to_string()),
            _ => None,
        };
        if let Some(map) = extra.as_object_mut() {
            map.insert("ok".into(), report.succeeded().into());
            map.insert("status".into(), report.status.clone().into());
            map.insert("error".into(), error.into());
        }
        println!("{}", serde_json::to_string_pretty(&extra)?);
        return Ok(());
    }

    println!();
    print_status(&report.status, report.succeeded());
    if let DocumentOutcome::Failed(e) = &report.outcome {
        println!("  {}", style(e).dim());
    }
    print_alerts(&report.effects);
    println!();
    Ok(())
}
