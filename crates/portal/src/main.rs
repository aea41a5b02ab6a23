//! `storefront-check` -- print a tenant's storefront readiness.
//!
//! Loads the published and draft snapshots through the platform API, merges
//! them exactly like the editor does and prints the publish readiness
//! report with the public preview as JSON.
//!
//! # Environment variables
//!
//! | Variable                      | Required | Default                 |
//! |-------------------------------|----------|-------------------------|
//! | `STOREFRONT_TENANT_ID`        | yes      | --                      |
//! | `STOREFRONT_API_URL`          | no       | `http://localhost:3000` |
//! | `STOREFRONT_API_TIMEOUT_SECS` | no       | `30`                    |

use std::sync::Arc;

use anyhow::Context;
use storefront_client::api::StorefrontApi;
use storefront_client::config::ClientConfig;
use storefront_core::tenant::TenantContext;
use storefront_portal::editor::StorefrontEditor;
use storefront_portal::report::CheckReport;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_portal=info,storefront_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let tenant_id: i64 = std::env::var("STOREFRONT_TENANT_ID")
        .context("STOREFRONT_TENANT_ID environment variable is required")?
        .trim()
        .parse()
        .context("STOREFRONT_TENANT_ID must be a valid integer")?;
    let tenant = TenantContext::new(tenant_id)?;

    let config = ClientConfig::from_env().validated()?;
    tracing::info!(api_url = %config.api_url, %tenant, "Checking storefront");

    let api = StorefrontApi::new(&config)?;
    let editor = StorefrontEditor::load(tenant, Arc::new(api)).await?;

    let report = CheckReport::from_editor(&editor).await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
