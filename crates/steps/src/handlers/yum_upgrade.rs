// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upgrade an RPM package via yum; rollback downgrades to the version
//! snapshotted at execute time.
//!
//! This is the canonical metadata-driven compensation: the pre-upgrade
//! `VERSION-RELEASE` is captured into execution metadata, and rollback
//! cannot downgrade without it.

use async_trait::async_trait;
use ripple_core::ExecutionMetadata;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::process::Command;

use crate::handler::{HandlerError, StepHandler};
use crate::schema::YUM_UPGRADE_SCHEMA;

/// Metadata key carrying the pre-upgrade `VERSION-RELEASE`.
pub const PREVIOUS_VERSION_KEY: &str = "previous_version";

#[derive(Debug, Clone, Deserialize)]
pub struct YumUpgradeParams {
    pub package: String,
    pub version: String,
}

pub struct YumUpgradeHandler {
    /// Binaries are configurable so tests can substitute recording stubs.
    rpm_bin: String,
    yum_bin: String,
}

impl Default for YumUpgradeHandler {
    fn default() -> Self {
        Self { rpm_bin: "rpm".to_string(), yum_bin: "yum".to_string() }
    }
}

impl YumUpgradeHandler {
    pub fn with_binaries(rpm_bin: impl Into<String>, yum_bin: impl Into<String>) -> Self {
        Self { rpm_bin: rpm_bin.into(), yum_bin: yum_bin.into() }
    }

    /// Installed `VERSION-RELEASE` of a package, per rpm.
    async fn installed_version(&self, package: &str) -> Result<String, HandlerError> {
        let output = Command::new(&self.rpm_bin)
            .args(["-q", package, "--queryformat", "%{VERSION}-%{RELEASE}"])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| HandlerError::failed(format!("rpm query failed to start: {err}")))?;

        if !output.status.success() {
            return Err(HandlerError::failed(format!(
                "rpm query failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn yum(&self, subcommand: &str, full_package: &str) -> Result<String, HandlerError> {
        let output = Command::new(&self.yum_bin)
            .args([subcommand, "-y", full_package])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| {
                HandlerError::failed(format!("yum {subcommand} failed to start: {err}"))
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(HandlerError::failed(format!(
                "yum {subcommand} failed: {}, output: {}",
                output.status,
                combined.trim()
            )));
        }
        Ok(combined)
    }
}

#[async_trait]
impl StepHandler for YumUpgradeHandler {
    async fn execute(
        &self,
        params: &Map<String, Value>,
    ) -> Result<ExecutionMetadata, HandlerError> {
        let p: YumUpgradeParams = YUM_UPGRADE_SCHEMA.parse(params)?;
        tracing::info!(package = %p.package, version = %p.version, "starting yum upgrade");

        let mut metadata = ExecutionMetadata::new();

        // Snapshot the installed version so rollback can downgrade.
        match self.installed_version(&p.package).await {
            Ok(previous) => {
                tracing::info!(
                    package = %p.package,
                    current_version = %previous,
                    "captured current version for rollback"
                );
                metadata.insert(PREVIOUS_VERSION_KEY.to_string(), Value::String(previous));
            }
            Err(err) => {
                tracing::warn!(package = %p.package, error = %err, "could not get current version");
            }
        }

        let full_package = format!("{}-{}", p.package, p.version);
        let output = self.yum("upgrade", &full_package).await?;
        tracing::info!(output = %output.trim(), "yum upgrade completed");

        Ok(metadata)
    }

    async fn rollback(
        &self,
        params: &Map<String, Value>,
        metadata: Option<&ExecutionMetadata>,
    ) -> Result<(), HandlerError> {
        let p: YumUpgradeParams = YUM_UPGRADE_SCHEMA.parse(params)?;

        let previous_version = metadata
            .and_then(|m| m.get(PREVIOUS_VERSION_KEY))
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty());
        let Some(previous_version) = previous_version else {
            tracing::warn!(package = %p.package, "no previous version captured, cannot rollback");
            return Err(HandlerError::failed("no previous version available for rollback"));
        };

        tracing::info!(
            package = %p.package,
            target_version = %previous_version,
            "starting rollback for package"
        );

        // Skip the downgrade when the package is already at the target.
        match self.installed_version(&p.package).await {
            Ok(current) if current == previous_version => {
                tracing::info!(
                    package = %p.package,
                    version = %current,
                    "package already at target version, no rollback needed"
                );
                return Ok(());
            }
            Ok(current) => {
                tracing::info!(
                    package = %p.package,
                    current_version = %current,
                    target_version = %previous_version,
                    "package version differs from target, proceeding with rollback"
                );
            }
            Err(err) => {
                tracing::warn!(
                    package = %p.package,
                    error = %err,
                    "could not query current package version, attempting rollback anyway"
                );
            }
        }

        let full_package = format!("{}-{}", p.package, previous_version);
        let output = self.yum("downgrade", &full_package).await?;
        tracing::info!(output = %output.trim(), "yum downgrade completed");

        // Verify the downgrade landed on the expected version.
        if let Ok(final_version) = self.installed_version(&p.package).await {
            if final_version == previous_version {
                tracing::info!(
                    package = %p.package,
                    version = %final_version,
                    "rollback verified successful"
                );
            } else {
                tracing::warn!(
                    package = %p.package,
                    expected_version = %previous_version,
                    actual_version = %final_version,
                    "rollback may not have succeeded"
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "yum_upgrade_tests.rs"]
mod tests;
