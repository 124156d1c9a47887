use std::path::Path;

use tokio::process::Command;

use super::plan::Plan;
use crate::error::TerraportError;

const TERRAFORM_BIN: &str = "terraform";

/// Loads a plan either from pre-rendered JSON or by running
/// `terraform show -json` against a binary plan file from the current
/// directory, which must be the initialised Terraform root.
pub async fn load_plan(planfile: &Path) -> Result<Plan, TerraportError> {
    let root = std::env::current_dir()?;
    load_plan_in(planfile, &root).await
}

/// Like [`load_plan`], with `root` as the Terraform working directory. The
/// plan file itself may live anywhere.
pub async fn load_plan_in(planfile: &Path, root: &Path) -> Result<Plan, TerraportError> {
    let bytes = match tokio::fs::read(planfile).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(TerraportError::PlanNotFound(planfile.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    if looks_like_json(&bytes) {
        tracing::debug!(planfile = %planfile.display(), "reading plan as JSON");
        return Ok(serde_json::from_slice(&bytes)?);
    }

    ensure_initialised(root).await?;

    let json = show_json(planfile, root).await?;
    Ok(Plan::from_json(&json)?)
}

/// Fails unless `terraform init` has been run in `dir`.
pub async fn ensure_initialised(dir: &Path) -> Result<(), TerraportError> {
    match tokio::fs::metadata(dir.join(".terraform")).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        _ => Err(TerraportError::NotInitialised(dir.to_path_buf())),
    }
}

async fn show_json(planfile: &Path, dir: &Path) -> Result<String, TerraportError> {
    let planfile = std::path::absolute(planfile)?;
    tracing::info!(planfile = %planfile.display(), "running terraform show -json");

    let output = Command::new(TERRAFORM_BIN)
        .arg("show")
        .arg("-json")
        .arg(&planfile)
        .current_dir(dir)
        .output()
        .await?;

    if !output.status.success() {
        return Err(TerraportError::TerraformFailed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn looks_like_json(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}
