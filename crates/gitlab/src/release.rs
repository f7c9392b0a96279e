//! Package registry and release helpers on top of [`GLab`].

use std::path::Path;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::{ExecOptions, GLab, GitLabError, ci};

/// A package in the project registry, as returned by the packages API.
#[derive(Debug, Clone, Deserialize)]
pub struct Package {
    pub id: u64,
    pub name: String,
    pub package_type: String,
    pub version: String,
}

/// One downloadable file of a package.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageAsset {
    pub file_name: String,
    pub url: String,
}

/// An asset link attached to a release, in the shape
/// `glab release create --assets-links` expects.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseAssetLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct PackageFile {
    file_name: String,
}

#[derive(Debug, Deserialize)]
struct ProjectData {
    id: u64,
}

impl GLab {
    /// Returns the highest-versioned package with the given name, or `None`
    /// when the registry has no match. Versions are compared as semver,
    /// not as the registry's string order.
    pub async fn latest_package(&self, package_name: &str) -> Result<Option<Package>, GitLabError> {
        let endpoint = format!(
            "/projects/:id/packages?order_by=version&sort=desc&package_name={package_name}"
        );
        let output = self
            .exec(&["api", &endpoint, "--paginate"], &ExecOptions::default())
            .await?;

        if output.stdout.trim().is_empty() {
            return Ok(None);
        }

        let packages: Vec<Package> = serde_json::from_str(&output.stdout)?;
        if packages.is_empty() {
            tracing::debug!(package_name, "no packages found");
            return Ok(None);
        }

        newest_by_version(packages).map(Some)
    }

    /// Lists the downloadable assets of a package with their direct URLs.
    pub async fn package_assets(&self, package: &Package) -> Result<Vec<PackageAsset>, GitLabError> {
        // The packages API never echoes the project id back, so outside CI
        // it has to be fetched separately.
        let project_id = if ci::is_ci() {
            ci::project_id()
        } else {
            self.project_data().await?.id
        };

        let base_url = format!(
            "https://{}/api/v4/projects/{}/packages/{}/{}/{}",
            self.hostname(),
            project_id,
            package.package_type,
            package.name,
            package.version
        );

        let endpoint = format!("/projects/:id/packages/{}/package_files", package.id);
        let output = self
            .exec(&["api", &endpoint, "--paginate"], &ExecOptions::default())
            .await?;

        let files: Vec<PackageFile> = serde_json::from_str(&output.stdout)?;
        Ok(files
            .into_iter()
            .map(|file| PackageAsset {
                url: format!("{base_url}/{}", file.file_name),
                file_name: file.file_name,
            })
            .collect())
    }

    /// Uploads a file to the generic package registry.
    ///
    /// The file lands at the package root under its own name unless
    /// `path_in_registry` says otherwise.
    pub async fn upload_generic_package(
        &self,
        package_name: &str,
        version: &str,
        file_path: &Path,
        path_in_registry: Option<&str>,
    ) -> Result<(), GitLabError> {
        let registry_path = match path_in_registry {
            Some(path) => path.to_string(),
            None => file_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };

        tracing::info!(
            package_name,
            version,
            file = %file_path.display(),
            "uploading generic package"
        );

        let endpoint =
            format!("/projects/:id/packages/generic/{package_name}/{version}/{registry_path}");
        self.exec(
            &[
                "api",
                &endpoint,
                "-X",
                "PUT",
                "--input",
                &file_path.to_string_lossy(),
            ],
            &ExecOptions::default(),
        )
        .await?;

        Ok(())
    }

    /// Creates a release tagged `release_version` with the given asset
    /// links. The title defaults to `Release <version>`.
    pub async fn create_release(
        &self,
        release_version: &str,
        assets: &[ReleaseAssetLink],
        title: Option<&str>,
        release_notes_path: Option<&Path>,
        additional_args: &[String],
    ) -> Result<(), GitLabError> {
        tracing::info!(release_version, assets = assets.len(), "creating release");

        let cmd = release_create_command(
            release_version,
            assets,
            title,
            release_notes_path,
            additional_args,
        )?;

        self.exec(
            &cmd,
            &ExecOptions {
                echo_stderr: true,
                ..ExecOptions::default()
            },
        )
        .await?;

        Ok(())
    }

    async fn project_data(&self) -> Result<ProjectData, GitLabError> {
        let output = self
            .exec(&["api", "projects/:id"], &ExecOptions::default())
            .await?;
        Ok(serde_json::from_str(&output.stdout)?)
    }
}

fn newest_by_version(packages: Vec<Package>) -> Result<Package, GitLabError> {
    let mut keyed = packages
        .into_iter()
        .map(|package| Ok((Version::parse(&package.version)?, package)))
        .collect::<Result<Vec<_>, GitLabError>>()?;

    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    // Non-empty by the caller's check.
    let (_, newest) = keyed.remove(keyed.len() - 1);
    Ok(newest)
}

fn release_create_command(
    release_version: &str,
    assets: &[ReleaseAssetLink],
    title: Option<&str>,
    release_notes_path: Option<&Path>,
    additional_args: &[String],
) -> Result<Vec<String>, GitLabError> {
    let mut cmd = vec![
        "release".to_string(),
        "create".to_string(),
        release_version.to_string(),
    ];

    if !assets.is_empty() {
        cmd.push(format!("--assets-links={}", serde_json::to_string(assets)?));
    }

    cmd.push("-n".to_string());
    match title {
        Some(title) => cmd.push(title.to_string()),
        None => cmd.push(format!("Release {release_version}")),
    }

    if let Some(notes) = release_notes_path {
        cmd.push("-F".to_string());
        let notes = std::path::absolute(notes).unwrap_or_else(|_| notes.to_path_buf());
        cmd.push(notes.to_string_lossy().into_owned());
    }

    cmd.extend_from_slice(additional_args);

    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(version: &str) -> Package {
        Package {
            id: 1,
            name: "game-win64".to_string(),
            package_type: "generic".to_string(),
            version: version.to_string(),
        }
    }

    #[test]
    fn newest_package_is_picked_by_semver_not_string_order() {
        // String order would pick "1.9.0" over "1.10.0".
        let newest =
            newest_by_version(vec![package("1.9.0"), package("1.10.0"), package("1.2.3")])
                .unwrap();
        assert_eq!(newest.version, "1.10.0");
    }

    #[test]
    fn non_semver_version_is_an_error() {
        let result = newest_by_version(vec![package("not-a-version")]);
        assert!(matches!(result, Err(GitLabError::Version(_))));
    }

    #[test]
    fn release_command_defaults_the_title() {
        let cmd = release_create_command("1.2.3", &[], None, None, &[]).unwrap();
        assert_eq!(cmd[..3], ["release", "create", "1.2.3"]);
        let n = cmd.iter().position(|a| a == "-n").unwrap();
        assert_eq!(cmd[n + 1], "Release 1.2.3");
    }

    #[test]
    fn release_command_serializes_asset_links() {
        let assets = vec![ReleaseAssetLink {
            name: "game.zip".to_string(),
            url: "https://example.com/game.zip".to_string(),
        }];
        let cmd = release_create_command("1.0.0", &assets, Some("First"), None, &[]).unwrap();

        let links = cmd
            .iter()
            .find(|a| a.starts_with("--assets-links="))
            .unwrap();
        assert!(links.contains(r#""name":"game.zip""#));
        assert!(cmd.contains(&"First".to_string()));
    }

    #[test]
    fn release_command_appends_additional_args() {
        let extra = vec!["--milestone".to_string(), "v1".to_string()];
        let cmd = release_create_command("1.0.0", &[], None, None, &extra).unwrap();
        assert_eq!(cmd[cmd.len() - 2..], ["--milestone", "v1"]);
    }
}
