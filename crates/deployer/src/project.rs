// Project lookup, provisioning and storage grants

use crate::api::{CreatedProject, Filter, ProjectList, Request};
use crate::error::{DeployError, Result};
use crate::model::{Project, TempStorageGrant};
use crate::session::Session;

const PROVIDER_UPLOAD: &str = "Upload";
const CHANNEL_CUSTOM: &str = "Custom";
const AREA_GLOBAL: &str = "global";

impl Session {
    /// Find a project by exact name. The first match wins when several exist.
    pub async fn find_project(&self, name: &str) -> Result<Option<Project>> {
        let projects = self.describe_projects(Filter::new("Name", name)).await?;
        if projects.len() > 1 {
            tracing::warn!(
                name,
                matches = projects.len(),
                "Ambiguous project name, using first match"
            );
        }
        Ok(projects.into_iter().next())
    }

    /// Fresh read of a project by id
    pub async fn find_project_by_id(&self, project_id: &str) -> Result<Option<Project>> {
        let projects = self
            .describe_projects(Filter::new("ProjectId", project_id))
            .await?;
        Ok(projects.into_iter().next())
    }

    /// Provision a new upload project named `name`
    pub async fn create_project(&self, name: &str) -> Result<Project> {
        let request = Request::CreatePagesProject {
            name: name.to_string(),
            provider: PROVIDER_UPLOAD.to_string(),
            channel: CHANNEL_CUSTOM.to_string(),
            area: AREA_GLOBAL.to_string(),
        };

        let created: CreatedProject = self.api.call(&request).await?;
        let project_id = created
            .project_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DeployError::ProjectCreation(name.to_string()))?;

        tracing::info!(name, project_id = %project_id, "Created project");
        Ok(Project {
            project_id,
            name: name.to_string(),
            area: AREA_GLOBAL.to_string(),
            custom_domains: Vec::new(),
            preset_domain: String::new(),
        })
    }

    /// Reuse the project named by the hint, or create one.
    ///
    /// Without a hint the session's temporary name is used for the new project.
    pub async fn resolve_or_create_project(&self, name_hint: Option<&str>) -> Result<String> {
        if let Some(name) = name_hint {
            if let Some(project) = self.find_project(name).await? {
                tracing::info!(name, project_id = %project.project_id, "Reusing project");
                return Ok(project.project_id);
            }
        }

        let name = name_hint.unwrap_or(self.temp_project_name());
        Ok(self.create_project(name).await?.project_id)
    }

    /// Obtain upload credentials.
    ///
    /// A hint must name an existing project; without one the grant is scoped
    /// to the session's temporary project name.
    pub async fn temp_storage_grant(&self, name_hint: Option<&str>) -> Result<TempStorageGrant> {
        let request = match name_hint {
            Some(name) => {
                let project = self
                    .find_project(name)
                    .await?
                    .ok_or_else(|| DeployError::ProjectNotFound(name.to_string()))?;
                Request::DescribePagesCosTempToken {
                    project_id: Some(project.project_id),
                    project_name: None,
                }
            }
            None => Request::DescribePagesCosTempToken {
                project_id: None,
                project_name: Some(self.temp_project_name().to_string()),
            },
        };

        self.api
            .call(&request)
            .await
            .map_err(|e| match e {
                DeployError::PlatformApi { message, .. } => DeployError::TokenAcquisition {
                    what: "COS token",
                    message,
                },
                other => other,
            })
    }

    async fn describe_projects(&self, filter: Filter) -> Result<Vec<Project>> {
        let request = Request::DescribePagesProjects {
            filters: vec![filter],
            offset: 0,
            limit: 10,
            order_by: "CreatedOn".to_string(),
        };
        let list: ProjectList = self.api.call(&request).await?;
        Ok(list.projects.unwrap_or_default())
    }
}
