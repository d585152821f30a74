//! Shared fixtures for HTTP adapter tests.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Cookie, Key};
use actix_web::{test as actix_test, web, App, HttpResponse};
use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    AccountService, AccountServiceError, GenerationSource, GenerationSourceError, ProjectStore,
    ProjectStoreError,
};
use crate::domain::{
    AccountProfile, ChatMessage, Credentials, DeploymentName, Error, Project, ProjectDraft,
    ProjectId, ProjectService, ProjectSummary, SaveReceipt, UserId,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

// One key for the whole test binary so cookies minted by one app instance
// authenticate against another.
static SESSION_KEY: LazyLock<Key> = LazyLock::new(Key::generate);

/// Session middleware configured like production, minus the secure flag.
pub(crate) fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), SESSION_KEY.clone())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The profile that [`authenticated_cookie`] logs in as.
pub(crate) fn fixture_profile() -> AccountProfile {
    AccountProfile {
        id: UserId::parse("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
        username: "ada".to_owned(),
    }
}

/// Mint a session cookie for [`fixture_profile`].
///
/// Any app wrapped with [`test_session_middleware`] accepts it, since all
/// test apps share one signing key.
pub(crate) async fn authenticated_cookie() -> Cookie<'static> {
    let app = actix_test::init_service(App::new().wrap(test_session_middleware()).route(
        "/login",
        web::get().to(|session: SessionContext| async move {
            session.persist(&fixture_profile())?;
            Ok::<_, Error>(HttpResponse::Ok())
        }),
    ))
    .await;
    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/login").to_request())
            .await;
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// In-memory [`ProjectStore`] with the same observable semantics as the
/// database adapter.
#[derive(Default)]
pub(crate) struct InMemoryProjectStore {
    projects: Mutex<HashMap<ProjectId, Project>>,
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn save(
        &self,
        owner: UserId,
        draft: ProjectDraft,
    ) -> Result<SaveReceipt, ProjectStoreError> {
        let mut projects = self.projects.lock().expect("store lock");
        let last_modified = draft.last_modified.unwrap_or_else(Utc::now);
        if let Some(id) = draft.id {
            if let Some(existing) = projects.get_mut(&id) {
                if existing.owner_id != owner {
                    return Err(ProjectStoreError::NotFound);
                }
                existing.name = draft.name;
                existing.files = draft.files;
                existing.conversation = draft.conversation;
                existing.last_modified = last_modified;
                existing.version += 1;
                return Ok(SaveReceipt {
                    id,
                    version: existing.version,
                });
            }
        }
        let id = draft.id.unwrap_or_else(ProjectId::random);
        projects.insert(
            id,
            Project {
                id,
                owner_id: owner,
                name: draft.name,
                last_modified,
                files: draft.files,
                conversation: draft.conversation,
                version: 1,
                deployment: None,
            },
        );
        Ok(SaveReceipt { id, version: 1 })
    }

    async fn list_for_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<ProjectSummary>, ProjectStoreError> {
        let projects = self.projects.lock().expect("store lock");
        let mut summaries: Vec<ProjectSummary> = projects
            .values()
            .filter(|project| project.owner_id == owner)
            .map(|project| ProjectSummary {
                id: project.id,
                name: project.name.clone(),
                last_modified: project.last_modified,
                version: project.version,
                deployment: project.deployment.clone(),
            })
            .collect();
        summaries.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(summaries)
    }

    async fn find_for_owner(
        &self,
        owner: UserId,
        id: ProjectId,
    ) -> Result<Option<Project>, ProjectStoreError> {
        let projects = self.projects.lock().expect("store lock");
        Ok(projects
            .get(&id)
            .filter(|project| project.owner_id == owner)
            .cloned())
    }

    async fn delete_for_owner(
        &self,
        owner: UserId,
        id: ProjectId,
    ) -> Result<(), ProjectStoreError> {
        let mut projects = self.projects.lock().expect("store lock");
        if projects
            .get(&id)
            .is_some_and(|project| project.owner_id == owner)
        {
            projects.remove(&id);
        }
        Ok(())
    }

    async fn deploy(
        &self,
        owner: UserId,
        id: ProjectId,
        name: DeploymentName,
    ) -> Result<(), ProjectStoreError> {
        let mut projects = self.projects.lock().expect("store lock");
        let held_elsewhere = projects
            .values()
            .any(|project| project.id != id && project.deployment.as_ref() == Some(&name));
        if held_elsewhere {
            return Err(ProjectStoreError::name_taken(name.to_string()));
        }
        let project = projects
            .get_mut(&id)
            .filter(|project| project.owner_id == owner)
            .ok_or(ProjectStoreError::NotFound)?;
        project.deployment = Some(name);
        Ok(())
    }

    async fn undeploy(&self, owner: UserId, id: ProjectId) -> Result<(), ProjectStoreError> {
        let mut projects = self.projects.lock().expect("store lock");
        let project = projects
            .get_mut(&id)
            .filter(|project| project.owner_id == owner)
            .ok_or(ProjectStoreError::NotFound)?;
        project.deployment = None;
        Ok(())
    }

    async fn find_deployed(
        &self,
        name: &DeploymentName,
    ) -> Result<Option<Project>, ProjectStoreError> {
        let projects = self.projects.lock().expect("store lock");
        Ok(projects
            .values()
            .find(|project| project.deployment.as_ref() == Some(name))
            .cloned())
    }
}

/// Account service that refuses every call; for tests that never touch auth.
struct UnreachableAccounts;

#[async_trait]
impl AccountService for UnreachableAccounts {
    async fn sign_up(&self, _: &Credentials) -> Result<AccountProfile, AccountServiceError> {
        Err(AccountServiceError::query("accounts not wired in this test"))
    }

    async fn authenticate(&self, _: &Credentials) -> Result<AccountProfile, AccountServiceError> {
        Err(AccountServiceError::query("accounts not wired in this test"))
    }
}

/// Generation source that echoes a canned reply.
pub(crate) struct StaticGeneration {
    pub reply: String,
}

#[async_trait]
impl GenerationSource for StaticGeneration {
    async fn generate(
        &self,
        _messages: &[ChatMessage],
        _model: &str,
    ) -> Result<String, GenerationSourceError> {
        Ok(self.reply.clone())
    }
}

/// State with an in-memory project store and the given account service.
pub(crate) fn test_app_state(accounts: Arc<dyn AccountService>) -> HttpState {
    HttpState::new(
        accounts,
        ProjectService::new(Arc::new(InMemoryProjectStore::default())),
        Arc::new(StaticGeneration {
            reply: "{}".to_owned(),
        }),
    )
}

/// State for tests that only exercise the project routes.
pub(crate) fn stub_http_state() -> HttpState {
    test_app_state(Arc::new(UnreachableAccounts))
}

/// State with a specific canned generation reply.
pub(crate) fn generation_http_state(reply: impl Into<String>) -> HttpState {
    HttpState::new(
        Arc::new(UnreachableAccounts),
        ProjectService::new(Arc::new(InMemoryProjectStore::default())),
        Arc::new(StaticGeneration {
            reply: reply.into(),
        }),
    )
}
