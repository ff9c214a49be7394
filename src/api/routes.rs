use super::handlers::{
    auth, execution, filesystem, health, job, permission, repository, system, ui, user,
};
use super::middleware::cors::add_cors;
use super::templates;
use crate::config::Config;
use crate::config::hardcoded::{LOGIN_PATH, LOGOUT_PATH};
use crate::error::Result;
use crate::executor::AnsibleExecutor;
use crate::repository::{
    DbPool, ExecutionRepository, JobRepository, PermissionRepository, RepoRepository,
    UserRepository,
};
use crate::services::{
    AuthService, BrowseService, ExecutionService, JobService, PermissionService,
    RepositoryService, SystemService,
};
use axum::{
    Router,
    routing::{any, delete, get, post},
};
use std::sync::Arc;
use tera::Tera;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub permission_service: PermissionService,
    pub job_service: JobService,
    pub execution_service: ExecutionService,
    pub browse_service: BrowseService,
    pub repository_service: RepositoryService,
    pub system_service: SystemService,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(config: Config, db_pool: DbPool) -> Result<Self> {
        let job_repo = JobRepository::new(db_pool.clone());
        let execution_repo = ExecutionRepository::new(db_pool.clone());
        let user_repo = UserRepository::new(db_pool.clone());
        let permission_repo = PermissionRepository::new(db_pool.clone());
        let repo_repo = RepoRepository::new(db_pool);

        let auth_service = AuthService::new(user_repo.clone(), config.session_hours);
        let permission_service = PermissionService::new(permission_repo, user_repo);
        let job_service = JobService::new(job_repo.clone(), permission_service.clone());
        let execution_service = ExecutionService::new(
            execution_repo,
            job_repo,
            AnsibleExecutor::new(Some(config.ansible_playbook.clone())),
            config.path_play.clone(),
            config.path_run.clone(),
        );
        let browse_service = BrowseService::new(
            repo_repo.clone(),
            config.path_play.clone(),
            config.path_repo.clone(),
        );

        Ok(Self {
            auth_service,
            permission_service,
            job_service,
            execution_service,
            browse_service,
            repository_service: RepositoryService::new(repo_repo),
            system_service: SystemService::new(),
            templates: Arc::new(templates::load()?),
            config: Arc::new(config),
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    let deployment = state.config.deployment;
    let static_dir = state
        .config
        .serve_static
        .then(|| state.config.path_static.clone());

    let ui_routes = Router::new()
        .route("/a/", any(ui::ui))
        .route("/a/{*path}", any(ui::ui))
        .route(LOGIN_PATH, get(auth::login_form).post(auth::login))
        .route(LOGOUT_PATH, get(auth::logout).post(auth::logout))
        .route("/ui/system/environment", get(system::environment_page))
        .route("/ui/system/config", get(system::config_page));

    let api_routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Filesystem and system
        .route("/api/fs/browse", get(filesystem::browse))
        .route("/api/system/environment", get(system::environment))
        // Jobs
        .route("/api/job", get(job::list_jobs).post(job::create_job))
        .route(
            "/api/job/{id}",
            get(job::get_job).put(job::update_job).delete(job::delete_job),
        )
        // Execution
        .route("/api/job/{id}/execute", post(execution::execute_job))
        .route("/api/job/{id}/execution", get(execution::list_executions))
        .route(
            "/api/job/{id}/execution/{exec_id}",
            get(execution::get_execution),
        )
        .route(
            "/api/job/{id}/execution/{exec_id}/log",
            get(execution::execution_log),
        )
        // Administration
        .route(
            "/api/permission",
            get(permission::list_permissions).post(permission::create_permission),
        )
        .route(
            "/api/permission/{id}",
            get(permission::get_permission)
                .put(permission::update_permission)
                .delete(permission::delete_permission),
        )
        .route("/api/user", get(user::list_users).post(user::create_user))
        .route("/api/user/{id}", delete(user::delete_user))
        .route("/api/group", get(user::list_groups).post(user::create_group))
        .route("/api/group/{id}", delete(user::delete_group))
        .route(
            "/api/repository",
            get(repository::list_repositories).post(repository::create_repository),
        )
        .route("/api/repository/{id}", delete(repository::delete_repository));

    let mut app = ui_routes.merge(api_routes).fallback(ui::catchall);
    if let Some(dir) = static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    let app = add_cors(app.with_state(state), deployment);
    app.layer(TraceLayer::new_for_http())
}
