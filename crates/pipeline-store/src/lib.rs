//! Pipeline Store
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - commands: Command handlers for the board

use std::path::PathBuf;

pub mod config;
pub mod domain;
pub mod repository;
pub mod commands;

pub use config::StoreConfig;
use repository::{init_db, DbState, DealRepository, StageRepository};

/// Application state shared across commands
pub struct AppState {
    pub db_state: DbState,
    pub db_path: PathBuf,
    pub stage_repo: StageRepository,
    pub deal_repo: DealRepository,
}

impl AppState {
    pub fn new(db_state: DbState, db_path: PathBuf) -> Self {
        Self {
            stage_repo: StageRepository::new(db_state.shared()),
            deal_repo: DealRepository::new(db_state.shared()),
            db_state,
            db_path,
        }
    }
}

/// Bring up logging, the database and the default stages
pub async fn init_app(config: &StoreConfig) -> Result<AppState, String> {
    if let Some(log_dir) = &config.log_dir {
        // Another subscriber may already be installed (tests, embedding app)
        if let Err(e) = rolling_logger::init_logger(log_dir.clone(), &config.app_name) {
            log::warn!("rolling logger not installed: {}", e);
        }
    }

    let db_state = init_db(&config.db_path).await.map_err(|e| {
        let _ = rolling_logger::error(&format!("DB init failed: {}", e));
        e
    })?;
    let state = AppState::new(db_state, config.db_path.clone());

    if config.seed_default_stages {
        let seeded = state.stage_repo.ensure_defaults().await.map_err(|e| e.to_string())?;
        if seeded > 0 {
            let _ = rolling_logger::info(&format!("Seeded {} default stages", seeded));
        }
    }

    log::info!("pipeline store ready ({})", config.db_path.display());
    Ok(state)
}
