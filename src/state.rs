use std::sync::Arc;

use crate::config::Config;
use crate::store::CsvStore;
use crate::sync::RepoSync;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub store: CsvStore,
    pub sync: Option<RepoSync>,
}
