//! BDD test world for the live-data client

use std::sync::Arc;

use cucumber::World;
use live_data::model::Station;
use live_data::poller::QueryHandle;
use live_data::QueryState;

use crate::steps::polling_steps::ScriptedRelay;

#[derive(Debug, Default, World)]
pub struct LiveDataWorld {
    pub relay: Option<Arc<ScriptedRelay>>,
    pub stations: Option<QueryHandle<Vec<Station>>>,
    pub snapshots: Vec<QueryState<Vec<Station>>>,
}
