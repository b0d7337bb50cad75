//! BDD test world for the transit relay

use std::sync::Arc;

use cucumber::World;

use crate::steps::relay_steps::StubUpstream;

#[derive(Debug, Default, World)]
pub struct RelayWorld {
    pub upstream: Option<Arc<StubUpstream>>,
    pub response_status: Option<u16>,
    pub response_body: Option<String>,
}
