//! BDD step definitions for the polling feature

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cucumber::{given, then, when};
use tokio_util::sync::CancellationToken;

use live_data::io::{HttpResponse, RelayClient};
use live_data::model::Station;
use live_data::poller::{spawn_query, PollOptions, QueryHandle};
use live_data::{LiveDataError, LiveQuery};

use crate::world::LiveDataWorld;

/// Relay double that plays back scripted replies, repeating the last one
#[derive(Debug, Default)]
pub struct ScriptedRelay {
    replies: Mutex<VecDeque<Result<HttpResponse, String>>>,
    last: Mutex<Option<Result<HttpResponse, String>>>,
    calls: Mutex<usize>,
}

impl ScriptedRelay {
    fn push(&self, reply: Result<HttpResponse, String>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl RelayClient for ScriptedRelay {
    async fn post_graphql(&self, _body: &str) -> live_data::Result<HttpResponse> {
        *self.calls.lock().unwrap() += 1;

        let reply = {
            let mut last = self.last.lock().unwrap();
            if let Some(next) = self.replies.lock().unwrap().pop_front() {
                *last = Some(next);
            }
            last.clone()
                .unwrap_or_else(|| Err("no scripted reply".to_string()))
        };

        reply.map_err(|reason| LiveDataError::Transport { reason })
    }
}

fn relay(world: &mut LiveDataWorld) -> Arc<ScriptedRelay> {
    world
        .relay
        .get_or_insert_with(|| Arc::new(ScriptedRelay::default()))
        .clone()
}

fn mount_stations(world: &mut LiveDataWorld, options: PollOptions) -> QueryHandle<Vec<Station>> {
    let client = relay(world);
    spawn_query(
        LiveQuery::stations(),
        client,
        options,
        &CancellationToken::new(),
    )
}

async fn settle(handle: &mut QueryHandle<Vec<Station>>) {
    loop {
        let state = handle.state();
        if !state.loading && !state.is_idle() {
            return;
        }
        if !handle.changed().await {
            return;
        }
    }
}

// --- Given steps ---

#[given(expr = "the relay answers {int} with {string}")]
fn relay_answers(world: &mut LiveDataWorld, status: u16, body: String) {
    relay(world).push(Ok(HttpResponse { status, body }));
}

#[given(expr = "then the relay answers {int} with {string}")]
fn relay_then_answers(world: &mut LiveDataWorld, status: u16, body: String) {
    relay(world).push(Ok(HttpResponse { status, body }));
}

#[given(expr = "the relay is unreachable with reason {string}")]
fn relay_unreachable(world: &mut LiveDataWorld, reason: String) {
    relay(world).push(Err(reason));
}

// --- When steps ---

#[when("the stations query is mounted once")]
fn mount_once(world: &mut LiveDataWorld) {
    let handle = mount_stations(world, PollOptions::once());
    world.stations = Some(handle);
}

#[when(expr = "the stations query is mounted with a refresh every {int} milliseconds")]
fn mount_with_refresh(world: &mut LiveDataWorld, millis: u64) {
    let handle = mount_stations(world, PollOptions::every(Duration::from_millis(millis)));
    world.stations = Some(handle);
}

#[when("the query settles")]
async fn query_settles(world: &mut LiveDataWorld) {
    let handle = world.stations.as_mut().expect("no query mounted");
    tokio::time::timeout(Duration::from_secs(5), settle(handle))
        .await
        .expect("query did not settle");
}

#[when("the screen is unmounted")]
async fn screen_unmounted(world: &mut LiveDataWorld) {
    let handle = world.stations.take().expect("no query mounted");
    handle.unmount().await;
}

#[when(expr = "{int} milliseconds pass")]
async fn time_passes(_world: &mut LiveDataWorld, millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

#[when("the stations query is fetched twice in succession")]
async fn fetched_twice(world: &mut LiveDataWorld) {
    for _ in 0..2 {
        let mut handle = mount_stations(world, PollOptions::once());
        settle(&mut handle).await;
        world.snapshots.push(handle.state());
        handle.unmount().await;
    }
}

// --- Then steps ---

fn current_state(world: &LiveDataWorld) -> live_data::QueryState<Vec<Station>> {
    world
        .stations
        .as_ref()
        .expect("no query mounted")
        .state()
}

#[then("the query should not be loading")]
fn not_loading(world: &mut LiveDataWorld) {
    assert!(!current_state(world).loading);
}

#[then("the query should have no error")]
fn no_error(world: &mut LiveDataWorld) {
    assert_eq!(current_state(world).error, None);
}

#[then(expr = "the query error should be {string}")]
fn error_is(world: &mut LiveDataWorld, expected: String) {
    assert_eq!(current_state(world).error.as_deref(), Some(expected.as_str()));
}

#[then(expr = "the query data should hold {int} station\\(s)")]
fn data_holds(world: &mut LiveDataWorld, count: usize) {
    let state = current_state(world);
    assert_eq!(state.data.as_ref().map(Vec::len), Some(count));
}

#[then("the query data should be cleared")]
fn data_cleared(world: &mut LiveDataWorld) {
    assert!(current_state(world).data.is_none());
}

#[then(expr = "the relay should have been called {int} time\\(s)")]
fn relay_called(world: &mut LiveDataWorld, count: usize) {
    let relay = world.relay.as_ref().expect("relay not set");
    assert_eq!(relay.calls(), count);
}

#[then("both resulting states should be identical")]
fn states_identical(world: &mut LiveDataWorld) {
    assert_eq!(world.snapshots.len(), 2);
    assert!(world.snapshots[0].data.is_some());
    assert_eq!(world.snapshots[0], world.snapshots[1]);
}
