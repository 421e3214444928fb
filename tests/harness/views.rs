use crate::support::TestContext;
use contract_bindings::{
    ClientError,
    TransactionSigner,
    codec::IntoScVal,
    test_helpers::CallKind,
};
use soroban_dapps::views::{
    PROBE_LIMIT,
    ViewKind,
    ViewTasks,
    list_events,
    my_poaps,
};
use std::time::Duration;

fn probed_ids(ctx: &TestContext, function: &str) -> usize {
    ctx.network()
        .call_names()
        .into_iter()
        .filter(|(kind, name)| *kind == CallKind::Simulate && name == function)
        .count()
}

#[tokio::test]
async fn list_events__stops_at_first_failed_probe() {
    // given
    let ctx = TestContext::new();
    for i in 0..6 {
        ctx.create_event(&ctx.owner(), &format!("event {i}"), 5, "s")
            .await;
    }
    ctx.network().fail_call(
        "get_event",
        vec![4u32.into_sc_val().unwrap()],
        ClientError::Simulation("rpc hiccup".into()),
    );
    ctx.network().clear_calls();
    let client = ctx.poap_client(&ctx.alice());

    // when
    let events = list_events(&client).await;

    // then
    let ids: Vec<u32> = events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(probed_ids(&ctx, "get_event"), 4);
}

#[tokio::test]
async fn list_events__empty_contract_probes_once() {
    // given
    let ctx = TestContext::new();
    let client = ctx.poap_client(&ctx.alice());

    // when
    let events = list_events(&client).await;

    // then
    assert!(events.is_empty());
    assert_eq!(probed_ids(&ctx, "get_event"), 1);
}

#[tokio::test]
async fn list_events__never_looks_past_probe_limit() {
    // given
    let ctx = TestContext::new();
    for i in 0..(PROBE_LIMIT + 2) {
        ctx.create_event(&ctx.owner(), &format!("event {i}"), 5, "s")
            .await;
    }
    ctx.network().clear_calls();
    let client = ctx.poap_client(&ctx.alice());

    // when
    let events = list_events(&client).await;

    // then
    assert_eq!(events.len(), PROBE_LIMIT as usize);
    assert_eq!(probed_ids(&ctx, "get_event"), PROBE_LIMIT as usize);
}

#[tokio::test]
async fn my_poaps__lists_only_claimed_events_in_id_order() {
    // given
    let ctx = TestContext::new();
    for i in 0..3 {
        ctx.create_event(&ctx.owner(), &format!("event {i}"), 5, "s")
            .await;
    }
    let alice = ctx.poap_client(&ctx.alice());
    for id in [3u32, 1] {
        alice
            .claim_poap(ctx.alice().public_key(), id, "s")
            .await
            .unwrap()
            .sign_and_send()
            .await
            .unwrap();
    }
    ctx.network().clear_calls();

    // when
    let owned = my_poaps(&alice, ctx.alice().public_key()).await;

    // then
    let ids: Vec<u32> = owned.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(probed_ids(&ctx, "has_claimed"), PROBE_LIMIT as usize);
    assert_eq!(probed_ids(&ctx, "get_event"), 2);
}

#[tokio::test]
async fn my_poaps__stops_when_claim_check_fails() {
    // given
    let ctx = TestContext::new();
    ctx.create_event(&ctx.owner(), "only", 5, "s").await;
    let alice = ctx.poap_client(&ctx.alice());
    ctx.network().fail_function(
        "has_claimed",
        ClientError::transient("connection reset"),
    );
    ctx.network().clear_calls();

    // when
    let owned = my_poaps(&alice, ctx.alice().public_key()).await;

    // then
    assert!(owned.is_empty());
    assert_eq!(probed_ids(&ctx, "has_claimed"), 1);
}

#[tokio::test]
async fn view_tasks__newer_refresh_supersedes_older() {
    // given
    let ctx = TestContext::new();
    ctx.create_event(&ctx.owner(), "only", 5, "s").await;
    let client = ctx.poap_client(&ctx.alice());
    let owner = ctx.alice().public_key();
    let (mut tasks, mut updates) = ViewTasks::new();

    // when
    let first = tasks.spawn_refresh(ViewKind::Events, client.clone(), owner);
    let second = tasks.spawn_refresh(ViewKind::Events, client, owner);

    // then
    assert_ne!(first, second);
    loop {
        let update = tokio::time::timeout(Duration::from_secs(5), updates.recv())
            .await
            .unwrap()
            .unwrap();
        if update.generation == second {
            assert!(tasks.is_current(&update));
            assert_eq!(update.events.len(), 1);
            break;
        }
        assert!(!tasks.is_current(&update));
    }
}

#[tokio::test]
async fn view_tasks__abort_all_forgets_running_refreshes() {
    // given
    let ctx = TestContext::new();
    let client = ctx.poap_client(&ctx.alice());
    let (mut tasks, _updates) = ViewTasks::new();
    let generation = tasks.spawn_refresh(ViewKind::MyPoaps, client, ctx.alice().public_key());

    // when
    tasks.abort_all();

    // then
    let stale = soroban_dapps::views::ViewUpdate {
        kind: ViewKind::MyPoaps,
        generation,
        events: Vec::new(),
    };
    assert!(!tasks.is_current(&stale));
}
