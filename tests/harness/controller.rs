use crate::support::{
    ALICE_PASSWORD,
    FakeBridge,
    TestContext,
};
use contract_bindings::{
    ContractAddress,
    TransactionSigner,
    test_helpers::InMemoryNetwork,
};
use deployments::DappKind;
use soroban_dapps::{
    actions::{
        ClaimPoapForm,
        CreateEventForm,
        CreateGameForm,
        GameInitForm,
        GetEventForm,
        NOT_CONNECTED,
        PotQueryForm,
    },
    client::{
        AppController,
        Submission,
        ViewData,
    },
    notify::NoticeKind,
    views::ViewUpdate,
};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

type Controller = AppController<InMemoryNetwork, FakeBridge>;

async fn apply_next(controller: &mut Controller, updates: &mut UnboundedReceiver<ViewUpdate>) {
    let update = tokio::time::timeout(Duration::from_secs(5), updates.recv())
        .await
        .unwrap()
        .unwrap();
    controller.apply_view_update(update);
}

fn latest(controller: &Controller) -> (NoticeKind, String) {
    let notice = controller.snapshot().notices[0].clone();
    (notice.kind, notice.message)
}

#[tokio::test]
async fn connect__announces_wallet_and_loads_views() {
    // given
    let ctx = TestContext::new();
    ctx.create_event(&ctx.owner(), "Launch", 5, "s").await;
    let mut controller = ctx.controller(DappKind::Poap);
    let mut updates = controller.take_view_updates().unwrap();

    // when
    let connected = controller.connect("alice", Some(ALICE_PASSWORD));

    // then
    assert!(connected);
    let snap = controller.snapshot();
    assert_eq!(snap.account, Some(ctx.alice().public_key()));
    assert_eq!(
        latest(&controller),
        (NoticeKind::Success, "Wallet connected!".to_string())
    );
    assert_eq!(snap.events, ViewData::Loading);
    assert_eq!(snap.my_poaps, ViewData::Loading);

    apply_next(&mut controller, &mut updates).await;
    apply_next(&mut controller, &mut updates).await;
    let snap = controller.snapshot();
    match snap.events {
        ViewData::Ready(events) => {
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].name, "Launch");
        }
        other => panic!("events not loaded: {other:?}"),
    }
    assert_eq!(snap.my_poaps, ViewData::Ready(Vec::new()));
}

#[tokio::test]
async fn connect__failure_reports_and_keeps_previous_account() {
    // given
    let ctx = TestContext::new();
    let mut controller = ctx.controller(DappKind::Poap);
    assert!(controller.connect("bob", None));

    // when
    let connected = controller.connect("alice", Some("not-it"));

    // then
    assert!(!connected);
    assert_eq!(controller.account(), Some(ctx.bob().public_key()));
    let (kind, message) = latest(&controller);
    assert_eq!(kind, NoticeKind::Failure);
    assert!(message.contains("Incorrect password"));
}

#[tokio::test]
async fn submit__without_wallet_reports_not_connected() {
    // given
    let ctx = TestContext::new();
    let mut controller = ctx.controller(DappKind::Poap);

    // when
    let result = controller
        .submit(Submission::ClaimPoap(ClaimPoapForm {
            event_id: "1".into(),
            secret: "s".into(),
        }))
        .await;

    // then
    assert!(result.is_err());
    assert_eq!(
        latest(&controller),
        (NoticeKind::Failure, NOT_CONNECTED.to_string())
    );
    assert!(ctx.network().calls().is_empty());
    assert!(!controller.snapshot().busy);
}

#[tokio::test]
async fn submit__successful_write_resolves_notice_and_refreshes_views() {
    // given
    let ctx = TestContext::new();
    let mut controller = ctx.controller(DappKind::Poap);
    let mut updates = controller.take_view_updates().unwrap();
    controller.connect("owner", None);
    apply_next(&mut controller, &mut updates).await;
    apply_next(&mut controller, &mut updates).await;
    assert_eq!(controller.snapshot().events, ViewData::Ready(Vec::new()));

    // when
    let form = CreateEventForm {
        name: "Fresh".into(),
        description: "new".into(),
        image_url: "https://example.com/f.png".into(),
        max_supply: "3".into(),
        secret: "s".into(),
    };
    controller
        .submit(Submission::CreateEvent(form))
        .await
        .unwrap();

    // then
    let snap = controller.snapshot();
    assert_eq!(
        latest(&controller),
        (
            NoticeKind::Success,
            "Event created successfully! Event ID: 1".to_string()
        )
    );
    assert!(snap.notices.iter().all(|n| n.kind != NoticeKind::Pending));
    assert_eq!(snap.events, ViewData::Loading);
    apply_next(&mut controller, &mut updates).await;
    apply_next(&mut controller, &mut updates).await;
    match controller.snapshot().events {
        ViewData::Ready(events) => assert_eq!(events.len(), 1),
        other => panic!("events not refreshed: {other:?}"),
    }
}

#[tokio::test]
async fn begin_action__shows_pending_notice_until_resolved() {
    // given
    let ctx = TestContext::new();
    let mut controller = ctx.controller(DappKind::Poap);
    let submission = Submission::InitPoap;

    // when
    let notice = controller.begin_action(&submission);

    // then
    let snap = controller.snapshot();
    assert!(snap.busy);
    assert_eq!(snap.notices[0].kind, NoticeKind::Pending);
    assert_eq!(snap.notices[0].message, "Processing transaction...");

    let _ = controller.run_action(notice, submission).await;
    assert_eq!(controller.snapshot().notices.len(), 1);
    assert_eq!(latest(&controller).0, NoticeKind::Failure);
}

#[tokio::test]
async fn submit__get_event_fills_and_clears_lookup() {
    // given
    let ctx = TestContext::new();
    ctx.create_event(&ctx.owner(), "Lookup", 5, "hush").await;
    let mut controller = ctx.controller(DappKind::Poap);
    controller.connect("bob", None);

    // when
    controller
        .submit(Submission::GetEvent(GetEventForm {
            event_id: "1".into(),
        }))
        .await
        .unwrap();
    let found = controller.snapshot().looked_up_event;
    let missing = controller
        .submit(Submission::GetEvent(GetEventForm {
            event_id: "2".into(),
        }))
        .await;

    // then
    assert_eq!(found.map(|e| e.name), Some("Lookup".to_string()));
    assert!(missing.unwrap_err().to_string().contains("event not found"));
    assert!(controller.snapshot().looked_up_event.is_none());
}

#[tokio::test]
async fn game_controller__pot_query_updates_snapshot() {
    // given
    let ctx = TestContext::new();
    let mut controller = ctx.controller(DappKind::Game);
    controller.connect("owner", None);
    controller
        .submit(Submission::InitGame(GameInitForm {
            token: ContractAddress([7u8; 32]).to_string(),
        }))
        .await
        .unwrap();
    controller
        .submit(Submission::CreateGame(CreateGameForm {
            game_id: "cup".into(),
            min_bet: "1".into(),
            max_players: "3".into(),
        }))
        .await
        .unwrap();

    // when
    let message = controller
        .submit(Submission::QueryPot(PotQueryForm {
            game_id: "cup".into(),
        }))
        .await
        .unwrap();

    // then
    assert_eq!(message, "Pot for \"cup\": 0");
    let snap = controller.snapshot();
    assert_eq!(snap.pot.map(|p| p.amount), Some(0));
    // the game dapp has no probed listings
    assert_eq!(snap.events, ViewData::NotLoaded);
}

#[test]
fn open_wallet_modal__lists_bridge_wallets() {
    // given
    let ctx = TestContext::new();
    let mut controller = ctx.controller(DappKind::Poap);

    // when
    controller.open_wallet_modal();

    // then
    let options = controller.snapshot().wallet_options;
    let names: Vec<_> = options.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob", "owner"]);
    assert!(options[0].needs_password);
    assert!(!options[1].needs_password);
}
