use crate::support::TestContext;
use contract_bindings::{
    ClientError,
    PoapClient,
    TransactionSigner,
    test_helpers::InMemoryNetwork,
};
use soroban_dapps::actions::{
    self,
    ClaimPoapForm,
    CreateEventForm,
    GetEventForm,
    NOT_CONNECTED,
    PoapInitForm,
};

fn event_form(max_supply: &str) -> CreateEventForm {
    CreateEventForm {
        name: "RustConf".into(),
        description: "Annual gathering".into(),
        image_url: "https://example.com/rustconf.png".into(),
        max_supply: max_supply.into(),
        secret: "open sesame".into(),
    }
}

fn claim_form(event_id: &str, secret: &str) -> ClaimPoapForm {
    ClaimPoapForm {
        event_id: event_id.into(),
        secret: secret.into(),
    }
}

#[tokio::test]
async fn claim_poap__second_claim_by_same_account_is_rejected() {
    // given
    let ctx = TestContext::new();
    let creator = ctx.poap_client(&ctx.owner());
    let created = actions::create_event(Some(&creator), &event_form("100"))
        .await
        .unwrap();
    assert_eq!(created, "Event created successfully! Event ID: 1");
    let alice = ctx.poap_client(&ctx.alice());
    let claim = claim_form("1", "open sesame");
    let first = actions::claim_poap(Some(&alice), &claim).await.unwrap();

    // when
    let second = actions::claim_poap(Some(&alice), &claim).await;

    // then
    assert_eq!(first, "Successfully claimed POAP for event 1!");
    let claimed = alice
        .has_claimed(1, ctx.alice().public_key())
        .await
        .unwrap()
        .into_result();
    assert!(claimed);
    let err = second.unwrap_err();
    assert!(!err.is_local());
    assert!(err.to_string().contains("already claimed"));
}

#[tokio::test]
async fn claim_poap__wrong_secret_is_surfaced_verbatim() {
    // given
    let ctx = TestContext::new();
    ctx.create_event(&ctx.owner(), "Meetup", 5, "right").await;
    let alice = ctx.poap_client(&ctx.alice());

    // when
    let err = actions::claim_poap(Some(&alice), &claim_form("1", "wrong"))
        .await
        .unwrap_err();

    // then
    assert!(err.to_string().contains("invalid secret"));
    let claimed = alice
        .has_claimed(1, ctx.alice().public_key())
        .await
        .unwrap()
        .into_result();
    assert!(!claimed);
}

#[tokio::test]
async fn claim_poap__fails_once_supply_is_exhausted() {
    // given
    let ctx = TestContext::new();
    ctx.create_event(&ctx.owner(), "Tiny", 1, "s").await;
    let alice = ctx.poap_client(&ctx.alice());
    let bob = ctx.poap_client(&ctx.bob());
    actions::claim_poap(Some(&alice), &claim_form("1", "s"))
        .await
        .unwrap();

    // when
    let err = actions::claim_poap(Some(&bob), &claim_form("1", "s"))
        .await
        .unwrap_err();

    // then
    assert!(err.to_string().contains("max supply reached"));
}

#[tokio::test]
async fn create_event__validation_failure_makes_no_remote_call() {
    // given
    let ctx = TestContext::new();
    let client = ctx.poap_client(&ctx.owner());
    let form = CreateEventForm {
        name: "Only a name".into(),
        ..CreateEventForm::default()
    };

    // when
    let err = actions::create_event(Some(&client), &form)
        .await
        .unwrap_err();

    // then
    assert_eq!(err.to_string(), "All fields are required!");
    assert!(ctx.network().calls().is_empty());
}

#[tokio::test]
async fn claim_poap__without_wallet_asks_to_connect() {
    // given
    let ctx = TestContext::new();
    let no_client: Option<&PoapClient<InMemoryNetwork>> = None;

    // when
    let err = actions::claim_poap(no_client, &claim_form("1", "s"))
        .await
        .unwrap_err();

    // then
    assert_eq!(err.to_string(), NOT_CONNECTED);
    assert!(ctx.network().calls().is_empty());
}

#[tokio::test]
async fn create_event__submit_failure_is_reported_and_nothing_is_stored() {
    // given
    let ctx = TestContext::new();
    let client = ctx.poap_client(&ctx.owner());
    ctx.network().fail_next_submit(ClientError::Submission(
        "transaction rejected with status ERROR: txINSUFFICIENT_FEE".into(),
    ));

    // when
    let err = actions::create_event(Some(&client), &event_form("10"))
        .await
        .unwrap_err();

    // then
    assert!(err.to_string().contains("txINSUFFICIENT_FEE"));
    assert!(ctx.network().stored_event(ctx.poap_contract(), 1).is_none());
}

#[tokio::test]
async fn lookup_event__returns_public_details_without_secret() {
    // given
    let ctx = TestContext::new();
    ctx.create_event(&ctx.owner(), "Hidden", 3, "very-secret-word")
        .await;
    let alice = ctx.poap_client(&ctx.alice());
    ctx.network().clear_calls();

    // when
    let event = actions::lookup_event(
        Some(&alice),
        &GetEventForm {
            event_id: "1".into(),
        },
    )
    .await
    .unwrap();

    // then
    assert_eq!(event.name, "Hidden");
    assert_eq!(event.remaining(), 3);
    assert!(!format!("{event:?}").contains("very-secret-word"));
    let stored = ctx.network().stored_event(ctx.poap_contract(), 1).unwrap();
    assert_eq!(stored.secret, "very-secret-word");
    // reads are simulated only
    let names = ctx.network().call_names();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].1, "get_event");
}

#[tokio::test]
async fn init_poap__can_run_before_and_after_events_exist() {
    // given
    let ctx = TestContext::new();
    let client = ctx.poap_client(&ctx.owner());

    // when
    let first = actions::init_poap(Some(&client), &PoapInitForm).await;
    ctx.create_event(&ctx.owner(), "After init", 2, "s").await;
    let again = actions::init_poap(Some(&client), &PoapInitForm).await;

    // then
    assert_eq!(first.unwrap(), "Contract initialized successfully!");
    assert!(again.is_ok());
    assert!(ctx.network().stored_event(ctx.poap_contract(), 1).is_some());
}

#[tokio::test]
async fn create_event__reports_the_id_the_contract_assigned() {
    // given
    let ctx = TestContext::new();
    let alice = ctx.poap_client(&ctx.alice());
    let bob = ctx.poap_client(&ctx.bob());
    let pending = alice
        .create_event(ctx.alice().public_key(), "Alice's", "d", "u", 5, "a")
        .await
        .unwrap();

    // when
    let bob_message = actions::create_event(Some(&bob), &event_form("5"))
        .await
        .unwrap();
    let alice_sent = pending.sign_and_send().await.unwrap();

    // then
    assert_eq!(bob_message, "Event created successfully! Event ID: 1");
    assert_eq!(alice_sent.result, 2);
    let stored = ctx.network().stored_event(ctx.poap_contract(), 2).unwrap();
    assert_eq!(stored.name, "Alice's");
}
