use crate::support::{
    ALICE_PASSWORD,
    TestContext,
};
use contract_bindings::{
    PoapClient,
    TransactionSigner,
    test_helpers::{
        InMemoryNetwork,
        TEST_PASSPHRASE,
    },
};
use soroban_dapps::{
    actions::{
        self,
        ClaimPoapForm,
    },
    session::{
        ClientTemplate,
        Session,
    },
};
use std::sync::Arc;

fn template(ctx: &TestContext) -> ClientTemplate<InMemoryNetwork> {
    ClientTemplate::new(
        ctx.network().clone(),
        TEST_PASSPHRASE,
        ctx.poap_contract(),
    )
}

#[tokio::test]
async fn connect__switching_account_rebinds_client_to_new_account() {
    // given
    let ctx = TestContext::new();
    ctx.create_event(&ctx.owner(), "Switch", 10, "s").await;
    let template = template(&ctx);
    let mut bridge = ctx.bridge();
    let mut session = Session::default();
    session
        .connect(&mut bridge, &template, "alice", Some(ALICE_PASSWORD))
        .unwrap();

    // when
    let bob = session
        .connect(&mut bridge, &template, "bob", None)
        .unwrap();

    // then
    assert_eq!(bob, ctx.bob().public_key());
    let client = session.poap_client().unwrap();
    assert_eq!(client.public_key(), ctx.bob().public_key());
    actions::claim_poap(
        Some(&client),
        &ClaimPoapForm {
            event_id: "1".into(),
            secret: "s".into(),
        },
    )
    .await
    .unwrap();
    let bob_claimed = client
        .has_claimed(1, ctx.bob().public_key())
        .await
        .unwrap()
        .into_result();
    let alice_claimed = client
        .has_claimed(1, ctx.alice().public_key())
        .await
        .unwrap()
        .into_result();
    assert!(bob_claimed);
    assert!(!alice_claimed);
}

#[test]
fn connect__wrong_password_leaves_session_untouched() {
    // given
    let ctx = TestContext::new();
    let template = template(&ctx);
    let mut bridge = ctx.bridge();
    let mut session = Session::default();
    session
        .connect(&mut bridge, &template, "bob", None)
        .unwrap();

    // when
    let err = session
        .connect(&mut bridge, &template, "alice", Some("guess"))
        .unwrap_err();

    // then
    assert!(err.to_string().contains("Incorrect password"));
    assert_eq!(session.account(), Some(ctx.bob().public_key()));
    assert_eq!(
        session.options().unwrap().public_key,
        ctx.bob().public_key()
    );
}

#[test]
fn connect__unknown_wallet_keeps_disconnected_session() {
    // given
    let ctx = TestContext::new();
    let template = template(&ctx);
    let mut bridge = ctx.bridge();
    let mut session: Session<InMemoryNetwork> = Session::default();

    // when
    let result = session.connect(&mut bridge, &template, "mallory", None);

    // then
    assert!(result.is_err());
    assert!(!session.is_connected());
    assert!(session.poap_client().is_none());
    assert!(session.game_client().is_none());
}

#[test]
fn connect__same_account_keeps_existing_client() {
    // given
    let ctx = TestContext::new();
    let template = template(&ctx);
    let mut bridge = ctx.bridge();
    let mut session = Session::default();
    session
        .connect(&mut bridge, &template, "bob", None)
        .unwrap();
    let before = session.options().unwrap().signer.clone().unwrap();

    // when
    session
        .connect(&mut bridge, &template, "bob", None)
        .unwrap();

    // then
    let after = session.options().unwrap().signer.clone().unwrap();
    assert!(Arc::ptr_eq(&before, &after));
}

#[tokio::test]
async fn bind__signer_of_previous_account_cannot_submit_for_new_one() {
    // given
    let ctx = TestContext::new();
    ctx.create_event(&ctx.owner(), "Stale", 10, "s").await;
    let template = template(&ctx);
    let stale: Arc<dyn TransactionSigner> = Arc::new(ctx.alice());
    let client = PoapClient::new(template.bind(ctx.bob().public_key(), Some(stale)));

    // when
    let err = actions::claim_poap(
        Some(&client),
        &ClaimPoapForm {
            event_id: "1".into(),
            secret: "s".into(),
        },
    )
    .await
    .unwrap_err();

    // then
    assert!(err.to_string().contains("txBAD_AUTH"));
    let claimed = client
        .has_claimed(1, ctx.bob().public_key())
        .await
        .unwrap()
        .into_result();
    assert!(!claimed);
}
