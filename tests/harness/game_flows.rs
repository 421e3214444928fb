use crate::support::TestContext;
use contract_bindings::{
    ContractAddress,
    GameClient,
    GameId,
    codec::FromScVal,
    test_helpers::{
        CallKind,
        InMemoryNetwork,
    },
};
use soroban_dapps::actions::{
    self,
    CreateGameForm,
    GameInitForm,
    JoinGameForm,
    PotQueryForm,
    ResolveGameForm,
};

fn token_address() -> String {
    ContractAddress([9u8; 32]).to_string()
}

async fn initialized_game(ctx: &TestContext) -> GameClient<InMemoryNetwork> {
    let owner = ctx.game_client(&ctx.owner());
    actions::init_game(
        Some(&owner),
        &GameInitForm {
            token: token_address(),
        },
    )
    .await
    .unwrap();
    actions::create_game(
        Some(&owner),
        &CreateGameForm {
            game_id: "derby".into(),
            min_bet: "10".into(),
            max_players: "2".into(),
        },
    )
    .await
    .unwrap();
    owner
}

fn join(game_id: &str, choice: &str, amount: &str) -> JoinGameForm {
    JoinGameForm {
        game_id: game_id.into(),
        choice: choice.into(),
        amount: amount.into(),
    }
}

#[tokio::test]
async fn game__create_join_pot_resolve_round_trip() {
    // given
    let ctx = TestContext::new();
    let owner = initialized_game(&ctx).await;
    let alice = ctx.game_client(&ctx.alice());
    let bob = ctx.game_client(&ctx.bob());

    // when
    let joined = actions::join_game(Some(&alice), &join("derby", "1", "15"))
        .await
        .unwrap();
    actions::join_game(Some(&bob), &join("derby", "", "10"))
        .await
        .unwrap();
    let pot = actions::lookup_pot(
        Some(&alice),
        &PotQueryForm {
            game_id: "derby".into(),
        },
    )
    .await
    .unwrap();
    let resolved = actions::resolve_game(
        Some(&owner),
        &ResolveGameForm {
            game_id: "derby".into(),
            result: "0".into(),
        },
    )
    .await
    .unwrap();

    // then
    assert_eq!(joined, "Successfully joined game \"derby\"!");
    assert_eq!(pot.amount, 25);
    assert_eq!(pot.message(), "Pot for \"derby\": 25");
    assert_eq!(resolved, "Game \"derby\" resolved!");
    let late = actions::join_game(Some(&ctx.game_client(&ctx.owner())), &join("derby", "2", "10"))
        .await
        .unwrap_err();
    assert!(late.to_string().contains("game already resolved"));
}

#[tokio::test]
async fn create_game__before_init_is_rejected_by_contract() {
    // given
    let ctx = TestContext::new();
    let owner = ctx.game_client(&ctx.owner());

    // when
    let err = actions::create_game(
        Some(&owner),
        &CreateGameForm {
            game_id: "early".into(),
            min_bet: "1".into(),
            max_players: "4".into(),
        },
    )
    .await
    .unwrap_err();

    // then
    assert!(err.to_string().contains("contract not initialized"));
}

#[tokio::test]
async fn init_game__second_init_fails() {
    // given
    let ctx = TestContext::new();
    let owner = initialized_game(&ctx).await;

    // when
    let err = actions::init_game(
        Some(&owner),
        &GameInitForm {
            token: token_address(),
        },
    )
    .await
    .unwrap_err();

    // then
    assert!(err.to_string().contains("already initialized"));
}

#[tokio::test]
async fn init_game__malformed_token_is_local() {
    // given
    let ctx = TestContext::new();
    let owner = ctx.game_client(&ctx.owner());

    // when
    let err = actions::init_game(
        Some(&owner),
        &GameInitForm {
            token: "not-an-address".into(),
        },
    )
    .await
    .unwrap_err();

    // then
    assert!(err.is_local());
    assert!(ctx.network().calls().is_empty());
}

#[tokio::test]
async fn join_game__enforces_minimum_and_capacity() {
    // given
    let ctx = TestContext::new();
    initialized_game(&ctx).await;
    let alice = ctx.game_client(&ctx.alice());
    let bob = ctx.game_client(&ctx.bob());
    let owner = ctx.game_client(&ctx.owner());

    // when
    let too_small = actions::join_game(Some(&alice), &join("derby", "0", "5")).await;
    actions::join_game(Some(&alice), &join("derby", "0", "10"))
        .await
        .unwrap();
    actions::join_game(Some(&bob), &join("derby", "1", "10"))
        .await
        .unwrap();
    let full = actions::join_game(Some(&owner), &join("derby", "2", "10")).await;

    // then
    assert!(too_small.unwrap_err().to_string().contains("bet below minimum"));
    assert!(full.unwrap_err().to_string().contains("game is full"));
}

#[tokio::test]
async fn resolve_game__only_creator_may_resolve() {
    // given
    let ctx = TestContext::new();
    initialized_game(&ctx).await;
    let alice = ctx.game_client(&ctx.alice());

    // when
    let err = actions::resolve_game(
        Some(&alice),
        &ResolveGameForm {
            game_id: "derby".into(),
            result: "1".into(),
        },
    )
    .await
    .unwrap_err();

    // then
    assert!(err.to_string().contains("did not authorize"));
}

#[tokio::test]
async fn lookup_pot__is_simulated_only() {
    // given
    let ctx = TestContext::new();
    let owner = initialized_game(&ctx).await;
    ctx.network().clear_calls();

    // when
    let pot = actions::lookup_pot(
        Some(&owner),
        &PotQueryForm {
            game_id: "derby".into(),
        },
    )
    .await
    .unwrap();

    // then
    assert_eq!(pot.amount, 0);
    assert_eq!(
        ctx.network().call_names(),
        vec![(CallKind::Simulate, "get_pot".to_string())]
    );
}

#[tokio::test]
async fn game_id__short_labels_are_right_padded_on_the_wire() {
    // given
    let ctx = TestContext::new();
    let owner = initialized_game(&ctx).await;
    ctx.network().clear_calls();

    // when
    owner
        .get_pot(GameId::from_label("derby").unwrap())
        .await
        .unwrap();

    // then
    let call = &ctx.network().calls()[0];
    let sent = GameId::from_sc_val(&call.args[0]).unwrap();
    assert_eq!(&sent.as_bytes()[..5], b"derby");
    assert!(sent.as_bytes()[5..].iter().all(|b| *b == 0));
    assert_eq!(sent.label(), "derby");
}
