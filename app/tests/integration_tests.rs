use std::io::Write;

use lunc_app::{app_from_config, App, AppConfig, GenesisBalance, GenesisState, Tx};
use lunc_nullables::NullChain;
use lunc_router::{Input, Msg, Output};
use lunc_store::{BankKeeper, DistributionKeeper, TreasuryKeeper};
use lunc_tax::params::GOV_MODULE;
use lunc_types::event::{ATTR_REVERSE_CHARGE, ATTR_TAX_AMOUNT, EVENT_TAX_PAYMENT};
use lunc_types::{module, AccAddress, Coin, Coins, Decimal, Event};

fn addr(n: u8) -> AccAddress {
    AccAddress::new(vec![n; 20]).unwrap()
}

fn coins(s: &str) -> Coins {
    s.parse().unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn a() -> AccAddress {
    addr(0xA1)
}

fn b() -> AccAddress {
    addr(0xB2)
}

fn genesis(rate: &str) -> GenesisState {
    let mut genesis = GenesisState {
        balances: vec![GenesisBalance {
            address: a().to_string(),
            coins: coins("10000000uluna,100000usdr"),
        }],
        ..GenesisState::default()
    };
    genesis.params.burn_tax_rate = dec(rate);
    genesis
}

fn app(genesis: &GenesisState) -> App<NullChain> {
    App::from_genesis(NullChain::new(), genesis, AccAddress::module(GOV_MODULE)).unwrap()
}

fn tx(msgs: Vec<Msg>) -> Tx {
    Tx {
        msgs,
        fee: Coins::empty(),
        gas_limit: 200_000,
        fee_payer: a().to_string(),
    }
}

fn bank_send(amount: &str) -> Msg {
    Msg::BankSend {
        from_address: a().to_string(),
        to_address: b().to_string(),
        amount: coins(amount),
    }
}

fn tax_events(events: &[Event]) -> Vec<&Event> {
    events.iter().filter(|e| e.kind == EVENT_TAX_PAYMENT).collect()
}

#[test]
fn scenario_1_bank_send_non_exempt() {
    let mut app = app(&genesis("0.005"));
    let result = app.deliver_tx(&tx(vec![bank_send("1000000uluna")]));
    assert!(result.is_ok(), "{}", result.log);

    let state = app.state();
    assert_eq!(state.balance_of(&b(), "uluna"), 995_000);
    assert_eq!(state.balance_of(&a(), "uluna"), 9_000_000);
    assert_eq!(state.module_balances(module::BURN), coins("5000uluna"));
    assert!(state.module_balances(module::ORACLE).is_empty());
    assert!(state.get_fee_pool().community_pool.is_empty());

    let taxed = tax_events(&result.events);
    assert_eq!(taxed.len(), 1);
    assert_eq!(taxed[0].attribute(ATTR_REVERSE_CHARGE), Some("true"));
    assert_eq!(taxed[0].attribute(ATTR_TAX_AMOUNT), Some("5000uluna"));
}

#[test]
fn scenario_2_exempt_pair() {
    let mut g = genesis("0.005");
    g.exempt_pairs.push([a().to_string(), b().to_string()]);
    let mut app = app(&g);
    let result = app.deliver_tx(&tx(vec![bank_send("1000000uluna")]));
    assert!(result.is_ok(), "{}", result.log);

    let state = app.state();
    assert_eq!(state.balance_of(&b(), "uluna"), 1_000_000);
    assert_eq!(state.balance_of(&a(), "uluna"), 9_000_000);
    assert!(state.module_balances(module::BURN).is_empty());
    assert!(tax_events(&result.events).is_empty());
}

#[test]
fn scenario_3_fee_covers_tax_so_message_layer_passes_through() {
    let mut app = app(&genesis("0.005"));
    let mut t = tx(vec![bank_send("1000000uluna")]);
    t.fee = coins("5000uluna");
    let result = app.deliver_tx(&t);
    assert!(result.is_ok(), "{}", result.log);

    let state = app.state();
    assert_eq!(state.balance_of(&b(), "uluna"), 1_000_000);
    assert_eq!(state.balance_of(&a(), "uluna"), 8_995_000);
    assert_eq!(state.module_balances(module::BURN), coins("5000uluna"));

    let taxed = tax_events(&result.events);
    assert!(!taxed.is_empty());
    assert!(taxed
        .iter()
        .all(|e| e.attribute(ATTR_REVERSE_CHARGE) == Some("false")));
    // The message layer's event carries no amount; the settler's does.
    assert_eq!(taxed[0].attribute(ATTR_TAX_AMOUNT), None);
    assert_eq!(taxed.last().unwrap().attribute(ATTR_TAX_AMOUNT), Some("5000uluna"));
}

#[test]
fn scenario_4_swap_send_at_one_percent() {
    let mut app = app(&genesis("0.01"));
    let result = app.deliver_tx(&tx(vec![Msg::MarketSwapSend {
        from_address: a().to_string(),
        to_address: b().to_string(),
        offer_coin: Coin::new(10_000u128, "usdr"),
        ask_denom: "uluna".into(),
    }]));
    assert!(result.is_ok(), "{}", result.log);

    let state = app.state();
    assert_eq!(state.module_balances(module::MARKET), coins("9900usdr"));
    assert_eq!(state.module_balances(module::BURN), coins("100usdr"));
    assert_eq!(state.balance_of(&a(), "usdr"), 90_000);
    assert_eq!(state.epoch_tax_proceeds(), coins("100usdr"));
}

#[test]
fn scenario_5_split_with_oracle_and_community() {
    let mut g = genesis("0.005");
    g.burn_split_rate = dec("0.5");
    g.oracle_split_rate = dec("0.4");
    g.community_tax = dec("0.02");
    let mut app = app(&g);
    // 0.5% of 2,000,000 collects exactly 10,000.
    let result = app.deliver_tx(&tx(vec![bank_send("2000000uluna")]));
    assert!(result.is_ok(), "{}", result.log);

    let state = app.state();
    assert_eq!(state.module_balances(module::BURN), coins("5000uluna"));
    assert_eq!(state.module_balances(module::ORACLE), coins("1984uluna"));
    assert_eq!(state.module_balances(module::DISTRIBUTION), coins("40uluna"));
    assert_eq!(state.module_balances(module::FEE_COLLECTOR), coins("2976uluna"));
    assert_eq!(state.get_fee_pool().community_pool.amount_of("uluna"), dec("40"));
}

#[test]
fn scenario_6_tainted_multisend() {
    let c = addr(0xC3);
    let mut app = app(&genesis("0.005"));
    let result = app.deliver_tx(&tx(vec![Msg::BankMultiSend {
        inputs: vec![Input {
            address: a().to_string(),
            coins: coins("1000uluna"),
        }],
        outputs: vec![
            Output {
                address: b().to_string(),
                coins: coins("500uluna"),
            },
            Output {
                address: c.to_string(),
                coins: coins("500uluna"),
            },
        ],
    }]));
    assert!(result.is_ok(), "{}", result.log);

    let state = app.state();
    let received = state.balance_of(&b(), "uluna") + state.balance_of(&c, "uluna");
    assert_eq!(received, 995);
    assert_eq!(state.balance_of(&a(), "uluna"), 10_000_000 - 1_000);
    assert_eq!(state.module_balances(module::BURN), coins("5uluna"));
}

#[test]
fn failed_transaction_rolls_back_every_message() {
    let mut app = app(&genesis("0.005"));
    let before = app.state().clone();
    // First message is taxed and executed; the second cannot be paid.
    let result = app.deliver_tx(&tx(vec![
        bank_send("1000000uluna"),
        bank_send("1000000000uluna"),
    ]));
    assert_eq!(result.code, 3);
    assert_eq!(app.state(), &before);
}

#[test]
fn unknown_message_passes_through() {
    let mut app = app(&genesis("0.005"));
    let before = app.state().clone();
    let result = app.deliver_tx(&tx(vec![Msg::Other {
        type_url: "/cosmos.staking.v1beta1.MsgDelegate".into(),
    }]));
    assert!(result.is_ok());
    assert!(result.events.is_empty());
    assert_eq!(app.state(), &before);
}

#[test]
fn end_block_burns_collected_tax() {
    let mut app = app(&genesis("0.005"));
    let supply_before = app.state().total_supply();
    app.deliver_tx(&tx(vec![bank_send("1000000uluna")]));
    let burned = app.end_block().unwrap();
    assert_eq!(burned, coins("5000uluna"));
    assert!(app.state().module_balances(module::BURN).is_empty());
    assert_eq!(
        app.state().total_supply(),
        supply_before.checked_sub(&coins("5000uluna")).unwrap()
    );
    assert!(app.end_block().unwrap().is_empty());
}

#[test]
fn governance_update_changes_the_charged_rate() {
    let mut app = app(&genesis("0.005"));
    let new_params = genesis("0.01").params;
    app.update_params(&AccAddress::module(GOV_MODULE), new_params).unwrap();
    assert_eq!(app.state().get_tax_rate(), dec("0.01"));

    app.deliver_tx(&tx(vec![bank_send("1000000uluna")]));
    assert_eq!(app.state().balance_of(&b(), "uluna"), 990_000);
}

#[test]
fn same_transaction_is_deterministic() {
    let g = genesis("0.005");
    let t = tx(vec![bank_send("1234567uluna"), bank_send("89uluna")]);
    let mut first = app(&g);
    let mut second = app(&g);
    assert_eq!(first.deliver_tx(&t), second.deliver_tx(&t));
    assert_eq!(first.state(), second.state());
}

#[test]
fn app_boots_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
log_format = "json"

[genesis]
burn_split_rate = "0.1"

[[genesis.balances]]
address = "{a}"
coins = [{{ denom = "uluna", amount = "5000000" }}]

[genesis.params]
burn_tax_rate = "0.005"
"#,
        a = a()
    )
    .unwrap();

    let config = AppConfig::from_toml_file(file.path()).unwrap();
    let mut app = app_from_config(&config).unwrap();
    assert_eq!(app.state().get_burn_split_rate(), dec("0.1"));

    let result = app.deliver_tx(&tx(vec![bank_send("1000000uluna")]));
    assert!(result.is_ok(), "{}", result.log);
    // 10% of the 5000 tax is diverted from the burn sink and stays pooled.
    assert_eq!(app.state().module_balances(module::BURN), coins("4500uluna"));
    assert_eq!(app.state().module_balances(module::FEE_COLLECTOR), coins("500uluna"));
}
