//! End-to-end session flows against a scripted engine

mod common;

use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_json_abi::Function;
use alloy_primitives::{Address, U256};
use alloy_sol_types::{Revert, SolError};
use common::{client, key, log, menu_logs, text};
use menucall::infrastructure::ExecOutcome;
use menucall::session::{Driver, DriverOptions};
use menucall::ui::ScriptedPrompt;
use menucall::Error;

#[tokio::test]
async fn test_two_step_session() {
    let (client, engine) = client().await;
    let home = client.instance("Home").unwrap().address;

    engine.push_logs(menu_logs(home, "m1", "Hello", "t1", Some("next")));
    engine.push_logs(menu_logs(home, "m2", "Second", "t2", Some("plain")));

    let mut driver = Driver::new(client, ScriptedPrompt::new(["t1"]), Vec::new());
    driver.run("Home", "menu").await.unwrap();
    let (_, prompt, out) = driver.into_parts();
    let out = String::from_utf8(out).unwrap();

    let recorded = engine.recorded();
    assert_eq!(recorded.len(), 2);
    assert!(recorded.iter().all(|r| r.to == Some(home) && !r.transaction));

    let menu = Function::parse("function menu(bytes32)").unwrap();
    assert_eq!(&recorded[0].data[..4], menu.selector().as_slice());

    // The follow-up call carries a fresh token and an empty menu response
    let next = Function::parse("function next(bytes32,(string,string)[])").unwrap();
    assert_eq!(&recorded[1].data[..4], next.selector().as_slice());
    let args = next.abi_decode_input(&recorded[1].data[4..]).unwrap();
    assert_eq!(args[1], DynSolValue::Array(vec![]));
    assert_ne!(recorded[0].data[4..36], recorded[1].data[4..36]);

    assert!(out.contains("│ ░ Hello ░"));
    assert!(out.contains("│  ┊ t1! ┊"));
    assert!(out.contains("│  ┊ > Home :: next(bytes32,(string,string)[])"));
    assert!(out.contains("│ next(bytes32,(string,string)[])"));
    assert!(out.contains("│  - []"));
    assert!(out.trim_end().ends_with("│ No target!"));
    assert_eq!(prompt.asked().len(), 2);
}

#[tokio::test]
async fn test_plain_action_sends_no_response() {
    let (client, engine) = client().await;
    let home = client.instance("Home").unwrap().address;

    engine.push_logs(menu_logs(home, "m1", "Hello", "t1", Some("plain")));
    engine.push_logs(vec![]);

    let mut driver = Driver::new(client, ScriptedPrompt::new(["t1!"]), Vec::new());
    driver.run("Home", "menu").await.unwrap();

    let recorded = engine.recorded();
    assert_eq!(recorded.len(), 2);
    // selector plus the token only
    assert_eq!(recorded[1].data.len(), 4 + 32);
}

#[tokio::test]
async fn test_action_from_nested_log_targets_queried_contract() {
    let (mut client, engine) = client().await;
    let home = client.instance("Home").unwrap().address;
    let shop = client.bind("Shop", Address::with_last_byte(0x50)).unwrap().address;

    engine.push_logs(menu_logs(shop, "m1", "From shop", "t1", Some("next")));
    engine.push_logs(vec![]);

    let mut driver = Driver::new(client, ScriptedPrompt::new(["t1"]), Vec::new());
    driver.run("Home", "menu").await.unwrap();
    let (_, _, out) = driver.into_parts();
    let out = String::from_utf8(out).unwrap();

    let recorded = engine.recorded();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[1].to, Some(home));
    let next = Function::parse("function next(bytes32,(string,string)[])").unwrap();
    assert_eq!(&recorded[1].data[..4], next.selector().as_slice());
    assert!(out.contains("│  ┊ > Home :: next(bytes32,(string,string)[])"));
}

#[tokio::test]
async fn test_target_without_action_is_fatal() {
    let (client, engine) = client().await;
    let home = client.instance("Home").unwrap().address;
    engine.push_logs(menu_logs(home, "m1", "Hello", "t1", None));

    let mut driver = Driver::new(client, ScriptedPrompt::new(["t1"]), Vec::new());
    let err = driver.run("Home", "menu").await.unwrap_err();
    assert!(matches!(err, Error::DeadEnd { ref menu, ref id } if menu == "m1" && id == "t1"));
}

#[tokio::test]
async fn test_oversized_action_aborts_before_prompt() {
    let (client, engine) = client().await;
    let home = client.instance("Home").unwrap().address;

    let mut logs = menu_logs(home, "m1", "Hello", "t1", None);
    logs.push(log(
        home,
        "event Target_Action((string,string),string,string,string)",
        vec![key("m1", "t1"), text("next"), text("Home"), text("extra")],
    ));
    engine.push_logs(logs);

    let mut driver = Driver::new(client, ScriptedPrompt::new(["t1"]), Vec::new());
    let err = driver.run("Home", "menu").await.unwrap_err();
    assert!(matches!(err, Error::TooManyActionArgs(3)));
    assert_eq!(engine.recorded().len(), 1);
    assert!(driver.prompt().asked().is_empty());
}

#[tokio::test]
async fn test_unknown_origin_is_fatal() {
    let (client, engine) = client().await;
    let stranger = Address::with_last_byte(0xee);
    engine.push_logs(menu_logs(stranger, "m1", "Hello", "t1", Some("next")));

    let mut driver = Driver::new(client, ScriptedPrompt::new(["t1"]), Vec::new());
    let err = driver.run("Home", "menu").await.unwrap_err();
    assert!(matches!(err, Error::UnknownOrigin(address) if address == stranger));
}

#[tokio::test]
async fn test_revert_reason_is_reported() {
    let (client, engine) = client().await;
    engine.push(ExecOutcome {
        success: false,
        return_data: Revert {
            reason: "shop closed".to_string(),
        }
        .abi_encode()
        .into(),
        ..Default::default()
    });

    let mut driver = Driver::new(client, ScriptedPrompt::new(["t1"]), Vec::new());
    match driver.run("Home", "menu").await.unwrap_err() {
        Error::Reverted { contract, reason } => {
            assert_eq!(contract, "Home");
            assert!(reason.contains("shop closed"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_custom_error_is_decoded() {
    let (client, engine) = client().await;
    let closed = alloy_json_abi::Error::parse("error Closed(uint256)").unwrap();
    let mut data = closed.selector().to_vec();
    data.extend(DynSolValue::Uint(U256::from(42u64), 256).abi_encode());
    engine.push(ExecOutcome {
        success: false,
        return_data: data.into(),
        ..Default::default()
    });

    let mut driver = Driver::new(client, ScriptedPrompt::new(Vec::<String>::new()), Vec::new());
    let err = driver.run("Home", "menu").await.unwrap_err();
    assert_eq!(err.to_string(), "Home reverted: Home::Closed(42)");
}

#[tokio::test]
async fn test_mutating_entry_point_is_sent_as_transaction() {
    let (client, engine) = client().await;
    let home = client.instance("Home").unwrap().address;
    let nonce_after_deploy = client.wallet().nonce();
    engine.push_logs(menu_logs(home, "m1", "Receipt", "t1", Some("menu")));

    let mut driver = Driver::new(client, ScriptedPrompt::new(Vec::<String>::new()), Vec::new())
        .with_options(DriverOptions {
            transact_mutating: true,
        });
    driver.run("Home", "buy").await.unwrap();

    let recorded = engine.recorded();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].transaction);
    assert_eq!(driver.client().wallet().nonce(), nonce_after_deploy + 1);
}

#[tokio::test]
async fn test_view_functions_stay_queries_in_transact_mode() {
    let (client, engine) = client().await;
    let home = client.instance("Home").unwrap().address;
    engine.push_logs(menu_logs(home, "m1", "Hello", "t1", Some("next")));

    let mut driver = Driver::new(client, ScriptedPrompt::new(Vec::<String>::new()), Vec::new())
        .with_options(DriverOptions {
            transact_mutating: true,
        });
    driver.run("Home", "menu").await.unwrap();
    assert!(!engine.recorded()[0].transaction);
}

#[tokio::test]
async fn test_unknown_entry_point() {
    let (client, _engine) = client().await;
    let mut driver = Driver::new(client, ScriptedPrompt::new(Vec::<String>::new()), Vec::new());

    assert!(matches!(
        driver.run("Nowhere", "menu").await,
        Err(Error::UnknownInstance(_))
    ));
    assert!(matches!(
        driver.run("Home", "missing").await,
        Err(Error::UnknownFunction { .. })
    ));
}
