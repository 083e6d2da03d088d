//! Shared fixtures: an in-memory engine and helpers to script its logs
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::{Event, JsonAbi};
use alloy_primitives::{Address, Bytes, U256};
use menucall::domain::{ContractArtifact, ContractRegistry};
use menucall::infrastructure::{ExecOutcome, ExecutionEngine, RawLog, Wallet};
use menucall::session::Client;

pub const HOME_ABI: &[&str] = &[
    "function menu(bytes32 token) view",
    "function next(bytes32 token, (string,string)[] response) view",
    "function plain(bytes32 token) view",
    "function buy(bytes32 token)",
    "event Menu_Title(string menu, string title)",
    "event Menu_Id(string menu)",
    "event Menu_Text(string menu, string text)",
    "event Target_Id((string,string) key)",
    "event Target_Button((string,string) key, string label)",
    "event Target_Note((string,string) key, string note)",
    "event Target_Action((string,string) key, string selector)",
    "event Target_Action((string,string) key, string selector, string contract, string extra)",
    "error Closed(uint256 until)",
];

/// One engine invocation as seen by the test
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub to: Option<Address>,
    pub data: Bytes,
    pub transaction: bool,
}

#[derive(Debug, Default)]
struct State {
    outcomes: VecDeque<ExecOutcome>,
    recorded: Vec<Recorded>,
    deployed: u8,
    funded: Vec<(Address, U256)>,
}

/// Engine answering calls from a queue of prepared outcomes.
///
/// Deployments always succeed at `0x…10`, `0x…11`, and so on.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    state: Arc<Mutex<State>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, outcome: ExecOutcome) {
        self.state.lock().unwrap().outcomes.push_back(outcome);
    }

    pub fn push_logs(&self, logs: Vec<RawLog>) {
        self.push(ExecOutcome {
            success: true,
            logs,
            ..Default::default()
        });
    }

    /// Calls and transactions sent to existing contracts
    pub fn recorded(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().recorded.clone()
    }

    pub fn funded(&self) -> Vec<(Address, U256)> {
        self.state.lock().unwrap().funded.clone()
    }

    fn next(&self, to: Address, data: Bytes, transaction: bool) -> anyhow::Result<ExecOutcome> {
        let mut state = self.state.lock().unwrap();
        state.recorded.push(Recorded {
            to: Some(to),
            data,
            transaction,
        });
        state
            .outcomes
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted outcome left"))
    }
}

#[async_trait::async_trait]
impl ExecutionEngine for ScriptedEngine {
    async fn call(&self, to: Address, data: Bytes) -> anyhow::Result<ExecOutcome> {
        self.next(to, data, false)
    }

    async fn transact(
        &self,
        wallet: &mut Wallet,
        to: Option<Address>,
        data: Bytes,
    ) -> anyhow::Result<ExecOutcome> {
        let outcome = match to {
            Some(to) => self.next(to, data, true)?,
            None => {
                let mut state = self.state.lock().unwrap();
                let address = Address::with_last_byte(0x10 + state.deployed);
                state.deployed += 1;
                ExecOutcome {
                    success: true,
                    created_address: Some(address),
                    ..Default::default()
                }
            }
        };
        if outcome.success {
            wallet.bump_nonce();
        }
        Ok(outcome)
    }

    async fn fund(&self, address: Address, amount: U256) -> anyhow::Result<()> {
        self.state.lock().unwrap().funded.push((address, amount));
        Ok(())
    }

    fn endpoint_name(&self) -> String {
        "scripted".to_string()
    }
}

pub fn registry() -> ContractRegistry {
    let mut registry = ContractRegistry::new();
    let mut home = ContractArtifact::new("Home", JsonAbi::parse(HOME_ABI.iter().copied()).unwrap());
    home.bytecode = Some(Bytes::from(vec![0x60, 0x80, 0x60, 0x40]));
    registry.add(home);
    registry.add(ContractArtifact::new(
        "Shop",
        JsonAbi::parse(["function browse(bytes32 token) view"]).unwrap(),
    ));
    registry
}

/// Client with `Home` deployed, plus a handle on its engine
pub async fn client() -> (Client, ScriptedEngine) {
    let engine = ScriptedEngine::new();
    let mut client = Client::new(registry(), Box::new(engine.clone()), Wallet::random());
    client.deploy("Home").await.unwrap();
    (client, engine)
}

/// Encode a log for the event with signature `signature`
pub fn log(address: Address, signature: &str, values: Vec<DynSolValue>) -> RawLog {
    let event = Event::parse(signature).unwrap();
    RawLog {
        address,
        topics: vec![event.selector()],
        data: DynSolValue::Tuple(values).abi_encode_params().into(),
    }
}

pub fn text(value: &str) -> DynSolValue {
    DynSolValue::String(value.to_string())
}

pub fn key(menu: &str, id: &str) -> DynSolValue {
    DynSolValue::Tuple(vec![text(menu), text(id)])
}

/// A menu with a title and a single target
pub fn menu_logs(address: Address, menu: &str, title: &str, target: &str, action: Option<&str>) -> Vec<RawLog> {
    let mut logs = vec![
        log(address, "event Menu_Title(string,string)", vec![text(menu), text(title)]),
        log(address, "event Menu_Id(string)", vec![text(menu)]),
        log(address, "event Target_Id((string,string))", vec![key(menu, target)]),
        log(
            address,
            "event Target_Button((string,string),string)",
            vec![key(menu, target), text(&format!("{target}!"))],
        ),
    ];
    if let Some(selector) = action {
        logs.push(log(
            address,
            "event Target_Action((string,string),string)",
            vec![key(menu, target), text(selector)],
        ));
    }
    logs
}
