//! Session client - owns contracts, instances and the engine for one run

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::Function;
use alloy_primitives::{Address, U256};
use tracing::{debug, warn};

use crate::domain::{ContractInstance, ContractRegistry, Deployments, LogRecord, LogValue, Resolver};
use crate::error::{Error, Result};
use crate::infrastructure::abi::codec;
use crate::infrastructure::{ExecOutcome, ExecutionEngine, RawLog, Wallet};

/// Decoded outcome of a query or transaction
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Decoded return values
    pub result: Vec<DynSolValue>,
    /// Recognised logs in emission order
    pub logs: Vec<LogRecord>,
}

pub struct Client {
    registry: ContractRegistry,
    deployments: Deployments,
    engine: Box<dyn ExecutionEngine>,
    wallet: Wallet,
}

impl Client {
    pub fn new(registry: ContractRegistry, engine: Box<dyn ExecutionEngine>, wallet: Wallet) -> Self {
        Self {
            registry,
            deployments: Deployments::new(),
            engine,
            wallet,
        }
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn engine(&self) -> &dyn ExecutionEngine {
        self.engine.as_ref()
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.registry, &self.deployments)
    }

    /// Credit the session wallet (dev nodes only)
    pub async fn fund_wallet(&self, amount: U256) -> Result<()> {
        self.engine.fund(self.wallet.address(), amount).await?;
        debug!(address = %self.wallet.address(), %amount, "wallet funded");
        Ok(())
    }

    /// Bind a known contract to an existing address
    pub fn bind(&mut self, name: &str, address: Address) -> Result<ContractInstance> {
        let contract = self
            .registry
            .contract(name)
            .cloned()
            .ok_or_else(|| Error::UnknownContract(name.to_string()))?;
        let instance = ContractInstance::new(address, contract);
        self.deployments.insert_named(name, instance.clone());
        debug!(%instance, "bound instance");
        Ok(instance)
    }

    /// Deploy a contract by name; a name deployed before is reused
    pub async fn deploy(&mut self, name: &str) -> Result<ContractInstance> {
        if let Some(existing) = self.deployments.by_name(name) {
            return Ok(existing.clone());
        }

        let contract = self
            .registry
            .contract(name)
            .cloned()
            .ok_or_else(|| Error::UnknownContract(name.to_string()))?;
        let bytecode = contract
            .bytecode
            .clone()
            .ok_or_else(|| Error::MissingBytecode(name.to_string()))?;

        let outcome = self.engine.transact(&mut self.wallet, None, bytecode).await?;
        if !outcome.success {
            return Err(Error::Reverted {
                contract: name.to_string(),
                reason: codec::decode_revert(&self.registry, &outcome.return_data),
            });
        }
        let address = outcome
            .created_address
            .ok_or_else(|| anyhow::anyhow!("deployment of {name} returned no address"))?;

        let source = contract.source.display().to_string();
        let instance = ContractInstance::new(address, contract);
        self.deployments.insert_named(name, instance.clone());
        tracing::info!(%instance, %source, "deployed");
        Ok(instance)
    }

    /// Resolve a contract name or address to a known instance
    pub fn instance(&self, token: &str) -> Result<ContractInstance> {
        self.deployments.instance(token)
    }

    /// Read-only call; returns decoded results and the logs it emitted
    pub async fn query(
        &self,
        instance: &ContractInstance,
        function: &Function,
        args: &[DynSolValue],
    ) -> Result<QueryResult> {
        let data = codec::encode_call(function, args)?;
        let outcome = self.engine.call(instance.address, data).await?;
        self.finish(instance, function, outcome)
    }

    /// Signed transaction from the session wallet
    pub async fn transact(
        &mut self,
        instance: &ContractInstance,
        function: &Function,
        args: &[DynSolValue],
    ) -> Result<QueryResult> {
        let data = codec::encode_call(function, args)?;
        let outcome = self
            .engine
            .transact(&mut self.wallet, Some(instance.address), data)
            .await?;
        self.finish(instance, function, outcome)
    }

    fn finish(
        &self,
        instance: &ContractInstance,
        function: &Function,
        outcome: ExecOutcome,
    ) -> Result<QueryResult> {
        if !outcome.success {
            return Err(Error::Reverted {
                contract: instance.name().to_string(),
                reason: codec::decode_revert(&self.registry, &outcome.return_data),
            });
        }

        let result = codec::decode_output(function, &outcome.return_data)?;
        debug!(
            function = %function.signature(),
            result = ?result.iter().map(codec::format_value).collect::<Vec<_>>(),
            "call returned"
        );

        Ok(QueryResult {
            result,
            logs: self.decode_logs(&outcome.logs)?,
        })
    }

    /// Convert raw logs into records attributed to known instances
    pub fn decode_logs(&self, raw: &[RawLog]) -> Result<Vec<LogRecord>> {
        let mut records = Vec::with_capacity(raw.len());
        for log in raw {
            let origin = self
                .deployments
                .by_address(&log.address)
                .ok_or(Error::UnknownOrigin(log.address))?;

            let Some((_, event)) = log.topics.first().and_then(|topic| self.registry.event(topic))
            else {
                warn!(
                    origin = %origin,
                    topic = ?log.topics.first(),
                    "unrecognized log"
                );
                continue;
            };

            let values = codec::decode_event(event, &log.topics, &log.data).map_err(|err| {
                Error::DecodeEvent {
                    event: event.signature(),
                    reason: format!("{err:#}"),
                }
            })?;
            records.push(LogRecord::new(
                origin.clone(),
                event.name.clone(),
                values.iter().map(LogValue::from).collect(),
            ));
        }
        Ok(records)
    }
}
