//! Driver - the query, build, navigate, dispatch loop

use std::io::Write;

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::{Function, StateMutability};
use alloy_primitives::B256;
use rand::RngCore;
use tracing::{debug, info};

use super::navigator::navigate;
use super::{Client, QueryResult};
use crate::domain::{ContractInstance, MenuGraph};
use crate::error::{Error, Result};
use crate::ui::{render, Prompt};

#[derive(Debug, Clone, Copy, Default)]
pub struct DriverOptions {
    /// Send non-view functions as transactions instead of queries
    pub transact_mutating: bool,
}

/// Runs one interactive session from an entry function until no target is
/// chosen or a fatal error occurs.
pub struct Driver<P, W> {
    client: Client,
    prompt: P,
    out: W,
    options: DriverOptions,
}

impl<P: Prompt, W: Write> Driver<P, W> {
    pub fn new(client: Client, prompt: P, out: W) -> Self {
        Self {
            client,
            prompt,
            out,
            options: DriverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DriverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn into_parts(self) -> (Client, P, W) {
        (self.client, self.prompt, self.out)
    }

    /// Start at `function` on the instance named by `contract`
    pub async fn run(&mut self, contract: &str, function: &str) -> Result<()> {
        let mut instance = self.client.instance(contract)?;
        let mut fragment = instance.function(function)?.clone();
        let mut args: Vec<DynSolValue> = Vec::new();
        let mut step = 0usize;

        loop {
            step += 1;
            let token = correlation_token();
            let mut call_args = Vec::with_capacity(args.len() + 1);
            call_args.push(DynSolValue::FixedBytes(token, 32));
            call_args.extend(args.iter().cloned());

            info!(step, contract = %instance, function = %fragment.signature(), "executing");
            let QueryResult { logs, .. } = self.execute(&instance, &fragment, &call_args).await?;
            debug!(step, records = logs.len(), "logs decoded");

            let graph = MenuGraph::build(&logs, &instance, &self.client.resolver())?;
            render::header(&mut self.out, &instance, &fragment, &token, &args)?;

            let Some(target) = navigate(&graph, &mut self.prompt, &mut self.out)? else {
                render::no_target(&mut self.out)?;
                self.out.flush()?;
                info!(step, "no target chosen, session ends");
                return Ok(());
            };
            let action = target.action.as_ref().ok_or_else(|| Error::DeadEnd {
                menu: target.menu.clone(),
                id: target.id.clone(),
            })?;
            debug!(%action, "dispatching");

            args = if action.accepts_menu_response() {
                vec![DynSolValue::Array(Vec::new())]
            } else {
                Vec::new()
            };
            fragment = action.contract.counterpart(&action.fragment)?.clone();
            instance = action.contract.clone();
        }
    }

    async fn execute(
        &mut self,
        instance: &ContractInstance,
        fragment: &Function,
        args: &[DynSolValue],
    ) -> Result<QueryResult> {
        let read_only = matches!(
            fragment.state_mutability,
            StateMutability::View | StateMutability::Pure
        );
        if self.options.transact_mutating && !read_only {
            self.client.transact(instance, fragment, args).await
        } else {
            self.client.query(instance, fragment, args).await
        }
    }
}

/// Fresh random token passed as the first argument of every step
fn correlation_token() -> B256 {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    B256::from(bytes)
}
