//! Conversion of call-tracer output into an execution outcome

use alloy::rpc::types::trace::geth::{CallFrame, GethTrace};
use anyhow::{bail, Result};

use super::{ExecOutcome, RawLog};

/// Convert a `callTracer` result into an outcome
pub fn convert_call_trace(trace: GethTrace) -> Result<ExecOutcome> {
    match trace {
        GethTrace::CallTracer(frame) => Ok(outcome_from_frame(frame)),
        _ => bail!("node did not return a call tracer frame"),
    }
}

fn outcome_from_frame(frame: CallFrame) -> ExecOutcome {
    let mut logs = Vec::new();
    collect_logs(&frame, &mut logs);
    ExecOutcome {
        success: frame.error.is_none(),
        return_data: frame.output.unwrap_or_default(),
        logs,
        created_address: None,
    }
}

/// Flatten a call tree into emission order, leaving out reverted frames
fn collect_logs(frame: &CallFrame, out: &mut Vec<RawLog>) {
    if frame.error.is_some() {
        return;
    }

    let mut next_call = 0;
    for log in &frame.logs {
        let position = log
            .position
            .map(|p| p as usize)
            .unwrap_or(next_call)
            .min(frame.calls.len());
        while next_call < position {
            collect_logs(&frame.calls[next_call], out);
            next_call += 1;
        }
        let Some(address) = log.address else {
            continue;
        };
        out.push(RawLog {
            address,
            topics: log.topics.clone().unwrap_or_default(),
            data: log.data.clone().unwrap_or_default(),
        });
    }
    for call in frame.calls.iter().skip(next_call) {
        collect_logs(call, out);
    }
}
