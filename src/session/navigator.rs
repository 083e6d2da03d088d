//! Navigator - shows each menu in turn until the operator picks a target

use std::io::Write;

use tracing::debug;

use crate::domain::{MenuGraph, Target};
use crate::error::Result;
use crate::ui::{render, Choice, Prompt};

pub const PROMPT_MESSAGE: &str = "Pick an option";

/// Render menus in graph order and return the first target chosen.
///
/// A cancelled prompt moves on to the next menu; `None` means every menu
/// was passed over.
pub fn navigate<'g>(
    graph: &'g MenuGraph,
    prompt: &mut impl Prompt,
    out: &mut impl Write,
) -> Result<Option<&'g Target>> {
    for menu in graph.menus() {
        render::menu(out, menu)?;
        out.flush()?;

        let choices: Vec<Choice> = menu
            .targets
            .iter()
            .map(|(id, target)| Choice::new(id.clone(), target.label()))
            .collect();
        if choices.is_empty() {
            debug!(menu = %menu.id, "menu has no targets");
            continue;
        }

        let picked = prompt.select(PROMPT_MESSAGE, &choices)?;
        writeln!(out)?;

        match picked.and_then(|id| menu.targets.get(&id)) {
            Some(target) => {
                debug!(menu = %menu.id, target_id = %target.id, "target chosen");
                return Ok(Some(target));
            }
            None => debug!(menu = %menu.id, "prompt cancelled"),
        }
    }
    Ok(None)
}
