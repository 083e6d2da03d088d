//! Transcript rendering: session header and menu screens drawn with box characters

use std::io::{self, Write};

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::Function;
use alloy_primitives::B256;

use crate::domain::{ContractInstance, Field, LogValue, Menu, MenuItem};
use crate::infrastructure::abi::codec::format_value;

const RULE_WIDTH: usize = 40;
const BUTTON_TAIL: &str = "╰╌╌┄╌┄┄╌┄┄";

/// Header printed before each step's menus
pub fn header(
    out: &mut impl Write,
    instance: &ContractInstance,
    function: &Function,
    token: &B256,
    args: &[DynSolValue],
) -> io::Result<()> {
    writeln!(out, "╭{}", "╶".repeat(RULE_WIDTH))?;
    writeln!(out, "│ {instance}")?;
    writeln!(out, "│ {}", function.signature())?;
    writeln!(out, "│  - {token}")?;
    for arg in args {
        writeln!(out, "│  - {}", format_value(arg))?;
    }
    writeln!(out, "├{}", "╴".repeat(RULE_WIDTH))
}

/// Render a menu's items in emission order
pub fn menu(out: &mut impl Write, menu: &Menu) -> io::Result<()> {
    for item in &menu.items {
        match item.field {
            Field::Title | Field::Text if item.args.is_empty() => writeln!(out, "│")?,
            Field::Title => {
                writeln!(out, "│")?;
                writeln!(out, "│ ░ {} ░", first_arg(item))?;
                writeln!(out, "│")?;
            }
            Field::Text => writeln!(out, "│  {}", joined(&item.args))?,
            Field::Target => target(out, menu, item)?,
            Field::Id => {}
            _ => writeln!(out, "   {} [{}]", item.field, joined(&item.args))?,
        }
    }
    writeln!(out, "╵")
}

fn target(out: &mut impl Write, menu: &Menu, item: &MenuItem) -> io::Result<()> {
    let id = first_arg(item);
    writeln!(out, "│")?;
    match menu.targets.get(&id) {
        Some(target) => {
            button(out, target.label())?;
            for note in &target.note {
                writeln!(out, "│  ┊ {note}")?;
            }
            if !target.note.is_empty() {
                writeln!(out, "│  ┊ ")?;
            }
            if let Some(action) = &target.action {
                writeln!(out, "│  ┊ > {action}")?;
            }
        }
        None => button(out, &id)?,
    }
    writeln!(out, "│  {BUTTON_TAIL}")
}

/// Draw the framed top of a button
pub fn button(out: &mut impl Write, label: &str) -> io::Result<()> {
    let width = label.chars().count() + 2;
    writeln!(out, "│  ╭{}╮", "┈".repeat(width))?;
    writeln!(out, "│  ┊ {label} ┊")?;
    writeln!(out, "│  ┊{}{BUTTON_TAIL}", " ".repeat(width))
}

pub fn no_target(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "│ No target!")
}

fn first_arg(item: &MenuItem) -> String {
    item.args.first().map(LogValue::to_string).unwrap_or_default()
}

fn joined(args: &[LogValue]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
