use std::fmt;

use crate::entry::AliasEntry;

/// Instruction for the alias dialog's client side.
/// 傳送給別名對話框前端的指令。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Alert(String),
    AppendAlias(AliasEntry),
    RemoveAlias(String),
    ClearList,
    ClearInput,
    SetModified(bool),
}

impl UiCommand {
    /// Script form for clients driven by eval'd JavaScript. Only list
    /// mutations have one.
    pub fn to_script(&self) -> Option<String> {
        match self {
            UiCommand::AppendAlias(entry) => Some(format!(
                "scCreateAlias({}, {}, {});",
                js_string(&entry.list_id),
                js_string(&entry.header),
                js_string(&entry.value)
            )),
            UiCommand::RemoveAlias(list_id) => Some(format!("scRemoveAlias({});", js_string(list_id))),
            _ => None,
        }
    }
}

impl fmt::Display for UiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiCommand::Alert(message) => write!(f, "alert: {message}"),
            UiCommand::AppendAlias(entry) => {
                write!(f, "+ {} {} ({})", entry.list_id, entry.header, entry.value)
            }
            UiCommand::RemoveAlias(list_id) => write!(f, "- {list_id}"),
            UiCommand::ClearList => f.write_str("clear list"),
            UiCommand::ClearInput => f.write_str("clear input"),
            UiCommand::SetModified(modified) => write!(f, "modified: {modified}"),
        }
    }
}

/// Receives UI commands emitted by the controller.
pub trait UiDispatcher {
    fn dispatch(&mut self, command: UiCommand);
}

impl UiDispatcher for Vec<UiCommand> {
    fn dispatch(&mut self, command: UiCommand) {
        self.push(command);
    }
}

impl<T: UiDispatcher + ?Sized> UiDispatcher for &mut T {
    fn dispatch(&mut self, command: UiCommand) {
        (**self).dispatch(command);
    }
}

/// Records commands in emission order.
/// 依發出順序記錄指令。
#[derive(Debug, Default, Clone)]
pub struct CommandQueue {
    commands: Vec<UiCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UiCommand> {
        self.commands.iter()
    }

    pub fn alerts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            UiCommand::Alert(message) => Some(message.as_str()),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&mut self) -> Vec<UiCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl UiDispatcher for CommandQueue {
    fn dispatch(&mut self, command: UiCommand) {
        log::debug!("ui command: {command}");
        self.commands.push(command);
    }
}

/// Quotes `value` as a double-quoted JavaScript string literal.
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '<' => out.push_str("\\x3c"),
            '>' => out.push_str("\\x3e"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            ch if (ch as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", ch as u32)),
            ch => out.push(ch),
        }
    }
    out.push('"');
    out
}
