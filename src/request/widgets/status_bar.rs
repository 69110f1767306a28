/// Dynamic status bar state, recomputed after every key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBarState {
    /// Left side hint text (e.g., "i: insert  j/k: fields")
    pub left_hint: String,
    /// Right side hint text (e.g., "]: next  [: back")
    pub right_hint: String,
}

impl StatusBarState {
    fn new(left: &str, right: &str) -> Self {
        Self {
            left_hint: left.to_string(),
            right_hint: right.to_string(),
        }
    }

    pub fn sidebar() -> Self {
        Self::new("j/k: steps  Enter: open", "1-5: jump  :help")
    }

    pub fn list() -> Self {
        Self::new("j/k: move  Enter: select", "Tab: field  ]: next  [: back")
    }

    pub fn vehicle_list() -> Self {
        Self::new("j/k: move  Enter: select  f: status", "/: search  ]: next")
    }

    pub fn text_normal() -> Self {
        Self::new("i: edit  Tab: field", "]: next  [: back  Ctrl+h: steps")
    }

    pub fn text_insert() -> Self {
        Self::new("Type to enter text", "Esc: normal  Enter: done  Tab: next field")
    }

    pub fn toggle() -> Self {
        Self::new("Space: change  Tab: field", "]: next  [: back")
    }

    pub fn photos() -> Self {
        Self::new("c: camera  g: gallery  d: delete", "]: next  [: back")
    }

    pub fn submit(ready: bool) -> Self {
        if ready {
            Self::new("Ready to submit", "Enter: submit  [: back")
        } else {
            Self::new("Request incomplete", "[: back  :jump <step>")
        }
    }

    pub fn command_mode() -> Self {
        Self::new("", "Enter: run  Esc: cancel")
    }

    pub fn confirm() -> Self {
        Self::new("", "y: confirm  n: cancel")
    }
}
