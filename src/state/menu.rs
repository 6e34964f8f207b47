//! Menu construction
//!
//! A menu is an ordered list of options rendered either as a reply keyboard,
//! where the payload is the literal text the user sends back, or as inline
//! buttons, where the payload is a callback token. The two styles are never
//! mixed within one menu.

use super::context::Step;
use super::flow::Flow;

/// Rendering style of a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Reply,
    Inline,
}

/// One selectable option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub label: String,
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    kind: MenuKind,
    options: Vec<MenuOption>,
}

impl Menu {
    /// Reply keyboard; each label is also the text the user sends back
    pub fn reply<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = labels
            .into_iter()
            .map(|label| {
                let label = label.into();
                MenuOption { payload: label.clone(), label }
            })
            .collect();
        Self { kind: MenuKind::Reply, options }
    }

    /// Inline buttons of `(label, callback token)` pairs
    pub fn inline<I, L, T>(buttons: I) -> Self
    where
        I: IntoIterator<Item = (L, T)>,
        L: Into<String>,
        T: Into<String>,
    {
        let options = buttons
            .into_iter()
            .map(|(label, token)| MenuOption { label: label.into(), payload: token.into() })
            .collect();
        Self { kind: MenuKind::Inline, options }
    }

    pub fn kind(&self) -> MenuKind {
        self.kind
    }

    pub fn options(&self) -> &[MenuOption] {
        &self.options
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// What to attach to an outbound message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Markup {
    #[default]
    None,
    Menu(Menu),
    /// Hide a previously shown reply keyboard
    RemoveKeyboard,
}

impl From<Menu> for Markup {
    fn from(menu: Menu) -> Self {
        Markup::Menu(menu)
    }
}

impl From<Option<Menu>> for Markup {
    fn from(menu: Option<Menu>) -> Self {
        menu.map(Markup::Menu).unwrap_or_default()
    }
}

/// Dynamic content for content-dependent menus, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuContext {
    pub items: Vec<String>,
}

impl MenuContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { items: items.into_iter().map(Into::into).collect() }
    }
}

/// Per-flow layout function; must be deterministic in its inputs
pub type MenuLayout = fn(Step, &MenuContext) -> Option<Menu>;

/// Build the menu a flow shows at `step`
pub fn build(flow: &Flow, step: Step, context: &MenuContext) -> Option<Menu> {
    flow.layout().and_then(|layout| layout(step, context))
}
