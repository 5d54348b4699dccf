use crate::record::EventRecord;

/// Screen-space pointer position the visible menu is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Anchor {
    pub x: i32,
    pub y: i32,
}

/// Observable state of the context menu controller.
///
/// `Visible` always carries an attached record: the controller only ever
/// becomes visible through a recognized entry right-click, which attaches
/// one. Exactly one attachment exists at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    Hidden,
    Visible {
        attached: EventRecord,
        anchor: Anchor,
    },
}

impl MenuState {
    pub fn is_visible(&self) -> bool {
        matches!(self, MenuState::Visible { .. })
    }
}

/// The two actions the menu offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ExportOutlook,
    ExportGoogle,
}

/// Element ids the menu items carry in the rendered chrome
impl MenuAction {
    pub fn element_id(&self) -> &'static str {
        match self {
            MenuAction::ExportOutlook => "export-outlook",
            MenuAction::ExportGoogle => "export-google",
        }
    }
}
