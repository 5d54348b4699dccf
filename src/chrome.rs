//! Interaction chrome the schedule template normally ships: the context
//! menu with its two export items and the detail overlay. A loaded
//! fragment that already carries them is left alone; missing pieces are
//! appended so the controllers always have their elements to hit-test
//! against.

use crate::components::context_menu::MenuAction;
use crate::components::detail_overlay::{CLOSE_CLASS, OVERLAY_ID};
use crate::markup::Document;

/// Element id of the context menu container
pub const MENU_ID: &str = "context-menu";

/// Append any missing chrome elements to the document
pub fn ensure_chrome(doc: &mut Document) {
    if doc.element_by_id(MENU_ID).is_none() {
        let root = doc.root();
        let menu = doc.append_element(root, "div");
        doc.set_attr(menu, "id", MENU_ID);
        doc.set_attr(menu, "class", "context-menu");

        let list = doc.append_element(menu, "ul");
        for (action, label) in [
            (MenuAction::ExportOutlook, "Export to Outlook"),
            (MenuAction::ExportGoogle, "Export to Google Calendar"),
        ] {
            let item = doc.append_element(list, "li");
            doc.set_attr(item, "id", action.element_id());
            doc.append_text(item, label);
        }
    }

    if doc.element_by_id(OVERLAY_ID).is_none() {
        let root = doc.root();
        let overlay = doc.append_element(root, "div");
        doc.set_attr(overlay, "id", OVERLAY_ID);
        doc.set_attr(overlay, "class", "modal");

        let content = doc.append_element(overlay, "div");
        doc.set_attr(content, "class", "modal-content");

        let close = doc.append_element(content, "span");
        doc.set_attr(close, "class", CLOSE_CLASS);
        doc.append_text(close, "\u{d7}");

        let text = doc.append_element(content, "div");
        doc.set_attr(text, "id", "modal-text");
    }
}
