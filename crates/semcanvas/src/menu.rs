//! Contextual menus and toolbar actions.
//!
//! Menus are opened by the owner through the controller's actions; picking
//! an item is reported back to the controller, which turns it into the
//! matching owner callback.

use semcanvas_core::{geometry::Point, identifier::Id};

/// An open contextual menu.
#[derive(Debug, Clone, PartialEq)]
pub enum Menu {
    /// Shown after a connection was dropped on empty canvas.
    DragEdgeToCanvas { source: Id, position: Point },
    /// Bulk actions for the current selection, anchored at a node.
    SelectionActions { anchor: Id },
    /// Actions for a group, anchored at one of its members.
    Group { group: Id, anchor: Id },
}

impl Menu {
    /// Items offered by this menu, in display order.
    pub fn items(&self) -> &'static [MenuItem] {
        match self {
            Self::DragEdgeToCanvas { .. } => &[
                MenuItem::CreateAssociationTarget,
                MenuItem::CreateAssociationSource,
                MenuItem::CreateChild,
                MenuItem::CreateParent,
            ],
            Self::SelectionActions { .. } => &[
                MenuItem::LayoutSelection,
                MenuItem::CreateGroup,
                MenuItem::ExpandSelection,
                MenuItem::FilterSelection,
                MenuItem::CreateViewFromSelection,
                MenuItem::ProfileSelection,
                MenuItem::HideSelection,
                MenuItem::RemoveSelection,
            ],
            Self::Group { .. } => &[MenuItem::DissolveGroup, MenuItem::ToggleGroupAnchors],
        }
    }

    /// Checks whether `item` belongs to this menu.
    pub fn offers(&self, item: MenuItem) -> bool {
        self.items().contains(&item)
    }
}

/// An entry of a contextual menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItem {
    /// Create a class the dragged association points to.
    CreateAssociationTarget,
    /// Create a class the dragged association starts from.
    CreateAssociationSource,
    /// Create a class generalized by the drag source.
    CreateChild,
    /// Create a class generalizing the drag source.
    CreateParent,
    LayoutSelection,
    CreateGroup,
    ExpandSelection,
    FilterSelection,
    CreateViewFromSelection,
    ProfileSelection,
    HideSelection,
    RemoveSelection,
    DissolveGroup,
    ToggleGroupAnchors,
}

/// Buttons of the node toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeAction {
    ShowDetail,
    Edit,
    CreateProfile,
    Duplicate,
    Hide,
    Delete,
    ToggleAnchor,
    AddAttribute,
    ShowSelectionActions,
    OpenGroupMenu,
}

/// Buttons of an attribute row inside a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeAction {
    Edit,
    Remove,
    MoveUp,
    MoveDown,
}

/// Buttons of the edge toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeAction {
    ShowDetail,
    Edit,
    CreateProfile,
    Hide,
    Delete,
}

/// Buttons of the canvas toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanvasAction {
    CreateClass,
    ToggleExplorationMode,
    FitToView,
}
