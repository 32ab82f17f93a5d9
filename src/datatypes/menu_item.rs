/// One entry of a SetupMenu or SelectItem menu.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuItem {
    /// Item identifier, echoed back in menu selections. Zero only for
    /// the placeholder entry of an empty menu.
    pub identifier: u8,
    pub label: String,
    /// Raw EMS attribute block for the label, empty when unformatted.
    pub label_attribute: Vec<u8>,
    /// Icon to display next to the item, zero for none.
    pub icon_id: u32,
    pub icon_self_explanatory: bool,
    /// Next-action indicator byte, zero for none.
    pub next_action: u8,
    pub has_help: bool,
}

impl MenuItem {
    pub fn new(identifier: u8, label: impl Into<String>) -> Self {
        MenuItem {
            identifier,
            label: label.into(),
            ..MenuItem::default()
        }
    }
}
