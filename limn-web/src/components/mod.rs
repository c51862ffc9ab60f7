pub mod admin_panel;
pub mod option_select;
pub mod preview;
pub mod range_select;
pub mod roster_panel;
pub mod text_field;

pub use admin_panel::AdminPanel;
pub use option_select::OptionSelect;
pub use preview::PreviewPanel;
pub use range_select::RangeSelect;
pub use roster_panel::RosterPanel;
pub use text_field::TextField;
