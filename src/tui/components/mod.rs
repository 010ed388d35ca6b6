// Components module - reusable UI building blocks
//
// - Trigger page: the scrollable background with the open button
// - Application form: the body rendered inside the dialog
// - Logs panel: captured tracing output (F2)
// - Status bar: live region and keybind hints
// - Toast: how the last decision settled
//
// Each component is a focused, single-responsibility module.

pub mod application_form;
pub mod logs_panel;
pub mod scrollbar;
pub mod status_bar;
pub mod toast;
pub mod trigger_page;

pub use toast::Toast;
