mod empty_message;
mod help;
mod status;
mod toast;

/// Namespace for small pre-styled widgets shared by the screens.
pub struct UiComponent;
