//! Well-known host surface names and scene-graph paths
//!
//! These strings must match exactly what the host exposes. They are only
//! defaults: every path can be overridden in the core config, since host
//! updates are free to rename or move UI objects.

/// Flight HUD surface; its startup gates toolbar registration
pub const FLIGHT_HUD: &str = "UIFlightHud";

/// Main menu surface
pub const MAIN_MENU: &str = "UIMainMenu";

/// App tray group that holds the "other apps" buttons
pub const APP_BAR_OTHERS_GROUP: &str = "GameManager/Default Game Instance(Clone)/UI Manager(Clone)/Popup Canvas/Container/ButtonBar/BTN-App-Tray/appbar-others-group";

/// Stock button cloned as the template for new app buttons
pub const RESOURCE_MANAGER_BUTTON: &str = "BTN-Resource-Manager";

/// Child of a button holding its label and icon
pub const BUTTON_CONTENT: &str = "Content";

/// Label child under [`BUTTON_CONTENT`]
pub const BUTTON_TITLE: &str = "TXT-title";

/// Icon group child under [`BUTTON_CONTENT`]
pub const BUTTON_ICON_GROUP: &str = "GRP-icon";

/// Icon image child under [`BUTTON_ICON_GROUP`]
pub const BUTTON_ICON: &str = "ICO-asset";

/// Collected surface names for iteration
pub const HOST_SURFACES: &[(&str, &str)] = &[("FlightHud", FLIGHT_HUD), ("MainMenu", MAIN_MENU)];
