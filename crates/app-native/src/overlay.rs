//! Status line shown in the window title, plus the control hints logged at
//! startup.

use app_core::Mode;

pub const APP_TITLE: &str = "Proyecto 231225 - Imperial Emerald & Gold";

pub fn title(mode: Mode, gesture_active: bool) -> String {
    if gesture_active {
        format!("{APP_TITLE} | Status: {mode}")
    } else {
        format!("{APP_TITLE} | Status: {mode} (gesture control off)")
    }
}

pub fn log_controls() {
    log::info!("[scene] controls:");
    log::info!("  open hand (release left button): unleash chaos");
    log::info!("  closed fist (hold left button): form tree");
    log::info!("  move hand (cursor): adjust perspective");
    log::info!("  scroll: zoom, Esc: quit");
}
