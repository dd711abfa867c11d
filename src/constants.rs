// Browser-host constants: DOM ids, panel seed text and button labels.

// DOM
pub const CANVAS_ID: &str = "app-canvas";
pub const VR_BUTTON_ID: &str = "vr-button";

// Panel seed content (2D canvas coordinates, top-down)
pub const PANEL_BACKGROUND: &str = "#ffffff";
pub const PANEL_TEXT_COLOR: &str = "#000000";
pub const PANEL_FONT: &str = "20px Arial";
pub const PANEL_TITLE: (&str, f64, f64) = ("Interactive Canvas Panel", 60.0, 90.0);
pub const PANEL_SUBTITLE: (&str, f64, f64) = ("Click Enter VR to begin", 70.0, 120.0);

// VR button labels
pub const LABEL_ENTER: &str = "ENTER VR";
pub const LABEL_EXIT: &str = "EXIT VR";
pub const LABEL_UNSUPPORTED: &str = "VR NOT SUPPORTED";
pub const LABEL_INSECURE: &str = "WEBXR NEEDS HTTPS";

pub const VR_BUTTON_STYLE: &str = "position:absolute;bottom:20px;left:calc(50% - 75px);width:150px;\
padding:12px 6px;border:1px solid #fff;border-radius:4px;background:rgba(0,0,0,0.1);\
color:#fff;font:normal 13px sans-serif;text-align:center;opacity:0.5;outline:none;z-index:999;cursor:pointer";
