pub mod config;
pub mod constants;
pub mod context;
pub mod draw;
pub mod error;
pub mod highlight;
pub mod interaction;
pub mod mesh;
pub mod model;
pub mod painter;
pub mod panel;
pub mod pose;
pub mod raycast;
pub mod scene;

pub use config::SceneConfig;
pub use context::{FrameInput, FrameReport, InteractionContext, PressOutcome};
pub use error::{XrError, XrResult};
pub use highlight::{ColorOnly, EmissiveCapable, HighlightController, Highlightable, Material};
pub use interaction::{Controller, CubeVisual, InteractionState, RayVisual};
pub use painter::HitPainter;
pub use panel::{Panel, PixelBuffer};
pub use pose::{ControllerId, ControllerPose, ControllerRole, Handedness, Ray};
pub use raycast::{intersect, Intersectable, Intersection, Quad, TargetId};
pub use scene::{Scene, Target};
