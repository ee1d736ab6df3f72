/// Market Backdrop - Spotlight-Revealed Terminal Background
///
/// A full-screen synthetic market terminal drawn behind a pointer-tracked
/// spotlight. Outside the spotlight the surface stays black.
///
/// The library includes:
/// - A deterministic, seeded market simulator feeding every panel
/// - Panel renderers drawing in pixel space onto a `Surface`
/// - The spotlight state machine and the radial-mask compositor
/// - A tokio frame loop with mount/unmount lifecycle
/// - Crossterm host glue for the `market-backdrop` binary
pub mod backdrop;
pub mod compositor;
pub mod config;
pub mod error;
pub mod fx;
pub mod host;
pub mod palette;
pub mod panel;
pub mod runtime;
pub mod sim;
pub mod spotlight;
pub mod surface;

// Re-export commonly used types for convenience
pub use backdrop::Backdrop;
pub use config::{BackdropConfig, Preset, SpotlightConfig};
pub use error::BackdropError;
pub use fx::{FxState, FxStore};
pub use panel::{layout, FrameTime, PanelKind, PanelSlot};
pub use runtime::{mount, run_frame_loop, FrameSink, InputEvent, LoopStats, MountHandle};
pub use sim::{DatasetSpec, MarketSimulator, MarketState};
pub use spotlight::{Spotlight, SpotlightPhase};
pub use surface::{Bounds, CellMetrics, CellSurface, RecordingSurface, Surface};
