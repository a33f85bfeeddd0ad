//! Leaf models feeding a power unit: input profiles and the battery store.

/// Unit battery energy store.
pub mod battery;
/// Constant load inside a daily on-window.
pub mod load;
/// Bell-curve solar array output.
pub mod solar;
pub mod types;

// Re-export the main types for convenience
pub use battery::Battery;
pub use load::LoadProfile;
pub use solar::SolarProfile;
pub use types::DeviceContext;
pub use types::Profile;
