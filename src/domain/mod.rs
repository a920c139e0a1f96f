//! Domain module containing core entities, value objects, and domain events.
//!
//! - **Entities**: objects with identity (`WorkoutSession`)
//! - **Value Objects**: immutable objects without identity (`KeypointFrame`,
//!   `UserProfile`, `WorkoutStatistics`)
//! - **Domain Events**: `MotionEvent`, `SessionEvent`, `WorkoutEvent`
//! - **Store traits**: seams to the external persistence collaborators

pub mod events;
pub mod keypoint;
pub mod profile;
pub mod session;

// Re-export all domain types
pub use events::*;
pub use keypoint::*;
pub use profile::*;
pub use session::*;
