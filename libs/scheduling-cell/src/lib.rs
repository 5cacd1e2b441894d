pub mod clock;
pub mod error;
pub mod models;
pub mod services;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{FieldError, FormatError, SchedulingError};
pub use models::*;
pub use services::conflict::check_availability;
pub use services::lifecycle::AppointmentLifecycle;
pub use services::store::AppointmentStore;
pub use services::validation::ValidationService;
