mod enrollment;
mod error;
mod http_client;
mod reset;
mod session;

pub use enrollment::{create_enrollment, EnrollmentResult};
pub use error::{ProvisionError, Stage};
pub use http_client::{AdminClient, ENROLLMENT_PATH, RESET_DB_PATH, SESSION_PATH};
pub use reset::reset_database;
pub use session::{authenticate, Session};
