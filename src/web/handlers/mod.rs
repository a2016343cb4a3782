pub mod application_handlers;
pub mod employer_handlers;
pub mod helpers;
pub mod job_handlers;
pub mod recommendation_handlers;
pub mod system_handlers;
pub mod worker_handlers;

pub use application_handlers::*;
pub use employer_handlers::*;
pub use job_handlers::*;
pub use recommendation_handlers::*;
pub use system_handlers::*;
pub use worker_handlers::*;
