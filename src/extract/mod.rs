mod session;

pub use session::{Actor, RequireActor};
