mod car;
mod money;
mod package;
mod payment;
mod service_record;

pub use car::*;
pub use money::*;
pub use package::*;
pub use payment::*;
pub use service_record::*;
