pub mod convert;
pub mod eprime;
pub mod error;
pub mod table;
pub mod trial;

pub use convert::convert;
pub use eprime::{find_tagged, EprimeLog};
pub use error::ParseError;
pub use trial::{TrialRecord, TrialType};
