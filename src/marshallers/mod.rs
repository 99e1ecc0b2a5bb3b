//! Built-in marshallers

mod list;
mod map;
mod primitives;
mod record;

pub use list::*;
pub use map::*;
pub use primitives::*;
pub use record::{RecordMarshaller, ID_KEY, REF_KEY, TYPE_KEY};
