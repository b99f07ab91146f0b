mod resource;

pub use resource::{validate_short_name, MAX_SHORT_NAME_LENGTH};
