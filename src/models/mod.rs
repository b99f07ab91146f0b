mod attributes;
mod resource;

pub use attributes::{Attributed, Attributes, SHORT_NAME_ATTRIBUTE};
pub use resource::{
    CreateResourceDto, Resource, ResourceQueryParams, ResourceResponseDto, ShortNamePreviewQuery,
};
