mod resource;

#[cfg(test)]
pub use resource::MockResourceRepositoryTrait;
pub use resource::{ResourceRepository, ResourceRepositoryTrait};
