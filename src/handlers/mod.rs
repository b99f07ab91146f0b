mod resource;

pub use resource::{
    create_handler, delete_handler, get_all_handler, get_by_id_handler, preview_short_name_handler,
    reassign_short_name_handler, ResourceServiceType,
};
