pub mod bio_link;
pub mod bio_profile;

pub use bio_link::Entity as BioLinkEntity;
pub use bio_profile::Entity as BioProfileEntity;
