pub mod profile;

pub use profile::{BadgeCounter, NewProfile, Profile, ProfilePatch};
