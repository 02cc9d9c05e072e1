// Domain modules

pub mod invites;
pub mod locations;
pub mod staff;
