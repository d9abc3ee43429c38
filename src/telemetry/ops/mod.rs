pub mod extract;
pub mod sites;
