//! District tableau.

pub mod district;

pub use district::{Board, BoardError, District, DistrictId, MAX_DISTRICTS};
