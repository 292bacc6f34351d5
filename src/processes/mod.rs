pub mod error;
pub mod helper_methods;
pub mod mp;
pub mod mrp;
pub mod mrp_refined;
