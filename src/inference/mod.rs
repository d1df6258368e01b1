pub mod distribution;
pub mod enumeration;
pub mod evidence;

pub use distribution::Distribution;
pub use evidence::Evidence;
