pub mod brand;
pub mod brand_request;
pub mod common;
pub mod dashboard;
pub mod notification;
pub mod order;
pub mod packing_design;
pub mod trademark;

pub use brand::BrandProfile;
pub use brand_request::*;
pub use common::*;
pub use dashboard::*;
pub use notification::{Badges, Section};
pub use order::*;
pub use packing_design::*;
pub use trademark::*;
