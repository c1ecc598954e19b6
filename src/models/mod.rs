pub mod dates;
pub mod subscription;

pub use subscription::{
    Category, ContractAmount, Department, SubscriptionRecord, VendorProfile,
};
