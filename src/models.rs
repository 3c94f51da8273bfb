pub mod assignment;
pub mod class_slot;
pub mod store;
