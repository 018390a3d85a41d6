pub mod data_type;
pub mod observation;
pub mod result_set;
pub mod station;
pub mod window;
