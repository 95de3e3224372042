pub mod features;
pub mod history;
